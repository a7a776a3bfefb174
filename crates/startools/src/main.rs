//! The executable for tokenizing and quoting STAR data.

use std::process::ExitCode;

use clap::Parser;
use startools_driver::Arguments;

fn main() -> ExitCode {
    env_logger::init();

    startools_driver::run(Arguments::parse())
}
