//! Contains the main `run()` function for the `startools` executable.

use std::{
    collections::BTreeMap,
    fmt::Display,
    num::NonZeroUsize,
    path::PathBuf,
    process::ExitCode,
    time::Instant,
};

use log::info;
use startools_lexical::{
    quote::quote_with,
    token::Kind,
    tokenizer::{self, FileMode, Flags, Tokenizer},
};
use strum::IntoEnumIterator;
use thiserror::Error;

/// What is printed after tokenizing.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    clap::ValueEnum,
)]
pub enum Output {
    /// Only the timing and the number of tokens.
    Quiet,

    /// The timing and the number of tokens of each kind.
    Table,

    /// Every token, the timing and the number of tokens of each kind.
    #[default]
    All,
}

/// The options changing how tokens are classified.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, clap::Args,
)]
pub struct FlagArguments {
    /// Reports values starting with `[` or `]` as plain strings.
    #[clap(long)]
    pub allow_square_bracket: bool,

    /// Reports misused reserved words, other than `data_`, as plain strings.
    #[clap(long)]
    pub allow_bad_construct: bool,
}

impl FlagArguments {
    /// Gets the tokenizer [`Flags`] selected by the arguments.
    #[must_use]
    pub fn flags(&self) -> Flags {
        let mut flags = Flags::empty();
        flags.set(Flags::ALLOW_SQUARE_BRACKET, self.allow_square_bracket);
        flags.set(Flags::ALLOW_BAD_CONSTRUCT, self.allow_bad_construct);

        flags
    }
}

/// The arguments of the `tokenize` command.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, clap::Args)]
pub struct Tokenize {
    /// The file to tokenize. By default the whole file is read into memory.
    #[clap(required_unless_present = "string")]
    pub file: Option<PathBuf>,

    /// Tokenizes the given string instead of a file.
    #[clap(short, long, conflicts_with = "file")]
    pub string: Option<String>,

    /// Memory maps the file.
    #[clap(short, long, requires = "file", conflicts_with = "lines")]
    pub mapped: bool,

    /// Reads the file in chunks of at least this many lines.
    #[clap(short, long, value_name = "N", requires = "file")]
    pub lines: Option<NonZeroUsize>,

    /// Specifies what is printed.
    #[clap(short, long, value_enum, default_value_t)]
    pub output: Output,

    #[clap(flatten)]
    #[allow(missing_docs)]
    pub flags: FlagArguments,
}

impl Tokenize {
    /// Gets how the file is read.
    #[must_use]
    pub fn file_mode(&self) -> FileMode {
        if self.mapped {
            FileMode::Mapped
        } else {
            self.lines.map_or(FileMode::Buffered, FileMode::Lines)
        }
    }
}

/// The arguments of the `quote` command.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, clap::Args)]
pub struct Quote {
    /// The values to quote.
    #[clap(required = true)]
    pub values: Vec<String>,

    /// Allows quoting a value as a text field delimited by semicolons.
    #[clap(long)]
    pub allow_semicolon: bool,

    #[clap(flatten)]
    #[allow(missing_docs)]
    pub flags: FlagArguments,
}

/// The commands of the program.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, clap::Subcommand,
)]
pub enum Command {
    /// Splits STAR data into tokens and reports them.
    Tokenize(Tokenize),

    /// Encodes each value as a single STAR data value.
    Quote(Quote),
}

/// The arguments to the program.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, clap::Parser)]
#[clap(
    name = "startools",
    about = "Tokenizer for STAR, CIF and mmCIF data files",
    author = "Simmypeet"
)]
pub struct Arguments {
    /// The command to run.
    #[clap(subcommand)]
    pub command: Command,
}

/// The number of tokens of each kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    counts: BTreeMap<Kind, usize>,
}

impl Summary {
    /// Counts one more token of the given kind.
    pub fn record(&mut self, kind: Kind) {
        *self.counts.entry(kind).or_default() += 1;
    }

    /// Gets the number of tokens of the given kind.
    #[must_use]
    pub fn count(&self, kind: Kind) -> usize {
        self.counts.get(&kind).copied().unwrap_or_default()
    }

    /// Gets the number of tokens of every kind.
    #[must_use]
    pub fn total(&self) -> usize { self.counts.values().sum() }
}

impl Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for kind in Kind::iter() {
            writeln!(f, "{} {kind}", self.count(kind))?;
        }

        Ok(())
    }
}

/// Represents an error that ends a command.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum Error {
    #[error("no input to tokenize")]
    NoInput,

    #[error(transparent)]
    Tokenizer(#[from] tokenizer::Error),

    #[error("{0} value(s) cannot be quoted")]
    Unquotable(usize),
}

/// Runs the program with the given arguments.
#[must_use]
pub fn run(arguments: Arguments) -> ExitCode {
    let result = match arguments.command {
        Command::Tokenize(arguments) => tokenize(&arguments).map(|_| ()),
        Command::Quote(arguments) => quote(&arguments),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

/// Runs the `tokenize` command and returns the number of tokens of each
/// kind.
///
/// # Errors
///
/// - [`Error::NoInput`]: neither a string nor a file was given.
/// - [`Error::Tokenizer`]: the input could not be read.
pub fn tokenize(arguments: &Tokenize) -> Result<Summary, Error> {
    let mut tokenizer = Tokenizer::new(arguments.flags.flags());

    match (&arguments.string, &arguments.file) {
        (Some(string), _) => tokenizer.start_matching(string.as_str()),
        (None, Some(file)) => {
            tokenizer.start_matching_file(file, arguments.file_mode())?;
        }
        (None, None) => return Err(Error::NoInput),
    }

    println!("Starting tokenizing...");

    let start = Instant::now();
    let mut summary = Summary::default();

    for token in tokenizer {
        let token = token?;

        if arguments.output == Output::All {
            println!("{token}");
        }

        summary.record(token.kind());
    }

    let elapsed = start.elapsed();
    info!("tokenized {} tokens in {elapsed:?}", summary.total());

    println!("Finished: took {:.3}s", elapsed.as_secs_f64());

    if arguments.output != Output::Quiet {
        print!("\nSummary of token types:\n{summary}");
    }

    println!("\n{} tokens in total", summary.total());

    Ok(summary)
}

/// Runs the `quote` command, printing the quoted form of every value.
///
/// # Errors
///
/// [`Error::Unquotable`]: some of the values cannot be quoted; every such
/// value is reported on the standard error stream.
pub fn quote(arguments: &Quote) -> Result<(), Error> {
    let mut tokenizer = Tokenizer::new(arguments.flags.flags());
    let mut failures = 0;

    for value in &arguments.values {
        match quote_with(&mut tokenizer, value, arguments.allow_semicolon) {
            Ok(quoted) => println!("Quoted >>>{value}<<< as >>>{quoted}<<<"),
            Err(error) => {
                eprintln!("{error}");
                failures += 1;
            }
        }
    }

    if failures == 0 {
        Ok(())
    } else {
        Err(Error::Unquotable(failures))
    }
}
