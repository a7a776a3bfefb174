//! This crate tokenizes STAR, CIF and mmCIF data into a stream of typed
//! tokens for a higher level parser.
//!
//! The tokenizer knows nothing about dictionaries, data types or the case
//! sensitivity of values; it only recognizes the lexical structure. Malformed
//! input is reported as [`token::Kind::BadToken`] or
//! [`token::Kind::BadConstruct`] tokens, never as an error.
//!
//! The entry point is [`tokenizer::Tokenizer`]. [`quote::quote`] goes the other
//! way and encodes a string as a single data value token.

pub mod grammar;
pub mod quote;
pub mod token;
pub mod tokenizer;
