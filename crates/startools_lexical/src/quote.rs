//! Contains [`quote`]: encodes an arbitrary string as a single data value
//! token.

use getset::Getters;
use thiserror::Error;

use crate::{
    token::Kind,
    tokenizer::{Flags, Tokenizer},
};

/// The number of characters of the input kept in an [`Unquotable`] error.
const EXCERPT_LENGTH: usize = 50;

/// The string cannot be written as any single data value token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error, Getters)]
#[error("input data cannot be turned into a valid STAR value: {excerpt}")]
pub struct Unquotable {
    /// The beginning of the string that could not be quoted.
    #[get = "pub"]
    excerpt: String,
}

impl Unquotable {
    fn new(text: &str) -> Self {
        let excerpt = if text.chars().count() < EXCERPT_LENGTH {
            text.to_owned()
        } else {
            let mut excerpt =
                text.chars().take(EXCERPT_LENGTH).collect::<String>();
            excerpt.push_str("....");
            excerpt
        };

        Self { excerpt }
    }
}

/// The encodings tried before a text field, in order of preference.
const ENCODINGS: [(Kind, fn(&str) -> String); 3] = [
    (Kind::String, str::to_owned),
    (Kind::DquoteString, |text| format!("\"{text}\"")),
    (Kind::SquoteString, |text| format!("'{text}'")),
];

/// Encodes `text` so that tokenizing the result yields exactly one token
/// whose value is `text`.
///
/// The text is returned unchanged when it already is a plain value. Otherwise
/// it is wrapped in double quotes, then in single quotes and finally, when
/// `allow_semicolon` is set, in a text field (`;` at the start of two lines).
///
/// # Errors
///
/// [`Unquotable`]: none of the encodings tokenizes back to `text`.
///
/// # Example
///
/// ```
/// use startools_lexical::quote::quote;
///
/// assert_eq!(quote("Data Value 2", false).unwrap(), "\"Data Value 2\"");
/// assert_eq!(quote("Data'Value'6", false).unwrap(), "Data'Value'6");
/// ```
pub fn quote(text: &str, allow_semicolon: bool) -> Result<String, Unquotable> {
    quote_with(&mut Tokenizer::new(Flags::empty()), text, allow_semicolon)
}

/// Same as [`quote`] but checks the encodings with the given tokenizer, so
/// its [`Flags`] apply.
///
/// The current session of the tokenizer is discarded.
///
/// # Errors
///
/// See [`quote`].
pub fn quote_with(
    tokenizer: &mut Tokenizer,
    text: &str,
    allow_semicolon: bool,
) -> Result<String, Unquotable> {
    for (kind, encode) in ENCODINGS {
        let candidate = encode(text);

        if round_trips(tokenizer, &candidate, kind, text) {
            return Ok(candidate);
        }
    }

    if allow_semicolon {
        let candidate = format!(";{text}\n;");

        if round_trips(tokenizer, &candidate, Kind::Multiline, text) {
            return Ok(candidate);
        }
    }

    Err(Unquotable::new(text))
}

/// Returns `true` if `candidate` tokenizes to a single token of the given
/// kind holding `text`.
fn round_trips(
    tokenizer: &mut Tokenizer,
    candidate: &str,
    kind: Kind,
    text: &str,
) -> bool {
    tokenizer.start_matching(candidate);

    // a session over a string never fails
    let Ok(Some(token)) = tokenizer.next_token() else {
        return false;
    };

    !tokenizer.has_more_tokens()
        && token.kind() == kind
        && token.value() == text
}

#[cfg(test)]
mod test;
