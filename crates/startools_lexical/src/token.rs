//! Is a module containing the [`Token`] type and the [`Kind`] of tokens.

use std::{fmt::Display, ops::Range};

use getset::{CopyGetters, Getters};
use strum_macros::{AsRefStr, EnumIter, EnumString, FromRepr, IntoStaticStr};
use thiserror::Error;

/// The category of a [`Token`].
///
/// The variants are listed in the order the grammar tries them; the
/// discriminant of each variant is its stable numeric code. The textual name
/// of a kind (see [`Kind::as_ref`]) is its upper snake case identifier, for
/// example `SQUOTE_STRING`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    EnumString,
    AsRefStr,
    IntoStaticStr,
    FromRepr,
    strum_macros::Display,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Kind {
    /// A text field delimited by `;` at the start of two lines.
    Multiline = 1,

    /// A comment from `#` up to the end of the line.
    Comment = 2,

    /// The STAR-only `global_` keyword.
    Global = 3,

    /// A STAR-only `save_` frame header or terminator.
    SaveFrame = 4,

    /// A STAR-only `$name` save frame reference.
    SaveFrameRef = 5,

    /// The STAR-only `stop_` keyword.
    LoopStop = 6,

    /// A `data_name` block header.
    DataBlock = 7,

    /// The `loop_` keyword.
    Loop = 8,

    /// A reserved word used in a place it is not allowed, or a bare `data_`.
    BadConstruct = 9,

    /// A `_name` tag.
    DataName = 10,

    /// A value delimited by single quotes.
    SquoteString = 11,

    /// A value delimited by double quotes.
    DquoteString = 12,

    /// The inapplicable value `.`.
    Null = 13,

    /// The unknown value `?`.
    Unknown = 14,

    /// An unquoted value starting with `[` or `]`.
    SquareBracket = 15,

    /// An unquoted value.
    String = 16,

    /// Any run of characters that is not a valid token.
    BadToken = 17,
}

/// The error returned when converting a number that is not the code of any
/// [`Kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Error)]
#[error("{0} is not the code of a token kind")]
pub struct InvalidCode(pub u8);

impl Kind {
    /// Gets the stable numeric code of this kind.
    #[must_use]
    pub const fn code(self) -> u8 { self as u8 }

    /// Returns `true` if the kind only exists in STAR files and never in
    /// CIF or mmCIF files.
    #[must_use]
    pub const fn is_star_only(self) -> bool {
        matches!(
            self,
            Self::Global | Self::SaveFrame | Self::SaveFrameRef | Self::LoopStop
        )
    }

    /// Returns `true` if a token of this kind can be used as a data value.
    #[must_use]
    pub const fn is_data_value(self) -> bool {
        matches!(
            self,
            Self::Multiline
                | Self::SquoteString
                | Self::DquoteString
                | Self::Null
                | Self::Unknown
                | Self::String
        )
    }

    /// Returns `true` if a token of this kind is a syntax error.
    #[must_use]
    pub const fn is_syntax_error(self) -> bool {
        matches!(self, Self::BadConstruct | Self::BadToken)
    }
}

impl TryFrom<u8> for Kind {
    type Error = InvalidCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_repr(code).ok_or(InvalidCode(code))
    }
}

impl From<Kind> for u8 {
    fn from(kind: Kind) -> Self { kind.code() }
}

/// A single lexical unit produced by the tokenizer.
///
/// The match offsets are byte offsets relative to the span the token was
/// matched in: the whole input, or the chunk of lines when reading a file
/// line by line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters, CopyGetters)]
pub struct Token {
    /// The category of the token.
    #[get_copy = "pub"]
    kind: Kind,

    /// The decoded content of the token.
    ///
    /// For quoted strings this excludes the quotes, for text fields it
    /// excludes the delimiting semicolons and the final line terminator. For
    /// every other kind it is the text of the whole match.
    #[get = "pub"]
    value: String,

    /// The 1-based line number of the first line of the matched span.
    #[get_copy = "pub"]
    start_line: usize,

    /// The 1-based line number of the last line of the matched span, or
    /// `None` when the span extends to the end of the input.
    #[get_copy = "pub"]
    end_line: Option<usize>,

    /// The byte offset where the match starts.
    #[get_copy = "pub"]
    match_start: usize,

    /// The byte offset just past the end of the match.
    #[get_copy = "pub"]
    match_end: usize,
}

impl Token {
    /// Creates a new [`Token`].
    ///
    /// `range` is the byte range of the whole match within its span.
    #[must_use]
    pub fn new(
        kind: Kind,
        value: String,
        start_line: usize,
        end_line: Option<usize>,
        range: Range<usize>,
    ) -> Self {
        Self {
            kind,
            value,
            start_line,
            end_line,
            match_start: range.start,
            match_end: range.end,
        }
    }

    /// Gets the byte range of the whole match within its span.
    #[must_use]
    pub const fn match_range(&self) -> Range<usize> {
        self.match_start..self.match_end
    }

    /// Consumes the token and returns its decoded content.
    #[must_use]
    pub fn into_value(self) -> String { self.value }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Type: {}; line/start-end: {}/{}-{}; Value: >>>{}<<<",
            self.kind,
            self.start_line,
            self.match_start,
            self.match_end,
            self.value
        )
    }
}
