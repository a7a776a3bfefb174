//! Contains the [`Tokenizer`]: a pull-based tokenizer with one token of
//! lookahead.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use bitflags::bitflags;
use log::{debug, trace, warn};
use startools_source::{
    chunk::{Chunk, ChunkReader},
    Text,
};
use thiserror::Error;

use crate::{
    grammar::{Grammar, Match},
    token::{Kind, Token},
};

bitflags! {
    /// Options that change how the [`Tokenizer`] classifies tokens.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Flags: u8 {
        /// Reports tokens starting with `[` or `]` as [`Kind::String`]
        /// instead of [`Kind::SquareBracket`].
        const ALLOW_SQUARE_BRACKET = 1;

        /// Reports misused reserved words as [`Kind::String`] instead of
        /// [`Kind::BadConstruct`]. A bare `data_` is still a
        /// [`Kind::BadConstruct`].
        const ALLOW_BAD_CONSTRUCT = 1 << 1;
    }
}

impl Default for Flags {
    fn default() -> Self { Self::empty() }
}

/// Specifies how [`Tokenizer::start_matching_file`] reads a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileMode {
    /// Reads the whole file into memory.
    Buffered,

    /// Memory maps the whole file.
    Mapped,

    /// Reads the file in chunks of at least the given number of lines.
    ///
    /// Line terminators are normalized to `\n` and the positions of the
    /// tokens are relative to their chunk.
    Lines(NonZeroUsize),
}

impl Default for FileMode {
    fn default() -> Self { Self::Lines(NonZeroUsize::MIN) }
}

/// Represents an error that occurs while reading the input of a
/// [`Tokenizer`].
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum Error {
    #[error("failed to open {}: {source}", .path.display())]
    Open { path: PathBuf, source: std::io::Error },

    #[error(transparent)]
    Source(#[from] startools_source::Error),
}

/// The span of text being matched.
enum Source {
    Whole(Text),
    Lines {
        reader: ChunkReader<Box<dyn BufRead + Send>>,
        chunk: Option<Chunk>,
    },
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Whole(text) => f.debug_tuple("Whole").field(text).finish(),
            Self::Lines { reader, chunk } => f
                .debug_struct("Lines")
                .field("chunk_size", &reader.chunk_size())
                .field("next_line", &reader.next_line())
                .field("chunk", chunk)
                .finish_non_exhaustive(),
        }
    }
}

impl Source {
    fn span(&self) -> &str {
        match self {
            Self::Whole(text) => text.as_str(),
            Self::Lines { chunk, .. } => {
                chunk.as_ref().map_or("", |x| x.text().as_str())
            }
        }
    }

    /// Gets the first and last line numbers of the span.
    fn lines(&self) -> (usize, Option<usize>) {
        match self {
            Self::Whole(_) => (1, None),
            Self::Lines { reader, chunk } => chunk.as_ref().map_or(
                (reader.next_line(), None),
                |x| (x.start_line(), Some(x.end_line())),
            ),
        }
    }
}

#[derive(Debug)]
enum Lookahead {
    Token(Token),
    Failed(Error),
    Exhausted,
}

/// Splits STAR, CIF or mmCIF data into [`Token`]s.
///
/// A matching session is started with one of the `start_matching` functions.
/// The tokenizer always holds the next token of the session, so
/// [`Tokenizer::has_more_tokens`] and [`Tokenizer::peek`] never read input.
///
/// The tokenizer also implements [`Iterator`], yielding the remaining tokens
/// of the current session.
///
/// # Example
///
/// ```
/// use startools_lexical::{
///     token::Kind,
///     tokenizer::{Flags, Tokenizer},
/// };
///
/// let mut tokenizer = Tokenizer::new(Flags::empty());
/// tokenizer.start_matching("data_x\n_a 'b c'");
///
/// let kinds = tokenizer
///     .map(|x| x.map(|x| x.kind()))
///     .collect::<Result<Vec<_>, _>>()
///     .unwrap();
///
/// assert_eq!(kinds, [Kind::DataBlock, Kind::DataName, Kind::SquoteString]);
/// ```
#[derive(Debug)]
pub struct Tokenizer {
    flags: Flags,
    source: Option<Source>,

    // byte offset in the current span where the next search starts
    cursor: usize,
    lookahead: Lookahead,
}

impl Default for Tokenizer {
    fn default() -> Self { Self::new(Flags::empty()) }
}

impl Tokenizer {
    /// Creates a new [`Tokenizer`] with no matching session.
    #[must_use]
    pub const fn new(flags: Flags) -> Self {
        Self { flags, source: None, cursor: 0, lookahead: Lookahead::Exhausted }
    }

    /// Gets the flags the tokenizer was created with.
    #[must_use]
    pub const fn flags(&self) -> Flags { self.flags }

    /// Starts a new session over the given text, discarding the current one.
    pub fn start_matching(&mut self, text: impl Into<Text>) {
        let text = text.into();

        debug!(
            "start matching {} bytes of {} text",
            text.len(),
            if text.is_mapped() { "mapped" } else { "buffered" }
        );

        self.source = Some(Source::Whole(text));
        self.cursor = 0;
        self.lookahead = self.advance();
    }

    /// Starts a new session over the content of a file, discarding the
    /// current one.
    ///
    /// # Errors
    ///
    /// - [`Error::Open`]: the file could not be opened.
    /// - [`Error::Source`]: the file could not be read, mapped or is not valid
    ///   UTF-8.
    ///
    /// On error the tokenizer is left without a session.
    pub fn start_matching_file(
        &mut self,
        path: impl AsRef<Path>,
        mode: FileMode,
    ) -> Result<(), Error> {
        self.discard();

        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|source| Error::Open { path: path.to_owned(), source })?;

        debug!("start matching {} ({mode:?})", path.display());

        match mode {
            FileMode::Buffered => self.start_matching(Text::read(file)?),
            FileMode::Mapped => self.start_matching(Text::map(&file)?),
            FileMode::Lines(chunk_size) => {
                self.start_matching_reader(BufReader::new(file), chunk_size)?;
            }
        }

        Ok(())
    }

    /// Starts a new session that reads the given stream in chunks of at least
    /// `chunk_size` lines, discarding the current one.
    ///
    /// A chunk never ends inside an open text field, so a
    /// [`Kind::Multiline`] token is never split. Line terminators are
    /// normalized to `\n` and the positions of the tokens are relative to
    /// their chunk.
    ///
    /// # Errors
    ///
    /// [`Error::Source`]: reading the first chunk failed. On error the
    /// tokenizer is left without a session.
    pub fn start_matching_reader(
        &mut self,
        reader: impl BufRead + Send + 'static,
        chunk_size: NonZeroUsize,
    ) -> Result<(), Error> {
        debug!("start matching a stream in chunks of {chunk_size} lines");

        let reader: Box<dyn BufRead + Send> = Box::new(reader);
        self.source = Some(Source::Lines {
            reader: ChunkReader::new(reader, chunk_size),
            chunk: None,
        });
        self.cursor = 0;

        match self.advance() {
            Lookahead::Failed(error) => {
                self.discard();
                Err(error)
            }
            lookahead => {
                self.lookahead = lookahead;
                Ok(())
            }
        }
    }

    /// Returns `true` if the current session has another token.
    ///
    /// This is also `true` when reading the input for the next token failed;
    /// the error is then returned by the next call to
    /// [`Tokenizer::next_token`].
    #[must_use]
    pub const fn has_more_tokens(&self) -> bool {
        !matches!(self.lookahead, Lookahead::Exhausted)
    }

    /// Gets the next token of the session without consuming it.
    #[must_use]
    pub const fn peek(&self) -> Option<&Token> {
        match &self.lookahead {
            Lookahead::Token(token) => Some(token),
            Lookahead::Failed(_) | Lookahead::Exhausted => None,
        }
    }

    /// Consumes the next token of the session and matches the one after it.
    ///
    /// Returns `None` when the session has no more tokens or no session was
    /// started.
    ///
    /// # Errors
    ///
    /// [`Error::Source`]: reading the next chunk of the input failed. The
    /// session ends with the error.
    pub fn next_token(&mut self) -> Result<Option<Token>, Error> {
        match std::mem::replace(&mut self.lookahead, Lookahead::Exhausted) {
            Lookahead::Token(token) => {
                self.lookahead = self.advance();
                Ok(Some(token))
            }
            Lookahead::Failed(error) => {
                self.discard();
                Err(error)
            }
            Lookahead::Exhausted => Ok(None),
        }
    }

    fn discard(&mut self) {
        self.source = None;
        self.cursor = 0;
        self.lookahead = Lookahead::Exhausted;
    }

    /// Matches the token after the cursor, reading more chunks as needed.
    fn advance(&mut self) -> Lookahead {
        let flags = self.flags;
        let Some(source) = self.source.as_mut() else {
            return Lookahead::Exhausted;
        };

        loop {
            let span = source.span();

            if let Some(found) = Grammar::global().find(span, self.cursor) {
                let (start_line, end_line) = source.lines();
                let token = Token::new(
                    classify(flags, &found, span),
                    span[found.value.clone()].to_owned(),
                    start_line,
                    end_line,
                    found.range.clone(),
                );

                trace!("{token}");

                self.cursor = found.range.end;
                return Lookahead::Token(token);
            }

            let Source::Lines { reader, chunk } = source else {
                return Lookahead::Exhausted;
            };

            match reader.next_chunk() {
                Ok(Some(next)) => {
                    if next.multiline() {
                        warn!(
                            "text field opened on line {} is never closed",
                            next.start_line()
                        );
                    }

                    *chunk = Some(next);
                    self.cursor = 0;
                }
                Ok(None) => {
                    *chunk = None;
                    return Lookahead::Exhausted;
                }
                Err(error) => return Lookahead::Failed(error.into()),
            }
        }
    }
}

/// Applies the reclassification flags to a match.
fn classify(flags: Flags, found: &Match, span: &str) -> Kind {
    match found.kind {
        Kind::SquareBracket if flags.contains(Flags::ALLOW_SQUARE_BRACKET) => {
            Kind::String
        }
        Kind::BadConstruct
            if flags.contains(Flags::ALLOW_BAD_CONSTRUCT)
                && !span[found.range.clone()].eq_ignore_ascii_case("data_") =>
        {
            Kind::String
        }
        kind => kind,
    }
}

impl Iterator for Tokenizer {
    type Item = Result<Token, Error>;

    fn next(&mut self) -> Option<Self::Item> { self.next_token().transpose() }
}

#[cfg(test)]
pub(crate) mod strategy;
