//! Contains the [`ChunkReader`] that splits a line-oriented stream into
//! chunks of whole lines.
//!
//! A chunk never ends inside an open multi-line text field (one that starts
//! with a line beginning with `;`), so a multi-line token is always matched
//! within a single chunk.

use std::{
    io::{BufRead, ErrorKind},
    num::NonZeroUsize,
};

use getset::{CopyGetters, Getters};
use log::trace;

use crate::Error;

/// A span of whole lines read from a line-oriented stream.
///
/// Line terminators are normalized to a single `\n`.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Getters, CopyGetters,
)]
pub struct Chunk {
    /// The text of the lines in this chunk.
    #[get = "pub"]
    text: String,

    /// The 1-based line number of the first line in this chunk.
    #[get_copy = "pub"]
    start_line: usize,

    /// The 1-based line number of the last line in this chunk.
    #[get_copy = "pub"]
    end_line: usize,

    /// Whether the stream ended while a multi-line text field was still open.
    #[get_copy = "pub"]
    multiline: bool,
}

impl Chunk {
    /// Gets the number of lines in this chunk.
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.end_line + 1 - self.start_line
    }
}

/// Reads [`Chunk`]s from a [`BufRead`].
#[derive(Debug)]
pub struct ChunkReader<R> {
    reader: R,
    chunk_size: NonZeroUsize,

    // 1-based number of the next line to be read
    next_line: usize,
    line: String,
    bytes: Vec<u8>,
}

impl<R: BufRead> ChunkReader<R> {
    /// Creates a new [`ChunkReader`].
    ///
    /// # Parameters
    ///
    /// - `reader`: the line-oriented source.
    /// - `chunk_size`: the minimum number of lines in a chunk. A chunk holds
    ///   more lines than this when it would otherwise end inside a multi-line
    ///   text field.
    pub fn new(reader: R, chunk_size: NonZeroUsize) -> Self {
        Self {
            reader,
            chunk_size,
            next_line: 1,
            line: String::new(),
            bytes: Vec::new(),
        }
    }

    /// Gets the minimum number of lines in a chunk.
    #[must_use]
    pub const fn chunk_size(&self) -> NonZeroUsize { self.chunk_size }

    /// Gets the 1-based number of the next line to be read.
    #[must_use]
    pub const fn next_line(&self) -> usize { self.next_line }

    /// Reads the next chunk.
    ///
    /// Returns `None` when the stream has no more lines.
    ///
    /// # Errors
    ///
    /// - [`Error::Io`]: reading from the stream failed.
    /// - [`Error::Utf8`]: a line is not valid UTF-8.
    pub fn next_chunk(&mut self) -> Result<Option<Chunk>, Error> {
        let start_line = self.next_line;
        let mut text = String::new();
        let mut lines_read = 0;
        let mut multiline = false;

        while self.read_line()? {
            lines_read += 1;
            text.push_str(&self.line);
            text.push('\n');

            // each `;` at the start of a line opens or closes a text field
            if self.line.starts_with(';') {
                multiline = !multiline;
            }

            if !multiline && lines_read >= self.chunk_size.get() {
                break;
            }
        }

        if lines_read == 0 {
            return Ok(None);
        }

        self.next_line += lines_read;

        let chunk = Chunk {
            text,
            start_line,
            end_line: start_line + lines_read - 1,
            multiline,
        };

        trace!(
            "read chunk of lines {}-{} ({} bytes)",
            chunk.start_line,
            chunk.end_line,
            chunk.text.len()
        );

        Ok(Some(chunk))
    }

    /// Reads one line into `self.line` without its terminator.
    ///
    /// A line ends at `\n`, `\r` or `\r\n`. Returns `false` at the end of the
    /// stream.
    fn read_line(&mut self) -> Result<bool, Error> {
        self.bytes.clear();

        let mut any = false;
        let mut after_carriage_return = false;

        loop {
            let buffer = match self.reader.fill_buf() {
                Ok(buffer) => buffer,
                Err(error) if error.kind() == ErrorKind::Interrupted => {
                    continue;
                }
                Err(error) => return Err(error.into()),
            };

            if buffer.is_empty() {
                break;
            }

            // a `\n` right after `\r` belongs to the same terminator
            if after_carriage_return {
                if buffer[0] == b'\n' {
                    self.reader.consume(1);
                }
                break;
            }

            any = true;

            if let Some(index) =
                buffer.iter().position(|&x| matches!(x, b'\n' | b'\r'))
            {
                let terminator = buffer[index];
                self.bytes.extend_from_slice(&buffer[..index]);
                self.reader.consume(index + 1);

                if terminator == b'\n' {
                    break;
                }
                after_carriage_return = true;
            } else {
                let length = buffer.len();
                self.bytes.extend_from_slice(buffer);
                self.reader.consume(length);
            }
        }

        self.line.clear();
        self.line.push_str(std::str::from_utf8(&self.bytes)?);

        Ok(any)
    }
}

impl<R: BufRead> Iterator for ChunkReader<R> {
    type Item = Result<Chunk, Error>;

    fn next(&mut self) -> Option<Self::Item> { self.next_chunk().transpose() }
}
