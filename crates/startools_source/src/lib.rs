//! Contains the code related to the STAR data input.
//!
//! A tokenizer works on one span of text at a time. The span is either the
//! whole input, represented by [`Text`], or a [`chunk::Chunk`] of whole lines
//! produced by a [`chunk::ChunkReader`].

use std::{fs::File, io::Read, ops::Deref};

use derive_more::From;
use memmap2::Mmap;
use thiserror::Error;

pub mod chunk;

/// Represents an error that occurs when loading STAR data.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),
}

/// A read-only memory map of a file whose content is known to be valid UTF-8.
#[derive(Debug)]
pub struct Mapped {
    map: Mmap,
}

impl Mapped {
    /// Maps the whole content of the given file.
    ///
    /// # Errors
    ///
    /// - [`Error::Io`]: the file could not be mapped.
    /// - [`Error::Utf8`]: the content of the file is not valid UTF-8.
    pub fn new(file: &File) -> Result<Self, Error> {
        // SAFETY: the map is read-only. Modifying the file from another
        // process while it is mapped is outside of what this crate supports.
        let map = unsafe { Mmap::map(file)? };
        std::str::from_utf8(&map)?;

        Ok(Self { map })
    }

    /// Gets the content of the map.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // SAFETY: the content was validated in `Mapped::new` and the map is
        // never written through.
        unsafe { std::str::from_utf8_unchecked(&self.map) }
    }
}

/// The text of a whole-input span.
#[derive(Debug, From)]
pub enum Text {
    /// The text lives on the heap; either given directly or read from a file.
    Owned(String),

    /// The text is a memory map of a file.
    Mapped(Mapped),
}

impl Text {
    /// Reads the whole content of the file into a buffer.
    ///
    /// # Errors
    ///
    /// - [`Error::Io`]: the file could not be read.
    /// - [`Error::Utf8`]: the content of the file is not valid UTF-8.
    pub fn read(mut file: File) -> Result<Self, Error> {
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;

        let string = String::from_utf8(bytes).map_err(|x| x.utf8_error())?;

        Ok(Self::Owned(string))
    }

    /// Memory maps the whole content of the file.
    ///
    /// Empty files are not mapped; an empty owned string is returned instead.
    ///
    /// # Errors
    ///
    /// See [`Mapped::new`].
    pub fn map(file: &File) -> Result<Self, Error> {
        if file.metadata()?.len() == 0 {
            return Ok(Self::Owned(String::new()));
        }

        Mapped::new(file).map(Self::Mapped)
    }

    /// Gets the text as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Owned(string) => string,
            Self::Mapped(mapped) => mapped.as_str(),
        }
    }

    /// Returns `true` if the text is backed by a memory map.
    #[must_use]
    pub const fn is_mapped(&self) -> bool { matches!(self, Self::Mapped(_)) }
}

impl Deref for Text {
    type Target = str;

    fn deref(&self) -> &str { self.as_str() }
}

impl AsRef<str> for Text {
    fn as_ref(&self) -> &str { self.as_str() }
}

impl From<&str> for Text {
    fn from(value: &str) -> Self { Self::Owned(value.to_owned()) }
}

#[cfg(test)]
mod test;
