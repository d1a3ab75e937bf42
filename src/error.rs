use crate::wave::WaveHeader;
use alloc::boxed::Box;
use embedded_io::ReadExactError;

/// Error type for different parsing and validation failures
#[derive(Debug, PartialEq)]
pub enum Error {
    /// A chunk carried a tag other than the one expected at its position
    UnexpectedChunkId {
        /// The tag expected at this position
        expected: [u8; 4],
        /// The tag that was actually read
        found: [u8; 4],
    },
    /// The RIFF descriptor carried a format tag other than "WAVE"
    NotWaveFormat([u8; 4]),
    /// The stream ended in the middle of a header
    UnexpectedEof,
    /// A combined chunk size exceeds the 32-bit RIFF limit
    RiffSizeOverflow,
    /// Two files do not share compatible audio parameters; holds the
    /// first input's header and the offending header
    IncompatibleHeaders(Box<WaveHeader>, Box<WaveHeader>),
}

/// Error type for decoding from a byte stream
#[derive(Debug, PartialEq)]
pub enum ReadError<E> {
    /// Error from the underlying reader
    Reader(E),
    /// Error from the parser
    Parser(Error),
}

impl<E> From<Error> for ReadError<E> {
    fn from(e: Error) -> Self {
        ReadError::Parser(e)
    }
}

impl<E> From<ReadExactError<E>> for ReadError<E> {
    fn from(e: ReadExactError<E>) -> Self {
        match e {
            ReadExactError::UnexpectedEof => ReadError::Parser(Error::UnexpectedEof),
            ReadExactError::Other(e) => ReadError::Reader(e),
        }
    }
}

/// Error type for a join operation
#[derive(Debug, PartialEq)]
pub enum JoinError<R, W> {
    /// Error from an input reader
    Reader(R),
    /// Error from the output sink
    Writer(W),
    /// Error from the parser or the compatibility check
    Parser(Error),
}

impl<R, W> From<Error> for JoinError<R, W> {
    fn from(e: Error) -> Self {
        JoinError::Parser(e)
    }
}

impl<R, W> From<ReadError<R>> for JoinError<R, W> {
    fn from(e: ReadError<R>) -> Self {
        match e {
            ReadError::Reader(e) => JoinError::Reader(e),
            ReadError::Parser(e) => JoinError::Parser(e),
        }
    }
}
