use crate::chunk::{ChunkHeader, DataChunk, FactChunk, RiffChunk};
use crate::error::{Error, JoinError, ReadError};
use crate::fmt::FmtChunk;
use alloc::vec::Vec;
use embedded_io::{Read, Write};

/// A fully decoded wave file header: the RIFF descriptor, the `fmt_`
/// sub-chunk, an optional `fact` sub-chunk and the data sub-chunk
/// header
///
/// The audio payload is never read while decoding a header; only its
/// declared size is held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveHeader {
    /// Outer RIFF descriptor
    pub riff: RiffChunk,
    /// Audio format parameters
    pub fmt: FmtChunk,
    /// Non-PCM metadata, absent in PCM files
    pub fact: Option<FactChunk>,
    /// Data sub-chunk header
    pub data: DataChunk,
}

impl WaveHeader {
    /// The total size of the smallest legal header in bytes.
    pub const MIN_SIZE: u32 = 44;

    /// Decode a header from the start of `reader`.
    ///
    /// Reads the RIFF descriptor, the `fmt_` sub-chunk, a `fact`
    /// sub-chunk when one is present, and the data sub-chunk header.
    /// The stream is left positioned at the first payload byte.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self, ReadError<R::Error>> {
        let riff = RiffChunk::read(reader)?;
        let fmt_header = ChunkHeader::read(reader)?;
        let fmt = FmtChunk::read_body(&fmt_header, reader)?;

        // The next chunk is either the optional "fact" sub-chunk or
        // already the data sub-chunk.
        let next = ChunkHeader::read(reader)?;
        let (fact, data_header) = if &next.tag == b"fact" {
            let fact = FactChunk::read_body(&next, reader)?;
            (Some(fact), ChunkHeader::read(reader)?)
        } else {
            (None, next)
        };
        let data = DataChunk::from_header(&data_header)?;

        Ok(WaveHeader {
            riff,
            fmt,
            fact,
            data,
        })
    }

    /// The total size of this header.
    ///
    /// This is the total number of bytes up to and including the data
    /// sub-chunk size field.
    pub fn size(&self) -> u32 {
        8 + self.riff.size.saturating_sub(self.data.size)
    }

    /// Whether the header describes a Pulse-code modulation (PCM) wave
    /// file: a 16-byte `fmt_` chunk and no `fact` chunk.
    pub fn is_pcm(&self) -> bool {
        self.fmt.size() == 16 && self.fact.is_none()
    }

    /// Whether two headers share compatible audio parameters.
    ///
    /// Chunk sizes are not compared, they include the data payload
    /// which varies per file. A `fact` chunk must be present in both
    /// headers or in neither.
    pub fn compatible_with(&self, other: &WaveHeader) -> bool {
        let fact = match (&self.fact, &other.fact) {
            (None, None) => true,
            (Some(a), Some(b)) => a.compatible_with(b),
            _ => false,
        };
        self.riff.compatible_with(&other.riff)
            && self.fmt.compatible_with(&other.fmt)
            && self.data.compatible_with(&other.data)
            && fact
    }

    /// Build the header of a concatenated file carrying `data_size`
    /// payload bytes, leaving `self` untouched.
    ///
    /// The RIFF size is recomputed from the sub-chunk sizes with
    /// checked arithmetic. When the source header carries a fact chunk
    /// with a sample length, the new length is derived from the
    /// recomputed RIFF size and the channel count.
    pub fn with_data_size(&self, data_size: u32) -> Result<WaveHeader, Error> {
        let mut riff_size: u32 = 4;
        riff_size = riff_size
            .checked_add(8 + self.fmt.size())
            .ok_or(Error::RiffSizeOverflow)?;
        if let Some(fact) = &self.fact {
            riff_size = riff_size
                .checked_add(8 + fact.size())
                .ok_or(Error::RiffSizeOverflow)?;
        }
        riff_size = riff_size
            .checked_add(8)
            .and_then(|size| size.checked_add(data_size))
            .ok_or(Error::RiffSizeOverflow)?;

        let fact = self.fact.map(|fact| FactChunk {
            sample_length: fact.sample_length.map(|_| {
                riff_size
                    .checked_div(self.fmt.num_channels as u32)
                    .unwrap_or(0)
            }),
        });

        Ok(WaveHeader {
            riff: RiffChunk {
                size: riff_size,
                format: self.riff.format,
            },
            fmt: self.fmt.clone(),
            fact,
            data: DataChunk { size: data_size },
        })
    }

    /// Encode the header: every sub-chunk in file order, sizes
    /// recomputed from the current fields.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.size() as usize);
        bytes.extend_from_slice(&self.riff.to_bytes());
        bytes.extend_from_slice(&self.fmt.to_bytes());
        if let Some(fact) = &self.fact {
            bytes.extend_from_slice(&fact.to_bytes());
        }
        bytes.extend_from_slice(&self.data.to_bytes());
        bytes
    }
}

/// A wave file: a decoded header plus exclusive ownership of the rest
/// of the stream, which holds the audio payload
pub struct WaveFile<R> {
    /// The decoded file header
    pub header: WaveHeader,
    reader: R,
}

impl<R: Read> WaveFile<R> {
    /// Decode the header and wrap the stream, leaving it positioned at
    /// the first payload byte.
    pub fn from_reader(mut reader: R) -> Result<Self, ReadError<R::Error>> {
        let header = WaveHeader::read(&mut reader)?;
        Ok(WaveFile { header, reader })
    }

    /// Whether this file can be joined with `other`.
    pub fn compatible_with<S>(&self, other: &WaveFile<S>) -> bool {
        self.header.compatible_with(&other.header)
    }

    /// Consume the file into a one-pass iterator over the payload
    /// bytes.
    ///
    /// The iterator runs to the end of the stream and cannot be
    /// restarted; the underlying stream is released when the payload
    /// is dropped.
    pub fn payload(self) -> Payload<R> {
        Payload {
            reader: self.reader,
            buffer: [0; PAYLOAD_BUFFER_SIZE],
            pos: 0,
            len: 0,
            done: false,
        }
    }
}

const PAYLOAD_BUFFER_SIZE: usize = 512;

/// One-pass iterator over the audio payload bytes of a [`WaveFile`]
pub struct Payload<R> {
    reader: R,
    buffer: [u8; PAYLOAD_BUFFER_SIZE],
    pos: usize,
    len: usize,
    done: bool,
}

impl<R: Read> Payload<R> {
    fn fill(&mut self) -> Result<usize, R::Error> {
        let n = self.reader.read(&mut self.buffer)?;
        self.pos = 0;
        self.len = n;
        if n == 0 {
            self.done = true;
        }
        Ok(n)
    }

    /// Copy every remaining payload byte into `sink` and return the
    /// number of bytes copied. The underlying stream is released
    /// afterwards.
    pub fn pipe_into<W: Write>(
        mut self,
        sink: &mut W,
    ) -> Result<u64, JoinError<R::Error, W::Error>> {
        let mut copied: u64 = 0;
        loop {
            if self.pos < self.len {
                sink.write_all(&self.buffer[self.pos..self.len])
                    .map_err(JoinError::Writer)?;
                copied += (self.len - self.pos) as u64;
                self.pos = self.len;
            }
            if self.done || self.fill().map_err(JoinError::Reader)? == 0 {
                return Ok(copied);
            }
        }
    }
}

impl<R: Read> Iterator for Payload<R> {
    type Item = Result<u8, R::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.len {
            if self.done {
                return None;
            }
            match self.fill() {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e)),
            }
        }
        let byte = self.buffer[self.pos];
        self.pos += 1;
        Some(Ok(byte))
    }
}
