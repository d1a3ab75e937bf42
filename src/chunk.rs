use crate::error::{Error, ReadError};
use alloc::vec::Vec;
use embedded_io::Read;

/// The universal 8-byte prefix of a RIFF chunk: a 4-byte ASCII tag
/// followed by a little-endian `u32` size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    /// 4-byte ASCII chunk tag, not null-terminated
    pub tag: [u8; 4],
    /// Size of the chunk body in bytes, excluding this prefix
    pub size: u32,
}

impl ChunkHeader {
    /// Decode the 8 prefix bytes.
    pub fn from_bytes(bytes: [u8; 8]) -> Self {
        ChunkHeader {
            tag: bytes[0..4].try_into().unwrap(),
            size: u32::from_le_bytes(bytes[4..8].try_into().unwrap()),
        }
    }

    /// Read exactly 8 bytes from `reader` and decode them.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self, ReadError<R::Error>> {
        let mut bytes = [0u8; 8];
        reader.read_exact(&mut bytes)?;
        Ok(Self::from_bytes(bytes))
    }

    /// Encode the prefix: the tag bytes followed by the size in
    /// little-endian order.
    pub fn to_bytes(&self) -> [u8; 8] {
        let mut bytes = [0u8; 8];
        bytes[0..4].copy_from_slice(&self.tag);
        bytes[4..8].copy_from_slice(&self.size.to_le_bytes());
        bytes
    }

    pub(crate) fn expect_tag(&self, expected: [u8; 4]) -> Result<(), Error> {
        if self.tag == expected {
            Ok(())
        } else {
            Err(Error::UnexpectedChunkId {
                expected,
                found: self.tag,
            })
        }
    }
}

/// The outer RIFF descriptor chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiffChunk {
    /// Declared size of everything in the file after the tag and size
    /// fields of this chunk
    pub size: u32,
    /// Container format tag, "WAVE" for wave files
    pub format: [u8; 4],
}

impl RiffChunk {
    /// Decode the RIFF descriptor: an 8-byte chunk header tagged "RIFF"
    /// followed by the 4-byte format tag, which must be "WAVE".
    pub fn read<R: Read>(reader: &mut R) -> Result<Self, ReadError<R::Error>> {
        let header = ChunkHeader::read(reader)?;
        header.expect_tag(*b"RIFF")?;
        let mut format = [0u8; 4];
        reader.read_exact(&mut format)?;
        if &format != b"WAVE" {
            return Err(Error::NotWaveFormat(format).into());
        }
        Ok(RiffChunk {
            size: header.size,
            format,
        })
    }

    /// Whether two RIFF descriptors can head the same joined file.
    /// The size is not compared, it changes with every concatenation.
    pub fn compatible_with(&self, other: &RiffChunk) -> bool {
        self.format == other.format
    }

    /// Encode the chunk: tag, size and format tag.
    pub fn to_bytes(&self) -> Vec<u8> {
        let header = ChunkHeader {
            tag: *b"RIFF",
            size: self.size,
        };
        let mut bytes = Vec::with_capacity(12);
        bytes.extend_from_slice(&header.to_bytes());
        bytes.extend_from_slice(&self.format);
        bytes
    }
}

/// The optional "fact" sub-chunk found in non-PCM wave files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactChunk {
    /// Number of sample frames per channel, present when the chunk
    /// declares at least 4 bytes of body
    pub sample_length: Option<u32>,
}

impl FactChunk {
    /// Decode the chunk body that follows `header`.
    ///
    /// A zero-length fact chunk is legal; the sample length is only
    /// read when the declared size has room for it.
    pub fn read_body<R: Read>(
        header: &ChunkHeader,
        reader: &mut R,
    ) -> Result<Self, ReadError<R::Error>> {
        header.expect_tag(*b"fact")?;
        let sample_length = if header.size >= 4 {
            let mut bytes = [0u8; 4];
            reader.read_exact(&mut bytes)?;
            Some(u32::from_le_bytes(bytes))
        } else {
            None
        };
        Ok(FactChunk { sample_length })
    }

    /// The encoded body size, recomputed from the fields: 4 when a
    /// sample length is carried, 0 otherwise.
    pub fn size(&self) -> u32 {
        match self.sample_length {
            Some(_) => 4,
            None => 0,
        }
    }

    /// Whether two fact chunks are compatible. The sample length is
    /// derived from the data size and is not compared.
    pub fn compatible_with(&self, _other: &FactChunk) -> bool {
        true
    }

    /// Encode the chunk: tag, size and the sample length when carried.
    pub fn to_bytes(&self) -> Vec<u8> {
        let header = ChunkHeader {
            tag: *b"fact",
            size: self.size(),
        };
        let mut bytes = Vec::with_capacity(12);
        bytes.extend_from_slice(&header.to_bytes());
        if let Some(sample_length) = self.sample_length {
            bytes.extend_from_slice(&sample_length.to_le_bytes());
        }
        bytes
    }
}

/// The "data" sub-chunk header. Only the declared payload size is
/// held; the payload itself stays in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataChunk {
    /// Payload size in bytes
    pub size: u32,
}

impl DataChunk {
    /// Interpret `header` as the data sub-chunk header.
    pub fn from_header(header: &ChunkHeader) -> Result<Self, Error> {
        header.expect_tag(*b"data")?;
        Ok(DataChunk { size: header.size })
    }

    /// Whether two data chunks are compatible. The size varies per
    /// file and is not compared.
    pub fn compatible_with(&self, _other: &DataChunk) -> bool {
        true
    }

    /// Encode the chunk header; the payload is written separately.
    pub fn to_bytes(&self) -> Vec<u8> {
        let header = ChunkHeader {
            tag: *b"data",
            size: self.size,
        };
        header.to_bytes().to_vec()
    }
}
