use crate::chunk::ChunkHeader;
use crate::error::ReadError;
use alloc::vec;
use alloc::vec::Vec;
use embedded_io::Read;

/// Struct representing the `fmt_` sub-chunk of a wave file
///
/// for more information see [`here`]
///
/// [`here`]: http://soundfile.sapp.org/doc/WaveFormat/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FmtChunk {
    /// audio format code, `1` for PCM
    pub audio_format: u16,
    /// number of audio channels in the sample data, channels are interleaved
    pub num_channels: u16,
    /// sample rate, typical values are `44_100`, `48_000` or `96_000`
    pub sample_rate: u32,
    /// bytes per second of audio data
    pub byte_rate: u32,
    /// bytes per sample frame across all channels
    pub block_align: u16,
    /// bit depth for each sample, typical values are `8`, `16` or `24`
    pub bits_per_sample: u16,
    /// opaque extension bytes carried by non-PCM files, re-serialized verbatim
    pub extension: Option<Vec<u8>>,
}

impl FmtChunk {
    pub(crate) fn from_fields(fields: [u8; 16], extension: Option<Vec<u8>>) -> Self {
        FmtChunk {
            audio_format: u16::from_le_bytes(fields[0..2].try_into().unwrap()),
            num_channels: u16::from_le_bytes(fields[2..4].try_into().unwrap()),
            sample_rate: u32::from_le_bytes(fields[4..8].try_into().unwrap()),
            byte_rate: u32::from_le_bytes(fields[8..12].try_into().unwrap()),
            block_align: u16::from_le_bytes(fields[12..14].try_into().unwrap()),
            bits_per_sample: u16::from_le_bytes(fields[14..16].try_into().unwrap()),
            extension,
        }
    }

    /// Decode the chunk body that follows `header`.
    ///
    /// The six scalar fields span 16 bytes. When the header declares a
    /// larger size the body continues with a 2-byte extension length
    /// and that many opaque bytes; PCM files carry no extension. The
    /// length field caps the extension at 64 KiB, so a malformed size
    /// cannot cause an unbounded allocation.
    pub fn read_body<R: Read>(
        header: &ChunkHeader,
        reader: &mut R,
    ) -> Result<Self, ReadError<R::Error>> {
        header.expect_tag(*b"fmt ")?;
        let mut fields = [0u8; 16];
        reader.read_exact(&mut fields)?;

        let extension = if header.size > 16 {
            let mut len_bytes = [0u8; 2];
            reader.read_exact(&mut len_bytes)?;
            let mut bytes = vec![0u8; u16::from_le_bytes(len_bytes) as usize];
            reader.read_exact(&mut bytes)?;
            Some(bytes)
        } else {
            None
        };

        Ok(FmtChunk::from_fields(fields, extension))
    }

    /// The encoded body size, recomputed from the fields: 16 for PCM,
    /// plus the extension length field and bytes when present.
    pub fn size(&self) -> u32 {
        match &self.extension {
            Some(ext) => 16 + 2 + ext.len() as u32,
            None => 16,
        }
    }

    /// Whether two fmt chunks describe the same audio parameters.
    ///
    /// Every scalar field must match and any extension bytes must be
    /// byte-identical.
    pub fn compatible_with(&self, other: &FmtChunk) -> bool {
        self.audio_format == other.audio_format
            && self.num_channels == other.num_channels
            && self.sample_rate == other.sample_rate
            && self.byte_rate == other.byte_rate
            && self.block_align == other.block_align
            && self.bits_per_sample == other.bits_per_sample
            && self.extension == other.extension
    }

    /// Encode the chunk: tag, recomputed size and every field in
    /// declared order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let header = ChunkHeader {
            tag: *b"fmt ",
            size: self.size(),
        };
        let mut bytes = Vec::with_capacity(8 + self.size() as usize);
        bytes.extend_from_slice(&header.to_bytes());
        bytes.extend_from_slice(&self.audio_format.to_le_bytes());
        bytes.extend_from_slice(&self.num_channels.to_le_bytes());
        bytes.extend_from_slice(&self.sample_rate.to_le_bytes());
        bytes.extend_from_slice(&self.byte_rate.to_le_bytes());
        bytes.extend_from_slice(&self.block_align.to_le_bytes());
        bytes.extend_from_slice(&self.bits_per_sample.to_le_bytes());
        if let Some(ext) = &self.extension {
            bytes.extend_from_slice(&(ext.len() as u16).to_le_bytes());
            bytes.extend_from_slice(ext);
        }
        bytes
    }
}
