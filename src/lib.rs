//! Basic `no_std` library for parsing, validating and joining WAV files.
//!
//! Headers are decoded chunk by chunk and audio payloads are streamed
//! through fixed-size buffers, so arbitrarily large files can be joined
//! without loading them into memory. Sample data is never decoded; any
//! format the header describes is passed through byte for byte.
//!
//! Reading a WAV file header:
//! ```
//! use wavcat::WaveHeader;
//!
//! let file: [u8; 48] = [
//!     0x52, 0x49, 0x46, 0x46, // RIFF
//!     0x28, 0x00, 0x00, 0x00, // chunk size
//!     0x57, 0x41, 0x56, 0x45, // WAVE
//!     0x66, 0x6d, 0x74, 0x20, // fmt_
//!     0x10, 0x00, 0x00, 0x00, // chunk size
//!     0x01, 0x00, // audio format
//!     0x01, 0x00, // num channels
//!     0x22, 0x56, 0x00, 0x00, // sample rate
//!     0x22, 0x56, 0x00, 0x00, // byte rate
//!     0x01, 0x00, // block align
//!     0x08, 0x00, // bits per sample
//!     0x64, 0x61, 0x74, 0x61, // data
//!     0x04, 0x00, 0x00, 0x00, // chunk size
//!     0x01, 0x02, 0x03, 0x04, // payload
//! ];
//!
//! let header = WaveHeader::read(&mut &file[..]).unwrap();
//!
//! assert_eq!(header.fmt.num_channels, 1);
//! assert_eq!(header.fmt.bits_per_sample, 8);
//! assert_eq!(header.fmt.sample_rate, 22_050);
//! assert_eq!(header.data.size, 4);
//! assert!(header.is_pcm());
//! ```
//!
//! Joining streams in memory; works with any `embedded_io` reader and
//! writer:
//! ```
//! # let file: [u8; 48] = [
//! #     0x52, 0x49, 0x46, 0x46, 0x28, 0x00, 0x00, 0x00, 0x57, 0x41, 0x56, 0x45,
//! #     0x66, 0x6d, 0x74, 0x20, 0x10, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00,
//! #     0x22, 0x56, 0x00, 0x00, 0x22, 0x56, 0x00, 0x00, 0x01, 0x00, 0x08, 0x00,
//! #     0x64, 0x61, 0x74, 0x61, 0x04, 0x00, 0x00, 0x00, 0x01, 0x02, 0x03, 0x04,
//! # ];
//! use wavcat::{join, WaveHeader};
//!
//! let mut joined: Vec<u8> = Vec::new();
//! let done = join(
//!     &[0usize, 1],
//!     |_| Ok(&file[..]),
//!     &mut joined,
//!     |total, _, _| {
//!         assert!(total <= 100);
//!         true
//!     },
//! )
//! .unwrap();
//!
//! assert!(done);
//! let header = WaveHeader::read(&mut &joined[..]).unwrap();
//! assert_eq!(header.data.size, 8);
//! ```
//!
//! Joining files on disk (requires the `std` feature, on by default):
//! ```
//! # #[cfg(feature = "std")] {
//! use wavcat::join_wave_files;
//!
//! let mut out: Vec<u8> = Vec::new();
//! let done = join_wave_files(
//!     &[
//!         "./test_files/mono_8_22050_a.wav",
//!         "./test_files/mono_8_22050_b.wav",
//!     ],
//!     &mut out,
//!     |total, file, _| {
//!         println!("{total}% {file:?}");
//!         true
//!     },
//! )
//! .unwrap();
//! assert!(done);
//! # }
//! ```
//!
//! The same join driven asynchronously:
//! ```
//! # #[cfg(feature = "std")]
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut out: Vec<u8> = Vec::new();
//! let done = wavcat::asynch::join_wave_files(
//!     &[
//!         "./test_files/mono_8_22050_a.wav",
//!         "./test_files/mono_8_22050_b.wav",
//!     ],
//!     &mut out,
//!     |_, _, _| true,
//! )
//! .await
//! .unwrap();
//! assert!(done);
//! # }
//! # #[cfg(not(feature = "std"))]
//! # fn main() {}
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]

extern crate alloc;

mod chunk;
mod error;
mod fmt;
mod join;
mod wave;

pub use chunk::{ChunkHeader, DataChunk, FactChunk, RiffChunk};
pub use error::{Error, JoinError, ReadError};
pub use fmt::FmtChunk;
pub use join::join;
pub use wave::{Payload, WaveFile, WaveHeader};

#[cfg(feature = "std")]
pub use join::{File, FileError, join_wave_files};

#[cfg(feature = "async")]
pub use join::asynch;
