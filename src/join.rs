use crate::error::{Error, JoinError};
use crate::wave::{WaveFile, WaveHeader};
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use embedded_io::{Read, Write};

/// Join wave files into a single wave file written to `sink`.
///
/// `items` is an ordered list of inputs and `open` produces a fresh
/// byte stream over an input each time it is called. Every input's
/// header is decoded and checked against the first input's header
/// before a single byte is written, so an incompatible input never
/// leaves a partially written sink. Inputs are opened one at a time;
/// an input listed more than once is decoded once but its payload is
/// written once per occurrence.
///
/// `handler` is invoked with the total progress percentage, the input
/// currently being processed and the progress within that input: once
/// before any work and at the start and end of every input. Returning
/// `false` stops the join; whatever has been written stays in place
/// and the call returns `Ok(false)`.
pub fn join<I, R, W, O, H>(
    items: &[I],
    mut open: O,
    sink: &mut W,
    mut handler: H,
) -> Result<bool, JoinError<R::Error, W::Error>>
where
    I: Ord,
    R: Read,
    W: Write,
    O: FnMut(&I) -> Result<R, R::Error>,
    H: FnMut(u8, Option<&I>, u8) -> bool,
{
    // Notify that work has begun, returning early if asked to.
    if !handler(0, items.first(), 0) {
        return Ok(false);
    }

    // Joining nothing trivially succeeds.
    if items.is_empty() {
        handler(100, None, 100);
        return Ok(true);
    }

    // Decode and check every header before writing anything. Headers
    // of repeated inputs are reused instead of decoded again.
    let mut headers: BTreeMap<&I, WaveHeader> = BTreeMap::new();
    let mut first: Option<WaveHeader> = None;
    let mut data_size: u32 = 0;
    for item in items {
        if !headers.contains_key(item) {
            let mut reader = open(item).map_err(JoinError::Reader)?;
            let header = WaveHeader::read(&mut reader)?;
            if let Some(first) = &first {
                if !header.compatible_with(first) {
                    return Err(Error::IncompatibleHeaders(
                        Box::new(first.clone()),
                        Box::new(header),
                    )
                    .into());
                }
            } else {
                first = Some(header.clone());
            }
            headers.insert(item, header);
        }
        data_size = data_size
            .checked_add(headers[item].data.size)
            .ok_or(Error::RiffSizeOverflow)?;
    }
    let first = first.unwrap();

    // Build the merged header and write it.
    let merged = first.with_data_size(data_size)?;
    let total = 8 + u64::from(merged.riff.size);
    let header_bytes = merged.to_bytes();
    sink.write_all(&header_bytes).map_err(JoinError::Writer)?;

    let mut written = header_bytes.len() as u64;
    let mut percent = progress_percent(written, total);

    // Stream the payload of each input in order, one open file at a
    // time.
    for item in items {
        if !handler(percent, Some(item), 0) {
            return Ok(false);
        }
        let reader = open(item).map_err(JoinError::Reader)?;
        let file = WaveFile::from_reader(reader)?;
        written += file.payload().pipe_into(sink)?;
        percent = progress_percent(written, total);
        if !handler(percent, Some(item), 100) {
            return Ok(false);
        }
    }
    sink.flush().map_err(JoinError::Writer)?;
    Ok(true)
}

pub(crate) fn progress_percent(written: u64, total: u64) -> u8 {
    (written * 100 / total).min(100) as u8
}

#[cfg(feature = "std")]
mod file_wrapper {
    use std::fs;
    use std::io::{Read as _, Write as _};
    use std::path::Path;

    /// Wrapper for [`std::fs::File`] implementing the `embedded-io`
    /// stream traits for both the input and the output side of a join
    pub struct File(pub fs::File);

    impl File {
        /// Open a file for reading.
        pub fn open(path: impl AsRef<Path>) -> Result<Self, FileError> {
            fs::File::open(path).map(File).map_err(FileError)
        }

        /// Create or truncate a file for writing.
        pub fn create(path: impl AsRef<Path>) -> Result<Self, FileError> {
            fs::File::create(path).map(File).map_err(FileError)
        }
    }

    /// Error type wrapping [`std::io::Error`]
    #[derive(Debug)]
    pub struct FileError(pub std::io::Error);

    impl embedded_io::Error for FileError {
        fn kind(&self) -> embedded_io::ErrorKind {
            embedded_io::ErrorKind::Other
        }
    }

    impl embedded_io::ErrorType for File {
        type Error = FileError;
    }

    impl embedded_io::Read for File {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            self.0.read(buf).map_err(FileError)
        }
    }

    impl embedded_io::Write for File {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            self.0.write(buf).map_err(FileError)
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.0.flush().map_err(FileError)
        }
    }
}

#[cfg(feature = "std")]
pub use file_wrapper::{File, FileError};

/// Join the wave files at `paths` into `sink`.
///
/// Path-based convenience over [`join`]: inputs are opened with
/// [`File::open`] as needed, never more than one at a time.
#[cfg(feature = "std")]
pub fn join_wave_files<P, W, H>(
    paths: &[P],
    sink: &mut W,
    handler: H,
) -> Result<bool, JoinError<FileError, W::Error>>
where
    P: AsRef<std::path::Path> + Ord,
    W: Write,
    H: FnMut(u8, Option<&P>, u8) -> bool,
{
    join(paths, |path| File::open(path.as_ref()), sink, handler)
}

//-----------------------------------
// MARK: Async

/// Async version of the parsing and joining entry points
#[cfg(feature = "async")]
pub mod asynch {
    use crate::chunk::{ChunkHeader, DataChunk, FactChunk, RiffChunk};
    use crate::error::{Error, JoinError, ReadError};
    use crate::fmt::FmtChunk;
    use crate::wave::WaveHeader;
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::vec;
    use core::future::Future;
    use embedded_io_async::{Read, Write};

    /// Decode a wave file header from the start of `reader`, leaving
    /// the stream positioned at the first payload byte.
    pub async fn read_header<R: Read>(reader: &mut R) -> Result<WaveHeader, ReadError<R::Error>> {
        // RIFF descriptor.
        let mut bytes = [0u8; 8];
        reader.read_exact(&mut bytes).await?;
        let header = ChunkHeader::from_bytes(bytes);
        header.expect_tag(*b"RIFF")?;
        let mut format = [0u8; 4];
        reader.read_exact(&mut format).await?;
        if &format != b"WAVE" {
            return Err(Error::NotWaveFormat(format).into());
        }
        let riff = RiffChunk {
            size: header.size,
            format,
        };

        // "fmt " sub-chunk.
        reader.read_exact(&mut bytes).await?;
        let header = ChunkHeader::from_bytes(bytes);
        header.expect_tag(*b"fmt ")?;
        let mut fields = [0u8; 16];
        reader.read_exact(&mut fields).await?;
        let extension = if header.size > 16 {
            let mut len_bytes = [0u8; 2];
            reader.read_exact(&mut len_bytes).await?;
            let mut ext = vec![0u8; u16::from_le_bytes(len_bytes) as usize];
            reader.read_exact(&mut ext).await?;
            Some(ext)
        } else {
            None
        };
        let fmt = FmtChunk::from_fields(fields, extension);

        // Optional "fact" sub-chunk, then the data sub-chunk header.
        reader.read_exact(&mut bytes).await?;
        let mut next = ChunkHeader::from_bytes(bytes);
        let fact = if &next.tag == b"fact" {
            let sample_length = if next.size >= 4 {
                let mut length = [0u8; 4];
                reader.read_exact(&mut length).await?;
                Some(u32::from_le_bytes(length))
            } else {
                None
            };
            reader.read_exact(&mut bytes).await?;
            next = ChunkHeader::from_bytes(bytes);
            Some(FactChunk { sample_length })
        } else {
            None
        };
        let data = DataChunk::from_header(&next)?;

        Ok(WaveHeader {
            riff,
            fmt,
            fact,
            data,
        })
    }

    /// Join wave files into a single wave file written to `sink`.
    ///
    /// Async version of [`crate::join`] with identical semantics; the
    /// opener returns a future producing a fresh byte stream over an
    /// input.
    pub async fn join<I, R, W, O, F, H>(
        items: &[I],
        mut open: O,
        sink: &mut W,
        mut handler: H,
    ) -> Result<bool, JoinError<R::Error, W::Error>>
    where
        I: Ord,
        R: Read,
        W: Write,
        O: FnMut(&I) -> F,
        F: Future<Output = Result<R, R::Error>>,
        H: FnMut(u8, Option<&I>, u8) -> bool,
    {
        if !handler(0, items.first(), 0) {
            return Ok(false);
        }
        if items.is_empty() {
            handler(100, None, 100);
            return Ok(true);
        }

        let mut headers: BTreeMap<&I, WaveHeader> = BTreeMap::new();
        let mut first: Option<WaveHeader> = None;
        let mut data_size: u32 = 0;
        for item in items {
            if !headers.contains_key(item) {
                let mut reader = open(item).await.map_err(JoinError::Reader)?;
                let header = read_header(&mut reader).await?;
                if let Some(first) = &first {
                    if !header.compatible_with(first) {
                        return Err(Error::IncompatibleHeaders(
                            Box::new(first.clone()),
                            Box::new(header),
                        )
                        .into());
                    }
                } else {
                    first = Some(header.clone());
                }
                headers.insert(item, header);
            }
            data_size = data_size
                .checked_add(headers[item].data.size)
                .ok_or(Error::RiffSizeOverflow)?;
        }
        let first = first.unwrap();

        let merged = first.with_data_size(data_size)?;
        let total = 8 + u64::from(merged.riff.size);
        let header_bytes = merged.to_bytes();
        sink.write_all(&header_bytes)
            .await
            .map_err(JoinError::Writer)?;

        let mut written = header_bytes.len() as u64;
        let mut percent = super::progress_percent(written, total);

        for item in items {
            if !handler(percent, Some(item), 0) {
                return Ok(false);
            }
            let mut reader = open(item).await.map_err(JoinError::Reader)?;
            read_header(&mut reader).await?;
            let mut buffer = [0u8; 512];
            loop {
                let n = reader.read(&mut buffer).await.map_err(JoinError::Reader)?;
                if n == 0 {
                    break;
                }
                sink.write_all(&buffer[..n])
                    .await
                    .map_err(JoinError::Writer)?;
                written += n as u64;
            }
            percent = super::progress_percent(written, total);
            if !handler(percent, Some(item), 100) {
                return Ok(false);
            }
        }
        sink.flush().await.map_err(JoinError::Writer)?;
        Ok(true)
    }

    #[cfg(feature = "std")]
    mod tokio_file {
        use crate::join::FileError;
        use std::path::Path;
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        /// Wrapper for [`tokio::fs::File`] implementing the
        /// `embedded-io-async` stream traits
        pub struct TokioFile(pub tokio::fs::File);

        impl TokioFile {
            /// Open a file for reading.
            pub async fn open(path: impl AsRef<Path>) -> Result<Self, FileError> {
                tokio::fs::File::open(path)
                    .await
                    .map(TokioFile)
                    .map_err(FileError)
            }

            /// Create or truncate a file for writing.
            pub async fn create(path: impl AsRef<Path>) -> Result<Self, FileError> {
                tokio::fs::File::create(path)
                    .await
                    .map(TokioFile)
                    .map_err(FileError)
            }
        }

        impl embedded_io_async::ErrorType for TokioFile {
            type Error = FileError;
        }

        impl embedded_io_async::Read for TokioFile {
            async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
                self.0.read(buf).await.map_err(FileError)
            }
        }

        impl embedded_io_async::Write for TokioFile {
            async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
                self.0.write(buf).await.map_err(FileError)
            }

            async fn flush(&mut self) -> Result<(), Self::Error> {
                self.0.flush().await.map_err(FileError)
            }
        }
    }

    #[cfg(feature = "std")]
    pub use tokio_file::TokioFile;

    /// Join the wave files at `paths` into `sink`.
    ///
    /// Path-based convenience over [`join`]: inputs are opened with
    /// [`TokioFile::open`] as needed, never more than one at a time.
    #[cfg(feature = "std")]
    pub async fn join_wave_files<P, W, H>(
        paths: &[P],
        sink: &mut W,
        handler: H,
    ) -> Result<bool, JoinError<crate::join::FileError, W::Error>>
    where
        P: AsRef<std::path::Path> + Ord,
        W: Write,
        H: FnMut(u8, Option<&P>, u8) -> bool,
    {
        join(
            paths,
            |path| {
                let path = path.as_ref().to_path_buf();
                async move { TokioFile::open(path).await }
            },
            sink,
            handler,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{DataChunk, FactChunk, RiffChunk};
    use crate::fmt::FmtChunk;
    use alloc::vec;
    use alloc::vec::Vec;

    fn pcm_header(
        sample_rate: u32,
        num_channels: u16,
        bits_per_sample: u16,
        data_size: u32,
    ) -> WaveHeader {
        WaveHeader {
            riff: RiffChunk {
                size: 36 + data_size,
                format: *b"WAVE",
            },
            fmt: FmtChunk {
                audio_format: 1,
                num_channels,
                sample_rate,
                byte_rate: sample_rate * num_channels as u32 * bits_per_sample as u32 / 8,
                block_align: num_channels * bits_per_sample / 8,
                bits_per_sample,
                extension: None,
            },
            fact: None,
            data: DataChunk { size: data_size },
        }
    }

    fn wav_bytes(header: &WaveHeader, payload: &[u8]) -> Vec<u8> {
        let mut bytes = header.to_bytes();
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn join_empty_list() {
        const NO_FILES: &[usize] = &[];
        const EMPTY: &[u8] = &[];
        let mut sink: Vec<u8> = Vec::new();
        let mut calls: Vec<(u8, Option<usize>, u8)> = Vec::new();

        let done = join(
            NO_FILES,
            |_| Ok(EMPTY),
            &mut sink,
            |total, item: Option<&usize>, file| {
                calls.push((total, item.copied(), file));
                true
            },
        )
        .unwrap();

        assert!(done);
        assert!(sink.is_empty());
        assert_eq!(calls, vec![(0, None, 0), (100, None, 100)]);
    }

    #[test]
    fn join_single_file_reproduces_input() {
        let payload: Vec<u8> = (0..100).collect();
        let files = [wav_bytes(&pcm_header(22_050, 1, 8, 100), &payload)];
        let mut sink: Vec<u8> = Vec::new();

        let done = join(&[0usize], |&i| Ok(&files[i][..]), &mut sink, |_, _, _| true).unwrap();

        assert!(done);
        assert_eq!(sink, files[0]);
    }

    #[test]
    fn join_two_files_concatenates_payloads() {
        let first = pcm_header(22_050, 1, 8, 100);
        let files = [
            wav_bytes(&first, &[0x11; 100]),
            wav_bytes(&pcm_header(22_050, 1, 8, 200), &[0x22; 200]),
        ];
        let mut sink: Vec<u8> = Vec::new();
        let mut percents: Vec<u8> = Vec::new();

        let done = join(
            &[0usize, 1],
            |&i| Ok(&files[i][..]),
            &mut sink,
            |total, _, _| {
                percents.push(total);
                true
            },
        )
        .unwrap();
        assert!(done);

        let header = WaveHeader::read(&mut &sink[..]).unwrap();
        assert_eq!(header.data.size, 300);
        assert_eq!(header.riff.size, 4 + (8 + 16) + (8 + 300));
        assert_eq!(&sink[44..144], &[0x11; 100][..]);
        assert_eq!(&sink[144..344], &[0x22; 200][..]);
        assert_eq!(sink.len(), 344);

        // total progress never decreases and ends at 100
        assert!(percents.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(percents.last(), Some(&100));
    }

    #[test]
    fn join_carries_the_fact_chunk_forward() {
        let mut first = pcm_header(8_000, 1, 8, 10);
        first.fmt.audio_format = 6;
        first.fmt.extension = Some(vec![]);
        first.fact = Some(FactChunk {
            sample_length: Some(10),
        });
        first.riff.size = 4 + (8 + 18) + (8 + 4) + (8 + 10);
        let mut second = first.clone();
        second.data.size = 20;
        second.riff.size = 4 + (8 + 18) + (8 + 4) + (8 + 20);
        let files = [
            wav_bytes(&first, &[0x11; 10]),
            wav_bytes(&second, &[0x22; 20]),
        ];
        let mut sink: Vec<u8> = Vec::new();

        let done = join(&[0usize, 1], |&i| Ok(&files[i][..]), &mut sink, |_, _, _| true).unwrap();
        assert!(done);

        let header = WaveHeader::read(&mut &sink[..]).unwrap();
        assert_eq!(header.data.size, 30);
        // 4 + (8 + 18) + (8 + 4) + (8 + 30), divided by one channel
        assert_eq!(header.riff.size, 80);
        assert_eq!(
            header.fact,
            Some(FactChunk {
                sample_length: Some(80)
            })
        );
    }

    #[test]
    fn incompatible_file_fails_before_any_output() {
        let first = pcm_header(22_050, 1, 8, 100);
        let other = pcm_header(44_100, 1, 8, 100);
        let files = [
            wav_bytes(&first, &[0x11; 100]),
            wav_bytes(&other, &[0x22; 100]),
        ];
        let mut sink: Vec<u8> = Vec::new();

        let result = join(&[0usize, 1], |&i| Ok(&files[i][..]), &mut sink, |_, _, _| true);

        assert_eq!(
            result,
            Err(JoinError::Parser(Error::IncompatibleHeaders(
                Box::new(first),
                Box::new(other),
            )))
        );
        assert!(sink.is_empty());
    }

    #[test]
    fn repeated_inputs_are_decoded_once_and_written_twice() {
        let payload: Vec<u8> = (0..100).collect();
        let files = [wav_bytes(&pcm_header(22_050, 1, 8, 100), &payload)];
        let mut sink: Vec<u8> = Vec::new();
        let mut opens = 0;

        let done = join(
            &[0usize, 0],
            |&i| {
                opens += 1;
                Ok(&files[i][..])
            },
            &mut sink,
            |_, _, _| true,
        )
        .unwrap();
        assert!(done);

        // one open to decode the header, one per occurrence to stream
        assert_eq!(opens, 3);

        let header = WaveHeader::read(&mut &sink[..]).unwrap();
        assert_eq!(header.data.size, 200);
        assert_eq!(&sink[44..144], &payload[..]);
        assert_eq!(&sink[144..244], &payload[..]);
    }

    #[test]
    fn stopping_on_the_first_call_writes_nothing() {
        let files = [wav_bytes(&pcm_header(22_050, 1, 8, 4), &[1, 2, 3, 4])];
        let mut sink: Vec<u8> = Vec::new();

        let done = join(&[0usize], |&i| Ok(&files[i][..]), &mut sink, |_, _, _| false).unwrap();

        assert!(!done);
        assert!(sink.is_empty());
    }

    #[test]
    fn stopping_before_the_first_payload_leaves_only_the_header() {
        let first = pcm_header(22_050, 1, 8, 100);
        let files = [
            wav_bytes(&first, &[0x11; 100]),
            wav_bytes(&pcm_header(22_050, 1, 8, 200), &[0x22; 200]),
        ];
        let mut sink: Vec<u8> = Vec::new();
        let mut calls = 0;

        let done = join(
            &[0usize, 1],
            |&i| Ok(&files[i][..]),
            &mut sink,
            |_, _, _| {
                calls += 1;
                calls < 2
            },
        )
        .unwrap();

        assert!(!done);
        assert_eq!(sink, first.with_data_size(300).unwrap().to_bytes());
    }

    #[test]
    fn progress_is_reported_per_file() {
        let files = [
            wav_bytes(&pcm_header(22_050, 1, 8, 100), &[0x11; 100]),
            wav_bytes(&pcm_header(22_050, 1, 8, 200), &[0x22; 200]),
        ];
        let mut sink: Vec<u8> = Vec::new();
        let mut calls: Vec<(u8, Option<usize>, u8)> = Vec::new();

        join(
            &[0usize, 1],
            |&i| Ok(&files[i][..]),
            &mut sink,
            |total, item: Option<&usize>, file| {
                calls.push((total, item.copied(), file));
                true
            },
        )
        .unwrap();

        // header is 44 of 344 total bytes: 12%; 144 of 344 after the
        // first payload: 41%
        assert_eq!(
            calls,
            vec![
                (0, Some(0), 0),
                (12, Some(0), 0),
                (41, Some(0), 100),
                (41, Some(1), 0),
                (100, Some(1), 100),
            ]
        );
    }

    #[cfg(feature = "std")]
    mod std_tests {
        use super::*;
        use crate::join::{File, join_wave_files};

        const FILE_A: &str = "./test_files/mono_8_22050_a.wav";
        const FILE_B: &str = "./test_files/mono_8_22050_b.wav";
        const FILE_STEREO: &str = "./test_files/stereo_16_44100.wav";

        #[test]
        fn join_files_from_disk() {
            let mut sink: Vec<u8> = Vec::new();

            let done = join_wave_files(&[FILE_A, FILE_B], &mut sink, |_, _, _| true).unwrap();
            assert!(done);

            let header = WaveHeader::read(&mut &sink[..]).unwrap();
            assert_eq!(header.fmt.sample_rate, 22_050);
            assert_eq!(header.data.size, 300);

            let a = std::fs::read(FILE_A).unwrap();
            let b = std::fs::read(FILE_B).unwrap();
            assert_eq!(&sink[44..144], &a[44..]);
            assert_eq!(&sink[144..344], &b[44..]);
        }

        #[test]
        fn join_single_file_from_disk_reproduces_it() {
            let mut sink: Vec<u8> = Vec::new();

            let done = join_wave_files(&[FILE_A], &mut sink, |_, _, _| true).unwrap();

            assert!(done);
            assert_eq!(sink, std::fs::read(FILE_A).unwrap());
        }

        #[test]
        fn incompatible_files_on_disk_are_rejected() {
            let mut sink: Vec<u8> = Vec::new();

            let result = join_wave_files(&[FILE_A, FILE_STEREO], &mut sink, |_, _, _| true);

            assert!(matches!(
                result,
                Err(JoinError::Parser(Error::IncompatibleHeaders(_, _)))
            ));
            assert!(sink.is_empty());
        }

        #[test]
        fn join_into_a_file_sink() {
            let out_path = std::env::temp_dir().join("wavcat_join_files.wav");
            let mut out = File::create(&out_path).unwrap();

            let done = join_wave_files(&[FILE_A, FILE_B], &mut out, |_, _, _| true).unwrap();
            assert!(done);
            drop(out);

            let mut expected: Vec<u8> = Vec::new();
            join_wave_files(&[FILE_A, FILE_B], &mut expected, |_, _, _| true).unwrap();
            assert_eq!(std::fs::read(&out_path).unwrap(), expected);
            std::fs::remove_file(&out_path).unwrap();
        }
    }

    #[cfg(feature = "std")]
    mod async_tests {
        use super::*;
        use crate::join::asynch;

        #[tokio::test]
        async fn async_header_decode_matches_sync() {
            let header = pcm_header(22_050, 2, 16, 2048);
            let bytes = wav_bytes(&header, &[]);

            let decoded = asynch::read_header(&mut &bytes[..]).await.unwrap();

            assert_eq!(decoded, header);
        }

        #[tokio::test]
        async fn async_header_decode_with_fact_chunk() {
            let mut header = pcm_header(8_000, 1, 8, 16);
            header.fmt.audio_format = 6;
            header.fmt.extension = Some(vec![]);
            header.fact = Some(FactChunk {
                sample_length: Some(16),
            });
            header.riff.size = 4 + (8 + 18) + (8 + 4) + (8 + 16);
            let bytes = wav_bytes(&header, &[]);

            let decoded = asynch::read_header(&mut &bytes[..]).await.unwrap();

            assert_eq!(decoded, header);
        }

        #[tokio::test]
        async fn async_join_matches_sync_join() {
            let files = [
                wav_bytes(&pcm_header(22_050, 1, 8, 100), &[0x11; 100]),
                wav_bytes(&pcm_header(22_050, 1, 8, 200), &[0x22; 200]),
            ];
            let items = [0usize, 1];

            let mut sync_sink: Vec<u8> = Vec::new();
            join(&items, |&i| Ok(&files[i][..]), &mut sync_sink, |_, _, _| true).unwrap();

            let mut sink: Vec<u8> = Vec::new();
            let done = asynch::join(
                &items,
                |&i| {
                    let bytes: &[u8] = &files[i];
                    async move { Ok(bytes) }
                },
                &mut sink,
                |_, _, _| true,
            )
            .await
            .unwrap();

            assert!(done);
            assert_eq!(sink, sync_sink);
        }

        #[tokio::test]
        async fn async_join_stops_when_asked() {
            let files = [wav_bytes(&pcm_header(22_050, 1, 8, 4), &[1, 2, 3, 4])];
            let mut sink: Vec<u8> = Vec::new();

            let done = asynch::join(
                &[0usize],
                |&i| {
                    let bytes: &[u8] = &files[i];
                    async move { Ok(bytes) }
                },
                &mut sink,
                |_, _, _| false,
            )
            .await
            .unwrap();

            assert!(!done);
            assert!(sink.is_empty());
        }

        #[tokio::test]
        async fn async_join_files_from_disk_matches_sync() {
            let paths = ["./test_files/mono_8_22050_a.wav", "./test_files/mono_8_22050_b.wav"];

            let mut sync_sink: Vec<u8> = Vec::new();
            join_wave_files(&paths, &mut sync_sink, |_, _, _| true).unwrap();

            let mut sink: Vec<u8> = Vec::new();
            let done = asynch::join_wave_files(&paths, &mut sink, |_, _, _| true)
                .await
                .unwrap();

            assert!(done);
            assert_eq!(sink, sync_sink);
        }
    }
}
