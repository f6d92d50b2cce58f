//! Compression Operations

use crate::Compression;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use flate2::{Compression as GzCompression, read::MultiGzDecoder, write::GzEncoder};
use std::io::{Read, Write};
use tracing::instrument;

// Packages are written once by the authoring tool and read many times, so
// anything this crate produces (test fixtures, re-packed resources) uses the
// best ratio available.
const GZIP_LEVEL: GzCompression = GzCompression::best();

impl Compression {
    /// Compress a byte slice in memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use slpk_compress::Compression;
    ///
    /// let data = b"{\"id\":\"root\"}";
    /// let compressed = Compression::Gzip.compress(data).unwrap();
    /// assert!(Compression::Gzip.check_magic_bytes(&compressed));
    /// ```
    pub fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.compress_into(input, &mut output)?;
        Ok(output)
    }

    /// Decompress a byte slice in memory.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slpk_compress::Compression;
    ///
    /// let original = b"{\"id\":\"root\"}";
    /// let compressed = Compression::Gzip.compress(original).unwrap();
    /// assert_ne!(compressed, original);
    /// let decompressed = Compression::Gzip.decompress(&compressed).unwrap();
    /// assert_eq!(decompressed, original);
    /// ```
    pub fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.decompress_into(input, &mut output)?;
        Ok(output)
    }

    #[instrument(skip(input, output), fields(
        format = %self,
        input_size = input.len(),
        output_size
    ))]
    pub fn compress_into(&self, input: &[u8], output: &mut Vec<u8>) -> Result<usize> {
        let size = match self {
            Compression::None => {
                output.extend_from_slice(input);
                input.len()
            },
            Compression::Gzip => {
                let mut encoder = GzEncoder::new(&mut *output, GZIP_LEVEL);
                encoder.write_all(input).or_raise(|| ErrorKind::Io)?;
                encoder.finish().or_raise(|| ErrorKind::Io)?;
                output.len()
            },
        };
        tracing::Span::current().record("output_size", size);
        Ok(size)
    }

    #[instrument(skip(input, output), fields(
        format = %self,
        input_size = input.len(),
        output_size
    ))]
    pub fn decompress_into(&self, input: &[u8], output: &mut Vec<u8>) -> Result<usize> {
        let size = match self {
            Compression::None => {
                output.extend_from_slice(input);
                input.len()
            },
            Compression::Gzip => {
                let mut decoder = MultiGzDecoder::new(input);
                decoder.read_to_end(output).or_raise(|| ErrorKind::InvalidData)?
            },
        };
        tracing::Span::current().record("output_size", size);
        Ok(size)
    }

    /// Wrap a reader with the appropriate decompression layer.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::{Cursor, Read};
    /// use slpk_compress::Compression;
    ///
    /// let original = b"Hello, world!";
    /// let compressed = Compression::Gzip.compress(original).unwrap();
    /// let mut reader = Compression::Gzip.wrap_reader(Cursor::new(compressed));
    /// let mut decompressed = Vec::new();
    /// reader.read_to_end(&mut decompressed).unwrap();
    /// assert_eq!(decompressed, original);
    /// ```
    pub fn wrap_reader<'a, R: Read + 'a>(&self, reader: R) -> Box<dyn Read + 'a> {
        match self {
            Compression::None => Box::new(reader),
            Compression::Gzip => Box::new(MultiGzDecoder::new(reader)),
        }
    }

    /// Decompress from a reader to a writer, returning bytes written.
    ///
    /// Streams without buffering the entire input in memory. Corrupt input
    /// surfaces as [`InvalidData`](ErrorKind::InvalidData), failure to write
    /// the decompressed bytes as [`Io`](ErrorKind::Io).
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use slpk_compress::Compression;
    ///
    /// let original = b"Hello, world!";
    /// let compressed = Compression::Gzip.compress(original).unwrap();
    ///
    /// let mut output = Vec::new();
    /// let bytes = Compression::Gzip.decompress_stream(Cursor::new(compressed), &mut output).unwrap();
    /// assert_eq!(output, original);
    /// assert_eq!(bytes, original.len() as u64);
    /// ```
    pub fn decompress_stream<'a, R: Read + 'a, W: Write>(&self, reader: R, mut writer: W) -> Result<u64> {
        let mut reader = self.wrap_reader(reader);
        // `io::copy` can't tell us which side failed, so read and write
        // separately to keep corrupt input apart from a full disk.
        let mut buffer = [0u8; 64 * 1024];
        let mut total = 0u64;
        loop {
            let read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e).or_raise(|| ErrorKind::InvalidData),
            };
            writer.write_all(&buffer[..read]).or_raise(|| ErrorKind::Io)?;
            total += read as u64;
        }
        writer.flush().or_raise(|| ErrorKind::Io)?;
        Ok(total)
    }
}
