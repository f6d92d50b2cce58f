//! Compression detection and decompression for scene layer packages.
//!
//! Scene layer packages store every node resource (JSON documents, geometry
//! buffers, attribute blobs) as an individually gzipped file. This crate wraps
//! [`flate2`] behind a small [`Compression`] enum, providing:
//!
//! - **Format detection** from file names ([`Compression::from_path`]) or
//!   magic bytes ([`Compression::from_magic_bytes`])
//! - **In-memory** compression/decompression ([`Compression::compress`],
//!   [`Compression::decompress`])
//! - **Streaming** decompression straight from one file into another
//!   ([`Compression::decompress_stream`]) so large geometry buffers are never
//!   held in memory as a whole.
//!
//! Gzip streams made of several concatenated members are decoded in full.

mod construct;
pub mod error;
mod ops;
mod util;

/// A supported compression format. Defaults to [`None`](Self::None)
/// (uncompressed).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Compression {
    /// Uncompressed
    #[default]
    None,
    /// Gzip compression (.gz)
    Gzip,
}

#[cfg(test)]
mod tests {
    use crate::Compression;

    #[test]
    fn compression_default() {
        assert_eq!(Compression::default(), Compression::None);
    }
}
