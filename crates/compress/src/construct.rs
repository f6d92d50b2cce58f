use crate::Compression;
use std::path::Path;

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

impl Compression {
    /// Detect compression from a file extension.
    ///
    /// The extension must match exactly: `0.bin.GZ` is not a gzip file.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("gz") => Compression::Gzip,
            _ => Compression::None,
        }
    }

    /// Detect compression format from magic bytes.
    ///
    /// Returns `None` variant if no magic bytes match or if the input
    /// is too short to detect any format.
    #[must_use]
    pub fn from_magic_bytes(bytes: &[u8]) -> Self {
        if bytes.starts_with(&GZIP_MAGIC) {
            return Compression::Gzip;
        }
        Compression::None
    }
}
