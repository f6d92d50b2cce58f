use crate::Compression;
use std::fmt::{Display, Formatter, Result as FmtResult};

impl Display for Compression {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl Compression {
    /// Returns the short name (for displaying to user)
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::Gzip => "gzip",
        }
    }

    /// Verify that `bytes` start with the expected magic bytes for this format.
    ///
    /// Useful for cross-checking a format detected from a file name against
    /// actual file contents before committing to a decode.
    #[must_use]
    pub fn check_magic_bytes(&self, bytes: &[u8]) -> bool {
        *self == Self::from_magic_bytes(bytes)
    }
}
