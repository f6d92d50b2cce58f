//! Process Exit Codes

use slpk_archive::error::Error as PackageError;
use slpk_config::error::Error as ConfigError;
use slpk_convert::error::Error as ConvertError;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::io::Error as IoError;

/// Any failure that is not a usage error.
pub const EXIT_FAILURE: u8 = 1;
/// Invalid input: a missing or misnamed package, or bad configuration.
pub const EXIT_USAGE: u8 = 2;

/// Why a run ended without a served layout.
pub enum Failure {
    Config(ConfigError),
    Package(PackageError),
    Runtime(IoError),
    Convert(ConvertError),
}

impl Failure {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => EXIT_USAGE,
            Self::Package(err) if err.is_usage() => EXIT_USAGE,
            Self::Package(_) | Self::Runtime(_) | Self::Convert(_) => EXIT_FAILURE,
        }
    }
}

/// Prints the full error tree of the underlying error.
impl Debug for Failure {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Config(err) => write!(f, "{err:?}"),
            Self::Package(err) => write!(f, "{err:?}"),
            Self::Runtime(err) => write!(f, "could not start runtime: {err}"),
            Self::Convert(err) => write!(f, "{err:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exn::Exn;
    use rstest::rstest;
    use slpk_archive::Package;
    use slpk_archive::error::ErrorKind as PackageErrorKind;
    use slpk_config::Config;
    use slpk_config::error::ErrorKind as ConfigErrorKind;
    use slpk_convert::error::ErrorKind as ConvertErrorKind;
    use std::path::PathBuf;

    #[rstest]
    #[case(Failure::Config(Exn::from(ConfigErrorKind::NotFound(PathBuf::from("missing.toml")))), EXIT_USAGE)]
    #[case(Failure::Config(Exn::from(ConfigErrorKind::Invalid)), EXIT_USAGE)]
    #[case(Failure::Package(Exn::from(PackageErrorKind::NotFound(PathBuf::from("Scene.slpk")))), EXIT_USAGE)]
    #[case(Failure::Package(Exn::from(PackageErrorKind::NotAPackage(PathBuf::from("Scene.zip")))), EXIT_USAGE)]
    #[case(Failure::Package(Exn::from(PackageErrorKind::InvalidArchive)), EXIT_FAILURE)]
    #[case(Failure::Runtime(IoError::other("no worker threads")), EXIT_FAILURE)]
    #[case(Failure::Convert(Exn::from(ConvertErrorKind::OutputExists(PathBuf::from("Scene_converted")))), EXIT_FAILURE)]
    #[case(Failure::Convert(Exn::from(ConvertErrorKind::Failures(2))), EXIT_FAILURE)]
    fn test_exit_code(#[case] failure: Failure, #[case] expected: u8) {
        assert_eq!(failure.exit_code(), expected);
    }

    #[test]
    fn test_startup_errors_are_usage_errors() {
        let temp_dir = tempfile::tempdir().unwrap();
        let zip = temp_dir.path().join("Scene.zip");
        std::fs::write(&zip, b"PK").unwrap();

        let misnamed = Package::open(&zip).map_err(Failure::Package).unwrap_err();
        assert_eq!(misnamed.exit_code(), EXIT_USAGE);
        let missing = Package::open(temp_dir.path().join("Scene.slpk")).map_err(Failure::Package).unwrap_err();
        assert_eq!(missing.exit_code(), EXIT_USAGE);
        let missing_config = temp_dir.path().join("missing.toml");
        let config = Config::load(Some(missing_config.as_path())).map_err(Failure::Config).unwrap_err();
        assert_eq!(config.exit_code(), EXIT_USAGE);
    }
}
