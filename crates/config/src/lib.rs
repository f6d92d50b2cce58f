//! Configuration loading for slpk.
//!
//! Settings are layered with [`figment`], lowest precedence first:
//!
//! 1. built-in defaults,
//! 2. a TOML file (an explicit path, or `config.toml` in the platform config
//!    directory when it exists),
//! 3. `SLPK_`-prefixed environment variables (`SLPK_CONCURRENCY=8`).
//!
//! Command-line flags are applied on top by the binary.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Prefix of environment variables read by [`Config::load`].
pub const ENV_PREFIX: &str = "SLPK_";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Number of node files transformed at once. Absent means one at a time,
    /// interleaved with the directory walk. Zero is rejected.
    pub concurrency: Option<NonZeroUsize>,
    /// Abort the run on the first failed node file instead of collecting
    /// every failure.
    pub fail_fast: bool,
    /// Use an already existing working directory as-is instead of refusing to
    /// extract over it.
    pub reuse_extraction: bool,
}

impl Config {
    /// Load configuration from defaults, the config file and the environment.
    ///
    /// An explicitly requested `file` must exist; the platform default file
    /// is only read when present.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let file = match file {
            Some(path) if !path.is_file() => exn::bail!(ErrorKind::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|path| path.is_file()),
        };
        if let Some(path) = &file {
            tracing::debug!(path = %path.display(), "Loading configuration file");
        }
        Self::figment(file.as_deref()).extract().or_raise(|| ErrorKind::Invalid)
    }

    /// The layered providers, exposed so callers can merge further sources.
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = file {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// `config.toml` inside the platform configuration directory
    /// (`~/.config/slpk/config.toml` on Linux).
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "slpk").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}
