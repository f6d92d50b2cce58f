//! Command-Line Arguments

use clap::{ArgAction, Parser};
use slpk_config::Config;
use slpk_convert::{Context, Strategy};
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Unpack an I3S scene layer package into a served SceneServer layout.
///
/// `<dir>/<name>.slpk` is extracted to `<dir>/<name>`, its node files are
/// decompressed in place, and the result is moved to
/// `<dir>/<name>_converted/SceneServer/layers/0`.
#[derive(Debug, Parser)]
#[command(name = "slpk", version)]
pub struct Args {
    /// Scene layer package to convert
    #[arg(short, long, visible_alias = "ifile", value_name = "SLPK")]
    pub input: PathBuf,
    /// Transform up to N node files at once [default: one at a time]
    #[arg(short = 'j', long, value_name = "N")]
    pub concurrency: Option<NonZeroUsize>,
    /// Stop at the first node file that fails to transform
    #[arg(long)]
    pub fail_fast: bool,
    /// Continue with an existing working directory instead of extracting
    #[arg(long)]
    pub reuse_extraction: bool,
    /// Configuration file [default: platform config directory]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Flags given on the command line take precedence over `config`.
    pub fn apply(&self, mut config: Config) -> Config {
        if self.concurrency.is_some() {
            config.concurrency = self.concurrency;
        }
        config.fail_fast |= self.fail_fast;
        config.reuse_extraction |= self.reuse_extraction;
        config
    }

    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn,slpk=info",
            1 => "warn,slpk=debug",
            _ => "warn,slpk=trace",
        }
    }
}

pub fn context(config: &Config) -> Context {
    Context {
        strategy: Strategy::from(config.concurrency),
        fail_fast: config.fail_fast,
        reuse_extraction: config.reuse_extraction,
    }
}
