mod cli;
mod exit;

use crate::cli::Args;
use crate::exit::Failure;
use clap::Parser;
use slpk_archive::Package;
use slpk_config::Config;
use slpk_convert::{Report, convert};
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter())))
        .with(fmt::layer().with_target(false))
        .init();

    match run(&args) {
        Ok(report) => {
            if let Some(layout) = &report.served_layout {
                println!("{}", layout.display());
            }
            ExitCode::SUCCESS
        },
        Err(failure) => {
            eprintln!("{failure:?}");
            ExitCode::from(failure.exit_code())
        },
    }
}

fn run(args: &Args) -> Result<Report, Failure> {
    let config = args.apply(Config::load(args.config.as_deref()).map_err(Failure::Config)?);
    let package = Package::open(&args.input).map_err(Failure::Package)?;
    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build().map_err(Failure::Runtime)?;
    runtime.block_on(convert(&package, &cli::context(&config))).map_err(Failure::Convert)
}
