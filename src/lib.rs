pub mod analyze;
pub mod chart;
pub mod cli;
pub mod columns;
pub mod config;
pub mod data;
pub mod error;
pub mod explore;
pub mod filter;
pub mod frame;
pub mod frequency;
pub mod io_utils;
pub mod loader;
pub mod prepare;
pub mod report;
pub mod sample;
pub mod table;
pub mod words;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, debug};

use crate::cli::{Cli, Commands};

pub use crate::error::AnalysisError;

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("bibliometa", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    debug!("Parsed command line: {:?}", cli.command);
    match cli.command {
        Commands::Analyze(args) => analyze::execute(&args),
        Commands::Explore(args) => explore::execute(&args),
    }
}
