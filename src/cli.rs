use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Clean, summarise, and explore bibliographic metadata CSV exports",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Clean a metadata CSV, print aggregates, write charts and a sample
    Analyze(AnalyzeArgs),
    /// Filter a cleaned sample by year range and journal and re-aggregate
    Explore(ExploreArgs),
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Input metadata CSV file
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Directory receiving charts and the cleaned sample
    #[arg(short = 'o', long = "output-dir", default_value = "outputs")]
    pub output_dir: PathBuf,
    /// Only load the first N data rows
    #[arg(long)]
    pub limit: Option<usize>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// YAML file overriding analysis defaults
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// Seed for the persisted random sample
    #[arg(long)]
    pub seed: Option<u64>,
    /// Fraction of cleaned rows to persist (0 < f <= 1)
    #[arg(long = "sample-fraction", value_parser = parse_fraction)]
    pub sample_fraction: Option<f64>,
    /// Skip writing SVG charts
    #[arg(long = "no-charts")]
    pub no_charts: bool,
    /// Print the summary as JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ExploreArgs {
    /// Cleaned sample produced by `analyze`
    #[arg(
        short = 'i',
        long = "input",
        default_value = "outputs/metadata_clean_sample.csv"
    )]
    pub input: PathBuf,
    /// First year to include (defaults to the earliest year in the sample)
    #[arg(long = "from-year")]
    pub from_year: Option<i64>,
    /// Last year to include (defaults to the latest year in the sample)
    #[arg(long = "to-year")]
    pub to_year: Option<i64>,
    /// Exact journal/source label to keep ("All" keeps every row)
    #[arg(short = 'j', long = "journal")]
    pub journal: Option<String>,
    /// List the selectable journal labels and exit
    #[arg(long = "list-journals")]
    pub list_journals: bool,
    /// Number of random rows shown in the preview
    #[arg(long = "preview-rows", default_value_t = 50)]
    pub preview_rows: usize,
    /// Seed for the preview row selection
    #[arg(long)]
    pub seed: Option<u64>,
    /// Write charts for the filtered rows into this directory
    #[arg(long)]
    pub charts: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// YAML file overriding analysis defaults
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

pub fn parse_fraction(value: &str) -> Result<f64, String> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if parsed > 0.0 && parsed <= 1.0 {
        Ok(parsed)
    } else {
        Err(format!("Sample fraction must be in (0, 1], got {parsed}"))
    }
}
