use std::fs;

use anyhow::{Context, Result};
use log::info;

use crate::{
    chart::{self, ChartData},
    cli::AnalyzeArgs,
    config::AnalysisConfig,
    io_utils,
    loader::{self, LoadOptions},
    prepare, report, sample,
};

pub const SAMPLE_FILE_NAME: &str = "metadata_clean_sample.csv";

pub fn execute(args: &AnalyzeArgs) -> Result<()> {
    let mut config = AnalysisConfig::load_or_default(args.config.as_deref())
        .context("Loading analysis configuration")?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(fraction) = args.sample_fraction {
        config.sample_fraction = fraction;
    }

    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    info!(
        "Loading '{}' with delimiter '{}'",
        args.input.display(),
        io_utils::printable_delimiter(delimiter)
    );
    let options = LoadOptions {
        delimiter,
        encoding,
        row_limit: args.limit,
    };
    let raw = loader::load_table(&args.input, &options)
        .with_context(|| format!("Loading metadata from {:?}", args.input))?;
    info!(
        "Initial shape: {} row(s) x {} column(s)",
        raw.row_count(),
        raw.column_count()
    );

    let preparation = prepare::prepare(raw, &config);

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Creating output directory {:?}", args.output_dir))?;
    if args.no_charts {
        info!("Chart output disabled");
    } else {
        let written = chart::write_charts(
            &args.output_dir,
            ChartData {
                years: &preparation.years,
                journals: &preparation.top_journals,
                words: &preparation.top_words,
                sources: Some(&preparation.top_sources),
            },
        )?;
        info!("Wrote {} chart(s) to {:?}", written.len(), args.output_dir);
    }

    let sampled = sample::sample_fraction(&preparation.cleaned, config.sample_fraction, config.seed);
    let sample_path = args.output_dir.join(SAMPLE_FILE_NAME);
    sample::write_table(&sampled, &sample_path)?;
    info!(
        "Saved {} of {} cleaned row(s) to {:?}",
        sampled.row_count(),
        preparation.cleaned.row_count(),
        sample_path
    );

    if args.json {
        let summary = preparation.summary(config.audit_report_size);
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Serializing summary")?
        );
    } else {
        print!(
            "{}",
            report::render_preparation(&preparation, config.audit_report_size)
        );
    }
    Ok(())
}
