use anyhow::{Context, Result, bail};
use log::info;

use crate::{
    chart::{self, ChartData},
    cli::ExploreArgs,
    config::AnalysisConfig,
    filter::{DashboardData, DashboardFilter},
    io_utils,
    loader::{self, LoadOptions},
    report, sample,
};

pub fn execute(args: &ExploreArgs) -> Result<()> {
    let mut config = AnalysisConfig::load_or_default(args.config.as_deref())
        .context("Loading analysis configuration")?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let options = LoadOptions {
        delimiter: io_utils::resolve_input_delimiter(&args.input, args.delimiter),
        encoding: io_utils::resolve_encoding(args.input_encoding.as_deref())?,
        row_limit: None,
    };
    let table = loader::load_table(&args.input, &options)
        .with_context(|| format!("Loading sample from {:?}", args.input))?;
    let data = DashboardData::new(table, &config);

    if args.list_journals {
        for label in data.journal_options(&config) {
            println!("{label}");
        }
        return Ok(());
    }

    let (min_year, max_year) = data.year_bounds();
    let from = args.from_year.unwrap_or(min_year);
    let to = args.to_year.unwrap_or(max_year);
    if from > to {
        bail!("--from-year {from} is after --to-year {to}");
    }
    let filter = DashboardFilter {
        years: Some((from, to)),
        journal: args.journal.clone(),
    };
    let view = data.apply(&filter, &config);
    info!(
        "Filter kept {} of {} row(s)",
        view.row_count,
        data.table.row_count()
    );

    println!(
        "Showing {} records for years {}-{}\n",
        view.row_count, view.year_range.0, view.year_range.1
    );
    println!("Publications by year:");
    println!("{}", report::render_histogram(&view.years));
    if let Some(column) = &data.roles.journal {
        println!("Top journals / sources (in filtered data):");
        println!("{}", report::render_ranking(column, &view.top_journals));
    }
    if view.top_words.is_empty() {
        println!("No title text available for word frequencies.\n");
    } else {
        println!("Top title words:");
        println!("{}", report::render_ranking("word", &view.top_words));
    }

    let preview = sample::random_rows(&view.filtered, args.preview_rows, config.seed);
    println!("Data sample ({} row(s)):", preview.row_count());
    print!("{}", report::render_rows(&preview));

    if let Some(dir) = &args.charts {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Creating chart directory {dir:?}"))?;
        chart::write_charts(
            dir,
            ChartData {
                years: &view.years,
                journals: &view.top_journals,
                words: &view.top_words,
                sources: None,
            },
        )?;
    }
    Ok(())
}
