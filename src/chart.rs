use std::{
    fmt::Write as _,
    path::{Path, PathBuf},
};

use log::{debug, info};

use crate::{
    error::AnalysisError,
    frequency::{Ranking, YearHistogram},
    io_utils,
};

pub const YEAR_CHART_FILE: &str = "publications_by_year.svg";
pub const JOURNAL_CHART_FILE: &str = "top_journals.svg";
pub const WORD_CLOUD_FILE: &str = "title_wordcloud.svg";
pub const SOURCE_CHART_FILE: &str = "top_sources.svg";

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 400.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 110.0;
const BAR_FILL: &str = "#4c72b0";

#[derive(Debug, Clone)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<(String, usize)>,
}

impl BarChart {
    pub fn from_histogram(title: &str, histogram: &YearHistogram) -> Self {
        Self {
            title: title.to_string(),
            x_label: "Year".to_string(),
            y_label: "Number of publications".to_string(),
            bars: histogram
                .iter()
                .map(|(year, count)| (year.to_string(), *count))
                .collect(),
        }
    }

    pub fn from_ranking(title: &str, y_label: &str, ranking: &Ranking) -> Self {
        Self {
            title: title.to_string(),
            x_label: String::new(),
            y_label: y_label.to_string(),
            bars: ranking
                .entries()
                .iter()
                .map(|entry| (entry.label.clone(), entry.count))
                .collect(),
        }
    }

    pub fn to_svg(&self) -> String {
        let mut svg = open_svg();
        let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let baseline = MARGIN_TOP + plot_height;
        let max = self.bars.iter().map(|(_, count)| *count).max().unwrap_or(0).max(1) as f64;
        let slot = plot_width / self.bars.len().max(1) as f64;
        let bar_width = (slot * 0.8).max(1.0);

        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="24" text-anchor="middle" font-size="16">{}</text>"#,
            WIDTH / 2.0,
            escape(&self.title)
        );
        let _ = writeln!(
            svg,
            r#"<line x1="{MARGIN_LEFT}" y1="{baseline:.1}" x2="{:.1}" y2="{baseline:.1}" stroke="black"/>"#,
            WIDTH - MARGIN_RIGHT
        );
        let _ = writeln!(
            svg,
            r#"<line x1="{MARGIN_LEFT}" y1="{MARGIN_TOP}" x2="{MARGIN_LEFT}" y2="{baseline:.1}" stroke="black"/>"#
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="10" text-anchor="end">{}</text>"#,
            MARGIN_LEFT - 4.0,
            MARGIN_TOP + 4.0,
            max as usize
        );

        for (idx, (label, count)) in self.bars.iter().enumerate() {
            let height = plot_height * (*count as f64 / max);
            let x = MARGIN_LEFT + slot * idx as f64 + (slot - bar_width) / 2.0;
            let y = baseline - height;
            let _ = writeln!(
                svg,
                r#"<rect x="{x:.1}" y="{y:.1}" width="{bar_width:.1}" height="{height:.1}" fill="{BAR_FILL}"><title>{}: {count}</title></rect>"#,
                escape(label)
            );
            let label_x = x + bar_width / 2.0;
            let label_y = baseline + 12.0;
            let _ = writeln!(
                svg,
                r#"<text x="{label_x:.1}" y="{label_y:.1}" font-size="10" text-anchor="end" transform="rotate(-45 {label_x:.1} {label_y:.1})">{}</text>"#,
                escape(&truncate_label(label, 28))
            );
        }

        if !self.x_label.is_empty() {
            let _ = writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12">{}</text>"#,
                MARGIN_LEFT + plot_width / 2.0,
                HEIGHT - 8.0,
                escape(&self.x_label)
            );
        }
        let mid_y = MARGIN_TOP + plot_height / 2.0;
        let _ = writeln!(
            svg,
            r#"<text x="16" y="{mid_y:.1}" text-anchor="middle" font-size="12" transform="rotate(-90 16 {mid_y:.1})">{}</text>"#,
            escape(&self.y_label)
        );
        svg.push_str("</svg>\n");
        svg
    }
}

/// Word cloud laid out left to right, font size proportional to frequency.
pub fn word_cloud_svg(title: &str, words: &Ranking) -> String {
    const MIN_FONT: f64 = 12.0;
    const MAX_FONT: f64 = 56.0;
    const PADDING: f64 = 10.0;

    let mut svg = open_svg();
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="24" text-anchor="middle" font-size="16">{}</text>"#,
        WIDTH / 2.0,
        escape(title)
    );
    let max = words.entries().first().map(|e| e.count).unwrap_or(1).max(1) as f64;
    let mut x = PADDING;
    let mut line_top = MARGIN_TOP;
    let mut line_height: f64 = 0.0;
    for entry in words.entries() {
        let font = MIN_FONT + (MAX_FONT - MIN_FONT) * (entry.count as f64 / max);
        let width = font * 0.6 * entry.label.chars().count() as f64;
        if x + width > WIDTH - PADDING && x > PADDING {
            x = PADDING;
            line_top += line_height + 4.0;
            line_height = 0.0;
        }
        if line_top + font > HEIGHT {
            debug!("Word cloud is full; {} skipped", entry.label);
            break;
        }
        line_height = line_height.max(font);
        let _ = writeln!(
            svg,
            r#"<text x="{x:.1}" y="{:.1}" font-size="{font:.1}" fill="{BAR_FILL}">{}</text>"#,
            line_top + font,
            escape(&entry.label)
        );
        x += width + PADDING;
    }
    svg.push_str("</svg>\n");
    svg
}

pub fn write_svg(dir: &Path, file_name: &str, svg: &str) -> Result<PathBuf, AnalysisError> {
    let path = dir.join(file_name);
    io_utils::write_text(&path, svg).map_err(|err| AnalysisError::output(&path, err))?;
    info!("Wrote chart {path:?}");
    Ok(path)
}

#[derive(Debug, Clone, Copy)]
pub struct ChartData<'a> {
    pub years: &'a YearHistogram,
    pub journals: &'a Ranking,
    pub words: &'a Ranking,
    pub sources: Option<&'a Ranking>,
}

pub fn write_charts(dir: &Path, data: ChartData<'_>) -> Result<Vec<PathBuf>, AnalysisError> {
    let mut written = Vec::new();
    if !data.years.is_empty() {
        let chart = BarChart::from_histogram("Publications by Year", data.years);
        written.push(write_svg(dir, YEAR_CHART_FILE, &chart.to_svg())?);
    }
    if !data.journals.is_empty() {
        let chart =
            BarChart::from_ranking("Top publishing journals / sources", "Paper count", data.journals);
        written.push(write_svg(dir, JOURNAL_CHART_FILE, &chart.to_svg())?);
    }
    if !data.words.is_empty() {
        let svg = word_cloud_svg("Word Cloud of Titles", data.words);
        written.push(write_svg(dir, WORD_CLOUD_FILE, &svg)?);
    }
    if let Some(sources) = data.sources.filter(|ranking| !ranking.is_empty()) {
        let chart = BarChart::from_ranking("Top sources", "Paper count", sources);
        written.push(write_svg(dir, SOURCE_CHART_FILE, &chart.to_svg())?);
    }
    Ok(written)
}

fn open_svg() -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{HEIGHT}\" viewBox=\"0 0 {WIDTH} {HEIGHT}\" font-family=\"sans-serif\">\n<rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n"
    )
}

fn truncate_label(label: &str, max: usize) -> String {
    if label.chars().count() <= max {
        label.to_string()
    } else {
        let mut short = label.chars().take(max - 1).collect::<String>();
        short.push('…');
        short
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
