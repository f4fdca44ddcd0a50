use std::fmt::Write as _;

use crate::{
    data::cell_to_field,
    frame::RecordTable,
    frequency::{Ranking, YearHistogram},
    prepare::{MissingAudit, Preparation},
    table::render_table,
};

pub fn render_histogram(histogram: &YearHistogram) -> String {
    let rows = histogram
        .iter()
        .map(|(year, count)| vec![year.to_string(), count.to_string()])
        .collect::<Vec<_>>();
    render_table(&["year".to_string(), "count".to_string()], &rows)
}

pub fn render_ranking(label_header: &str, ranking: &Ranking) -> String {
    let rows = ranking
        .entries()
        .iter()
        .map(|entry| vec![entry.label.clone(), entry.count.to_string()])
        .collect::<Vec<_>>();
    render_table(&[label_header.to_string(), "count".to_string()], &rows)
}

pub fn render_audit(audit: &MissingAudit, limit: usize) -> String {
    let rows = audit
        .top(limit)
        .iter()
        .map(|entry| {
            vec![
                entry.column.clone(),
                format!("{:.2}%", entry.fraction * 100.0),
            ]
        })
        .collect::<Vec<_>>();
    render_table(&["column".to_string(), "missing".to_string()], &rows)
}

pub fn render_rows(table: &RecordTable) -> String {
    let rows = table
        .rows()
        .iter()
        .map(|row| row.iter().map(|cell| cell_to_field(cell.as_ref())).collect())
        .collect::<Vec<Vec<String>>>();
    render_table(table.columns(), &rows)
}

pub fn render_preparation(preparation: &Preparation, audit_limit: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Loaded {} row(s) x {} column(s); cleaned table keeps {} column(s)\n",
        preparation.raw_rows,
        preparation.raw_columns,
        preparation.cleaned.column_count()
    );

    let _ = writeln!(out, "Missing values (top {audit_limit} columns):");
    let _ = writeln!(out, "{}", render_audit(&preparation.audit, audit_limit));
    if preparation.dropped.is_empty() {
        let _ = writeln!(out, "Dropped columns: none\n");
    } else {
        let _ = writeln!(out, "Dropped columns: {}\n", preparation.dropped.join(", "));
    }

    match preparation.year_span() {
        Some((first, last)) => {
            let _ = writeln!(out, "Publications by year ({first} - {last}):");
            let _ = writeln!(out, "{}", render_histogram(&preparation.years));
        }
        None => {
            let _ = writeln!(out, "Publications by year: no dated rows\n");
        }
    }

    if let Some(column) = &preparation.roles.journal {
        let _ = writeln!(out, "Top journals / sources ({column}):");
        let _ = writeln!(out, "{}", render_ranking(column, &preparation.top_journals));
    }
    if let Some(column) = &preparation.roles.source {
        let _ = writeln!(out, "Top sources ({column}):");
        let _ = writeln!(out, "{}", render_ranking(column, &preparation.top_sources));
    }
    if !preparation.top_words.is_empty() {
        let _ = writeln!(out, "Top title words:");
        let _ = writeln!(out, "{}", render_ranking("word", &preparation.top_words));
    }
    out
}
