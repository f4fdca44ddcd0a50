//! Dashboard filtering over the persisted sample.
//!
//! The filter narrows rows by an inclusive year range and an optional exact
//! journal/source label, then recomputes the aggregates with the same rules
//! used by [`crate::prepare::prepare`].

use log::{debug, info};
use serde::Serialize;

use crate::{
    columns::{ColumnRoles, YEAR_COLUMN},
    config::AnalysisConfig,
    data::Value,
    frame::RecordTable,
    frequency::{Ranking, YearHistogram, cell_label, distinct_labels, label_ranking, year_histogram},
    prepare::derive_years,
    words::{TitleTokenizer, top_title_words},
};

/// Pseudo-label selecting every journal.
pub const ALL_LABEL: &str = "All";
/// Year bounds used when the sample holds no years at all.
pub const FALLBACK_YEAR_RANGE: (i64, i64) = (2019, 2022);

#[derive(Debug, Clone)]
pub struct DashboardData {
    pub table: RecordTable,
    pub roles: ColumnRoles,
}

impl DashboardData {
    pub fn new(mut table: RecordTable, config: &AnalysisConfig) -> Self {
        let roles = ColumnRoles::resolve(table.columns(), config);
        match &roles.date {
            Some(date_column) => {
                let years = derive_years(&table, date_column);
                if let Err(err) = table.set_column(YEAR_COLUMN, years) {
                    debug!("Keeping stored years: {err}");
                }
            }
            None if roles.has_year => debug!("No date column; using stored '{YEAR_COLUMN}' values"),
            None => info!("No date column or '{YEAR_COLUMN}' column; year filter disabled"),
        }
        let roles = ColumnRoles::resolve(table.columns(), config);
        Self { table, roles }
    }

    pub fn year_bounds(&self) -> (i64, i64) {
        let years = year_histogram(&self.table);
        match (years.keys().next(), years.keys().next_back()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => FALLBACK_YEAR_RANGE,
        }
    }

    pub fn journal_options(&self, config: &AnalysisConfig) -> Vec<String> {
        let mut options = vec![ALL_LABEL.to_string()];
        if let Some(column) = &self.roles.journal {
            options.extend(distinct_labels(&self.table, column, &config.unknown_label));
        }
        options
    }

    pub fn apply(&self, filter: &DashboardFilter, config: &AnalysisConfig) -> DashboardView {
        let bounds = self.year_bounds();
        let year_range = filter.years.unwrap_or(bounds);
        // Only the default full range keeps undated rows.
        let full_range = filter.years.is_none_or(|years| years == bounds);
        let year_idx = if full_range {
            None
        } else {
            self.table.column_index(YEAR_COLUMN)
        };
        let journal_idx = filter
            .journal_label()
            .and(self.roles.journal.as_deref())
            .and_then(|column| self.table.column_index(column));
        let label = filter.journal_label();

        let filtered = self.table.filter_rows(|row| {
            let in_years = match year_idx {
                Some(idx) => row[idx]
                    .as_ref()
                    .and_then(Value::as_integer)
                    .is_some_and(|year| year_range.0 <= year && year <= year_range.1),
                None => true,
            };
            let matches_label = match (label, journal_idx) {
                (Some(label), Some(idx)) => {
                    cell_label(row[idx].as_ref(), &config.unknown_label) == label
                }
                _ => true,
            };
            in_years && matches_label
        });
        debug!(
            "Filter {year_range:?} / {:?} kept {} of {} row(s)",
            label,
            filtered.row_count(),
            self.table.row_count()
        );

        let years = year_histogram(&filtered);
        let top_journals = match &self.roles.journal {
            Some(column) => {
                label_ranking(&filtered, column, &config.unknown_label, config.top_journals)
            }
            None => Ranking::default(),
        };
        let top_words = top_title_words(
            &filtered,
            &TitleTokenizer::from_config(config),
            config.top_words,
        );
        DashboardView {
            year_range,
            row_count: filtered.row_count(),
            filtered,
            years,
            top_journals,
            top_words,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardFilter {
    pub years: Option<(i64, i64)>,
    pub journal: Option<String>,
}

impl DashboardFilter {
    fn journal_label(&self) -> Option<&str> {
        self.journal
            .as_deref()
            .filter(|label| *label != ALL_LABEL)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub year_range: (i64, i64),
    pub row_count: usize,
    #[serde(skip)]
    pub filtered: RecordTable,
    pub years: YearHistogram,
    pub top_journals: Ranking,
    pub top_words: Ranking,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parse_cell;

    fn sample(rows: &[(&str, Option<&str>, Option<&str>)]) -> DashboardData {
        let mut table = RecordTable::new(vec![
            "title".into(),
            "journal".into(),
            "publish_time".into(),
        ])
        .unwrap();
        for (title, journal, published) in rows {
            table
                .push_row(vec![
                    parse_cell(title),
                    journal.and_then(parse_cell),
                    published.and_then(parse_cell),
                ])
                .unwrap();
        }
        DashboardData::new(table, &AnalysisConfig::default())
    }

    #[test]
    fn year_is_rederived_from_publish_time() {
        let data = sample(&[("Cats", Some("J1"), Some("2020-01-01"))]);
        assert!(data.roles.has_year);
        assert_eq!(data.table.cell(0, "year"), Some(&Value::Integer(2020)));
    }

    #[test]
    fn stored_years_are_used_without_a_date_column() {
        let mut table = RecordTable::new(vec!["title".into(), "year".into()]).unwrap();
        for (title, year) in [("Cats", "2018"), ("Dogs", "2020.0")] {
            table
                .push_row(vec![parse_cell(title), parse_cell(year)])
                .unwrap();
        }
        let data = DashboardData::new(table, &AnalysisConfig::default());
        assert!(data.roles.date.is_none());
        assert!(data.roles.has_year);
        assert_eq!(data.year_bounds(), (2018, 2020));
    }

    #[test]
    fn bounds_fall_back_when_no_years() {
        let data = sample(&[("Cats", Some("J1"), Some("undated"))]);
        assert_eq!(data.year_bounds(), FALLBACK_YEAR_RANGE);
    }

    #[test]
    fn unknown_label_selects_missing_journals() {
        let data = sample(&[
            ("Cats", None, Some("2020-01-01")),
            ("Dogs", Some("J1"), Some("2020-02-01")),
        ]);
        let view = data.apply(
            &DashboardFilter {
                years: None,
                journal: Some("Unknown".into()),
            },
            &AnalysisConfig::default(),
        );
        assert_eq!(view.row_count, 1);
        assert_eq!(view.top_journals.count_of("Unknown"), Some(1));
    }

    #[test]
    fn narrow_range_drops_undated_rows() {
        let data = sample(&[
            ("Cats", Some("J1"), Some("2020-01-01")),
            ("Dogs", Some("J1"), Some("2021-01-01")),
            ("Owls", Some("J1"), None),
        ]);
        let config = AnalysisConfig::default();
        let full = data.apply(&DashboardFilter::default(), &config);
        assert_eq!(full.row_count, 3);
        assert_eq!(full.year_range, (2020, 2021));

        let narrow = data.apply(
            &DashboardFilter {
                years: Some((2021, 2021)),
                journal: None,
            },
            &config,
        );
        assert_eq!(narrow.row_count, 1);
        assert_eq!(narrow.years.get(&2021), Some(&1));
    }

    #[test]
    fn wider_explicit_range_drops_undated_rows() {
        let data = sample(&[
            ("Cats", Some("J1"), Some("2020-01-01")),
            ("Dogs", Some("J1"), Some("2021-01-01")),
            ("Owls", Some("J1"), None),
        ]);
        let config = AnalysisConfig::default();
        let explicit_bounds = data.apply(
            &DashboardFilter {
                years: Some((2020, 2021)),
                journal: None,
            },
            &config,
        );
        assert_eq!(explicit_bounds.row_count, 3);

        let wider = data.apply(
            &DashboardFilter {
                years: Some((1900, 2100)),
                journal: None,
            },
            &config,
        );
        assert_eq!(wider.row_count, 2);
        assert_eq!(wider.years.values().sum::<usize>(), 2);
        assert_eq!(wider.top_words.count_of("owls"), None);
    }

    #[test]
    fn top_words_come_from_filtered_titles_only() {
        let data = sample(&[
            ("Feline Virus Survey", Some("J1"), Some("2020-01-01")),
            ("Feline Virus Vaccines", Some("J2"), Some("2020-06-01")),
            ("Canine Virus Survey", Some("J1"), Some("2021-03-01")),
            ("Avian Influenza", Some("J2"), Some("2021-09-01")),
        ]);
        let config = AnalysisConfig::default();

        let year_2020 = data.apply(
            &DashboardFilter {
                years: Some((2020, 2020)),
                journal: None,
            },
            &config,
        );
        assert_eq!(year_2020.top_words.count_of("feline"), Some(2));
        assert_eq!(year_2020.top_words.count_of("virus"), Some(2));
        assert_eq!(year_2020.top_words.count_of("survey"), Some(1));
        assert_eq!(year_2020.top_words.count_of("canine"), None);
        assert_eq!(year_2020.top_words.count_of("avian"), None);

        let j2 = data.apply(
            &DashboardFilter {
                years: None,
                journal: Some("J2".into()),
            },
            &config,
        );
        assert_eq!(j2.top_words.count_of("virus"), Some(1));
        assert_eq!(j2.top_words.count_of("influenza"), Some(1));
        assert_eq!(j2.top_words.count_of("survey"), None);
        assert_eq!(j2.top_words.total(), 5);
    }

    #[test]
    fn journal_options_start_with_all() {
        let data = sample(&[
            ("Cats", Some("J2"), None),
            ("Dogs", None, None),
            ("Owls", Some("J1"), None),
        ]);
        assert_eq!(
            data.journal_options(&AnalysisConfig::default()),
            vec!["All", "J1", "J2", "Unknown"]
        );
    }
}
