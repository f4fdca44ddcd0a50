use std::{collections::HashSet, sync::LazyLock};

use regex::Regex;

use crate::{
    columns::TITLE_COLUMN,
    config::AnalysisConfig,
    frame::RecordTable,
    frequency::{FrequencyCounter, Ranking},
};

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s]").expect("title cleaning pattern is valid"));

#[derive(Debug, Clone)]
pub struct TitleTokenizer {
    stopwords: HashSet<String>,
    short_token_len: usize,
}

impl TitleTokenizer {
    pub fn new<I, S>(stopwords: I, short_token_len: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stopwords: stopwords.into_iter().map(Into::into).collect(),
            short_token_len,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.stopwords.iter().cloned(), config.short_token_len)
    }

    pub fn clean(text: &str) -> String {
        NON_WORD.replace_all(&text.to_lowercase(), " ").into_owned()
    }

    fn keep(&self, token: &str) -> bool {
        token.chars().count() > self.short_token_len && !self.stopwords.contains(token)
    }

    pub fn tokens(&self, text: &str) -> Vec<String> {
        Self::clean(text)
            .split_whitespace()
            .filter(|token| self.keep(token))
            .map(str::to_string)
            .collect()
    }
}

pub fn top_title_words(table: &RecordTable, tokenizer: &TitleTokenizer, top: usize) -> Ranking {
    let mut counter = FrequencyCounter::new();
    if let Some(titles) = table.column_values(TITLE_COLUMN) {
        for title in titles.flatten() {
            for token in tokenizer.tokens(&title.as_display()) {
                counter.add(&token);
            }
        }
    }
    counter.into_ranking(top)
}
