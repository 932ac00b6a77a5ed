use crate::models::types::MatchRecord;

/// Matches fetched under one rating bracket. Only ever replaced whole.
#[derive(Debug, Default)]
pub struct MatchCache {
    bracket: String,
    records: Vec<MatchRecord>,
}

impl MatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bracket(&self) -> &str {
        &self.bracket
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    /// False when a refill is needed before serving `bracket`.
    pub fn valid_for(&self, bracket: &str) -> bool {
        self.bracket == bracket && !self.records.is_empty()
    }

    pub fn replace(&mut self, bracket: String, records: Vec<MatchRecord>) {
        self.bracket = bracket;
        self.records = records;
    }
}
