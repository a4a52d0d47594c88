//! Solved-word ledger: append-only record of completed sessions, newest
//! first, independent of the active session.

use serde::{Deserialize, Serialize};

/// Maximum retained records; the oldest fall off first.
pub const LEDGER_CAP: usize = 50;

/// One completed session, guessed or revealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolvedRecord {
    pub word: String,
    pub theme: String,
    pub attempt_count: u32,
    #[serde(default)]
    pub was_revealed: bool,
    /// Unix seconds.
    pub timestamp: i64,
    /// Session date key, used for deduplication.
    pub date: String,
}

/// Capped newest-first record list. Duplicate `(word, date)` pairs are
/// ignored so a re-saved session never double-counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SolvedLedger {
    records: Vec<SolvedRecord>,
}

impl SolvedLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a record. Returns false when an entry for the same word and
    /// date already exists.
    pub fn push(&mut self, record: SolvedRecord) -> bool {
        if self
            .records
            .iter()
            .any(|r| r.word == record.word && r.date == record.date)
        {
            return false;
        }
        self.records.insert(0, record);
        self.records.truncate(LEDGER_CAP);
        true
    }

    /// Records, newest first.
    #[must_use]
    pub fn records(&self) -> &[SolvedRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(word: &str, date: &str) -> SolvedRecord {
        SolvedRecord {
            word: word.to_string(),
            theme: "Animales".to_string(),
            attempt_count: 3,
            was_revealed: false,
            timestamp: 1_754_438_400,
            date: date.to_string(),
        }
    }

    #[test]
    fn newest_first_and_capped() {
        let mut ledger = SolvedLedger::new();
        for i in 0..LEDGER_CAP + 5 {
            assert!(ledger.push(record(&format!("palabra{i}"), "2026-08-06")));
        }
        assert_eq!(ledger.len(), LEDGER_CAP);
        assert_eq!(ledger.records()[0].word, format!("palabra{}", LEDGER_CAP + 4));
    }

    #[test]
    fn duplicates_by_word_and_date_are_ignored() {
        let mut ledger = SolvedLedger::new();
        assert!(ledger.push(record("tigre", "2026-08-06")));
        assert!(!ledger.push(record("tigre", "2026-08-06")));
        assert!(ledger.push(record("tigre", "2026-08-07")));
        assert_eq!(ledger.len(), 2);
    }
}
