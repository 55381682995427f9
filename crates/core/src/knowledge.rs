use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KnowledgeRecord {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub timestamp: String,
}

impl KnowledgeRecord {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            timestamp: timestamp.into(),
        }
    }

    /// Lookup comparison: trimmed, case-insensitive.
    pub fn matches_query(&self, query: &str) -> bool {
        self.question.trim().to_lowercase() == query.trim().to_lowercase()
    }
}

pub fn current_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Ordered question/answer records, newest save first.
///
/// Questions are not unique: imported data may hold several records for the
/// same question. Only [`KnowledgeBase::upsert`] collapses duplicates, and only
/// for byte-identical question strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct KnowledgeBase {
    records: Vec<KnowledgeRecord>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<KnowledgeRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[KnowledgeRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<KnowledgeRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KnowledgeRecord> {
        self.records.iter()
    }

    pub fn upsert(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.upsert_record(KnowledgeRecord::new(question, answer, current_timestamp()));
    }

    /// Removes records with the same raw question, then puts `record` first.
    pub fn upsert_record(&mut self, record: KnowledgeRecord) {
        self.records.retain(|existing| existing.question != record.question);
        self.records.insert(0, record);
    }

    /// Removes every record whose raw question equals `question`. Returns how
    /// many were removed.
    pub fn delete_by_question(&mut self, question: &str) -> usize {
        let before = self.records.len();
        self.records.retain(|existing| existing.question != question);
        before - self.records.len()
    }

    /// First record with exactly this raw question.
    pub fn find_exact(&self, question: &str) -> Option<&KnowledgeRecord> {
        self.records.iter().find(|record| record.question == question)
    }

    /// First record matching `query` the way resolution does.
    pub fn lookup(&self, query: &str) -> Option<&KnowledgeRecord> {
        lookup(&self.records, query)
    }

    pub fn replace_all(&mut self, records: Vec<KnowledgeRecord>) {
        self.records = records;
    }
}

impl AsRef<[KnowledgeRecord]> for KnowledgeBase {
    fn as_ref(&self) -> &[KnowledgeRecord] {
        &self.records
    }
}

pub fn lookup<'a>(records: &'a [KnowledgeRecord], query: &str) -> Option<&'a KnowledgeRecord> {
    records.iter().find(|record| record.matches_query(query))
}

/// Single-writer, copy-on-write wrapper for hosts that resolve on other
/// threads. Readers take an `Arc` snapshot; writers clone, mutate and swap,
/// so a snapshot never observes a half-applied update.
#[derive(Debug, Default)]
pub struct KnowledgeHandle {
    current: RwLock<Arc<KnowledgeBase>>,
}

impl KnowledgeHandle {
    pub fn new(base: KnowledgeBase) -> Self {
        Self {
            current: RwLock::new(Arc::new(base)),
        }
    }

    pub fn snapshot(&self) -> Arc<KnowledgeBase> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    pub fn update<R>(&self, apply: impl FnOnce(&mut KnowledgeBase) -> R) -> R {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = (**guard).clone();
        let result = apply(&mut next);
        *guard = Arc::new(next);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(question: &str, answer: &str) -> KnowledgeRecord {
        KnowledgeRecord::new(question, answer, "2025-03-26 19:10:34")
    }

    #[test]
    fn upsert_replaces_identical_question_and_moves_it_first() {
        let mut kb = KnowledgeBase::from_records(vec![record("A", "1"), record("B", "2")]);
        kb.upsert("B", "3");
        let questions: Vec<&str> = kb.iter().map(|r| r.question.as_str()).collect();
        assert_eq!(questions, vec!["B", "A"]);
        assert_eq!(kb.records()[0].answer, "3");
    }

    #[test]
    fn upsert_twice_keeps_one_record() {
        let mut kb = KnowledgeBase::new();
        kb.upsert("K32B220", "x");
        kb.upsert("A", "y");
        kb.upsert("K32B220", "x");
        kb.upsert("K32B220", "x");
        assert_eq!(kb.len(), 2);
        assert_eq!(kb.records()[0].question, "K32B220");
        assert!(!kb.records()[0].timestamp.is_empty());
    }

    #[test]
    fn upsert_keys_on_raw_question() {
        let mut kb = KnowledgeBase::from_records(vec![record("64b80", "low")]);
        kb.upsert("64B80", "high");
        assert_eq!(kb.len(), 2);
        assert_eq!(kb.lookup("64b80").map(|r| r.answer.as_str()), Some("high"));
    }

    #[test]
    fn delete_removes_all_exact_duplicates() {
        let mut kb = KnowledgeBase::from_records(vec![
            record("84B80", "a"),
            record("84b80", "b"),
            record("84B80", "c"),
        ]);
        assert_eq!(kb.delete_by_question("84B80"), 2);
        assert_eq!(kb.len(), 1);
        assert_eq!(kb.delete_by_question("missing"), 0);
    }

    #[test]
    fn lookup_picks_first_of_duplicates() {
        let kb = KnowledgeBase::from_records(vec![record("84B80", "first"), record("84B80", "second")]);
        assert_eq!(kb.lookup(" 84b80 ").map(|r| r.answer.as_str()), Some("first"));
        assert_eq!(kb.find_exact("84b80"), None);
    }

    #[test]
    fn handle_snapshots_are_isolated_from_updates() {
        let handle = KnowledgeHandle::new(KnowledgeBase::from_records(vec![record("A", "1")]));
        let before = handle.snapshot();
        let removed = handle.update(|kb| {
            kb.upsert("B", "2");
            kb.delete_by_question("A")
        });
        assert_eq!(removed, 1);
        assert_eq!(before.len(), 1);
        assert_eq!(before.records()[0].question, "A");
        let after = handle.snapshot();
        assert_eq!(after.len(), 1);
        assert_eq!(after.records()[0].question, "B");
    }
}
