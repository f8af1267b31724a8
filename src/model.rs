//! Sparse word-by-class frequency model.
//!
//! The model is built by an external corpus loader: it assigns stable word
//! indices, creates one [`ClassRecord`] per class (one aggregate
//! pseudo-document summarizing all training counts for that class), and fills
//! the [`WordTable`] with raw occurrence counts. The classifier then computes
//! smoothed weights in place and scores query vectors against the table.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::classifier::ScoringConfig;
use crate::error::{FalxError, Result};

/// Per-class statistics.
///
/// `prior` is set by the external corpus builder (for example by counting
/// training documents per class); `word_count` is recomputed by every
/// weight-setting run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassRecord {
    /// Opaque label for reporting; not interpreted by the engine.
    pub label: String,
    /// Class prior probability, in (0, 1].
    pub prior: f64,
    /// Total number of word occurrences observed in this class.
    pub word_count: u64,
}

impl ClassRecord {
    /// Create a new class record with the given label and prior.
    pub fn new<S: Into<String>>(label: S, prior: f64) -> Self {
        ClassRecord {
            label: label.into(),
            prior,
            word_count: 0,
        }
    }
}

/// One (word, class) observation with its smoothed weight.
///
/// The lists stored in [`WordTable`] are strictly increasing by `class`,
/// which the scorer relies on for its merge scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WordClassEntry {
    /// Index of the class this entry belongs to.
    pub class: usize,
    /// Raw occurrence count of the word in the class.
    pub count: u32,
    /// Smoothed P(word | class), written by the weight estimator.
    pub weight: f64,
}

/// Sparse mapping from word index to the classes the word was observed in.
///
/// A missing word index means the word was unseen in training; the scorer
/// skips such words entirely.
#[derive(Debug, Clone, Default)]
pub struct WordTable {
    entries: AHashMap<u64, Vec<WordClassEntry>>,
}

impl WordTable {
    /// Create a new empty word table.
    pub fn new() -> Self {
        WordTable {
            entries: AHashMap::new(),
        }
    }

    /// Add `count` occurrences of `word` in `class`.
    ///
    /// Counts for an existing (word, class) pair accumulate. Entry lists are
    /// kept sorted by class index.
    pub fn add_count(&mut self, word: u64, class: usize, count: u32) {
        let list = self.entries.entry(word).or_default();
        match list.binary_search_by_key(&class, |e| e.class) {
            Ok(pos) => list[pos].count += count,
            Err(pos) => list.insert(
                pos,
                WordClassEntry {
                    class,
                    count,
                    weight: 0.0,
                },
            ),
        }
    }

    /// Look up the entry list for a word.
    pub fn entries_for(&self, word: u64) -> Option<&[WordClassEntry]> {
        self.entries.get(&word).map(|v| v.as_slice())
    }

    /// Iterate over all entry lists.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &[WordClassEntry])> {
        self.entries.iter().map(|(w, v)| (*w, v.as_slice()))
    }

    /// Iterate mutably over all entry lists.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Vec<WordClassEntry>> {
        self.entries.values_mut()
    }

    /// Number of distinct words with at least one entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Sparse word-count vector for a document to classify.
///
/// Entries are kept sorted by word index. The optional normalizer is carried
/// through for diagnostics only; the scoring math works on raw counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryVector {
    entries: Vec<(u64, u32)>,
    normalizer: Option<f64>,
}

impl QueryVector {
    /// Create a new empty query vector.
    pub fn new() -> Self {
        QueryVector {
            entries: Vec::new(),
            normalizer: None,
        }
    }

    /// Create a query vector from (word index, count) pairs.
    ///
    /// Pairs are sorted by word index; duplicate indices accumulate.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (u64, u32)>) -> Self {
        let mut qv = QueryVector::new();
        for (word, count) in pairs {
            qv.add(word, count);
        }
        qv
    }

    /// Add `count` occurrences of `word`, accumulating duplicates.
    pub fn add(&mut self, word: u64, count: u32) {
        match self.entries.binary_search_by_key(&word, |e| e.0) {
            Ok(pos) => self.entries[pos].1 += count,
            Err(pos) => self.entries.insert(pos, (word, count)),
        }
    }

    /// Set the optional display normalizer.
    pub fn with_normalizer(mut self, normalizer: f64) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    /// The (word index, count) entries, sorted by word index.
    pub fn entries(&self) -> &[(u64, u32)] {
        &self.entries
    }

    /// The display normalizer, defaulting to 1.0.
    pub fn normalizer(&self) -> f64 {
        self.normalizer.unwrap_or(1.0)
    }

    /// Number of distinct words in the vector.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the vector has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all occurrence counts.
    pub fn total_count(&self) -> u64 {
        self.entries.iter().map(|&(_, c)| c as u64).sum()
    }
}

/// A trained (or trainable) classification model.
///
/// Holds the ordered class catalog, the vocabulary size V used by the
/// smoothing formulas, the sparse word table, and the scoring configuration
/// chosen at construction.
#[derive(Debug, Clone)]
pub struct ClassificationModel {
    classes: Vec<ClassRecord>,
    vocab_size: u64,
    word_table: WordTable,
    config: ScoringConfig,
}

impl ClassificationModel {
    /// Create a new empty model over a vocabulary of `vocab_size` distinct words.
    pub fn new(vocab_size: u64, config: ScoringConfig) -> Self {
        ClassificationModel {
            classes: Vec::new(),
            vocab_size,
            word_table: WordTable::new(),
            config,
        }
    }

    /// Append a class and return its index. Indices are stable.
    pub fn add_class<S: Into<String>>(&mut self, label: S, prior: f64) -> usize {
        self.classes.push(ClassRecord::new(label, prior));
        self.classes.len() - 1
    }

    /// Set the prior probability of an existing class.
    pub fn set_prior(&mut self, class: usize, prior: f64) -> Result<()> {
        let record = self
            .classes
            .get_mut(class)
            .ok_or_else(|| FalxError::invalid_argument(format!("no class at index {class}")))?;
        record.prior = prior;
        Ok(())
    }

    /// Record `count` occurrences of `word` in `class`.
    pub fn add_word_count(&mut self, word: u64, class: usize, count: u32) -> Result<()> {
        if class >= self.classes.len() {
            return Err(FalxError::invalid_argument(format!(
                "no class at index {class}"
            )));
        }
        self.word_table.add_count(word, class, count);
        Ok(())
    }

    /// The ordered class catalog.
    pub fn classes(&self) -> &[ClassRecord] {
        &self.classes
    }

    /// Mutable access to the class catalog (weight estimation).
    pub(crate) fn classes_mut(&mut self) -> &mut [ClassRecord] {
        &mut self.classes
    }

    /// Number of classes.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Vocabulary size V (total distinct words known to the model).
    pub fn vocab_size(&self) -> u64 {
        self.vocab_size
    }

    /// The sparse word table.
    pub fn word_table(&self) -> &WordTable {
        &self.word_table
    }

    /// Mutable access to the word table (weight estimation).
    pub(crate) fn word_table_mut(&mut self) -> &mut WordTable {
        &mut self.word_table
    }

    /// The scoring configuration chosen at construction.
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_table_keeps_entries_sorted_by_class() {
        let mut table = WordTable::new();
        table.add_count(7, 2, 1);
        table.add_count(7, 0, 3);
        table.add_count(7, 1, 2);

        let entries = table.entries_for(7).unwrap();
        let classes: Vec<usize> = entries.iter().map(|e| e.class).collect();
        assert_eq!(classes, vec![0, 1, 2]);
    }

    #[test]
    fn test_word_table_accumulates_duplicate_pairs() {
        let mut table = WordTable::new();
        table.add_count(3, 1, 2);
        table.add_count(3, 1, 5);

        let entries = table.entries_for(3).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].count, 7);
    }

    #[test]
    fn test_word_table_unknown_word() {
        let table = WordTable::new();
        assert!(table.entries_for(42).is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn test_query_vector_ordering_and_accumulation() {
        let qv = QueryVector::from_pairs(vec![(9, 1), (2, 4), (9, 2)]);
        assert_eq!(qv.entries(), &[(2, 4), (9, 3)]);
        assert_eq!(qv.total_count(), 7);
        assert_eq!(qv.normalizer(), 1.0);
    }

    #[test]
    fn test_model_class_indices_are_stable() {
        let mut model = ClassificationModel::new(100, ScoringConfig::default());
        let a = model.add_class("alpha", 0.5);
        let b = model.add_class("beta", 0.5);
        assert_eq!((a, b), (0, 1));
        assert_eq!(model.classes()[a].label, "alpha");

        model.set_prior(b, 0.25).unwrap();
        assert_eq!(model.classes()[b].prior, 0.25);
        assert!(model.set_prior(5, 0.1).is_err());
    }

    #[test]
    fn test_model_rejects_unknown_class_index() {
        let mut model = ClassificationModel::new(100, ScoringConfig::default());
        model.add_class("only", 1.0);
        assert!(model.add_word_count(1, 3, 2).is_err());
        assert!(model.add_word_count(1, 0, 2).is_ok());
    }
}
