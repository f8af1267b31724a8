//! Bounded top-K collection of scored classes.

use serde::{Deserialize, Serialize};

/// A class index paired with its final score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredClass {
    /// Index of the class in the model's catalog.
    pub class: usize,
    /// Final score (a probability when normalization is enabled).
    pub weight: f64,
}

/// A collector that keeps the top K classes by score.
///
/// Classes are offered in index order and inserted by shifting, so the kept
/// entries are sorted descending by weight at every point and never exceed
/// the capacity. Ties keep offer order: a new class only displaces a kept
/// entry when its weight is strictly greater. For k much smaller than the
/// class count this is O(classes * k) without sorting all classes.
#[derive(Debug, Clone)]
pub struct TopClassCollector {
    capacity: usize,
    hits: Vec<ScoredClass>,
}

impl TopClassCollector {
    /// Create a new collector keeping at most `capacity` classes.
    pub fn new(capacity: usize) -> Self {
        TopClassCollector {
            capacity,
            hits: Vec::with_capacity(capacity),
        }
    }

    /// Offer a scored class to the collector.
    pub fn insert(&mut self, class: usize, weight: f64) {
        let full = self.hits.len() >= self.capacity;
        if full {
            match self.hits.last() {
                Some(last) if last.weight < weight => {}
                _ => return,
            }
        }

        // Either grow by one or overwrite the smallest kept entry, then
        // shift the new value up to its sorted position.
        let mut pos = if full {
            self.hits.len() - 1
        } else {
            self.hits.push(ScoredClass { class, weight });
            self.hits.len() - 1
        };
        while pos > 0 && self.hits[pos - 1].weight < weight {
            self.hits[pos] = self.hits[pos - 1];
            pos -= 1;
        }
        self.hits[pos] = ScoredClass { class, weight };
    }

    /// Number of classes currently kept.
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Check if nothing has been kept yet.
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// The maximum number of classes this collector keeps.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Consume the collector, returning the kept classes sorted descending
    /// by weight.
    pub fn into_sorted(self) -> Vec<ScoredClass> {
        self.hits
    }
}
