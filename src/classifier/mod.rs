//! Naive Bayes and cross-entropy classification.
//!
//! This module provides the two computational halves of the engine:
//!
//! - [`WeightEstimator`] turns raw (word, class) occurrence counts into
//!   Laplace-smoothed conditional probabilities P(word | class).
//! - [`PosteriorScorer`] scores a query word-count vector against the model
//!   and returns the top-K classes.
//!
//! The scoring convention is selected by an explicit [`ScoringMethod`] value
//! in the model's [`ScoringConfig`]; there is no registry or dispatch by
//! method name.

pub mod collector;
pub mod scorer;
pub mod weights;

pub use collector::{ScoredClass, TopClassCollector};
pub use scorer::PosteriorScorer;
pub use weights::WeightEstimator;

use serde::{Deserialize, Serialize};

/// Scoring convention used when accumulating per-word evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoringMethod {
    /// True Naive Bayes posterior estimation: accumulate log-probabilities
    /// and exponentiate back at the end.
    NaiveBayes,
    /// Cross-entropy variant: accumulate negated log contributions and
    /// invert at the end, so lower entropy yields a higher final score.
    CrossEntropy,
}

/// Configuration for classification scoring.
///
/// Passed explicitly at model construction; replaces the process-wide toggles
/// of older bag-of-words systems.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Which scoring convention to use.
    pub method: ScoringMethod,
    /// Ignore stored class priors and start every accumulator at 1.
    pub uniform_class_priors: bool,
    /// Divide final scores by their sum so they form a distribution.
    pub normalize_final_scores: bool,
    /// Emit per-word, per-class score contributions at debug log level.
    pub log_word_scores: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig::naive_bayes()
    }
}

impl ScoringConfig {
    /// Standard Naive Bayes configuration: stored priors, normalized scores.
    pub fn naive_bayes() -> Self {
        ScoringConfig {
            method: ScoringMethod::NaiveBayes,
            uniform_class_priors: false,
            normalize_final_scores: true,
            log_word_scores: false,
        }
    }

    /// Cross-entropy configuration: stored priors, normalized scores.
    pub fn cross_entropy() -> Self {
        ScoringConfig {
            method: ScoringMethod::CrossEntropy,
            uniform_class_priors: false,
            normalize_final_scores: true,
            log_word_scores: false,
        }
    }

    /// Use uniform class priors instead of the stored ones.
    pub fn with_uniform_class_priors(mut self) -> Self {
        self.uniform_class_priors = true;
        self
    }

    /// Skip the final divide-by-sum normalization step.
    pub fn without_normalization(mut self) -> Self {
        self.normalize_final_scores = false;
        self
    }
}
