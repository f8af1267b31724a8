//! # Falx
//!
//! A probabilistic text classification library for Rust.
//!
//! ## Features
//!
//! - Pure Rust implementation
//! - Naive Bayes and cross-entropy scoring over sparse word-count models
//! - Laplace / M-estimate smoothing for unseen words
//! - Log-space accumulation with dynamic rescaling for numeric stability
//! - Bounded top-K class selection
//! - Leave-one-out correction for evaluation without self-count leakage
//! - Parallel batch scoring

pub mod classifier;
pub mod error;
pub mod model;
pub mod parallel;

pub mod prelude {
    pub use crate::classifier::{
        PosteriorScorer, ScoredClass, ScoringConfig, ScoringMethod, TopClassCollector,
        WeightEstimator,
    };
    pub use crate::error::{FalxError, Result};
    pub use crate::model::{ClassRecord, ClassificationModel, QueryVector, WordClassEntry};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
