//! Parallel batch scoring.
//!
//! Scoring is read-only against the model and every call owns its
//! accumulator buffer, so independent query vectors can be scored on the
//! rayon pool without coordination.

use rayon::prelude::*;

use crate::classifier::{PosteriorScorer, ScoredClass};
use crate::error::Result;
use crate::model::{ClassificationModel, QueryVector};

/// Score every query vector against `model`, returning at most `k` classes
/// per query in input order.
pub fn score_batch(
    model: &ClassificationModel,
    queries: &[QueryVector],
    k: usize,
) -> Result<Vec<Vec<ScoredClass>>> {
    queries
        .par_iter()
        .map(|query| PosteriorScorer::score(model, query, k))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{ScoringConfig, WeightEstimator};

    fn trained_model() -> ClassificationModel {
        let mut model = ClassificationModel::new(6, ScoringConfig::naive_bayes());
        let a = model.add_class("a", 0.4);
        let b = model.add_class("b", 0.35);
        let c = model.add_class("c", 0.25);
        model.add_word_count(0, a, 5).unwrap();
        model.add_word_count(1, a, 2).unwrap();
        model.add_word_count(1, b, 4).unwrap();
        model.add_word_count(2, b, 3).unwrap();
        model.add_word_count(3, c, 6).unwrap();
        model.add_word_count(4, c, 1).unwrap();
        WeightEstimator::set_weights(&mut model).unwrap();
        model
    }

    #[test]
    fn test_batch_matches_sequential_scoring() {
        let model = trained_model();
        let queries: Vec<QueryVector> = (0u64..16)
            .map(|i| QueryVector::from_pairs(vec![(i % 5, 1 + (i % 3) as u32), (2, 1)]))
            .collect();

        let batch = score_batch(&model, &queries, 2).unwrap();
        assert_eq!(batch.len(), queries.len());

        for (query, hits) in queries.iter().zip(&batch) {
            let sequential = PosteriorScorer::score(&model, query, 2).unwrap();
            assert_eq!(hits, &sequential);
        }
    }

    #[test]
    fn test_batch_empty_input() {
        let model = trained_model();
        let batch = score_batch(&model, &[], 3).unwrap();
        assert!(batch.is_empty());
    }

    #[test]
    fn test_batch_propagates_model_errors() {
        let mut model = trained_model();
        model.set_prior(1, -1.0).unwrap();
        let queries = vec![QueryVector::from_pairs(vec![(0, 1)])];
        assert!(score_batch(&model, &queries, 2).is_err());
    }
}
