//! Laplace-smoothed weight estimation.

use crate::error::{FalxError, Result};
use crate::model::ClassificationModel;

/// Computes smoothed conditional probabilities for every (word, class) pair.
///
/// Weight setting assumes the model already has one aggregate pseudo-document
/// per class and that class priors have been set by the corpus builder; the
/// estimator validates the priors but never computes them.
#[derive(Debug, Default)]
pub struct WeightEstimator;

impl WeightEstimator {
    /// Recompute per-class word totals and every entry's weight in place.
    ///
    /// For each entry: `weight = (1 + count) / (V + class_word_count)`, the
    /// Laplace estimate, which lands in (0, 1] and reserves probability mass
    /// for words unseen in the class.
    pub fn set_weights(model: &mut ClassificationModel) -> Result<()> {
        for (ci, class) in model.classes().iter().enumerate() {
            if class.prior <= 0.0 {
                return Err(FalxError::invalid_model_state(format!(
                    "class {ci} ({}) has non-positive prior {}",
                    class.label, class.prior
                )));
            }
        }

        // First pass: total number of terms in each class.
        let mut totals = vec![0u64; model.class_count()];
        for (_, entries) in model.word_table().iter() {
            for entry in entries {
                totals[entry.class] += entry.count as u64;
            }
        }
        for (class, total) in model.classes_mut().iter_mut().zip(totals.iter()) {
            class.word_count = *total;
        }

        // Second pass: set every entry's weight to P(w|C).
        let vocab_size = model.vocab_size() as f64;
        for entries in model.word_table_mut().iter_mut() {
            for entry in entries.iter_mut() {
                entry.weight =
                    (1.0 + entry.count as f64) / (vocab_size + totals[entry.class] as f64);
                if !(entry.weight > 0.0 && entry.weight <= 1.0) {
                    return Err(FalxError::invalid_model_state(format!(
                        "weight {} for class {} outside (0, 1]",
                        entry.weight, entry.class
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ScoringConfig;

    fn two_class_model() -> ClassificationModel {
        // V = 4; class A has {w1: 3, w2: 1}, class B has {w3: 2}.
        let mut model = ClassificationModel::new(4, ScoringConfig::naive_bayes());
        let a = model.add_class("a", 0.5);
        let b = model.add_class("b", 0.5);
        model.add_word_count(1, a, 3).unwrap();
        model.add_word_count(2, a, 1).unwrap();
        model.add_word_count(3, b, 2).unwrap();
        model
    }

    #[test]
    fn test_set_weights_laplace_values() {
        let mut model = two_class_model();
        WeightEstimator::set_weights(&mut model).unwrap();

        assert_eq!(model.classes()[0].word_count, 4);
        assert_eq!(model.classes()[1].word_count, 2);

        let w1 = model.word_table().entries_for(1).unwrap();
        assert!((w1[0].weight - 0.5).abs() < 1e-12); // (1+3)/(4+4)
        let w2 = model.word_table().entries_for(2).unwrap();
        assert!((w2[0].weight - 0.25).abs() < 1e-12); // (1+1)/(4+4)
        let w3 = model.word_table().entries_for(3).unwrap();
        assert!((w3[0].weight - 0.5).abs() < 1e-12); // (1+2)/(4+2)
    }

    #[test]
    fn test_set_weights_all_weights_in_unit_interval() {
        let mut model = two_class_model();
        WeightEstimator::set_weights(&mut model).unwrap();

        for (_, entries) in model.word_table().iter() {
            for entry in entries {
                assert!(entry.weight > 0.0 && entry.weight <= 1.0);
            }
        }
    }

    #[test]
    fn test_set_weights_totals_match_raw_counts() {
        let mut model = two_class_model();
        WeightEstimator::set_weights(&mut model).unwrap();

        let total_raw: u64 = model
            .word_table()
            .iter()
            .flat_map(|(_, entries)| entries.iter())
            .map(|e| e.count as u64)
            .sum();
        let total_per_class: u64 = model.classes().iter().map(|c| c.word_count).sum();
        assert_eq!(total_raw, total_per_class);
    }

    #[test]
    fn test_set_weights_overwrites_stale_totals() {
        let mut model = two_class_model();
        WeightEstimator::set_weights(&mut model).unwrap();
        // A second run over the same counts must be idempotent.
        WeightEstimator::set_weights(&mut model).unwrap();
        assert_eq!(model.classes()[0].word_count, 4);
        assert_eq!(model.classes()[1].word_count, 2);
    }

    #[test]
    fn test_set_weights_rejects_non_positive_prior() {
        let mut model = two_class_model();
        model.set_prior(1, 0.0).unwrap();
        let err = WeightEstimator::set_weights(&mut model).unwrap_err();
        assert!(matches!(err, FalxError::InvalidModelState(_)));
    }
}
