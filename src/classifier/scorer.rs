//! Posterior scoring of query vectors against a trained model.
//!
//! Evidence is accumulated in log space to preserve floating-point
//! resolution, rescaled whenever the running sums drift too far from zero,
//! and converted back to probabilities at the end. The cross-entropy variant
//! accumulates negated log contributions and inverts the totals instead.

use log::debug;

use crate::classifier::collector::{ScoredClass, TopClassCollector};
use crate::classifier::{ScoringConfig, ScoringMethod};
use crate::error::{FalxError, Result};
use crate::model::{ClassificationModel, QueryVector, WordClassEntry};

/// Floor for per-word probability terms.
///
/// `pr_w_c ^ tf` can round to exactly zero when `pr_w_c` is tiny and the
/// term frequency is large; a hard zero would permanently exclude the class
/// no matter what the remaining evidence says, so terms are clamped here
/// instead.
const MIN_PR_TF: f64 = f32::MIN_POSITIVE as f64 * 1.0e5;

/// Scores query vectors against a weighted model and selects the top-K classes.
///
/// Each call uses its own accumulator buffer, so concurrent `score` calls
/// against one model are safe; the `&mut` requirement of
/// [`WeightEstimator::set_weights`](crate::classifier::WeightEstimator::set_weights)
/// keeps training exclusive with scoring.
#[derive(Debug, Default)]
pub struct PosteriorScorer;

impl PosteriorScorer {
    /// Score `query` against `model`, returning at most `k` classes sorted
    /// descending by score.
    pub fn score(
        model: &ClassificationModel,
        query: &QueryVector,
        k: usize,
    ) -> Result<Vec<ScoredClass>> {
        Self::score_impl(model, query, k, None)
    }

    /// Score with leave-one-out correction for `loo_class`.
    ///
    /// The query is treated as a document drawn from `loo_class` whose own
    /// counts must not leak into that class's estimates: the query's counts
    /// are subtracted from the class's entry counts and word total before the
    /// M-estimate is recomputed. Only valid with uniform class priors.
    pub fn score_with_leave_one_out(
        model: &ClassificationModel,
        query: &QueryVector,
        k: usize,
        loo_class: usize,
    ) -> Result<Vec<ScoredClass>> {
        Self::score_impl(model, query, k, Some(loo_class))
    }

    fn score_impl(
        model: &ClassificationModel,
        query: &QueryVector,
        k: usize,
        loo_class: Option<usize>,
    ) -> Result<Vec<ScoredClass>> {
        let config = model.config();
        let log_mode = config.method == ScoringMethod::CrossEntropy;

        if loo_class.is_some() && !config.uniform_class_priors {
            return Err(FalxError::unsupported_configuration(
                "leave-one-out scoring requires uniform class priors",
            ));
        }
        if let Some(loo) = loo_class {
            if loo >= model.class_count() {
                return Err(FalxError::invalid_argument(format!(
                    "no class at index {loo}"
                )));
            }
        }
        if model.vocab_size() == 0 && !model.word_table().is_empty() {
            return Err(FalxError::invalid_model_state(
                "word table is non-empty but vocabulary size is zero",
            ));
        }

        let mut scores = Self::initial_scores(model, config, log_mode)?;

        for &(word, query_count) in query.entries() {
            if query_count == 0 {
                continue;
            }
            // Words the model has never seen contribute nothing.
            let Some(entries) = model.word_table().entries_for(word) else {
                continue;
            };

            if config.log_word_scores {
                debug!(
                    "word {word} (query weight {:.8})",
                    query_count as f64 * query.normalizer()
                );
            }

            Self::accumulate_word(
                model,
                config,
                log_mode,
                loo_class,
                entries,
                query_count,
                &mut scores,
            )?;
        }

        Self::finish_scores(config, log_mode, &mut scores);

        let mut collector = TopClassCollector::new(k);
        for (ci, &weight) in scores.iter().enumerate() {
            collector.insert(ci, weight);
        }
        Ok(collector.into_sorted())
    }

    /// One accumulator per class, starting at the (log) prior.
    fn initial_scores(
        model: &ClassificationModel,
        config: &ScoringConfig,
        log_mode: bool,
    ) -> Result<Vec<f64>> {
        let mut scores = vec![0.0; model.class_count()];
        if config.log_word_scores {
            debug!("class prior probabilities");
        }
        for (ci, class) in model.classes().iter().enumerate() {
            if config.uniform_class_priors {
                scores[ci] = 1.0;
            } else {
                if !(class.prior > 0.0 && class.prior <= 1.0) {
                    return Err(FalxError::invalid_model_state(format!(
                        "class {ci} ({}) has prior {} outside (0, 1]",
                        class.label, class.prior
                    )));
                }
                scores[ci] = class.prior.ln();
                if log_mode {
                    scores[ci] = -scores[ci];
                }
            }
            if config.log_word_scores {
                debug!("{:<40} {:.9}", class.label, scores[ci]);
            }
        }
        Ok(scores)
    }

    /// Fold one query word's evidence into every class accumulator.
    #[allow(clippy::too_many_arguments)]
    fn accumulate_word(
        model: &ClassificationModel,
        config: &ScoringConfig,
        log_mode: bool,
        loo_class: Option<usize>,
        entries: &[WordClassEntry],
        query_count: u32,
        scores: &mut [f64],
    ) -> Result<()> {
        let vocab_size = model.vocab_size() as f64;
        let m_est_p = 1.0 / vocab_size;
        let mut rescaler = f64::MAX;

        // Two-pointer merge: classes ascend, and each word's entry list is
        // strictly increasing by class index.
        let mut dvi = 0;
        for (ci, class) in model.classes().iter().enumerate() {
            while dvi < entries.len() && entries[dvi].class < ci {
                dvi += 1;
            }
            let entry = entries
                .get(dvi)
                .filter(|e| e.class == ci);

            let word_count = class.word_count as f64;
            let m_est_m = if class.word_count > 0 {
                vocab_size / word_count
            } else {
                1.0
            };
            let loo_here = loo_class == Some(ci);

            // The leave-one-out form is an approximation: removing the query
            // document would also shrink the vocabulary bookkeeping behind
            // m_est_m and m_est_p, which stays unadjusted here.
            let pr_w_c = match entry {
                Some(entry) if loo_here => {
                    (m_est_m * m_est_p + entry.count as f64 - query_count as f64)
                        / (m_est_m + word_count - query_count as f64)
                }
                Some(entry) => entry.weight,
                None if loo_here => {
                    (m_est_m * m_est_p) / (m_est_m + word_count - query_count as f64)
                }
                None => (m_est_m * m_est_p) / (m_est_m + word_count),
            };
            if !(pr_w_c > 0.0 && pr_w_c <= 1.0) {
                return Err(FalxError::invalid_model_state(format!(
                    "P(w|C) = {pr_w_c} for class {ci} outside (0, 1]"
                )));
            }

            // Weight by the number of occurrences in the query, clamped so
            // underflow can never zero out the class for good.
            let mut pr_tf = pr_w_c.powf(query_count as f64);
            if pr_tf < MIN_PR_TF {
                pr_tf = MIN_PR_TF;
            }
            let mut log_pr_tf = pr_tf.ln();
            if log_mode {
                log_pr_tf = -log_pr_tf;
            }
            scores[ci] += log_pr_tf;

            if config.log_word_scores {
                debug!(
                    "{:8.2e} {:7.2} {:<40} {:.9}",
                    pr_w_c, log_pr_tf, class.label, scores[ci]
                );
            }

            if rescaler > scores[ci] {
                rescaler = scores[ci];
            }
        }

        // In probability mode, shift all accumulators up whenever the
        // smallest one goes negative. The shift is uniform, so relative
        // ordering is unchanged while the sums stay near zero.
        if !log_mode && rescaler < 0.0 {
            for score in scores.iter_mut() {
                *score += -rescaler;
            }
        }

        Ok(())
    }

    /// Convert accumulators to final scores and optionally normalize.
    fn finish_scores(config: &ScoringConfig, log_mode: bool, scores: &mut [f64]) {
        if log_mode {
            // Entropy-like totals: invert so lower entropy scores higher.
            for score in scores.iter_mut() {
                *score = 1.0 / *score;
            }
        } else {
            // Shift so the best class sits at zero, then exponentiate. The
            // best class maps to exp(0) = 1 and everything else to <= 1, so
            // the conversion cannot overflow.
            let max = scores.iter().cloned().fold(f64::MIN, f64::max);
            for score in scores.iter_mut() {
                *score = (*score - max).exp();
            }
        }

        if config.normalize_final_scores {
            let sum: f64 = scores.iter().sum();
            if sum > 0.0 {
                for score in scores.iter_mut() {
                    *score /= sum;
                }
            }
        }
    }
}
