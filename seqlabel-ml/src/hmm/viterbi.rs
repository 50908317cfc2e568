//! Viterbi decoding: the single most probable state path.

use seqlabel_core::{LogProb, Result, Scored, SeqLabelError};

use super::{first_argmax, Decoder, HmmModel};

/// A state-index path with its joint log-probability.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoredPath {
    /// `states[t]` is the state at time `t`.
    pub states: Vec<usize>,
    /// `ln P(states, observations)`.
    pub log_prob: LogProb,
}

impl Scored for ScoredPath {
    fn score(&self) -> f64 {
        self.log_prob.ln()
    }
}

/// Max-product decoder in log-space.
///
/// Ties between predecessors, and between final states, go to the lowest
/// index: a candidate only replaces the running best when strictly greater.
#[derive(Debug, Clone, Copy, Default)]
pub struct Viterbi;

impl Viterbi {
    /// Find the most probable state path and its score.
    ///
    /// # Errors
    ///
    /// - [`SeqLabelError::InvalidInput`] for an empty sequence or an
    ///   out-of-range symbol.
    /// - [`SeqLabelError::ZeroProbability`] if no path can emit the sequence.
    pub fn best_path(&self, model: &HmmModel, observations: &[usize]) -> Result<ScoredPath> {
        model.check_observations(observations)?;

        let n = model.n_states();
        let t_len = observations.len();

        // Initialization
        let o0 = observations[0];
        let mut prev: Vec<f64> = (0..n)
            .map(|s| model.initial(s) + model.emission(s, o0))
            .collect();
        let mut curr = vec![f64::NEG_INFINITY; n];
        let mut psi = vec![0usize; t_len * n];

        // Recursion: column t reads only column t - 1.
        for (t, &ot) in observations.iter().enumerate().skip(1) {
            for next in 0..n {
                let emit = model.emission(next, ot);
                let mut best_val = f64::NEG_INFINITY;
                let mut best_state = 0;
                for (p, &score) in prev.iter().enumerate() {
                    let v = score + (emit + model.transition(p, next));
                    if v > best_val {
                        best_val = v;
                        best_state = p;
                    }
                }
                curr[next] = best_val;
                psi[t * n + next] = best_state;
            }
            std::mem::swap(&mut prev, &mut curr);
        }

        // Termination
        let best_final = first_argmax(&prev).ok_or(SeqLabelError::ZeroProbability)?;
        let best_score = prev[best_final];

        // Backtrack
        let mut states = vec![0usize; t_len];
        states[t_len - 1] = best_final;
        for t in (1..t_len).rev() {
            states[t - 1] = psi[t * n + states[t]];
        }

        Ok(ScoredPath {
            states,
            log_prob: LogProb(best_score),
        })
    }
}

impl Decoder for Viterbi {
    fn name(&self) -> &'static str {
        "viterbi"
    }

    fn decode_indices(&self, model: &HmmModel, observations: &[usize]) -> Result<Vec<usize>> {
        self.best_path(model, observations).map(|p| p.states)
    }
}

impl HmmModel {
    /// Most probable state path for a sequence of observation labels.
    ///
    /// Shorthand for [`Viterbi`]`.decode(self, observations)`.
    pub fn viterbi<S: AsRef<str>>(&self, observations: &[S]) -> Result<Vec<String>> {
        Viterbi.decode(self, observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hmm::fixtures::{all_paths, casino_spec, two_state_spec};
    use crate::hmm::ModelSpec;

    #[test]
    fn two_state_hand_computed_path() {
        let model = HmmModel::new(&two_state_spec()).unwrap();
        assert_eq!(model.viterbi(&["x", "x", "y"]).unwrap(), vec!["A", "A", "B"]);

        let path = Viterbi.best_path(&model, &[0, 0, 1]).unwrap();
        let expected = (0.6f64 * 0.9 * 0.7 * 0.9 * 0.3 * 0.8).ln();
        assert!((path.score() - expected).abs() < 1e-12);
    }

    #[test]
    fn single_symbol_uses_initial_step_only() {
        let model = HmmModel::new(&two_state_spec()).unwrap();
        // x: A = 0.54, B = 0.08; y: A = 0.06, B = 0.32
        assert_eq!(model.viterbi(&["x"]).unwrap(), vec!["A"]);
        assert_eq!(model.viterbi(&["y"]).unwrap(), vec!["B"]);
    }

    #[test]
    fn matches_brute_force_enumeration() {
        let model = HmmModel::new(&two_state_spec()).unwrap();
        for obs in all_paths(2, 5) {
            let best = Viterbi.best_path(&model, &obs).unwrap();
            let brute = all_paths(2, obs.len())
                .iter()
                .map(|p| model.joint_log_prob(p, &obs).unwrap().ln())
                .fold(f64::NEG_INFINITY, f64::max);
            assert!((best.score() - brute).abs() < 1e-9, "obs {obs:?}");
            let rescored = model.joint_log_prob(&best.states, &obs).unwrap().ln();
            assert!((rescored - best.score()).abs() < 1e-9);
        }
    }

    #[test]
    fn ties_go_to_the_lowest_index() {
        let spec = ModelSpec::new()
            .initial("A", 0.5)
            .initial("B", 0.5)
            .transition("A", "A", 0.5)
            .transition("A", "B", 0.5)
            .transition("B", "A", 0.5)
            .transition("B", "B", 0.5)
            .emission("A", "x", 1.0)
            .emission("B", "x", 1.0);
        let model = HmmModel::new(&spec).unwrap();
        assert_eq!(model.viterbi(&["x", "x", "x"]).unwrap(), vec!["A", "A", "A"]);
    }

    #[test]
    fn unreachable_states_are_skipped() {
        let spec = ModelSpec::new()
            .initial("A", 1.0)
            .initial("B", 0.0)
            .transition("A", "A", 1.0)
            .transition("B", "B", 1.0)
            .emission("A", "x", 1.0)
            .emission("B", "x", 0.5)
            .emission("B", "y", 0.5);
        let model = HmmModel::new(&spec).unwrap();
        assert_eq!(model.viterbi(&["x", "x"]).unwrap(), vec!["A", "A"]);
    }

    #[test]
    fn impossible_sequence_is_an_error() {
        let spec = ModelSpec::new()
            .initial("A", 1.0)
            .initial("B", 0.0)
            .transition("A", "A", 1.0)
            .transition("B", "B", 1.0)
            .emission("A", "x", 1.0)
            .emission("B", "y", 1.0);
        let model = HmmModel::new(&spec).unwrap();
        assert!(matches!(
            model.viterbi(&["x", "y"]),
            Err(SeqLabelError::ZeroProbability)
        ));
    }

    #[test]
    fn empty_and_unknown_inputs_are_rejected() {
        let model = HmmModel::new(&two_state_spec()).unwrap();
        assert!(matches!(
            Viterbi.best_path(&model, &[]),
            Err(SeqLabelError::InvalidInput(_))
        ));
        assert!(Viterbi.best_path(&model, &[0, 5]).is_err());
        assert!(matches!(
            model.viterbi(&["x", "z"]),
            Err(SeqLabelError::UnknownLabel { .. })
        ));
    }

    #[test]
    fn decoding_is_idempotent() {
        let model = HmmModel::new(&casino_spec()).unwrap();
        let rolls = ["1", "6", "6", "2", "6", "6", "6", "3", "wild", "4"];
        let first = model.viterbi(&rolls).unwrap();
        let second = model.viterbi(&rolls).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn casino_detects_loaded_run() {
        let model = HmmModel::new(&casino_spec()).unwrap();
        let rolls = [
            "wild", "1", "3", "wild", "2", "5", "6", "6", "6", "6", "6", "6", "6", "6", "wild",
            "2", "wild", "4",
        ];
        let path = model.viterbi(&rolls).unwrap();
        assert!(path[..6].iter().all(|s| s == "fair"), "{path:?}");
        assert!(path[6..14].iter().all(|s| s == "loaded"), "{path:?}");
        assert!(path[14..].iter().all(|s| s == "fair"), "{path:?}");
    }

    #[test]
    fn long_sequences_do_not_underflow() {
        let model = HmmModel::new(&two_state_spec()).unwrap();
        let obs: Vec<usize> = (0..5_000).map(|t| (t / 7) % 2).collect();
        let path = Viterbi.best_path(&model, &obs).unwrap();
        assert_eq!(path.states.len(), obs.len());
        assert!(path.score().is_finite());
    }
}
