//! Forward-backward posterior (max-marginal) decoding.
//!
//! The forward table `alpha[t][s]` is `ln P(o_0..o_t, state_t = s)`, the
//! backward table `beta[t][s]` is `ln P(o_{t+1}..o_{L-1} | state_t = s)`, and
//! their normalized sum is the posterior `ln P(state_t = s | o_0..o_{L-1})`.
//! Decoding picks the most probable state per position; the result need not
//! be a path the transition matrix allows.

use seqlabel_core::{log_sum, LogProb, Result, SeqLabelError};

use super::{first_argmax, Decoder, HmmModel};

/// How the backward pass treats the first position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FirstStepBackward {
    /// Run the recursion down to `t = 0`, so the first posterior is
    /// conditioned on the whole sequence.
    #[default]
    Computed,
    /// Leave `beta[0]` at `ln 1 = 0`. The first posterior is then the
    /// normalized forward column, conditioned on `o_0` alone.
    Uninformative,
}

/// Options for [`ForwardBackward`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForwardBackwardConfig {
    pub first_step: FirstStepBackward,
}

/// Per-position state posteriors in log-space, one row per time step.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Posterior {
    table: Vec<Vec<f64>>,
}

impl Posterior {
    /// Number of time steps.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// `ln P(state_t = s | observations)` for every `s`.
    pub fn row(&self, t: usize) -> &[f64] {
        &self.table[t]
    }

    /// `P(state_t = state | observations)` as a [`LogProb`].
    pub fn get(&self, t: usize, state: usize) -> LogProb {
        LogProb(self.table[t][state])
    }

    /// Iterate over rows in time order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.table.iter().map(Vec::as_slice)
    }

    /// Most probable state at each position (first index wins ties).
    pub fn most_probable_states(&self) -> Result<Vec<usize>> {
        self.rows()
            .map(|row| first_argmax(row).ok_or(SeqLabelError::ZeroProbability))
            .collect()
    }
}

/// Forward-backward decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardBackward {
    config: ForwardBackwardConfig,
}

impl ForwardBackward {
    pub fn new(config: ForwardBackwardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForwardBackwardConfig {
        &self.config
    }

    /// Run the forward algorithm in log-space.
    ///
    /// # Errors
    ///
    /// Returns an error for empty or invalid observation sequences.
    pub fn forward(&self, model: &HmmModel, observations: &[usize]) -> Result<Vec<Vec<f64>>> {
        model.check_observations(observations)?;

        let n = model.n_states();
        let mut alpha: Vec<Vec<f64>> = Vec::with_capacity(observations.len());

        let o0 = observations[0];
        alpha.push(
            (0..n)
                .map(|s| model.initial(s) + model.emission(s, o0))
                .collect(),
        );

        for &ot in &observations[1..] {
            let last = &alpha[alpha.len() - 1];
            let column = (0..n)
                .map(|j| {
                    let into_j = log_sum((0..n).map(|i| last[i] + model.transition(i, j)));
                    into_j + model.emission(j, ot)
                })
                .collect();
            alpha.push(column);
        }

        Ok(alpha)
    }

    /// Run the backward algorithm in log-space.
    ///
    /// `beta[L-1]` is `ln 1 = 0`; whether `beta[0]` is computed depends on
    /// [`FirstStepBackward`].
    ///
    /// # Errors
    ///
    /// Returns an error for empty or invalid observation sequences.
    pub fn backward(&self, model: &HmmModel, observations: &[usize]) -> Result<Vec<Vec<f64>>> {
        model.check_observations(observations)?;

        let n = model.n_states();
        let t_len = observations.len();
        let mut beta = vec![vec![0.0f64; n]; t_len];

        let lowest = match self.config.first_step {
            FirstStepBackward::Computed => 0,
            FirstStepBackward::Uninformative => 1,
        };

        for t in (lowest..t_len.saturating_sub(1)).rev() {
            let ot1 = observations[t + 1];
            for i in 0..n {
                let next = &beta[t + 1];
                beta[t][i] = log_sum(
                    (0..n).map(|j| model.transition(i, j) + next[j] + model.emission(j, ot1)),
                );
            }
        }

        Ok(beta)
    }

    /// Normalized posterior table.
    ///
    /// # Errors
    ///
    /// Returns [`SeqLabelError::ZeroProbability`] if some position has zero
    /// total probability, plus the input errors of [`forward`](Self::forward).
    pub fn posterior(&self, model: &HmmModel, observations: &[usize]) -> Result<Posterior> {
        let alpha = self.forward(model, observations)?;
        let beta = self.backward(model, observations)?;

        let table = alpha
            .iter()
            .zip(&beta)
            .map(|(a, b)| {
                let joint: Vec<f64> = a.iter().zip(b).map(|(x, y)| x + y).collect();
                let norm = LogProb(log_sum(joint.iter().copied()));
                if norm.is_impossible() {
                    return Err(SeqLabelError::ZeroProbability);
                }
                Ok(joint.into_iter().map(|v| v - norm.ln()).collect())
            })
            .collect::<Result<Vec<Vec<f64>>>>()?;

        Ok(Posterior { table })
    }

    /// `ln P(observations)`: the log-sum of the last forward column.
    pub fn log_likelihood(&self, model: &HmmModel, observations: &[usize]) -> Result<LogProb> {
        let alpha = self.forward(model, observations)?;
        let last = alpha.last().map(|col| LogProb(log_sum(col.iter().copied())));
        Ok(last.unwrap_or(LogProb::impossible()))
    }
}

impl Decoder for ForwardBackward {
    fn name(&self) -> &'static str {
        "forward-backward"
    }

    fn decode_indices(&self, model: &HmmModel, observations: &[usize]) -> Result<Vec<usize>> {
        self.posterior(model, observations)?.most_probable_states()
    }
}

impl HmmModel {
    /// Most probable state at each position, using the default
    /// [`ForwardBackwardConfig`].
    pub fn forward_backward<S: AsRef<str>>(&self, observations: &[S]) -> Result<Vec<String>> {
        ForwardBackward::default().decode(self, observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hmm::fixtures::{all_paths, casino_spec, two_state_spec};
    use crate::hmm::ModelSpec;
    use seqlabel_core::log_add;

    fn literal() -> ForwardBackward {
        ForwardBackward::new(ForwardBackwardConfig {
            first_step: FirstStepBackward::Uninformative,
        })
    }

    #[test]
    fn posterior_rows_sum_to_one() {
        let model = HmmModel::new(&casino_spec()).unwrap();
        let obs = model
            .encode_observations(&["1", "6", "6", "wild", "6", "2", "6", "6", "3"])
            .unwrap();
        for fb in [ForwardBackward::default(), literal()] {
            let post = fb.posterior(&model, &obs).unwrap();
            assert_eq!(post.len(), obs.len());
            for row in post.rows() {
                let total: f64 = row.iter().map(|v| v.exp()).sum();
                assert!((total - 1.0).abs() < 1e-9, "row sums to {total}");
            }
        }
    }

    #[test]
    fn forward_and_backward_agree_on_likelihood() {
        let model = HmmModel::new(&two_state_spec()).unwrap();
        let obs = vec![0, 1, 0, 0, 1, 0];
        let fb = ForwardBackward::default();

        let alpha = fb.forward(&model, &obs).unwrap();
        let beta = fb.backward(&model, &obs).unwrap();
        let ll = fb.log_likelihood(&model, &obs).unwrap().ln();

        for t in 0..obs.len() {
            let at_t = log_sum((0..2).map(|s| alpha[t][s] + beta[t][s]));
            assert!((at_t - ll).abs() < 1e-9, "t = {t}");
        }
    }

    #[test]
    fn likelihood_matches_brute_force() {
        let model = HmmModel::new(&two_state_spec()).unwrap();
        let obs = vec![0, 0, 1, 1];
        let brute = all_paths(2, obs.len())
            .iter()
            .map(|p| model.joint_log_prob(p, &obs).unwrap().ln())
            .fold(f64::NEG_INFINITY, log_add);
        let ll = ForwardBackward::default().log_likelihood(&model, &obs).unwrap();
        assert!((ll.ln() - brute).abs() < 1e-9);
    }

    #[test]
    fn posterior_matches_brute_force_marginals() {
        let model = HmmModel::new(&two_state_spec()).unwrap();
        let obs = vec![0, 1, 1, 0];
        let post = ForwardBackward::default().posterior(&model, &obs).unwrap();
        let paths = all_paths(2, obs.len());
        let total = paths
            .iter()
            .map(|p| model.joint_log_prob(p, &obs).unwrap().ln())
            .fold(f64::NEG_INFINITY, log_add);
        for t in 0..obs.len() {
            for s in 0..2 {
                let marginal = paths
                    .iter()
                    .filter(|p| p[t] == s)
                    .map(|p| model.joint_log_prob(p, &obs).unwrap().ln())
                    .fold(f64::NEG_INFINITY, log_add);
                assert!((post.get(t, s).ln() - (marginal - total)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn uninformative_first_step_uses_forward_only() {
        let model = HmmModel::new(&two_state_spec()).unwrap();
        let obs = vec![0, 1, 1];
        let post = literal().posterior(&model, &obs).unwrap();
        let beta = literal().backward(&model, &obs).unwrap();
        assert_eq!(beta[0], vec![0.0, 0.0]);

        // Filtered probability at t = 0: proportional to pi * B(x).
        let a = 0.6 * 0.9;
        let b = 0.4 * 0.2;
        assert!((post.get(0, 0).to_prob() - a / (a + b)).abs() < 1e-12);

        // Later positions are unaffected by the first-step policy.
        let full = ForwardBackward::default().posterior(&model, &obs).unwrap();
        for t in 1..obs.len() {
            for s in 0..2 {
                assert!((post.get(t, s).ln() - full.get(t, s).ln()).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn first_step_policies_can_disagree() {
        // A and B emit x equally, but only B can go on to emit y.
        let spec = ModelSpec::new()
            .initial("A", 0.6)
            .initial("B", 0.4)
            .transition("A", "A", 1.0)
            .transition("B", "B", 1.0)
            .emission("A", "x", 1.0)
            .emission("B", "x", 0.5)
            .emission("B", "y", 0.5);
        let model = HmmModel::new(&spec).unwrap();
        let obs = ["x", "y"];

        let computed = ForwardBackward::default().decode(&model, &obs).unwrap();
        assert_eq!(computed, vec!["B", "B"]);

        let uninformative = literal().decode(&model, &obs).unwrap();
        assert_eq!(uninformative, vec!["A", "B"]);
    }

    #[test]
    fn single_symbol_posterior_is_filtered() {
        let model = HmmModel::new(&two_state_spec()).unwrap();
        assert_eq!(model.forward_backward(&["x"]).unwrap(), vec!["A"]);
        assert_eq!(model.forward_backward(&["y"]).unwrap(), vec!["B"]);
    }

    #[test]
    fn decoding_is_idempotent() {
        let model = HmmModel::new(&casino_spec()).unwrap();
        let rolls = ["6", "6", "1", "6", "6", "6", "2", "3"];
        assert_eq!(
            model.forward_backward(&rolls).unwrap(),
            model.forward_backward(&rolls).unwrap()
        );
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
            model.forward_backward(&["x", "y"]),
            Err(SeqLabelError::ZeroProbability)
        ));
        let fb = ForwardBackward::default();
        assert!(fb.log_likelihood(&model, &[0, 1]).unwrap().is_impossible());
        assert!(!fb.log_likelihood(&model, &[0, 0]).unwrap().is_impossible());
    }

    #[test]
    fn empty_sequence_is_rejected() {
        let model = HmmModel::new(&two_state_spec()).unwrap();
        let fb = ForwardBackward::default();
        assert!(fb.forward(&model, &[]).is_err());
        assert!(fb.backward(&model, &[]).is_err());
        assert!(fb.posterior(&model, &[]).is_err());
        assert!(fb.log_likelihood(&model, &[]).is_err());
    }

    #[test]
    fn long_sequences_stay_normalized() {
        let model = HmmModel::new(&two_state_spec()).unwrap();
        let obs: Vec<usize> = (0..4_000).map(|t| (t / 5) % 2).collect();
        let post = ForwardBackward::default().posterior(&model, &obs).unwrap();
        let last: f64 = post.row(obs.len() - 1).iter().map(|v| v.exp()).sum();
        assert!((last - 1.0).abs() < 1e-9);
    }
}
