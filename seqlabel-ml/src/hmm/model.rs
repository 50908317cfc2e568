//! Model construction: validated probability tables in natural-log space.

use std::collections::BTreeMap;

use seqlabel_core::{LabelKind, LogProb, ProbabilityTable, Result, SeqLabelError, Stochastic};

use super::alphabet::Alphabet;

// ---------------------------------------------------------------------------
// ModelSpec
// ---------------------------------------------------------------------------

/// Linear-space probability tables a [`HmmModel`] is built from.
///
/// The keys of `initial` enumerate the states; the symbol keys of `emission`
/// enumerate the observations. Entries that are absent are probability 0.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelSpec {
    /// `P(first state = s)`.
    pub initial: BTreeMap<String, f64>,
    /// `P(next = to | current = from)`, keyed `from → to`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub transition: BTreeMap<String, BTreeMap<String, f64>>,
    /// `P(symbol | state)`, keyed `state → symbol`.
    pub emission: BTreeMap<String, BTreeMap<String, f64>>,
}

impl ModelSpec {
    /// An empty spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial probability of `state`.
    pub fn initial(mut self, state: impl Into<String>, p: f64) -> Self {
        self.initial.insert(state.into(), p);
        self
    }

    /// Set the probability of moving from `from` to `to`.
    pub fn transition(mut self, from: impl Into<String>, to: impl Into<String>, p: f64) -> Self {
        self.transition
            .entry(from.into())
            .or_default()
            .insert(to.into(), p);
        self
    }

    /// Set the probability that `state` emits `symbol`.
    pub fn emission(mut self, state: impl Into<String>, symbol: impl Into<String>, p: f64) -> Self {
        self.emission
            .entry(state.into())
            .or_default()
            .insert(symbol.into(), p);
        self
    }
}

// ---------------------------------------------------------------------------
// HmmModel
// ---------------------------------------------------------------------------

/// A discrete first-order Hidden Markov Model.
///
/// Parameters are validated in probability space and then stored as natural
/// logarithms. The model has no interior mutability and can be shared by
/// reference between threads.
#[derive(Debug, Clone)]
pub struct HmmModel {
    states: Alphabet,
    observations: Alphabet,
    /// `ln pi[i]`, length `n_states`.
    initial: Vec<f64>,
    /// `ln A[i][j]`, row-major `n_states * n_states`.
    transition: Vec<f64>,
    /// `ln B[i][k]`, row-major `n_states * n_symbols`.
    emission: Vec<f64>,
}

impl HmmModel {
    /// Validate `spec` and build the model.
    ///
    /// # Errors
    ///
    /// - [`SeqLabelError::UnknownLabel`] if a transition or emission row names
    ///   a state missing from `spec.initial`, or a transition target is missing.
    /// - [`SeqLabelError::ModelValidation`] if an entry is outside `[0, 1]` or a
    ///   row does not sum to exactly 1. Tables are checked in the order
    ///   initial, transition, emission.
    pub fn new(spec: &ModelSpec) -> Result<Self> {
        let states = Alphabet::new(LabelKind::State, spec.initial.keys().cloned());
        let observations = Alphabet::new(
            LabelKind::Observation,
            spec.emission.values().flat_map(|row| row.keys().cloned()),
        );
        let n = states.len();
        let m = observations.len();

        let mut initial = vec![0.0; n];
        for (state, &p) in &spec.initial {
            initial[states.index_of(state)?] = p;
        }

        let mut transition = vec![vec![0.0; n]; n];
        for (from, row) in &spec.transition {
            let i = states.index_of(from)?;
            for (to, &p) in row {
                transition[i][states.index_of(to)?] = p;
            }
        }

        let mut emission = vec![vec![0.0; m]; n];
        for (state, row) in &spec.emission {
            let i = states.index_of(state)?;
            for (symbol, &p) in row {
                emission[i][observations.index_of(symbol)?] = p;
            }
        }

        validate_table(ProbabilityTable::Initial, std::slice::from_ref(&initial))?;
        validate_table(ProbabilityTable::Transition, &transition)?;
        validate_table(ProbabilityTable::Emission, &emission)?;

        tracing::debug!(n_states = n, n_symbols = m, "built hidden Markov model");

        Ok(Self {
            states,
            observations,
            initial: initial.into_iter().map(f64::ln).collect(),
            transition: transition.into_iter().flatten().map(f64::ln).collect(),
            emission: emission.into_iter().flatten().map(f64::ln).collect(),
        })
    }

    /// Number of hidden states.
    pub fn n_states(&self) -> usize {
        self.states.len()
    }

    /// Number of observable symbols.
    pub fn n_symbols(&self) -> usize {
        self.observations.len()
    }

    /// The state alphabet.
    pub fn states(&self) -> &Alphabet {
        &self.states
    }

    /// The observation alphabet.
    pub fn observations(&self) -> &Alphabet {
        &self.observations
    }

    /// `ln P(first state = state)`.
    #[inline]
    pub fn initial(&self, state: usize) -> f64 {
        self.initial[state]
    }

    /// `ln P(to | from)`.
    #[inline]
    pub fn transition(&self, from: usize, to: usize) -> f64 {
        self.transition[from * self.n_states() + to]
    }

    /// `ln P(symbol | state)`.
    #[inline]
    pub fn emission(&self, state: usize, symbol: usize) -> f64 {
        self.emission[state * self.n_symbols() + symbol]
    }

    /// The log-space initial vector.
    pub fn initial_row(&self) -> &[f64] {
        &self.initial
    }

    /// Outgoing log transition probabilities of `from`.
    pub fn transition_row(&self, from: usize) -> &[f64] {
        let n = self.n_states();
        &self.transition[from * n..(from + 1) * n]
    }

    /// Log emission probabilities of `state`.
    pub fn emission_row(&self, state: usize) -> &[f64] {
        let m = self.n_symbols();
        &self.emission[state * m..(state + 1) * m]
    }

    /// Map observation labels to symbol indices.
    ///
    /// # Errors
    ///
    /// Returns [`SeqLabelError::UnknownLabel`] for a label outside the alphabet.
    pub fn encode_observations<S: AsRef<str>>(&self, observations: &[S]) -> Result<Vec<usize>> {
        self.observations.encode(observations)
    }

    /// Map state indices back to state labels.
    pub fn decode_states(&self, states: &[usize]) -> Result<Vec<String>> {
        self.states.decode(states)
    }

    /// Reject empty sequences and out-of-range symbols.
    pub fn check_observations(&self, observations: &[usize]) -> Result<()> {
        if observations.is_empty() {
            return Err(SeqLabelError::InvalidInput(
                "observation sequence is empty".into(),
            ));
        }
        for (t, &o) in observations.iter().enumerate() {
            if o >= self.n_symbols() {
                return Err(SeqLabelError::InvalidInput(format!(
                    "observation[{t}] = {o} out of range (n_symbols = {})",
                    self.n_symbols()
                )));
            }
        }
        Ok(())
    }

    /// Joint log-probability of a state path together with the observations.
    ///
    /// # Errors
    ///
    /// Returns an error if the lengths differ or an index is out of range.
    pub fn joint_log_prob(&self, states: &[usize], observations: &[usize]) -> Result<LogProb> {
        self.check_observations(observations)?;
        if states.len() != observations.len() {
            return Err(SeqLabelError::InvalidInput(format!(
                "path length {} != observation length {}",
                states.len(),
                observations.len()
            )));
        }
        if let Some(&s) = states.iter().find(|&&s| s >= self.n_states()) {
            return Err(SeqLabelError::InvalidInput(format!(
                "state {s} out of range (n_states = {})",
                self.n_states()
            )));
        }

        let mut score = self.initial(states[0]) + self.emission(states[0], observations[0]);
        for t in 1..states.len() {
            let (from, to) = (states[t - 1], states[t]);
            score += self.transition(from, to) + self.emission(to, observations[t]);
        }
        Ok(LogProb(score))
    }
}

/// Check that every entry is a probability and every row is stochastic.
fn validate_table(table: ProbabilityTable, rows: &[Vec<f64>]) -> Result<()> {
    for (row, values) in rows.iter().enumerate() {
        if let Some((col, &p)) = values
            .iter()
            .enumerate()
            .find(|(_, p)| !(0.0..=1.0).contains(*p))
        {
            return Err(SeqLabelError::ModelValidation {
                table,
                row,
                reason: format!("has {p} at column {col}, outside [0, 1]"),
            });
        }
    }
    if !rows.is_stochastic() {
        let (row, sum) = rows
            .iter()
            .map(|r| r.iter().sum::<f64>())
            .enumerate()
            .find(|(_, sum)| *sum != 1.0)
            .unwrap_or((0, f64::NAN));
        return Err(SeqLabelError::ModelValidation {
            table,
            row,
            reason: format!("sums to {sum}, expected exactly 1"),
        });
    }
    Ok(())
}
