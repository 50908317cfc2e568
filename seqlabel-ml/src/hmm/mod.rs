//! Hidden Markov Models for sequence labeling.
//!
//! A discrete first-order HMM is built once from linear-space probability
//! tables ([`ModelSpec`]), validated, and stored in natural-log space. Two
//! decoders recover hidden states from an observation sequence:
//!
//! - [`Viterbi`] — the single most probable state path;
//! - [`ForwardBackward`] — the most probable state at each position under
//!   the posterior marginal.
//!
//! All computations stay in log-space to avoid underflow on long sequences.
//!
//! # Quick start
//!
//! ```
//! use seqlabel_ml::hmm::{Decoder, HmmModel, ModelSpec, Viterbi};
//!
//! let spec = ModelSpec::new()
//!     .initial("A", 0.6)
//!     .initial("B", 0.4)
//!     .transition("A", "A", 0.7)
//!     .transition("A", "B", 0.3)
//!     .transition("B", "A", 0.4)
//!     .transition("B", "B", 0.6)
//!     .emission("A", "x", 0.9)
//!     .emission("A", "y", 0.1)
//!     .emission("B", "x", 0.2)
//!     .emission("B", "y", 0.8);
//!
//! let model = HmmModel::new(&spec).unwrap();
//! let path = Viterbi.decode(&model, &["x", "x", "y"]).unwrap();
//! assert_eq!(path, vec!["A", "A", "B"]);
//! ```

pub mod alphabet;
pub mod forward_backward;
pub mod model;
pub mod viterbi;

pub use alphabet::Alphabet;
pub use forward_backward::{FirstStepBackward, ForwardBackward, ForwardBackwardConfig, Posterior};
pub use model::{HmmModel, ModelSpec};
pub use viterbi::{ScoredPath, Viterbi};

use seqlabel_core::Result;

/// Recovers a hidden state sequence from observations under a fixed model.
///
/// Implementors work on symbol indices; [`decode`](Decoder::decode) wraps
/// them with the model's label mapping.
pub trait Decoder {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Decode symbol indices into state indices of the same length.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty sequence, an out-of-range symbol, or a
    /// sequence no state path can produce.
    fn decode_indices(&self, model: &HmmModel, observations: &[usize]) -> Result<Vec<usize>>;

    /// Decode observation labels into state labels.
    ///
    /// # Errors
    ///
    /// As [`decode_indices`](Decoder::decode_indices), plus
    /// [`UnknownLabel`](seqlabel_core::SeqLabelError::UnknownLabel) for a
    /// label outside the model's observation alphabet.
    fn decode<S: AsRef<str>>(&self, model: &HmmModel, observations: &[S]) -> Result<Vec<String>>
    where
        Self: Sized,
    {
        tracing::trace!(
            decoder = self.name(),
            len = observations.len(),
            "decoding observation sequence"
        );
        let indices = model.encode_observations(observations)?;
        let states = self.decode_indices(model, &indices)?;
        model.decode_states(&states)
    }
}

/// Index of the first maximum under strict `>`; `None` if every value is
/// `-∞` (or the slice is empty).
pub(crate) fn first_argmax(values: &[f64]) -> Option<usize> {
    let mut best = f64::NEG_INFINITY;
    let mut best_index = None;
    for (i, &v) in values.iter().enumerate() {
        if v > best {
            best = v;
            best_index = Some(i);
        }
    }
    best_index
}
