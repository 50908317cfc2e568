//! Sequence labeling with discrete Hidden Markov Models.
//!
//! - **HMM decoding** — [`hmm::Viterbi`] paths and [`hmm::ForwardBackward`]
//!   posteriors over a validated, log-space [`hmm::HmmModel`]
//! - **Evaluation** — per-class confusion counts and F-score in [`metrics`]

pub mod hmm;
pub mod metrics;

pub use hmm::{Decoder, ForwardBackward, HmmModel, ModelSpec, Viterbi};
pub use metrics::{evaluate, Evaluation};
