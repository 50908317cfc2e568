//! Shared primitives for the seqlabel workspace.
//!
//! `seqlabel-core` provides the foundation the other seqlabel crates build on:
//!
//! - **Error types** — [`SeqLabelError`] and [`Result`] for structured error handling
//! - **Log-space arithmetic** — [`log_add`], [`log_sum`] and [`LogProb`]
//! - **Traits** — [`Stochastic`] row-sum validation, [`Scored`]

pub mod error;
pub mod prob;
pub mod traits;

pub use error::{LabelKind, ProbabilityTable, Result, SeqLabelError};
pub use prob::{log_add, log_sum, LogProb};
pub use traits::*;
