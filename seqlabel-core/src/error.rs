//! Structured error types for the seqlabel workspace.

use core::fmt;

use thiserror::Error;

/// Which probability table of a model failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProbabilityTable {
    Initial,
    Transition,
    Emission,
}

impl fmt::Display for ProbabilityTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Initial => "initial",
            Self::Transition => "transition",
            Self::Emission => "emission",
        })
    }
}

/// The alphabet a label was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LabelKind {
    State,
    Observation,
}

impl fmt::Display for LabelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::State => "state",
            Self::Observation => "observation",
        })
    }
}

/// Unified error type for all seqlabel operations.
#[derive(Debug, Error)]
pub enum SeqLabelError {
    /// I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error (malformed input data)
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid input (bad arguments, out-of-range values)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A probability table handed to model construction is not stochastic.
    #[error("{table} probabilities are wrong: row {row} {reason}")]
    ModelValidation {
        table: ProbabilityTable,
        row: usize,
        reason: String,
    },

    /// A label is not part of the model's alphabet.
    #[error("unknown {kind} label {label:?}")]
    UnknownLabel { kind: LabelKind, label: String },

    /// Predicted and actual label sequences differ in length.
    #[error("lengths of predicted ({predicted}) and actual ({actual}) sequences are different")]
    LengthMismatch { predicted: usize, actual: usize },

    /// A metric's denominator is zero.
    #[error("{metric} is undefined: denominator is zero")]
    DegenerateMetric { metric: &'static str },

    /// No state path can produce the observation sequence.
    #[error("observation sequence has zero probability under the model")]
    ZeroProbability,
}

impl SeqLabelError {
    /// Shorthand for [`SeqLabelError::UnknownLabel`].
    pub fn unknown_label(kind: LabelKind, label: impl Into<String>) -> Self {
        Self::UnknownLabel {
            kind,
            label: label.into(),
        }
    }
}

/// Convenience alias used throughout the seqlabel workspace.
pub type Result<T> = std::result::Result<T, SeqLabelError>;
