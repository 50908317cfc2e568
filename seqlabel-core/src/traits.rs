//! Core trait definitions for the seqlabel workspace.

/// A probability vector or matrix whose entries (rows) sum to exactly one.
///
/// The comparison is exact: the elements are summed in index order and the
/// result must equal `1.0`. No tolerance is applied.
pub trait Stochastic {
    /// Whether the value is a stochastic vector, or every row is.
    fn is_stochastic(&self) -> bool;
}

impl Stochastic for [f64] {
    fn is_stochastic(&self) -> bool {
        self.iter().sum::<f64>() == 1.0
    }
}

impl Stochastic for Vec<f64> {
    fn is_stochastic(&self) -> bool {
        self.as_slice().is_stochastic()
    }
}

impl Stochastic for [Vec<f64>] {
    fn is_stochastic(&self) -> bool {
        self.iter().all(|row| row.is_stochastic())
    }
}

impl Stochastic for Vec<Vec<f64>> {
    fn is_stochastic(&self) -> bool {
        self.as_slice().is_stochastic()
    }
}

/// A type that carries a log-probability score.
pub trait Scored {
    /// The natural-log score.
    fn score(&self) -> f64;
}
