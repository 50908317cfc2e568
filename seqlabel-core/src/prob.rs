//! Log-space probability arithmetic.
//!
//! Probabilities are carried as natural logarithms so that long products of
//! small values do not underflow. `ln(0) = -∞` is the additive identity of
//! [`log_add`].

/// Numerically stable `ln(exp(x) + exp(y))`.
///
/// A non-finite operand stands for `ln(0)` and the other operand is returned
/// unchanged. Otherwise the larger operand is factored out so the exponent
/// argument is never positive.
#[inline]
pub fn log_add(x: f64, y: f64) -> f64 {
    if !x.is_finite() {
        return y;
    }
    if !y.is_finite() {
        return x;
    }
    let (max, min) = if x >= y { (x, y) } else { (y, x) };
    max + (min - max).exp().ln_1p()
}

/// Fold [`log_add`] over a sequence, starting from `ln(0)`.
pub fn log_sum<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().fold(f64::NEG_INFINITY, log_add)
}

/// `ln(p)` for a probability `p`.
///
/// Scores produced by the decoders are wrapped in this type so callers can
/// tell a log value from a linear one. `-∞` marks a zero-probability event.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogProb(pub f64);

impl LogProb {
    /// The raw natural-log value.
    #[inline]
    pub fn ln(self) -> f64 {
        self.0
    }

    /// `exp` of the stored value.
    pub fn to_prob(self) -> f64 {
        self.0.exp()
    }

    /// `ln(0)`.
    pub const fn impossible() -> Self {
        Self(f64::NEG_INFINITY)
    }

    pub fn is_impossible(self) -> bool {
        self.0 == f64::NEG_INFINITY
    }
}

impl From<LogProb> for f64 {
    fn from(lp: LogProb) -> Self {
        lp.0
    }
}
