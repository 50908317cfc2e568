//! Built-in two-state example model.
//!
//! Two hidden states `St1` and `St2` emit symbols `a`, `b`, `c`. An absorbing
//! end state `E` is reachable from both; it emits only `_` and never starts a
//! sequence. Appending `_` to an observation sequence therefore forces every
//! decoded path to finish in `E`.

use seqlabel_ml::ModelSpec;

/// Label of the absorbing end state.
pub const END_STATE: &str = "E";
/// Symbol emitted only by [`END_STATE`].
pub const END_SYMBOL: &str = "_";

/// Probability tables of the example model.
pub fn example_model_spec() -> ModelSpec {
    ModelSpec::new()
        .initial("St1", 0.526)
        .initial("St2", 0.474)
        .initial(END_STATE, 0.0)
        .transition("St1", "St1", 0.969)
        .transition("St1", "St2", 0.029)
        .transition("St1", END_STATE, 0.002)
        .transition("St2", "St1", 0.063)
        .transition("St2", "St2", 0.935)
        .transition("St2", END_STATE, 0.002)
        .transition(END_STATE, END_STATE, 1.0)
        .emission("St1", "a", 0.005)
        .emission("St1", "b", 0.775)
        .emission("St1", "c", 0.220)
        .emission("St2", "a", 0.604)
        .emission("St2", "b", 0.277)
        .emission("St2", "c", 0.119)
        .emission(END_STATE, END_SYMBOL, 1.0)
}
