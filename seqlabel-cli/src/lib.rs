//! Library half of the `seqlabel` command: the built-in example model and
//! the decode-and-score report.

pub mod example;
pub mod report;

pub use example::{example_model_spec, END_STATE, END_SYMBOL};
pub use report::{score_decoder, write_evaluation, write_report, EndMarker, ReportOptions};
