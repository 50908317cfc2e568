//! File formats for the seqlabel workspace.
//!
//! - **Tabular sequences** — `<index> <state> <observation>` rows, see [`tabular`]
//! - **Model files** — JSON [`ModelSpec`](seqlabel_ml::ModelSpec), see [`model_file`]

pub mod model_file;
pub mod tabular;

pub use model_file::{load_model, load_model_spec, save_model_spec};
pub use tabular::{parse_tabular, parse_tabular_str, LabeledSequence};
