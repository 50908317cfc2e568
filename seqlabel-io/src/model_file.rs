//! JSON model files.
//!
//! A model file is the JSON form of [`ModelSpec`]:
//!
//! ```json
//! {
//!   "initial":    { "A": 0.6, "B": 0.4 },
//!   "transition": { "A": { "A": 0.7, "B": 0.3 }, "B": { "A": 0.4, "B": 0.6 } },
//!   "emission":   { "A": { "x": 0.9, "y": 0.1 }, "B": { "x": 0.2, "y": 0.8 } }
//! }
//! ```

use std::fs;
use std::path::Path;

use seqlabel_core::{Result, SeqLabelError};
use seqlabel_ml::hmm::{HmmModel, ModelSpec};

/// Parse a [`ModelSpec`] from JSON text.
pub fn model_spec_from_str(text: &str) -> Result<ModelSpec> {
    serde_json::from_str(text).map_err(|e| SeqLabelError::Parse(e.to_string()))
}

/// Read a [`ModelSpec`] from a JSON file.
pub fn load_model_spec(path: impl AsRef<Path>) -> Result<ModelSpec> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| {
        SeqLabelError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;
    serde_json::from_str(&text)
        .map_err(|e| SeqLabelError::Parse(format!("{}: {}", path.display(), e)))
}

/// Read and validate a model from a JSON file.
pub fn load_model(path: impl AsRef<Path>) -> Result<HmmModel> {
    let spec = load_model_spec(path)?;
    HmmModel::new(&spec)
}

/// Serialize a [`ModelSpec`] as pretty-printed JSON.
pub fn model_spec_to_string(spec: &ModelSpec) -> Result<String> {
    serde_json::to_string_pretty(spec).map_err(|e| SeqLabelError::Parse(e.to_string()))
}

/// Write a [`ModelSpec`] to a JSON file.
pub fn save_model_spec(spec: &ModelSpec, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let text = model_spec_to_string(spec)?;
    fs::write(path, text).map_err(|e| {
        SeqLabelError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })
}
