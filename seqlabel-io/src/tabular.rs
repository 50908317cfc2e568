//! Whitespace-separated labelled sequence files.
//!
//! The first line is a header and is skipped. Every following non-blank line
//! holds `<index> <state> <observation>`; the index column is positional
//! bookkeeping and is not interpreted. Extra trailing columns are ignored.
//!
//! ```text
//! #   state   roll
//! 1   St1     b
//! 2   St2     a
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use seqlabel_core::{Result, SeqLabelError};

/// Parallel hidden-state and observation label sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabeledSequence {
    pub states: Vec<String>,
    pub observations: Vec<String>,
}

impl LabeledSequence {
    /// Number of positions.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Append one position.
    pub fn push(&mut self, state: impl Into<String>, observation: impl Into<String>) {
        self.states.push(state.into());
        self.observations.push(observation.into());
    }
}

/// Parse a labelled sequence file.
pub fn parse_tabular(path: impl AsRef<Path>) -> Result<LabeledSequence> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        SeqLabelError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;
    let reader = BufReader::new(file);

    let mut seq = LabeledSequence::default();
    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|e| {
            SeqLabelError::Io(std::io::Error::new(
                e.kind(),
                format!("{}: line {}: {}", path.display(), line_num + 1, e),
            ))
        })?;
        if line_num == 0 || line.trim().is_empty() {
            continue;
        }
        let (state, observation) = parse_line(&line, line_num + 1, path)?;
        seq.push(state, observation);
    }

    tracing::debug!(path = %path.display(), positions = seq.len(), "read labelled sequence");
    Ok(seq)
}

/// Parse labelled sequence text from a string.
///
/// Behaves like [`parse_tabular`] but reads from an in-memory string.
pub fn parse_tabular_str(text: &str) -> Result<LabeledSequence> {
    let dummy = Path::new("<string>");
    let mut seq = LabeledSequence::default();
    for (line_num, line) in text.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let (state, observation) = parse_line(line, line_num + 1, dummy)?;
        seq.push(state, observation);
    }
    Ok(seq)
}

fn parse_line<'a>(line: &'a str, line_num: usize, path: &Path) -> Result<(&'a str, &'a str)> {
    let mut fields = line.split_whitespace();
    match (fields.next(), fields.next(), fields.next()) {
        (Some(_index), Some(state), Some(observation)) => Ok((state, observation)),
        _ => Err(SeqLabelError::Parse(format!(
            "{}: line {}: expected `<index> <state> <observation>`, got {:?}",
            path.display(),
            line_num,
            line.trim()
        ))),
    }
}
