//! Decode a labelled sequence with each decoder and print its confusion
//! counts for one class.

use std::io::Write;

use anyhow::Context;
use seqlabel_io::LabeledSequence;
use seqlabel_ml::hmm::{Decoder, ForwardBackward, ForwardBackwardConfig, Viterbi};
use seqlabel_ml::{evaluate, Evaluation, HmmModel};

/// Extra position appended to every observation sequence and stripped from
/// every prediction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndMarker {
    pub state: String,
    pub symbol: String,
}

#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Label scored as the positive class.
    pub class: String,
    pub end_marker: Option<EndMarker>,
    pub forward_backward: ForwardBackwardConfig,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            class: "St1".to_string(),
            end_marker: None,
            forward_backward: ForwardBackwardConfig::default(),
        }
    }
}

/// Decode `sequence` and score the prediction against its state labels.
pub fn score_decoder<D: Decoder>(
    decoder: &D,
    model: &HmmModel,
    sequence: &LabeledSequence,
    options: &ReportOptions,
) -> anyhow::Result<Evaluation> {
    // Nothing to decode: the end symbol alone has zero probability.
    if sequence.is_empty() {
        return Ok(Evaluation::default());
    }

    let mut observations = sequence.observations.clone();
    if let Some(end) = &options.end_marker {
        observations.push(end.symbol.clone());
    }

    let mut predicted = decoder
        .decode(model, &observations)
        .with_context(|| format!("{} decoding failed", decoder.name()))?;

    if let Some(end) = &options.end_marker {
        match predicted.pop() {
            Some(last) if last != end.state => {
                tracing::warn!(
                    decoder = decoder.name(),
                    expected = %end.state,
                    found = %last,
                    "prediction does not finish in the end state"
                );
            }
            _ => {}
        }
    }

    let evaluation = evaluate(&predicted, &sequence.states, &options.class)?;
    tracing::debug!(
        decoder = decoder.name(),
        tp = evaluation.true_positives,
        tn = evaluation.true_negatives,
        fp = evaluation.false_positives,
        fn_ = evaluation.false_negatives,
        "scored prediction"
    );
    Ok(evaluation)
}

/// Write one `--- title` block of `name = value` lines.
///
/// An undefined F-score is reported in place rather than aborting the block.
pub fn write_evaluation<W: Write>(
    out: &mut W,
    title: &str,
    evaluation: &Evaluation,
) -> std::io::Result<()> {
    writeln!(out, "--- {title}")?;
    writeln!(out)?;
    match evaluation.f_score() {
        Ok(f) => writeln!(out, "F-score = {f}")?,
        Err(e) => writeln!(out, "F-score = undefined ({e})")?,
    }
    writeln!(out, "FN = {}", evaluation.false_negatives)?;
    writeln!(out, "FP = {}", evaluation.false_positives)?;
    writeln!(out, "TN = {}", evaluation.true_negatives)?;
    writeln!(out, "TP = {}", evaluation.true_positives)?;
    writeln!(out)
}

/// Run both decoders over `sequence` and write their reports to `out`.
pub fn write_report<W: Write>(
    out: &mut W,
    model: &HmmModel,
    sequence: &LabeledSequence,
    options: &ReportOptions,
) -> anyhow::Result<()> {
    let viterbi = score_decoder(&Viterbi, model, sequence, options)?;
    write_evaluation(out, "Viterbi", &viterbi)?;

    let fb = ForwardBackward::new(options.forward_backward);
    let posterior = score_decoder(&fb, model, sequence, options)?;
    write_evaluation(out, "Forward-Backward", &posterior)?;
    Ok(())
}
