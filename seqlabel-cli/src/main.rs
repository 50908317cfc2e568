use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use seqlabel_cli::{example, write_report, EndMarker, ReportOptions};
use seqlabel_io::{load_model, parse_tabular};
use seqlabel_ml::hmm::{FirstStepBackward, ForwardBackwardConfig};
use seqlabel_ml::HmmModel;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FirstStep {
    /// Condition the first posterior on the whole sequence.
    Computed,
    /// Condition the first posterior on the first observation only.
    Uninformative,
}

impl From<FirstStep> for FirstStepBackward {
    fn from(value: FirstStep) -> Self {
        match value {
            FirstStep::Computed => FirstStepBackward::Computed,
            FirstStep::Uninformative => FirstStepBackward::Uninformative,
        }
    }
}

/// Decode a labelled observation file with Viterbi and forward-backward and
/// report one-vs-rest confusion counts for a class.
#[derive(Debug, Parser)]
#[command(name = "seqlabel", version)]
struct Args {
    /// Whitespace-separated `<index> <state> <observation>` rows after a header line.
    data: PathBuf,

    /// JSON model file. Defaults to the built-in St1/St2 example model.
    #[arg(long, env = "SEQLABEL_MODEL")]
    model: Option<PathBuf>,

    /// State label scored as the positive class.
    #[arg(long, env = "SEQLABEL_CLASS", default_value = "St1")]
    class: String,

    /// End state stripped from each prediction.
    #[arg(long, requires = "end_symbol")]
    end_state: Option<String>,

    /// Symbol appended to the observations to force the end state.
    #[arg(long, requires = "end_state")]
    end_symbol: Option<String>,

    /// Do not append an end marker, even for the built-in model.
    #[arg(long, conflicts_with_all = ["end_state", "end_symbol"])]
    no_end_marker: bool,

    /// Backward-pass treatment of the first position.
    #[arg(long, value_enum, default_value_t = FirstStep::Computed)]
    first_step: FirstStep,
}

impl Args {
    fn end_marker(&self) -> Option<EndMarker> {
        if self.no_end_marker {
            return None;
        }
        match (&self.end_state, &self.end_symbol) {
            (Some(state), Some(symbol)) => Some(EndMarker {
                state: state.clone(),
                symbol: symbol.clone(),
            }),
            _ if self.model.is_none() => Some(EndMarker {
                state: example::END_STATE.to_string(),
                symbol: example::END_SYMBOL.to_string(),
            }),
            _ => None,
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let model = match &args.model {
        Some(path) => load_model(path)
            .with_context(|| format!("failed to load model from {}", path.display()))?,
        None => HmmModel::new(&example::example_model_spec())
            .context("built-in example model is invalid")?,
    };

    let sequence = parse_tabular(&args.data)
        .with_context(|| format!("failed to read {}", args.data.display()))?;
    if sequence.is_empty() {
        tracing::warn!(path = %args.data.display(), "data file has no labelled rows");
    }
    tracing::info!(
        positions = sequence.len(),
        states = model.n_states(),
        symbols = model.n_symbols(),
        class = %args.class,
        "decoding"
    );

    let options = ReportOptions {
        class: args.class.clone(),
        end_marker: args.end_marker(),
        forward_backward: ForwardBackwardConfig {
            first_step: args.first_step.into(),
        },
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &model, &sequence, &options)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
