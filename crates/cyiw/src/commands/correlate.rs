//! Correlate command: Pearson matrix between metrics across files.

use clap::Args;
use cyiw_core::{Config, Correlation, CorrelationMatrix};
use tracing::{debug, instrument};

use super::{CorpusArgs, load_corpus, select_metrics};

/// Arguments for the `correlate` subcommand.
#[derive(Args, Debug)]
pub struct CorrelateArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Metrics to correlate (comma-separated); defaults to the readability indices
    #[arg(short, long, value_delimiter = ',')]
    pub metrics: Vec<String>,
}

/// Print the correlation matrix.
#[instrument(name = "cmd_correlate", skip_all, fields(files = args.corpus.files.len()))]
pub fn cmd_correlate(
    args: CorrelateArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let (language, options) = args.corpus.text.resolve(config);
    let metrics = select_metrics(&args.metrics, config, language)?;
    debug!(%language, metrics = metrics.len(), "executing correlate command");

    let corpus = load_corpus(&args.corpus.files, language, options, max_input_bytes)?;
    if corpus.len() < 3 {
        tracing::warn!(
            texts = corpus.len(),
            "fewer than three texts; correlations are undefined or not significant"
        );
    }
    let matrix = corpus.correlation_matrix(&metrics)?;

    if global_json {
        println!("{}", serde_json::to_string_pretty(&matrix)?);
    } else {
        print!("{}", render_matrix(&matrix));
    }
    Ok(())
}

/// Tab-separated block per row variable: coefficients, significance, N.
pub fn render_matrix(matrix: &CorrelationMatrix) -> String {
    let labels: Vec<&str> = matrix.metrics.iter().map(|m| m.label()).collect();
    let mut out = format!(" \t{}\n", labels.join("\t"));

    for (metric, row) in matrix.metrics.iter().zip(&matrix.cells) {
        let join = |f: fn(&Correlation) -> String| -> String {
            row.iter().map(f).collect::<Vec<_>>().join("\t")
        };
        out.push_str(&format!("{}\t{}\n", metric.label(), join(|c| three_places(c.r))));
        out.push_str(&format!("Sig. (2-tailed)\t{}\n", join(|c| three_places(c.p))));
        out.push_str(&format!("N\t{}\n", join(|c| c.n.to_string())));
    }
    out
}

fn three_places(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else {
        format!("{value:.3}")
    }
}
