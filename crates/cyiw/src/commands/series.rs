//! Series command: chosen metrics per file, for line charts.

use clap::Args;
use cyiw_core::Config;
use tracing::{debug, instrument};

use super::{CorpusArgs, format_value, load_corpus, select_metrics};

/// Arguments for the `series` subcommand.
#[derive(Args, Debug)]
pub struct SeriesArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Metrics to include (comma-separated); defaults to the readability indices
    #[arg(short, long, value_delimiter = ',')]
    pub metrics: Vec<String>,
}

/// Print per-file values for the selected metrics.
#[instrument(name = "cmd_series", skip_all, fields(files = args.corpus.files.len()))]
pub fn cmd_series(
    args: SeriesArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let (language, options) = args.corpus.text.resolve(config);
    let metrics = select_metrics(&args.metrics, config, language)?;
    debug!(%language, metrics = metrics.len(), "executing series command");

    let corpus = load_corpus(&args.corpus.files, language, options, max_input_bytes)?;
    let series = corpus.series_for(&metrics)?;

    if global_json {
        println!("{}", serde_json::to_string_pretty(&series)?);
        return Ok(());
    }

    let header: Vec<&str> = metrics.iter().map(|m| m.label()).collect();
    println!("Text\t{}", header.join("\t"));
    for row in &series {
        let values: Vec<String> = metrics
            .iter()
            .map(|m| format_value(*m, row.values.get(m).copied().unwrap_or(f64::NAN)))
            .collect();
        println!("{}\t{}", row.label, values.join("\t"));
    }
    Ok(())
}
