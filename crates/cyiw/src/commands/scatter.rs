//! Scatter command: files as points in a two-metric plane.

use clap::Args;
use cyiw_core::{Config, Metric};
use tracing::{debug, instrument};

use super::{CorpusArgs, format_value, load_corpus};

/// Arguments for the `scatter` subcommand.
#[derive(Args, Debug)]
pub struct ScatterArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Metric on the horizontal axis
    #[arg(long, value_name = "METRIC")]
    pub x: String,

    /// Metric on the vertical axis
    #[arg(long, value_name = "METRIC")]
    pub y: String,
}

/// Print `(label, x, y)` for every file.
#[instrument(name = "cmd_scatter", skip_all, fields(x = %args.x, y = %args.y))]
pub fn cmd_scatter(
    args: ScatterArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let x: Metric = args.x.parse()?;
    let y: Metric = args.y.parse()?;
    let (language, options) = args.corpus.text.resolve(config);
    debug!(%language, %x, %y, "executing scatter command");

    let corpus = load_corpus(&args.corpus.files, language, options, max_input_bytes)?;
    let points = corpus.scatter(x, y)?;

    if global_json {
        println!("{}", serde_json::to_string_pretty(&points)?);
        return Ok(());
    }

    println!("Text\t{}\t{}", x.label(), y.label());
    for point in &points {
        println!(
            "{}\t{}\t{}",
            point.label,
            format_value(x, point.x),
            format_value(y, point.y)
        );
    }
    Ok(())
}
