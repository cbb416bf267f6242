//! Analyze command: statistics for individual files.

use camino::Utf8PathBuf;
use clap::Args;
use cyiw_core::{Config, Metric, TableRow, compute_metrics};
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use super::{TextArgs, file_label, format_value, read_input_file};

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Files to analyze.
    #[arg(required = true, num_args = 1..)]
    pub files: Vec<Utf8PathBuf>,

    #[command(flatten)]
    pub text: TextArgs,
}

/// Compute and print a metrics record for every file.
#[instrument(name = "cmd_analyze", skip_all, fields(files = args.files.len()))]
pub fn cmd_analyze(
    args: AnalyzeArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let (language, options) = args.text.resolve(config);
    debug!(%language, ?options, "executing analyze command");

    let mut rows = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let text = read_input_file(path, max_input_bytes)?;
        rows.push(TableRow {
            label: file_label(path),
            metrics: compute_metrics(&text, language, options),
        });
    }

    if global_json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let columns = Metric::table_columns(language);
    let width = columns.iter().map(|m| m.label().len()).max().unwrap_or(0);
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{} {}", row.label.bold(), format!("({language})").dimmed());
        for metric in &columns {
            let value = row.metrics.value_or_nan(*metric);
            let name = format!("{:<width$}", metric.label());
            println!("  {}  {}", name.dimmed(), format_value(*metric, value));
        }
    }

    Ok(())
}
