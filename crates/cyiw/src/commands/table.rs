//! Table command: one tab-separated row per file, ready for a spreadsheet.

use clap::Args;
use cyiw_core::{Config, Metric, TableRow};
use tracing::{debug, instrument};

use super::{CorpusArgs, format_value, load_corpus};

/// Arguments for the `table` subcommand.
#[derive(Args, Debug)]
pub struct TableArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,
}

/// Print the corpus table export.
#[instrument(name = "cmd_table", skip_all, fields(files = args.corpus.files.len()))]
pub fn cmd_table(
    args: TableArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let (language, options) = args.corpus.text.resolve(config);
    debug!(%language, "executing table command");

    let corpus = load_corpus(&args.corpus.files, language, options, max_input_bytes)?;
    let rows = corpus.table_export();

    if global_json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", render_tsv(&rows, &Metric::table_columns(language)));
    }
    Ok(())
}

/// Header line plus one line per row, tab-separated.
pub fn render_tsv(rows: &[TableRow], columns: &[Metric]) -> String {
    let mut out = String::from("Text");
    for metric in columns {
        out.push('\t');
        out.push_str(metric.label());
    }
    out.push('\n');

    for row in rows {
        out.push_str(&row.label);
        for &metric in columns {
            out.push('\t');
            out.push_str(&format_value(metric, row.metrics.value_or_nan(metric)));
        }
        out.push('\n');
    }
    out
}
