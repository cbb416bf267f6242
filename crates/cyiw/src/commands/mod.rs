//! Command implementations.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use cyiw_core::{Config, Corpus, Language, Metric, TextOptions};

pub mod analyze;
pub mod correlate;
pub mod info;
pub mod scatter;
pub mod series;
#[cfg(feature = "mcp")]
pub mod serve;
pub mod table;

/// Language and feature flags shared by every text command.
///
/// Unset flags fall back to the configuration; a flag given on the command
/// line wins in either direction.
#[derive(Args, Debug, Clone, Default)]
pub struct TextArgs {
    /// Language profile
    #[arg(short, long, value_enum)]
    pub language: Option<Language>,

    /// Fold Polish digraphs (ch, cz, dz, dź, dż, rz, sz) into one grapheme
    #[arg(long, overrides_with = "no_digraphs")]
    pub digraphs: bool,

    /// Count Polish digraphs as two graphemes, even if configured otherwise
    #[arg(long, overrides_with = "digraphs")]
    pub no_digraphs: bool,

    /// Keep words without vowels (lookahead sentence strategy only)
    #[arg(long, overrides_with = "no_nullsilber")]
    pub nullsilber: bool,

    /// Drop words without vowels, even if configured otherwise
    #[arg(long, overrides_with = "nullsilber")]
    pub no_nullsilber: bool,
}

impl TextArgs {
    /// Effective language and options after applying `config`.
    pub fn resolve(&self, config: &Config) -> (Language, TextOptions) {
        let language = self.language.or(config.language).unwrap_or_default();
        let options = TextOptions {
            digraphs: switch(self.digraphs, self.no_digraphs).unwrap_or(config.digraphs),
            nullsilber: switch(self.nullsilber, self.no_nullsilber)
                .unwrap_or(config.nullsilber),
        };
        (language, options)
    }
}

/// Collapse a `--flag`/`--no-flag` pair; `None` when neither was given.
const fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

/// Files making up a corpus, plus text flags.
#[derive(Args, Debug, Clone)]
pub struct CorpusArgs {
    /// Text files to load (labelled by file name)
    #[arg(required = true, num_args = 1..)]
    pub files: Vec<Utf8PathBuf>,

    #[command(flatten)]
    pub text: TextArgs,
}

/// Read a file and validate its size against the configured limit.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    // Preflight: check file size via metadata before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if size > max {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    let content = std::fs::read_to_string(path.as_std_path())
        .with_context(|| format!("failed to read {path}"))?;
    Ok(content)
}

/// Label for a file: its last path component.
pub fn file_label(path: &Utf8Path) -> String {
    path.file_name().unwrap_or(path.as_str()).to_string()
}

/// Load every file into a corpus. Files sharing a name overwrite each other.
pub fn load_corpus(
    files: &[Utf8PathBuf],
    language: Language,
    options: TextOptions,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<Corpus> {
    let mut corpus = Corpus::new(language, options);
    for path in files {
        let text = read_input_file(path, max_input_bytes)?;
        let label = file_label(path);
        if corpus.get(&label).is_some() {
            tracing::warn!(%label, file = %path, "duplicate label replaces earlier file");
        }
        corpus.add_text(label, text);
    }
    Ok(corpus)
}

/// Metrics named on the command line, else from config, else the default set.
pub fn select_metrics(
    names: &[String],
    config: &Config,
    language: Language,
) -> anyhow::Result<Vec<Metric>> {
    if names.is_empty() {
        Ok(config.metric_selection(language)?)
    } else {
        Ok(Metric::parse_list(names)?)
    }
}

/// Render a metric value the way tables print it.
pub fn format_value(metric: Metric, value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if metric.is_count() {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let config = Config {
            language: Some(Language::Ukrainian),
            ..Config::default()
        };
        let args = TextArgs {
            language: Some(Language::RussianV1),
            digraphs: true,
            ..TextArgs::default()
        };
        let (language, options) = args.resolve(&config);
        assert_eq!(language, Language::RussianV1);
        assert!(options.digraphs);
        assert!(!options.nullsilber);
    }

    #[test]
    fn negative_flags_turn_off_configured_options() {
        let config = Config {
            digraphs: true,
            nullsilber: true,
            ..Config::default()
        };
        let args = TextArgs {
            no_digraphs: true,
            no_nullsilber: true,
            ..TextArgs::default()
        };
        let (_, options) = args.resolve(&config);
        assert!(!options.digraphs);
        assert!(!options.nullsilber);
    }

    #[test]
    fn last_of_flag_pair_wins() {
        use clap::Parser;

        #[derive(Parser)]
        struct Harness {
            #[command(flatten)]
            text: TextArgs,
        }

        let parsed = Harness::parse_from(["t", "--digraphs", "--no-digraphs"]);
        let (_, options) = parsed.text.resolve(&Config {
            digraphs: true,
            ..Config::default()
        });
        assert!(!options.digraphs);

        let parsed = Harness::parse_from(["t", "--no-nullsilber", "--nullsilber"]);
        let (_, options) = parsed.text.resolve(&Config::default());
        assert!(options.nullsilber);
    }

    #[test]
    fn config_fills_unset_flags() {
        let config = Config {
            language: Some(Language::Ukrainian),
            nullsilber: true,
            ..Config::default()
        };
        let (language, options) = TextArgs::default().resolve(&config);
        assert_eq!(language, Language::Ukrainian);
        assert!(options.nullsilber);
    }

    #[test]
    fn polish_is_the_fallback_language() {
        let (language, _) = TextArgs::default().resolve(&Config::default());
        assert_eq!(language, Language::Polish);
    }

    #[test]
    fn label_is_file_name() {
        assert_eq!(file_label(Utf8Path::new("texts/a/one.txt")), "one.txt");
        assert_eq!(file_label(Utf8Path::new("two.txt")), "two.txt");
    }

    #[test]
    fn oversized_input_is_rejected() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("big.txt")).unwrap();
        std::fs::write(&path, "Kot śpi. Pies biega.").unwrap();
        let err = read_input_file(&path, Some(4)).unwrap_err();
        assert!(err.to_string().contains("input too large"));
        assert!(read_input_file(&path, None).is_ok());
    }

    #[test]
    fn same_file_name_overwrites() {
        let tmp = tempfile::TempDir::new().unwrap();
        let a = Utf8PathBuf::try_from(tmp.path().join("a")).unwrap();
        let b = Utf8PathBuf::try_from(tmp.path().join("b")).unwrap();
        std::fs::create_dir_all(&a).unwrap();
        std::fs::create_dir_all(&b).unwrap();
        std::fs::write(a.join("t.txt"), "Kot śpi.").unwrap();
        std::fs::write(b.join("t.txt"), "Kot śpi. Pies biega.").unwrap();

        let corpus = load_corpus(
            &[a.join("t.txt"), b.join("t.txt")],
            Language::Polish,
            TextOptions::default(),
            None,
        )
        .unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.metrics_for("t.txt").unwrap().words, 4);
    }

    #[test]
    fn values_format_by_kind() {
        assert_eq!(format_value(Metric::Words, 12.0), "12");
        assert_eq!(format_value(Metric::Flesch, 99.055_1), "99.06");
        assert_eq!(format_value(Metric::Lix, f64::NAN), "nan");
    }

    #[test]
    fn unknown_metric_name_fails() {
        let err = select_metrics(&["bogus".into()], &Config::default(), Language::Polish)
            .unwrap_err();
        assert!(err.to_string().contains("unknown metric"));
    }
}
