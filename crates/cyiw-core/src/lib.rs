//! Core library for cyiw.
//!
//! Readability statistics for Polish, Russian and Ukrainian texts: the
//! counting pipeline (normalize, segment, score), a labelled corpus with
//! table, series and correlation exports, and the layered configuration used
//! by the `cyiw` CLI.
//!
//! # Modules
//!
//! - [`profile`] - Per-language character classes and the [`Language`] tag
//! - [`normalize`] - Character replacement, digraph folding, bracket removal
//! - [`segment`] - Sentences, words, syllables and graphemes
//! - [`metrics`] - Readability indices and the [`MetricsRecord`]
//! - [`corpus`] - Labelled text collection with exports and correlations
//! - [`stats`] - Pearson correlation with a two-tailed t-test
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```
//! use cyiw_core::{Language, TextOptions, compute_metrics};
//!
//! let record = compute_metrics("Kot śpi. Pies biega.", Language::Polish, TextOptions::default());
//! assert_eq!(record.sentences, 2);
//! assert_eq!(record.words, 4);
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod corpus;
pub mod error;
pub mod metrics;
pub mod normalize;
pub mod profile;
pub mod segment;
pub mod stats;

pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use corpus::{Corpus, CorrelationMatrix, ScatterPoint, SeriesRow, TableRow};
pub use error::{AnalysisError, AnalysisResult, ConfigError, ConfigResult};
pub use metrics::{Metric, MetricsRecord, compute, compute_metrics};
pub use profile::{Language, LanguageProfile, TextOptions};
pub use segment::{Sentence, Word, segment};
pub use stats::{Correlation, pearson};

/// Default maximum input size: 5 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;
