//! Error types for cyiw-core.

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur when resolving names handed in by a caller.
///
/// The text statistics themselves never fail; degenerate input yields a
/// zero-filled record instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// A metric name that no record field answers to.
    #[error("unknown metric: {name}. Use: {available}")]
    UnknownMetric {
        /// The metric name that was requested.
        name: String,
        /// Comma-separated list of available metric names.
        available: String,
    },

    /// A metric the corpus language does not produce (FleschRUS outside Russian).
    #[error("metric {metric} is not computed for language {language}")]
    UnavailableMetric {
        /// Display label of the metric.
        metric: String,
        /// Language tag of the corpus.
        language: String,
    },

    /// A language tag with no matching profile.
    #[error("unknown language: {name}. Use: {available}")]
    UnknownLanguage {
        /// The language tag that was requested.
        name: String,
        /// Comma-separated list of available language tags.
        available: String,
    },
}

/// Result type alias using [`AnalysisError`].
pub type AnalysisResult<T> = Result<T, AnalysisError>;
