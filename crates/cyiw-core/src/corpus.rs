//! A labelled collection of texts scored under one language profile.
//!
//! The corpus stores raw text only. Every query re-runs normalization,
//! segmentation and scoring, so a record always reflects the current text.
//! No internal synchronization: callers sharing a corpus across threads wrap
//! it in their own lock.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};
use crate::metrics::{Metric, MetricsRecord, compute_metrics};
use crate::profile::{Language, TextOptions};
use crate::stats::{Correlation, pearson};

#[derive(Debug, Clone)]
struct Entry {
    label: String,
    text: String,
}

/// Ordered, label-unique set of texts.
#[derive(Debug, Clone)]
pub struct Corpus {
    language: Language,
    options: TextOptions,
    entries: Vec<Entry>,
}

/// One row of [`Corpus::table_export`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TableRow {
    /// Text label.
    pub label: String,
    /// Statistics for the text.
    pub metrics: MetricsRecord,
}

/// One text's values for a chosen set of metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SeriesRow {
    /// Text label.
    pub label: String,
    /// Metric values keyed by metric.
    pub values: BTreeMap<Metric, f64>,
}

/// A text plotted against two metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScatterPoint {
    /// Text label.
    pub label: String,
    /// Value on the horizontal axis.
    pub x: f64,
    /// Value on the vertical axis.
    pub y: f64,
}

/// Pairwise correlations between metrics across the corpus.
///
/// `cells[i][j]` correlates `metrics[i]` with `metrics[j]`.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct CorrelationMatrix {
    /// Row and column variables, in the requested order.
    pub metrics: Vec<Metric>,
    /// Square grid of results.
    pub cells: Vec<Vec<Correlation>>,
}

impl CorrelationMatrix {
    /// Result for row `i`, column `j`.
    pub fn get(&self, i: usize, j: usize) -> Option<&Correlation> {
        self.cells.get(i)?.get(j)
    }

    /// Number of row variables.
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Whether the matrix has no variables.
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

impl Corpus {
    /// Empty corpus scored with `language` and `options`.
    pub const fn new(language: Language, options: TextOptions) -> Self {
        Self {
            language,
            options,
            entries: Vec::new(),
        }
    }

    /// Language every text is scored with.
    pub const fn language(&self) -> Language {
        self.language
    }

    /// Normalization options every text is scored with.
    pub const fn options(&self) -> TextOptions {
        self.options
    }

    /// Number of texts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the corpus holds no texts.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels in insertion order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    /// Raw text stored under `label`.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.text.as_str())
    }

    /// Insert `text` under `label`.
    ///
    /// An existing label keeps its position and has its text replaced; a new
    /// label goes to the end.
    #[tracing::instrument(skip(self, text), fields(text_len = tracing::field::Empty))]
    pub fn add_text(&mut self, label: impl Into<String> + std::fmt::Debug, text: impl Into<String>) {
        let label = label.into();
        let text = text.into();
        tracing::Span::current().record("text_len", text.len());
        if let Some(entry) = self.entries.iter_mut().find(|e| e.label == label) {
            tracing::debug!(%label, "replacing text");
            entry.text = text;
        } else {
            self.entries.push(Entry { label, text });
        }
    }

    /// Drop every text.
    #[tracing::instrument(skip(self), fields(len = self.entries.len()))]
    pub fn remove_all(&mut self) {
        self.entries.clear();
    }

    /// Freshly computed statistics for `label`.
    pub fn metrics_for(&self, label: &str) -> Option<MetricsRecord> {
        self.get(label)
            .map(|text| compute_metrics(text, self.language, self.options))
    }

    /// One row per text, in insertion order.
    #[tracing::instrument(skip(self), fields(len = self.entries.len()))]
    pub fn table_export(&self) -> Vec<TableRow> {
        self.entries
            .iter()
            .map(|e| TableRow {
                label: e.label.clone(),
                metrics: compute_metrics(&e.text, self.language, self.options),
            })
            .collect()
    }

    /// Values of `metrics` for every text, in insertion order.
    pub fn series_for(&self, metrics: &[Metric]) -> AnalysisResult<Vec<SeriesRow>> {
        self.check_available(metrics)?;
        Ok(self
            .table_export()
            .into_iter()
            .map(|row| SeriesRow {
                values: metrics
                    .iter()
                    .map(|&m| (m, row.metrics.value_or_nan(m)))
                    .collect(),
                label: row.label,
            })
            .collect())
    }

    /// Every text as a point in the `x`/`y` metric plane.
    pub fn scatter(&self, x: Metric, y: Metric) -> AnalysisResult<Vec<ScatterPoint>> {
        self.check_available(&[x, y])?;
        Ok(self
            .table_export()
            .into_iter()
            .map(|row| ScatterPoint {
                x: row.metrics.value_or_nan(x),
                y: row.metrics.value_or_nan(y),
                label: row.label,
            })
            .collect())
    }

    /// Pearson correlation between every pair of `metrics` across all texts.
    ///
    /// The diagonal is r = 1, p = 0 by definition. Undefined cells carry NaN.
    #[tracing::instrument(skip(self), fields(len = self.entries.len()))]
    pub fn correlation_matrix(&self, metrics: &[Metric]) -> AnalysisResult<CorrelationMatrix> {
        self.check_available(metrics)?;
        let rows = self.table_export();
        let n = rows.len();
        let columns: Vec<Vec<f64>> = metrics
            .iter()
            .map(|&m| rows.iter().map(|r| r.metrics.value_or_nan(m)).collect())
            .collect();

        let cells = (0..metrics.len())
            .map(|i| {
                (0..metrics.len())
                    .map(|j| {
                        if i == j {
                            Correlation::identity(n)
                        } else {
                            pearson(&columns[i], &columns[j])
                        }
                    })
                    .collect()
            })
            .collect();

        Ok(CorrelationMatrix {
            metrics: metrics.to_vec(),
            cells,
        })
    }

    fn check_available(&self, metrics: &[Metric]) -> AnalysisResult<()> {
        match metrics.iter().find(|m| !m.applies_to(self.language)) {
            Some(m) => Err(AnalysisError::UnavailableMetric {
                metric: m.label().to_string(),
                language: self.language.to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polish() -> Corpus {
        Corpus::new(Language::Polish, TextOptions::default())
    }

    fn sample() -> Corpus {
        let mut corpus = polish();
        corpus.add_text("a.txt", "Kot śpi. Pies biega.");
        corpus.add_text("b.txt", "Ala ma kota. Kot ma Alę i duży dom z ogrodem.");
        corpus.add_text(
            "c.txt",
            "Wczoraj wieczorem długo rozmawialiśmy o nieoczekiwanych konsekwencjach decyzji.",
        );
        corpus
    }

    #[test]
    fn adding_same_label_overwrites_in_place() {
        let mut corpus = sample();
        corpus.add_text("a.txt", "Nowy tekst.");
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.labels().collect::<Vec<_>>(), ["a.txt", "b.txt", "c.txt"]);
        assert_eq!(corpus.get("a.txt"), Some("Nowy tekst."));
    }

    #[test]
    fn add_text_takes_owned_and_borrowed_strings() {
        let mut corpus = polish();
        let label = String::from("owned.txt");
        let text = String::from("Kot śpi.");
        corpus.add_text(label, text);
        corpus.add_text("borrowed.txt", "Pies biega.");
        assert_eq!(corpus.labels().collect::<Vec<_>>(), ["owned.txt", "borrowed.txt"]);
        assert_eq!(corpus.get("owned.txt"), Some("Kot śpi."));
    }

    #[test]
    fn remove_all_empties_table() {
        let mut corpus = sample();
        corpus.remove_all();
        assert!(corpus.is_empty());
        assert!(corpus.table_export().is_empty());
    }

    #[test]
    fn metrics_follow_current_text() {
        let mut corpus = polish();
        corpus.add_text("t", "Kot śpi.");
        assert_eq!(corpus.metrics_for("t").unwrap().words, 2);
        corpus.add_text("t", "Kot śpi. Pies biega.");
        assert_eq!(corpus.metrics_for("t").unwrap().words, 4);
        assert!(corpus.metrics_for("missing").is_none());
    }

    #[test]
    fn table_export_keeps_insertion_order() {
        let rows = sample().table_export();
        let labels: Vec<_> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["a.txt", "b.txt", "c.txt"]);
        assert_eq!(rows[0].metrics.sentences, 2);
    }

    #[test]
    fn series_holds_requested_metrics() {
        let series = sample().series_for(&[Metric::Flesch, Metric::Lix]).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].values.len(), 2);
        assert!(series[0].values.contains_key(&Metric::Lix));
    }

    #[test]
    fn flesch_rus_is_unavailable_for_polish() {
        let err = sample().series_for(&[Metric::FleschRus]).unwrap_err();
        assert!(matches!(err, AnalysisError::UnavailableMetric { .. }));
    }

    #[test]
    fn scatter_pairs_two_metrics() {
        let corpus = sample();
        let points = corpus.scatter(Metric::Asl, Metric::Words).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].label, "a.txt");
        assert!((points[0].x - 2.0).abs() < 1e-9);
        assert!((points[0].y - 4.0).abs() < 1e-9);
    }

    #[test]
    fn diagonal_is_exact() {
        let matrix = sample().correlation_matrix(&Metric::INDICES).unwrap();
        for i in 0..matrix.len() {
            let cell = matrix.get(i, i).unwrap();
            assert!(cell.r == 1.0);
            assert!(cell.p == 0.0);
            assert_eq!(cell.n, 3);
        }
    }

    #[test]
    fn off_diagonal_is_symmetric_and_sized_by_corpus() {
        let matrix = sample()
            .correlation_matrix(&[Metric::Flesch, Metric::Asl, Metric::Words])
            .unwrap();
        let ab = matrix.get(0, 1).unwrap();
        let ba = matrix.get(1, 0).unwrap();
        assert_eq!(ab.n, 3);
        assert!((ab.r - ba.r).abs() < 1e-12);
    }

    #[test]
    fn constant_metric_yields_nan_not_zero() {
        let mut corpus = polish();
        corpus.add_text("a", "Kot śpi.");
        corpus.add_text("b", "Pies je.");
        corpus.add_text("c", "Ala ma kota i psa.");
        // Every text is a single sentence.
        let matrix = corpus
            .correlation_matrix(&[Metric::Sentences, Metric::Words])
            .unwrap();
        let cell = matrix.get(0, 1).unwrap();
        assert!(cell.r.is_nan());
        assert!(cell.p.is_nan());
        assert!(!cell.is_defined());
    }

    #[test]
    fn single_text_matrix_is_undefined_off_diagonal() {
        let mut corpus = polish();
        corpus.add_text("only", "Kot śpi.");
        let matrix = corpus.correlation_matrix(&[Metric::Flesch, Metric::Lix]).unwrap();
        assert!(matrix.get(0, 1).unwrap().r.is_nan());
        assert!(matrix.get(0, 0).unwrap().r == 1.0);
    }
}
