//! Readability indices over segmented text.
//!
//! Let W = words, S = sentences, Y = syllables, G = graphemes, with
//! ASL = W/S and syllables per word = Y/W:
//!
//! | Index       | Formula                                                        |
//! |-------------|----------------------------------------------------------------|
//! | Flesch      | `206.835 − 1.015·ASL − 84.6·Y/W`                               |
//! | FleschRUS   | Flesch rescaled to μ = 60, σ = 10 (Russian profiles only)      |
//! | Amstad      | `180 − ASL − 58.5·Y/W`                                         |
//! | Tuldava     | `Y/W · ln(ASL)`                                                |
//! | Lix         | `ASL + IW`                                                     |
//! | WSTF 1–4    | Wiener Sachtextformeln over MS, ASL, IW and ES                 |
//! | NRE         | `1.599·ES − 1.015·ASL − 31.517`                                |
//! | Gunning-Fog | `0.4·(ASL + MS)`                                               |
//!
//! MS, IW and ES are percentages of words with three or more syllables, more
//! than six graphemes, and exactly one syllable.
//!
//! A text with no words or no sentences yields a zero-filled record rather
//! than an error. Every score is rounded to two decimals on output; the
//! computation itself runs at full precision.

use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};
use crate::normalize::normalize;
use crate::profile::{Language, LanguageProfile, TextOptions};
use crate::segment::{Sentence, segment};

/// Words with more graphemes than this count as long (Lix, IW).
pub const LONG_WORD_GRAPHEMES: usize = 6;

/// Words with at least this many syllables count as polysyllabic (MS, Gunning-Fog).
pub const POLYSYLLABLE_MIN: usize = 3;

const FLESCH_RU_MEAN: f64 = 3.21;
const FLESCH_RU_SD: f64 = 7.02;
const FLESCH_TARGET_MEAN: f64 = 60.0;
const FLESCH_TARGET_SD: f64 = 10.0;

/// FleschRUS intercept.
pub const FLESCH_RUS_BASE: f64 =
    (206.835 - FLESCH_RU_MEAN) / FLESCH_RU_SD * FLESCH_TARGET_SD + FLESCH_TARGET_MEAN;
/// FleschRUS weight on average sentence length.
pub const FLESCH_RUS_ASL: f64 = 1.015 * FLESCH_TARGET_SD / FLESCH_RU_SD;
/// FleschRUS weight on syllables per word.
pub const FLESCH_RUS_ASW: f64 = 84.6 * FLESCH_TARGET_SD / FLESCH_RU_SD;

/// A named field of [`MetricsRecord`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Sentence count.
    Sentences,
    /// Word count.
    Words,
    /// Syllable count.
    Syllables,
    /// Grapheme count.
    Graphemes,
    /// Average sentence length (words per sentence).
    Asl,
    /// Average word length (graphemes per word).
    Awl,
    /// Flesch Reading Ease.
    Flesch,
    /// Flesch Reading Ease recalibrated for Russian.
    FleschRus,
    /// Amstad's German Flesch adaptation.
    Amstad,
    /// Tuldava's complexity index.
    Tuldava,
    /// Läsbarhetsindex.
    Lix,
    /// First Wiener Sachtextformel.
    Wstf1,
    /// Second Wiener Sachtextformel.
    Wstf2,
    /// Third Wiener Sachtextformel.
    Wstf3,
    /// Fourth Wiener Sachtextformel.
    Wstf4,
    /// New Reading Ease.
    Nre,
    /// Gunning-Fog index.
    GunningFog,
}

impl Metric {
    /// Every metric, in record order.
    pub const ALL: [Self; 17] = [
        Self::Sentences,
        Self::Words,
        Self::Syllables,
        Self::Graphemes,
        Self::Asl,
        Self::Awl,
        Self::Flesch,
        Self::FleschRus,
        Self::Amstad,
        Self::Tuldava,
        Self::Lix,
        Self::Wstf1,
        Self::Wstf2,
        Self::Wstf3,
        Self::Wstf4,
        Self::Nre,
        Self::GunningFog,
    ];

    /// The readability indices charted and correlated by default.
    pub const INDICES: [Self; 9] = [
        Self::Flesch,
        Self::Amstad,
        Self::Tuldava,
        Self::Lix,
        Self::Wstf1,
        Self::Wstf2,
        Self::Wstf3,
        Self::Wstf4,
        Self::Nre,
    ];

    /// Machine name, as accepted on the command line and in config files.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sentences => "sentences",
            Self::Words => "words",
            Self::Syllables => "syllables",
            Self::Graphemes => "graphemes",
            Self::Asl => "asl",
            Self::Awl => "awl",
            Self::Flesch => "flesch",
            Self::FleschRus => "flesch_rus",
            Self::Amstad => "amstad",
            Self::Tuldava => "tuldava",
            Self::Lix => "lix",
            Self::Wstf1 => "wstf1",
            Self::Wstf2 => "wstf2",
            Self::Wstf3 => "wstf3",
            Self::Wstf4 => "wstf4",
            Self::Nre => "nre",
            Self::GunningFog => "gunning_fog",
        }
    }

    /// Column heading used in tables and matrices.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Sentences => "Sentences",
            Self::Words => "Words",
            Self::Syllables => "Syllables",
            Self::Graphemes => "Graphemes",
            Self::Asl => "ASL",
            Self::Awl => "AWL",
            Self::Flesch => "Flesch",
            Self::FleschRus => "FleschRUS",
            Self::Amstad => "Amstad",
            Self::Tuldava => "Tuldava",
            Self::Lix => "Lix",
            Self::Wstf1 => "WSTF1",
            Self::Wstf2 => "WSTF2",
            Self::Wstf3 => "WSTF3",
            Self::Wstf4 => "WSTF4",
            Self::Nre => "NRE",
            Self::GunningFog => "GunningFog",
        }
    }

    /// Whether this metric is a raw count rather than a score.
    pub const fn is_count(&self) -> bool {
        matches!(
            self,
            Self::Sentences | Self::Words | Self::Syllables | Self::Graphemes
        )
    }

    /// Whether `language` produces a value for this metric.
    pub const fn applies_to(&self, language: Language) -> bool {
        !matches!(self, Self::FleschRus) || language.is_russian()
    }

    /// Indices shown when the caller names none: [`Metric::INDICES`], with
    /// FleschRUS after Flesch for Russian.
    pub fn default_selection(language: Language) -> Vec<Self> {
        let mut metrics = Self::INDICES.to_vec();
        if language.is_russian() {
            metrics.insert(1, Self::FleschRus);
        }
        metrics
    }

    /// Columns of a full table export for `language`.
    pub fn table_columns(language: Language) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|m| m.applies_to(language))
            .collect()
    }

    /// Parse a list of names, failing on the first unknown one.
    pub fn parse_list<S: AsRef<str>>(names: &[S]) -> AnalysisResult<Vec<Self>> {
        names.iter().map(|n| n.as_ref().parse()).collect()
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Metric {
    type Err = AnalysisError;

    /// Case-insensitive; `_`, `-` and spaces are ignored, so `GunningFog`,
    /// `gunning_fog` and `gunning-fog` all resolve.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squash = |name: &str| -> String {
            name.chars()
                .filter(|c| !matches!(c, '_' | '-' | ' '))
                .flat_map(char::to_lowercase)
                .collect()
        };
        let wanted = squash(s);
        Self::ALL
            .into_iter()
            .find(|m| squash(m.as_str()) == wanted)
            .ok_or_else(|| AnalysisError::UnknownMetric {
                name: s.to_string(),
                available: Self::ALL.map(|m| m.as_str()).join(", "),
            })
    }
}

/// Raw counts gathered from segmented text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Sentences with at least one word.
    pub sentences: usize,
    /// Words across all sentences.
    pub words: usize,
    /// Syllables across all words.
    pub syllables: usize,
    /// Graphemes across all words.
    pub graphemes: usize,
    /// Words with more than [`LONG_WORD_GRAPHEMES`] graphemes.
    pub long_words: usize,
    /// Words with at least [`POLYSYLLABLE_MIN`] syllables.
    pub polysyllables: usize,
    /// Words with exactly one syllable.
    pub monosyllables: usize,
}

impl Tally {
    /// Count everything in one pass over `sentences`.
    pub fn from_sentences(sentences: &[Sentence]) -> Self {
        let mut tally = Self {
            sentences: sentences.len(),
            ..Self::default()
        };
        for word in sentences.iter().flat_map(|s| &s.words) {
            tally.words += 1;
            tally.syllables += word.syllables;
            tally.graphemes += word.graphemes;
            if word.graphemes > LONG_WORD_GRAPHEMES {
                tally.long_words += 1;
            }
            if word.syllables >= POLYSYLLABLE_MIN {
                tally.polysyllables += 1;
            }
            if word.syllables == 1 {
                tally.monosyllables += 1;
            }
        }
        tally
    }

    /// Whether ratio metrics are defined (at least one word and sentence).
    pub const fn is_scorable(&self) -> bool {
        self.words > 0 && self.sentences > 0
    }

    /// Words per sentence, unrounded; 0.0 without sentences.
    pub fn asl(&self) -> f64 {
        ratio(self.words, self.sentences)
    }

    /// Graphemes per word, unrounded; 0.0 without words.
    pub fn awl(&self) -> f64 {
        ratio(self.graphemes, self.words)
    }

    /// Syllables per word, unrounded; 0.0 without words.
    pub fn syllables_per_word(&self) -> f64 {
        ratio(self.syllables, self.words)
    }

    fn percent_of_words(&self, count: usize) -> f64 {
        100.0 * ratio(count, self.words)
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Round to two decimals, half away from zero.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Readability statistics for one text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MetricsRecord {
    /// Number of sentences with at least one word.
    pub sentences: usize,
    /// Number of words.
    pub words: usize,
    /// Number of syllables.
    pub syllables: usize,
    /// Number of graphemes.
    pub graphemes: usize,
    /// Average sentence length in words.
    pub asl: f64,
    /// Average word length in graphemes.
    pub awl: f64,
    /// Flesch Reading Ease.
    pub flesch: f64,
    /// Flesch Reading Ease recalibrated for Russian; absent for other languages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flesch_rus: Option<f64>,
    /// Amstad index.
    pub amstad: f64,
    /// Tuldava index.
    pub tuldava: f64,
    /// Lix index.
    pub lix: f64,
    /// First Wiener Sachtextformel.
    pub wstf1: f64,
    /// Second Wiener Sachtextformel.
    pub wstf2: f64,
    /// Third Wiener Sachtextformel.
    pub wstf3: f64,
    /// Fourth Wiener Sachtextformel.
    pub wstf4: f64,
    /// New Reading Ease.
    pub nre: f64,
    /// Gunning-Fog index.
    pub gunning_fog: f64,
}

impl MetricsRecord {
    /// Value of `metric`, or `None` when this record's language has none.
    #[allow(clippy::cast_precision_loss)]
    pub fn get(&self, metric: Metric) -> Option<f64> {
        let value = match metric {
            Metric::Sentences => self.sentences as f64,
            Metric::Words => self.words as f64,
            Metric::Syllables => self.syllables as f64,
            Metric::Graphemes => self.graphemes as f64,
            Metric::Asl => self.asl,
            Metric::Awl => self.awl,
            Metric::Flesch => self.flesch,
            Metric::FleschRus => return self.flesch_rus,
            Metric::Amstad => self.amstad,
            Metric::Tuldava => self.tuldava,
            Metric::Lix => self.lix,
            Metric::Wstf1 => self.wstf1,
            Metric::Wstf2 => self.wstf2,
            Metric::Wstf3 => self.wstf3,
            Metric::Wstf4 => self.wstf4,
            Metric::Nre => self.nre,
            Metric::GunningFog => self.gunning_fog,
        };
        Some(value)
    }

    /// Value of `metric`, with NaN standing in for a missing one.
    pub fn value_or_nan(&self, metric: Metric) -> f64 {
        self.get(metric).unwrap_or(f64::NAN)
    }
}

/// Compute the record for already segmented text.
///
/// Pure and deterministic. `profile` only decides whether FleschRUS is part
/// of the record.
pub fn compute(sentences: &[Sentence], profile: &LanguageProfile) -> MetricsRecord {
    let tally = Tally::from_sentences(sentences);
    let russian = profile.language.is_russian();

    let mut record = MetricsRecord {
        sentences: tally.sentences,
        words: tally.words,
        syllables: tally.syllables,
        graphemes: tally.graphemes,
        flesch_rus: russian.then_some(0.0),
        ..MetricsRecord::default()
    };

    if !tally.is_scorable() {
        return record;
    }

    let asl = tally.asl();
    let spw = tally.syllables_per_word();
    let ms = tally.percent_of_words(tally.polysyllables);
    let iw = tally.percent_of_words(tally.long_words);
    let es = tally.percent_of_words(tally.monosyllables);

    let flesch = 206.835 - 1.015 * asl - 84.6 * spw;
    let amstad = 180.0 - asl - 58.5 * spw;
    let tuldava = if asl > 0.0 { spw * asl.ln() } else { 0.0 };
    let lix = asl + iw;
    let wstf1 = 0.1935 * ms + 0.1672 * asl + 0.1297 * iw - 0.0327 * es - 0.875;
    let wstf2 = 0.2007 * ms + 0.1682 * asl + 0.1373 * iw - 2.779;
    let wstf3 = 0.2963 * ms + 0.1905 * asl - 1.1144;
    let wstf4 = 0.2656 * asl + 0.2744 * ms - 1.693;
    let nre = 1.599 * es - 1.015 * asl - 31.517;
    let gunning_fog = 0.4 * (asl + ms);

    record.asl = round2(asl);
    record.awl = round2(tally.awl());
    record.flesch = round2(flesch);
    record.flesch_rus = russian
        .then(|| round2(FLESCH_RUS_BASE - FLESCH_RUS_ASL * asl - FLESCH_RUS_ASW * spw));
    record.amstad = round2(amstad);
    record.tuldava = round2(tuldava);
    record.lix = round2(lix);
    record.wstf1 = round2(wstf1);
    record.wstf2 = round2(wstf2);
    record.wstf3 = round2(wstf3);
    record.wstf4 = round2(wstf4);
    record.nre = round2(nre);
    record.gunning_fog = round2(gunning_fog);
    record
}

/// Normalize, segment and score `text` in one call.
#[tracing::instrument(skip(text), fields(text_len = text.len()))]
pub fn compute_metrics(text: &str, language: Language, options: TextOptions) -> MetricsRecord {
    let profile = language.profile();
    let normalized = normalize(text, profile, options);
    let sentences = segment(&normalized, profile, options);
    let record = compute(&sentences, profile);
    tracing::debug!(
        sentences = record.sentences,
        words = record.words,
        flesch = record.flesch,
        "computed metrics"
    );
    record
}
