//! Sentence, word, syllable and grapheme segmentation.
//!
//! [`segment`] turns normalized text into sentences of [`Word`]s, each word
//! carrying its grapheme and syllable counts. Sentences without words are
//! dropped, so the sentence count only reflects sentences with content.
//!
//! Two sentence strategies exist, chosen by the profile:
//!
//! - **Delimiter**: split on runs of terminator characters (`.`, `!`, `?`,
//!   `…`, and the verse separator `|`), trim, discard empty fragments.
//! - **Lookahead**: collapse repeated periods and ellipses to one period, then
//!   take the shortest span of allowed characters ending in `.`, `!` or `?`
//!   whose following letter is an uppercase Cyrillic one (or the end of text).
//!   Abbreviation periods and decimal points do not split, at the price of
//!   requiring sentences to start with a capital.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::profile::{
    GraphemeRule, LanguageProfile, SentenceStrategy, TextOptions, WordPattern, fold_pairs,
};

/// Unicode word, optionally with one embedded curly apostrophe (elisions).
static WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w+(?:’\w+)?\b").expect("valid regex"));

/// Two or more periods in a row.
static PERIOD_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.{2,}").expect("valid regex"));

/// Characters that may close a sentence under the lookahead strategy.
const LOOKAHEAD_ENDINGS: [char; 3] = ['.', '!', '?'];

/// One word with its counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Word {
    /// The word as it appeared after normalization.
    pub text: String,
    /// Number of letters (plus interior apostrophes where the profile counts them).
    pub graphemes: usize,
    /// Number of syllables.
    pub syllables: usize,
}

impl Word {
    /// Measure `text` with the rules of `profile`.
    pub fn measure(text: &str, profile: &LanguageProfile) -> Self {
        Self {
            text: text.to_string(),
            graphemes: count_graphemes(text, profile),
            syllables: count_syllables(text, profile),
        }
    }
}

/// An ordered, non-empty run of words.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Sentence {
    /// Words in reading order.
    pub words: Vec<Word>,
}

/// Segment normalized `text` into sentences of measured words.
#[tracing::instrument(skip_all, fields(text_len = text.len(), language = %profile.language))]
pub fn segment(text: &str, profile: &LanguageProfile, options: TextOptions) -> Vec<Sentence> {
    let spans = split_sentences(text, profile);

    let sentences: Vec<Sentence> = spans
        .iter()
        .map(|span| {
            let words = extract_words(span, profile)
                .into_iter()
                .map(|w| Word::measure(w, profile))
                .filter(|w| keeps_word(w, profile, options))
                .collect();
            Sentence { words }
        })
        .filter(|s| !s.words.is_empty())
        .collect();

    tracing::debug!(
        spans = spans.len(),
        sentences = sentences.len(),
        "segmented text"
    );
    sentences
}

/// Split `text` into raw sentence spans according to the profile strategy.
pub fn split_sentences<'a>(text: &'a str, profile: &LanguageProfile) -> Vec<Cow<'a, str>> {
    match profile.sentence_strategy {
        SentenceStrategy::Delimiter => text
            .split(|c: char| profile.is_terminator(c))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Cow::Borrowed)
            .collect(),
        SentenceStrategy::Lookahead => split_lookahead(text, profile)
            .into_iter()
            .map(Cow::Owned)
            .collect(),
    }
}

/// Extract the words of one sentence.
pub fn extract_words<'a>(sentence: &'a str, profile: &LanguageProfile) -> Vec<&'a str> {
    match profile.word_pattern {
        WordPattern::WordCharacters => WORD_PATTERN
            .find_iter(sentence)
            .map(|m| m.as_str())
            .collect(),
        WordPattern::GraphemeRun => sentence
            .split(|c: char| !profile.is_grapheme(c))
            .filter(|w| !w.is_empty())
            .collect(),
    }
}

/// Count syllables: vowels, with diphthongs folded first.
pub fn count_syllables(word: &str, profile: &LanguageProfile) -> usize {
    fold_diphthongs(word, profile)
        .chars()
        .filter(|&c| profile.is_syllable_nucleus(c))
        .count()
}

/// Fold the profile's diphthongs in `word` into single placeholders.
pub fn fold_diphthongs(word: &str, profile: &LanguageProfile) -> String {
    fold_pairs(word, profile.diphthongs)
}

/// Count graphemes in `word` under the profile's rule.
pub fn count_graphemes(word: &str, profile: &LanguageProfile) -> usize {
    let chars: Vec<char> = word.chars().collect();
    let last = chars.len().saturating_sub(1);
    chars
        .iter()
        .enumerate()
        .filter(|&(i, &c)| match profile.grapheme_rule {
            GraphemeRule::Simple => profile.is_grapheme(c),
            GraphemeRule::ApostropheAware => {
                profile.is_grapheme(c) || (profile.is_apostrophe(c) && i > 0 && i < last)
            }
        })
        .count()
}

/// Zero-syllable words are dropped only by the lookahead strategy, and only
/// when `nullsilber` is off.
fn keeps_word(word: &Word, profile: &LanguageProfile, options: TextOptions) -> bool {
    word.syllables > 0
        || options.nullsilber
        || profile.sentence_strategy != SentenceStrategy::Lookahead
}

fn is_upper_cyrillic(c: char) -> bool {
    matches!(c, 'А'..='Я' | 'Ё')
}

/// Lookahead sentence split.
///
/// Equivalent to finding, left to right, every shortest run of allowed
/// characters that ends in `.`, `!` or `?` and is followed by zero or more
/// non-letters and then an uppercase Cyrillic letter or the end of text.
fn split_lookahead(text: &str, profile: &LanguageProfile) -> Vec<String> {
    let collapsed = PERIOD_RUN.replace_all(text, ".").replace('…', ".");
    let chars: Vec<char> = collapsed.chars().collect();
    let mut sentences = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        match match_sentence(&chars, start, profile) {
            Ok(end) => {
                sentences.push(chars[start..end].iter().collect());
                start = end;
            }
            // No sentence can start anywhere before the blocking character.
            Err(blocked_at) => start = blocked_at.max(start) + 1,
        }
    }

    sentences
}

/// Try to match one sentence starting at `start`.
///
/// Returns the exclusive end on success, or the index of the first character
/// that is not allowed inside a sentence (or `chars.len()`).
fn match_sentence(chars: &[char], start: usize, profile: &LanguageProfile) -> Result<usize, usize> {
    if !chars.get(start).is_some_and(|&c| profile.is_sentence_char(c)) {
        return Err(start);
    }

    let mut k = start + 1;
    while k < chars.len() {
        let c = chars[k];
        if LOOKAHEAD_ENDINGS.contains(&c) && next_letter_opens_sentence(chars, k + 1, profile) {
            return Ok(k + 1);
        }
        if !profile.is_sentence_char(c) {
            return Err(k);
        }
        k += 1;
    }

    Err(chars.len())
}

fn next_letter_opens_sentence(chars: &[char], from: usize, profile: &LanguageProfile) -> bool {
    chars[from..]
        .iter()
        .find(|&&c| profile.is_grapheme(c))
        .is_none_or(|&c| is_upper_cyrillic(c))
}
