//! Per-language character classes.
//!
//! Each supported language is described by an immutable [`LanguageProfile`]
//! selected through the [`Language`] tag. Profiles are plain data: the
//! normalizer, segmenter and metrics calculator read them, nothing dispatches
//! on them virtually.
//!
//! Invariant for every profile: vowels and consonants are disjoint, and
//! sentence terminators overlap with neither.

use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Supported language profiles.
///
/// Russian ships with two sentence strategies that disagree on counts for the
/// same input. Both are kept so results stay comparable with older runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Language {
    /// Polish, delimiter sentence split, diphthong-aware syllables.
    #[default]
    #[serde(rename = "pl")]
    #[cfg_attr(feature = "clap", value(name = "pl"))]
    Polish,
    /// Russian, lookahead sentence split ("PSPP-style").
    #[serde(rename = "ru-v1")]
    #[cfg_attr(feature = "clap", value(name = "ru-v1"))]
    RussianV1,
    /// Russian, delimiter sentence split.
    #[serde(rename = "ru-v2")]
    #[cfg_attr(feature = "clap", value(name = "ru-v2"))]
    RussianV2,
    /// Ukrainian, delimiter sentence split, apostrophe-aware graphemes.
    #[serde(rename = "uk")]
    #[cfg_attr(feature = "clap", value(name = "uk"))]
    Ukrainian,
}

impl Language {
    /// Every supported language, in display order.
    pub const ALL: [Self; 4] = [
        Self::Polish,
        Self::RussianV1,
        Self::RussianV2,
        Self::Ukrainian,
    ];

    /// Returns the language tag.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Polish => "pl",
            Self::RussianV1 => "ru-v1",
            Self::RussianV2 => "ru-v2",
            Self::Ukrainian => "uk",
        }
    }

    /// Returns the character-class profile for this language.
    pub fn profile(&self) -> &'static LanguageProfile {
        match self {
            Self::Polish => &POLISH,
            Self::RussianV1 => &RUSSIAN_V1,
            Self::RussianV2 => &RUSSIAN_V2,
            Self::Ukrainian => &UKRAINIAN,
        }
    }

    /// Whether this is one of the Russian profiles.
    pub const fn is_russian(&self) -> bool {
        matches!(self, Self::RussianV1 | Self::RussianV2)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.as_str() == wanted)
            .ok_or_else(|| AnalysisError::UnknownLanguage {
                name: s.to_string(),
                available: Self::ALL.map(|l| l.as_str()).join(", "),
            })
    }
}

/// Feature flags threaded explicitly through every computation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct TextOptions {
    /// Fold Polish digraphs ("ch", "cz", "sz", ...) into one grapheme.
    /// No effect on profiles without a digraph table.
    pub digraphs: bool,
    /// Keep words without any vowel. Only the lookahead strategy drops
    /// them; every other strategy always keeps them.
    pub nullsilber: bool,
}

/// How a text is cut into sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceStrategy {
    /// Split on runs of terminator characters.
    Delimiter,
    /// A sentence ends in `.`, `!` or `?` only when the next letter is an
    /// uppercase Cyrillic one, or the text ends.
    Lookahead,
}

/// How a sentence is cut into words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordPattern {
    /// Maximal runs of profile graphemes.
    GraphemeRun,
    /// Unicode word characters, optionally joined by one curly apostrophe.
    WordCharacters,
}

/// How graphemes are counted inside a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphemeRule {
    /// Vowels and consonants only.
    Simple,
    /// Vowels, consonants and apostrophes strictly inside the word.
    ApostropheAware,
}

/// What happens to line breaks before segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewlinePolicy {
    /// Line breaks stay, they are whitespace to the splitter.
    Keep,
    /// Every line break becomes a single space.
    Space,
}

/// A two-letter sequence folded into one placeholder character.
///
/// `pattern` is lowercase and matched case-insensitively. The placeholder is
/// `capital_marker` when the first matched letter is uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fold {
    /// Lowercase sequence to match.
    pub pattern: &'static str,
    /// Placeholder for a lowercase match.
    pub marker: char,
    /// Placeholder for a capitalized match.
    pub capital_marker: char,
}

impl Fold {
    const fn new(pattern: &'static str, marker: char, capital_marker: char) -> Self {
        Self {
            pattern,
            marker,
            capital_marker,
        }
    }

    /// Length of the match at the start of `chars`, if any.
    fn match_len(&self, chars: &[char]) -> Option<usize> {
        let mut len = 0;
        for expected in self.pattern.chars() {
            let actual = chars.get(len)?;
            if !actual.to_lowercase().eq(expected.to_lowercase()) {
                return None;
            }
            len += 1;
        }
        Some(len)
    }
}

/// Fold every sequence in `table` into its placeholder.
///
/// Scans left to right; at each position the first table entry that matches
/// wins, so declaration order resolves overlapping patterns. Placeholders
/// never match a pattern, which makes folding idempotent.
pub fn fold_pairs(text: &str, table: &[Fold]) -> String {
    if table.is_empty() {
        return text.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let rest = &chars[i..];
        let hit = table
            .iter()
            .find_map(|fold| fold.match_len(rest).map(|len| (fold, len)));
        match hit {
            Some((fold, len)) => {
                let marker = if chars[i].is_uppercase() {
                    fold.capital_marker
                } else {
                    fold.marker
                };
                out.push(marker);
                i += len;
            }
            None => {
                out.push(chars[i]);
                i += 1;
            }
        }
    }

    out
}

/// Immutable character classes and segmentation rules for one language.
#[derive(Debug)]
pub struct LanguageProfile {
    /// The tag this profile belongs to.
    pub language: Language,
    /// Vowel letters, both cases.
    pub vowels: &'static str,
    /// Consonant letters, both cases, plus digraph placeholders.
    pub consonants: &'static str,
    /// Characters that end a sentence.
    pub sentence_terminators: &'static str,
    /// Punctuation, brackets, quotes and whitespace that are not letters.
    pub other_punctuation: &'static str,
    /// Vowel pairs that form one syllable.
    pub diphthongs: &'static [Fold],
    /// Letter pairs folded into one grapheme when digraphs are enabled.
    pub digraphs: &'static [Fold],
    /// Character substitutions applied first (straight to curly apostrophe).
    pub replacements: &'static [(char, char)],
    /// Every apostrophe variant the grapheme counter recognises.
    pub apostrophes: &'static str,
    /// Drop `[...]` groups before segmentation.
    pub bracket_strip: bool,
    /// Line-break handling.
    pub newlines: NewlinePolicy,
    /// Sentence splitting strategy.
    pub sentence_strategy: SentenceStrategy,
    /// Word extraction pattern.
    pub word_pattern: WordPattern,
    /// Grapheme counting rule.
    pub grapheme_rule: GraphemeRule,
}

impl LanguageProfile {
    /// Whether `c` is a vowel of this language.
    pub fn is_vowel(&self, c: char) -> bool {
        self.vowels.contains(c)
    }

    /// Whether `c` is a consonant of this language.
    pub fn is_consonant(&self, c: char) -> bool {
        self.consonants.contains(c)
    }

    /// Whether `c` is a letter (vowel or consonant) of this language.
    pub fn is_grapheme(&self, c: char) -> bool {
        self.is_vowel(c) || self.is_consonant(c)
    }

    /// Whether `c` ends a sentence.
    pub fn is_terminator(&self, c: char) -> bool {
        self.sentence_terminators.contains(c)
    }

    /// Whether `c` is one of the recognised apostrophe variants.
    pub fn is_apostrophe(&self, c: char) -> bool {
        self.apostrophes.contains(c)
    }

    /// Whether `c` carries a syllable: a vowel or a folded diphthong.
    pub fn is_syllable_nucleus(&self, c: char) -> bool {
        self.is_vowel(c)
            || self
                .diphthongs
                .iter()
                .any(|d| d.marker == c || d.capital_marker == c)
    }

    /// Whether `c` may appear inside a lookahead-strategy sentence span.
    pub fn is_sentence_char(&self, c: char) -> bool {
        self.is_grapheme(c)
            || self.is_terminator(c)
            || c.is_ascii_digit()
            || self.other_punctuation.contains(c)
    }
}

const DIPHTHONG_MARKER: char = '°';
const DIPHTHONG_CAPITAL_MARKER: char = '˚';

static POLISH_DIPHTHONGS: [Fold; 5] = [
    Fold::new("ia", DIPHTHONG_MARKER, DIPHTHONG_CAPITAL_MARKER),
    Fold::new("ią", DIPHTHONG_MARKER, DIPHTHONG_CAPITAL_MARKER),
    Fold::new("ie", DIPHTHONG_MARKER, DIPHTHONG_CAPITAL_MARKER),
    Fold::new("ię", DIPHTHONG_MARKER, DIPHTHONG_CAPITAL_MARKER),
    Fold::new("iu", DIPHTHONG_MARKER, DIPHTHONG_CAPITAL_MARKER),
];

static POLISH_DIGRAPHS: [Fold; 7] = [
    Fold::new("ch", 'ç', 'Ç'),
    Fold::new("cz", 'č', 'Č'),
    Fold::new("dz", 'ǳ', 'ǲ'),
    Fold::new("dź", 'ď', 'Ď'),
    Fold::new("dż", 'ǆ', 'ǅ'),
    Fold::new("rz", 'ž', 'Ž'),
    Fold::new("sz", 'š', 'Š'),
];

const APOSTROPHES: &str = "'’‘‛ʻʼ";

static STRAIGHT_TO_CURLY: [(char, char); 1] = [('\'', '’')];

static POLISH: LanguageProfile = LanguageProfile {
    language: Language::Polish,
    vowels: "aąeęiouyóAĄEĘIOUYÓ",
    consonants: "bcdfghjklłmnńprsśtwzźżBCDFGHJKLŁMNŃPRSŚTWZŹŻçčǳďǆžšÇČǲĎǅŽŠ",
    sentence_terminators: ".!?…|",
    other_punctuation: "„”«»\"'’‚—–-*¤/(`),;:_[]{}<>@ \r\n\t",
    diphthongs: &POLISH_DIPHTHONGS,
    digraphs: &POLISH_DIGRAPHS,
    replacements: &STRAIGHT_TO_CURLY,
    apostrophes: APOSTROPHES,
    bracket_strip: false,
    newlines: NewlinePolicy::Keep,
    sentence_strategy: SentenceStrategy::Delimiter,
    word_pattern: WordPattern::WordCharacters,
    grapheme_rule: GraphemeRule::Simple,
};

const RUSSIAN_VOWELS: &str = "аеёиоуыэюяАЕЁИОУЫЭЮЯ";
const RUSSIAN_CONSONANTS: &str = "бвгджзйклмнпрстфхцчшщъьБВГДЖЗЙКЛМНПРСТФХЦЧШЩЪЬ";

// The lookahead strategy predates apostrophe normalization: straight quotes
// stay allowed sentence characters and `|` is ordinary punctuation.
static RUSSIAN_V1: LanguageProfile = LanguageProfile {
    language: Language::RussianV1,
    vowels: RUSSIAN_VOWELS,
    consonants: RUSSIAN_CONSONANTS,
    sentence_terminators: ".!?…",
    other_punctuation: "„*¤/(|),;:-_\"' “«—»[<>]”–@\r\n\t{}",
    diphthongs: &[],
    digraphs: &[],
    replacements: &[],
    apostrophes: APOSTROPHES,
    bracket_strip: true,
    newlines: NewlinePolicy::Space,
    sentence_strategy: SentenceStrategy::Lookahead,
    word_pattern: WordPattern::GraphemeRun,
    grapheme_rule: GraphemeRule::Simple,
};

static RUSSIAN_V2: LanguageProfile = LanguageProfile {
    language: Language::RussianV2,
    vowels: RUSSIAN_VOWELS,
    consonants: RUSSIAN_CONSONANTS,
    sentence_terminators: ".!?…|",
    other_punctuation: "„*¤/(`),;:-_\"'’“«—»[<>]\r\n\t{}",
    diphthongs: &[],
    digraphs: &[],
    replacements: &STRAIGHT_TO_CURLY,
    apostrophes: APOSTROPHES,
    bracket_strip: true,
    newlines: NewlinePolicy::Space,
    sentence_strategy: SentenceStrategy::Delimiter,
    word_pattern: WordPattern::WordCharacters,
    grapheme_rule: GraphemeRule::Simple,
};

static UKRAINIAN: LanguageProfile = LanguageProfile {
    language: Language::Ukrainian,
    vowels: "аеєиіїоуюяАЕЄИІЇОУЮЯ",
    consonants: "бвгґджзйклмнпрстфхцчшщьБВГҐДЖЗЙКЛМНПРСТФХЦЧШЩЬ",
    sentence_terminators: ".!?…|",
    other_punctuation: "„*¤/(`),;:-_\"'’“«—»[<>]\r\n\t{}",
    diphthongs: &[],
    digraphs: &[],
    replacements: &STRAIGHT_TO_CURLY,
    apostrophes: APOSTROPHES,
    bracket_strip: true,
    newlines: NewlinePolicy::Space,
    sentence_strategy: SentenceStrategy::Delimiter,
    word_pattern: WordPattern::WordCharacters,
    grapheme_rule: GraphemeRule::ApostropheAware,
};
