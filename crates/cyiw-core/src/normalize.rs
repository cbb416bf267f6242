//! Text normalization ahead of segmentation.
//!
//! Applies, in order: the profile's character replacements, optional digraph
//! folding, `[...]` removal and line-break handling. Total over any input.

use std::sync::LazyLock;

use regex::Regex;

use crate::profile::{LanguageProfile, NewlinePolicy, TextOptions, fold_pairs};

/// Innermost bracket group: no nested brackets inside.
static BRACKET_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\[\]]*\]").expect("valid regex"));

/// Normalize `text` for the given profile.
pub fn normalize(text: &str, profile: &LanguageProfile, options: TextOptions) -> String {
    let mut text = replace_chars(text, profile.replacements);

    if options.digraphs {
        text = fold_pairs(&text, profile.digraphs);
    }

    if profile.bracket_strip {
        text = strip_brackets(&text);
    }

    match profile.newlines {
        NewlinePolicy::Keep => text,
        NewlinePolicy::Space => text.replace("\r\n", " ").replace(['\n', '\r'], " "),
    }
}

/// Remove `[...]` groups, innermost first, until none remain.
///
/// Unbalanced brackets are left alone.
pub fn strip_brackets(text: &str) -> String {
    let mut text = text.to_string();
    while BRACKET_GROUP.is_match(&text) {
        text = BRACKET_GROUP.replace_all(&text, "").into_owned();
    }
    text
}

fn replace_chars(text: &str, table: &[(char, char)]) -> String {
    text.chars()
        .map(|c| {
            table
                .iter()
                .find_map(|&(from, to)| (from == c).then_some(to))
                .unwrap_or(c)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Language;

    const DIGRAPHS: TextOptions = TextOptions {
        digraphs: true,
        nullsilber: false,
    };

    #[test]
    fn empty_input_stays_empty() {
        for lang in Language::ALL {
            assert_eq!(normalize("", lang.profile(), DIGRAPHS), "");
        }
    }

    #[test]
    fn straight_apostrophe_becomes_curly() {
        let out = normalize("м'ята", Language::Ukrainian.profile(), TextOptions::default());
        assert_eq!(out, "м’ята");
    }

    #[test]
    fn lookahead_profile_keeps_straight_apostrophe() {
        let out = normalize("д'Артаньян", Language::RussianV1.profile(), TextOptions::default());
        assert_eq!(out, "д'Артаньян");
    }

    #[test]
    fn digraphs_fold_only_when_enabled() {
        let profile = Language::Polish.profile();
        assert_eq!(normalize("szum", profile, TextOptions::default()), "szum");
        assert_eq!(normalize("szum", profile, DIGRAPHS), "šum");
    }

    #[test]
    fn digraph_flag_is_noop_without_table() {
        let profile = Language::RussianV2.profile();
        assert_eq!(normalize("щука", profile, DIGRAPHS), "щука");
    }

    #[test]
    fn digraph_folding_is_idempotent() {
        let profile = Language::Polish.profile();
        let once = normalize("Rzeczywiście, czyż nie?", profile, DIGRAPHS);
        let twice = normalize(&once, profile, DIGRAPHS);
        assert_eq!(once, twice);
    }

    #[test]
    fn nested_brackets_are_removed_completely() {
        assert_eq!(strip_brackets("Текст [сноска [1]] дальше."), "Текст  дальше.");
        assert_eq!(strip_brackets("a [b] c [d]"), "a  c ");
    }

    #[test]
    fn unbalanced_bracket_is_kept() {
        assert_eq!(strip_brackets("a [b c"), "a [b c");
    }

    #[test]
    fn polish_keeps_brackets() {
        let out = normalize("Kot [przypis] śpi.", Language::Polish.profile(), TextOptions::default());
        assert_eq!(out, "Kot [przypis] śpi.");
    }

    #[test]
    fn newlines_become_spaces_for_cyrillic_profiles() {
        let out = normalize("Один\r\nдва\nтри", Language::RussianV2.profile(), TextOptions::default());
        assert_eq!(out, "Один два три");
    }

    #[test]
    fn polish_keeps_newlines() {
        let out = normalize("Kot\nśpi", Language::Polish.profile(), TextOptions::default());
        assert_eq!(out, "Kot\nśpi");
    }
}
