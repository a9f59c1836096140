//! Lookup tables shared by the normalizer, the annotation scanner and the
//! title splitter.
//!
//! Every table is fixed once a [`Lexicon`] is built. Character folds are
//! compile-time `phf` maps; phrase and subname rules are plain ordered pairs
//! so callers can extend them from configuration.

use phf::phf_map;

use crate::region::{self, REGIONS};

/// Token every institution title ends with.
pub const ANCHOR: &str = "医院";

/// Tags marking a branch or campus qualifier. All are two code points long.
pub const BRANCH_TAGS: [&str; 3] = ["分院", "分部", "院区"];

/// Internal branch tag produced by subname rules and the ordinal-branch rewrite.
pub const SYNTHETIC_TAG: &str = "注解";

/// Single-character short forms of the anchor and campus tags.
pub const ANCHOR_ABBREVIATIONS: [&str; 2] = ["院", "区"];

/// Titles shorter than this (in code points) are too ambiguous to stand alone.
pub const MIN_TITLE_LEN: usize = 6;

/// Canonical separator between parallel names and multi-valued annotations.
pub const SEPARATOR: char = '/';

/// Per-character folds applied after NFKC.
///
/// Brackets collapse to `(`/`)`, digits are spelled out (the reference list
/// writes numerals in Chinese), separator punctuation collapses to
/// [`SEPARATOR`], and a handful of traditional characters are simplified.
pub static CHAR_FOLDS: phf::Map<char, char> = phf_map! {
    // ── Brackets ─────────────────────────────────────────────────
    '（' => '(',
    '[' => '(',
    '【' => '(',
    '{' => '(',
    '｛' => '(',
    '<' => '(',
    '《' => '(',
    '）' => ')',
    ']' => ')',
    '】' => ')',
    '}' => ')',
    '｝' => ')',
    '>' => ')',
    '》' => ')',

    // ── Colon ────────────────────────────────────────────────────
    '：' => ':',

    // ── Digits ───────────────────────────────────────────────────
    '0' => '零',
    '1' => '一',
    '2' => '二',
    '3' => '三',
    '4' => '四',
    '5' => '五',
    '6' => '六',
    '7' => '七',
    '8' => '八',
    '9' => '九',

    // ── Separators ───────────────────────────────────────────────
    '、' => '/',
    '，' => '/',
    '；' => '/',
    '。' => '/',
    ',' => '/',
    ';' => '/',
    '.' => '/',
    '\\' => '/',

    // ── Traditional → simplified ─────────────────────────────────
    '醫' => '医',
    '區' => '区',
    '屬' => '属',
    '東' => '东',
    '廣' => '广',
    '華' => '华',
    '婦' => '妇',
    '兒' => '儿',
    '衛' => '卫',
    '療' => '疗',
    '縣' => '县',
    '鎮' => '镇',
    '軍' => '军',
    '學' => '学',
};

/// Built-in compound-phrase rewrites, longest phrase first.
const PHRASE_REWRITES: &[(&str, &str)] = &[
    ("中国人民解放军", "解放军"),
    ("人民解放军", "解放军"),
    ("中医医院", "中医院"),
    ("附属", ""),
];

/// Built-in campus phrases that become synthetic branch qualifiers.
///
/// `("东院", "东")` rewrites "…医院东院" to "…医院东注解", so the splitter
/// reads it as the east campus of the preceding title.
const SUBNAME_RULES: &[(&str, &str)] = &[
    ("东院区", "东"),
    ("西院区", "西"),
    ("南院区", "南"),
    ("北院区", "北"),
    ("东院", "东"),
    ("西院", "西"),
    ("南院", "南"),
    ("北院", "北"),
];

/// Immutable table set handed by reference to every parsing stage.
#[derive(Debug, Clone)]
pub struct Lexicon {
    regions: &'static [(&'static str, &'static str)],
    phrase_rewrites: Vec<(String, String)>,
    /// `(phrase, qualifier + SYNTHETIC_TAG)`.
    subname_rules: Vec<(String, String)>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::standard()
    }
}

impl Lexicon {
    /// The built-in tables.
    pub fn standard() -> Self {
        Self::with_rules(Vec::new(), Vec::new())
    }

    /// Built-in tables extended with caller-supplied rules.
    ///
    /// `subname_rules` are `(phrase, qualifier)` pairs; `phrase_rewrites` are
    /// `(from, to)` pairs. Both lists end up ordered longest-`from`-first so a
    /// phrase is never pre-empted by one of its own substrings.
    pub fn with_rules(
        subname_rules: impl IntoIterator<Item = (String, String)>,
        phrase_rewrites: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        let mut phrases: Vec<(String, String)> = PHRASE_REWRITES
            .iter()
            .map(|&(from, to)| (from.to_string(), to.to_string()))
            .chain(phrase_rewrites)
            .filter(|(from, _)| !from.is_empty())
            .collect();
        sort_longest_first(&mut phrases);

        let mut subnames: Vec<(String, String)> = SUBNAME_RULES
            .iter()
            .map(|&(phrase, qualifier)| (phrase.to_string(), qualifier.to_string()))
            .chain(subname_rules)
            .filter(|(phrase, _)| !phrase.is_empty())
            .map(|(phrase, qualifier)| (phrase, format!("{qualifier}{SYNTHETIC_TAG}")))
            .collect();
        sort_longest_first(&mut subnames);

        Self {
            regions: REGIONS,
            phrase_rewrites: phrases,
            subname_rules: subnames,
        }
    }

    /// Fold one character, returning it unchanged when no fold applies.
    pub fn fold_char(&self, c: char) -> char {
        CHAR_FOLDS.get(&c).copied().unwrap_or(c)
    }

    pub fn regions(&self) -> &[(&'static str, &'static str)] {
        self.regions
    }

    pub fn phrase_rewrites(&self) -> &[(String, String)] {
        &self.phrase_rewrites
    }

    pub fn subname_rules(&self) -> &[(String, String)] {
        &self.subname_rules
    }

    /// Whether `fragment` names a province-level region.
    pub fn is_region_rooted(&self, fragment: &str) -> bool {
        region::is_region_rooted(fragment, self.regions)
    }
}

fn sort_longest_first(pairs: &mut [(String, String)]) {
    pairs.sort_by_key(|(from, _)| std::cmp::Reverse(from.chars().count()));
}
