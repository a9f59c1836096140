//! Character-level and phrase-level normalization of directory lines.
//!
//! The output is the exact-match key for a record and the input to the
//! annotation scanner. `normalize` is idempotent.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::lexicon::Lexicon;
use crate::region;

/// "…医院第三医院" names the third branch of the first hospital, not a second
/// title. The second anchor becomes the synthetic tag.
static RE_ORDINAL_BRANCH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("医院第([零一二三四五六七八九十百]+)医院").unwrap());

/// Upper bound on pipeline passes. Built-in rules settle in two or three;
/// configured rules that re-create their own pattern would otherwise loop.
const MAX_PASSES: usize = 16;

/// Apply the full normalization pipeline.
///
/// Levels applied in order:
/// 1. Unicode NFKC
/// 2. Whitespace removal and per-character folds
/// 3. Substring rewrites (regions, compound phrases, subname rules, ordinal
///    branches)
///
/// The whole pipeline repeats until nothing changes, since removing a space
/// or a phrase can leave a combining mark next to a new base character.
pub fn normalize(line: &str, lexicon: &Lexicon) -> String {
    let mut s = normalize_once(line, lexicon);
    for _ in 1..MAX_PASSES {
        let next = normalize_once(&s, lexicon);
        if next == s {
            return s;
        }
        s = next;
    }
    tracing::warn!(line, "normalization did not settle; check configured rules");
    s
}

fn normalize_once(s: &str, lexicon: &Lexicon) -> String {
    let s = compatibility_fold(s);
    let s = fold_chars(&s, lexicon);
    rewrite_once(&s, lexicon)
}

// ── Level 1: Unicode NFKC ─────────────────────────────────────────────

/// Full-width forms become their ASCII counterparts before the char map runs.
fn compatibility_fold(s: &str) -> String {
    s.nfkc().collect()
}

// ── Level 2: Character folds ──────────────────────────────────────────

fn fold_chars(s: &str, lexicon: &Lexicon) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| lexicon.fold_char(c))
        .collect()
}

// ── Level 3: Substring rewrites ───────────────────────────────────────

fn rewrite_once(s: &str, lexicon: &Lexicon) -> String {
    let s = region::canonicalize(s, lexicon.regions());
    let s = replace_pairs(s, lexicon.phrase_rewrites());
    let s = replace_pairs(s, lexicon.subname_rules());
    tag_ordinal_branches(&s)
}

fn replace_pairs(mut s: String, pairs: &[(String, String)]) -> String {
    for (from, to) in pairs {
        if s.contains(from.as_str()) {
            s = s.replace(from.as_str(), to);
        }
    }
    s
}

fn tag_ordinal_branches(s: &str) -> String {
    RE_ORDINAL_BRANCH
        .replace_all(s, "医院第${1}注解")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(s: &str) -> String {
        normalize(s, &Lexicon::standard())
    }

    // ── Level 1: NFKC ─────────────────────────────────────────────────

    #[test]
    fn fullwidth_digits() {
        assert_eq!(compatibility_fold("１２３"), "123");
    }

    // ── Level 2: Character folds ──────────────────────────────────────

    #[test]
    fn removes_spaces() {
        assert_eq!(norm("北京 协和　医院"), "北京协和医院");
    }

    #[test]
    fn folds_brackets() {
        assert_eq!(norm("华山医院【北院】"), "华山医院(北注解)");
        assert_eq!(norm("华山医院《浦东》"), "华山医院(浦东)");
    }

    #[test]
    fn digits_become_numerals() {
        assert_eq!(norm("上海市第6人民医院"), "上海第六人民医院");
        assert_eq!(norm("解放军301医院"), "解放军三零一医院");
    }

    #[test]
    fn separators_collapse() {
        assert_eq!(norm("甲医院、乙医院,丙医院"), "甲医院/乙医院/丙医院");
    }

    #[test]
    fn traditional_characters() {
        assert_eq!(norm("廣東省人民醫院"), "广东人民医院");
    }

    #[test]
    fn colon_folds() {
        assert_eq!(norm("甲医院(原：乙医院)"), "甲医院(原:乙医院)");
    }

    // ── Level 3: Rewrites ─────────────────────────────────────────────

    #[test]
    fn drops_affiliated_marker() {
        assert_eq!(norm("复旦大学附属华山医院"), "复旦大学华山医院");
    }

    #[test]
    fn collapses_army_phrase() {
        assert_eq!(norm("中国人民解放军第三零九医院"), "解放军第三零九医院");
    }

    #[test]
    fn collapses_tcm_phrase() {
        assert_eq!(norm("阜南县中医医院"), "阜南县中医院");
    }

    #[test]
    fn campus_phrase_becomes_synthetic_branch() {
        assert_eq!(norm("华山医院东院"), "华山医院东注解");
        assert_eq!(norm("华山医院东院区"), "华山医院东注解");
    }

    #[test]
    fn ordinal_branch_is_tagged() {
        assert_eq!(norm("苏州大学医院第二医院"), "苏州大学医院第二注解");
    }

    #[test]
    fn ordinal_without_second_anchor_is_untouched() {
        assert_eq!(norm("苏州大学医院第二分院"), "苏州大学医院第二分院");
    }

    #[test]
    fn region_exposed_by_rewrite() {
        assert_eq!(norm("北京市市"), "北京");
    }

    #[test]
    fn combining_mark_exposed_by_removal_is_composed() {
        assert_eq!(norm("e \u{301}医院"), "\u{e9}医院");
        assert_eq!(norm("e附属\u{301}医院"), "\u{e9}医院");
    }

    #[test]
    fn self_expanding_rule_terminates() {
        let growing = Lexicon::with_rules(
            Vec::new(),
            vec![("医院".to_string(), "人民医院".to_string())],
        );
        assert!(normalize("协和医院", &growing).ends_with("人民医院"));

        let tagging = Lexicon::with_rules(vec![("院".to_string(), "院".to_string())], Vec::new());
        assert!(normalize("协和医院", &tagging).contains("注解"));
    }

    // ── Idempotence ───────────────────────────────────────────────────

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            "",
            "上海市浦东医院复旦大学附属华山医院南汇分院(原:上海市浦东新区中心医院)",
            "十堰市太和医院/湖北医药学院(原:郧阳医学院)附属太和医院",
            "中国人民解放军第301医院",
            "北京市市",
            "附附属属医院",
            "苏州大学医院第二医院第三医院",
            "华山医院东院区（浦东）",
            "ＡＢＣ医院【１号楼】",
            "第二军医大学第一附属医院",
            "①号医院",
            "  广西壮族自治区  妇幼保健院 ",
            "甲医院(乙(丙)丁",
            "e \u{301}医院",
            "a\u{a8}医院",
            "e附属\u{301}医院",
        ];
        for sample in samples {
            let once = norm(sample);
            assert_eq!(norm(&once), once, "not idempotent for {sample:?}");
        }
    }
}
