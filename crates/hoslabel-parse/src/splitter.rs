//! Splits a cleaned name fragment into institution titles and their branch
//! qualifiers.
//!
//! A fragment may chain several titles, each ending in [`ANCHOR`], with an
//! optional qualifier after each one. Qualifiers bind to the title right
//! before them, so the fragment is processed from the end backwards.

use crate::lexicon::{Lexicon, ANCHOR, MIN_TITLE_LEN};

/// One title found in a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title {
    /// Text up to and including the anchor.
    pub main: String,
    /// Text between this title's anchor and the next title, if any.
    pub subtitle: Option<String>,
}

/// Split `fragment` into titles, in left-to-right order.
///
/// A candidate title shorter than [`MIN_TITLE_LEN`] whose span is not
/// region-rooted is folded, together with its trailing text, into the
/// subtitle of the title before it.
pub fn split(fragment: &str, lexicon: &Lexicon) -> Vec<Title> {
    if fragment.is_empty() {
        return Vec::new();
    }
    let chars: Vec<char> = fragment.chars().collect();
    let anchors = anchor_ends(&chars);
    if anchors.is_empty() {
        return vec![Title {
            main: fragment.to_string(),
            subtitle: None,
        }];
    }

    let mut titles = Vec::new();
    let mut segment_end = chars.len();
    let mut remaining = anchors.len();

    while remaining > 0 {
        let mut idx = remaining - 1;
        while idx > 0 {
            let start = anchors[idx - 1];
            let main_len = anchors[idx] - start;
            let span: String = chars[start..segment_end].iter().collect();
            if main_len >= MIN_TITLE_LEN || lexicon.is_region_rooted(&span) {
                break;
            }
            idx -= 1;
        }

        let start = if idx == 0 { 0 } else { anchors[idx - 1] };
        let end = anchors[idx];
        debug_assert!(end > start, "empty main title in {fragment:?}");

        let main: String = chars[start..end].iter().collect();
        let subtitle: String = chars[end..segment_end].iter().collect();
        titles.push(Title {
            main,
            subtitle: (!subtitle.is_empty()).then_some(subtitle),
        });

        segment_end = start;
        remaining = idx;
    }

    titles.reverse();
    titles
}

/// Char index just past each non-overlapping anchor occurrence.
fn anchor_ends(chars: &[char]) -> Vec<usize> {
    let anchor: Vec<char> = ANCHOR.chars().collect();
    let mut ends = Vec::new();
    let mut i = 0;
    while i + anchor.len() <= chars.len() {
        if chars[i..i + anchor.len()] == anchor[..] {
            i += anchor.len();
            ends.push(i);
        } else {
            i += 1;
        }
    }
    ends
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_std(s: &str) -> Vec<Title> {
        split(s, &Lexicon::standard())
    }

    fn title(main: &str, subtitle: Option<&str>) -> Title {
        Title {
            main: main.into(),
            subtitle: subtitle.map(Into::into),
        }
    }

    #[test]
    fn no_anchor_is_single_title() {
        assert_eq!(split_std("湖北医药学院"), vec![title("湖北医药学院", None)]);
    }

    #[test]
    fn empty_fragment() {
        assert!(split_std("").is_empty());
    }

    #[test]
    fn single_title_with_branch() {
        assert_eq!(
            split_std("复旦大学华山医院南汇分院"),
            vec![title("复旦大学华山医院", Some("南汇分院"))]
        );
    }

    #[test]
    fn chained_titles() {
        assert_eq!(
            split_std("上海浦东医院复旦大学华山医院南汇分院"),
            vec![
                title("上海浦东医院", None),
                title("复旦大学华山医院", Some("南汇分院")),
            ]
        );
    }

    #[test]
    fn short_title_folds_into_previous_subtitle() {
        assert_eq!(
            split_std("北京协和医院西单医院"),
            vec![title("北京协和医院", Some("西单医院"))]
        );
    }

    #[test]
    fn short_region_rooted_title_stands_alone() {
        assert_eq!(
            split_std("协和医科大学医院北京医院"),
            vec![title("协和医科大学医院", None), title("北京医院", None)]
        );
    }

    #[test]
    fn short_first_title_is_kept() {
        assert_eq!(split_std("协和医院东区"), vec![title("协和医院", Some("东区"))]);
    }

    #[test]
    fn fold_can_skip_several_anchors() {
        assert_eq!(
            split_std("四川大学华西医院甲医院乙医院"),
            vec![title("四川大学华西医院", Some("甲医院乙医院"))]
        );
    }
}
