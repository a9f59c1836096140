//! Alias expansion for branch and campus qualifiers.
//!
//! "南汇分院", "南汇院区" and "南汇" all name the same subordinate unit.
//! Expanding each qualifier into the set of its spellings turns qualifier
//! comparison into set intersection.

use crate::lexicon::{ANCHOR, ANCHOR_ABBREVIATIONS, BRANCH_TAGS, SYNTHETIC_TAG};

/// Branch tags a qualifier may end with, including the synthetic one.
const END_TAGS: [&str; 4] = [BRANCH_TAGS[0], BRANCH_TAGS[1], BRANCH_TAGS[2], SYNTHETIC_TAG];

/// Tags appended to a qualifier payload when expanding it.
const EXPANSION_TAGS: [&str; 6] = [
    BRANCH_TAGS[0],
    BRANCH_TAGS[1],
    BRANCH_TAGS[2],
    ANCHOR,
    ANCHOR_ABBREVIATIONS[0],
    ANCHOR_ABBREVIATIONS[1],
];

/// The branch tag `qualifier` ends with, if any.
pub fn branch_tag(qualifier: &str) -> Option<&'static str> {
    END_TAGS.into_iter().find(|tag| qualifier.ends_with(tag))
}

/// Expand a qualifier into its alias set.
///
/// Qualifiers without a branch tag are returned as-is. A bare tag ("分院")
/// is a generic branch mention and expands to every end tag. Otherwise the
/// payload is combined with every expansion tag, and the payload itself is
/// included when it is at least two code points long.
pub fn expand(qualifier: &str) -> Vec<String> {
    let Some(tag) = branch_tag(qualifier) else {
        return vec![qualifier.to_string()];
    };
    let payload = &qualifier[..qualifier.len() - tag.len()];
    if payload.is_empty() {
        return END_TAGS.iter().map(|t| t.to_string()).collect();
    }

    let mut aliases = vec![qualifier.to_string()];
    for tag in EXPANSION_TAGS {
        let alias = format!("{payload}{tag}");
        if !aliases.contains(&alias) {
            aliases.push(alias);
        }
    }
    if payload.chars().count() >= 2 {
        aliases.push(payload.to_string());
    }
    aliases
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_tags() {
        assert_eq!(branch_tag("南汇分院"), Some("分院"));
        assert_eq!(branch_tag("东注解"), Some("注解"));
        assert_eq!(branch_tag("东区"), None);
    }

    #[test]
    fn expands_named_branch() {
        let aliases = expand("南汇分院");
        for expected in ["南汇分院", "南汇分部", "南汇院区", "南汇医院", "南汇院", "南汇区", "南汇"] {
            assert!(aliases.contains(&expected.to_string()), "missing {expected}");
        }
        assert_eq!(aliases.len(), 7);
    }

    #[test]
    fn single_char_payload_is_not_bare() {
        let aliases = expand("东注解");
        assert!(aliases.contains(&"东注解".to_string()));
        assert!(aliases.contains(&"东院区".to_string()));
        assert!(aliases.contains(&"东区".to_string()));
        assert!(!aliases.contains(&"东".to_string()));
    }

    #[test]
    fn generic_branch_expands_to_all_tags() {
        assert_eq!(expand("分部"), vec!["分院", "分部", "院区", "注解"]);
    }

    #[test]
    fn untagged_qualifier_is_kept() {
        assert_eq!(expand("西区"), vec!["西区"]);
    }
}
