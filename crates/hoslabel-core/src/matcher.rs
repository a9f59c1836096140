//! Pairwise rules deciding whether two parsed records may name the same
//! institution.

use hoslabel_parse::{char_len, Entity};

use crate::signature::{NameSignatures, Verdict};

/// Suffix rule: the shorter name ends the longer one, and the two do not
/// differ by exactly one code point ("沙县中医院" vs "金沙县中医院").
pub fn general_match(a: &str, b: &str) -> bool {
    let (sub, main) = if char_len(a) <= char_len(b) { (a, b) } else { (b, a) };
    main.ends_with(sub) && char_len(main) - char_len(sub) != 1
}

/// Whether `name` and `candidate` match under the suffix rule or a
/// signature rule. A signature rejection overrides the suffix rule.
pub fn names_match(
    name: &str,
    name_sigs: &NameSignatures,
    candidate: &str,
    candidate_sigs: &NameSignatures,
) -> bool {
    match name_sigs.compare(candidate_sigs) {
        Verdict::NoMatch => false,
        Verdict::Match => true,
        Verdict::Indeterminate => general_match(name, candidate),
    }
}

/// Branch gating, checked in both directions.
///
/// Records with disjoint qualifier sets never match, even under identical
/// titles, unless one side's qualifier appears inside the other's name.
pub fn subnames_compatible(a: &Entity, b: &Entity) -> bool {
    covers_subnames(a, b.subnames()) && covers_subnames(b, a.subnames())
}

fn covers_subnames(entity: &Entity, subnames: &[String]) -> bool {
    if subnames.is_empty() {
        return true;
    }
    if entity.subnames().iter().any(|s| subnames.contains(s)) {
        return true;
    }
    entity
        .names()
        .iter()
        .any(|n| subnames.iter().any(|s| n.contains(s.as_str())))
}

/// Number of annotations the two records share.
pub fn annotation_overlap(a: &Entity, b: &Entity) -> usize {
    a.annotations()
        .iter()
        .filter(|x| b.annotations().contains(x))
        .count()
}
