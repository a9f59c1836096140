//! Signature rules for numbered military hospitals.
//!
//! Names like "第二军医大学第一医院" or "解放军第三零九医院" differ from their
//! siblings only in a numeral, so suffix comparison alone both merges
//! different hospitals and misses equal ones. Each rule extracts a numeral
//! signature from a name and compares signatures instead.

use std::sync::LazyLock;

use regex::Regex;

/// A run of Chinese numerals.
const NUMERAL: &str = "[零一二三四五六七八九十]+";

static RE_MILITARY_UNIVERSITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("{NUMERAL}军医大学{NUMERAL}医院")).unwrap());

static RE_SERVICE_BRANCH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("解放军|海军|陆军|空军|武警").unwrap());

static RE_NUMBERED_HOSPITAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("{NUMERAL}医院")).unwrap());

/// Outcome of a signature rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Signatures agree; the names refer to the same hospital.
    Match,
    /// Signatures disagree; the names must not match by any rule.
    NoMatch,
    /// The rule has nothing to say about this pair.
    Indeterminate,
}

/// Signatures of one name, computed once per indexed name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameSignatures {
    /// "<n>军医大学<n>医院", ordinal markers removed; empty if absent.
    pub military_university: String,
    /// Service branch followed by "<n>医院"; empty if either part is absent.
    pub armed_forces: String,
}

impl NameSignatures {
    pub fn compute(name: &str) -> Self {
        Self {
            military_university: military_university_signature(name),
            armed_forces: armed_forces_signature(name),
        }
    }

    /// Combined verdict of both rules for a pair of names.
    ///
    /// A military-university mismatch wins over everything; otherwise any
    /// rule reporting a match makes the pair match.
    pub fn compare(&self, other: &Self) -> Verdict {
        match compare_military_university(&self.military_university, &other.military_university) {
            Verdict::NoMatch => Verdict::NoMatch,
            Verdict::Match => Verdict::Match,
            Verdict::Indeterminate => {
                compare_armed_forces(&self.armed_forces, &other.armed_forces)
            }
        }
    }
}

pub fn military_university_signature(name: &str) -> String {
    let name = name.replace('第', "");
    RE_MILITARY_UNIVERSITY
        .find(&name)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

pub fn armed_forces_signature(name: &str) -> String {
    match (RE_SERVICE_BRANCH.find(name), RE_NUMBERED_HOSPITAL.find(name)) {
        (Some(branch), Some(number)) => format!("{}{}", branch.as_str(), number.as_str()),
        _ => String::new(),
    }
}

/// Both empty or one empty: indeterminate. Both present: equal or rejected.
pub fn compare_military_university(a: &str, b: &str) -> Verdict {
    if a.is_empty() || b.is_empty() {
        Verdict::Indeterminate
    } else if a == b {
        Verdict::Match
    } else {
        Verdict::NoMatch
    }
}

/// Equal non-empty signatures match; anything else falls through.
pub fn compare_armed_forces(a: &str, b: &str) -> Verdict {
    if !a.is_empty() && a == b {
        Verdict::Match
    } else {
        Verdict::Indeterminate
    }
}
