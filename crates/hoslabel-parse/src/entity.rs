use std::cmp::Reverse;

use serde::Serialize;

use crate::lexicon::{Lexicon, ANCHOR};
use crate::normalize::normalize;
use crate::scanner::{extract, Extraction};
use crate::{splitter, subname};

/// A parsed directory line.
///
/// Built once by [`Entity::parse`] and never modified afterwards; match
/// indexes hold references into many entities at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    original: String,
    normalized: String,
    names: Vec<String>,
    subnames: Vec<String>,
    annotations: Vec<String>,
}

impl Entity {
    /// Parse one raw line.
    ///
    /// # Example
    /// ```
    /// use hoslabel_parse::{Entity, Lexicon};
    ///
    /// let e = Entity::parse("复旦大学附属华山医院南汇分院", &Lexicon::standard());
    /// assert_eq!(e.names(), ["复旦大学华山医院"]);
    /// assert!(e.subnames().iter().any(|s| s == "南汇院区"));
    /// ```
    pub fn parse(line: &str, lexicon: &Lexicon) -> Self {
        let normalized = normalize(line, lexicon);
        let Extraction {
            mut segments,
            annotations: notes,
        } = extract(&normalized);

        let mut subnames = Vec::new();
        let mut annotations = Vec::new();
        for note in notes {
            if subname::branch_tag(&note).is_some() {
                subnames.extend(subname::expand(&note));
            } else if note.contains(ANCHOR) {
                segments.push(note);
            } else {
                annotations.push(note);
            }
        }

        let mut names = Vec::new();
        for segment in &segments {
            for title in splitter::split(segment, lexicon) {
                names.push(title.main);
                if let Some(subtitle) = title.subtitle {
                    subnames.extend(subname::expand(&subtitle));
                }
            }
        }

        let mut names = dedup_in_order(names);
        names.sort_by_key(|n| Reverse(n.chars().count()));
        if names.is_empty() {
            tracing::trace!(line, "no title found");
        }

        Self {
            original: line.to_string(),
            normalized,
            names,
            subnames: dedup_in_order(subnames),
            annotations: dedup_in_order(annotations),
        }
    }

    /// The untouched input line.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The fully normalized line; the exact-match key.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Candidate institution titles, longest first.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Branch and campus qualifiers with their generated aliases.
    pub fn subnames(&self) -> &[String] {
        &self.subnames
    }

    /// Former names and remarks that are not branch qualifiers.
    pub fn annotations(&self) -> &[String] {
        &self.annotations
    }
}

/// Drop empty and repeated strings, keeping first occurrences in order.
pub(crate) fn dedup_in_order(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !item.is_empty() && !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
