//! Read-only index over the canonical reference list, and the resolver that
//! maps an external record onto it.
//!
//! Built once per run. Both lookup structures are immutable afterwards, so a
//! shared `&MatchIndex` can be queried from any number of threads.

use std::cmp::Ordering;

use hoslabel_parse::{char_len, Entity, Lexicon, MIN_TITLE_LEN};

use crate::matcher::{annotation_overlap, names_match, subnames_compatible};
use crate::signature::NameSignatures;

/// How a query was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Normalized forms are equal (ignoring case).
    Exact(&'a Entity),
    /// Found by the name scan; `name` is the canonical name that matched.
    Heuristic { entity: &'a Entity, name: &'a str },
    /// Normalized query is shorter than [`MIN_TITLE_LEN`].
    TooShort,
    NoMatch,
}

impl<'a> Resolution<'a> {
    pub fn entity(&self) -> Option<&'a Entity> {
        match *self {
            Self::Exact(entity) | Self::Heuristic { entity, .. } => Some(entity),
            Self::TooShort | Self::NoMatch => None,
        }
    }
}

/// One canonical name with a back-reference to its owning record.
#[derive(Debug, Clone)]
struct NameEntry {
    owner: usize,
    slot: usize,
    len: usize,
    signatures: NameSignatures,
}

impl NameEntry {
    fn name<'a>(&self, entities: &'a [Entity]) -> &'a str {
        &entities[self.owner].names()[self.slot]
    }
}

/// Lookup structures over the canonical records.
#[derive(Debug)]
pub struct MatchIndex {
    /// Canonical records in input order.
    entities: Vec<Entity>,
    /// Indices into `entities`, ascending by normalized form ignoring case.
    by_normalized: Vec<usize>,
    /// Every canonical name, ascending by length; ties keep input order.
    names: Vec<NameEntry>,
}

impl MatchIndex {
    /// Parse the canonical lines and index them. Blank lines are skipped.
    #[tracing::instrument(name = "build_index", skip_all)]
    pub fn build<I, S>(lexicon: &Lexicon, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entities = lines
            .into_iter()
            .filter(|line| !line.as_ref().trim().is_empty())
            .map(|line| Entity::parse(line.as_ref(), lexicon))
            .collect();
        Self::from_entities(entities)
    }

    /// Index already parsed records.
    pub fn from_entities(entities: Vec<Entity>) -> Self {
        let mut by_normalized: Vec<usize> = (0..entities.len()).collect();
        by_normalized.sort_by(|&a, &b| {
            cmp_ignore_case(entities[a].normalized(), entities[b].normalized())
        });

        let mut names: Vec<NameEntry> = entities
            .iter()
            .enumerate()
            .flat_map(|(owner, entity)| {
                entity.names().iter().enumerate().map(move |(slot, name)| NameEntry {
                    owner,
                    slot,
                    len: char_len(name),
                    signatures: NameSignatures::compute(name),
                })
            })
            .collect();
        names.sort_by_key(|entry| entry.len);

        tracing::debug!(
            records = entities.len(),
            names = names.len(),
            "Match index built"
        );

        Self {
            entities,
            by_normalized,
            names,
        }
    }

    /// Canonical records in input order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Parse one external line and resolve it.
    pub fn label(&self, lexicon: &Lexicon, line: &str) -> Option<&Entity> {
        self.resolve(&Entity::parse(line, lexicon))
    }

    /// The canonical record `query` resolves to, if any.
    pub fn resolve(&self, query: &Entity) -> Option<&Entity> {
        self.resolve_detailed(query).entity()
    }

    /// Resolve `query`, reporting which path produced the result.
    ///
    /// Flow: exact normalized lookup → length guard → name scan per query
    /// name, longest first.
    pub fn resolve_detailed(&self, query: &Entity) -> Resolution<'_> {
        if let Some(entity) = self.find_exact(query.normalized()) {
            return Resolution::Exact(entity);
        }
        if char_len(query.normalized()) < MIN_TITLE_LEN {
            return Resolution::TooShort;
        }
        for name in query.names() {
            if let Some(entry) = self.best_match(name, query) {
                return Resolution::Heuristic {
                    entity: &self.entities[entry.owner],
                    name: entry.name(&self.entities),
                };
            }
        }
        Resolution::NoMatch
    }

    /// Binary search on the normalized key. Among equal keys the first in
    /// sort order wins.
    fn find_exact(&self, key: &str) -> Option<&Entity> {
        let pos = self.by_normalized.partition_point(|&i| {
            cmp_ignore_case(self.entities[i].normalized(), key) == Ordering::Less
        });
        self.by_normalized
            .get(pos)
            .map(|&i| &self.entities[i])
            .filter(|e| cmp_ignore_case(e.normalized(), key) == Ordering::Equal)
    }

    /// Best canonical name for one query name.
    ///
    /// Smaller length difference wins, then more shared annotations, then
    /// the earlier entry. The scan stops once the length difference exceeds
    /// the best found so far.
    fn best_match(&self, name: &str, query: &Entity) -> Option<&NameEntry> {
        let len = char_len(name);
        let sigs = NameSignatures::compute(name);
        let mut best: Option<&NameEntry> = None;
        let mut best_diff = usize::MAX;
        let mut best_overlap = 0;

        for entry in &self.names {
            let diff = len.abs_diff(entry.len);
            if diff > best_diff {
                break;
            }
            let owner = &self.entities[entry.owner];
            if !subnames_compatible(query, owner) {
                continue;
            }
            if !names_match(name, &sigs, entry.name(&self.entities), &entry.signatures) {
                continue;
            }
            let overlap = annotation_overlap(query, owner);
            if diff < best_diff || overlap > best_overlap {
                best = Some(entry);
                best_diff = diff;
                best_overlap = overlap;
            }
        }
        best
    }
}

/// Ordinal comparison after upper-casing each character.
fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_uppercase)
        .cmp(b.chars().flat_map(char::to_uppercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(lines: &[&str]) -> MatchIndex {
        MatchIndex::build(&Lexicon::standard(), lines)
    }

    fn query(s: &str) -> Entity {
        Entity::parse(s, &Lexicon::standard())
    }

    fn resolved<'a>(index: &'a MatchIndex, s: &str) -> Option<&'a str> {
        index.resolve(&query(s)).map(Entity::original)
    }

    // ── Construction ──────────────────────────────────────────────────

    #[test]
    fn skips_blank_lines() {
        let idx = index(&["", "  ", "北京协和医院", "\t"]);
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn name_index_is_ascending_by_length() {
        let idx = index(&["复旦大学华山医院", "协和医院", "上海浦东医院复旦大学华山医院"]);
        let lens: Vec<usize> = idx.names.iter().map(|e| e.len).collect();
        assert!(lens.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(idx.names.len(), 4);
    }

    #[test]
    fn empty_index_matches_nothing() {
        let idx = index(&[]);
        assert!(idx.is_empty());
        assert_eq!(resolved(&idx, "北京协和医院"), None);
    }

    // ── Exact path ────────────────────────────────────────────────────

    #[test]
    fn exact_match_short_circuits() {
        // Shorter than MIN_TITLE_LEN: only the exact path can match it.
        let idx = index(&["协和医院", "北京协和医院"]);
        let q = query("协和 医院");
        assert!(matches!(
            idx.resolve_detailed(&q),
            Resolution::Exact(e) if e.original() == "协和医院"
        ));
    }

    #[test]
    fn exact_match_ignores_case() {
        let idx = index(&["ABC国际医院"]);
        let q = query("abc国际医院");
        assert!(matches!(idx.resolve_detailed(&q), Resolution::Exact(_)));
    }

    #[test]
    fn exact_match_after_normalization() {
        let idx = index(&["上海市第6人民医院"]);
        assert_eq!(resolved(&idx, "上海第六人民医院"), Some("上海市第6人民医院"));
    }

    // ── Length guard ──────────────────────────────────────────────────

    #[test]
    fn short_query_is_rejected() {
        let idx = index(&["阜南县中医院"]);
        let q = query("阜南中医院");
        assert_eq!(idx.resolve_detailed(&q), Resolution::TooShort);
    }

    // ── Heuristic path ────────────────────────────────────────────────

    #[test]
    fn suffix_match_resolves() {
        let idx = index(&["北京协和医院", "复旦大学附属华山医院"]);
        let q = query("上海复旦大学华山医院");
        match idx.resolve_detailed(&q) {
            Resolution::Heuristic { entity, name } => {
                assert_eq!(entity.original(), "复旦大学附属华山医院");
                assert_eq!(name, "复旦大学华山医院");
            }
            other => panic!("Expected Heuristic, got {other:?}"),
        }
    }

    #[test]
    fn gap_of_one_does_not_match() {
        let idx = index(&["沙县人民医院"]);
        assert_eq!(resolved(&idx, "金沙县人民医院"), None);
        assert_eq!(resolved(&idx, "福建沙县人民医院"), Some("沙县人民医院"));
    }

    #[test]
    fn cross_branch_merge_is_blocked() {
        let idx = index(&["华山医院东区"]);
        assert_eq!(resolved(&idx, "华山医院西区"), None);
        assert_eq!(resolved(&idx, "复旦华山医院东区"), Some("华山医院东区"));
    }

    #[test]
    fn branch_wording_variants_resolve() {
        let idx = index(&["复旦大学附属华山医院南汇分院"]);
        assert_eq!(
            resolved(&idx, "华山医院(南汇院区)"),
            Some("复旦大学附属华山医院南汇分院")
        );
    }

    #[test]
    fn smaller_length_difference_wins() {
        let idx = index(&["复旦大学华山人民医院(乙)", "复旦华山人民医院"]);
        assert_eq!(resolved(&idx, "华山人民医院(乙)"), Some("复旦华山人民医院"));
    }

    #[test]
    fn annotation_overlap_breaks_ties() {
        let idx = index(&["上海华山人民医院(甲)", "复旦华山人民医院(乙)"]);
        assert_eq!(resolved(&idx, "华山人民医院(乙)"), Some("复旦华山人民医院(乙)"));
        assert_eq!(resolved(&idx, "华山人民医院(甲)"), Some("上海华山人民医院(甲)"));
    }

    #[test]
    fn first_entry_wins_remaining_ties() {
        let idx = index(&["上海华山人民医院", "复旦华山人民医院"]);
        assert_eq!(resolved(&idx, "华山人民医院"), Some("上海华山人民医院"));
        let idx = index(&["复旦华山人民医院", "上海华山人民医院"]);
        assert_eq!(resolved(&idx, "华山人民医院"), Some("复旦华山人民医院"));
    }

    #[test]
    fn military_signature_rejects_suffix_match() {
        let idx = index(&["二军医大学一医院"]);
        assert_eq!(resolved(&idx, "七十二军医大学一医院"), None);
    }

    #[test]
    fn longest_query_name_is_tried_first() {
        let idx = index(&["十堰太和医院", "郧阳医学院太和医院"]);
        let q = query("十堰市太和医院(原:郧阳医学院太和医院)");
        assert_eq!(
            idx.resolve(&q).map(Entity::original),
            Some("郧阳医学院太和医院")
        );
    }

    #[test]
    fn label_parses_and_resolves() {
        let lexicon = Lexicon::standard();
        let idx = MatchIndex::build(&lexicon, ["北京协和医院"]);
        assert!(idx.label(&lexicon, "北京 协和医院").is_some());
    }
}
