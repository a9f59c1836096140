//! Deduplication of one name list against itself.

use std::cmp::Reverse;

use hoslabel_parse::{char_len, Entity, Lexicon};

use crate::matcher::{names_match, subnames_compatible};
use crate::signature::NameSignatures;

/// A kept record with its name signatures computed once.
struct Representative {
    entity: Entity,
    names: Vec<(String, NameSignatures)>,
}

impl Representative {
    fn new(entity: Entity) -> Self {
        let names = entity
            .names()
            .iter()
            .map(|n| (n.clone(), NameSignatures::compute(n)))
            .collect();
        Self { entity, names }
    }

    fn absorbs(&self, candidate: &Representative) -> bool {
        subnames_compatible(&self.entity, &candidate.entity)
            && self.names.iter().any(|(name, sigs)| {
                candidate
                    .names
                    .iter()
                    .any(|(other, other_sigs)| names_match(name, sigs, other, other_sigs))
            })
    }
}

/// Collapse `lines` into one representative per institution.
///
/// Longer normalized forms are considered first, so the most detailed
/// spelling of an institution becomes its representative. Blank lines are
/// skipped.
#[tracing::instrument(skip_all)]
pub fn cluster<I, S>(lexicon: &Lexicon, lines: I) -> Vec<Entity>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut entities: Vec<Entity> = lines
        .into_iter()
        .filter(|line| !line.as_ref().trim().is_empty())
        .map(|line| Entity::parse(line.as_ref(), lexicon))
        .collect();
    entities.sort_by_key(|e| Reverse(char_len(e.normalized())));

    let mut kept: Vec<Representative> = Vec::new();
    for entity in entities {
        let candidate = Representative::new(entity);
        match kept.iter().find(|rep| rep.absorbs(&candidate)) {
            Some(rep) => tracing::debug!(
                line = candidate.entity.original(),
                into = rep.entity.original(),
                "merged"
            ),
            None => kept.push(candidate),
        }
    }

    kept.into_iter().map(|rep| rep.entity).collect()
}
