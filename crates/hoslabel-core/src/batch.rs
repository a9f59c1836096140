//! Parallel resolution of many external records against one index.

use std::sync::atomic::{AtomicUsize, Ordering};

use hoslabel_parse::{Entity, Lexicon};
use rayon::prelude::*;

use crate::error::LabelError;
use crate::index::{MatchIndex, Resolution};

/// How many queries took each resolution path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub exact: usize,
    pub heuristic: usize,
    pub too_short: usize,
    pub misses: usize,
}

impl BatchStats {
    pub fn total(&self) -> usize {
        self.exact + self.heuristic + self.too_short + self.misses
    }

    /// Queries that resolved to a canonical record.
    pub fn labeled(&self) -> usize {
        self.exact + self.heuristic
    }

    fn record(&mut self, resolution: &Resolution<'_>) {
        match resolution {
            Resolution::Exact(_) => self.exact += 1,
            Resolution::Heuristic { .. } => self.heuristic += 1,
            Resolution::TooShort => self.too_short += 1,
            Resolution::NoMatch => self.misses += 1,
        }
    }
}

/// Per-query results, in input order, plus aggregate counts.
#[derive(Debug)]
pub struct BatchOutcome<'a> {
    pub matches: Vec<Option<&'a Entity>>,
    pub stats: BatchStats,
}

/// Parse and resolve every query on a pool of `workers` threads.
///
/// Blank queries stay in the output as misses so result rows line up with
/// input rows. Results do not depend on the worker count.
#[tracing::instrument(skip(index, lexicon, queries), fields(queries = queries.len()))]
pub fn resolve_batch<'a, S>(
    index: &'a MatchIndex,
    lexicon: &Lexicon,
    queries: &[S],
    workers: usize,
) -> Result<BatchOutcome<'a>, LabelError>
where
    S: AsRef<str> + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()?;

    let total = queries.len();
    let step = (total / 10).max(1);
    let done = AtomicUsize::new(0);

    let resolutions: Vec<Resolution<'a>> = pool.install(|| {
        queries
            .par_iter()
            .map(|line| {
                let line = line.as_ref();
                let resolution = if line.trim().is_empty() {
                    Resolution::NoMatch
                } else {
                    index.resolve_detailed(&Entity::parse(line, lexicon))
                };
                tracing::debug!(line, ?resolution, "resolved");

                let n = done.fetch_add(1, Ordering::Relaxed) + 1;
                if n % step == 0 || n == total {
                    tracing::info!("Processed {n} / {total} ({}%)", n * 100 / total);
                }
                resolution
            })
            .collect()
    });

    let mut stats = BatchStats::default();
    for resolution in &resolutions {
        stats.record(resolution);
    }
    let matches = resolutions.iter().map(Resolution::entity).collect();

    Ok(BatchOutcome { matches, stats })
}
