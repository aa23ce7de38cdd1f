//! Cross-registry search

use std::sync::Arc;

use super::matcher::{Matcher, NO_MATCH};
use super::ranked::Ranked;
use crate::entity::{Base, Entity};
use crate::registry::{Registry, RegistryKey};

/// Rank penalty applied to keyword hits relative to title hits
pub const KEYWORD_PENALTY: u32 = 20;

/// Anything that can hand out search candidates
pub trait SearchSource: Send + Sync {
    fn get_for_search(&self) -> Vec<Base>;
}

impl<K: RegistryKey, V: Entity> SearchSource for Registry<K, V> {
    fn get_for_search(&self) -> Vec<Base> {
        Registry::get_for_search(self)
    }
}

/// Rank one candidate: the better of its title rank and its best keyword
/// rank plus [`KEYWORD_PENALTY`]
pub fn rank_base(matcher: &mut Matcher, base: &Base) -> u32 {
    let title = matcher.rank(&base.title);
    base.meta
        .keywords
        .iter()
        .map(|keyword| matcher.rank(keyword).saturating_add(KEYWORD_PENALTY))
        .fold(title, u32::min)
}

struct Tier {
    min_term_len: usize,
    sources: Vec<Arc<dyn SearchSource>>,
}

/// Searches several sources at once
///
/// Sources are grouped in tiers; a tier is scanned only when the term has at
/// least its minimum length, so large low-signal collections stay out of
/// results for very short terms.
#[derive(Default)]
pub struct SearchEngine {
    tiers: Vec<Tier>,
}

impl SearchEngine {
    /// Create an engine with no sources
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tier of sources scanned when the term has at least
    /// `min_term_len` characters
    pub fn tier(mut self, min_term_len: usize, sources: Vec<Arc<dyn SearchSource>>) -> Self {
        self.tiers.push(Tier {
            min_term_len,
            sources,
        });
        self
    }

    /// Number of sources scanned for a term of `term_len` characters
    pub fn source_count(&self, term_len: usize) -> usize {
        self.tiers
            .iter()
            .filter(|tier| term_len >= tier.min_term_len)
            .map(|tier| tier.sources.len())
            .sum()
    }

    /// Rank every candidate of every eligible source against `term`
    ///
    /// Non-matching candidates are dropped; the rest are sorted by rank,
    /// then title.
    pub fn search(&self, term: &str) -> Vec<Ranked> {
        let mut matcher = Matcher::new(term);
        let term_len = matcher.term_len();
        let mut results = Vec::new();

        for tier in self.tiers.iter().filter(|t| term_len >= t.min_term_len) {
            for source in &tier.sources {
                for base in source.get_for_search() {
                    let rank = rank_base(&mut matcher, &base);
                    if rank < NO_MATCH {
                        results.push(Ranked::new(base, rank));
                    }
                }
            }
        }

        results.sort_unstable();

        tracing::debug!(term = term, hits = results.len(), "Search completed");
        results
    }
}
