//! Fuzzy search over registries
//!
//! A [`Matcher`] ranks a single text against a term. The [`SearchEngine`]
//! pulls `Base` snapshots from its sources, ranks each candidate by title
//! and keywords, and returns one list ordered by rank.

pub mod engine;
pub mod matcher;
pub mod ranked;

pub use engine::{rank_base, SearchEngine, SearchSource, KEYWORD_PENALTY};
pub use matcher::{Matcher, NO_MATCH};
pub use ranked::Ranked;
