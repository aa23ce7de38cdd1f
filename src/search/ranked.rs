//! Ranked search results

use std::cmp::Ordering;

use serde::Serialize;

use crate::entity::Base;

/// A search hit: the entity's display record plus its rank
///
/// Serializes exactly like the wrapped [`Base`]; the rank only orders the
/// list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranked {
    #[serde(flatten)]
    pub base: Base,
    #[serde(skip)]
    pub rank: u32,
}

impl Ranked {
    pub fn new(base: Base, rank: u32) -> Self {
        Self { base, rank }
    }
}

impl Ord for Ranked {
    /// Ascending rank, then title so equal ranks sort reproducibly
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank
            .cmp(&other.rank)
            .then_with(|| self.base.title.cmp(&other.base.title))
            .then_with(|| self.base.meta.path.cmp(&other.base.meta.path))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Kind;

    fn hit(title: &str, rank: u32) -> Ranked {
        Ranked::new(Base::new(title, "", "", Kind::Window), rank)
    }

    #[test]
    fn test_order() {
        let mut hits = vec![hit("zsh", 3), hit("bash", 3), hit("vim", 0)];
        hits.sort();

        let titles: Vec<_> = hits.iter().map(|h| h.base.title.as_str()).collect();
        assert_eq!(titles, vec!["vim", "bash", "zsh"]);
    }

    #[test]
    fn test_serializes_as_base() {
        let json = serde_json::to_value(hit("vim", 7)).unwrap();
        assert_eq!(json["title"], "vim");
        assert!(json.get("rank").is_none());
    }
}
