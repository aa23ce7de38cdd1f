//! Ordered-subsequence ranking
//!
//! Finds the shortest span of a text containing the characters of the term
//! in order, case-insensitively. For term `abc`:
//!
//! ```text
//!   text              best span       rank
//!   a very big cat    "a very big c"  0 + 5 * 9
//!   abcabcabc         "abc"           0
//!   aaaaabbbbcccc     "abbbbc"        4 + 5 * 3
//!   fffababcggg       "abc"           5
//! ```
//!
//! One pass over the text keeps `len(term) - 1` slots. Slot `i` holds the
//! start of a partial match that has read `term[..=i]`, or nothing. Reading
//! `term[0]` always restarts slot 0 at the current position, so the latest
//! start wins and spans stay as short as possible.
//!
//! ```text
//!   pos  char  slots        (term "abc", text "fffababcggg")
//!    3    a    [3, -]
//!    4    b    [-, 3]
//!    5    a    [5, 3]
//!    6    b    [-, 5]
//!    7    c    [-, -]       match [5, 8), rank 5
//! ```
//!
//! Positions count characters, not bytes.

/// Rank reported when a text does not match
pub const NO_MATCH: u32 = 1_000_000;

/// Penalty per non-term character inside a matched span
const GAP_PENALTY: u32 = 5;

/// A reusable matcher for one search term
#[derive(Debug, Clone)]
pub struct Matcher {
    term: Vec<char>,
    cur: Vec<Option<usize>>,
    next: Vec<Option<usize>>,
}

impl Matcher {
    /// Create a matcher; the term is lowercased
    pub fn new(term: &str) -> Self {
        let term: Vec<char> = term.to_lowercase().chars().collect();
        let slots = term.len().saturating_sub(1);

        Self {
            term,
            cur: vec![None; slots],
            next: vec![None; slots],
        }
    }

    /// Length of the term in characters
    pub fn term_len(&self) -> usize {
        self.term.len()
    }

    /// Rank `text` against the term; lower is better, [`NO_MATCH`] if the
    /// term's characters do not occur in order
    pub fn rank(&mut self, text: &str) -> u32 {
        let text = text.to_lowercase();

        match self.term.len() {
            0 => 0,
            1 => text
                .chars()
                .position(|c| c == self.term[0])
                .map_or(NO_MATCH, clamp),
            _ => self.rank_span(&text),
        }
    }

    fn rank_span(&mut self, text: &str) -> u32 {
        let last = self.term.len() - 1;
        let mut best = NO_MATCH;

        self.cur.fill(None);

        for (pos, c) in text.chars().enumerate() {
            self.next[0] = if c == self.term[0] { Some(pos) } else { self.cur[0] };

            for i in 1..last {
                if c == self.term[i] && self.cur[i - 1].is_some() {
                    self.next[i] = self.cur[i - 1];
                    self.next[i - 1] = None;
                } else {
                    self.next[i] = self.cur[i];
                }
            }

            if c == self.term[last] {
                if let Some(start) = self.cur[last - 1] {
                    let span = pos + 1 - start;
                    let gaps = clamp(span - self.term.len());
                    let rank = clamp(start).saturating_add(gaps.saturating_mul(GAP_PENALTY));
                    best = best.min(rank);
                    self.next[last - 1] = None;
                }
            }

            std::mem::swap(&mut self.cur, &mut self.next);
        }

        best
    }
}

fn clamp(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
