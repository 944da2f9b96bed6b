//! High score leaderboard
//!
//! Top 5 runs, sorted by combined score (descending). Ties keep the order in
//! which they were added. Persisted as a plain JSON array of
//! `{ "name": ..., "score": ... }` objects.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_LEADERBOARD, MAX_NAME_LEN};

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Player name (at most 15 characters)
    pub name: String,
    /// Combined score (obstacles + tokens)
    pub score: u32,
}

impl LeaderboardEntry {
    pub fn new(name: impl Into<String>, score: u32) -> Self {
        Self {
            name: truncate_name(name.into()),
            score,
        }
    }
}

fn truncate_name(name: String) -> String {
    if name.chars().count() <= MAX_NAME_LEN {
        name
    } else {
        name.chars().take(MAX_NAME_LEN).collect()
    }
}

/// Ranked list of the best runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a leaderboard from arbitrary entries, restoring the invariants
    /// (sorted descending, stable on ties, at most 5 entries)
    pub fn from_entries(entries: Vec<LeaderboardEntry>) -> Self {
        let mut board = Self {
            entries: entries
                .into_iter()
                .map(|e| LeaderboardEntry::new(e.name, e.score))
                .collect(),
        };
        board.normalize();
        board
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= MAX_LEADERBOARD
    }

    /// Lowest score currently on the board
    pub fn lowest_score(&self) -> Option<u32> {
        self.entries.last().map(|e| e.score)
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Check if a score would earn a place on the board
    ///
    /// Any score qualifies while the board has room; once full, a score must
    /// strictly beat the current lowest entry.
    pub fn is_high_score(&self, score: u32) -> bool {
        if !self.is_full() {
            return true;
        }
        self.lowest_score().map(|low| score > low).unwrap_or(true)
    }

    /// Append an entry, re-rank and trim to the maximum size
    ///
    /// Returns the rank achieved (1-indexed), or None if the entry fell off
    /// the end after trimming.
    pub fn add_entry(&mut self, name: impl Into<String>, score: u32) -> Option<usize> {
        self.entries.push(LeaderboardEntry::new(name, score));
        let added = self.entries.len() - 1;

        // Stable sort keeps insertion order on ties; track where the new
        // entry lands so callers can highlight it.
        let mut indexed: Vec<(usize, LeaderboardEntry)> =
            std::mem::take(&mut self.entries).into_iter().enumerate().collect();
        indexed.sort_by(|a, b| b.1.score.cmp(&a.1.score));
        let rank = indexed.iter().position(|(i, _)| *i == added);
        self.entries = indexed.into_iter().map(|(_, e)| e).collect();
        self.entries.truncate(MAX_LEADERBOARD);

        rank.filter(|&r| r < MAX_LEADERBOARD).map(|r| r + 1)
    }

    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_LEADERBOARD);
    }
}

/// Free-function form of [`Leaderboard::is_high_score`]
pub fn is_high_score(score: u32, board: &Leaderboard) -> bool {
    board.is_high_score(score)
}

/// Free-function form of [`Leaderboard::add_entry`], returning the new board
pub fn add_entry(name: &str, score: u32, board: &Leaderboard) -> Leaderboard {
    let mut board = board.clone();
    board.add_entry(name, score);
    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_board() -> Leaderboard {
        Leaderboard::from_entries(vec![
            LeaderboardEntry::new("A", 50),
            LeaderboardEntry::new("B", 40),
            LeaderboardEntry::new("C", 30),
            LeaderboardEntry::new("D", 20),
            LeaderboardEntry::new("E", 10),
        ])
    }

    fn names(board: &Leaderboard) -> Vec<(&str, u32)> {
        board
            .entries()
            .iter()
            .map(|e| (e.name.as_str(), e.score))
            .collect()
    }

    #[test]
    fn test_any_score_qualifies_when_not_full() {
        let mut board = Leaderboard::new();
        assert!(board.is_high_score(0));
        board.add_entry("A", 100);
        board.add_entry("B", 90);
        assert!(board.is_high_score(0));
    }

    #[test]
    fn test_full_board_requires_strictly_higher() {
        let board = sample_board();
        assert!(!is_high_score(10, &board));
        assert!(is_high_score(15, &board));
        assert!(is_high_score(25, &board));
        assert!(is_high_score(11, &board));
    }

    #[test]
    fn test_add_entry_inserts_in_rank_order() {
        let board = add_entry("F", 25, &sample_board());
        assert_eq!(
            names(&board),
            vec![("A", 50), ("B", 40), ("C", 30), ("F", 25), ("D", 20)]
        );
    }

    #[test]
    fn test_add_entry_low_score_is_dropped() {
        let mut board = sample_board();
        let rank = board.add_entry("Z", 5);
        assert_eq!(rank, None);
        assert_eq!(board, sample_board());
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut board = Leaderboard::new();
        board.add_entry("first", 30);
        let rank = board.add_entry("second", 30);
        assert_eq!(rank, Some(2));
        assert_eq!(names(&board), vec![("first", 30), ("second", 30)]);
    }

    #[test]
    fn test_add_entry_reports_rank() {
        let mut board = sample_board();
        assert_eq!(board.add_entry("top", 99), Some(1));
        assert_eq!(board.top_score(), Some(99));
        assert_eq!(board.lowest_score(), Some(20));
    }

    #[test]
    fn test_names_are_bounded() {
        let entry = LeaderboardEntry::new("abcdefghijklmnopqrstuvwxyz", 1);
        assert_eq!(entry.name, "abcdefghijklmno");
    }

    #[test]
    fn test_json_is_a_plain_array() {
        let mut board = Leaderboard::new();
        board.add_entry("Ace", 12);
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(json, r#"[{"name":"Ace","score":12}]"#);
        let back: Leaderboard = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);
    }

    #[test]
    fn test_from_entries_restores_invariants() {
        let board = Leaderboard::from_entries(vec![
            LeaderboardEntry::new("low", 1),
            LeaderboardEntry::new("high", 9),
            LeaderboardEntry::new("mid", 5),
            LeaderboardEntry::new("mid2", 5),
            LeaderboardEntry::new("x", 3),
            LeaderboardEntry::new("y", 2),
        ]);
        assert_eq!(
            names(&board),
            vec![("high", 9), ("mid", 5), ("mid2", 5), ("x", 3), ("y", 2)]
        );
    }

    proptest! {
        #[test]
        fn prop_board_stays_sorted_and_bounded(scores in proptest::collection::vec(0u32..1000, 0..40)) {
            let mut board = Leaderboard::new();
            for (i, score) in scores.iter().enumerate() {
                let qualified = board.is_high_score(*score);
                let before = board.clone();
                board.add_entry(format!("p{i}"), *score);
                prop_assert!(board.len() <= MAX_LEADERBOARD);
                prop_assert!(board.entries().windows(2).all(|w| w[0].score >= w[1].score));
                if !qualified {
                    prop_assert_eq!(&board, &before);
                }
            }
        }
    }
}
