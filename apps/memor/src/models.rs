//! Data models for memor.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

impl Card {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// An ordered deck. Insertion order is study order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Index of the final card, if any.
    pub fn last_index(&self) -> Option<usize> {
        self.cards.len().checked_sub(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}

impl FromIterator<Card> for Deck {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Difficulty rating of a committed swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Left swipe: not recalled.
    Again,
    /// Down swipe: recalled with difficulty.
    Hard,
    /// Up swipe: recalled.
    Good,
    /// Right swipe: recalled effortlessly.
    Easy,
}

impl Outcome {
    pub const ALL: [Outcome; 4] = [Self::Again, Self::Hard, Self::Good, Self::Easy];

    /// Get display name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Again => "AGAIN",
            Self::Hard => "HARD",
            Self::Good => "GOOD",
            Self::Easy => "EASY",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-card counts of recorded outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tally {
    pub again: u32,
    pub hard: u32,
    pub good: u32,
    pub easy: u32,
}

impl Tally {
    /// Increment the bucket for `outcome`, leaving the others untouched.
    pub fn record(&mut self, outcome: Outcome) {
        let bucket = match outcome {
            Outcome::Again => &mut self.again,
            Outcome::Hard => &mut self.hard,
            Outcome::Good => &mut self.good,
            Outcome::Easy => &mut self.easy,
        };
        *bucket = bucket.saturating_add(1);
    }

    pub fn count(&self, outcome: Outcome) -> u32 {
        match outcome {
            Outcome::Again => self.again,
            Outcome::Hard => self.hard,
            Outcome::Good => self.good,
            Outcome::Easy => self.easy,
        }
    }

    pub fn total(&self) -> u32 {
        self.again
            .saturating_add(self.hard)
            .saturating_add(self.good)
            .saturating_add(self.easy)
    }
}

/// Sparse map from card index to its tally. Persisted as a JSON object keyed by index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreMap {
    entries: BTreeMap<usize, Tally>,
}

impl ScoreMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `outcome` for the card at `index`, creating its entry on first use.
    pub fn record(&mut self, index: usize, outcome: Outcome) -> Tally {
        let tally = self.entries.entry(index).or_default();
        tally.record(outcome);
        *tally
    }

    pub fn get(&self, index: usize) -> Option<&Tally> {
        self.entries.get(&index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Tally)> {
        self.entries.iter().map(|(i, t)| (*i, t))
    }

    /// Sum of every tally.
    pub fn summary(&self) -> Tally {
        self.entries.values().fold(Tally::default(), |acc, t| Tally {
            again: acc.again.saturating_add(t.again),
            hard: acc.hard.saturating_add(t.hard),
            good: acc.good.saturating_add(t.good),
            easy: acc.easy.saturating_add(t.easy),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_single_bucket() {
        let mut tally = Tally::default();
        tally.record(Outcome::Hard);
        tally.record(Outcome::Hard);
        tally.record(Outcome::Easy);
        assert_eq!(tally, Tally { again: 0, hard: 2, good: 0, easy: 1 });
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn test_large_tallies_saturate() {
        let scores: ScoreMap = serde_json::from_str(
            r#"{"0":{"again":4294967295,"hard":1,"good":0,"easy":0},"1":{"again":7,"hard":0,"good":0,"easy":0}}"#,
        )
        .unwrap();
        assert_eq!(scores.get(0).map(Tally::total), Some(u32::MAX));
        assert_eq!(scores.summary().again, u32::MAX);
        assert_eq!(scores.summary().total(), u32::MAX);
    }

    #[test]
    fn test_score_map_sparse() {
        let mut scores = ScoreMap::new();
        scores.record(3, Outcome::Good);
        assert!(scores.get(0).is_none());
        assert_eq!(scores.get(3).map(|t| t.good), Some(1));
        assert_eq!(scores.len(), 1);
    }

    #[test]
    fn test_score_map_json_shape() {
        let mut scores = ScoreMap::new();
        scores.record(0, Outcome::Easy);
        let json = serde_json::to_string(&scores).unwrap();
        assert_eq!(json, r#"{"0":{"again":0,"hard":0,"good":0,"easy":1}}"#);

        let back: ScoreMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, scores);
    }

    #[test]
    fn test_tally_missing_buckets_default() {
        let scores: ScoreMap = serde_json::from_str(r#"{"2":{"good":4}}"#).unwrap();
        assert_eq!(scores.get(2), Some(&Tally { again: 0, hard: 0, good: 4, easy: 0 }));
    }

    #[test]
    fn test_summary() {
        let mut scores = ScoreMap::new();
        scores.record(0, Outcome::Again);
        scores.record(1, Outcome::Again);
        scores.record(1, Outcome::Good);
        let summary = scores.summary();
        assert_eq!(summary.again, 2);
        assert_eq!(summary.good, 1);
        assert_eq!(summary.total(), 3);
    }

    #[test]
    fn test_deck_json_shape() {
        let deck: Deck = serde_json::from_str(r#"[{"question":"2+2?","answer":"4"},{"question":"only"}]"#).unwrap();
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.get(0), Some(&Card::new("2+2?", "4")));
        assert_eq!(deck.get(1).map(|c| c.answer.as_str()), Some(""));
        assert_eq!(deck.last_index(), Some(1));
    }

    #[test]
    fn test_outcome_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Outcome::Again).unwrap(), "\"again\"");
    }
}
