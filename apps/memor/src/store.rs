//! Persistent key-value storage for memor.
//!
//! Values are JSON strings under fixed string keys, kept in a single SQLite
//! table. Every write replaces the whole value for its key.

use crate::models::{Deck, ScoreMap};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Key holding the imported deck.
pub const DECK_KEY: &str = "deck";
/// Key holding the per-card score map.
pub const SCORES_KEY: &str = "deckScores";
/// Key holding the display name of the imported deck.
pub const DECK_NAME_KEY: &str = "currentDeckName";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("malformed value under \"{key}\": {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    fn init(&self) -> StoreResult<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    // Raw operations

    pub fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    pub fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        debug!(key, bytes = value.len(), "stored item");
        Ok(())
    }

    pub fn remove_item(&self, key: &str) -> StoreResult<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    pub fn keys(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        let Some(raw) = self.get_item(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Json { key: key.to_string(), source })
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        let raw = serde_json::to_string(value)
            .map_err(|source| StoreError::Json { key: key.to_string(), source })?;
        self.set_item(key, &raw)
    }

    // Typed operations

    /// The imported deck, or an empty deck when none has been imported.
    pub fn load_deck(&self) -> StoreResult<Deck> {
        Ok(self.get_json(DECK_KEY)?.unwrap_or_default())
    }

    pub fn save_deck(&self, deck: &Deck) -> StoreResult<()> {
        self.set_json(DECK_KEY, deck)
    }

    /// The persisted scores, or an empty map when nothing has been recorded.
    pub fn load_scores(&self) -> StoreResult<ScoreMap> {
        Ok(self.get_json(SCORES_KEY)?.unwrap_or_default())
    }

    /// Overwrite the persisted scores with `scores`.
    pub fn save_scores(&self, scores: &ScoreMap) -> StoreResult<()> {
        self.set_json(SCORES_KEY, scores)
    }

    pub fn clear_scores(&self) -> StoreResult<()> {
        self.remove_item(SCORES_KEY)
    }

    /// Stored as a bare string rather than JSON.
    pub fn current_deck_name(&self) -> StoreResult<Option<String>> {
        self.get_item(DECK_NAME_KEY)
    }

    pub fn set_current_deck_name(&self, name: &str) -> StoreResult<()> {
        self.set_item(DECK_NAME_KEY, name)
    }

    pub fn has_deck(&self) -> StoreResult<bool> {
        Ok(self.get_item(DECK_KEY)?.is_some())
    }

    /// Write a new deck and its name together; neither is kept if either write fails.
    pub fn replace_deck(&self, deck: &Deck, name: &str) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        self.save_deck(deck)?;
        self.set_current_deck_name(name)?;
        tx.commit()?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn execute_batch(&self, sql: &str) -> StoreResult<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Card, Outcome};

    #[test]
    fn test_raw_items() {
        let store = Store::in_memory().unwrap();
        assert_eq!(store.get_item("missing").unwrap(), None);

        store.set_item("a", "1").unwrap();
        store.set_item("a", "2").unwrap();
        assert_eq!(store.get_item("a").unwrap(), Some("2".to_string()));
        assert_eq!(store.keys().unwrap(), vec!["a".to_string()]);

        store.remove_item("a").unwrap();
        assert_eq!(store.get_item("a").unwrap(), None);
    }

    #[test]
    fn test_empty_store_defaults() {
        let store = Store::in_memory().unwrap();
        assert!(store.load_deck().unwrap().is_empty());
        assert!(store.load_scores().unwrap().is_empty());
        assert_eq!(store.current_deck_name().unwrap(), None);
        assert!(!store.has_deck().unwrap());
    }

    #[test]
    fn test_deck_round_trip() {
        let store = Store::in_memory().unwrap();
        let deck = Deck::new(vec![Card::new("2+2?", "4"), Card::new("3+3?", "6")]);
        store.save_deck(&deck).unwrap();
        assert_eq!(store.load_deck().unwrap(), deck);
        assert!(store.has_deck().unwrap());
    }

    #[test]
    fn test_scores_overwrite() {
        let store = Store::in_memory().unwrap();
        let mut scores = ScoreMap::new();
        scores.record(0, Outcome::Easy);
        store.save_scores(&scores).unwrap();
        scores.record(1, Outcome::Hard);
        store.save_scores(&scores).unwrap();

        assert_eq!(store.load_scores().unwrap(), scores);
        assert_eq!(
            store.get_item(SCORES_KEY).unwrap().unwrap(),
            r#"{"0":{"again":0,"hard":0,"good":0,"easy":1},"1":{"again":0,"hard":1,"good":0,"easy":0}}"#
        );

        store.clear_scores().unwrap();
        assert!(store.load_scores().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_scores() {
        let store = Store::in_memory().unwrap();
        store.set_item(SCORES_KEY, "{not json").unwrap();
        let err = store.load_scores().unwrap_err();
        assert!(matches!(err, StoreError::Json { ref key, .. } if key == SCORES_KEY));
    }

    #[test]
    fn test_deck_name_is_plain_string() {
        let store = Store::in_memory().unwrap();
        store.set_current_deck_name("CA DMV Test").unwrap();
        assert_eq!(store.get_item(DECK_NAME_KEY).unwrap().as_deref(), Some("CA DMV Test"));
        assert_eq!(store.current_deck_name().unwrap().as_deref(), Some("CA DMV Test"));
    }

    #[test]
    fn test_replace_deck_is_atomic() {
        let store = Store::in_memory().unwrap();
        store.replace_deck(&Deck::new(vec![Card::new("old", "deck")]), "Old").unwrap();
        store
            .execute_batch(
                "CREATE TRIGGER reject_name BEFORE UPDATE ON kv WHEN NEW.key = 'currentDeckName'
                 BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
            )
            .unwrap();

        let result = store.replace_deck(&Deck::new(vec![Card::new("new", "deck")]), "New");
        assert!(matches!(result, Err(StoreError::Sqlite(_))));
        assert_eq!(store.load_deck().unwrap().get(0), Some(&Card::new("old", "deck")));
        assert_eq!(store.current_deck_name().unwrap().as_deref(), Some("Old"));
    }

    #[test]
    fn test_open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");
        {
            let store = Store::open(&path).unwrap();
            store.set_current_deck_name("persisted").unwrap();
        }
        let store = Store::open(&path).unwrap();
        assert_eq!(store.current_deck_name().unwrap().as_deref(), Some("persisted"));
    }
}
