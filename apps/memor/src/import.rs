//! Deck import from CSV.

use crate::models::{Card, Deck};
use crate::store::{Store, StoreError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ImportResult<T> = Result<T, ImportError>;

/// Where a deck's CSV text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckSource {
    /// Compiled into the binary.
    Bundled(&'static str),
    /// A CSV file on disk.
    File(PathBuf),
}

/// A deck the user can pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckEntry {
    pub name: String,
    pub source: DeckSource,
}

impl DeckEntry {
    pub fn read(&self) -> ImportResult<String> {
        match &self.source {
            DeckSource::Bundled(text) => Ok((*text).to_string()),
            DeckSource::File(path) => std::fs::read_to_string(path).map_err(|source| ImportError::Io {
                path: path.clone(),
                source,
            }),
        }
    }
}

const BUNDLED: [(&str, &str); 2] = [
    ("Intro Concurrency", include_str!("../assets/decks/intro_concurrency.csv")),
    ("CA DMV Test", include_str!("../assets/decks/ca_dmv_permit.csv")),
];

/// Decks compiled into the binary.
pub fn bundled_decks() -> Vec<DeckEntry> {
    BUNDLED
        .iter()
        .map(|(name, text)| DeckEntry {
            name: (*name).to_string(),
            source: DeckSource::Bundled(text),
        })
        .collect()
}

/// CSV files in `dir`, sorted by name. A missing directory yields no decks.
pub fn user_decks(dir: &Path) -> Vec<DeckEntry> {
    let Ok(read_dir) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut decks: Vec<DeckEntry> = read_dir
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")))
        .map(|path| DeckEntry {
            name: deck_name_from_path(&path),
            source: DeckSource::File(path),
        })
        .collect();
    decks.sort_by(|a, b| a.name.cmp(&b.name));
    decks
}

/// Bundled decks followed by the user's decks.
pub fn available_decks(user_dir: Option<&Path>) -> Vec<DeckEntry> {
    let mut decks = bundled_decks();
    if let Some(dir) = user_dir {
        decks.extend(user_decks(dir));
    }
    decks
}

fn deck_name_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().replace(['_', '-'], " "))
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse CSV text with `question` and `answer` header columns into a deck.
///
/// Rows may be ragged; missing cells become empty strings. No other validation is done.
pub fn parse_deck(csv_text: &str) -> ImportResult<Deck> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(csv_text.as_bytes());

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let (question_col, answer_col) = (column("question"), column("answer"));
    if question_col.is_none() || answer_col.is_none() {
        warn!(?headers, "CSV is missing a question or answer column");
    }

    let mut cards = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cell = |col: Option<usize>| col.and_then(|c| record.get(c)).unwrap_or("").to_string();
        cards.push(Card::new(cell(question_col), cell(answer_col)));
    }

    Ok(Deck::new(cards))
}

/// Replace the stored deck with the parsed CSV and remember its name.
///
/// Returns the number of imported cards. On error nothing is written.
pub fn import_deck(store: &Store, name: &str, csv_text: &str) -> ImportResult<usize> {
    let deck = parse_deck(csv_text)?;
    store.replace_deck(&deck, name)?;
    info!(name, cards = deck.len(), "imported deck");
    Ok(deck.len())
}
