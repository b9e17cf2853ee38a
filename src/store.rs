//! The verse store boundary: the one external collaborator the resolver
//! talks to, plus a JSON-backed implementation for the CLI and tests.
//!
//! The contract is deliberately one query shape: fetch a whole chapter,
//! filter in memory. A store backed by something smarter may filter
//! server-side as long as ordering and membership come out identical.

use std::path::Path;

use serde::Deserialize;

use crate::error::Error;
use crate::types::{BookRecord, Verse};

/// Read access to one translation's book/chapter/verse rows. The handle
/// is passed explicitly to the resolver; there is no process-wide
/// connection cache, and lifecycle belongs to the caller.
pub trait VerseStore {
    /// All books in store order, with store-local ids.
    ///
    /// # Errors
    ///
    /// Returns store I/O failures unchanged; the resolver never retries.
    fn list_books(&self) -> Result<Vec<BookRecord>, Error>;

    /// Every verse of one chapter, ascending by verse number. An empty
    /// result is a valid answer, not an error.
    ///
    /// # Errors
    ///
    /// Returns store I/O failures unchanged.
    fn verses_in_chapter(&self, book_id: i64, chapter: u32) -> Result<Vec<Verse>, Error>;
}

/// One verse row in the JSON document.
#[derive(Debug, Clone, Deserialize)]
struct VerseRow {
    book_id: i64,
    chapter: u32,
    text: String,
    verse: u32,
}

/// The store document shape:
/// `{"books": [{"id", "name"}], "verses": [{"book_id", "chapter", "verse", "text"}]}`.
#[derive(Debug, Deserialize)]
struct StoreDocument {
    books: Vec<BookRecord>,
    verses: Vec<VerseRow>,
}

/// An entire translation held in memory, loaded from one JSON document.
/// Plenty for a store measured in tens of thousands of short rows.
#[derive(Debug)]
pub struct JsonStore {
    books: Vec<BookRecord>,
    verses: Vec<VerseRow>,
}

impl JsonStore {
    /// Load a store from a JSON file on disk.
    ///
    /// # Errors
    ///
    /// Returns `Error::StoreNotFound` if the file doesn't exist,
    /// `Error::Io` for other read failures,
    /// or `Error::StoreCorrupt` if the document doesn't parse.
    pub fn open(path: &Path) -> Result<Self, Error> {
        let content = match std::fs::read_to_string(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::StoreNotFound {
                    path: path.to_path_buf(),
                });
            },
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };
        return Self::parse(&content).map_err(|reason| {
            return Error::StoreCorrupt {
                path: path.to_path_buf(),
                reason,
            };
        });
    }

    /// Parse a store from JSON content.
    ///
    /// # Errors
    ///
    /// Returns the serde error message if the document doesn't parse.
    pub fn parse(content: &str) -> Result<Self, String> {
        let document: StoreDocument =
            serde_json::from_str(content).map_err(|e| return e.to_string())?;
        return Ok(Self {
            books: document.books,
            verses: document.verses,
        });
    }
}

impl VerseStore for JsonStore {
    fn list_books(&self) -> Result<Vec<BookRecord>, Error> {
        return Ok(self.books.clone());
    }

    fn verses_in_chapter(&self, book_id: i64, chapter: u32) -> Result<Vec<Verse>, Error> {
        let mut rows: Vec<Verse> = self
            .verses
            .iter()
            .filter(|row| return row.book_id == book_id && row.chapter == chapter)
            .map(|row| {
                return Verse {
                    number: row.verse,
                    text: row.text.clone(),
                };
            })
            .collect();
        rows.sort_by_key(|v| return v.number);
        return Ok(rows);
    }
}
