//! Reference resolution: descriptor in, concrete store rows out.
//!
//! Book matching is an ordered cascade of tagged strategies, each a pure
//! function over (token, store books). The order encodes the
//! precision/recall tradeoff explicitly: exact forms first, canonical
//! mapping second, prefix guessing last, and prefix guessing itself
//! fails closed on ambiguity.

use crate::canon::CanonTable;
use crate::error::Error;
use crate::normalize;
use crate::store::VerseStore;
use crate::types::{BookRecord, ReferenceDescriptor, ResolvedReference, Verse, VerseSpec};

/// The cascade, in the order strategies are attempted.
const CASCADE: [Strategy; 3] = [
    Strategy::DirectNormalized,
    Strategy::CanonicalName,
    Strategy::PrefixAssisted,
];

/// One way of mapping a raw book token to a store book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    /// Run the token through the canon table's exact lookup, then search
    /// store names for the canonical spelling. Bridges store spellings
    /// that differ from the abbreviation but contain the canonical name.
    CanonicalName,
    /// Fold the token and look for it as a substring of each folded store
    /// name. Catches the common case where the user wrote a prefix or the
    /// full name of the store's own spelling.
    DirectNormalized,
    /// Last resort for typos: the first `prefix_len` folded characters,
    /// first through the canon's ambiguity-rejecting prefix lookup, then
    /// as a raw substring probe against store names.
    PrefixAssisted,
}

impl Strategy {
    /// Apply this strategy. Pure: no store I/O, only the already-fetched
    /// book list.
    fn apply<'b>(
        self,
        token: &str,
        books: &'b [BookRecord],
        canon: &CanonTable,
    ) -> Option<&'b BookRecord> {
        match self {
            Strategy::CanonicalName => {
                let alias = canon.lookup_exact(token)?;
                find_containing(books, &normalize::fold(&alias.canonical_name))
            },
            Strategy::DirectNormalized => {
                let folded = normalize::fold(token);
                if folded.is_empty() {
                    return None;
                }
                find_containing(books, &folded)
            },
            Strategy::PrefixAssisted => {
                let folded = normalize::fold(token);
                if folded.chars().count() < canon.prefix_len() {
                    return None;
                }
                let prefix: String = folded.chars().take(canon.prefix_len()).collect();
                if let Some(alias) = canon.lookup_prefix(&prefix) {
                    let canonical = normalize::fold(&alias.canonical_name);
                    if let Some(book) = find_containing(books, &canonical) {
                        return Some(book);
                    }
                }
                // Even when the canon has nothing for the prefix, the raw
                // prefix may still hit an idiosyncratic store spelling.
                find_containing(books, &prefix)
            },
        }
    }
}

/// First store book whose folded name contains `needle`.
fn find_containing<'b>(books: &'b [BookRecord], needle: &str) -> Option<&'b BookRecord> {
    books.iter().find(|b| normalize::fold(&b.name).contains(needle))
}

/// Resolves descriptors against one canon table and one store handle.
/// Stateless between calls: no memoization, no retries. Call volume is
/// bound to explicit user interaction, not a hot path.
pub struct Resolver<'a> {
    canon: &'a CanonTable,
    store: &'a dyn VerseStore,
}

impl<'a> Resolver<'a> {
    /// Bind a resolver to a canon table and a store handle.
    pub fn new(canon: &'a CanonTable, store: &'a dyn VerseStore) -> Self {
        Self { canon, store }
    }

    /// Resolve one descriptor to concrete verse rows.
    ///
    /// An empty `verses` list on success means the book and chapter were
    /// addressable but no row matched the selector, distinct from
    /// `BookNotFound`, so callers can tell "verse not found" apart from
    /// "reference not recognized".
    ///
    /// # Errors
    ///
    /// Returns `Error::BookNotFound` when the cascade is exhausted, and
    /// passes store I/O failures through unchanged.
    pub fn resolve(&self, descriptor: &ReferenceDescriptor) -> Result<ResolvedReference, Error> {
        let books = self.store.list_books()?;

        let book = CASCADE
            .iter()
            .find_map(|s| s.apply(&descriptor.raw_book, &books, self.canon))
            .ok_or_else(|| Error::BookNotFound {
                token: descriptor.raw_book.clone(),
            })?;

        let rows = self.store.verses_in_chapter(book.id, descriptor.chapter)?;
        let verses = select_verses(rows, descriptor.verses.as_ref());

        Ok(ResolvedReference {
            book_id: book.id,
            book_name: book.name.clone(),
            chapter: descriptor.chapter,
            verses,
        })
    }
}

/// Filter a chapter's rows by the verse selector, preserving the store's
/// ascending order. A `List` keeps store order too (not textual order);
/// an inverted `Range` simply matches nothing.
fn select_verses(rows: Vec<Verse>, spec: Option<&VerseSpec>) -> Vec<Verse> {
    let Some(spec) = spec else {
        return rows;
    };
    match spec {
        VerseSpec::List(values) => rows
            .into_iter()
            .filter(|v| values.contains(&v.number))
            .collect(),
        VerseSpec::Range { from, to } => rows
            .into_iter()
            .filter(|v| v.number >= *from && v.number <= *to)
            .collect(),
        VerseSpec::Single(n) => rows.into_iter().filter(|v| v.number == *n).collect(),
    }
}
