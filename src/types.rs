/// Core domain types for references, verse selectors, and resolved verses.
use serde::{Deserialize, Serialize};

/// Identity of one book as the verse store spells it.
/// `id` is the store's primary key, distinct from canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Store-local primary key.
    pub id: i64,
    /// Display name as stored, which may differ from the canonical spelling.
    pub name: String,
}

/// One reference found by the scanner. The match is structural only;
/// resolution against a store may still fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceDescriptor {
    /// Chapter number, always present and >= 1.
    pub chapter: u32,
    /// The exact substring matched for the book name.
    pub raw_book: String,
    /// Optional verse selector parsed from the text after `:`.
    pub verses: Option<VerseSpec>,
}

/// A scanner match with its position in the original text, so callers
/// can splice in replacement markup without re-scanning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceMatch {
    /// The parsed reference.
    pub descriptor: ReferenceDescriptor,
    /// Byte span of the full match in the scanned text.
    pub span: Span,
}

/// Output of resolving a descriptor against a verse store. Ephemeral,
/// produced per lookup, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedReference {
    /// Store-local book id.
    pub book_id: i64,
    /// Book name as the store spells it.
    pub book_name: String,
    /// Chapter the verses were fetched from.
    pub chapter: u32,
    /// Matching verse rows, ascending by verse number. May be empty when
    /// the book resolved but no row matched the chapter or selector.
    pub verses: Vec<Verse>,
}

/// Half-open byte range `[start, end)` of a match in the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    /// Byte offset one past the last matched byte.
    pub end: usize,
    /// Byte offset of the first matched byte.
    pub start: usize,
}

/// One verse row returned by a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verse {
    /// Verse number within its chapter.
    pub number: u32,
    /// Verse text in the store's translation.
    pub text: String,
}

/// Verse selector parsed from the text after the chapter. The shapes
/// mirror what people actually write: `16`, `4-7`, `4,5,9`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum VerseSpec {
    /// Comma-separated verses, kept in textual order.
    List(Vec<u32>),
    /// Inclusive range. `from > to` is representable and resolves to no
    /// verses; malformed user text is expected input, not an error.
    Range {
        /// First verse of the range.
        from: u32,
        /// Last verse of the range.
        to: u32,
    },
    /// A single verse.
    Single(u32),
}

impl ReferenceDescriptor {
    /// The reference in display form, e.g. `Jao 3:16` or `Heb 11`.
    pub fn display(&self) -> String {
        return match &self.verses {
            None => format!("{} {}", self.raw_book, self.chapter),
            Some(spec) => format!("{} {}:{}", self.raw_book, self.chapter, spec.display()),
        };
    }
}

impl VerseSpec {
    /// The selector in the form it was written: `16`, `4-7`, `4,5,9`.
    pub fn display(&self) -> String {
        return match self {
            VerseSpec::List(values) => {
                let parts: Vec<String> = values.iter().map(|v| return v.to_string()).collect();
                parts.join(",")
            },
            VerseSpec::Range { from, to } => format!("{from}-{to}"),
            VerseSpec::Single(n) => n.to_string(),
        };
    }
}
