use std::fmt::Write as _;

use crate::canon::CanonTable;
use crate::error::Error;
use crate::normalize;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error, canon: &CanonTable) {
    let md = render_error(e, canon);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and how to fix it.
/// Unrecognized references never render as a crash: the fix is always a
/// text edit or a config edit, and the diagnostic says which.
pub fn render_error(e: &Error, canon: &CanonTable) -> String {
    match e {
        Error::BookNotFound { token } => render_book_not_found(token, canon),
        Error::StoreCorrupt { path, reason } => {
            render_store_corrupt(&path.display().to_string(), reason)
        },
        Error::StoreNotFound { path } => render_store_not_found(&path.display().to_string()),
        Error::VerseNotFound { book, chapter, spec } => {
            render_verse_not_found(book, *chapter, spec.as_deref())
        },
        _ => render_generic(e),
    }
}

fn render_generic(e: &Error) -> String {
    match e {
        Error::Io(e) => format!("\
# Error: I/O

{e}
"),
        Error::Json(e) => format!("\
# Error: JSON

{e}
"),
        Error::TomlDe(e) => format!("\
# Error: Invalid TOML

{e}

## Fix

Correct `.verseref.toml`. A missing file is fine, a malformed one is not.
"),
        Error::WatchFailed { reason } => format!("\
# Error: Watch Failed

{reason}
"),
        // Already handled in render_error, but need exhaustive match.
        _ => format!("\
# Error

{e}
"),
    }
}

fn render_book_not_found(token: &str, canon: &CanonTable) -> String {
    let mut out = format!("\
# Reference Not Recognized

No book in the canon or the verse store matches `{token}`.
");

    let candidates = book_suggestions(token, canon);
    if let Some(first) = candidates.first() {
        let _ = write!(out, "\n## Did you mean `{first}`?\n");
        if candidates.len() > 1 {
            out.push_str("\nOther candidates:\n\n");
            for c in candidates.iter().skip(1) {
                let _ = writeln!(out, "- `{c}`");
            }
        }
    } else {
        out.push_str("\nRun `verseref books` to list every recognized name and abbreviation.\n");
    }
    out
}

fn render_verse_not_found(book: &str, chapter: u32, spec: Option<&str>) -> String {
    let selector = spec.map(|s| format!(":{s}")).unwrap_or_default();
    format!("\
# Verse Not Found

`{book}` resolved, but `{book} {chapter}{selector}` matched no rows in the store.

The chapter or verse number is probably out of range for this translation.
")
}

fn render_store_not_found(path: &str) -> String {
    format!("\
# Error: Verse Store Not Found

`{path}` does not exist.

## Fix

Point `store` in `.verseref.toml` at your translation's JSON store:

    store = \"bible.json\"
")
}

fn render_store_corrupt(path: &str, reason: &str) -> String {
    format!("\
# Error: Verse Store Corrupt

Could not parse `{path}`: {reason}

## Fix

The store must be a JSON document with `books` and `verses` arrays:

    {{\"books\": [{{\"id\": 43, \"name\": \"Jaona\"}}],
     \"verses\": [{{\"book_id\": 43, \"chapter\": 3, \"verse\": 16, \"text\": \"...\"}}]}}
")
}

/// Canonical names whose keys share the token's prefix. Unlike the
/// resolver's fail-closed prefix lookup, suggestions may list several
/// candidates, since a human is choosing, not the machine.
pub(crate) fn book_suggestions(token: &str, canon: &CanonTable) -> Vec<String> {
    let folded = normalize::fold(token);
    let prefix: String = folded.chars().take(canon.prefix_len()).collect();
    if prefix.is_empty() {
        return Vec::new();
    }

    let mut names: Vec<String> = canon
        .iter()
        .filter(|book| {
            let name_key = normalize::fold(&book.canonical_name);
            let by_name = name_key.starts_with(&prefix);
            let by_abbr = book
                .abbreviations
                .iter()
                .any(|a| normalize::fold(a).starts_with(&prefix));
            by_name || by_abbr
        })
        .map(|book| book.canonical_name.clone())
        .collect();
    names.dedup();
    names
}

#[cfg(test)]
mod tests {
    use super::{book_suggestions, render_error};
    use crate::canon::CanonTable;
    use crate::error::Error;

    #[test]
    fn suggestions_cover_ambiguous_prefixes() {
        let canon = CanonTable::malagasy();
        let names = book_suggestions("Filem", &canon);
        assert!(names.contains(&"Filipiana".to_string()));
        assert!(names.contains(&"Filemona".to_string()));
    }

    #[test]
    fn no_suggestions_for_garbage() {
        let canon = CanonTable::malagasy();
        assert!(book_suggestions("qqq", &canon).is_empty());
    }

    #[test]
    fn book_not_found_renders_a_hint() {
        let canon = CanonTable::malagasy();
        let err = Error::BookNotFound { token: "Jaonn".to_string() };
        let md = render_error(&err, &canon);
        assert!(md.contains("Did you mean `Jaona`"));
    }

    #[test]
    fn verse_not_found_names_the_reference() {
        let canon = CanonTable::malagasy();
        let err = Error::VerseNotFound {
            book: "Jaona".to_string(),
            chapter: 99,
            spec: Some("4-7".to_string()),
        };
        let md = render_error(&err, &canon);
        assert!(md.contains("Jaona 99:4-7"));
    }
}
