//! Core CLI commands for verseref: scan, check, resolve, books.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use walkdir::WalkDir;

use crate::canon::{CanonTable, Testament};
use crate::config::Config;
use crate::error::Error;
use crate::resolver::Resolver;
use crate::scanner::ReferenceScanner;
use crate::store::JsonStore;
use crate::types::ReferenceMatch;

/// Note file extensions worth scanning.
const NOTE_EXTENSIONS: [&str; 2] = ["md", "txt"];

/// One reference found in one note file.
struct FileMatch {
    file: PathBuf,
    line: u32,
    matched: ReferenceMatch,
}

/// Walk note files under `root` and collect every reference, in file
/// order then text order.
///
/// # Errors
///
/// Returns `Error::Io` if a note file cannot be read.
fn scan_notes(
    root: &Path,
    config: &Config,
    scanner: &ReferenceScanner,
) -> Result<Vec<FileMatch>, Error> {
    let mut found = Vec::new();

    let mut entries: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| {
            return e
                .path()
                .extension()
                .and_then(|ext| return ext.to_str())
                .is_some_and(|ext| return NOTE_EXTENSIONS.contains(&ext));
        })
        .map(|e| return e.path().to_path_buf())
        .collect();
    entries.sort();

    for path in entries {
        let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
        if !config.should_scan(&relative.to_string_lossy()) {
            continue;
        }

        let content = std::fs::read_to_string(&path)?;
        for matched in scanner.matches(&content) {
            let line = line_of(&content, matched.span.start);
            found.push(FileMatch {
                file: relative.clone(),
                line,
                matched,
            });
        }
    }

    return Ok(found);
}

/// 1-based line number of a byte offset in `text`.
fn line_of(text: &str, offset: usize) -> u32 {
    let newlines = text
        .get(..offset)
        .map(|s| return s.bytes().filter(|b| return *b == b'\n').count())
        .unwrap_or(0);
    return u32::try_from(newlines).unwrap_or(u32::MAX).saturating_add(1);
}

/// Scan note files and print every detected reference without resolving.
///
/// # Errors
///
/// Returns errors from config loading or note reading.
pub fn scan(path: &Path, json: bool) -> Result<(), Error> {
    let config = Config::load(path)?;
    let canon = CanonTable::malagasy().with_prefix_len(config.prefix_len());
    let scanner = ReferenceScanner::new(&canon);

    let found = scan_notes(path, &config, &scanner)?;
    for fm in &found {
        if json {
            let record = serde_json::json!({
                "file": fm.file.to_string_lossy(),
                "line": fm.line,
                "reference": fm.matched,
            });
            println!("{}", serde_json::to_string(&record)?);
        } else {
            println!(
                "{}:{}  {}",
                fm.file.display(),
                fm.line,
                fm.matched.descriptor.display()
            );
        }
    }

    if !json {
        let count = found.len();
        eprintln!("{count} references detected");
    }
    return Ok(());
}

/// Scan note files and resolve every reference against the configured
/// store. Prints one line per reference; exit code priority:
/// unrecognized (2) > verse missing (1) > all found (0).
///
/// # Errors
///
/// Returns errors from config loading, store opening, or note reading;
/// per-reference failures are reported, not propagated.
pub fn check(path: &Path) -> Result<ExitCode, Error> {
    let config = Config::load(path)?;
    let canon = CanonTable::malagasy().with_prefix_len(config.prefix_len());
    let scanner = ReferenceScanner::new(&canon);
    let store = JsonStore::open(&config.store_path(path))?;
    let resolver = Resolver::new(&canon, &store);

    let found = scan_notes(path, &config, &scanner)?;
    let mut missing_count = 0_u32;
    let mut unknown_count = 0_u32;

    for fm in &found {
        let display = fm.matched.descriptor.display();
        let location = format!("{}:{}", fm.file.display(), fm.line);
        match resolver.resolve(&fm.matched.descriptor) {
            Err(Error::BookNotFound { .. }) => {
                unknown_count = unknown_count.saturating_add(1);
                println!("UNKNOWN  {location}  {display}");
            },
            Err(e) => return Err(e),
            Ok(resolved) if resolved.verses.is_empty() => {
                missing_count = missing_count.saturating_add(1);
                println!("MISSING  {location}  {display}  ({})", resolved.book_name);
            },
            Ok(resolved) => {
                let count = resolved.verses.len();
                println!("OK       {location}  {display}  ({count} verses)");
            },
        }
    }

    // Exit code priority: unknown (2) > missing (1) > found (0).
    if unknown_count > 0 {
        println!();
        println!("{unknown_count} unrecognized, {missing_count} missing");
        return Ok(ExitCode::from(2));
    } else if missing_count > 0 {
        println!();
        println!("{missing_count} missing");
        return Ok(ExitCode::from(1));
    } else {
        let total = found.len();
        println!("All {total} references resolved");
        return Ok(ExitCode::SUCCESS);
    }
}

/// Scan a text argument and resolve each reference, printing verse text.
///
/// # Errors
///
/// Returns `Error::BookNotFound` or `Error::VerseNotFound` for the first
/// reference that fails, and store/config errors unchanged.
pub fn resolve(path: &Path, text: &str) -> Result<(), Error> {
    let config = Config::load(path)?;
    let canon = CanonTable::malagasy().with_prefix_len(config.prefix_len());
    let scanner = ReferenceScanner::new(&canon);
    let store = JsonStore::open(&config.store_path(path))?;
    let resolver = Resolver::new(&canon, &store);

    let found: Vec<ReferenceMatch> = scanner.matches(text).collect();
    if found.is_empty() {
        eprintln!("no references detected");
        return Ok(());
    }

    for matched in &found {
        let resolved = resolver.resolve(&matched.descriptor)?;
        if resolved.verses.is_empty() {
            return Err(Error::VerseNotFound {
                book: resolved.book_name,
                chapter: resolved.chapter,
                spec: matched.descriptor.verses.as_ref().map(|s| return s.display()),
            });
        }

        println!("{} {}", resolved.book_name, resolved.chapter);
        for verse in &resolved.verses {
            println!("{}. {}", verse.number, verse.text);
        }
        println!();
    }
    return Ok(());
}

/// Print the canon table: order, testament, canonical name, abbreviations.
///
/// # Errors
///
/// Returns `Error::Json` if JSON serialization fails.
pub fn books(json: bool) -> Result<(), Error> {
    let canon = CanonTable::malagasy();

    for book in canon.iter() {
        let testament = match book.testament {
            Testament::New => "NT",
            Testament::Old => "OT",
        };
        if json {
            let record = serde_json::json!({
                "abbreviations": book.abbreviations,
                "name": book.canonical_name,
                "order": book.order,
                "testament": testament,
            });
            println!("{}", serde_json::to_string(&record)?);
        } else {
            let abbrs = book.abbreviations.join(", ");
            println!("{:>2} {testament}  {:<24} {abbrs}", book.order, book.canonical_name);
        }
    }
    return Ok(());
}
