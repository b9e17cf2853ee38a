/// Crate-level error types for verseref diagnostics.
use std::path::PathBuf;

/// All errors in verseref carry enough context to produce a useful
/// diagnostic without a debugger. The scanner and the verse-spec parser
/// never produce errors; malformed prose degrades to fewer matches or a
/// broader selection, never a failure.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Every resolution strategy was exhausted without a store match.
    /// An ambiguous prefix is reported the same way: fail closed.
    #[error("book not found: `{token}`")]
    BookNotFound {
        /// The raw book token from the scanned text.
        token: String,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization failed while emitting output.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// Verse store exists but cannot be parsed.
    #[error("store corrupt: {}: {reason}", path.display())]
    StoreCorrupt {
        /// Path to the unreadable store file.
        path: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// Configured verse store does not exist on disk.
    #[error("store not found: {}", path.display())]
    StoreNotFound {
        /// Path to the missing store file.
        path: PathBuf,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// The book resolved but the chapter/verse filter yielded zero rows.
    /// Reported distinctly from `BookNotFound` so callers can present
    /// "verse not found" versus "reference not recognized".
    #[error("no verses match: {book} {chapter}{}", format_spec(spec))]
    VerseNotFound {
        /// Book name as the store spells it.
        book: String,
        /// Chapter that was queried.
        chapter: u32,
        /// Display form of the verse selector, if one was given.
        spec: Option<String>,
    },

    /// Filesystem watcher could not be created or attached.
    #[error("watch failed: {reason}")]
    WatchFailed {
        /// Description of the watcher failure.
        reason: String,
    },
}

/// Render the optional selector part of a `VerseNotFound` message.
fn format_spec(spec: &Option<String>) -> String {
    return match spec {
        None => String::new(),
        Some(s) => format!(":{s}"),
    };
}
