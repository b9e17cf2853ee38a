use std::path::{Path, PathBuf};

use crate::canon;
use crate::error::Error;

/// Project configuration loaded from `.verseref.toml`.
/// Include/exclude patterns are path prefixes applied to note files.
pub struct Config {
    exclude: Vec<String>,
    include: Vec<String>,
    prefix_len: usize,
    store: PathBuf,
}

/// Raw TOML structure for `.verseref.toml`.
#[derive(serde::Deserialize)]
struct VerserefTomlConfig {
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default)]
    include: Vec<String>,
    #[serde(default)]
    prefix_len: Option<usize>,
    #[serde(default)]
    store: Option<PathBuf>,
}

impl Config {
    /// Load config from `.verseref.toml` in the given root directory.
    /// Returns defaults if the file doesn't exist. Returns an error if the
    /// file exists but is malformed, never silently falling back to
    /// defaults when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(".verseref.toml");
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::defaults()),
            Err(e) => return Err(Error::Io(e)),
        };

        let raw: VerserefTomlConfig = toml::from_str(&content)?;
        Ok(Self {
            exclude: raw.exclude,
            include: raw.include,
            prefix_len: raw.prefix_len.unwrap_or(canon::DEFAULT_PREFIX_LEN),
            store: raw.store.unwrap_or_else(|| PathBuf::from("bible.json")),
        })
    }

    /// Default config: scan everything, store at `bible.json`, standard
    /// prefix threshold.
    fn defaults() -> Self {
        Self {
            exclude: Vec::new(),
            include: Vec::new(),
            prefix_len: canon::DEFAULT_PREFIX_LEN,
            store: PathBuf::from("bible.json"),
        }
    }

    /// The prefix-match threshold for the canon table.
    pub fn prefix_len(&self) -> usize {
        self.prefix_len
    }

    /// Absolute-ish path of the verse store, relative to the scan root.
    pub fn store_path(&self, root: &Path) -> PathBuf {
        root.join(&self.store)
    }

    /// Check whether a note file path should be scanned.
    ///
    /// A path is included if no include patterns are set (scan everything),
    /// or if the path starts with at least one include pattern.
    /// An included path is then excluded if it starts with any exclude pattern.
    pub fn should_scan(&self, relative_path: &str) -> bool {
        let included = self.include.is_empty()
            || self.include.iter().any(|p| relative_path.starts_with(p.as_str()));

        if !included {
            return false;
        }

        !self.exclude.iter().any(|p| relative_path.starts_with(p.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.prefix_len(), 3);
        assert!(config.should_scan("notes/anything.md"));
        assert!(config.store_path(dir.path()).ends_with("bible.json"));
    }

    #[test]
    fn malformed_file_is_a_hard_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".verseref.toml"), "store = [not toml").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }

    #[test]
    fn include_exclude_prefixes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".verseref.toml"),
            "include = [\"notes/\"]\nexclude = [\"notes/archive/\"]\n",
        )
        .unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(config.should_scan("notes/today.md"));
        assert!(!config.should_scan("drafts/today.md"));
        assert!(!config.should_scan("notes/archive/old.md"));
    }

    #[test]
    fn prefix_len_is_tunable() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".verseref.toml"), "prefix_len = 4\n").unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.prefix_len(), 4);
    }
}
