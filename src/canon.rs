//! Canonical book table: the per-language mapping from any recognized
//! textual form of a book name to its identity and canonical order.
//!
//! Built once at startup, immutable afterwards, safe to share across
//! concurrent scans and resolutions.

use std::collections::HashMap;

use crate::normalize;

/// Number of Old Testament books; canonical order at or below this is Old.
const OLD_TESTAMENT_BOOKS: u32 = 39;

/// Default prefix-match threshold. Three folded characters is what the
/// shipped Malagasy abbreviations need to stay unambiguous in practice;
/// override with `CanonTable::with_prefix_len`.
pub const DEFAULT_PREFIX_LEN: usize = 3;

/// Which testament a book belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Testament {
    /// Matio through Apokalypsy (orders 40..=66).
    New,
    /// Genesis through Malakia (orders 1..=39).
    Old,
}

/// One canonical book entry: its display name, the short forms accepted
/// in text, and its 1-based position in the 66-book canon.
#[derive(Debug, Clone)]
pub struct BookAlias {
    /// Short forms accepted in text, as written (un-normalized).
    pub abbreviations: Vec<String>,
    /// Full localized display name.
    pub canonical_name: String,
    /// 1-based canonical position (1..=66).
    pub order: u32,
    /// Old or New Testament, derived from `order`.
    pub testament: Testament,
}

/// Authoritative lookup table for one language's canon.
///
/// Every abbreviation and canonical name is folded into a normalized key;
/// `lookup_exact` is O(1) over that key map. Keys are unique across books
/// by construction.
pub struct CanonTable {
    books: Vec<BookAlias>,
    keys: HashMap<String, usize>,
    prefix_len: usize,
}

impl CanonTable {
    /// Build a table from `(canonical name, abbreviations)` entries given
    /// in canonical order. Duplicate normalized keys across distinct books
    /// violate the table invariant and trip a debug assertion.
    pub fn from_entries(entries: &[(&str, &[&str])]) -> Self {
        let mut books = Vec::with_capacity(entries.len());
        let mut keys: HashMap<String, usize> = HashMap::new();

        for (idx, (name, abbrs)) in entries.iter().enumerate() {
            let order = u32::try_from(idx).unwrap_or(u32::MAX).saturating_add(1);
            let testament = if order <= OLD_TESTAMENT_BOOKS {
                Testament::Old
            } else {
                Testament::New
            };
            books.push(BookAlias {
                abbreviations: abbrs.iter().map(|a| return (*a).to_string()).collect(),
                canonical_name: (*name).to_string(),
                order,
                testament,
            });

            insert_key(&mut keys, name, idx);
            for abbr in *abbrs {
                insert_key(&mut keys, abbr, idx);
            }
        }

        Self {
            books,
            keys,
            prefix_len: DEFAULT_PREFIX_LEN,
        }
    }

    /// The shipped Malagasy canon (66 books, protestant ordering).
    pub fn malagasy() -> Self {
        Self::from_entries(MALAGASY)
    }

    /// Override the prefix-match threshold. Shorter thresholds trade
    /// precision for recall; the ambiguity rejection still applies.
    #[must_use]
    pub fn with_prefix_len(mut self, prefix_len: usize) -> Self {
        self.prefix_len = prefix_len.max(1);
        self
    }

    /// The current prefix-match threshold, in folded characters.
    pub fn prefix_len(&self) -> usize {
        self.prefix_len
    }

    /// Iterate books in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &BookAlias> {
        self.books.iter()
    }

    /// Case-, separator- and diacritic-insensitive lookup against the full
    /// set of abbreviations and canonical names. `None` means "not a book",
    /// never an error.
    pub fn lookup_exact(&self, token: &str) -> Option<&BookAlias> {
        let key = normalize::fold(token);
        self.keys.get(&key).and_then(|&idx| self.books.get(idx))
    }

    /// Fallback lookup on the first `prefix_len` folded characters of
    /// `token`, matched against every key truncated the same way.
    ///
    /// If two or more distinct books share the prefix the match is
    /// rejected: resolving silently to the wrong book is worse than
    /// failing to detect a reference.
    pub fn lookup_prefix(&self, token: &str) -> Option<&BookAlias> {
        let folded = normalize::fold(token);
        if folded.chars().count() < self.prefix_len {
            return None;
        }
        let prefix: String = folded.chars().take(self.prefix_len).collect();

        let mut found: Option<usize> = None;
        for (key, &idx) in &self.keys {
            let truncated: String = key.chars().take(self.prefix_len).collect();
            if truncated != prefix {
                continue;
            }
            match found {
                None => found = Some(idx),
                Some(prev) if prev == idx => {},
                // Two distinct books share the prefix: ambiguous.
                Some(_) => return None,
            }
        }

        found.and_then(|idx| self.books.get(idx))
    }
}

/// Insert one normalized key, asserting cross-book uniqueness.
fn insert_key(keys: &mut HashMap<String, usize>, form: &str, idx: usize) {
    let key = normalize::fold(form);
    if key.is_empty() {
        return;
    }
    let previous = keys.insert(key, idx);
    debug_assert!(
        previous.is_none_or(|p| return p == idx),
        "duplicate alias `{form}` across books"
    );
}

/// The Malagasy canon in canonical order. Abbreviations are the forms the
/// original reader app accepted in notes; several books are commonly cited
/// by their full name only, so their abbreviation equals a folded name
/// fragment rather than a distinct short form.
const MALAGASY: &[(&str, &[&str])] = &[
    // Old Testament
    ("Genesis", &["Gen"]),
    ("Eksodosy", &["Eks"]),
    ("Levitikosy", &["Lev"]),
    ("Nomery", &["Nom"]),
    ("Deoteronomia", &["Deo"]),
    ("Josoa", &["Jos"]),
    ("Mpitsara", &["Mpits"]),
    ("Rota", &["Rota"]),
    ("1 Samoela", &["1Sam"]),
    ("2 Samoela", &["2Sam"]),
    ("1 Mpanjaka", &["1Mpanj"]),
    ("2 Mpanjaka", &["2Mpanj"]),
    ("1 Tantara", &["1Tant"]),
    ("2 Tantara", &["2Tant"]),
    ("Ezra", &["Ezra"]),
    ("Nehemia", &["Neh"]),
    ("Estera", &["Est"]),
    ("Joba", &["Joba"]),
    ("Salamo", &["Sal"]),
    ("Ohabolana", &["Ohab"]),
    ("Mpitoriteny", &["Mpito"]),
    ("Tononkiran'i Solomona", &["Tonon"]),
    ("Isaia", &["Isa"]),
    ("Jeremia", &["Jer"]),
    ("Fitomaniana", &["Fitom"]),
    ("Ezekiela", &["Ezek"]),
    ("Daniela", &["Dan"]),
    ("Hosea", &["Hosea"]),
    ("Joela", &["Joela"]),
    ("Amosa", &["Amosa"]),
    ("Obadia", &["Obad"]),
    ("Jona", &["Jon"]),
    ("Mika", &["Mika"]),
    ("Nahoma", &["Nah"]),
    ("Habakoka", &["Hab"]),
    ("Zefania", &["Zef"]),
    ("Hagay", &["Hag"]),
    ("Zakaria", &["Zak"]),
    ("Malakia", &["Mal"]),
    // New Testament
    ("Matio", &["Mat"]),
    ("Marka", &["Mar"]),
    ("Lioka", &["Lio"]),
    ("Jaona", &["Jao"]),
    ("Asan'ny Apostoly", &["Asa"]),
    ("Romanina", &["Rom"]),
    ("1 Korintiana", &["1Kor"]),
    ("2 Korintiana", &["2Kor"]),
    ("Galatiana", &["Gal"]),
    ("Efesiana", &["Efe"]),
    ("Filipiana", &["Filip"]),
    ("Kolosiana", &["Kol"]),
    ("1 Tesaloniana", &["1Tes"]),
    ("2 Tesaloniana", &["2Tes"]),
    ("1 Timoty", &["1Tim"]),
    ("2 Timoty", &["2Tim"]),
    ("Titosy", &["Tit"]),
    ("Filemona", &["File"]),
    ("Hebreo", &["Heb"]),
    ("Jakoba", &["Jak"]),
    ("1 Petera", &["1Pet"]),
    ("2 Petera", &["2Pet"]),
    ("1 Jaona", &["1Jao"]),
    ("2 Jaona", &["2Jao"]),
    ("3 Jaona", &["3Jao"]),
    ("Joda", &["Jod"]),
    ("Apokalypsy", &["Apok"]),
];

#[cfg(test)]
mod tests {
    use super::{CanonTable, Testament};

    #[test]
    fn full_canon_has_sixty_six_books() {
        let canon = CanonTable::malagasy();
        assert_eq!(canon.iter().count(), 66);
        let old = canon.iter().filter(|b| b.testament == Testament::Old).count();
        assert_eq!(old, 39);
    }

    #[test]
    fn exact_lookup_tolerates_case_periods_and_spaces() {
        let canon = CanonTable::malagasy();
        for token in ["Jao", "jao", "JAO.", " jAo "] {
            let alias = canon.lookup_exact(token).expect("should match Jaona");
            assert_eq!(alias.canonical_name, "Jaona");
            assert_eq!(alias.order, 43);
        }
    }

    #[test]
    fn exact_lookup_matches_full_names_and_numbered_books() {
        let canon = CanonTable::malagasy();
        assert_eq!(
            canon.lookup_exact("1 Korintiana").map(|b| b.order),
            Some(46)
        );
        assert_eq!(canon.lookup_exact("1kor").map(|b| b.order), Some(46));
        assert_eq!(canon.lookup_exact("Apokalypsy").map(|b| b.order), Some(66));
    }

    #[test]
    fn exact_lookup_rejects_unknown_words() {
        let canon = CanonTable::malagasy();
        assert!(canon.lookup_exact("maintenant").is_none());
        assert!(canon.lookup_exact("").is_none());
    }

    #[test]
    fn prefix_lookup_resolves_unique_prefixes() {
        let canon = CanonTable::malagasy();
        // "Jaonary" is a typo for Jaona; its 3-char prefix is unique.
        let alias = canon.lookup_prefix("Jaonary").expect("jao is unambiguous");
        assert_eq!(alias.canonical_name, "Jaona");
    }

    #[test]
    fn prefix_lookup_rejects_ambiguous_prefixes() {
        let canon = CanonTable::malagasy();
        // "fil" could be Filipiana or Filemona; fail closed.
        assert!(canon.lookup_prefix("fil").is_none());
        // "mpi" could be Mpitsara or Mpitoriteny.
        assert!(canon.lookup_prefix("mpi").is_none());
    }

    #[test]
    fn prefix_lookup_requires_min_length() {
        let canon = CanonTable::malagasy();
        assert!(canon.lookup_prefix("ja").is_none());
    }

    #[test]
    fn prefix_threshold_is_tunable() {
        let canon = CanonTable::malagasy().with_prefix_len(4);
        // At 4 chars "fili" vs "file" no longer collide.
        let alias = canon.lookup_prefix("Filipiannes").expect("fili is unique");
        assert_eq!(alias.canonical_name, "Filipiana");
    }

    #[test]
    fn contrived_table_prefix_collision_returns_none() {
        let canon = CanonTable::from_entries(&[("Joba", &["Job"]), ("Jona", &["Jon"])])
            .with_prefix_len(2);
        assert!(canon.lookup_prefix("jo").is_none());
        // Exact forms still resolve.
        assert_eq!(
            canon.lookup_exact("Job").map(|b| b.canonical_name.clone()),
            Some("Joba".to_string())
        );
    }

    #[test]
    #[should_panic(expected = "duplicate alias")]
    fn duplicate_alias_across_books_is_rejected() {
        let _ = CanonTable::from_entries(&[("Joba", &["Jo"]), ("Jona", &["Jo"])]);
    }
}
