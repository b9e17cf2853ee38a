//! Free-text reference scanner: finds `Book Chapter[:verses]` citations.
//!
//! Book names are matched by an explicit tokenizer over the canon table's
//! alternatives, tried longest-normalized-first so a short alias never
//! shadows a longer one sharing its prefix ("1 Kor" vs "1 Korintiana").
//! Only the numeric tail goes through a regex, which is anchored and free
//! of alternation, so there is no backtracking risk.

use std::collections::HashSet;

use regex::Regex;

use crate::canon::CanonTable;
use crate::normalize;
use crate::types::{ReferenceDescriptor, ReferenceMatch, Span, VerseSpec};
use crate::versespec;

/// Anchored pattern for what follows a book token: optional period,
/// optional spaces, chapter digits, then optionally `:` and a verse
/// selector made of digits, commas, hyphens and spaces.
const TAIL_PATTERN: &str = r"^\.?[ \t]*([0-9]{1,3})[ \t]*(?::[ \t]*([0-9][0-9,\- \t]*))?";

/// A compiled scanner over one canon table. Cheap to reuse; scanning is a
/// pure function of the input text, so one scanner can serve any number
/// of texts from any thread.
pub struct ReferenceScanner {
    /// Folded book alternatives, longest first.
    alternatives: Vec<String>,
    /// First folded characters of all alternatives, to skip positions fast.
    starts: HashSet<char>,
    tail: Regex,
}

impl ReferenceScanner {
    /// Compile the canon's abbreviations and names into a longest-first
    /// alternative list.
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded tail regex is invalid (compile-time
    /// invariant).
    pub fn new(canon: &CanonTable) -> Self {
        let mut alternatives = Vec::new();
        for book in canon.iter() {
            push_alternative(&mut alternatives, &book.canonical_name);
            for abbr in &book.abbreviations {
                push_alternative(&mut alternatives, abbr);
            }
        }
        // Longest first; ties broken lexically for determinism.
        alternatives.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        alternatives.dedup();

        let starts = alternatives.iter().filter_map(|key| key.chars().next()).collect();

        Self {
            alternatives,
            starts,
            tail: Regex::new(TAIL_PATTERN).expect("valid tail regex"),
        }
    }

    /// Scan `text` lazily, yielding non-overlapping matches left to right.
    /// The iterator is restartable: calling `matches` again rescans from
    /// the top and yields an identical sequence.
    pub fn matches<'s, 't>(&'s self, text: &'t str) -> Matches<'s, 't> {
        Matches {
            cursor: 0,
            scanner: self,
            text,
        }
    }

    /// Try to produce a match starting exactly at `start`.
    fn match_at(&self, text: &str, start: usize) -> Option<ReferenceMatch> {
        for key in &self.alternatives {
            let Some(token_end) = match_alias(text, start, key) else {
                continue;
            };
            let Some(found) = self.match_tail(text, start, token_end) else {
                continue;
            };
            return Some(found);
        }
        None
    }

    /// Match the chapter/verse tail after a book token ending at
    /// `token_end`. Rejects matches that run flush into a letter, so
    /// "Matrix" never reads as "Mat" + garbage.
    fn match_tail(&self, text: &str, start: usize, token_end: usize) -> Option<ReferenceMatch> {
        let rest = text.get(token_end..)?;
        let caps = self.tail.captures(rest)?;
        let chapter_group = caps.get(1)?;
        let chapter: u32 = chapter_group.as_str().parse().ok()?;
        let chapter_end = token_end + chapter_group.end();

        if let Some(verse_group) = caps.get(2) {
            let raw = verse_group.as_str();
            // The greedy capture can swallow trailing separators; keep
            // only up to the last digit.
            let kept = raw.trim_end_matches([' ', '\t', ',', '-']);
            let verse_end = token_end + verse_group.start() + kept.len();
            if !next_char_is_letter(text, verse_end) {
                let spec = versespec::parse(kept);
                return Some(build_match(text, start, token_end, verse_end, chapter, spec));
            }
            // A letter abuts the verse digits ("3:16b"): degrade to a
            // chapter-only reference, mirroring the word-boundary rule.
        }

        if next_char_is_letter(text, chapter_end) {
            return None;
        }
        Some(build_match(text, start, token_end, chapter_end, chapter, None))
    }
}

/// Lazy iterator over scanner matches. Non-overlapping: scanning resumes
/// strictly after each match end and never backtracks into consumed text.
pub struct Matches<'s, 't> {
    cursor: usize,
    scanner: &'s ReferenceScanner,
    text: &'t str,
}

impl Iterator for Matches<'_, '_> {
    type Item = ReferenceMatch;

    fn next(&mut self) -> Option<ReferenceMatch> {
        let text = self.text;
        let tail = text.get(self.cursor..)?;
        for (offset, ch) in tail.char_indices() {
            let pos = self.cursor + offset;
            if !self.candidate_start(text, pos, ch) {
                continue;
            }
            if let Some(found) = self.scanner.match_at(text, pos) {
                self.cursor = found.span.end;
                return Some(found);
            }
        }
        self.cursor = text.len();
        None
    }
}

impl Matches<'_, '_> {
    /// A position can start a book token only on a word boundary, and
    /// only when its folded first character opens some alternative.
    fn candidate_start(&self, text: &str, pos: usize, ch: char) -> bool {
        let Some(folded) = normalize::fold_char(ch) else {
            return false;
        };
        if !self.scanner.starts.contains(&folded) {
            return false;
        }
        let before = text.get(..pos).and_then(|s| s.chars().next_back());
        !before.is_some_and(char::is_alphanumeric)
    }
}

/// Fold one written form into an alternative, skipping empty keys.
fn push_alternative(alternatives: &mut Vec<String>, form: &str) {
    let key = normalize::fold(form);
    if !key.is_empty() {
        alternatives.push(key);
    }
}

/// Match one folded alternative against the raw text at `start`.
/// Separators (spaces, periods, apostrophes, hyphens) inside the token are
/// skipped, so "1 Kor", "1Kor." and "1-Kor" all match the key "1kor".
/// Returns the byte offset just past the last consumed token character.
fn match_alias(text: &str, start: usize, key: &str) -> Option<usize> {
    let mut wanted = key.chars();
    let mut expected = wanted.next();
    let mut end = start;

    let tail = text.get(start..)?;
    for (offset, ch) in tail.char_indices() {
        let Some(want) = expected else { break };
        match normalize::fold_char(ch) {
            // Separator: never valid as the first character, skippable after.
            None if offset == 0 => return None,
            None => {},
            Some(got) if got == want => {
                expected = wanted.next();
                end = start + offset + ch.len_utf8();
            },
            Some(_) => return None,
        }
    }

    if expected.is_none() { Some(end) } else { None }
}

/// Whether the character at byte offset `pos` is a letter.
fn next_char_is_letter(text: &str, pos: usize) -> bool {
    text.get(pos..)
        .and_then(|s| s.chars().next())
        .is_some_and(char::is_alphabetic)
}

/// Assemble a match. The raw book token is the text exactly as written
/// between `start` and `token_end`; the span covers the whole citation.
fn build_match(
    text: &str,
    start: usize,
    token_end: usize,
    end: usize,
    chapter: u32,
    verses: Option<VerseSpec>,
) -> ReferenceMatch {
    let raw_book = text.get(start..token_end).unwrap_or_default().to_string();
    ReferenceMatch {
        descriptor: ReferenceDescriptor {
            chapter,
            raw_book,
            verses,
        },
        span: Span { end, start },
    }
}

#[cfg(test)]
mod tests {
    use super::ReferenceScanner;
    use crate::canon::CanonTable;
    use crate::types::{ReferenceMatch, VerseSpec};

    fn scan_all(text: &str) -> Vec<ReferenceMatch> {
        let canon = CanonTable::malagasy();
        let scanner = ReferenceScanner::new(&canon);
        scanner.matches(text).collect()
    }

    #[test]
    fn text_without_digits_yields_nothing() {
        let found = scan_all("Misaotra anao, ary ho tahian'Andriamanitra ianao.");
        assert!(found.is_empty());
    }

    #[test]
    fn abbreviated_reference_with_period() {
        let text = "Lire Jao.3:16 maintenant";
        let found = scan_all(text);
        assert_eq!(found.len(), 1);
        let m = &found[0];
        assert_eq!(m.descriptor.raw_book, "Jao");
        assert_eq!(m.descriptor.chapter, 3);
        assert_eq!(m.descriptor.verses, Some(VerseSpec::Single(16)));
        assert_eq!(&text[m.span.start..m.span.end], "Jao.3:16");
    }

    #[test]
    fn chapter_only_reference() {
        let found = scan_all("vakio ny Heb 11 rehefa maraina");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].descriptor.raw_book, "Heb");
        assert_eq!(found[0].descriptor.chapter, 11);
        assert_eq!(found[0].descriptor.verses, None);
    }

    #[test]
    fn longest_alternative_wins() {
        let found = scan_all("1 Korintiana 13:4-7");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].descriptor.raw_book, "1 Korintiana");
        assert_eq!(
            found[0].descriptor.verses,
            Some(VerseSpec::Range { from: 4, to: 7 })
        );
    }

    #[test]
    fn short_numbered_abbreviation_with_space() {
        let found = scan_all("jereo 1 Kor 13:4,5,7");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].descriptor.raw_book, "1 Kor");
        assert_eq!(
            found[0].descriptor.verses,
            Some(VerseSpec::List(vec![4, 5, 7]))
        );
    }

    #[test]
    fn matches_are_ordered_and_non_overlapping() {
        let text = "Jao 3:16 sy Sal 23 ary Mat 5:3-12";
        let found = scan_all(text);
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].descriptor.raw_book, "Jao");
        assert_eq!(found[1].descriptor.raw_book, "Sal");
        assert_eq!(found[2].descriptor.raw_book, "Mat");
        for pair in found.windows(2) {
            assert!(pair[0].span.end <= pair[1].span.start);
        }
    }

    #[test]
    fn book_token_inside_a_word_is_not_a_match() {
        // "Matrix" starts with "Mat" but runs into letters.
        assert!(scan_all("Matrix 5 dia tsara").is_empty());
        // Mid-word positions are not word boundaries.
        assert!(scan_all("amatio 5").is_empty());
    }

    #[test]
    fn verse_digits_flush_against_letters_degrade_to_chapter() {
        let found = scan_all("Jao 3:16b");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].descriptor.chapter, 3);
        assert_eq!(found[0].descriptor.verses, None);
    }

    #[test]
    fn scanning_is_idempotent() {
        let canon = CanonTable::malagasy();
        let scanner = ReferenceScanner::new(&canon);
        let text = "Jao 3:16 sy Heb 11 ary Sal 23:1-6";
        let first: Vec<_> = scanner.matches(text).collect();
        let second: Vec<_> = scanner.matches(text).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn trailing_separators_are_not_part_of_the_span() {
        let text = "Sal 23:1, ary avy eo";
        let found = scan_all(text);
        assert_eq!(found.len(), 1);
        assert_eq!(&text[found[0].span.start..found[0].span.end], "Sal 23:1");
    }

    #[test]
    fn apostrophe_names_match() {
        let found = scan_all("Asan'ny Apostoly 2:42");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].descriptor.raw_book, "Asan'ny Apostoly");
        assert_eq!(found[0].descriptor.chapter, 2);
    }
}
