//! Verse-selector parsing: the substring after `:` in a reference.
//!
//! Malformed input never produces an error here. A selector that parses
//! to nothing degrades to "whole chapter", because the text is always
//! user-authored prose, not a validated protocol.

use crate::types::VerseSpec;

/// Parse a captured verse substring (`"4-7"`, `"4, 5, 9"`, `"16"`) into a
/// selector. Ordered, first shape wins:
///
/// 1. Contains `-`: split on the first `-`; two parseable integers make a
///    `Range`, otherwise fall back to the leading digits as a `Single`.
/// 2. Contains `,`: parse each token, drop the unparseable ones, keep
///    textual order; an empty survivor list means no selector.
/// 3. Otherwise: the whole substring as a `Single`.
///
/// `None` means "no usable selector" and the reference stays valid as a
/// chapter-only reference.
pub fn parse(raw: &str) -> Option<VerseSpec> {
    let cleaned: String = raw.chars().filter(|c| return !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return None;
    }

    if let Some((from, to)) = cleaned.split_once('-') {
        if let (Ok(from), Ok(to)) = (from.parse::<u32>(), to.parse::<u32>()) {
            return Some(VerseSpec::Range { from, to });
        }
        return leading_number(&cleaned).map(VerseSpec::Single);
    }

    if cleaned.contains(',') {
        let values: Vec<u32> = cleaned
            .split(',')
            .filter_map(|token| return token.parse().ok())
            .collect();
        if values.is_empty() {
            return None;
        }
        return Some(VerseSpec::List(values));
    }

    return cleaned.parse().ok().map(VerseSpec::Single);
}

/// Parse the leading digit run of a string, if any.
fn leading_number(s: &str) -> Option<u32> {
    let digits: String = s.chars().take_while(|c| return c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    return digits.parse().ok();
}

#[cfg(test)]
mod tests {
    use super::parse;
    use crate::types::VerseSpec;

    #[test]
    fn single_verse() {
        assert_eq!(parse("16"), Some(VerseSpec::Single(16)));
        assert_eq!(parse(" 16 "), Some(VerseSpec::Single(16)));
    }

    #[test]
    fn range() {
        assert_eq!(parse("4-7"), Some(VerseSpec::Range { from: 4, to: 7 }));
        assert_eq!(parse("4 - 7"), Some(VerseSpec::Range { from: 4, to: 7 }));
    }

    #[test]
    fn inverted_range_is_kept_as_written() {
        // Validation happens at resolution, where it yields no verses.
        assert_eq!(parse("7-4"), Some(VerseSpec::Range { from: 7, to: 4 }));
    }

    #[test]
    fn list_preserves_textual_order() {
        assert_eq!(parse("9,4,5"), Some(VerseSpec::List(vec![9, 4, 5])));
        assert_eq!(parse("4, 5, 9"), Some(VerseSpec::List(vec![4, 5, 9])));
    }

    #[test]
    fn list_drops_unparseable_tokens() {
        assert_eq!(parse("4,,9"), Some(VerseSpec::List(vec![4, 9])));
        assert_eq!(parse(",,"), None);
    }

    #[test]
    fn broken_range_degrades_to_leading_single() {
        assert_eq!(parse("4-7-9"), Some(VerseSpec::Single(4)));
        assert_eq!(parse("16-"), Some(VerseSpec::Single(16)));
    }

    #[test]
    fn garbage_degrades_to_absent() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
        assert_eq!(parse("-"), None);
    }
}
