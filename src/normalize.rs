//! Token normalization shared by the canon table, scanner, and resolver.
//!
//! All book-name comparison in this crate happens on folded strings:
//! lowercase, separator-free, diacritic-free. Folding the same way on both
//! sides makes "Jao.", "jao" and "JAO " all hit the same key.

/// Characters that never distinguish two book names. Periods trail
/// abbreviations, apostrophes and hyphens appear in Malagasy names
/// ("Tononkiran'i Solomona", "Asan'ny Apostoly").
pub(crate) fn is_separator(c: char) -> bool {
    return matches!(c, ' ' | '\t' | '.' | '\'' | '\u{2019}' | '-');
}

/// Fold one character: `None` for separators, otherwise the lowercase
/// diacritic-free equivalent. Accent coverage is the Latin set seen in
/// Malagasy and French text; anything else passes through lowered.
pub(crate) fn fold_char(c: char) -> Option<char> {
    if is_separator(c) {
        return None;
    }
    let lower = c.to_lowercase().next().unwrap_or(c);
    let folded = match lower {
        'à' | 'â' | 'ä' | 'á' | 'ã' => 'a',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ô' | 'ö' | 'õ' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    };
    return Some(folded);
}

/// Fold a whole string into its comparison form.
pub fn fold(s: &str) -> String {
    return s.chars().filter_map(fold_char).collect();
}

#[cfg(test)]
mod tests {
    use super::fold;

    #[test]
    fn strips_separators_and_case() {
        assert_eq!(fold("1 Kor."), "1kor");
        assert_eq!(fold("JAO "), "jao");
    }

    #[test]
    fn folds_diacritics() {
        assert_eq!(fold("Jérémia"), "jeremia");
        assert_eq!(fold("Hébreo"), "hebreo");
    }

    #[test]
    fn strips_apostrophes() {
        assert_eq!(fold("Asan'ny Apostoly"), "asannyapostoly");
        assert_eq!(fold("Tononkiran\u{2019}i Solomona"), "tononkiranisolomona");
    }

    #[test]
    fn empty_input() {
        assert_eq!(fold(""), "");
        assert_eq!(fold(" .'"), "");
    }
}
