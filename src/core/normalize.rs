// File: src/core/normalize.rs
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Folds a word to its 26-letter normalized form.
///
/// Canonical decomposition splits accented letters into base + combining
/// marks; the marks are dropped, letters without a decomposition go through
/// the fold table, and anything else (apostrophes, hyphens, digits) is
/// removed. "Café" → "cafe", "Straße" → "strasse", "don't" → "dont".
pub fn normalize(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    for c in word.nfd() {
        if is_combining_mark(c) {
            continue;
        }
        for lower in c.to_lowercase() {
            if lower.is_ascii_lowercase() {
                out.push(lower);
            } else if let Some(folded) = fold_letter(lower) {
                out.push_str(folded);
            }
        }
    }
    out
}

/// Letters that carry no combining mark under NFD.
fn fold_letter(c: char) -> Option<&'static str> {
    match c {
        'ß' => Some("ss"),
        'æ' => Some("ae"),
        'œ' => Some("oe"),
        'ø' => Some("o"),
        'ł' => Some("l"),
        'đ' | 'ð' => Some("d"),
        'þ' => Some("th"),
        'ı' => Some("i"),
        'ħ' => Some("h"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents() {
        assert_eq!(normalize("café"), "cafe");
        assert_eq!(normalize("Élève"), "eleve");
        assert_eq!(normalize("niño"), "nino");
        assert_eq!(normalize("über"), "uber");
        assert_eq!(normalize("garçon"), "garcon");
    }

    #[test]
    fn folds_special_letters() {
        assert_eq!(normalize("Straße"), "strasse");
        assert_eq!(normalize("cœur"), "coeur");
        assert_eq!(normalize("łódź"), "lodz");
        assert_eq!(normalize("İstanbul"), "istanbul");
    }

    #[test]
    fn drops_non_letters() {
        assert_eq!(normalize("don't"), "dont");
        assert_eq!(normalize("aujourd'hui"), "aujourdhui");
        assert_eq!(normalize("abc-123"), "abc");
        assert_eq!(normalize("plain"), "plain");
    }
}
