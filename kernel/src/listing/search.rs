use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Folds text for matching: decomposes, drops accents and lowercases, so that
/// "Černý" and "cerny" compare equal.
pub fn normalize(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// A prepared search term. Empty terms match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    pub fn new(term: impl AsRef<str>) -> Self {
        Self(normalize(term.as_ref().trim()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn matches(&self, haystack: &str) -> bool {
        self.is_empty() || normalize(haystack).contains(&self.0)
    }
}

#[cfg(test)]
mod test {
    use super::{normalize, SearchTerm};

    #[test]
    fn strips_diacritics() {
        assert_eq!(normalize("Škoda Octávia"), "skoda octavia");
        assert_eq!(normalize("ŘÍDÍCÍ"), "ridici");
    }

    #[test]
    fn term_matching() {
        let term = SearchTerm::new("  cerny ");
        assert!(term.matches("Jan Černý"));
        assert!(!term.matches("Jana Bílá"));
        assert!(SearchTerm::new("").matches("anything"));
    }
}
