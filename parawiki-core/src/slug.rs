//! Slug generation from article titles.

use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

static DISALLOWED_REGEX: OnceLock<Regex> = OnceLock::new();
static WHITESPACE_REGEX: OnceLock<Regex> = OnceLock::new();

/// Whitespace as browsers define it (ECMAScript WhiteSpace and LineTerminator).
/// Differs from Unicode White_Space: U+0085 is excluded, U+FEFF is included.
const WHITESPACE_CLASS: &str =
    r"\t\n\x0B\x0C\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}";

fn disallowed_regex() -> &'static Regex {
    // Word characters are ASCII-only here; anything outside survives only if
    // it decomposes to an ASCII base letter.
    DISALLOWED_REGEX.get_or_init(|| {
        Regex::new(&format!(r"[^A-Za-z0-9_{}-]", WHITESPACE_CLASS)).unwrap()
    })
}

fn whitespace_regex() -> &'static Regex {
    WHITESPACE_REGEX.get_or_init(|| Regex::new(&format!(r"[{}]+", WHITESPACE_CLASS)).unwrap())
}

/// Combining Diacritical Marks block (U+0300..=U+036F)
fn is_combining_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Convert an article title to a URL-safe slug
///
/// Rules:
/// - Lowercase
/// - Decompose accented letters (NFD) and drop the diacritical marks
/// - Remove everything except ASCII letters, digits, underscores, whitespace and hyphens
/// - Replace each run of whitespace with a single hyphen
///
/// Leading/trailing whitespace turns into leading/trailing hyphens and
/// existing hyphens are not collapsed. Symbol-only titles give an empty or
/// hyphen-only slug; an empty one is rejected by submission validation.
///
/// # Examples
///
/// ```
/// use parawiki_core::generate_slug;
///
/// assert_eq!(generate_slug("Ação & Reação!"), "acao-reacao");
/// assert_eq!(generate_slug("Hello World"), "hello-world");
/// assert_eq!(generate_slug(""), "");
/// ```
pub fn generate_slug(title: &str) -> String {
    let lowercased = title.to_lowercase();

    let without_marks: String = lowercased
        .nfd()
        .filter(|c| !is_combining_diacritic(*c))
        .collect();

    let cleaned = disallowed_regex().replace_all(&without_marks, "");

    whitespace_regex().replace_all(&cleaned, "-").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_slug() {
        assert_eq!(generate_slug("Hello World"), "hello-world");
        assert_eq!(generate_slug("Guia de Facções"), "guia-de-faccoes");
    }

    #[test]
    fn test_accents_are_stripped() {
        assert_eq!(generate_slug("Ação & Reação!"), "acao-reacao");
        assert_eq!(generate_slug("Ñandú"), "nandu");
        assert_eq!(generate_slug("Crème Brûlée"), "creme-brulee");
    }

    #[test]
    fn test_special_characters() {
        assert_eq!(generate_slug("C++ Programming"), "c-programming");
        assert_eq!(generate_slug("Node.js Tips"), "nodejs-tips");
        assert_eq!(generate_slug("What's new?"), "whats-new");
    }

    #[test]
    fn test_underscores_and_hyphens_are_kept() {
        assert_eq!(generate_slug("snake_case title"), "snake_case-title");
        assert_eq!(generate_slug("pre-existing"), "pre-existing");
        assert_eq!(generate_slug("a - b"), "a---b");
    }

    #[test]
    fn test_whitespace_runs_collapse() {
        assert_eq!(generate_slug("Multiple   Spaces   Here"), "multiple-spaces-here");
        assert_eq!(generate_slug("tab\tand\nnewline"), "tab-and-newline");
        assert_eq!(generate_slug("  padded  "), "-padded-");
    }

    #[test]
    fn test_browser_whitespace_set() {
        // Next-line is not whitespace in browsers, so it is dropped
        assert_eq!(generate_slug("a\u{85}b"), "ab");
        // Byte-order mark and no-break space are
        assert_eq!(generate_slug("a\u{feff}b"), "a-b");
        assert_eq!(generate_slug("a\u{a0}\u{3000}b"), "a-b");
    }

    #[test]
    fn test_non_latin_letters_are_removed() {
        assert_eq!(generate_slug("日本語"), "");
        assert_eq!(generate_slug("Straße"), "strae");
    }

    #[test]
    fn test_empty_and_symbol_only() {
        assert_eq!(generate_slug(""), "");
        assert_eq!(generate_slug("!!!"), "");
        assert_eq!(generate_slug("& ?"), "-");
    }

    #[test]
    fn test_deterministic() {
        let title = "Reinos Perdidos: Capítulo 1";
        assert_eq!(generate_slug(title), generate_slug(title));
        assert_eq!(generate_slug(title), "reinos-perdidos-capitulo-1");
    }
}
