//! Slug normalization: arbitrary human-readable text → URL-safe token.
//!
//! The accent table covers the site's locale (es-AR) only; this is not
//! general Unicode folding, and deliberately so.

use std::sync::LazyLock;

use regex::Regex;

/// Characters outside the URL-safe working set (applied after lowercasing
/// and accent folding).
static STRIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s-]").expect("valid regex"));

/// Runs of separators (whitespace or hyphens) collapse to one hyphen, so
/// the output never contains consecutive or dangling hyphens.
static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s-]+").expect("valid regex"));

/// Accented characters of the target locale and their foldings.
const ACCENT_TABLE: &[(char, char)] = &[
    ('á', 'a'),
    ('é', 'e'),
    ('í', 'i'),
    ('ó', 'o'),
    ('ú', 'u'),
    ('ñ', 'n'),
    ('ü', 'u'),
];

/// Convert text to a lowercase, hyphen-separated, URL-safe slug.
///
/// Total over strings: no error conditions, empty input yields empty output.
/// Non-empty output always matches `^[a-z0-9]+(-[a-z0-9]+)*$`.
pub fn slugify(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let folded: String = text.to_lowercase().chars().map(fold_accent).collect();
    let stripped = STRIP_RE.replace_all(&folded, "");
    let hyphenated = SEPARATOR_RE.replace_all(&stripped, "-");

    hyphenated.trim_matches('-').to_string()
}

fn fold_accent(c: char) -> char {
    ACCENT_TABLE
        .iter()
        .find(|(accented, _)| *accented == c)
        .map(|(_, plain)| *plain)
        .unwrap_or(c)
}
