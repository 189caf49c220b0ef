use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // A word runs from the first ASCII alphanumeric to the last one before
    // the next whitespace run; interior punctuation stays part of the word.
    static ref WORD: Regex =
        Regex::new(r"[0-9A-Za-z](?:\S*[0-9A-Za-z])?").expect("valid regex");
}

/// Iterate the words of `line` in order.
///
/// Lazy and restartable (call again for a fresh pass). All-punctuation runs
/// yield nothing, so empty words never reach callers.
pub fn words(line: &str) -> impl Iterator<Item = &str> {
    WORD.find_iter(line).map(|m| m.as_str())
}

/// Strip leading and trailing non-alphanumeric characters from a standalone
/// token. Interior characters are untouched. May return an empty string,
/// which callers treat as an always-miss key.
pub fn clean(word: &str) -> &str {
    let first = match word.find(|c: char| c.is_ascii_alphanumeric()) {
        Some(i) => i,
        None => return "",
    };
    let last = word
        .rfind(|c: char| c.is_ascii_alphanumeric())
        .unwrap_or(first);
    &word[first..=last]
}

/// Lowercase form of a word, used as the index key. Kept separate from
/// [`clean`] so the verbatim word survives for display and sensitive
/// matching.
pub fn lower(word: &str) -> String {
    word.to_lowercase()
}
