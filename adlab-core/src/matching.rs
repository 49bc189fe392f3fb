//! Loose text comparison between a clean extraction and noisy OCR fragments.

/// Lowercases, drops punctuation and collapses runs of whitespace.
pub fn normalize_text(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .flat_map(char::to_lowercase)
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Two texts name the same entry once normalized.
pub fn texts_match(a: &str, b: &str) -> bool {
    let a = normalize_text(a);
    !a.is_empty() && a == normalize_text(b)
}

/// An OCR fragment belongs to `text` when one contains the other after normalization.
///
/// Fragments are matched on word boundaries, so `"sale"` matches `"Big Summer Sale"` but
/// `"ale"` does not.
pub fn fragment_matches(fragment: &str, text: &str) -> bool {
    let fragment = normalize_text(fragment);
    let text = normalize_text(text);
    if fragment.is_empty() || text.is_empty() {
        return false;
    }
    contains_words(&text, &fragment) || contains_words(&fragment, &text)
}

fn contains_words(haystack: &str, needle: &str) -> bool {
    let padded = format!(" {haystack} ");
    padded.contains(&format!(" {needle} "))
}
