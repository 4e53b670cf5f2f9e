//! Ordered fallback helpers: the first candidate that yields a usable value wins.

/// Returns the first candidate that is non-empty after trimming, trimmed.
pub fn first_non_empty<I, S>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    candidates.into_iter().flatten().find_map(|candidate| {
        let trimmed = candidate.as_ref().trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

/// Truncates to at most `max_chars` characters without splitting a code point.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
