//! Shared preprocessing for the metric computations. The raw (unprocessed)
//! texts still feed the statistics block separately.

/// Lowercase, keep `[a-z0-9\s-]`, collapse whitespace runs to single spaces.
pub fn preprocess(text: &str) -> String {
    let lowered = text.to_lowercase();
    let filtered: String = lowered
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c.is_whitespace() || c == '-' {
                c
            } else {
                ' '
            }
        })
        .collect();
    filtered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Simplified 13a-style tokenisation: since [`preprocess`] already strips
/// punctuation ahead of this step, tokenising reduces to a whitespace
/// split over the preprocessed text.
pub fn tokenize(preprocessed: &str) -> Vec<String> {
    preprocessed.split_whitespace().map(String::from).collect()
}
