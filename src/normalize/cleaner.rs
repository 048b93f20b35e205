/// Ordinal suffixes removed from scraped text, in replacement order.
pub const ORDINAL_SUFFIXES: [&str; 4] = ["TH", "ST", "ND", "RD"];

/// Uppercases the text and removes every occurrence of an ordinal suffix.
///
/// This is a plain substring replacement, not a word-boundary aware one:
/// `"22ND"` becomes `"22"`, and `"AUGUST"` becomes `"AUGU"` as well.
pub fn strip_ordinals(text: &str) -> String {
    ORDINAL_SUFFIXES
        .iter()
        .fold(text.to_uppercase(), |acc, suffix| acc.replace(suffix, ""))
}

/// Uppercases and splits on whitespace. Never yields empty tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_uppercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Strips ordinals, then tokenizes.
pub fn clean(text: &str) -> Vec<String> {
    tokenize(&strip_ordinals(text))
}
