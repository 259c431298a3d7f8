use lazy_static::lazy_static;
use regex::Regex;

/// Two or more word characters between word boundaries.
pub const TOKEN_PATTERN_STR: &str = r"(?u)\b\w\w+\b";

lazy_static! {
    static ref TOKEN_PATTERN: Regex = Regex::new(TOKEN_PATTERN_STR).expect("token pattern is valid");
}

/// Splits text into lowercase word tokens.
///
/// Single characters and punctuation never become tokens, so `"Dell LAPTOP!"`
/// yields `["dell", "laptop"]` and `"a b"` yields nothing.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Counts the tokens [`tokenize`] would produce without allocating them.
pub fn count_tokens(text: &str) -> usize {
    TOKEN_PATTERN.find_iter(&text.to_lowercase()).count()
}
