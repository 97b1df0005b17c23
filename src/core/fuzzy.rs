//! Approximate string scoring on a 0-100 scale
//!
//! - `ratio`: whole-string similarity
//! - `partial_ratio`: best alignment of the shorter string inside the longer one
//! - `token_sort_ratio`: word-order-insensitive similarity, used for header labels
//!
//! All scorers are case-insensitive and return 0 when either side is empty.

use strsim::normalized_levenshtein;

/// Lowercase, turn punctuation into spaces, collapse whitespace
pub fn full_process(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn to_score(similarity: f64) -> u8 {
    (similarity.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Whole-string similarity
pub fn ratio(a: &str, b: &str) -> u8 {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    to_score(normalized_levenshtein(&a, &b))
}

/// Best similarity between the shorter string and any equally long window
/// of the longer one.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    if long.contains(short.as_str()) {
        return 100;
    }

    let long_chars: Vec<char> = long.chars().collect();
    let window = short.chars().count();

    let mut best = 0.0_f64;
    for start in 0..=(long_chars.len() - window) {
        let candidate: String = long_chars[start..start + window].iter().collect();
        let similarity = normalized_levenshtein(&short, &candidate);
        if similarity > best {
            best = similarity;
        }
    }
    to_score(best)
}

fn sorted_tokens(text: &str) -> String {
    let processed = full_process(text);
    let mut tokens: Vec<&str> = processed.split(' ').filter(|t| !t.is_empty()).collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Similarity after splitting into words and sorting them
pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}
