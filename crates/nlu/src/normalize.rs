//! Text normalization ahead of entity resolution
//!
//! Lowercases and replaces ordinal words with digit strings, using
//! whole-word boundaries only: "third" inside another word is untouched.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

static ORDINAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(first|second|third|fourth|fifth|sixth|seventh|eighth|ninth|1st|2nd|3rd|4th|5th|6th|7th|8th|9th)\b",
    )
    .expect("ordinal pattern is valid")
});

fn ordinal_digit(word: &str) -> Option<&'static str> {
    match word {
        "first" | "1st" => Some("1"),
        "second" | "2nd" => Some("2"),
        "third" | "3rd" => Some("3"),
        "fourth" | "4th" => Some("4"),
        "fifth" | "5th" => Some("5"),
        "sixth" | "6th" => Some("6"),
        "seventh" | "7th" => Some("7"),
        "eighth" | "8th" => Some("8"),
        "ninth" | "9th" => Some("9"),
        _ => None,
    }
}

/// Lowercase and rewrite ordinal words to digits
pub fn normalize(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    ORDINAL_RE
        .replace_all(&lowered, |caps: &regex::Captures| {
            // The arms of ordinal_digit mirror ORDINAL_RE, so a miss cannot
            // happen; fall back to the original word rather than panic.
            match ordinal_digit(&caps[1]) {
                Some(digit) => digit.to_string(),
                None => caps[1].to_string(),
            }
        })
        .into_owned()
}

/// Cardinal number words accepted where a digit is expected
pub fn number_word_value(word: &str) -> Option<&'static str> {
    match word {
        "one" => Some("1"),
        "two" => Some("2"),
        "three" => Some("3"),
        "four" => Some("4"),
        "five" => Some("5"),
        "six" => Some("6"),
        "seven" => Some("7"),
        "eight" => Some("8"),
        "nine" => Some("9"),
        _ => None,
    }
}

/// First digit run or number word within the leading `window_chars` of `text`
///
/// Used to validate numbered-family aliases: the text handed in starts right
/// after the alias occurrence.
pub fn leading_number(text: &str, window_chars: usize) -> Option<String> {
    let cutoff = text
        .char_indices()
        .nth(window_chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let window = &text[..cutoff];

    for word in window.unicode_words() {
        if !word.is_empty() && word.chars().all(|c| c.is_ascii_digit()) {
            return Some(word.to_string());
        }
        if let Some(digit) = number_word_value(word) {
            return Some(digit.to_string());
        }
    }
    None
}
