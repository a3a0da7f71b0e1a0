//! Bounded fuzzy matching for alias resolution
//!
//! Levenshtein distance between an alias and word-boundary-respecting spans
//! of the utterance. Spans never start or end inside an alphanumeric token,
//! which keeps "exit" from matching inside "exiting".

use unicode_segmentation::UnicodeSegmentation;

/// Levenshtein edit distance between two strings
///
/// Two-row formulation; inputs are expected to be lowercased already.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let len_a = a_chars.len();
    let len_b = b_chars.len();

    if len_a == 0 {
        return len_b;
    }
    if len_b == 0 {
        return len_a;
    }

    let mut prev_row: Vec<usize> = (0..=len_b).collect();
    let mut curr_row: Vec<usize> = vec![0; len_b + 1];

    for i in 1..=len_a {
        curr_row[0] = i;
        for j in 1..=len_b {
            let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };
            curr_row[j] = std::cmp::min(
                std::cmp::min(
                    prev_row[j] + 1,     // deletion
                    curr_row[j - 1] + 1, // insertion
                ),
                prev_row[j - 1] + cost, // substitution
            );
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[len_b]
}

/// Minimum edit distance between `alias` and any span of whole words in
/// `text`, considering spans of 1 up to the alias's own word count
///
/// Returns `None` when no span comes within `max_distance`.
pub fn best_word_span_distance(alias: &str, text: &str, max_distance: usize) -> Option<usize> {
    let words: Vec<(usize, &str)> = text.unicode_word_indices().collect();
    if words.is_empty() {
        return None;
    }

    let alias_word_count = alias.unicode_words().count().max(1);
    let alias_chars = alias.chars().count();
    let mut best: Option<usize> = None;

    for span_len in 1..=alias_word_count {
        if span_len > words.len() {
            break;
        }
        for start in 0..=(words.len() - span_len) {
            let (first_offset, _) = words[start];
            let (last_offset, last_word) = words[start + span_len - 1];
            let candidate = &text[first_offset..last_offset + last_word.len()];

            // Length gap alone already exceeds the budget
            if candidate.chars().count().abs_diff(alias_chars) > max_distance {
                continue;
            }

            let distance = edit_distance(alias, candidate);
            if distance <= max_distance && best.map_or(true, |b| distance < b) {
                best = Some(distance);
                if distance == 0 {
                    return best;
                }
            }
        }
    }

    best
}
