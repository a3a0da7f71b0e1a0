//! Entity resolution pipeline
//!
//! Turns a free-text location reference into a canonical facility name:
//!
//! 1. Normalize (lowercase, ordinal words to digits).
//! 2. Gate pattern: `(optional "gate")(letter)(1-3 digits)` short-circuits
//!    to `"Gate <LETTER><digits>"` before any gazetteer lookup.
//! 3. Exact alias containment, longest alias first; numbered families then
//!    need a digit or number word in a small window after the alias.
//! 4. Fuzzy fallback over non-numbered aliases only. Number extraction after
//!    a fuzzy hit is deliberately not attempted.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use wayfinder_config::{GazetteerConfig, GazetteerEntry, ResolverSettings};

use crate::fuzzy::best_word_span_distance;
use crate::normalize::{leading_number, normalize};

static GATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:gate\s*)?([a-z])([0-9]{1,3})\b").expect("gate pattern is valid"));

/// Resolution failures; both recoverable, both surfaced to the user as a
/// clarification rather than a fault
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("could not resolve \"{phrase}\" to a known place")]
    Unresolved { phrase: String },

    #[error("\"{base}\" needs a number, for example \"{base} 2\"")]
    MissingRequiredNumber { base: String },
}

/// Alias -> canonical resolver over a static gazetteer
pub struct EntityResolver {
    /// Entries sorted longest alias first; the sort is stable, so
    /// declaration order breaks equal-length ties
    entries: Vec<GazetteerEntry>,
    settings: ResolverSettings,
}

impl EntityResolver {
    pub fn new(gazetteer: GazetteerConfig, settings: ResolverSettings) -> Self {
        let mut entries = gazetteer.entries;
        // Aliases go through the same normalization the utterance will, so
        // an alias written as "second floor exit" still matches.
        for entry in &mut entries {
            entry.alias = normalize(&entry.alias);
        }
        entries.sort_by(|a, b| b.alias.chars().count().cmp(&a.alias.chars().count()));

        tracing::debug!(aliases = entries.len(), "entity resolver ready");
        Self { entries, settings }
    }

    /// Resolve a free-text phrase to a canonical facility name
    pub fn resolve(&self, raw: &str) -> Result<String, ResolveError> {
        let text = normalize(raw);

        // Gate references win over everything else, even when a gazetteer
        // alias is also present in the text.
        if let Some(caps) = GATE_RE.captures(&text) {
            let canonical = format!("Gate {}{}", caps[1].to_uppercase(), &caps[2]);
            tracing::debug!(%canonical, "gate pattern hit");
            return Ok(canonical);
        }

        if let Some((entry, position)) = self.best_exact_match(&text) {
            tracing::debug!(alias = %entry.alias, canonical = %entry.canonical, "exact alias hit");
            if entry.requires_number {
                let after = &text[position + entry.alias.len()..];
                return match leading_number(after, self.settings.number_window_chars) {
                    Some(number) => Ok(format!("{} {}", entry.canonical, number)),
                    // A bare family name is not resolvable; do not fall
                    // through to fuzzy matching.
                    None => Err(ResolveError::MissingRequiredNumber {
                        base: entry.canonical.clone(),
                    }),
                };
            }
            return Ok(entry.canonical.clone());
        }

        if let Some(entry) = self.best_fuzzy_match(&text) {
            return Ok(entry.canonical.clone());
        }

        Err(ResolveError::Unresolved { phrase: raw.trim().to_string() })
    }

    /// Longest alias that appears verbatim in the text, with its byte offset
    fn best_exact_match(&self, text: &str) -> Option<(&GazetteerEntry, usize)> {
        // entries is sorted longest first
        self.entries
            .iter()
            .find_map(|entry| text.find(entry.alias.as_str()).map(|pos| (entry, pos)))
    }

    /// Best fuzzy candidate among non-numbered aliases
    ///
    /// Numbered families are excluded outright: extracting a trailing number
    /// after an inexact alias hit is too unreliable.
    fn best_fuzzy_match(&self, text: &str) -> Option<&GazetteerEntry> {
        let mut best: Option<(&GazetteerEntry, usize)> = None;

        for entry in &self.entries {
            if entry.requires_number {
                continue;
            }
            let threshold = self.fuzzy_threshold(&entry.alias);
            if let Some(distance) = best_word_span_distance(&entry.alias, text, threshold) {
                tracing::debug!(alias = %entry.alias, distance, "fuzzy candidate");
                if best.map_or(true, |(_, b)| distance < b) {
                    best = Some((entry, distance));
                }
            }
        }

        best.map(|(entry, _)| entry)
    }

    /// Distance budget scaled mildly by alias length
    fn fuzzy_threshold(&self, alias: &str) -> usize {
        if alias.chars().count() < self.settings.fuzzy_min_alias_len {
            1
        } else {
            self.settings.fuzzy_max_distance
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> EntityResolver {
        EntityResolver::new(GazetteerConfig::builtin(), ResolverSettings::default())
    }

    #[test]
    fn test_plain_alias_resolves_to_canonical() {
        let r = resolver();
        assert_eq!(r.resolve("main entrance").unwrap(), "Main Entrance");
        assert_eq!(r.resolve("i am at the food court").unwrap(), "Food Court");
    }

    #[test]
    fn test_longest_alias_wins() {
        let r = resolver();
        // Both "entrance" and "main entrance" are substrings; the longer wins
        assert_eq!(r.resolve("the main entrance").unwrap(), "Main Entrance");
    }

    #[test]
    fn test_numbered_family_requires_number() {
        let r = resolver();
        assert!(matches!(
            r.resolve("bathroom"),
            Err(ResolveError::MissingRequiredNumber { .. })
        ));
        assert_eq!(r.resolve("bathroom 2").unwrap(), "Bathroom 2");
        assert_eq!(r.resolve("bathroom two").unwrap(), "Bathroom 2");
    }

    #[test]
    fn test_number_window_is_bounded() {
        let r = resolver();
        // The digit sits well past the default 12-character window
        assert!(r
            .resolve("bathroom somewhere over on level 2")
            .is_err());
    }

    #[test]
    fn test_gate_pattern_short_circuits() {
        let r = resolver();
        assert_eq!(r.resolve("gate a5").unwrap(), "Gate A5");
        assert_eq!(r.resolve("a5").unwrap(), "Gate A5");
        assert_eq!(r.resolve("Gate B112").unwrap(), "Gate B112");
        // Wins even when a gazetteer alias is also present
        assert_eq!(r.resolve("the entrance near gate c3").unwrap(), "Gate C3");
    }

    #[test]
    fn test_gate_pattern_needs_word_boundaries() {
        let r = resolver();
        // "ab12" is not letter+digits at a word boundary
        assert!(r.resolve("ab12").is_err());
    }

    #[test]
    fn test_ordinal_prefix_equivalence() {
        let r = resolver();
        let spelled = r.resolve("second security checkpoint");
        let digit = r.resolve("2 security checkpoint");
        // Same outcome either way: the number precedes the alias, so the
        // suffix window finds nothing in both cases
        assert!(matches!(spelled, Err(ResolveError::MissingRequiredNumber { .. })));
        assert!(matches!(digit, Err(ResolveError::MissingRequiredNumber { .. })));

        // With the ordinal after the base both forms resolve identically
        assert_eq!(
            r.resolve("security checkpoint second").unwrap(),
            r.resolve("security checkpoint 2").unwrap()
        );
        assert_eq!(r.resolve("security checkpoint second").unwrap(), "Security Checkpoint 2");
    }

    #[test]
    fn test_fuzzy_one_typo_resolves() {
        let r = resolver();
        assert_eq!(r.resolve("the main entrence").unwrap(), "Main Entrance");
        assert_eq!(r.resolve("food cuort").unwrap(), "Food Court");
    }

    #[test]
    fn test_fuzzy_beyond_threshold_fails() {
        let r = resolver();
        assert!(matches!(
            r.resolve("fzzd cxurt"),
            Err(ResolveError::Unresolved { .. })
        ));
    }

    #[test]
    fn test_fuzzy_never_satisfies_numbered_family() {
        let r = resolver();
        // "bathrom 2" is one edit from the "bathroom" family, but numbered
        // families are excluded from fuzzy matching
        assert!(r.resolve("bathrom 2").is_err());
    }

    #[test]
    fn test_fuzzy_respects_word_boundaries() {
        let r = resolver();
        // "exiting" must not fuzzily reach any exit alias
        assert!(r.resolve("we are exiting now").is_err());
    }

    #[test]
    fn test_unresolved_reports_phrase() {
        let r = resolver();
        match r.resolve("the crystal fountain") {
            Err(ResolveError::Unresolved { phrase }) => {
                assert_eq!(phrase, "the crystal fountain");
            }
            other => panic!("expected Unresolved, got {:?}", other.map_err(|e| e.to_string())),
        }
    }
}
