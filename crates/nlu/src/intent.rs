//! Intent classification over trigger tables
//!
//! Classifies an utterance into one of a fixed set of command categories by
//! trigger-phrase containment, in a fixed priority order, and produces the
//! tagged [`Action`] the dispatcher executes. Categories that carry a target
//! hand the text after the trigger to the [`EntityResolver`].
//!
//! Priority, first match wins:
//! lost -> distance -> navigation -> update-location -> confused -> fallback.
//! Within a category the longest contained trigger wins; equal-length ties
//! break by table order.

use wayfinder_config::TriggerConfig;
use wayfinder_core::{Action, NavTarget, NavigationSession};

use crate::normalize::normalize;
use crate::resolver::EntityResolver;

const HELP_TEXT: &str =
    "You can tell me where you are, ask me to take you somewhere, or ask how far is left.";
const ASK_DESTINATION: &str = "There is no active route yet. Where would you like to go?";
const ASK_WHERE_TO: &str = "Where would you like to go?";
const ASK_WHERE_NOW: &str = "Where are you right now?";
const ASK_GATE: &str = "I don't know your gate yet. Which gate are you flying from?";

/// Trigger-table classifier producing tagged actions
pub struct IntentClassifier {
    triggers: TriggerConfig,
    resolver: EntityResolver,
}

impl IntentClassifier {
    pub fn new(triggers: TriggerConfig, resolver: EntityResolver) -> Self {
        Self { triggers, resolver }
    }

    /// Classify one utterance against the current session state
    ///
    /// Never fails: anything unrecognized becomes a Clarify or the fixed
    /// help Respond.
    pub fn classify(&self, raw: &str, session: &NavigationSession) -> Action {
        let text = normalize(raw);

        if contains_any(&text, &self.triggers.lost) {
            tracing::debug!("classified as lost");
            return Action::Localize;
        }

        if contains_any(&text, &self.triggers.distance) {
            tracing::debug!(active_path = session.has_active_path(), "classified as distance");
            return if session.has_active_path() {
                Action::GetDistance
            } else {
                Action::Respond {
                    text: ASK_DESTINATION.to_string(),
                }
            };
        }

        if let Some((trigger, position)) = longest_trigger(&text, &self.triggers.navigation) {
            let tail = text[position + trigger.len()..].trim();
            tracing::debug!(trigger, tail, "classified as navigation");
            return self.navigation_action(tail, session);
        }

        if let Some((trigger, position)) = longest_trigger(&text, &self.triggers.update_location) {
            let tail = text[position + trigger.len()..].trim();
            tracing::debug!(trigger, tail, "classified as update-location");
            return self.update_location_action(tail, session);
        }

        if contains_any(&text, &self.triggers.confused) {
            tracing::debug!("classified as confused");
            return self.confused_action(session);
        }

        tracing::debug!("no trigger matched, falling back to help");
        Action::Respond {
            text: HELP_TEXT.to_string(),
        }
    }

    fn navigation_action(&self, tail: &str, session: &NavigationSession) -> Action {
        if tail.is_empty() {
            return Action::Clarify {
                question: ASK_WHERE_TO.to_string(),
            };
        }

        if contains_any(tail, &self.triggers.my_gate_phrases) {
            return match session.user_gate() {
                Some(gate) => Action::Navigate {
                    target: NavTarget::Named(gate.to_string()),
                },
                None => Action::Clarify {
                    question: ASK_GATE.to_string(),
                },
            };
        }

        match self.resolver.resolve(tail) {
            Ok(name) => Action::Navigate {
                target: NavTarget::Named(name),
            },
            Err(err) => {
                tracing::debug!(%err, tail, "target not resolved by name");
                // Bare family keywords mean "take me to the nearest one";
                // a numbered reference would have resolved by name above.
                if contains_any(tail, &self.triggers.bathroom_keywords) {
                    return Action::Navigate {
                        target: NavTarget::NearestBathroom,
                    };
                }
                if contains_any(tail, &self.triggers.exit_keywords) {
                    return Action::Navigate {
                        target: NavTarget::NearestExit,
                    };
                }
                Action::Clarify {
                    question: format!(
                        "I didn't recognize \"{}\". Could you name the place differently?",
                        tail
                    ),
                }
            }
        }
    }

    fn update_location_action(&self, tail: &str, session: &NavigationSession) -> Action {
        if tail.is_empty() {
            return Action::Clarify {
                question: ASK_WHERE_NOW.to_string(),
            };
        }

        match self.resolver.resolve(tail) {
            Ok(name) => {
                let arrived = session
                    .destination_node()
                    .map(|node| node.name.eq_ignore_ascii_case(&name))
                    .unwrap_or(false);
                if arrived {
                    // Reaching the destination is an announcement, not a
                    // state mutation.
                    Action::Respond {
                        text: format!("You have arrived at {}.", name),
                    }
                } else {
                    Action::UpdateLocation { target: name }
                }
            }
            Err(err) => {
                tracing::debug!(%err, tail, "location not resolved");
                Action::Clarify {
                    question: format!("I didn't recognize \"{}\". What is near you?", tail),
                }
            }
        }
    }

    fn confused_action(&self, session: &NavigationSession) -> Action {
        let text = if session.current_node_id().is_none() {
            "Tell me where you are first, for example \"I am at the main entrance\".".to_string()
        } else if let Some(gate) = session.user_gate() {
            format!("You could head to your gate. Say \"take me to {}\" when ready.", gate)
        } else {
            "You can ask me to take you somewhere, for example \"take me to the food court\"."
                .to_string()
        };
        Action::Respond { text }
    }
}

/// Does the text contain any of the phrases verbatim
fn contains_any(text: &str, phrases: &[String]) -> bool {
    phrases.iter().any(|p| text.contains(p.as_str()))
}

/// Longest phrase contained in the text, with its byte offset
///
/// Equal-length ties keep the earlier table entry.
fn longest_trigger<'a>(text: &str, phrases: &'a [String]) -> Option<(&'a str, usize)> {
    let mut best: Option<(&'a str, usize)> = None;
    for phrase in phrases {
        if let Some(position) = text.find(phrase.as_str()) {
            let longer = best.map_or(true, |(current, _)| {
                phrase.chars().count() > current.chars().count()
            });
            if longer {
                best = Some((phrase.as_str(), position));
            }
        }
    }
    best
}
