//! Tagged actions handed to the external dispatcher
//!
//! The core's only output surface: one utterance in, one `Action` out. The
//! dispatcher (spoken feedback, map highlighting) lives outside this
//! workspace and branches on the variant.

use serde::{Deserialize, Serialize};

/// Where a navigation request should lead
///
/// Sentinel targets are explicit variants rather than magic strings, so
/// "named lookup failed" and "nearest-of-type requested" can never be
/// conflated downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum NavTarget {
    /// Canonical entity name resolved from the utterance
    Named(String),
    /// Nearest bathroom, resolved structurally by the planner
    NearestBathroom,
    /// Nearest emergency exit, resolved structurally by the planner
    NearestExit,
}

/// Classified user command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Route to a target from the current position
    Navigate { target: NavTarget },
    /// The user told us where they are
    UpdateLocation { target: String },
    /// How far is left on the active route
    GetDistance,
    /// The user is lost; describe where they are
    Localize,
    /// We need more information before we can act
    Clarify { question: String },
    /// Fixed informational reply, no state change
    Respond { text: String },
}
