//! Per-user navigation session state
//!
//! One `NavigationSession` exists per user session. Mutation happens only
//! through the transition methods below; each transition appends a
//! timestamped [`SessionChange`] so drift between the utterance stream and
//! the external position stream can be audited after the fact.
//!
//! The active path is stale the moment the current location changes without
//! a replan. The session does not enforce replanning itself; the
//! orchestrator owns that policy and never reads a stale path as
//! authoritative.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::graph::{Node, NodeId};

/// Which input stream caused a session mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeSource {
    /// Classified user utterance
    Utterance,
    /// External positioning stream
    PositionStream,
    /// Internal transition (arrival clearing, reset)
    System,
}

impl std::fmt::Display for ChangeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChangeSource::Utterance => "utterance",
            ChangeSource::PositionStream => "position_stream",
            ChangeSource::System => "system",
        };
        write!(f, "{}", name)
    }
}

/// One recorded session transition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionChange {
    pub timestamp: DateTime<Utc>,
    /// Which session field changed
    pub field: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub source: ChangeSource,
}

/// Errors from session transitions
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("route must start at the current location")]
    RouteStartMismatch,

    #[error("cannot set a route while the current location is unknown")]
    NoCurrentLocation,
}

/// Mutable navigation context for a single user session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationSession {
    pub session_id: Uuid,
    current_node_id: Option<NodeId>,
    destination_node_id: Option<NodeId>,
    /// Ordered route nodes; empty means no active route
    active_path: Vec<Node>,
    user_gate: Option<String>,
    history: Vec<SessionChange>,
}

impl NavigationSession {
    pub fn new() -> Self {
        let session_id = Uuid::new_v4();
        tracing::debug!(%session_id, "navigation session created");
        Self {
            session_id,
            current_node_id: None,
            destination_node_id: None,
            active_path: Vec::new(),
            user_gate: None,
            history: Vec::new(),
        }
    }

    pub fn current_node_id(&self) -> Option<&NodeId> {
        self.current_node_id.as_ref()
    }

    pub fn destination_node_id(&self) -> Option<&NodeId> {
        self.destination_node_id.as_ref()
    }

    pub fn active_path(&self) -> &[Node] {
        &self.active_path
    }

    pub fn has_active_path(&self) -> bool {
        !self.active_path.is_empty()
    }

    /// Final node of the active route, if any
    pub fn destination_node(&self) -> Option<&Node> {
        self.active_path.last()
    }

    pub fn user_gate(&self) -> Option<&str> {
        self.user_gate.as_deref()
    }

    pub fn history(&self) -> &[SessionChange] {
        &self.history
    }

    /// Record a new known position
    ///
    /// Any active path is left in place but is stale from this point on;
    /// the caller must replan before trusting it again.
    pub fn update_location(&mut self, node_id: NodeId, source: ChangeSource) {
        let old = self.current_node_id.replace(node_id);
        self.record(
            "current_node_id",
            old.map(|id| id.0),
            self.current_node_id.clone().map(|id| id.0),
            source,
        );
    }

    /// Install a freshly planned route
    ///
    /// The path must start at the current location; anything else would mean
    /// the plan is already stale.
    pub fn set_route(&mut self, path: Vec<Node>, source: ChangeSource) -> Result<(), SessionError> {
        let current = self
            .current_node_id
            .as_ref()
            .ok_or(SessionError::NoCurrentLocation)?;
        let first = path.first().ok_or(SessionError::RouteStartMismatch)?;
        if &first.id != current {
            return Err(SessionError::RouteStartMismatch);
        }

        let old_destination = self.destination_node_id.take();
        // set_route is only reachable with a non-empty path
        let destination = path.last().map(|n| n.id.clone());
        self.destination_node_id = destination;
        self.active_path = path;
        self.record(
            "destination_node_id",
            old_destination.map(|id| id.0),
            self.destination_node_id.clone().map(|id| id.0),
            source,
        );
        Ok(())
    }

    /// Drop the active route and destination
    pub fn clear_route(&mut self, source: ChangeSource) {
        let old_destination = self.destination_node_id.take();
        self.active_path.clear();
        self.record(
            "destination_node_id",
            old_destination.map(|id| id.0),
            None,
            source,
        );
    }

    pub fn set_user_gate(&mut self, gate: impl Into<String>, source: ChangeSource) {
        let old = self.user_gate.replace(gate.into());
        self.record("user_gate", old, self.user_gate.clone(), source);
    }

    /// Clear everything except the session id and history
    pub fn reset(&mut self) {
        let old_current = self.current_node_id.take();
        self.destination_node_id = None;
        self.active_path.clear();
        self.user_gate = None;
        self.record(
            "current_node_id",
            old_current.map(|id| id.0),
            None,
            ChangeSource::System,
        );
    }

    fn record(
        &mut self,
        field: &str,
        old_value: Option<String>,
        new_value: Option<String>,
        source: ChangeSource,
    ) {
        tracing::debug!(
            session_id = %self.session_id,
            field,
            old = old_value.as_deref().unwrap_or("-"),
            new = new_value.as_deref().unwrap_or("-"),
            %source,
            "session transition"
        );
        self.history.push(SessionChange {
            timestamp: Utc::now(),
            field: field.to_string(),
            old_value,
            new_value,
            source,
        });
    }
}

impl Default for NavigationSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeType;

    fn node(id: &str, name: &str, x: f64) -> Node {
        Node {
            id: NodeId::from(id),
            name: name.to_string(),
            node_type: NodeType::Waypoint,
            x,
            y: 0.0,
            floor: 1,
        }
    }

    #[test]
    fn test_update_location_records_history() {
        let mut session = NavigationSession::new();
        session.update_location(NodeId::from("n1"), ChangeSource::Utterance);
        session.update_location(NodeId::from("n2"), ChangeSource::PositionStream);

        assert_eq!(session.current_node_id().unwrap().as_str(), "n2");
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history()[1].old_value.as_deref(), Some("n1"));
        assert_eq!(session.history()[1].source, ChangeSource::PositionStream);
    }

    #[test]
    fn test_set_route_requires_current_location() {
        let mut session = NavigationSession::new();
        let result = session.set_route(vec![node("a", "A", 0.0)], ChangeSource::Utterance);
        assert!(matches!(result, Err(SessionError::NoCurrentLocation)));
    }

    #[test]
    fn test_set_route_must_start_at_current() {
        let mut session = NavigationSession::new();
        session.update_location(NodeId::from("a"), ChangeSource::Utterance);

        let wrong = session.set_route(
            vec![node("b", "B", 0.0), node("c", "C", 5.0)],
            ChangeSource::Utterance,
        );
        assert!(matches!(wrong, Err(SessionError::RouteStartMismatch)));

        session
            .set_route(
                vec![node("a", "A", 0.0), node("c", "C", 5.0)],
                ChangeSource::Utterance,
            )
            .unwrap();
        assert!(session.has_active_path());
        assert_eq!(session.destination_node_id().unwrap().as_str(), "c");
        assert_eq!(session.destination_node().unwrap().name, "C");
    }

    #[test]
    fn test_clear_route() {
        let mut session = NavigationSession::new();
        session.update_location(NodeId::from("a"), ChangeSource::Utterance);
        session
            .set_route(
                vec![node("a", "A", 0.0), node("b", "B", 5.0)],
                ChangeSource::Utterance,
            )
            .unwrap();

        session.clear_route(ChangeSource::System);
        assert!(!session.has_active_path());
        assert!(session.destination_node_id().is_none());
        // Current location survives a route clear
        assert_eq!(session.current_node_id().unwrap().as_str(), "a");
    }

    #[test]
    fn test_reset_keeps_identity() {
        let mut session = NavigationSession::new();
        let id = session.session_id;
        session.update_location(NodeId::from("a"), ChangeSource::Utterance);
        session.set_user_gate("Gate B7", ChangeSource::Utterance);

        session.reset();
        assert_eq!(session.session_id, id);
        assert!(session.current_node_id().is_none());
        assert!(session.user_gate().is_none());
    }
}
