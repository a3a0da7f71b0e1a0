//! Utterance dispatch against the facility map and session
//!
//! The [`Orchestrator`] owns the immutable pieces (graph, classifier,
//! settings) and executes classified actions against a caller-provided
//! [`NavigationSession`]. Every call produces an [`AgentReply`]: the spoken
//! string plus the tagged action a downstream UI can render.

use wayfinder_config::{GazetteerConfig, Settings, TriggerConfig};
use wayfinder_core::{
    Action, ChangeSource, FacilityGraph, NavTarget, NavigationSession, Node, NodeId, NodeType,
};
use wayfinder_nlu::{EntityResolver, IntentClassifier};
use wayfinder_routing::{find_nearest_of_type, find_path, remaining_steps, DistanceError};

use crate::replies;
use crate::AgentError;

/// Spoken reply plus the structured action behind it
#[derive(Debug, Clone, PartialEq)]
pub struct AgentReply {
    pub spoken: String,
    pub action: Action,
}

impl AgentReply {
    fn respond(text: String) -> Self {
        Self {
            spoken: text.clone(),
            action: Action::Respond { text },
        }
    }

    fn clarify(question: String) -> Self {
        Self {
            spoken: question.clone(),
            action: Action::Clarify { question },
        }
    }
}

/// Stateless dispatcher; all mutable state lives in the session
pub struct Orchestrator {
    graph: FacilityGraph,
    classifier: IntentClassifier,
    settings: Settings,
}

impl Orchestrator {
    /// Build an orchestrator, validating every configuration table first
    pub fn new(
        graph: FacilityGraph,
        gazetteer: GazetteerConfig,
        triggers: TriggerConfig,
        settings: Settings,
    ) -> Result<Self, AgentError> {
        gazetteer.validate()?;
        triggers.validate()?;
        settings.validate()?;

        let resolver = EntityResolver::new(gazetteer, settings.resolver.clone());
        let classifier = IntentClassifier::new(triggers, resolver);
        tracing::info!(nodes = graph.len(), "orchestrator ready");
        Ok(Self {
            graph,
            classifier,
            settings,
        })
    }

    pub fn graph(&self) -> &FacilityGraph {
        &self.graph
    }

    /// Classify and execute one utterance
    pub fn handle_utterance(&self, session: &mut NavigationSession, text: &str) -> AgentReply {
        let action = self.classifier.classify(text, session);
        tracing::debug!(?action, "executing action");
        match action {
            Action::Navigate { target } => self.navigate(session, target),
            Action::UpdateLocation { target } => self.update_location(session, &target),
            Action::GetDistance => self.distance(session),
            Action::Localize => self.localize(session),
            Action::Clarify { question } => AgentReply::clarify(question),
            Action::Respond { text } => AgentReply::respond(text),
        }
    }

    /// Apply a position-stream fix
    ///
    /// Same consequences as a spoken "I am at ..." (arrival detection,
    /// replanning), attributed to [`ChangeSource::PositionStream`].
    pub fn apply_location_update(
        &self,
        session: &mut NavigationSession,
        node_id: &NodeId,
    ) -> AgentReply {
        match self.graph.node(node_id) {
            Some(node) => {
                let node = node.clone();
                self.set_location(session, &node, ChangeSource::PositionStream)
            }
            None => {
                tracing::warn!(%node_id, "position stream reported an unknown node");
                AgentReply::respond(replies::unknown_place(node_id.as_str()))
            }
        }
    }

    fn navigate(&self, session: &mut NavigationSession, target: NavTarget) -> AgentReply {
        let current_id = match session.current_node_id() {
            Some(id) => id.clone(),
            None => return AgentReply::clarify(replies::no_current_location()),
        };

        let goal = match &target {
            NavTarget::Named(name) => match self.graph.node_by_name(name) {
                Some(node) => node.clone(),
                None => return AgentReply::respond(replies::unknown_place(name)),
            },
            NavTarget::NearestBathroom => {
                match self.nearest(&current_id, NodeType::Bathroom) {
                    Some(node) => node,
                    None => return AgentReply::respond(replies::nearest_none("bathroom")),
                }
            }
            NavTarget::NearestExit => {
                match self.nearest(&current_id, NodeType::EmergencyExit) {
                    Some(node) => node,
                    None => return AgentReply::respond(replies::nearest_none("exit")),
                }
            }
        };

        self.plan_and_install(session, &current_id, &goal, ChangeSource::Utterance)
    }

    fn update_location(&self, session: &mut NavigationSession, name: &str) -> AgentReply {
        match self.graph.node_by_name(name) {
            Some(node) => {
                let node = node.clone();
                self.set_location(session, &node, ChangeSource::Utterance)
            }
            None => AgentReply::respond(replies::unknown_place(name)),
        }
    }

    fn distance(&self, session: &mut NavigationSession) -> AgentReply {
        let current_id = match session.current_node_id() {
            Some(id) => id.clone(),
            None => return AgentReply::clarify(replies::no_current_location()),
        };

        match remaining_steps(
            session.active_path(),
            &current_id,
            self.settings.estimator.step_length_m,
        ) {
            Ok(steps) => AgentReply::respond(replies::remaining(steps)),
            Err(DistanceError::NoActiveRoute) => AgentReply::clarify(replies::ask_destination()),
            Err(DistanceError::LocationNotOnPath) => {
                // The user wandered off the route; replan from where they are.
                match session.destination_node_id().cloned() {
                    Some(destination) => self.replan(session, &current_id, &destination),
                    None => AgentReply::clarify(replies::ask_destination()),
                }
            }
        }
    }

    fn localize(&self, session: &NavigationSession) -> AgentReply {
        let located = session
            .current_node_id()
            .and_then(|id| self.graph.node(id));
        match located {
            Some(node) => AgentReply::respond(replies::located_at(&node.name, node.floor)),
            None => AgentReply::clarify(replies::no_current_location()),
        }
    }

    /// Record a position change, then reconcile it with the active route
    fn set_location(
        &self,
        session: &mut NavigationSession,
        node: &Node,
        source: ChangeSource,
    ) -> AgentReply {
        session.update_location(node.id.clone(), source);

        let destination = match session.destination_node_id().cloned() {
            Some(id) => id,
            None => return AgentReply::respond(replies::location_set(&node.name)),
        };

        if destination == node.id {
            session.clear_route(ChangeSource::System);
            return AgentReply::respond(replies::arrival(&node.name));
        }

        self.replan(session, &node.id, &destination)
    }

    /// Plan from scratch and install the route, speaking a full summary
    fn plan_and_install(
        &self,
        session: &mut NavigationSession,
        start: &NodeId,
        goal: &Node,
        source: ChangeSource,
    ) -> AgentReply {
        let path = match find_path(&self.graph, start, &goal.id) {
            Ok(path) => path,
            Err(err) => {
                tracing::warn!(%err, goal = %goal.name, "planning failed");
                session.clear_route(ChangeSource::System);
                return AgentReply::respond(replies::unreachable(&goal.name));
            }
        };

        if path.len() == 1 {
            session.clear_route(ChangeSource::System);
            return AgentReply::respond(replies::arrival(&goal.name));
        }

        let steps = self.steps_for(&path, start);
        let crosses_floors = path.windows(2).any(|pair| pair[0].floor != pair[1].floor);
        if let Err(err) = session.set_route(path, source) {
            tracing::warn!(%err, "freshly planned route rejected");
            return AgentReply::clarify(replies::no_current_location());
        }
        AgentReply::respond(replies::route_summary(&goal.name, steps, crosses_floors))
    }

    /// Replan an existing destination after the position moved off the route
    fn replan(
        &self,
        session: &mut NavigationSession,
        start: &NodeId,
        destination: &NodeId,
    ) -> AgentReply {
        let destination_name = self
            .graph
            .node(destination)
            .map(|node| node.name.clone())
            .unwrap_or_else(|| destination.as_str().to_string());

        let path = match find_path(&self.graph, start, destination) {
            Ok(path) => path,
            Err(err) => {
                tracing::warn!(%err, destination = %destination_name, "replanning failed");
                session.clear_route(ChangeSource::System);
                return AgentReply::respond(replies::unreachable(&destination_name));
            }
        };

        let steps = self.steps_for(&path, start);
        if let Err(err) = session.set_route(path, ChangeSource::System) {
            tracing::warn!(%err, "replanned route rejected");
            return AgentReply::clarify(replies::no_current_location());
        }
        AgentReply::respond(replies::replanned(&destination_name, steps))
    }

    fn nearest(&self, current_id: &NodeId, node_type: NodeType) -> Option<Node> {
        let source = self.graph.node(current_id)?;
        find_nearest_of_type(&self.graph, source, node_type).cloned()
    }

    fn steps_for(&self, path: &[Node], start: &NodeId) -> u32 {
        remaining_steps(path, start, self.settings.estimator.step_length_m).unwrap_or(0)
    }
}
