//! Orchestration layer for the wayfinder
//!
//! Binds the NLU pipeline, the route planner, and the navigation session
//! into the outside surface: text in, spoken reply plus tagged action out.
//! Also provides the single-writer [`service::SessionService`]
//! that serializes utterances and position-stream updates onto one
//! state-owning task.

pub mod orchestrator;
pub mod replies;
pub mod service;

pub use orchestrator::{AgentReply, Orchestrator};
pub use service::{SessionHandle, SessionService};

use thiserror::Error;

use wayfinder_config::ConfigError;
use wayfinder_core::GraphError;
use wayfinder_routing::PlanError;

/// Hard failures; everything user-recoverable becomes a Clarify/Respond
/// instead of surfacing here
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("planning error: {0}")]
    Plan(#[from] PlanError),

    #[error("session service is no longer running")]
    SessionClosed,
}
