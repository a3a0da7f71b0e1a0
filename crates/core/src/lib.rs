//! Core types for the wayfinder system
//!
//! Holds the three things every other crate operates on:
//! - the immutable facility graph (nodes, edges, adjacency)
//! - the tagged [`Action`] values produced by intent classification
//! - the mutable per-user [`NavigationSession`] state
//!
//! This crate has no internal dependencies and performs no I/O.

pub mod action;
pub mod graph;
pub mod session;

pub use action::{Action, NavTarget};
pub use graph::{Edge, FacilityGraph, GraphError, Node, NodeId, NodeType};
pub use session::{ChangeSource, NavigationSession, SessionChange, SessionError};
