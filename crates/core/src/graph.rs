//! Facility graph model
//!
//! Immutable node/edge representation of a multi-floor facility. Edges are
//! declared directed in the input (`from` -> `to`) but adjacency is indexed by
//! both endpoints at construction time, so every consumer sees the graph as
//! bidirectional. Edge weight is never stored; it is always the 2-D Euclidean
//! distance between the endpoints.
//!
//! Construction is the one place hard validation happens: duplicate ids,
//! dangling edge endpoints, and cross-floor edges without a transition flag
//! all fail fast before any session starts.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Unique node identifier, stable across the lifetime of a loaded graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Node categories in the facility map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Entrance,
    Gate,
    Bathroom,
    EmergencyExit,
    Waypoint,
    StairsElevator,
    Connection,
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NodeType::Entrance => "entrance",
            NodeType::Gate => "gate",
            NodeType::Bathroom => "bathroom",
            NodeType::EmergencyExit => "emergency exit",
            NodeType::Waypoint => "waypoint",
            NodeType::StairsElevator => "stairs/elevator",
            NodeType::Connection => "connection",
        };
        write!(f, "{}", name)
    }
}

/// A single location in the facility
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Canonical display/lookup name; the entity resolver's output contract
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub x: f64,
    pub y: f64,
    pub floor: i32,
}

impl Node {
    /// 2-D Euclidean distance, ignoring floor
    pub fn distance_to(&self, other: &Node) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Connection between two nodes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    /// Marks a stairs/elevator edge, the only legal way between floors
    #[serde(default)]
    pub is_floor_transition: bool,
}

/// Errors raised while building a facility graph
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("graph has no nodes")]
    EmptyGraph,

    #[error("duplicate node id: {0}")]
    DuplicateNodeId(NodeId),

    #[error("edge references unknown node: {0}")]
    UnknownEndpoint(NodeId),

    #[error("edge {from} -> {to} crosses floors without a transition flag")]
    IllegalFloorCrossing { from: NodeId, to: NodeId },
}

/// Immutable facility graph with symmetric adjacency
///
/// Nodes live in an arena `Vec` and are addressed by index internally; the
/// `NodeId` index exists only at the boundary.
#[derive(Debug, Clone)]
pub struct FacilityGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    /// node index -> indices of adjacent nodes, both edge directions included
    adjacency: Vec<Vec<usize>>,
    id_index: HashMap<NodeId, usize>,
}

impl FacilityGraph {
    /// Build a graph from pre-parsed nodes and edges, validating as we go
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, GraphError> {
        if nodes.is_empty() {
            return Err(GraphError::EmptyGraph);
        }

        let mut id_index = HashMap::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            if id_index.insert(node.id.clone(), index).is_some() {
                return Err(GraphError::DuplicateNodeId(node.id.clone()));
            }
        }

        let mut adjacency = vec![Vec::new(); nodes.len()];
        for edge in &edges {
            let from = *id_index
                .get(&edge.from)
                .ok_or_else(|| GraphError::UnknownEndpoint(edge.from.clone()))?;
            let to = *id_index
                .get(&edge.to)
                .ok_or_else(|| GraphError::UnknownEndpoint(edge.to.clone()))?;

            // Cross-floor "teleport" edges are rejected at load, so the
            // planner never has to filter floors itself.
            if nodes[from].floor != nodes[to].floor && !edge.is_floor_transition {
                return Err(GraphError::IllegalFloorCrossing {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                });
            }

            adjacency[from].push(to);
            adjacency[to].push(from);
        }

        tracing::info!(
            nodes = nodes.len(),
            edges = edges.len(),
            "facility graph loaded"
        );

        Ok(Self {
            nodes,
            edges,
            adjacency,
            id_index,
        })
    }

    /// Look up a node by id
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.id_index.get(id).map(|&index| &self.nodes[index])
    }

    /// Arena index for a node id
    pub fn index_of(&self, id: &NodeId) -> Option<usize> {
        self.id_index.get(id).copied()
    }

    /// Node at a given arena index
    ///
    /// Panics if `index` is out of bounds; indices only come from this graph.
    pub fn node_by_index(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    /// Adjacent node indices for the node at `index`
    pub fn neighbors(&self, index: usize) -> &[usize] {
        &self.adjacency[index]
    }

    /// Look up a node by canonical name, case-insensitively
    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name.eq_ignore_ascii_case(name))
    }

    /// All nodes of a given type
    pub fn nodes_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.node_type == node_type)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
