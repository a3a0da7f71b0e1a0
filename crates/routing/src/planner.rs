//! A* path planning
//!
//! Standard A* with `g` = accumulated Euclidean distance along traversed
//! edges and `h` = straight-line distance to the goal ignoring floor. The
//! heuristic is admissible because the graph only contains physically valid
//! adjacency: cross-floor movement exists solely through flagged transition
//! edges, which [`wayfinder_core::FacilityGraph`] enforces at load time, so
//! the planner never filters floors itself.
//!
//! Frontier ties on `f = g + h` break by heap insertion sequence, which
//! keeps expansion order deterministic.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use thiserror::Error;

use wayfinder_core::{FacilityGraph, Node, NodeId, NodeType};

/// Planning failures
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("unknown node id: {0}")]
    UnknownNode(NodeId),

    #[error("no route from {from} to {to}")]
    Unreachable { from: NodeId, to: NodeId },
}

/// Frontier entry ordered by f-score, then insertion sequence
struct FrontierEntry {
    f: f64,
    seq: u64,
    index: usize,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.seq == other.seq
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // f is finite for finite coordinates, so the fallback never fires
        self.f
            .partial_cmp(&other.f)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Minimum-cost node sequence from `start` to `goal`
///
/// Returns the full path including both endpoints; `find_path(x, x)` is the
/// single-element path `[x]`. Disconnected pairs produce
/// [`PlanError::Unreachable`], never a panic or a degenerate path.
pub fn find_path(
    graph: &FacilityGraph,
    start: &NodeId,
    goal: &NodeId,
) -> Result<Vec<Node>, PlanError> {
    let start_index = graph
        .index_of(start)
        .ok_or_else(|| PlanError::UnknownNode(start.clone()))?;
    let goal_index = graph
        .index_of(goal)
        .ok_or_else(|| PlanError::UnknownNode(goal.clone()))?;

    if start_index == goal_index {
        return Ok(vec![graph.node_by_index(start_index).clone()]);
    }

    let goal_node = graph.node_by_index(goal_index);
    let node_count = graph.len();

    let mut g_score = vec![f64::INFINITY; node_count];
    let mut came_from = vec![usize::MAX; node_count];
    let mut closed = vec![false; node_count];
    let mut open = BinaryHeap::new();
    let mut seq: u64 = 0;
    let mut expanded: u64 = 0;

    g_score[start_index] = 0.0;
    open.push(Reverse(FrontierEntry {
        f: graph.node_by_index(start_index).distance_to(goal_node),
        seq,
        index: start_index,
    }));

    while let Some(Reverse(entry)) = open.pop() {
        let current = entry.index;
        if closed[current] {
            continue;
        }
        closed[current] = true;
        expanded += 1;

        if current == goal_index {
            let path = reconstruct(graph, &came_from, start_index, goal_index);
            tracing::debug!(
                start = %start,
                goal = %goal,
                hops = path.len(),
                expanded,
                cost = g_score[goal_index],
                "route found"
            );
            return Ok(path);
        }

        let current_node = graph.node_by_index(current);
        for &neighbor in graph.neighbors(current) {
            if closed[neighbor] {
                continue;
            }
            let neighbor_node = graph.node_by_index(neighbor);
            let tentative = g_score[current] + current_node.distance_to(neighbor_node);
            if tentative < g_score[neighbor] {
                g_score[neighbor] = tentative;
                came_from[neighbor] = current;
                seq += 1;
                open.push(Reverse(FrontierEntry {
                    f: tentative + neighbor_node.distance_to(goal_node),
                    seq,
                    index: neighbor,
                }));
            }
        }
    }

    tracing::debug!(start = %start, goal = %goal, expanded, "goal unreachable");
    Err(PlanError::Unreachable {
        from: start.clone(),
        to: goal.clone(),
    })
}

fn reconstruct(
    graph: &FacilityGraph,
    came_from: &[usize],
    start_index: usize,
    goal_index: usize,
) -> Vec<Node> {
    let mut indices = vec![goal_index];
    let mut current = goal_index;
    while current != start_index {
        current = came_from[current];
        indices.push(current);
    }
    indices.reverse();
    indices
        .into_iter()
        .map(|i| graph.node_by_index(i).clone())
        .collect()
}

/// Closest node of a given type on the same floor as `source`
///
/// "Closest" is direct Euclidean distance, not route distance; the caller
/// runs the full planner against the returned node afterwards. Cross-floor
/// candidates are excluded by contract. A source that is itself of the
/// requested type is its own nearest match. Distance ties keep the first
/// node in graph order.
pub fn find_nearest_of_type<'a>(
    graph: &'a FacilityGraph,
    source: &Node,
    node_type: NodeType,
) -> Option<&'a Node> {
    let mut best: Option<(&Node, f64)> = None;
    for candidate in graph.nodes_of_type(node_type) {
        if candidate.floor != source.floor {
            continue;
        }
        let distance = source.distance_to(candidate);
        if best.map_or(true, |(_, b)| distance < b) {
            best = Some((candidate, distance));
        }
    }
    best.map(|(node, _)| node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder_core::{Edge, NodeType};

    fn node(id: &str, x: f64, y: f64, floor: i32, node_type: NodeType) -> Node {
        Node {
            id: NodeId::from(id),
            name: id.to_string(),
            node_type,
            x,
            y,
            floor,
        }
    }

    fn edge(from: &str, to: &str, transition: bool) -> Edge {
        Edge {
            from: NodeId::from(from),
            to: NodeId::from(to),
            is_floor_transition: transition,
        }
    }

    /// Two floors joined by one stair; floor 1 also has a detour loop
    fn two_floor_graph() -> FacilityGraph {
        FacilityGraph::new(
            vec![
                node("entrance", 0.0, 0.0, 1, NodeType::Entrance),
                node("hall", 10.0, 0.0, 1, NodeType::Waypoint),
                node("detour", 5.0, 8.0, 1, NodeType::Waypoint),
                node("stairs1", 20.0, 0.0, 1, NodeType::StairsElevator),
                node("stairs2", 20.0, 0.0, 2, NodeType::StairsElevator),
                node("gate_b7", 30.0, 0.0, 2, NodeType::Gate),
                node("island", 100.0, 100.0, 1, NodeType::Waypoint),
            ],
            vec![
                edge("entrance", "hall", false),
                edge("entrance", "detour", false),
                edge("detour", "hall", false),
                edge("hall", "stairs1", false),
                edge("stairs1", "stairs2", true),
                edge("stairs2", "gate_b7", false),
            ],
        )
        .unwrap()
    }

    fn path_length(path: &[Node]) -> f64 {
        path.windows(2).map(|w| w[0].distance_to(&w[1])).sum()
    }

    fn ids(path: &[Node]) -> Vec<&str> {
        path.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_shortest_path_skips_detour() {
        let graph = two_floor_graph();
        let path = find_path(&graph, &NodeId::from("entrance"), &NodeId::from("stairs1")).unwrap();
        assert_eq!(ids(&path), vec!["entrance", "hall", "stairs1"]);
    }

    #[test]
    fn test_round_trip_same_length() {
        let graph = two_floor_graph();
        let there = find_path(&graph, &NodeId::from("entrance"), &NodeId::from("stairs1")).unwrap();
        let back = find_path(&graph, &NodeId::from("stairs1"), &NodeId::from("entrance")).unwrap();
        assert!((path_length(&there) - path_length(&back)).abs() < 1e-9);
    }

    #[test]
    fn test_reverse_traversal_of_stored_direction() {
        let graph = two_floor_graph();
        // All edges are stored pointing away from the entrance; planning
        // toward it exercises the reverse adjacency
        let path = find_path(&graph, &NodeId::from("gate_b7"), &NodeId::from("entrance")).unwrap();
        assert_eq!(ids(&path), vec!["gate_b7", "stairs2", "stairs1", "hall", "entrance"]);
    }

    #[test]
    fn test_cross_floor_goes_through_transition() {
        let graph = two_floor_graph();
        let path = find_path(&graph, &NodeId::from("entrance"), &NodeId::from("gate_b7")).unwrap();
        assert_eq!(ids(&path), vec!["entrance", "hall", "stairs1", "stairs2", "gate_b7"]);

        // Every floor change along the path is a declared transition edge
        for pair in path.windows(2) {
            if pair[0].floor != pair[1].floor {
                let is_transition = graph.edges().iter().any(|e| {
                    e.is_floor_transition
                        && ((e.from == pair[0].id && e.to == pair[1].id)
                            || (e.from == pair[1].id && e.to == pair[0].id))
                });
                assert!(is_transition);
            }
        }
    }

    #[test]
    fn test_trivial_path_is_single_node() {
        let graph = two_floor_graph();
        let path = find_path(&graph, &NodeId::from("hall"), &NodeId::from("hall")).unwrap();
        assert_eq!(ids(&path), vec!["hall"]);
    }

    #[test]
    fn test_unreachable_is_error_not_panic() {
        let graph = two_floor_graph();
        let result = find_path(&graph, &NodeId::from("entrance"), &NodeId::from("island"));
        assert!(matches!(result, Err(PlanError::Unreachable { .. })));
    }

    #[test]
    fn test_unknown_node() {
        let graph = two_floor_graph();
        let result = find_path(&graph, &NodeId::from("entrance"), &NodeId::from("nowhere"));
        assert!(matches!(result, Err(PlanError::UnknownNode(_))));
    }

    #[test]
    fn test_nearest_of_type_same_floor_only() {
        let graph = FacilityGraph::new(
            vec![
                node("me", 0.0, 0.0, 1, NodeType::Waypoint),
                node("near_bathroom", 5.0, 0.0, 1, NodeType::Bathroom),
                node("far_bathroom", 50.0, 0.0, 1, NodeType::Bathroom),
                // Closer as the crow flies, but on another floor
                node("upstairs_bathroom", 1.0, 0.0, 2, NodeType::Bathroom),
            ],
            vec![],
        )
        .unwrap();

        let source = graph.node(&NodeId::from("me")).unwrap();
        let nearest = find_nearest_of_type(&graph, source, NodeType::Bathroom).unwrap();
        assert_eq!(nearest.id.as_str(), "near_bathroom");
    }

    #[test]
    fn test_nearest_of_type_none_on_floor() {
        let graph = FacilityGraph::new(
            vec![
                node("me", 0.0, 0.0, 1, NodeType::Waypoint),
                node("upstairs_exit", 1.0, 0.0, 2, NodeType::EmergencyExit),
            ],
            vec![],
        )
        .unwrap();

        let source = graph.node(&NodeId::from("me")).unwrap();
        assert!(find_nearest_of_type(&graph, source, NodeType::EmergencyExit).is_none());
    }

    #[test]
    fn test_nearest_of_type_source_matches_itself() {
        let graph = FacilityGraph::new(
            vec![
                node("exit_a", 0.0, 0.0, 1, NodeType::EmergencyExit),
                node("exit_b", 9.0, 0.0, 1, NodeType::EmergencyExit),
            ],
            vec![],
        )
        .unwrap();

        // Standing at an exit and asking for the nearest one is already
        // answered; the caller's planner call degenerates to [exit_a].
        let source = graph.node(&NodeId::from("exit_a")).unwrap();
        let nearest = find_nearest_of_type(&graph, source, NodeType::EmergencyExit).unwrap();
        assert_eq!(nearest.id.as_str(), "exit_a");
    }
}
