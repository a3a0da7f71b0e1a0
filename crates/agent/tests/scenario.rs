//! End-to-end walkthroughs against the session service

use wayfinder_agent::{AgentError, Orchestrator, SessionService};
use wayfinder_config::{GazetteerConfig, Settings, TriggerConfig};
use wayfinder_core::{Action, Edge, FacilityGraph, Node, NodeId, NodeType};

fn terminal_graph() -> FacilityGraph {
    let mk = |id: &str, name: &str, t: NodeType, x: f64, y: f64, floor: i32| Node {
        id: NodeId::from(id),
        name: name.to_string(),
        node_type: t,
        x,
        y,
        floor,
    };
    let nodes = vec![
        mk("entrance", "Main Entrance", NodeType::Entrance, 0.0, 0.0, 1),
        mk("check1", "Security Checkpoint 1", NodeType::Connection, 12.0, 0.0, 1),
        mk("bath1", "Bathroom 1", NodeType::Bathroom, 12.0, 6.0, 1),
        mk("stairs1", "Stairs A", NodeType::StairsElevator, 24.0, 0.0, 1),
        mk("stairs2", "Stairs A Upper", NodeType::StairsElevator, 24.0, 0.0, 2),
        mk("gate_a5", "Gate A5", NodeType::Gate, 36.0, 0.0, 2),
        mk("desk", "Help Desk", NodeType::Waypoint, 90.0, 90.0, 1),
    ];
    let edge = |from: &str, to: &str, transition: bool| Edge {
        from: NodeId::from(from),
        to: NodeId::from(to),
        is_floor_transition: transition,
    };
    let edges = vec![
        edge("entrance", "check1", false),
        edge("check1", "bath1", false),
        edge("check1", "stairs1", false),
        edge("stairs1", "stairs2", true),
        edge("stairs2", "gate_a5", false),
    ];
    FacilityGraph::new(nodes, edges).unwrap()
}

fn orchestrator() -> Orchestrator {
    Orchestrator::new(
        terminal_graph(),
        GazetteerConfig::builtin(),
        TriggerConfig::builtin(),
        Settings::default(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_arrival_walkthrough() {
    let handle = SessionService::spawn(orchestrator());

    let reply = handle.utterance("I am at the main entrance").await.unwrap();
    assert!(reply.spoken.contains("Main Entrance"));

    let reply = handle
        .utterance("how do i get to security checkpoint 1")
        .await
        .unwrap();
    assert!(reply.spoken.contains("Security Checkpoint 1"));
    assert!(!reply.spoken.contains("floor change"));

    // 12 m at 0.75 m/step.
    let reply = handle.utterance("how far is it").await.unwrap();
    assert_eq!(reply.spoken, "About 16 steps left.");

    let reply = handle
        .utterance("i am at security checkpoint 1")
        .await
        .unwrap();
    assert!(reply.spoken.contains("arrived at Security Checkpoint 1"));

    // The position stream confirms the arrival and clears the route.
    handle.update_location(NodeId::from("check1")).await.unwrap();
    let snapshot = handle.snapshot().await.unwrap();
    assert!(!snapshot.has_active_path());
    assert_eq!(snapshot.current_node_id().unwrap().as_str(), "check1");
}

#[tokio::test]
async fn test_cross_floor_route_via_my_gate() {
    let handle = SessionService::spawn(orchestrator());
    handle.set_gate("Gate A5").await.unwrap();
    handle.utterance("I am at the main entrance").await.unwrap();

    let reply = handle.utterance("take me to my gate").await.unwrap();
    assert!(reply.spoken.contains("Gate A5"));
    assert!(reply.spoken.contains("floor change"));

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.destination_node_id().unwrap().as_str(), "gate_a5");
    assert_eq!(snapshot.active_path().len(), 5);
}

#[tokio::test]
async fn test_nearest_bathroom_walkthrough() {
    let handle = SessionService::spawn(orchestrator());
    handle.utterance("I am at the main entrance").await.unwrap();

    let reply = handle.utterance("where is the bathroom").await.unwrap();
    assert!(reply.spoken.contains("Bathroom 1"));
    assert!(matches!(reply.action, Action::Respond { .. }));
}

#[tokio::test]
async fn test_unreachable_goal_clears_destination() {
    let handle = SessionService::spawn(orchestrator());
    handle.utterance("I am at the main entrance").await.unwrap();
    handle.utterance("take me to gate a5").await.unwrap();

    let reply = handle.utterance("take me to the help desk").await.unwrap();
    assert!(reply.spoken.contains("could not find a route"));

    let snapshot = handle.snapshot().await.unwrap();
    assert!(snapshot.destination_node_id().is_none());
    assert!(!snapshot.has_active_path());
}

#[tokio::test]
async fn test_position_stream_replans_active_route() {
    let handle = SessionService::spawn(orchestrator());
    handle.utterance("I am at the main entrance").await.unwrap();
    handle.utterance("take me to gate a5").await.unwrap();

    handle
        .update_location(NodeId::from("stairs1"))
        .await
        .unwrap();

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.active_path()[0].id.as_str(), "stairs1");
    assert_eq!(snapshot.destination_node_id().unwrap().as_str(), "gate_a5");
}

#[tokio::test]
async fn test_latest_request_wins() {
    let handle = SessionService::spawn(orchestrator());
    handle.utterance("I am at the main entrance").await.unwrap();

    handle.utterance("take me to gate a5").await.unwrap();
    handle.utterance("take me to bathroom 1").await.unwrap();

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.destination_node_id().unwrap().as_str(), "bath1");
}

#[tokio::test]
async fn test_shutdown_closes_handle() {
    let handle = SessionService::spawn(orchestrator());
    handle.shutdown().await.unwrap();

    // The task drains already-queued commands and stops; eventually the
    // channel closes and sends fail.
    let mut closed = false;
    for _ in 0..50 {
        match handle.utterance("hello").await {
            Err(AgentError::SessionClosed) => {
                closed = true;
                break;
            }
            _ => tokio::time::sleep(std::time::Duration::from_millis(10)).await,
        }
    }
    assert!(closed);
}
