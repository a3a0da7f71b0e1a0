//! Scripted walkthrough of a small two-floor terminal
//!
//! Run with `cargo run -p wayfinder-agent --example terminal_walkthrough`.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use wayfinder_agent::{Orchestrator, SessionService};
use wayfinder_config::{load_settings, GazetteerConfig, Settings, TriggerConfig};
use wayfinder_core::{Edge, FacilityGraph, Node, NodeId, NodeType};

fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.logging.log_level.clone()));
    if settings.logging.log_json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn demo_graph() -> Result<FacilityGraph> {
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
        mk("check1", "Security Checkpoint 1", NodeType::Connection, 15.0, 0.0, 1),
        mk("bath1", "Bathroom 1", NodeType::Bathroom, 15.0, 8.0, 1),
        mk("food", "Food Court", NodeType::Waypoint, 30.0, 8.0, 1),
        mk("stairs1", "Stairs A", NodeType::StairsElevator, 30.0, 0.0, 1),
        mk("stairs2", "Stairs A Upper", NodeType::StairsElevator, 30.0, 0.0, 2),
        mk("gate_b7", "Gate B7", NodeType::Gate, 45.0, 0.0, 2),
        mk("exit2", "Second Floor Exit", NodeType::EmergencyExit, 45.0, 10.0, 2),
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
        edge("bath1", "food", false),
        edge("stairs1", "stairs2", true),
        edge("stairs2", "gate_b7", false),
        edge("gate_b7", "exit2", false),
    ];
    Ok(FacilityGraph::new(nodes, edges)?)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // config/default.yaml + WAYFINDER__-prefixed environment overrides
    let settings = load_settings(None)?;
    init_logging(&settings);

    let gazetteer = match &settings.gazetteer_path {
        Some(path) => GazetteerConfig::load(path)?,
        None => GazetteerConfig::builtin(),
    };
    let triggers = match &settings.triggers_path {
        Some(path) => TriggerConfig::load(path)?,
        None => TriggerConfig::builtin(),
    };

    let orchestrator = Orchestrator::new(demo_graph()?, gazetteer, triggers, settings)?;
    let handle = SessionService::spawn(orchestrator);

    handle.set_gate("Gate B7").await?;

    let script = [
        "hello there",
        "I am at the main entrance",
        "how do i get to my gate",
        "how far is it",
        "where is the bathroom",
        "take me to the food court",
        "i am at the food court",
        "I'm lost",
    ];
    for line in script {
        let reply = handle.utterance(line).await?;
        println!("you:   {line}");
        println!("agent: {}", reply.spoken);
        println!();
    }

    // A position fix mid-route triggers a replan.
    handle.utterance("take me to gate b7").await?;
    handle.update_location(NodeId::from("stairs2")).await?;
    let snapshot = handle.snapshot().await?;
    println!(
        "after position fix, route restarts at {} with {} nodes left",
        snapshot.active_path()[0].name,
        snapshot.active_path().len()
    );

    handle.shutdown().await?;
    Ok(())
}
