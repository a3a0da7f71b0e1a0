//! Remaining-distance estimation over an active route

use thiserror::Error;

use wayfinder_core::{Node, NodeId};

/// Estimation failures; recovered by the orchestrator, never fatal
#[derive(Error, Debug)]
pub enum DistanceError {
    #[error("no active route")]
    NoActiveRoute,

    #[error("current location is not on the active route")]
    LocationNotOnPath,
}

/// Steps left on `path` from `current` to the end
///
/// Sums the Euclidean length of the remaining legs and converts to steps at
/// `step_length_m` metres per step, rounded to the nearest whole step.
/// Standing on the final node yields 0.
pub fn remaining_steps(
    path: &[Node],
    current: &NodeId,
    step_length_m: f64,
) -> Result<u32, DistanceError> {
    if path.is_empty() {
        return Err(DistanceError::NoActiveRoute);
    }

    let position = path
        .iter()
        .position(|node| &node.id == current)
        .ok_or(DistanceError::LocationNotOnPath)?;

    let metres: f64 = path[position..]
        .windows(2)
        .map(|pair| pair[0].distance_to(&pair[1]))
        .sum();

    let steps = (metres / step_length_m).round() as u32;
    tracing::debug!(%current, metres, steps, "remaining distance estimated");
    Ok(steps)
}
