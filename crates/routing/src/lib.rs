//! Route planning for the wayfinder
//!
//! A* over the facility graph's symmetric adjacency, a nearest-of-type
//! helper for sentinel targets, and the remaining-distance estimator.
//! Everything here is pure, synchronous computation over an already-loaded
//! [`wayfinder_core::FacilityGraph`].

pub mod distance;
pub mod planner;

pub use distance::{remaining_steps, DistanceError};
pub use planner::{find_nearest_of_type, find_path, PlanError};
