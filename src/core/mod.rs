// core/mod.rs

// Value types and the occupancy grid shared by the mapper and the guard. Nothing in
// here talks to the driver.

pub mod grid;
pub mod point;
pub mod pose;
pub mod state;

// Re-export key types for a flat API
pub use grid::{FREE, OCCUPIED, OccupancyGrid};
pub use point::Point;
pub use pose::Pose;
pub use state::SafetyState;
