// src/navigation/guard.rs
// Proximity guard: one look at the short-range ring before each forward/backward
// request. A clear ring lets the command through and records MOVING, anything closer
// than the safety threshold keeps the robot where it is and records STOPPED.
//
// The check and the command are not atomic. An obstacle that shows up between the
// two is not caught, and the guard does not keep polling once the robot moves.

use log::warn;

use crate::core::SafetyState;
use crate::driver::RobotDriver;
use crate::navigation::{MotionController, SharedController};
use crate::sensors::RangeSensor;
use crate::GuardConfig;

/// Reference safety distance (world units)
pub const DEFAULT_SAFETY_THRESHOLD: f64 = 0.5;

/// Safety-gated motion on top of a [`MotionController`].
pub struct ProximityGuard<D: RobotDriver, S: RangeSensor> {
    controller: SharedController<D>,
    sensor: S,
    threshold: f64,
    state: SafetyState,
}

impl<D: RobotDriver, S: RangeSensor> ProximityGuard<D, S> {
    /// Guard with the reference threshold of 0.5
    pub fn new(controller: SharedController<D>, sensor: S) -> Self {
        Self::with_threshold(controller, sensor, DEFAULT_SAFETY_THRESHOLD)
    }

    /// Guard with the threshold taken from configuration
    pub fn from_config(config: &GuardConfig, controller: SharedController<D>, sensor: S) -> Self {
        Self::with_threshold(controller, sensor, config.safety_threshold)
    }

    /// Guard with an explicit threshold
    pub fn with_threshold(controller: SharedController<D>, sensor: S, threshold: f64) -> Self {
        ProximityGuard {
            controller,
            sensor,
            threshold,
            state: SafetyState::Stopped,
        }
    }

    /// Safety distance in use
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Last authorization decision
    pub fn state(&self) -> SafetyState {
        self.state
    }

    /// Refreshes the ring and reports whether any slot reads closer than the threshold.
    ///
    /// If the ring cannot be refreshed, the previous readings are checked instead.
    pub fn is_obstacle_ahead(&mut self) -> bool {
        if let Err(e) = self.sensor.update() {
            warn!("{} update failed, checking previous readings: {}", self.sensor.sensor_type(), e);
        }

        for slot in 0..self.sensor.range_count() {
            let distance = self.sensor.range(slot);
            if distance <= 0.0 {
                continue; // no valid reading in this slot
            }
            if distance < self.threshold {
                warn!("Obstacle detected at sensor {} with distance {:.3}", slot, distance);
                return true;
            }
        }
        false
    }

    /// Moves forward if the ring is clear
    pub fn move_forward_safe(&mut self) -> SafetyState {
        self.guarded(|controller| controller.move_forward())
    }

    /// Moves backward if the ring is clear
    pub fn move_backward_safe(&mut self) -> SafetyState {
        self.guarded(|controller| controller.move_backward())
    }

    fn guarded<F>(&mut self, command: F) -> SafetyState
    where
        F: FnOnce(&mut MotionController<D>) -> bool,
    {
        if !self.controller.borrow().is_connected() {
            warn!("Robot not connected, motion not authorized");
            self.state = SafetyState::Stopped;
            return self.state;
        }

        if self.is_obstacle_ahead() {
            self.state = SafetyState::Stopped;
            return self.state;
        }

        let mut controller = self.controller.borrow_mut();
        self.state = if command(&mut *controller) {
            SafetyState::Moving
        } else {
            SafetyState::Stopped
        };
        self.state
    }
}
