//! Simulated robot for the demo binary and tests
//!
//! Drives a point robot around an empty rectangular room. Range readings are raycast
//! against the room walls unless a test injects readings directly. Every command the
//! robot receives is appended to a log so callers can check what was (or was not)
//! issued.

use log::debug;

use super::{Direction, PROXIMITY_SLOTS, RobotDriver};
use crate::core::{Point, Pose};
use crate::sensors::ring::slot_angle;
use crate::{LidarConfig, Result, RobomapError};

/// Readings past this distance come back as "no return" (0.0) from the wide scanner
pub const DEFAULT_LIDAR_MAX_RANGE: f64 = 8.0;
/// The proximity ring saturates at this distance
pub const DEFAULT_PROXIMITY_MAX_RANGE: f64 = 1.0;

/// Command received by the simulated robot
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DriverCommand {
    /// `connect()` was called
    Connect,
    /// `disconnect()` was called
    Disconnect,
    /// `move_in()` was called
    Move(Direction),
    /// `rotate()` was called
    Rotate(Direction),
    /// `stop()` was called
    Stop,
}

/// Axis-aligned empty room spanning `[0, width] × [0, height]`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Room {
    /// Extent along X
    pub width: f64,
    /// Extent along Y
    pub height: f64,
}

impl Room {
    /// Creates a room of the given extent
    pub fn new(width: f64, height: f64) -> Self {
        Room { width, height }
    }

    /// Distance from `origin` to the nearest wall along `bearing` (degrees), or `None`
    /// when the origin lies outside the room.
    pub fn raycast(&self, origin: Point, bearing: f64) -> Option<f64> {
        if origin.x < 0.0 || origin.y < 0.0 || origin.x > self.width || origin.y > self.height {
            return None;
        }

        let (s, c) = bearing.to_radians().sin_cos();
        let mut hits = Vec::with_capacity(2);
        if c > f64::EPSILON {
            hits.push((self.width - origin.x) / c);
        } else if c < -f64::EPSILON {
            hits.push(-origin.x / c);
        }
        if s > f64::EPSILON {
            hits.push((self.height - origin.y) / s);
        } else if s < -f64::EPSILON {
            hits.push(-origin.y / s);
        }

        hits.into_iter().fold(None, |best: Option<f64>, t| Some(best.map_or(t, |b| b.min(t))))
    }
}

/// In-process stand-in for the robot driver.
#[derive(Clone, Debug)]
pub struct SimulatedRobot {
    connected: bool,
    refuse_connect: bool,
    pose: Pose,
    room: Option<Room>,
    lidar: LidarConfig,
    beam_count: usize,
    lidar_max_range: f64,
    proximity_max_range: f64,
    injected_proximity: Option<[f64; PROXIMITY_SLOTS]>,
    injected_scan: Option<Vec<f32>>,
    step: f64,
    turn: f64,
    commands: Vec<DriverCommand>,
}

impl Default for SimulatedRobot {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedRobot {
    /// Robot at the origin with no room and no injected readings
    pub fn new() -> Self {
        let lidar = LidarConfig::default();
        SimulatedRobot {
            connected: false,
            refuse_connect: false,
            pose: Pose::default(),
            room: None,
            beam_count: lidar.beam_count(),
            lidar,
            lidar_max_range: DEFAULT_LIDAR_MAX_RANGE,
            proximity_max_range: DEFAULT_PROXIMITY_MAX_RANGE,
            injected_proximity: None,
            injected_scan: None,
            step: 0.25,
            turn: 15.0,
            commands: Vec::new(),
        }
    }

    /// Places the robot inside `room`; readings are raycast against its walls
    pub fn with_room(mut self, room: Room) -> Self {
        self.room = Some(room);
        self
    }

    /// Sets the starting pose
    pub fn with_pose(mut self, pose: Pose) -> Self {
        self.pose = pose;
        self
    }

    /// Uses the given scanner calibration for raycast readings
    pub fn with_lidar(mut self, lidar: LidarConfig) -> Self {
        self.beam_count = lidar.beam_count();
        self.lidar = lidar;
        self
    }

    /// Makes every later `connect()` fail
    pub fn refusing_connections(mut self) -> Self {
        self.refuse_connect = true;
        self
    }

    /// Distance covered by one move command and angle covered by one rotate command
    pub fn with_motion_steps(mut self, step: f64, turn_degrees: f64) -> Self {
        self.step = step;
        self.turn = turn_degrees;
        self
    }

    /// Teleports the robot
    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    /// Overrides all nine proximity readings
    pub fn set_proximity(&mut self, readings: [f64; PROXIMITY_SLOTS]) {
        self.injected_proximity = Some(readings);
    }

    /// Overrides the wide-field scan; an empty vector simulates a scanner with no data
    pub fn set_wide_scan(&mut self, readings: Vec<f32>) {
        self.injected_scan = Some(readings);
    }

    /// Drops injected readings so the room raycast is used again
    pub fn clear_injected(&mut self) {
        self.injected_proximity = None;
        self.injected_scan = None;
    }

    /// Whether a session is open
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Commands received so far, oldest first
    pub fn commands(&self) -> &[DriverCommand] {
        &self.commands
    }

    /// Motion commands only (moves, rotations and stops)
    pub fn motion_commands(&self) -> Vec<DriverCommand> {
        self.commands
            .iter()
            .copied()
            .filter(|c| !matches!(c, DriverCommand::Connect | DriverCommand::Disconnect))
            .collect()
    }

    fn raycast_scan(&self, room: &Room) -> Vec<f32> {
        (0..self.beam_count)
            .map(|i| {
                let bearing = self.pose.heading + self.lidar.angle(i);
                match room.raycast(self.pose.position(), bearing) {
                    Some(d) if d <= self.lidar_max_range => d as f32,
                    _ => 0.0,
                }
            })
            .collect()
    }

    fn translate(&mut self, bearing: f64, distance: f64) {
        let (s, c) = bearing.to_radians().sin_cos();
        self.pose.x += distance * c;
        self.pose.y += distance * s;
    }
}

impl RobotDriver for SimulatedRobot {
    fn connect(&mut self) -> Result<()> {
        self.commands.push(DriverCommand::Connect);
        if self.refuse_connect {
            return Err(RobomapError::DriverFailure("simulated robot refused the connection".into()));
        }
        self.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) {
        self.commands.push(DriverCommand::Disconnect);
        self.connected = false;
    }

    fn move_in(&mut self, direction: Direction) {
        self.commands.push(DriverCommand::Move(direction));
        let heading = self.pose.heading;
        match direction {
            Direction::Forward => self.translate(heading, self.step),
            Direction::Backward => self.translate(heading, -self.step),
            Direction::Left => self.translate(heading + 90.0, self.step),
            Direction::Right => self.translate(heading - 90.0, self.step),
        }
        debug!("Simulated move {:?} -> {:?}", direction, self.pose);
    }

    fn rotate(&mut self, direction: Direction) {
        self.commands.push(DriverCommand::Rotate(direction));
        match direction {
            Direction::Left => self.pose.heading += self.turn,
            Direction::Right => self.pose.heading -= self.turn,
            Direction::Forward | Direction::Backward => {}
        }
    }

    fn stop(&mut self) {
        self.commands.push(DriverCommand::Stop);
    }

    fn pose(&self) -> Pose {
        self.pose
    }

    fn proximity_range(&self, slot: usize) -> f64 {
        if let Some(readings) = &self.injected_proximity {
            return readings.get(slot).copied().unwrap_or(self.proximity_max_range);
        }
        self.room
            .and_then(|room| room.raycast(self.pose.position(), self.pose.heading + slot_angle(slot)))
            .map_or(self.proximity_max_range, |d| d.min(self.proximity_max_range))
    }

    fn wide_scan_count(&self) -> usize {
        match (&self.injected_scan, &self.room) {
            (Some(scan), _) => scan.len(),
            (None, Some(_)) => self.beam_count,
            (None, None) => 0,
        }
    }

    fn read_wide_scan(&self, buffer: &mut [f32]) {
        let readings = match (&self.injected_scan, &self.room) {
            (Some(scan), _) => scan.clone(),
            (None, Some(room)) => self.raycast_scan(room),
            (None, None) => Vec::new(),
        };
        let n = buffer.len().min(readings.len());
        buffer[..n].copy_from_slice(&readings[..n]);
    }
}
