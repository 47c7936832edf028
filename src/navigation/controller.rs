// src/navigation/controller.rs
// Pose and motion layer between the driver and the mapper/guard. Tracks whether the
// robot is connected and only forwards motion commands while it is.

use log::{debug, info, warn};

use crate::core::Pose;
use crate::driver::{Direction, RobotDriver, SharedDriver};

/// Motion controller: connection bookkeeping, motion commands, pose queries.
pub struct MotionController<D: RobotDriver> {
    driver: SharedDriver<D>,
    connected: bool,
    last_pose: Pose,
}

impl<D: RobotDriver> MotionController<D> {
    /// Creates a disconnected controller over `driver`
    pub fn new(driver: SharedDriver<D>) -> Self {
        MotionController {
            driver,
            connected: false,
            last_pose: Pose::default(),
        }
    }

    /// Opens the driver session. Returns the resulting connection status.
    pub fn connect(&mut self) -> bool {
        match self.driver.borrow_mut().connect() {
            Ok(()) => {
                self.connected = true;
                info!("Robot connected");
            }
            Err(e) => {
                self.connected = false;
                warn!("Robot connection failed: {}", e);
            }
        }
        self.connected
    }

    /// Closes the driver session. Returns the resulting connection status (always false).
    pub fn disconnect(&mut self) -> bool {
        if self.connected {
            self.driver.borrow_mut().disconnect();
            info!("Robot disconnected");
        }
        self.connected = false;
        self.connected
    }

    /// Current connection status
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Starts moving forward; false when offline
    pub fn move_forward(&mut self) -> bool {
        self.issue_move(Direction::Forward)
    }

    /// Starts moving backward; false when offline
    pub fn move_backward(&mut self) -> bool {
        self.issue_move(Direction::Backward)
    }

    /// Starts moving left; false when offline
    pub fn move_left(&mut self) -> bool {
        self.issue_move(Direction::Left)
    }

    /// Starts moving right; false when offline
    pub fn move_right(&mut self) -> bool {
        self.issue_move(Direction::Right)
    }

    /// Starts rotating counter-clockwise; false when offline
    pub fn turn_left(&mut self) -> bool {
        self.issue_rotate(Direction::Left)
    }

    /// Starts rotating clockwise; false when offline
    pub fn turn_right(&mut self) -> bool {
        self.issue_rotate(Direction::Right)
    }

    /// Stops the robot; false when offline
    pub fn stop(&mut self) -> bool {
        if !self.online("stop") {
            return false;
        }
        self.driver.borrow_mut().stop();
        true
    }

    /// Reads the pose estimate from the driver and caches it
    pub fn pose(&mut self) -> Pose {
        self.last_pose = self.driver.borrow().pose();
        self.last_pose
    }

    /// Pose returned by the last [`pose`](Self::pose) call
    pub fn last_pose(&self) -> Pose {
        self.last_pose
    }

    /// Logs connection status and the last known pose
    pub fn log_status(&self) {
        if self.connected {
            let p = self.last_pose;
            info!("Robot is connected, pose: x={:.3}, y={:.3}, heading={:.1}", p.x, p.y, p.heading);
        } else {
            info!("Robot is not connected");
        }
    }

    fn issue_move(&mut self, direction: Direction) -> bool {
        if !self.online("move") {
            return false;
        }
        debug!("Issuing move {:?}", direction);
        self.driver.borrow_mut().move_in(direction);
        true
    }

    fn issue_rotate(&mut self, direction: Direction) -> bool {
        if !self.online("rotate") {
            return false;
        }
        debug!("Issuing rotate {:?}", direction);
        self.driver.borrow_mut().rotate(direction);
        true
    }

    fn online(&self, command: &str) -> bool {
        if !self.connected {
            debug!("Ignoring {} command: robot not connected", command);
        }
        self.connected
    }
}
