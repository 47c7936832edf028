// src/main.rs
// Demo entry point: maps a simulated room while creeping forward under the proximity
// guard, prints the grid and records it to disk.
//
// Usage: robomap [config.yaml]

use log::{info, warn};
use robomap::core::SafetyState;
use robomap::driver::{Room, SimulatedRobot, shared};
use robomap::navigation::MotionController;
use robomap::{GridMapper, ProximityGuard, ProximityRing, RobomapConfig, WideScanner};
use std::error::Error;

// Limited for the demo
const CYCLES: usize = 12;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    info!("Starting robomap demo...");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading configuration from {}", path);
            RobomapConfig::from_yaml_file(&path)?
        }
        None => RobomapConfig::default(),
    };

    // Room slightly inside the grid so the far walls still land on cells
    let extent_x = config.grid.number_x as f64 * config.grid.cell_size * 0.9;
    let extent_y = config.grid.number_y as f64 * config.grid.cell_size * 0.9;
    let robot = SimulatedRobot::new()
        .with_room(Room::new(extent_x, extent_y))
        .with_pose(robomap::Pose::new(extent_x / 2.0, extent_y / 2.0, 0.0))
        .with_lidar(config.lidar);

    let driver = shared(robot);
    let controller = shared(MotionController::new(driver.clone()));
    if !controller.borrow_mut().connect() {
        return Err("robot refused the connection".into());
    }

    let scanner = WideScanner::with_calibration(driver.clone(), config.lidar);
    let mut mapper = GridMapper::from_config(&config.grid, controller.clone(), scanner);
    mapper.grid().log_info();
    let mut guard = ProximityGuard::from_config(&config.guard, controller.clone(), ProximityRing::new(driver.clone()));

    for cycle in 0..CYCLES {
        let update = mapper.update_map();
        info!("Cycle {}: {} cells marked", cycle, update.inserted);

        if guard.move_forward_safe() == SafetyState::Stopped {
            warn!("Path blocked, turning");
            controller.borrow_mut().turn_left();
        }
    }

    controller.borrow_mut().pose();
    controller.borrow().log_status();
    println!("{}", mapper.render());

    mapper.persist(&config.map_path)?;
    controller.borrow_mut().disconnect();

    info!("Robomap demo completed");
    Ok(())
}
