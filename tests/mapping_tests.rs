// tests/mapping_tests.rs
// Grid mapper against the simulated robot: scan fusion, persistence and restore.

use robomap::driver::{Room, SharedDriver, SimulatedRobot, shared};
use robomap::navigation::MotionController;
use robomap::sensors::WideScanner;
use robomap::{GridMapper, LidarConfig, Pose, RangeSensor, RobomapError};
use rstest::rstest;
use std::fs;

type Mapper = GridMapper<SimulatedRobot, WideScanner<SimulatedRobot>>;

// Every beam along the robot heading
const STRAIGHT_AHEAD: LidarConfig = LidarConfig { start_angle: 0.0, angle_increment: 0.0 };

fn mapper_over(robot: SimulatedRobot, lidar: LidarConfig, nx: usize, ny: usize, cell_size: f64) -> (SharedDriver<SimulatedRobot>, Mapper) {
    let driver = shared(robot);
    let controller = shared(MotionController::new(driver.clone()));
    let scanner = WideScanner::with_calibration(driver.clone(), lidar);
    (driver, GridMapper::new(nx, ny, cell_size, controller, scanner))
}

#[test]
fn reading_straight_ahead_marks_one_cell() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (driver, mut mapper) = mapper_over(SimulatedRobot::new(), STRAIGHT_AHEAD, 5, 5, 1.0);
    driver.borrow_mut().set_wide_scan(vec![2.0]);

    let update = mapper.update_map();

    assert_eq!(update.inserted, 1);
    assert_eq!(mapper.grid().get_cell(2, 0), 1);
    assert_eq!(mapper.grid().occupied_count(), 1);
}

#[test]
fn invalid_and_distant_readings_are_counted_not_fatal() {
    let (driver, mut mapper) = mapper_over(SimulatedRobot::new(), STRAIGHT_AHEAD, 5, 5, 1.0);
    driver.borrow_mut().set_wide_scan(vec![-1.0, 0.0, 100.0, 3.0]);

    let update = mapper.update_map();

    assert_eq!(update.skipped, 2);
    assert_eq!(update.out_of_bounds, 1);
    assert_eq!(update.inserted, 1);
    assert_eq!(mapper.grid().get_cell(3, 0), 1);
}

#[rstest]
#[case(Pose::new(1.0, 1.0, 90.0), (1, 3))]
#[case(Pose::new(4.0, 2.0, 180.0), (2, 2))]
#[case(Pose::new(2.5, 4.5, -90.0), (2, 2))]
fn readings_follow_robot_heading(#[case] pose: Pose, #[case] cell: (usize, usize)) {
    let robot = SimulatedRobot::new().with_pose(pose);
    let (driver, mut mapper) = mapper_over(robot, STRAIGHT_AHEAD, 5, 5, 1.0);
    driver.borrow_mut().set_wide_scan(vec![2.0]);

    mapper.update_map();

    assert_eq!(mapper.grid().get_cell(cell.0, cell.1), 1);
    assert_eq!(mapper.grid().occupied_count(), 1);
}

#[test]
fn room_scan_outlines_the_facing_walls() {
    let robot = SimulatedRobot::new()
        .with_room(Room::new(8.5, 8.5))
        .with_pose(Pose::new(4.25, 4.25, 0.0));
    let (_driver, mut mapper) = mapper_over(robot, LidarConfig::default(), 10, 10, 1.0);

    let update = mapper.update_map();

    assert_eq!(
        update.inserted + update.skipped + update.out_of_bounds,
        mapper.sensor().range_count()
    );
    assert!(update.inserted > 0);
    // Right wall straight ahead, top wall at the edge of the sweep
    assert_eq!(mapper.grid().get_cell(8, 4), 1);
    assert_eq!(mapper.grid().get_cell(4, 8), 1);
    // Robot cell and the space past the walls stay free
    assert_eq!(mapper.grid().get_cell(4, 4), 0);
    assert_eq!(mapper.grid().get_cell(9, 4), 0);
}

#[test]
fn unavailable_scanner_leaves_grid_untouched() {
    let (driver, mut mapper) = mapper_over(SimulatedRobot::new(), STRAIGHT_AHEAD, 5, 5, 1.0);
    driver.borrow_mut().set_wide_scan(vec![1.0]);
    mapper.update_map();
    let before = mapper.grid().clone();

    driver.borrow_mut().set_wide_scan(Vec::new());
    driver.borrow_mut().set_pose(Pose::new(3.0, 3.0, 90.0));
    let update = mapper.update_map();

    assert_eq!(update.inserted, 0);
    assert_eq!(update.out_of_bounds, 0);
    assert_eq!(update.skipped, 1);
    assert_eq!(mapper.grid(), &before);
    assert_eq!(mapper.grid().get_cell(3, 4), 0);
    // The adapter still holds the old snapshot
    assert_eq!(mapper.sensor().ranges(), &[1.0]);
}

#[test]
fn changing_cell_size_keeps_marked_cells() {
    let (driver, mut mapper) = mapper_over(SimulatedRobot::new(), STRAIGHT_AHEAD, 5, 5, 1.0);
    driver.borrow_mut().set_wide_scan(vec![2.0]);
    mapper.update_map();

    mapper.set_cell_size(0.5);
    mapper.update_map();

    assert_eq!(mapper.grid().get_cell(2, 0), 1);
    assert_eq!(mapper.grid().get_cell(4, 0), 1);
    assert_eq!(mapper.grid().occupied_count(), 2);
}

#[test]
fn persisted_map_has_one_line_per_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("map.txt");
    let (driver, mut mapper) = mapper_over(SimulatedRobot::new(), STRAIGHT_AHEAD, 4, 3, 1.0);
    driver.borrow_mut().set_wide_scan(vec![1.5]);
    mapper.update_map();

    mapper.persist(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text, "0 1 0 0\n0 0 0 0\n0 0 0 0\n");
    for line in text.lines() {
        assert_eq!(line.split_whitespace().count(), 4);
    }
}

#[test]
fn restore_reads_back_a_persisted_map() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("map.txt");
    let robot = SimulatedRobot::new()
        .with_room(Room::new(9.0, 9.0))
        .with_pose(Pose::new(3.0, 6.0, 30.0));
    let (_driver, mut mapper) = mapper_over(robot, LidarConfig::default(), 10, 10, 1.0);
    mapper.update_map();
    mapper.persist(&path).unwrap();

    let (_other, mut restored) = mapper_over(SimulatedRobot::new(), LidarConfig::default(), 10, 10, 1.0);
    restored.restore(&path).unwrap();

    assert_eq!(restored.grid(), mapper.grid());
    assert_eq!(restored.render(), mapper.render());
}

#[test]
fn restore_rejects_wrong_dimensions_and_keeps_grid() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("map.txt");
    fs::write(&path, "1 1 1\n1 1 1\n").unwrap();

    let (_driver, mut mapper) = mapper_over(SimulatedRobot::new(), STRAIGHT_AHEAD, 3, 3, 1.0);
    let err = mapper.restore(&path).unwrap_err();

    assert!(matches!(err, RobomapError::RowCountMismatch { expected: 3, found: 2 }));
    assert_eq!(mapper.grid().occupied_count(), 0);
}

#[test]
fn restore_of_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let (_driver, mut mapper) = mapper_over(SimulatedRobot::new(), STRAIGHT_AHEAD, 3, 3, 1.0);
    assert!(matches!(mapper.restore(dir.path().join("absent.txt")), Err(RobomapError::Io(_))));
}

#[test]
fn persist_into_missing_directory_is_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no_such_dir").join("map.txt");
    let (_driver, mapper) = mapper_over(SimulatedRobot::new(), STRAIGHT_AHEAD, 3, 3, 1.0);

    let err = mapper.persist(&path).unwrap_err();
    assert!(matches!(err, RobomapError::PersistOpen { .. }));
    assert!(!path.exists());
}

#[test]
fn clear_forgets_marked_cells() {
    let (driver, mut mapper) = mapper_over(SimulatedRobot::new(), STRAIGHT_AHEAD, 5, 5, 1.0);
    driver.borrow_mut().set_wide_scan(vec![1.0, 2.0, 3.0]);
    mapper.update_map();
    assert_eq!(mapper.grid().occupied_count(), 3);

    mapper.clear();
    assert_eq!(mapper.grid().occupied_count(), 0);
    assert_eq!(mapper.render(), ". . . . .\n".repeat(5));
}

#[cfg(target_os = "linux")]
#[test]
fn persist_reports_flush_failure() {
    let (_driver, mapper) = mapper_over(SimulatedRobot::new(), STRAIGHT_AHEAD, 3, 3, 1.0);

    // Rows fit in the write buffer, so the device only fails once it is flushed
    let err = mapper.persist("/dev/full").unwrap_err();
    assert!(matches!(err, RobomapError::PersistFlush { .. }), "got {err:?}");
}

#[cfg(target_os = "linux")]
#[test]
fn persist_reports_write_failure() {
    let (_driver, mapper) = mapper_over(SimulatedRobot::new(), STRAIGHT_AHEAD, 5000, 1, 1.0);

    // A single row longer than the write buffer goes straight to the device
    let err = mapper.persist("/dev/full").unwrap_err();
    assert!(matches!(err, RobomapError::PersistWrite { .. }), "got {err:?}");
}
