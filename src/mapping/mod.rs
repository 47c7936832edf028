// mapping/mod.rs

// Grid mapper: fuses one wide-field scan and one pose sample into the occupancy grid
// per update, and dumps/restores the grid as plain text. The mapper is the only owner
// of its grid; callers get read access only.
//
// Dump format: one line per Y row, cells as space-separated 0/1, newline terminated,
// no header. The reader tolerates ragged trailing whitespace.

// Dependencies
use log::{error, info, warn};
use nalgebra::{Rotation2, Vector2};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::{OccupancyGrid, Point, Pose};
use crate::driver::RobotDriver;
use crate::navigation::SharedController;
use crate::sensors::RangeSensor;
use crate::{GridConfig, Result, RobomapError};

/// Outcome of one fusion pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MapUpdate {
    /// Readings written into the grid
    pub inserted: usize,
    /// Readings skipped: not a valid distance, or left over from a scan that could
    /// not be refreshed
    pub skipped: usize,
    /// Readings whose projected point fell outside the grid
    pub out_of_bounds: usize,
}

/// World point hit by a reading of `distance` at `sensor_angle` (degrees, robot frame)
/// taken from `pose`.
pub fn project_reading(pose: &Pose, sensor_angle: f64, distance: f64) -> Point {
    let bearing = Rotation2::new((pose.heading + sensor_angle).to_radians());
    Point::from(pose.position().to_vector() + bearing * Vector2::new(distance, 0.0))
}

/// Builds and persists an occupancy grid from range scans and pose estimates.
pub struct GridMapper<D: RobotDriver, S: RangeSensor> {
    grid: OccupancyGrid,
    controller: SharedController<D>,
    sensor: S,
}

impl<D: RobotDriver, S: RangeSensor> GridMapper<D, S> {
    /// Creates a mapper with an empty `number_x × number_y` grid
    pub fn new(number_x: usize, number_y: usize, cell_size: f64, controller: SharedController<D>, sensor: S) -> Self {
        GridMapper {
            grid: OccupancyGrid::new(number_x, number_y, cell_size),
            controller,
            sensor,
        }
    }

    /// Creates a mapper sized from configuration
    pub fn from_config(config: &GridConfig, controller: SharedController<D>, sensor: S) -> Self {
        Self::new(config.number_x, config.number_y, config.cell_size, controller, sensor)
    }

    /// Read access to the grid
    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    /// The scan source
    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    /// Changes the scale used by later updates; occupied cells are not remapped
    pub fn set_cell_size(&mut self, cell_size: f64) {
        self.grid.set_cell_size(cell_size);
    }

    /// Forgets every occupied cell
    pub fn clear(&mut self) {
        self.grid.clear();
    }

    /// Fuses one scan into the grid.
    ///
    /// A sensor that cannot be refreshed is reported and the pass writes nothing: the
    /// snapshot it still holds was taken from another pose. Invalid readings and points
    /// outside the grid are counted and skipped; neither stops the pass.
    pub fn update_map(&mut self) -> MapUpdate {
        if let Err(e) = self.sensor.update() {
            warn!("{} update failed, skipping this scan: {}", self.sensor.sensor_type(), e);
            return MapUpdate {
                skipped: self.sensor.range_count(),
                ..MapUpdate::default()
            };
        }
        let pose = self.controller.borrow_mut().pose();

        let mut update = MapUpdate::default();
        for i in 0..self.sensor.range_count() {
            let distance = self.sensor.range(i);
            if !(distance > 0.0 && distance.is_finite()) {
                update.skipped += 1;
                continue;
            }

            let hit = project_reading(&pose, self.sensor.angle(i), distance);
            match self.grid.insert_point(hit) {
                Ok(_) => update.inserted += 1,
                Err(_) => update.out_of_bounds += 1,
            }
        }

        info!(
            "Map updated from pose ({:.3}, {:.3}, {:.1}): {} inserted, {} skipped, {} out of bounds",
            pose.x, pose.y, pose.heading, update.inserted, update.skipped, update.out_of_bounds
        );
        update
    }

    /// Text snapshot of the grid
    pub fn render(&self) -> String {
        self.grid.render()
    }

    /// Writes the grid to `path`, one line per Y row.
    ///
    /// Open, write and flush failures come back as distinct errors.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| {
            reported(RobomapError::PersistOpen { path: path.to_path_buf(), source })
        })?;

        let mut writer = BufWriter::new(file);
        for row in self.grid.rows() {
            let line: Vec<String> = row.iter().map(|c| c.to_string()).collect();
            writeln!(writer, "{}", line.join(" ")).map_err(|source| {
                reported(RobomapError::PersistWrite { path: path.to_path_buf(), source })
            })?;
        }

        let file = writer.into_inner().map_err(|e| {
            reported(RobomapError::PersistFlush { path: path.to_path_buf(), source: e.into_error() })
        })?;
        file.sync_all().map_err(|source| {
            reported(RobomapError::PersistFlush { path: path.to_path_buf(), source })
        })?;

        info!("Map successfully recorded to {}", path.display());
        Ok(())
    }

    /// Loads a dump written by [`persist`](Self::persist) into the grid.
    ///
    /// The file must hold exactly `number_y` rows of `number_x` cells. Nothing is
    /// written unless the whole file parses.
    pub fn restore(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let cells = parse_dump(&text, self.grid.number_x(), self.grid.number_y())?;

        for (iy, row) in cells.iter().enumerate() {
            for (ix, &value) in row.iter().enumerate() {
                self.grid.set_cell(ix, iy, value);
            }
        }
        info!("Map restored from {} ({} occupied cells)", path.display(), self.grid.occupied_count());
        Ok(())
    }
}

fn reported(err: RobomapError) -> RobomapError {
    error!("{}", err);
    err
}

fn parse_dump(text: &str, number_x: usize, number_y: usize) -> Result<Vec<Vec<u8>>> {
    let mut lines: Vec<&str> = text.lines().collect();
    while lines.len() > number_y && lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    if lines.len() != number_y {
        return Err(RobomapError::RowCountMismatch { expected: number_y, found: lines.len() });
    }

    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let row = line
                .split_whitespace()
                .map(|token| match token {
                    "0" => Ok(0),
                    "1" => Ok(1),
                    _ => Err(RobomapError::MapParse { line: i + 1, token: token.to_string() }),
                })
                .collect::<Result<Vec<u8>>>()?;
            if row.len() != number_x {
                return Err(RobomapError::ColumnCountMismatch { line: i + 1, expected: number_x, found: row.len() });
            }
            Ok(row)
        })
        .collect()
}
