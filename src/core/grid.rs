// core/grid.rs

// Binary occupancy grid: a fixed number_x × number_y block of cells, each either free
// (0) or occupied (1), plus the scale that maps world units to cell indices.
// Storage is a single row-major Vec, row = Y index.

// Dependencies
use log::{info, warn};
use std::fmt;

use super::point::Point;
use crate::{Result, RobomapError};

/// Value of a free (or never observed) cell
pub const FREE: u8 = 0;
/// Value of an occupied cell
pub const OCCUPIED: u8 = 1;

/// Glyph used for free cells in the text rendering
pub const FREE_GLYPH: char = '.';
/// Glyph used for occupied cells in the text rendering
pub const OCCUPIED_GLYPH: char = 'x';

/// Fixed-size binary occupancy grid.
#[derive(Clone, Debug, PartialEq)]
pub struct OccupancyGrid {
    number_x: usize,
    number_y: usize,
    cell_size: f64, // World units per cell
    cells: Vec<u8>,
}

impl OccupancyGrid {
    /// Allocates a zero-filled grid. Zero-sized grids are allowed and simply hold no
    /// cells.
    ///
    /// # Panics
    ///
    /// Panics if `number_x * number_y` overflows `usize`.
    pub fn new(number_x: usize, number_y: usize, cell_size: f64) -> Self {
        let count = number_x
            .checked_mul(number_y)
            .unwrap_or_else(|| panic!("{number_x} x {number_y} grid does not fit in memory"));
        OccupancyGrid {
            number_x,
            number_y,
            cell_size,
            cells: vec![FREE; count],
        }
    }

    /// Number of cells along X
    pub fn number_x(&self) -> usize {
        self.number_x
    }

    /// Number of cells along Y
    pub fn number_y(&self) -> usize {
        self.number_y
    }

    /// World units covered by one cell
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        self.number_x * self.number_y
    }

    /// Number of cells currently marked occupied
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == OCCUPIED).count()
    }

    /// Changes the scale used by later inserts.
    ///
    /// Cells that are already occupied keep their indices, so they now stand for a
    /// different physical footprint. Nothing is remapped.
    pub fn set_cell_size(&mut self, cell_size: f64) {
        self.cell_size = cell_size;
    }

    /// Cell index for a world point, or `None` when it falls outside the grid.
    pub fn world_to_grid(&self, p: Point) -> Option<(usize, usize)> {
        let gx = (p.x / self.cell_size).floor();
        let gy = (p.y / self.cell_size).floor();

        // NaN and infinities fail these comparisons as well
        if gx >= 0.0 && gx < self.number_x as f64 && gy >= 0.0 && gy < self.number_y as f64 {
            Some((gx as usize, gy as usize))
        } else {
            None
        }
    }

    /// Marks the cell containing `p` as occupied.
    ///
    /// A point outside the grid is logged and rejected with
    /// [`RobomapError::OutOfBounds`]; the grid is left untouched.
    pub fn insert_point(&mut self, p: Point) -> Result<(usize, usize)> {
        match self.world_to_grid(p) {
            Some((ix, iy)) => {
                let i = self.flat_index(ix, iy);
                self.cells[i] = OCCUPIED;
                Ok((ix, iy))
            }
            None => {
                warn!("Point ({:.3}, {:.3}) is out of bounds", p.x, p.y);
                Err(RobomapError::OutOfBounds { x: p.x, y: p.y })
            }
        }
    }

    /// Reads a cell.
    ///
    /// # Panics
    ///
    /// Panics if `ix >= number_x` or `iy >= number_y`. Bounds are the caller's job here.
    pub fn get_cell(&self, ix: usize, iy: usize) -> u8 {
        self.cells[self.flat_index(ix, iy)]
    }

    /// Writes a cell; any non-zero value is stored as [`OCCUPIED`].
    ///
    /// # Panics
    ///
    /// Panics if `ix >= number_x` or `iy >= number_y`.
    pub fn set_cell(&mut self, ix: usize, iy: usize, value: u8) {
        let i = self.flat_index(ix, iy);
        self.cells[i] = if value == FREE { FREE } else { OCCUPIED };
    }

    /// Resets every cell to free
    pub fn clear(&mut self) {
        self.cells.fill(FREE);
    }

    /// Cells of each Y row, in row order
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let width = self.number_x;
        (0..self.number_y).map(move |iy| &self.cells[iy * width..(iy + 1) * width])
    }

    /// Text snapshot: one line per Y row, `.` for free and `x` for occupied.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Logs the grid dimensions and scale
    pub fn log_info(&self) {
        info!(
            "Grid: {} x {} cells, cell size {}, {} occupied",
            self.number_x,
            self.number_y,
            self.cell_size,
            self.occupied_count()
        );
    }

    fn flat_index(&self, ix: usize, iy: usize) -> usize {
        assert!(
            ix < self.number_x && iy < self.number_y,
            "cell ({ix}, {iy}) outside {} x {} grid",
            self.number_x,
            self.number_y
        );
        iy * self.number_x + ix
    }
}

impl fmt::Display for OccupancyGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.rows() {
            let line: Vec<String> = row.iter().map(|&c| glyph(c).to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

fn glyph(cell: u8) -> char {
    if cell == OCCUPIED { OCCUPIED_GLYPH } else { FREE_GLYPH }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn new_grid_is_zero_filled() {
        let grid = OccupancyGrid::new(4, 3, 0.5);
        assert_eq!(grid.cell_count(), 12);
        for ix in 0..4 {
            for iy in 0..3 {
                assert_eq!(grid.get_cell(ix, iy), FREE);
            }
        }
    }

    #[test]
    fn insert_marks_only_the_derived_cell() {
        let mut grid = OccupancyGrid::new(5, 5, 1.0);
        assert_eq!(grid.insert_point(Point::new(2.3, 4.9)).unwrap(), (2, 4));

        for ix in 0..5 {
            for iy in 0..5 {
                let expected = if (ix, iy) == (2, 4) { OCCUPIED } else { FREE };
                assert_eq!(grid.get_cell(ix, iy), expected, "cell ({ix}, {iy})");
            }
        }
    }

    #[rstest]
    #[case(Point::new(-0.1, 1.0))]
    #[case(Point::new(1.0, -0.001))]
    #[case(Point::new(5.0, 1.0))]
    #[case(Point::new(1.0, 5.0))]
    #[case(Point::new(f64::NAN, 1.0))]
    #[case(Point::new(1.0, f64::INFINITY))]
    fn out_of_bounds_insert_leaves_grid_unchanged(#[case] p: Point) {
        let mut grid = OccupancyGrid::new(5, 5, 1.0);
        grid.set_cell(0, 0, OCCUPIED);
        let before = grid.clone();

        let result = grid.insert_point(p);
        assert!(matches!(result, Err(RobomapError::OutOfBounds { .. })));
        assert_eq!(grid, before);
    }

    #[test]
    fn clear_resets_every_cell() {
        let mut grid = OccupancyGrid::new(3, 3, 1.0);
        grid.set_cell(0, 0, OCCUPIED);
        grid.set_cell(2, 1, OCCUPIED);
        grid.clear();
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn set_cell_normalises_to_binary() {
        let mut grid = OccupancyGrid::new(2, 2, 1.0);
        grid.set_cell(1, 1, 7);
        assert_eq!(grid.get_cell(1, 1), OCCUPIED);
    }

    #[test]
    fn cell_size_change_does_not_remap_existing_cells() {
        let mut grid = OccupancyGrid::new(10, 10, 1.0);
        grid.insert_point(Point::new(4.5, 4.5)).unwrap();
        grid.set_cell_size(2.0);

        assert_eq!(grid.get_cell(4, 4), OCCUPIED);
        assert_eq!(grid.insert_point(Point::new(4.5, 4.5)).unwrap(), (2, 2));
        assert_eq!(grid.occupied_count(), 2);
    }

    #[test]
    #[should_panic]
    fn direct_access_out_of_range_panics() {
        let grid = OccupancyGrid::new(2, 2, 1.0);
        grid.get_cell(2, 0);
    }

    #[test]
    #[should_panic(expected = "does not fit")]
    fn oversized_dimensions_panic() {
        OccupancyGrid::new(usize::MAX, 2, 1.0);
    }

    #[test]
    fn zero_size_grid_rejects_every_point() {
        let mut grid = OccupancyGrid::new(0, 0, 1.0);
        assert!(grid.insert_point(Point::new(0.0, 0.0)).is_err());
        assert_eq!(grid.render(), "");
        assert_eq!(grid.rows().count(), 0);
    }

    #[test]
    fn render_is_row_per_y_line() {
        let mut grid = OccupancyGrid::new(3, 2, 1.0);
        grid.insert_point(Point::new(2.0, 0.0)).unwrap();
        grid.insert_point(Point::new(0.5, 1.5)).unwrap();
        assert_eq!(grid.render(), ". . x\nx . .\n");
    }
}
