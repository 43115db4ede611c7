//! Grid representation and utilities for the cellular automaton

use crate::config::BoundaryCondition;
use thiserror::Error;

/// Value stored in a single cell. 0 is dead, anything above is alive
/// (in age mode the value is the remaining age).
pub type Cell = u32;

/// Side length of the world a simulator starts with when none is given
pub const DEFAULT_WORLD_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("coordinates ({x}, {y}) out of bounds for {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    #[error("grid cannot be empty")]
    Empty,
    #[error("row {row} has length {len}, expected {expected}")]
    RaggedRow { row: usize, len: usize, expected: usize },
}

/// Fixed-size 2D world of cell values, addressed by (x, y)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    cells: Vec<Cell>,
    pub boundary_condition: BoundaryCondition,
}

impl Grid {
    /// Create a new grid with every cell dead
    pub fn new(width: usize, height: usize, boundary_condition: BoundaryCondition) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width * height],
            boundary_condition,
        }
    }

    /// Square grid with dead edges
    pub fn square(side: usize) -> Self {
        Self::new(side, side, BoundaryCondition::Dead)
    }

    /// Create a grid from rows of cell values (`cells[y][x]`)
    pub fn from_cells(
        cells: Vec<Vec<Cell>>,
        boundary_condition: BoundaryCondition,
    ) -> Result<Self, GridError> {
        let height = cells.len();
        let width = cells.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(GridError::Empty);
        }

        for (row, values) in cells.iter().enumerate() {
            if values.len() != width {
                return Err(GridError::RaggedRow {
                    row,
                    len: values.len(),
                    expected: width,
                });
            }
        }

        Ok(Self {
            width,
            height,
            cells: cells.into_iter().flatten().collect(),
            boundary_condition,
        })
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    fn check_bounds(&self, x: usize, y: usize) -> Result<usize, GridError> {
        if x < self.width && y < self.height {
            Ok(self.index(x, y))
        } else {
            Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Get cell value at coordinates
    pub fn get(&self, x: usize, y: usize) -> Result<Cell, GridError> {
        self.check_bounds(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell value at coordinates
    pub fn set(&mut self, x: usize, y: usize, value: Cell) -> Result<(), GridError> {
        let idx = self.check_bounds(x, y)?;
        self.cells[idx] = value;
        Ok(())
    }

    /// Mark a cell as alive with value 1
    pub fn revive(&mut self, x: usize, y: usize) -> Result<(), GridError> {
        self.set(x, y, 1)
    }

    /// Values of the Moore neighborhood of (x, y).
    ///
    /// With [`BoundaryCondition::Dead`] neighbors outside the grid are absent, so
    /// edge cells yield 5 values and corners 3. The order is fixed: rows above to
    /// below, left to right within a row.
    pub fn neighbors(&self, x: usize, y: usize) -> Result<Vec<Cell>, GridError> {
        self.check_bounds(x, y)?;

        let mut values = Vec::with_capacity(8);
        for dy in [-1isize, 0, 1] {
            for dx in [-1isize, 0, 1] {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = x as isize + dx;
                let ny = y as isize + dy;
                if let Some((nx, ny)) = self.resolve(nx, ny) {
                    values.push(self.cells[self.index(nx, ny)]);
                }
            }
        }

        Ok(values)
    }

    /// Map a possibly out-of-range neighbor position onto the grid
    fn resolve(&self, x: isize, y: isize) -> Option<(usize, usize)> {
        let (w, h) = (self.width as isize, self.height as isize);
        match self.boundary_condition {
            BoundaryCondition::Dead => {
                if (0..w).contains(&x) && (0..h).contains(&y) {
                    Some((x as usize, y as usize))
                } else {
                    None
                }
            }
            BoundaryCondition::Wrap => Some((x.rem_euclid(w) as usize, y.rem_euclid(h) as usize)),
            BoundaryCondition::Mirror => {
                let mirror = |v: isize, len: isize| {
                    if v < 0 {
                        -v - 1
                    } else if v >= len {
                        len - 1 - (v - len)
                    } else {
                        v
                    }
                };
                let (mx, my) = (mirror(x, w), mirror(y, h));
                if (0..w).contains(&mx) && (0..h).contains(&my) {
                    Some((mx as usize, my as usize))
                } else {
                    None
                }
            }
        }
    }

    /// Coordinates of all living cells, row by row
    pub fn living_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, value)| **value > 0)
            .map(|(idx, _)| (idx % self.width, idx / self.width))
            .collect()
    }

    /// Count total living cells
    pub fn living_count(&self) -> usize {
        self.cells.iter().filter(|&&value| value > 0).count()
    }

    /// Check if the grid is empty (no living cells)
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&value| value == 0)
    }

    /// Highest value held by any cell
    pub fn max_value(&self) -> Cell {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Create a copy of the grid with different boundary conditions
    pub fn with_boundary_condition(&self, boundary_condition: BoundaryCondition) -> Self {
        Self {
            boundary_condition,
            ..self.clone()
        }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::square(DEFAULT_WORLD_SIZE)
    }
}
