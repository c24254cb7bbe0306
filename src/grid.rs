use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::input::Direction;

/// Grid position in logical tile coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring cell one step in `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Manhattan distance between two cells.
    #[must_use]
    pub fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Returns true when the cell lies inside a `tile_count` square grid.
    #[must_use]
    pub fn is_within(self, tile_count: u16) -> bool {
        let upper = i32::from(tile_count);
        self.x >= 0 && self.y >= 0 && self.x < upper && self.y < upper
    }

    /// Pulls each coordinate down to `tile_count - 1`.
    #[must_use]
    pub fn clamped(self, tile_count: u16) -> Self {
        let max = i32::from(tile_count) - 1;
        Self {
            x: self.x.min(max),
            y: self.y.min(max),
        }
    }
}

/// Grid dimensions plus the permanent wall cells.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GridState {
    tile_count: u16,
    growth_step: u16,
    canvas_size: u32,
    cell_pixel_size: u32,
    walls: BTreeSet<Cell>,
}

impl GridState {
    #[must_use]
    pub fn new(tile_count: u16, growth_step: u16, canvas_size: u32) -> Self {
        Self {
            tile_count,
            growth_step,
            canvas_size,
            cell_pixel_size: pixel_size(canvas_size, tile_count),
            walls: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn tile_count(&self) -> u16 {
        self.tile_count
    }

    /// Side length of one tile when the whole grid is drawn on the canvas.
    #[must_use]
    pub fn cell_pixel_size(&self) -> u32 {
        self.cell_pixel_size
    }

    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.is_within(self.tile_count)
    }

    #[must_use]
    pub fn center(&self) -> Cell {
        let mid = i32::from(self.tile_count / 2);
        Cell::new(mid, mid)
    }

    #[must_use]
    pub fn is_wall(&self, cell: Cell) -> bool {
        self.walls.contains(&cell)
    }

    #[must_use]
    pub fn walls(&self) -> &BTreeSet<Cell> {
        &self.walls
    }

    /// Turns `cells` into permanent walls and returns how many were new.
    ///
    /// Cells already walled are skipped, and cells outside the grid are
    /// dropped so the wall set never leaves `[0, tile_count)`.
    pub fn add_walls<'a>(&mut self, cells: impl IntoIterator<Item = &'a Cell>) -> usize {
        let mut added = 0;
        for cell in cells {
            if self.contains(*cell) && self.walls.insert(*cell) {
                added += 1;
            }
        }
        added
    }

    /// Grows the grid by one step, keeping the rendered extent constant.
    ///
    /// Walls are clamped into the new bounds. Callers clamp any other cells
    /// they track against the new [`tile_count`](Self::tile_count).
    pub fn resize(&mut self) {
        self.tile_count = self.tile_count.saturating_add(self.growth_step);
        self.cell_pixel_size = pixel_size(self.canvas_size, self.tile_count);

        let tile_count = self.tile_count;
        self.walls = std::mem::take(&mut self.walls)
            .into_iter()
            .map(|wall| wall.clamped(tile_count))
            .collect();
    }
}

fn pixel_size(canvas_size: u32, tile_count: u16) -> u32 {
    canvas_size / u32::from(tile_count.max(1))
}
