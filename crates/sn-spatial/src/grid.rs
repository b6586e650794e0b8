//! Uniform tile grid with a blocked bitmap.
//!
//! # Coordinates
//!
//! Cell `(col, row)` covers the world rectangle
//!
//! ```text
//! origin + [col·cell_size, (col+1)·cell_size) × [row·cell_size, (row+1)·cell_size)
//! ```
//!
//! so columns grow with `+x` and rows grow with `+y`.  Cells outside the grid
//! are treated as blocked by every query.
//!
//! # As an occlusion source
//!
//! `TileGrid` implements [`Occlusion`] for the `WALLS` layer by walking the
//! cells a ray crosses (Amanatides–Woo traversal).  A scene with only tile
//! walls can therefore use the grid directly as its wall geometry.

use sn_core::{Hit, LayerMask, ObjectId, Occlusion, Vec2};

use crate::{SpatialError, SpatialResult};

// ── GridCell ──────────────────────────────────────────────────────────────────

/// Integer identity of one tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCell {
    pub col: i32,
    pub row: i32,
}

impl GridCell {
    #[inline]
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// `true` if `other` is one of the 8 cells surrounding `self`.
    pub fn is_adjacent(self, other: GridCell) -> bool {
        let dc = (self.col - other.col).abs();
        let dr = (self.row - other.row).abs();
        dc <= 1 && dr <= 1 && (dc, dr) != (0, 0)
    }
}

// ── TileGrid ──────────────────────────────────────────────────────────────────

/// Walkability map sampled from the host's wall layer.
///
/// Owned by the scene; pathfinding borrows it immutably.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileGrid {
    width: u32,
    height: u32,
    cell_size: f32,
    origin: Vec2,
    /// Row-major, `blocked[row * width + col]`.
    blocked: Vec<bool>,
}

impl TileGrid {
    /// Object reported by wall raycasts against the grid.
    pub const WALL_OBJECT: ObjectId = ObjectId(u32::MAX - 1);

    /// An all-walkable grid anchored at the world origin.
    pub fn new(width: u32, height: u32, cell_size: f32) -> SpatialResult<Self> {
        if width == 0 || height == 0 {
            return Err(SpatialError::EmptyGrid { width, height });
        }
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(SpatialError::InvalidCellSize(cell_size));
        }
        Ok(Self {
            width,
            height,
            cell_size,
            origin: Vec2::ZERO,
            blocked: vec![false; (width as usize) * (height as usize)],
        })
    }

    /// Move the grid's lower-left corner to `origin`.
    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    /// Sample `occlusion` at every cell centre: a cell is blocked iff its
    /// centre overlaps geometry on `mask`.
    pub fn from_occlusion<O: Occlusion + ?Sized>(
        width:     u32,
        height:    u32,
        cell_size: f32,
        origin:    Vec2,
        occlusion: &O,
        mask:      LayerMask,
    ) -> SpatialResult<Self> {
        let mut grid = Self::new(width, height, cell_size)?.with_origin(origin);
        for row in 0..height as i32 {
            for col in 0..width as i32 {
                let cell = GridCell::new(col, row);
                let centre = grid.cell_center(cell);
                grid.set_blocked(cell, occlusion.overlaps(centre, mask));
            }
        }
        Ok(grid)
    }

    /// Parse an ASCII tile map: `#` is a wall, `.` is floor, and any ASCII
    /// letter is a marker standing on floor.  Line `n` of the text is row `n`.
    ///
    /// Blank lines are skipped; every remaining line must have the same width.
    pub fn from_ascii(text: &str, cell_size: f32) -> SpatialResult<Self> {
        let lines: Vec<(usize, &str)> = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim_end()))
            .filter(|(_, l)| !l.is_empty())
            .collect();

        let height = lines.len() as u32;
        let width = lines.first().map(|(_, l)| l.chars().count()).unwrap_or(0);
        let mut grid = Self::new(width as u32, height, cell_size)?;

        for (row, (line_no, line)) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(SpatialError::RaggedMap { line: *line_no, expected: width, found });
            }
            for (col, ch) in line.chars().enumerate() {
                let blocked = match ch {
                    '#' => true,
                    '.' => false,
                    c if c.is_ascii_alphabetic() => false,
                    c => {
                        return Err(SpatialError::MalformedMap {
                            line: *line_no,
                            column: col + 1,
                            ch: c,
                        });
                    }
                };
                grid.set_blocked(GridCell::new(col as i32, row as i32), blocked);
            }
        }
        Ok(grid)
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn cell_count(&self) -> usize {
        self.blocked.len()
    }

    // ── World ↔ cell mapping ──────────────────────────────────────────────

    #[inline]
    pub fn in_bounds(&self, cell: GridCell) -> bool {
        cell.col >= 0
            && cell.row >= 0
            && (cell.col as u32) < self.width
            && (cell.row as u32) < self.height
    }

    /// Row-major index of `cell`, or `None` if out of bounds.
    #[inline]
    pub fn index(&self, cell: GridCell) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| cell.row as usize * self.width as usize + cell.col as usize)
    }

    #[inline]
    pub fn cell_at(&self, index: usize) -> GridCell {
        let w = self.width as usize;
        GridCell::new((index % w) as i32, (index / w) as i32)
    }

    /// The cell containing `p`, or `None` if `p` is outside the grid.
    pub fn world_to_cell(&self, p: Vec2) -> Option<GridCell> {
        if !p.is_finite() {
            return None;
        }
        let local = (p - self.origin) * (1.0 / self.cell_size);
        let cell = GridCell::new(local.x.floor() as i32, local.y.floor() as i32);
        self.in_bounds(cell).then_some(cell)
    }

    /// World-space centre of `cell` (defined for out-of-bounds cells too).
    pub fn cell_center(&self, cell: GridCell) -> Vec2 {
        self.origin
            + Vec2::new(
                (cell.col as f32 + 0.5) * self.cell_size,
                (cell.row as f32 + 0.5) * self.cell_size,
            )
    }

    // ── Walkability ───────────────────────────────────────────────────────

    /// `true` for in-bounds, unblocked cells.
    #[inline]
    pub fn is_walkable(&self, cell: GridCell) -> bool {
        self.index(cell).is_some_and(|i| !self.blocked[i])
    }

    pub fn is_walkable_at(&self, p: Vec2) -> bool {
        self.world_to_cell(p).is_some_and(|c| self.is_walkable(c))
    }

    /// Mark `cell` blocked or open.  Out-of-bounds cells are ignored.
    pub fn set_blocked(&mut self, cell: GridCell, blocked: bool) {
        if let Some(i) = self.index(cell) {
            self.blocked[i] = blocked;
        }
    }

    /// All walkable cells in row-major order.
    pub fn walkable_cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        self.blocked
            .iter()
            .enumerate()
            .filter(|(_, b)| !**b)
            .map(|(i, _)| self.cell_at(i))
    }
}

// ── Occlusion ─────────────────────────────────────────────────────────────────

impl Occlusion for TileGrid {
    fn raycast(
        &self,
        origin:       Vec2,
        direction:    Vec2,
        max_distance: f32,
        mask:         LayerMask,
    ) -> Option<Hit> {
        if !mask.contains(LayerMask::WALLS) {
            return None;
        }
        let dir = direction.normalized();
        let wall_hit = |distance: f32| Hit {
            point: origin + dir * distance,
            distance,
            object: Self::WALL_OBJECT,
        };

        let local = (origin - self.origin) * (1.0 / self.cell_size);
        let mut col = local.x.floor() as i32;
        let mut row = local.y.floor() as i32;
        if !self.is_walkable(GridCell::new(col, row)) {
            return Some(wall_hit(0.0));
        }

        if dir == Vec2::ZERO {
            return None;
        }

        // Distances (world units along the ray) to the next column / row
        // boundary, and between successive boundaries.
        let axis = |d: f32, pos: f32, cell: i32| -> (i32, f32, f32) {
            if d > 0.0 {
                (1, ((cell + 1) as f32 - pos) * self.cell_size / d, self.cell_size / d)
            } else if d < 0.0 {
                (-1, (cell as f32 - pos) * self.cell_size / d, -self.cell_size / d)
            } else {
                (0, f32::INFINITY, f32::INFINITY)
            }
        };
        let (step_c, mut next_c, delta_c) = axis(dir.x, local.x, col);
        let (step_r, mut next_r, delta_r) = axis(dir.y, local.y, row);

        loop {
            let t = if next_c < next_r {
                col += step_c;
                let t = next_c;
                next_c += delta_c;
                t
            } else {
                row += step_r;
                let t = next_r;
                next_r += delta_r;
                t
            };
            if t > max_distance {
                return None;
            }
            if !self.is_walkable(GridCell::new(col, row)) {
                return Some(wall_hit(t));
            }
        }
    }

    fn overlaps(&self, point: Vec2, mask: LayerMask) -> bool {
        mask.contains(LayerMask::WALLS) && !self.is_walkable_at(point)
    }
}
