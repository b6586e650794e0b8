//! Pathfinder trait and default A* implementation.
//!
//! # Pluggability
//!
//! Agent controllers call planning via the [`Pathfinder`] trait, so a host can
//! swap in a navmesh or flow-field planner without touching the controller.
//! The default [`AStarPathfinder`] searches the [`TileGrid`] directly.
//!
//! # Costs
//!
//! Costs are in **cells**: an axis step costs 1, a diagonal step √2.  The
//! heuristic is Manhattan distance with [`Connectivity::Four`] and octile
//! distance `(dx+dy) + (√2−2)·min(dx,dy)` with [`Connectivity::Eight`]; both
//! are exact on an open grid, so A* stays optimal.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use sn_core::Vec2;

use crate::{GridCell, TileGrid};

// ── Path ──────────────────────────────────────────────────────────────────────

/// World-space waypoints from the start cell (exclusive) to the goal cell
/// (inclusive).
///
/// Every waypoint is a cell centre and consecutive cells are grid-adjacent.
/// Walkability is only guaranteed at generation time; controllers re-plan
/// on a timer instead of trusting a path indefinitely.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    /// Centre of the start cell; the polyline begins here.
    start: Vec2,
    cells: Vec<GridCell>,
    waypoints: Vec<Vec2>,
}

impl Path {
    /// A path that goes nowhere (start and goal share a cell).
    pub fn empty(start: Vec2) -> Self {
        Self { start, cells: Vec::new(), waypoints: Vec::new() }
    }

    fn from_cells(grid: &TileGrid, start: GridCell, cells: Vec<GridCell>) -> Self {
        let waypoints = cells.iter().map(|&c| grid.cell_center(c)).collect();
        Self { start: grid.cell_center(start), cells, waypoints }
    }

    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Vec2> {
        self.waypoints.get(index).copied()
    }

    /// The goal waypoint.
    pub fn last(&self) -> Option<Vec2> {
        self.waypoints.last().copied()
    }

    /// Euclidean polyline length, including the first segment from the start
    /// cell centre.
    pub fn length(&self) -> f32 {
        let mut prev = self.start;
        let mut total = 0.0;
        for &w in &self.waypoints {
            total += prev.distance(w);
            prev = w;
        }
        total
    }
}

// ── Pathfinder trait ──────────────────────────────────────────────────────────

/// Grid neighbourhood used during search.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Connectivity {
    /// N, E, S, W.
    #[default]
    Four,
    /// Axis neighbours plus diagonals.  Diagonals never cut corners.
    Eight,
}

/// Pluggable path planner.
pub trait Pathfinder {
    /// Plan from the cell containing `start` to the cell containing `goal`.
    ///
    /// Returns `None` if either point is outside the grid or on a blocked
    /// cell, or if the goal is unreachable.  Start and goal in the same cell
    /// yield `Some` empty path.
    fn find_path(&self, grid: &TileGrid, start: Vec2, goal: Vec2) -> Option<Path>;
}

// ── AStarPathfinder ───────────────────────────────────────────────────────────

/// Textbook A* over the tile grid.
///
/// Stateless between calls; every invocation allocates its own cost tables.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AStarPathfinder {
    pub connectivity: Connectivity,
}

impl AStarPathfinder {
    pub fn new(connectivity: Connectivity) -> Self {
        Self { connectivity }
    }

    pub fn four() -> Self {
        Self::new(Connectivity::Four)
    }

    pub fn eight() -> Self {
        Self::new(Connectivity::Eight)
    }

    /// Cell-level search.  Returns the cells after `start` up to `goal`.
    pub fn search(&self, grid: &TileGrid, start: GridCell, goal: GridCell) -> Option<Vec<GridCell>> {
        let start_idx = grid.index(start)?;
        let goal_idx = grid.index(goal)?;
        if !grid.is_walkable(start) || !grid.is_walkable(goal) {
            return None;
        }
        if start_idx == goal_idx {
            return Some(Vec::new());
        }

        let n = grid.cell_count();
        // g[v] = best known cost to reach v.
        let mut g = vec![f32::INFINITY; n];
        let mut parent: Vec<Option<usize>> = vec![None; n];
        let mut closed = vec![false; n];

        let mut open = BinaryHeap::new();
        let mut seq: u64 = 0;

        g[start_idx] = 0.0;
        open.push(OpenNode { f: self.heuristic(start, goal), g: 0.0, idx: start_idx, seq });

        while let Some(node) = open.pop() {
            if node.idx == goal_idx {
                return Some(reconstruct(grid, &parent, goal_idx));
            }
            // Skip stale heap entries.
            if closed[node.idx] || node.g > g[node.idx] {
                continue;
            }
            closed[node.idx] = true;

            let cell = grid.cell_at(node.idx);
            for (next, step) in self.neighbours(grid, cell) {
                let Some(next_idx) = grid.index(next) else { continue };
                if closed[next_idx] {
                    continue;
                }
                let tentative = node.g + step;
                if tentative < g[next_idx] {
                    g[next_idx] = tentative;
                    parent[next_idx] = Some(node.idx);
                    seq += 1;
                    open.push(OpenNode {
                        f: tentative + self.heuristic(next, goal),
                        g: tentative,
                        idx: next_idx,
                        seq,
                    });
                }
            }
        }
        None
    }

    fn heuristic(&self, a: GridCell, b: GridCell) -> f32 {
        let dx = (a.col - b.col).abs() as f32;
        let dy = (a.row - b.row).abs() as f32;
        match self.connectivity {
            Connectivity::Four => dx + dy,
            Connectivity::Eight => (dx + dy) + (std::f32::consts::SQRT_2 - 2.0) * dx.min(dy),
        }
    }

    /// Walkable neighbours with their step cost, in fixed order for
    /// determinism: N, E, S, W, then NE, SE, SW, NW.
    fn neighbours(&self, grid: &TileGrid, c: GridCell) -> Vec<(GridCell, f32)> {
        const AXES: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
        const DIAGONALS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

        let mut out = Vec::with_capacity(8);
        for (dc, dr) in AXES {
            let n = GridCell::new(c.col + dc, c.row + dr);
            if grid.is_walkable(n) {
                out.push((n, 1.0));
            }
        }
        if self.connectivity == Connectivity::Eight {
            for (dc, dr) in DIAGONALS {
                let n = GridCell::new(c.col + dc, c.row + dr);
                let side_a = GridCell::new(c.col + dc, c.row);
                let side_b = GridCell::new(c.col, c.row + dr);
                if grid.is_walkable(n) && grid.is_walkable(side_a) && grid.is_walkable(side_b) {
                    out.push((n, std::f32::consts::SQRT_2));
                }
            }
        }
        out
    }
}

impl Pathfinder for AStarPathfinder {
    fn find_path(&self, grid: &TileGrid, start: Vec2, goal: Vec2) -> Option<Path> {
        let start_cell = grid.world_to_cell(start)?;
        let goal_cell = grid.world_to_cell(goal)?;
        let cells = self.search(grid, start_cell, goal_cell)?;
        Some(Path::from_cells(grid, start_cell, cells))
    }
}

// ── A* internals ──────────────────────────────────────────────────────────────

/// Open-set entry.  Ordered so the max-heap pops the lowest `f`, and among
/// equal `f` the earliest inserted.
#[derive(Debug)]
struct OpenNode {
    f: f32,
    g: f32,
    idx: usize,
    seq: u64,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.total_cmp(&self.f).then_with(|| other.seq.cmp(&self.seq))
    }
}

fn reconstruct(grid: &TileGrid, parent: &[Option<usize>], goal: usize) -> Vec<GridCell> {
    let mut cells = Vec::new();
    let mut cur = goal;
    // The start node is the only one with no parent, and is excluded.
    while let Some(prev) = parent[cur] {
        cells.push(grid.cell_at(cur));
        cur = prev;
    }
    cells.reverse();
    cells
}
