//! Unit tests for sn-spatial.
//!
//! All grids are built in code or from small ASCII maps.

#[cfg(test)]
mod helpers {
    use crate::TileGrid;

    /// A 10×10 open grid with 1-unit cells.
    pub fn open_grid() -> TileGrid {
        TileGrid::new(10, 10, 1.0).unwrap()
    }

    /// ```text
    /// row 0  .....
    /// row 1  .###.
    /// row 2  .....
    /// ```
    pub fn wall_grid() -> TileGrid {
        TileGrid::from_ascii(".....\n.###.\n.....\n", 1.0).unwrap()
    }
}

// ── Grid construction & mapping ───────────────────────────────────────────────

#[cfg(test)]
mod grid {
    use sn_core::Vec2;

    use crate::{GridCell, SpatialError, TileGrid};

    #[test]
    fn zero_sized_grid_rejected() {
        assert!(matches!(TileGrid::new(0, 5, 1.0), Err(SpatialError::EmptyGrid { .. })));
        assert!(matches!(TileGrid::new(5, 5, 0.0), Err(SpatialError::InvalidCellSize(_))));
    }

    #[test]
    fn world_cell_roundtrip() {
        let grid = TileGrid::new(4, 3, 2.0).unwrap().with_origin(Vec2::new(10.0, 0.0));
        let cell = grid.world_to_cell(Vec2::new(13.9, 5.0)).unwrap();
        assert_eq!(cell, GridCell::new(1, 2));
        assert_eq!(grid.cell_center(cell), Vec2::new(13.0, 5.0));
        assert!(grid.world_to_cell(Vec2::new(9.9, 0.0)).is_none());
        assert!(grid.world_to_cell(Vec2::new(18.0, 0.0)).is_none());
    }

    #[test]
    fn ascii_walls_and_markers() {
        let grid = TileGrid::from_ascii("#G.\n.P#\n", 1.0).unwrap();
        assert_eq!((grid.width(), grid.height()), (3, 2));
        assert!(!grid.is_walkable(GridCell::new(0, 0)));
        assert!(grid.is_walkable(GridCell::new(1, 0)));
        assert!(grid.is_walkable(GridCell::new(1, 1)));
        assert!(!grid.is_walkable(GridCell::new(2, 1)));
        assert_eq!(grid.walkable_cells().count(), 4);
    }

    #[test]
    fn ascii_errors() {
        assert!(matches!(
            TileGrid::from_ascii("..\n...\n", 1.0),
            Err(SpatialError::RaggedMap { line: 2, expected: 2, found: 3 })
        ));
        assert!(matches!(
            TileGrid::from_ascii(".?\n", 1.0),
            Err(SpatialError::MalformedMap { line: 1, column: 2, ch: '?' })
        ));
        assert!(matches!(TileGrid::from_ascii("\n\n", 1.0), Err(SpatialError::EmptyGrid { .. })));
    }

    #[test]
    fn out_of_bounds_is_blocked() {
        let grid = super::helpers::open_grid();
        assert!(!grid.is_walkable(GridCell::new(-1, 0)));
        assert!(!grid.is_walkable(GridCell::new(0, 10)));
    }
}

// ── Occlusion via grid traversal ──────────────────────────────────────────────

#[cfg(test)]
mod occlusion {
    use sn_core::{LayerMask, Occlusion, Vec2};

    use crate::TileGrid;

    #[test]
    fn ray_stops_at_wall_face() {
        let grid = super::helpers::wall_grid();
        // From (2.5, 0.5) straight up into the wall row at y = 1.
        let hit = grid
            .raycast(Vec2::new(2.5, 0.5), Vec2::new(0.0, 1.0), 10.0, LayerMask::WALLS)
            .expect("wall above");
        assert!((hit.distance - 0.5).abs() < 1e-5);
        assert_eq!(hit.object, TileGrid::WALL_OBJECT);
    }

    #[test]
    fn ray_respects_max_distance_and_mask() {
        let grid = super::helpers::wall_grid();
        let up = Vec2::new(0.0, 1.0);
        assert!(grid.raycast(Vec2::new(2.5, 0.5), up, 0.4, LayerMask::WALLS).is_none());
        assert!(grid.raycast(Vec2::new(2.5, 0.5), up, 10.0, LayerMask::TARGET).is_none());
    }

    #[test]
    fn ray_along_open_column_reaches_grid_edge() {
        let grid = super::helpers::wall_grid();
        let hit = grid
            .raycast(Vec2::new(0.5, 0.5), Vec2::new(0.0, 1.0), 10.0, LayerMask::WALLS)
            .expect("grid boundary");
        assert!((hit.distance - 2.5).abs() < 1e-5);
    }

    #[test]
    fn line_of_sight_around_wall() {
        let grid = super::helpers::wall_grid();
        let below = Vec2::new(2.5, 0.5);
        let above = Vec2::new(2.5, 2.5);
        assert!(!grid.line_of_sight(below, above, LayerMask::WALLS));
        assert!(grid.line_of_sight(Vec2::new(0.5, 0.5), Vec2::new(0.5, 2.5), LayerMask::WALLS));
    }

    #[test]
    fn diagonal_ray_through_open_grid() {
        let grid = super::helpers::open_grid();
        let dir = Vec2::new(1.0, 1.0).normalized();
        assert!(grid.raycast(Vec2::new(0.5, 0.5), dir, 8.0, LayerMask::WALLS).is_none());
    }

    #[test]
    fn overlaps_walls_only() {
        let grid = super::helpers::wall_grid();
        assert!(grid.overlaps(Vec2::new(1.5, 1.5), LayerMask::WALLS));
        assert!(!grid.overlaps(Vec2::new(0.5, 1.5), LayerMask::WALLS));
        assert!(!grid.overlaps(Vec2::new(1.5, 1.5), LayerMask::TARGET));
    }

    #[test]
    fn from_occlusion_copies_walls() {
        let source = super::helpers::wall_grid();
        let copy = TileGrid::from_occlusion(5, 3, 1.0, Vec2::ZERO, &source, LayerMask::WALLS).unwrap();
        assert_eq!(
            copy.walkable_cells().collect::<Vec<_>>(),
            source.walkable_cells().collect::<Vec<_>>()
        );
    }
}

// ── A* ────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod astar {
    use sn_core::Vec2;

    use crate::{AStarPathfinder, GridCell, Pathfinder, TileGrid};

    fn centre(col: i32, row: i32) -> Vec2 {
        Vec2::new(col as f32 + 0.5, row as f32 + 0.5)
    }

    #[test]
    fn diagonal_corner_to_corner() {
        let grid = super::helpers::open_grid();
        let path = AStarPathfinder::eight()
            .find_path(&grid, centre(0, 0), centre(9, 9))
            .expect("open grid is connected");
        assert_eq!(path.len(), 9);
        for (i, cell) in path.cells().iter().enumerate() {
            let k = i as i32 + 1;
            assert_eq!(*cell, GridCell::new(k, k));
        }
        assert_eq!(path.last(), Some(centre(9, 9)));
    }

    #[test]
    fn four_connected_length_is_manhattan() {
        let grid = super::helpers::open_grid();
        let pf = AStarPathfinder::four();
        for &(a, b) in &[((0, 0), (9, 9)), ((3, 7), (8, 1)), ((5, 5), (5, 0)), ((9, 0), (0, 9))] {
            let path = pf.find_path(&grid, centre(a.0, a.1), centre(b.0, b.1)).unwrap();
            let manhattan = ((a.0 - b.0).abs() + (a.1 - b.1).abs()) as f32;
            assert_eq!(path.len(), manhattan as usize);
            assert!((path.length() - manhattan).abs() < 1e-3, "{a:?}->{b:?}");
        }
    }

    #[test]
    fn consecutive_waypoints_adjacent() {
        let grid = super::helpers::wall_grid();
        let path = AStarPathfinder::eight()
            .find_path(&grid, centre(2, 0), centre(2, 2))
            .unwrap();
        let mut prev = GridCell::new(2, 0);
        for &c in path.cells() {
            assert!(prev.is_adjacent(c));
            assert!(grid.is_walkable(c));
            prev = c;
        }
    }

    #[test]
    fn no_corner_cutting() {
        // (0,0) → (1,1) with (1,0) blocked must go around via (0,1).
        let grid = TileGrid::from_ascii(".#\n..\n", 1.0).unwrap();
        let path = AStarPathfinder::eight()
            .find_path(&grid, centre(0, 0), centre(1, 1))
            .unwrap();
        assert_eq!(path.cells(), &[GridCell::new(0, 1), GridCell::new(1, 1)]);
    }

    #[test]
    fn unwalkable_endpoints_yield_none() {
        let grid = super::helpers::wall_grid();
        let pf = AStarPathfinder::four();
        assert!(pf.find_path(&grid, centre(1, 1), centre(0, 0)).is_none());
        assert!(pf.find_path(&grid, centre(0, 0), centre(3, 1)).is_none());
        assert!(pf.find_path(&grid, Vec2::new(-3.0, 0.0), centre(0, 0)).is_none());
    }

    #[test]
    fn unreachable_goal_yields_none() {
        let grid = TileGrid::from_ascii("..#..\n..#..\n", 1.0).unwrap();
        assert!(AStarPathfinder::eight().find_path(&grid, centre(0, 0), centre(4, 1)).is_none());
    }

    #[test]
    fn same_cell_is_empty_path() {
        let grid = super::helpers::open_grid();
        let path = AStarPathfinder::four()
            .find_path(&grid, Vec2::new(3.1, 3.1), Vec2::new(3.9, 3.8))
            .unwrap();
        assert!(path.is_empty());
        assert_eq!(path.length(), 0.0);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let grid = super::helpers::wall_grid();
        let pf = AStarPathfinder::four();
        let a = pf.find_path(&grid, centre(0, 2), centre(4, 0));
        let b = pf.find_path(&grid, centre(0, 2), centre(4, 0));
        assert_eq!(a, b);
    }
}
