//! Scenario loading: ASCII tile maps and CSV patrol routes.
//!
//! # Map format
//!
//! ```text
//! ##########
//! #G.......#
//! #...##...#
//! #...##.P.#
//! #H.......#
//! ##########
//! ```
//!
//! | Char | Meaning                  |
//! |------|--------------------------|
//! | `#`  | wall                     |
//! | `.`  | floor                    |
//! | `G`  | guard spawn (floor)      |
//! | `P`  | target position (floor)  |
//! | `H`  | health pack (floor)      |
//!
//! Guards are numbered in reading order (row by row, left to right).  Any
//! other letter is plain floor.
//!
//! # Route CSV format
//!
//! ```csv
//! agent_id,order,x,y
//! 0,0,1.5,1.5
//! 0,1,8.5,1.5
//! 1,0,8.5,4.5
//! ```
//!
//! Rows may appear in any order; each guard's waypoints are sorted by
//! `order`.  Guards absent from the CSV get an empty route and idle.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use sn_agent::{AgentSpec, AgentStoreBuilder};
use sn_core::{Pose, SimConfig, Vec2};
use sn_spatial::{GridCell, Pathfinder, TileGrid};

use crate::{SceneWorld, ScenarioError, ScenarioResult, SimBuilder};

// ── Scenario ──────────────────────────────────────────────────────────────────

/// A parsed map: walls plus marker positions (cell centres).
#[derive(Clone, Debug)]
pub struct Scenario {
    pub grid: TileGrid,
    pub guards: Vec<Vec2>,
    pub target: Option<Vec2>,
    pub resources: Vec<Vec2>,
}

impl Scenario {
    /// World with the target and every health pack placed.
    pub fn world(&self) -> SceneWorld {
        let mut world = SceneWorld::new(self.grid.clone());
        if let Some(target) = self.target {
            world.set_target_position(target);
        }
        for &p in &self.resources {
            world.add_resource(p);
        }
        world
    }

    /// One spec per guard, cloned from `template`, placed at its spawn and
    /// facing the first waypoint of its route.
    ///
    /// `routes` shorter than the guard count leaves the rest without routes.
    pub fn agent_specs(&self, routes: &[Vec<Vec2>], template: &AgentSpec) -> Vec<AgentSpec> {
        self.guards
            .iter()
            .enumerate()
            .map(|(i, &spawn)| {
                let route = routes.get(i).cloned().unwrap_or_default();
                let heading = route
                    .first()
                    .map(|&w| w - spawn)
                    .filter(|d| d.length_squared() > 0.0)
                    .map_or(0.0, |d| d.angle_deg());
                AgentSpec { pose: Pose::new(spawn, heading), route, ..template.clone() }
            })
            .collect()
    }

    /// Assemble a [`SimBuilder`] for this scenario.  Validation happens in
    /// [`SimBuilder::build`].
    pub fn into_builder<P: Pathfinder>(
        self,
        config:     SimConfig,
        routes:     &[Vec<Vec2>],
        template:   &AgentSpec,
        pathfinder: P,
    ) -> SimBuilder<P> {
        let (store, rngs) = AgentStoreBuilder::new(config.seed)
            .agents(self.agent_specs(routes, template))
            .build();
        SimBuilder::new(config, store, rngs, self.world(), pathfinder)
    }
}

/// Parse an ASCII map with `G`, `P` and `H` markers.
pub fn parse_map(text: &str, cell_size: f32) -> ScenarioResult<Scenario> {
    let grid = TileGrid::from_ascii(text, cell_size)?;

    let mut guards = Vec::new();
    let mut target = None;
    let mut resources = Vec::new();

    let rows = text.lines().map(str::trim_end).filter(|l| !l.is_empty());
    for (row, line) in rows.enumerate() {
        for (col, ch) in line.chars().enumerate() {
            let centre = grid.cell_center(GridCell::new(col as i32, row as i32));
            match ch {
                'G' => guards.push(centre),
                'H' => resources.push(centre),
                'P' if target.is_some() => {
                    return Err(ScenarioError::Parse(format!(
                        "second target marker at row {row}, column {col}"
                    )));
                }
                'P' => target = Some(centre),
                _ => {}
            }
        }
    }

    Ok(Scenario { grid, guards, target, resources })
}

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RouteRecord {
    agent_id: u32,
    order:    u32,
    x:        f32,
    y:        f32,
}

// ── Routes ────────────────────────────────────────────────────────────────────

/// Load patrol routes from a CSV file.
///
/// Returns a `Vec` of length `guards`, indexed by `AgentId`.
pub fn load_routes_csv(path: &Path, guards: usize) -> ScenarioResult<Vec<Vec<Vec2>>> {
    let file = std::fs::File::open(path)?;
    load_routes_reader(file, guards)
}

/// Like [`load_routes_csv`] but accepts any `Read` source.
pub fn load_routes_reader<R: Read>(reader: R, guards: usize) -> ScenarioResult<Vec<Vec<Vec2>>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut by_agent: BTreeMap<u32, Vec<(u32, Vec2)>> = BTreeMap::new();

    for result in csv_reader.deserialize::<RouteRecord>() {
        let row = result.map_err(|e| ScenarioError::Parse(e.to_string()))?;
        if row.agent_id as usize >= guards {
            return Err(ScenarioError::UnknownAgent { agent_id: row.agent_id, guards });
        }
        let point = Vec2::new(row.x, row.y);
        if !point.is_finite() {
            return Err(ScenarioError::Parse(format!(
                "agent {} waypoint {} is not finite",
                row.agent_id, row.order
            )));
        }
        by_agent.entry(row.agent_id).or_default().push((row.order, point));
    }

    let mut routes = vec![Vec::new(); guards];
    for (agent_id, mut rows) in by_agent {
        rows.sort_by_key(|&(order, _)| order);
        routes[agent_id as usize] = rows.into_iter().map(|(_, p)| p).collect();
    }
    Ok(routes)
}
