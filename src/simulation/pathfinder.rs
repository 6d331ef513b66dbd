//! Grid A* planner for new railway construction
//!
//! Costs a candidate track between two stations against the current grid
//! occupancy. Track cells already built with the same line type are reused
//! at no cost; cells of other types and all foreign footprints block.

use pathfinding::prelude::astar;
use std::collections::HashSet;
use thiserror::Error;

use super::railway::RailwayLineType;
use super::types::Position;

/// Search failure, reported as a value; never used for control flow
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("no traversable path between the requested stations")]
    NoPath,
}

/// Grid occupancy snapshot for one planning query
///
/// `blocked` holds obstacles, production sites, station footprints other
/// than the two endpoints, and track cells of other line types. `reusable`
/// holds track cells of the target line type.
#[derive(Debug, Clone, Default)]
pub struct GridOccupancy {
    pub width: i32,
    pub height: i32,
    pub blocked: HashSet<Position>,
    pub reusable: HashSet<Position>,
}

impl GridOccupancy {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            blocked: HashSet::new(),
            reusable: HashSet::new(),
        }
    }

    fn in_bounds(&self, position: &Position) -> bool {
        position.x >= 0 && position.y >= 0 && position.x < self.width && position.y < self.height
    }

    fn traversable(&self, position: &Position) -> bool {
        self.in_bounds(position) && !self.blocked.contains(position)
    }
}

/// A planned track: the cell sequence and what building it would cost
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackPlan {
    pub line_type: RailwayLineType,
    /// Ordered cells from source to destination, endpoints inclusive
    pub path: Vec<Position>,
    /// Cells that need new track laid
    pub new_cells: u32,
    /// Cells reused from existing same-type track (the source station cell
    /// counts as reused; no track is laid under the departure platform)
    pub reused_cells: u32,
    /// Total construction cost: new cells times the type's per-cell cost
    pub cost: i64,
}

/// Plan a track from `from` to `to` for the given line type.
///
/// Best-first search over 4-connected grid cells. Entering a free cell
/// costs the line type's per-cell construction cost; entering a reusable
/// cell costs nothing. The Manhattan heuristic never overestimates on new
/// construction, and successor order is fixed, so results are deterministic
/// for identical inputs.
pub fn plan_track(
    from: Position,
    to: Position,
    line_type: RailwayLineType,
    occupancy: &GridOccupancy,
) -> Result<TrackPlan, PathError> {
    if !occupancy.traversable(&from) || !occupancy.traversable(&to) {
        return Err(PathError::NoPath);
    }

    let unit = line_type.cost_per_cell().max(1);
    let step_cost = |cell: &Position| -> u32 {
        if occupancy.reusable.contains(cell) {
            0
        } else {
            unit
        }
    };

    let result = astar(
        &from,
        |position| {
            position
                .neighbours()
                .into_iter()
                .filter(|next| occupancy.traversable(next))
                .map(|next| {
                    let cost = step_cost(&next);
                    (next, cost)
                })
                .collect::<Vec<_>>()
        },
        |position| position.manhattan_distance(&to),
        |position| *position == to,
    );

    match result {
        Some((path, _)) => {
            // The source cell is a station platform; only cells entered by
            // the search are charged or counted.
            let mut new_cells = 0u32;
            let mut reused_cells = 1u32;
            for cell in &path[1..] {
                if occupancy.reusable.contains(cell) {
                    reused_cells += 1;
                } else {
                    new_cells += 1;
                }
            }
            Ok(TrackPlan {
                line_type,
                path,
                new_cells,
                reused_cells,
                cost: new_cells as i64 * line_type.cost_per_cell() as i64,
            })
        }
        None => Err(PathError::NoPath),
    }
}
