//! Track planning: costs, reuse and unreachable goals

use std::collections::HashSet;

use railway_sim::simulation::{
    plan_track, GridOccupancy, MapSnapshot, PathError, Position, RailwayLineType, ResourceCatalog,
    ScenarioBounds, SimWorld, StationKind, TimeDate,
};

const LINE: RailwayLineType = RailwayLineType::SingleNonElectrified;

#[test]
fn test_open_grid_plan_is_optimal() {
    let occupancy = GridOccupancy::new(5, 5);
    let from = Position::new(0, 0);
    let to = Position::new(4, 4);

    let plan = plan_track(from, to, LINE, &occupancy).expect("path exists");

    assert_eq!(plan.path.first(), Some(&from));
    assert_eq!(plan.path.last(), Some(&to));
    // Shortest 4-connected path: manhattan distance plus the start cell.
    assert_eq!(plan.path.len(), 9);
    assert!(plan.path.len() as f64 >= from.distance(&to));
    // Every entered cell is new track; the source platform is not charged.
    assert_eq!(plan.new_cells, 8);
    assert_eq!(plan.reused_cells, 1);
    assert_eq!(plan.cost, 8 * LINE.cost_per_cell() as i64);
}

#[test]
fn test_blocked_grid_reports_no_path() {
    let mut occupancy = GridOccupancy::new(5, 5);
    let from = Position::new(0, 0);
    let to = Position::new(4, 4);
    for x in 0..5 {
        for y in 0..5 {
            let cell = Position::new(x, y);
            if cell != from && cell != to {
                occupancy.blocked.insert(cell);
            }
        }
    }

    assert_eq!(plan_track(from, to, LINE, &occupancy), Err(PathError::NoPath));
}

#[test]
fn test_same_type_track_is_reused_for_free() {
    let mut occupancy = GridOccupancy::new(6, 3);
    for x in 2..6 {
        occupancy.reusable.insert(Position::new(x, 1));
    }

    let plan = plan_track(Position::new(0, 1), Position::new(5, 1), LINE, &occupancy)
        .expect("path exists");

    assert_eq!(plan.cost, LINE.cost_per_cell() as i64);
    assert_eq!(plan.new_cells, 1); // only the first step off the platform
    assert_eq!(plan.reused_cells, 5);
}

#[test]
fn test_detour_around_obstacles() {
    let mut occupancy = GridOccupancy::new(5, 5);
    // A wall across the middle with one gap at (4, 2).
    for x in 0..4 {
        occupancy.blocked.insert(Position::new(x, 2));
    }

    let plan = plan_track(Position::new(0, 0), Position::new(0, 4), LINE, &occupancy)
        .expect("path exists");

    assert!(plan.path.contains(&Position::new(4, 2)));
    assert!(plan.path.len() > 5);
    assert_eq!(plan.cost, (plan.path.len() as i64 - 1) * LINE.cost_per_cell() as i64);
}

fn bare_world() -> SimWorld {
    let catalog = ResourceCatalog::new(vec![]).expect("empty catalog is valid");
    let map = MapSnapshot::new(30, 12, HashSet::new());
    let bounds = ScenarioBounds {
        start: TimeDate::new(1950, 1, 1),
        end: TimeDate::new(1960, 1, 1),
        starting_money: 50_000,
    };
    SimWorld::new(map, catalog, bounds)
}

#[test]
fn test_plan_line_between_stations() {
    let mut world = bare_world();
    let a = world
        .build_station(StationKind::Station, "A", Position::new(1, 6))
        .expect("builds");
    let b = world
        .build_station(StationKind::Station, "B", Position::new(25, 6))
        .expect("builds");

    let plan = world.plan_line(a, b, LINE).expect("plan exists");
    assert_eq!(plan.cost, plan.new_cells as i64 * LINE.cost_per_cell() as i64);
    assert_eq!(plan.path.len(), 25);
}

#[test]
fn test_existing_track_of_same_type_makes_second_plan_free() {
    let mut world = bare_world();
    let a = world
        .build_station(StationKind::Station, "A", Position::new(1, 6))
        .expect("builds");
    let b = world
        .build_station(StationKind::Station, "B", Position::new(25, 6))
        .expect("builds");
    world.build_line(a, b, LINE).expect("line builds");

    // Replanning the same type rides the built track for nothing.
    let replan = world.plan_line(a, b, LINE).expect("plan exists");
    assert_eq!(replan.cost, 0);
    assert_eq!(replan.new_cells, 0);
}

#[test]
fn test_other_line_types_block_instead_of_reusing() {
    let mut world = bare_world();
    let a = world
        .build_station(StationKind::Station, "A", Position::new(1, 6))
        .expect("builds");
    let b = world
        .build_station(StationKind::Station, "B", Position::new(25, 6))
        .expect("builds");
    let first = world.build_line(a, b, LINE).expect("line builds");
    let built: HashSet<Position> = world
        .network()
        .get_line(first)
        .unwrap()
        .path
        .iter()
        .copied()
        .collect();

    let plan = world
        .plan_line(a, b, RailwayLineType::DoubleElectrified)
        .expect("a detour exists");
    assert!(plan.cost > 0);
    // The detour never rides the incompatible track, endpoints aside.
    for cell in &plan.path[1..plan.path.len() - 1] {
        assert!(!built.contains(cell), "plan reused foreign track at {:?}", cell);
    }
}
