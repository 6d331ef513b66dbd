//! Money, ledger and route/train assignment rules

use std::collections::HashSet;

use railway_sim::simulation::{
    AssignmentError, Building, Carriage, FinancialLedger, FuelType, Locomotive, MapSnapshot,
    Position, PurchaseError, RailwayLineType, ResourceCatalog, RouteId, ScenarioBounds, SimWorld,
    StationKind, TimeDate, TransactionCategory, WorldError, MAX_SPEED, MIN_SPEED,
};

fn empty_world(starting_money: i64) -> SimWorld {
    let catalog = ResourceCatalog::new(vec![]).expect("empty catalog is valid");
    let map = MapSnapshot::new(60, 20, HashSet::new());
    let bounds = ScenarioBounds {
        start: TimeDate::new(1950, 1, 1),
        end: TimeDate::new(1960, 1, 1),
        starting_money,
    };
    SimWorld::new(map, catalog, bounds)
}

fn diesel_locomotive() -> Locomotive {
    Locomotive::new("Class 20", FuelType::Diesel, 1000, 4, 500, 25)
}

fn electric_locomotive() -> Locomotive {
    Locomotive::new("EM2", FuelType::Electricity, 1500, 4, 700, 20)
}

fn one_carriage() -> Vec<Carriage> {
    vec![Carriage::new("Box van", 10, 50)]
}

/// Two stations joined by a line of the given type, plus a route over it
fn world_with_route(line_type: RailwayLineType, requires_electric: bool) -> (SimWorld, RouteId) {
    let mut world = empty_world(100_000);
    let a = world
        .build_station(StationKind::Station, "West", Position::new(2, 10))
        .expect("station builds");
    let b = world
        .build_station(StationKind::Station, "East", Position::new(50, 10))
        .expect("station builds");
    let line = world.build_line(a, b, line_type).expect("line builds");
    let route = world
        .create_route("West-East", vec![line], requires_electric)
        .expect("route creates");
    (world, route)
}

#[test]
fn test_spending_fails_closed_when_broke() {
    let mut world = empty_world(10);

    let result = world.build_station(StationKind::Terminal, "Grand", Position::new(5, 5));
    assert_eq!(
        result.unwrap_err(),
        WorldError::Purchase(PurchaseError::InsufficientFunds {
            cost: 200,
            balance: 10
        })
    );
    // Balance untouched and nothing was built.
    assert_eq!(world.balance(), 10);
    assert_eq!(world.stations().count(), 0);
}

#[test]
fn test_station_construction_charges_by_kind() {
    let mut world = empty_world(1_000);
    world
        .build_station(StationKind::Depot, "Shed", Position::new(1, 1))
        .expect("builds");
    assert_eq!(world.balance(), 950);

    world
        .build_station(StationKind::Terminal, "Grand", Position::new(10, 10))
        .expect("builds");
    assert_eq!(world.balance(), 750);
}

#[test]
fn test_station_building_purchase() {
    let mut world = empty_world(1_000);
    let station = world
        .build_station(StationKind::Depot, "Shed", Position::new(1, 1))
        .expect("builds");

    world
        .add_station_building(station, Building::TelegraphOffice)
        .expect("building attaches");
    assert_eq!(world.balance(), 1_000 - 50 - 30);
    assert_eq!(
        world.station(station).unwrap().buildings,
        vec![Building::TelegraphOffice]
    );
}

#[test]
fn test_buy_train_respects_carriage_limit() {
    let mut world = empty_world(10_000);
    let locomotive = Locomotive::new("Shunter", FuelType::Diesel, 400, 2, 300, 10);
    let carriages = vec![
        Carriage::new("Van", 8, 40),
        Carriage::new("Van", 8, 40),
        Carriage::new("Van", 8, 40),
    ];

    let result = world.buy_train(locomotive, carriages);
    assert_eq!(
        result.unwrap_err(),
        WorldError::TooManyCarriages {
            allowed: 2,
            requested: 3
        }
    );
    assert_eq!(world.balance(), 10_000);
}

#[test]
fn test_available_trains_by_electrification() {
    let (mut world, electric_route) =
        world_with_route(RailwayLineType::SingleElectrified, true);
    let diesel = world
        .buy_train(diesel_locomotive(), one_carriage())
        .expect("train buys");
    let electric = world
        .buy_train(electric_locomotive(), one_carriage())
        .expect("train buys");

    // An electrified route accepts any inactive train.
    let mut eligible = world.available_trains(electric_route).unwrap();
    eligible.sort();
    let mut expected = vec![diesel, electric];
    expected.sort();
    assert_eq!(eligible, expected);

    // A non-electrified route excludes electric locomotives.
    let west = world.stations().next().unwrap().id;
    let east = world.stations().nth(1).unwrap().id;
    let plain_line = world
        .build_line(west, east, RailwayLineType::SingleNonElectrified)
        .expect("line builds");
    let plain_route = world
        .create_route("Plain", vec![plain_line], false)
        .expect("route creates");
    assert_eq!(world.available_trains(plain_route).unwrap(), vec![diesel]);

    // Assigned trains drop out of the eligible list.
    world.activate_route(electric_route, electric).expect("activates");
    assert_eq!(world.available_trains(electric_route).unwrap(), vec![diesel]);
}

#[test]
fn test_double_activation_is_rejected() {
    let (mut world, route) = world_with_route(RailwayLineType::SingleNonElectrified, false);
    let first = world
        .buy_train(diesel_locomotive(), one_carriage())
        .expect("train buys");
    let second = world
        .buy_train(diesel_locomotive(), one_carriage())
        .expect("train buys");

    world.activate_route(route, first).expect("activates");
    let result = world.activate_route(route, second);
    assert_eq!(
        result.unwrap_err(),
        WorldError::Assignment(AssignmentError::RouteAlreadyActive)
    );

    // State is exactly as it was after the first activation.
    let route_state = world.route(route).unwrap();
    assert!(route_state.active);
    assert_eq!(route_state.assigned_train, Some(first));
    assert!(!world.train(second).unwrap().active);
}

#[test]
fn test_train_is_exclusive_to_one_route() {
    let (mut world, route) = world_with_route(RailwayLineType::SingleNonElectrified, false);
    let west = world.stations().next().unwrap().id;
    let east = world.stations().nth(1).unwrap().id;
    let second_line = world
        .build_line(west, east, RailwayLineType::DoubleNonElectrified)
        .expect("line builds");
    let second_route = world
        .create_route("Second", vec![second_line], false)
        .expect("route creates");
    let train = world
        .buy_train(diesel_locomotive(), one_carriage())
        .expect("train buys");

    world.activate_route(route, train).expect("activates");
    let result = world.activate_route(second_route, train);
    assert_eq!(
        result.unwrap_err(),
        WorldError::Assignment(AssignmentError::TrainAlreadyAssigned)
    );

    let active_with_train: Vec<RouteId> = world
        .routes()
        .filter(|candidate| candidate.assigned_train == Some(train))
        .map(|candidate| candidate.id)
        .collect();
    assert_eq!(active_with_train, vec![route]);
}

#[test]
fn test_electric_train_rejected_on_plain_route() {
    let (mut world, route) = world_with_route(RailwayLineType::SingleNonElectrified, false);
    let electric = world
        .buy_train(electric_locomotive(), one_carriage())
        .expect("train buys");

    let result = world.activate_route(route, electric);
    assert_eq!(
        result.unwrap_err(),
        WorldError::Assignment(AssignmentError::FuelIncompatible)
    );
    assert!(!world.route(route).unwrap().active);
}

#[test]
fn test_deactivate_requires_active_route() {
    let (mut world, route) = world_with_route(RailwayLineType::SingleNonElectrified, false);

    let result = world.deactivate_route(route);
    assert_eq!(
        result.unwrap_err(),
        WorldError::Assignment(AssignmentError::RouteNotActive)
    );

    // A full cycle releases the train for reuse.
    let train = world
        .buy_train(diesel_locomotive(), one_carriage())
        .expect("train buys");
    world.activate_route(route, train).expect("activates");
    world.deactivate_route(route).expect("deactivates");
    assert!(!world.train(train).unwrap().active);
    assert_eq!(world.route(route).unwrap().assigned_train, None);
    world.activate_route(route, train).expect("reactivates");
}

#[test]
fn test_electrified_route_requires_electrified_lines() {
    let mut world = empty_world(100_000);
    let a = world
        .build_station(StationKind::Station, "West", Position::new(2, 10))
        .expect("builds");
    let b = world
        .build_station(StationKind::Station, "East", Position::new(50, 10))
        .expect("builds");
    let line = world
        .build_line(a, b, RailwayLineType::SingleNonElectrified)
        .expect("builds");

    let result = world.create_route("Wired", vec![line], true);
    assert_eq!(result.unwrap_err(), WorldError::RouteNotElectrified);
}

#[test]
fn test_remove_route_releases_train() {
    let (mut world, route) = world_with_route(RailwayLineType::SingleNonElectrified, false);
    let train = world
        .buy_train(diesel_locomotive(), one_carriage())
        .expect("train buys");
    world.activate_route(route, train).expect("activates");

    world.remove_route(route).expect("removes");
    assert!(world.route(route).is_none());
    assert!(!world.train(train).unwrap().active);
}

#[test]
fn test_removal_order_is_enforced() {
    let (mut world, route) = world_with_route(RailwayLineType::SingleNonElectrified, false);
    let west = world.stations().next().unwrap().id;
    let line = world.route(route).unwrap().segments[0];

    // Infrastructure in use cannot be torn down.
    assert_eq!(
        world.remove_line(line).unwrap_err(),
        WorldError::LineInUse(line)
    );
    assert_eq!(
        world.remove_station(west).unwrap_err(),
        WorldError::StationHasLines(west)
    );

    // Route, then line, then station.
    world.remove_route(route).expect("route removes");
    world.remove_line(line).expect("line removes once unused");
    world.remove_station(west).expect("station removes once isolated");
    assert!(world.station(west).is_none());
}

#[test]
fn test_ledger_math() {
    let mut ledger = FinancialLedger::new();
    ledger.record(1952, TransactionCategory::Earning, 900);
    ledger.record(1952, TransactionCategory::TrackMaintenance, 120);
    ledger.record(1952, TransactionCategory::TrainMaintenance, 80);
    ledger.record(1952, TransactionCategory::FuelCost, 50);
    ledger.record(1952, TransactionCategory::Earning, 100);

    let record = ledger.year(1952).unwrap();
    assert_eq!(record.earning, 1_000);
    assert_eq!(record.total_expenses(), 250);
    assert_eq!(record.net_revenue(), 750);
    assert!(ledger.year(1953).is_none());
}

#[test]
fn test_yearly_maintenance_hits_the_ledger() {
    let (mut world, route) = world_with_route(RailwayLineType::SingleNonElectrified, false);
    let train = world
        .buy_train(diesel_locomotive(), one_carriage())
        .expect("train buys");
    world.activate_route(route, train).expect("activates");

    // Run through the first year boundary.
    world.advance(370);

    let record = world.ledger().year(1950).expect("closed year recorded");
    assert!(record.track_maintenance > 0);
    assert_eq!(record.train_maintenance, 25);
    // Fuel accrues daily while the train is out.
    assert!(record.fuel_cost > 0);
}

#[test]
fn test_speed_clamps_at_bounds() {
    let mut world = empty_world(100);
    assert_eq!(world.speed(), MIN_SPEED);

    world.decrease_speed();
    assert_eq!(world.speed(), MIN_SPEED);

    world.set_speed(99);
    assert_eq!(world.speed(), MAX_SPEED);

    world.increase_speed();
    assert_eq!(world.speed(), MAX_SPEED);

    world.set_speed(3);
    world.increase_speed();
    assert_eq!(world.speed(), 4);
    world.decrease_speed();
    world.decrease_speed();
    assert_eq!(world.speed(), 2);
}

#[test]
fn test_deliveries_earn_revenue() {
    let mut world = SimWorld::demo_scenario(42).expect("scenario builds");
    let opening = world.balance();

    // Long enough for goods to be produced, hauled and delivered.
    world.advance(120);

    let earned: i64 = world.ledger().records().map(|record| record.earning).sum();
    assert!(earned > 0, "active route should have delivered something");
    // Fuel was burned every day the train was out.
    let fuel: i64 = world.ledger().records().map(|record| record.fuel_cost).sum();
    assert_eq!(fuel, 120 * 4);
    // The balance moved by exactly the ledger flows in that window.
    assert_eq!(world.balance(), opening + earned - fuel);
}
