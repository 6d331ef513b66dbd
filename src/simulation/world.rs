//! The simulation world that ties everything together
//!
//! This is the aggregate root: money, stations, lines, routes, trains,
//! production sites and the clock, plus the command and query surface the
//! host layers call into.

use anyhow::Result;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

use super::clock::SimulationClock;
use super::demand;
use super::ledger::{FinancialLedger, TransactionCategory};
use super::pathfinder::{plan_track, GridOccupancy, PathError, TrackPlan};
use super::railway::{RailNetwork, RailwayLine, RailwayLineType};
use super::resource::{ResourceCatalog, ResourceTypeSpec};
use super::route::{AssignmentError, Route};
use super::scheduler::Scheduler;
use super::site::{HouseBlock, Industry, ProductionSite};
use super::station::{Building, Station, StationKind};
use super::train::{Carriage, FuelType, Locomotive, Train};
use super::types::{LineId, Position, RouteId, SimId, SiteId, StationId, TimeDate, TrainId};

/// Earnings per unit of cargo delivered to a consuming site
pub const EARNING_PER_UNIT_DELIVERED: i64 = 8;

/// Read-only geometry supplied by the external map subsystem
#[derive(Debug, Clone, Default)]
pub struct MapSnapshot {
    pub width: i32,
    pub height: i32,
    /// Cells the core may never build on (city blocks, water, scenery)
    pub obstacles: HashSet<Position>,
}

impl MapSnapshot {
    pub fn new(width: i32, height: i32, obstacles: HashSet<Position>) -> Self {
        Self {
            width,
            height,
            obstacles,
        }
    }

    pub fn contains(&self, position: &Position) -> bool {
        position.x >= 0 && position.y >= 0 && position.x < self.width && position.y < self.height
    }
}

/// Scenario frame: when the run starts and ends, and the opening balance
#[derive(Debug, Clone, Copy)]
pub struct ScenarioBounds {
    pub start: TimeDate,
    pub end: TimeDate,
    pub starting_money: i64,
}

/// A spend rejected because the balance would go negative
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PurchaseError {
    #[error("cost {cost} exceeds current balance {balance}")]
    InsufficientFunds { cost: i64, balance: i64 },
}

/// Failures of the world's command surface; all recoverable
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("unknown station {0:?}")]
    UnknownStation(StationId),
    #[error("unknown train {0:?}")]
    UnknownTrain(TrainId),
    #[error("unknown route {0:?}")]
    UnknownRoute(RouteId),
    #[error("unknown production site {0:?}")]
    UnknownSite(SiteId),
    #[error("unknown railway line {0:?}")]
    UnknownLine(LineId),
    #[error("line {0:?} is still used by a route")]
    LineInUse(LineId),
    #[error("station {0:?} still has lines connected")]
    StationHasLines(StationId),
    #[error("unknown resource '{0}'")]
    UnknownResource(String),
    #[error("position {0:?} is outside the map")]
    OutsideMap(Position),
    #[error("position {0:?} is already occupied")]
    PositionOccupied(Position),
    #[error("a route needs at least one line segment")]
    EmptyRoute,
    #[error("route segments do not form a connected chain")]
    DisconnectedSegments,
    #[error("an electrified route may only use electrified lines")]
    RouteNotElectrified,
    #[error("locomotive allows {allowed} carriages, {requested} requested")]
    TooManyCarriages { allowed: u32, requested: u32 },
    #[error(transparent)]
    Assignment(#[from] AssignmentError),
    #[error(transparent)]
    Purchase(#[from] PurchaseError),
    #[error(transparent)]
    Path(#[from] PathError),
}

/// The main simulation world
pub struct SimWorld {
    pub(crate) map: MapSnapshot,
    pub(crate) catalog: ResourceCatalog,
    pub(crate) clock: SimulationClock,
    pub(crate) money: i64,
    pub(crate) bounds: ScenarioBounds,
    pub(crate) sites: BTreeMap<SiteId, ProductionSite>,
    pub(crate) stations: BTreeMap<StationId, Station>,
    pub(crate) network: RailNetwork,
    pub(crate) routes: BTreeMap<RouteId, Route>,
    pub(crate) trains: BTreeMap<TrainId, Train>,
    pub(crate) scheduler: Scheduler,
    pub(crate) ledger: FinancialLedger,
    /// Next ID to assign
    pub(crate) next_id: usize,
}

impl SimWorld {
    pub fn new(map: MapSnapshot, catalog: ResourceCatalog, bounds: ScenarioBounds) -> Self {
        Self {
            map,
            catalog,
            clock: SimulationClock::new(bounds.start),
            money: bounds.starting_money,
            bounds,
            sites: BTreeMap::new(),
            stations: BTreeMap::new(),
            network: RailNetwork::new(),
            routes: BTreeMap::new(),
            trains: BTreeMap::new(),
            scheduler: Scheduler::new(),
            ledger: FinancialLedger::new(),
            next_id: 0,
        }
    }

    pub(crate) fn next_sim_id(&mut self) -> SimId {
        let id = SimId(self.next_id);
        self.next_id += 1;
        id
    }

    // --- queries ---------------------------------------------------------

    pub fn today(&self) -> TimeDate {
        self.clock.today()
    }

    pub fn balance(&self) -> i64 {
        self.money
    }

    pub fn speed(&self) -> u32 {
        self.clock.speed()
    }

    pub fn bounds(&self) -> &ScenarioBounds {
        &self.bounds
    }

    pub fn catalog(&self) -> &ResourceCatalog {
        &self.catalog
    }

    pub fn map(&self) -> &MapSnapshot {
        &self.map
    }

    pub fn ledger(&self) -> &FinancialLedger {
        &self.ledger
    }

    pub fn network(&self) -> &RailNetwork {
        &self.network
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn sites(&self) -> impl Iterator<Item = &ProductionSite> {
        self.sites.values()
    }

    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.stations.values()
    }

    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    pub fn trains(&self) -> impl Iterator<Item = &Train> {
        self.trains.values()
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.get(&id)
    }

    pub fn route(&self, id: RouteId) -> Option<&Route> {
        self.routes.get(&id)
    }

    pub fn train(&self, id: TrainId) -> Option<&Train> {
        self.trains.get(&id)
    }

    pub fn site(&self, id: SiteId) -> Option<&ProductionSite> {
        self.sites.get(&id)
    }

    /// Whether the scenario end date has been reached
    pub fn scenario_finished(&self) -> bool {
        self.clock.today() >= self.bounds.end
    }

    // --- money -----------------------------------------------------------

    /// Deduct a cost, failing closed when the balance is insufficient
    pub(crate) fn spend(&mut self, cost: i64) -> Result<(), PurchaseError> {
        if cost > self.money {
            return Err(PurchaseError::InsufficientFunds {
                cost,
                balance: self.money,
            });
        }
        self.money -= cost;
        Ok(())
    }

    /// Whether a cell is free for new construction or site registration
    fn position_free(&self, position: &Position) -> bool {
        if self.map.obstacles.contains(position) {
            return false;
        }
        if self.sites.values().any(|site| site.position() == *position) {
            return false;
        }
        if self
            .stations
            .values()
            .any(|station| station.position == *position)
        {
            return false;
        }
        !self.network.occupied_cells().contains(position)
    }

    // --- production sites ------------------------------------------------

    /// Register an industry producing the named resource.
    /// Its generation event is created as part of registration.
    pub fn register_industry(
        &mut self,
        name: impl Into<String>,
        position: Position,
        output: &str,
    ) -> Result<SiteId, WorldError> {
        if !self.map.contains(&position) {
            return Err(WorldError::OutsideMap(position));
        }
        if !self.position_free(&position) {
            return Err(WorldError::PositionOccupied(position));
        }
        if self.catalog.get(output).is_none() {
            return Err(WorldError::UnknownResource(output.to_string()));
        }
        let id = SiteId(self.next_sim_id());
        let industry = Industry::new(id, name, position, output);
        self.sites.insert(id, ProductionSite::Industry(industry));
        self.refresh_events();
        Ok(id)
    }

    /// Register a house block consuming the named resources
    pub fn register_house_block(
        &mut self,
        name: impl Into<String>,
        position: Position,
        consumables: Vec<String>,
    ) -> Result<SiteId, WorldError> {
        if !self.map.contains(&position) {
            return Err(WorldError::OutsideMap(position));
        }
        if !self.position_free(&position) {
            return Err(WorldError::PositionOccupied(position));
        }
        for consumable in &consumables {
            if self.catalog.get(consumable).is_none() {
                return Err(WorldError::UnknownResource(consumable.clone()));
            }
        }
        let id = SiteId(self.next_sim_id());
        let block = HouseBlock::new(id, name, position, consumables);
        self.sites.insert(id, ProductionSite::HouseBlock(block));
        self.refresh_events();
        Ok(id)
    }

    /// Remove a production site and its events
    pub fn remove_site(&mut self, site_id: SiteId) -> Result<(), WorldError> {
        self.sites
            .remove(&site_id)
            .ok_or(WorldError::UnknownSite(site_id))?;
        self.refresh_events();
        Ok(())
    }

    /// Rebuild the pending event set from the current sites and refresh
    /// every station's requested-resource list
    pub fn refresh_events(&mut self) {
        self.scheduler
            .refresh_events(&self.sites, &self.catalog, self.clock.today().ordinal());
        self.refresh_station_demand();
    }

    fn refresh_station_demand(&mut self) {
        let requested: Vec<(StationId, Vec<String>)> = self
            .stations
            .values()
            .map(|station| (station.id, demand::requested_resources(station, &self.sites)))
            .collect();
        for (station_id, list) in requested {
            if let Some(station) = self.stations.get_mut(&station_id) {
                station.requested = list;
            }
        }
    }

    // --- stations and track ----------------------------------------------

    /// Build a station, charging its kind's construction cost
    pub fn build_station(
        &mut self,
        kind: StationKind,
        name: impl Into<String>,
        position: Position,
    ) -> Result<StationId, WorldError> {
        if !self.map.contains(&position) {
            return Err(WorldError::OutsideMap(position));
        }
        if !self.position_free(&position) {
            return Err(WorldError::PositionOccupied(position));
        }
        self.spend(kind.construction_cost())?;
        let id = StationId(self.next_sim_id());
        let mut station = Station::new(id, name, kind, position);
        station.requested = demand::requested_resources(&station, &self.sites);
        self.stations.insert(id, station);
        self.network.add_station(id);
        Ok(id)
    }

    /// Attach an upgrade building to a station, charging its cost
    pub fn add_station_building(
        &mut self,
        station_id: StationId,
        building: Building,
    ) -> Result<(), WorldError> {
        if !self.stations.contains_key(&station_id) {
            return Err(WorldError::UnknownStation(station_id));
        }
        self.spend(building.cost())?;
        if let Some(station) = self.stations.get_mut(&station_id) {
            station.buildings.push(building);
        }
        Ok(())
    }

    /// The demand-resolver answer for one station, freshly computed
    pub fn requested_resources(&mut self, station_id: StationId) -> Result<Vec<String>, WorldError> {
        let station = self
            .stations
            .get(&station_id)
            .ok_or(WorldError::UnknownStation(station_id))?;
        let list = demand::requested_resources(station, &self.sites);
        if let Some(station) = self.stations.get_mut(&station_id) {
            station.requested = list.clone();
        }
        Ok(list)
    }

    /// Grid occupancy for planning a line of the given type between two
    /// station cells. Foreign footprints and other-type track block; the
    /// two endpoints and same-type track stay traversable.
    fn occupancy_for(&self, line_type: RailwayLineType, from: Position, to: Position) -> GridOccupancy {
        let mut occupancy = GridOccupancy::new(self.map.width, self.map.height);
        occupancy.blocked.extend(self.map.obstacles.iter().copied());
        occupancy
            .blocked
            .extend(self.sites.values().map(|site| site.position()));
        occupancy.blocked.extend(
            self.stations
                .values()
                .map(|station| station.position)
                .filter(|position| *position != from && *position != to),
        );
        occupancy
            .blocked
            .extend(self.network.cells_of_other_types(line_type));
        occupancy.reusable = self.network.cells_of_type(line_type);
        occupancy.blocked.remove(&from);
        occupancy.blocked.remove(&to);
        occupancy
    }

    /// Plan a track between two stations without building it
    pub fn plan_line(
        &self,
        a: StationId,
        b: StationId,
        line_type: RailwayLineType,
    ) -> Result<TrackPlan, WorldError> {
        let from = self
            .stations
            .get(&a)
            .ok_or(WorldError::UnknownStation(a))?
            .position;
        let to = self
            .stations
            .get(&b)
            .ok_or(WorldError::UnknownStation(b))?
            .position;
        let occupancy = self.occupancy_for(line_type, from, to);
        Ok(plan_track(from, to, line_type, &occupancy)?)
    }

    /// Plan and build a line between two stations, charging its cost
    pub fn build_line(
        &mut self,
        a: StationId,
        b: StationId,
        line_type: RailwayLineType,
    ) -> Result<LineId, WorldError> {
        let plan = self.plan_line(a, b, line_type)?;
        self.spend(plan.cost)?;
        let id = LineId(self.next_sim_id());
        let line = RailwayLine::new(id, (a, b), line_type, plan.path, self.clock.today());
        debug!(
            "built {} line {:?} ({} new cells, {} reused, cost {})",
            line_type.label(),
            id,
            plan.new_cells,
            plan.reused_cells,
            plan.cost
        );
        self.network.add_line(line);
        Ok(id)
    }

    /// Tear up a line; rejected while any route still runs over it
    pub fn remove_line(&mut self, line_id: LineId) -> Result<(), WorldError> {
        if self.network.get_line(line_id).is_none() {
            return Err(WorldError::UnknownLine(line_id));
        }
        if self
            .routes
            .values()
            .any(|route| route.segments.contains(&line_id))
        {
            return Err(WorldError::LineInUse(line_id));
        }
        self.network
            .remove_line(line_id)
            .map_err(|_| WorldError::UnknownLine(line_id))?;
        Ok(())
    }

    /// Demolish a station; rejected while lines are still connected
    pub fn remove_station(&mut self, station_id: StationId) -> Result<(), WorldError> {
        if !self.stations.contains_key(&station_id) {
            return Err(WorldError::UnknownStation(station_id));
        }
        if self.network.station_has_lines(station_id) {
            return Err(WorldError::StationHasLines(station_id));
        }
        self.stations.remove(&station_id);
        self.network.remove_station(station_id);
        Ok(())
    }

    // --- trains and routes -----------------------------------------------

    /// Buy a train, charging locomotive and carriage acquisition costs
    pub fn buy_train(
        &mut self,
        locomotive: Locomotive,
        carriages: Vec<Carriage>,
    ) -> Result<TrainId, WorldError> {
        if carriages.len() as u32 > locomotive.max_carriages {
            return Err(WorldError::TooManyCarriages {
                allowed: locomotive.max_carriages,
                requested: carriages.len() as u32,
            });
        }
        let cost = locomotive.acquisition_cost
            + carriages
                .iter()
                .map(|carriage| carriage.acquisition_cost)
                .sum::<i64>();
        self.spend(cost)?;
        let id = TrainId(self.next_sim_id());
        let train = Train::new(id, locomotive, carriages, self.clock.today());
        self.trains.insert(id, train);
        Ok(id)
    }

    /// Create a route over an existing chain of line segments
    pub fn create_route(
        &mut self,
        name: impl Into<String>,
        segments: Vec<LineId>,
        requires_electric: bool,
    ) -> Result<RouteId, WorldError> {
        if segments.is_empty() {
            return Err(WorldError::EmptyRoute);
        }
        let waypoints = self
            .network
            .chain_waypoints(&segments)
            .ok_or(WorldError::DisconnectedSegments)?;
        if requires_electric {
            let all_electrified = segments.iter().all(|line_id| {
                self.network
                    .get_line(*line_id)
                    .map(|line| line.line_type.is_electrified())
                    .unwrap_or(false)
            });
            if !all_electrified {
                return Err(WorldError::RouteNotElectrified);
            }
        }
        let id = RouteId(self.next_sim_id());
        let route = Route::new(id, name, segments, waypoints, requires_electric);
        self.routes.insert(id, route);
        Ok(id)
    }

    /// Shortest chain of built lines between two stations, if connected
    pub fn suggest_route_segments(&self, a: StationId, b: StationId) -> Option<Vec<LineId>> {
        self.network.find_segment_chain(a, b)
    }

    /// Remove a route, releasing its train first if one is assigned
    pub fn remove_route(&mut self, route_id: RouteId) -> Result<(), WorldError> {
        if !self.routes.contains_key(&route_id) {
            return Err(WorldError::UnknownRoute(route_id));
        }
        let assigned = self
            .routes
            .get(&route_id)
            .and_then(|route| route.assigned_train);
        if assigned.is_some() {
            self.deactivate_route(route_id)?;
        }
        self.routes.remove(&route_id);
        Ok(())
    }

    /// Trains eligible for a route: inactive, and burning a compatible
    /// fuel. An electrified route accepts any inactive train; everything
    /// else excludes electric locomotives.
    pub fn available_trains(&self, route_id: RouteId) -> Result<Vec<TrainId>, WorldError> {
        let route = self
            .routes
            .get(&route_id)
            .ok_or(WorldError::UnknownRoute(route_id))?;
        Ok(self
            .trains
            .values()
            .filter(|train| !train.active)
            .filter(|train| route.requires_electric || train.locomotive.fuel != FuelType::Electricity)
            .map(|train| train.id)
            .collect())
    }

    /// Assign a train and activate the route.
    /// Every precondition is checked before any field is written.
    pub fn activate_route(&mut self, route_id: RouteId, train_id: TrainId) -> Result<(), WorldError> {
        let route = self
            .routes
            .get(&route_id)
            .ok_or(WorldError::UnknownRoute(route_id))?;
        let train = self
            .trains
            .get(&train_id)
            .ok_or(WorldError::UnknownTrain(train_id))?;
        if route.active {
            return Err(AssignmentError::RouteAlreadyActive.into());
        }
        if train.active {
            return Err(AssignmentError::TrainAlreadyAssigned.into());
        }
        if !route.requires_electric && train.locomotive.fuel == FuelType::Electricity {
            return Err(AssignmentError::FuelIncompatible.into());
        }

        let route = self.routes.get_mut(&route_id).expect("checked above");
        route.active = true;
        route.assigned_train = Some(train_id);
        let train = self.trains.get_mut(&train_id).expect("checked above");
        train.active = true;
        info!("route {:?} activated with train {:?}", route_id, train_id);
        Ok(())
    }

    /// Release the route's train and deactivate it
    pub fn deactivate_route(&mut self, route_id: RouteId) -> Result<(), WorldError> {
        let route = self
            .routes
            .get(&route_id)
            .ok_or(WorldError::UnknownRoute(route_id))?;
        let train_id = route
            .assigned_train
            .ok_or(AssignmentError::RouteNotActive)?;

        let route = self.routes.get_mut(&route_id).expect("checked above");
        route.active = false;
        route.assigned_train = None;
        if let Some(train) = self.trains.get_mut(&train_id) {
            train.active = false;
        }
        info!("route {:?} deactivated, train {:?} released", route_id, train_id);
        Ok(())
    }

    // --- clock -----------------------------------------------------------

    pub fn set_speed(&mut self, speed: u32) {
        self.clock.set_speed(speed);
    }

    pub fn increase_speed(&mut self) {
        self.clock.increase_speed();
    }

    pub fn decrease_speed(&mut self) {
        self.clock.decrease_speed();
    }

    /// Advance simulated time by `ticks` days.
    ///
    /// Every crossed day is evaluated individually so no event is skipped
    /// when several speed-multiplier ticks elapse in one host frame.
    /// Advancing an empty world is legal and does nothing beyond moving
    /// the calendar.
    pub fn advance(&mut self, ticks: u32) {
        for _ in 0..ticks {
            let date = self.clock.step_day();
            let day = date.ordinal();
            let outcomes = self
                .scheduler
                .evaluate(day, &mut self.sites, &self.catalog);
            if !outcomes.is_empty() {
                debug!("{}: {} production events fired", date, outcomes.len());
            }
            self.refresh_station_demand();
            self.run_deliveries(date);
            self.accrue_fuel(date);
            if date.month() == 1 && date.day() == 1 {
                self.charge_yearly_maintenance(date.year() - 1);
            }
        }
    }

    // --- daily economy ---------------------------------------------------

    /// Move cargo along every active route: unload what consuming sites
    /// around the waypoints need, then top the train up from producing
    /// sites. Unloading before loading gives cargo a one-day transit.
    fn run_deliveries(&mut self, date: TimeDate) {
        let year = date.year();
        let route_ids: Vec<RouteId> = self.routes.keys().copied().collect();

        for route_id in route_ids {
            let (train_id, waypoints) = match self.routes.get(&route_id) {
                Some(route) if route.active => match route.assigned_train {
                    Some(train_id) => (train_id, route.waypoints.clone()),
                    None => continue,
                },
                _ => continue,
            };

            let mut earned = 0i64;

            // Unload phase: satisfy consumer needs around each waypoint.
            for station_id in &waypoints {
                let nearby = self.sites_in_radius(*station_id);
                for site_id in nearby {
                    let needs = self.site_needs(site_id);
                    for resource in needs {
                        let on_board = self
                            .trains
                            .get(&train_id)
                            .map(|train| train.inventory.quantity(&resource))
                            .unwrap_or(0);
                        if on_board == 0 {
                            continue;
                        }
                        let spec = match self.catalog.get(&resource) {
                            Some(spec) => spec.clone(),
                            None => continue,
                        };
                        let delivered = match self.sites.get_mut(&site_id) {
                            Some(site) => site.inventory_mut().store(&spec, on_board).stored(),
                            None => 0,
                        };
                        if delivered > 0 {
                            if let Some(train) = self.trains.get_mut(&train_id) {
                                train.unload(&resource, delivered);
                            }
                            earned += delivered as i64 * EARNING_PER_UNIT_DELIVERED;
                        }
                    }
                }
            }

            // Load phase: pick up industry output for later delivery.
            'load: for station_id in &waypoints {
                let nearby = self.sites_in_radius(*station_id);
                for site_id in nearby {
                    let output = match self.sites.get(&site_id).and_then(|site| site.as_industry()) {
                        Some(industry) => industry.output.clone(),
                        None => continue,
                    };
                    let stock = self
                        .sites
                        .get(&site_id)
                        .map(|site| site.inventory().quantity(&output))
                        .unwrap_or(0);
                    if stock == 0 {
                        continue;
                    }
                    let space = self
                        .trains
                        .get(&train_id)
                        .map(|train| train.free_capacity())
                        .unwrap_or(0);
                    if space == 0 {
                        break 'load;
                    }
                    let hauled = stock.min(space);
                    if let Some(site) = self.sites.get_mut(&site_id) {
                        site.inventory_mut().take(&output, hauled);
                    }
                    if let Some(train) = self.trains.get_mut(&train_id) {
                        train.load(&output, hauled);
                    }
                }
            }

            if earned > 0 {
                self.money += earned;
                self.ledger.record(year, TransactionCategory::Earning, earned);
            }
        }
    }

    /// Sites within a station's influence radius, in ID order
    fn sites_in_radius(&self, station_id: StationId) -> Vec<SiteId> {
        let station = match self.stations.get(&station_id) {
            Some(station) => station,
            None => return Vec::new(),
        };
        let radius = station.influence_radius();
        self.sites
            .iter()
            .filter(|(_, site)| station.position.distance(&site.position()) <= radius)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Resources a site wants delivered: house-block consumables, or the
    /// recipe inputs of an industry's output
    fn site_needs(&self, site_id: SiteId) -> Vec<String> {
        match self.sites.get(&site_id) {
            Some(ProductionSite::HouseBlock(block)) => block.consumables.clone(),
            Some(ProductionSite::Industry(industry)) => self
                .catalog
                .get(&industry.output)
                .map(|spec| spec.inputs().to_vec())
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }

    /// Daily fuel cost for every train out on an active route
    fn accrue_fuel(&mut self, date: TimeDate) {
        let year = date.year();
        let mut fuel = 0i64;
        for train in self.trains.values() {
            if train.active {
                fuel += train.locomotive.fuel.daily_cost();
            }
        }
        if fuel > 0 {
            self.money -= fuel;
            self.ledger.record(year, TransactionCategory::FuelCost, fuel);
        }
    }

    /// Track and train maintenance for the year that just closed
    fn charge_yearly_maintenance(&mut self, closed_year: i32) {
        let mut track = 0i64;
        for line in self.network.lines() {
            track += line.path.len() as i64 * line.line_type.maintenance_per_cell();
        }
        let mut trains = 0i64;
        for train in self.trains.values() {
            trains += train.locomotive.yearly_maintenance;
        }
        if track > 0 {
            self.money -= track;
            self.ledger
                .record(closed_year, TransactionCategory::TrackMaintenance, track);
        }
        if trains > 0 {
            self.money -= trains;
            self.ledger
                .record(closed_year, TransactionCategory::TrainMaintenance, trains);
        }
        if track > 0 || trains > 0 {
            info!(
                "year {} maintenance: track {}, trains {}",
                closed_year, track, trains
            );
        }
    }

    // --- headless display ------------------------------------------------

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== Railway Simulation Summary ===");
        println!("Date: {}  Speed: {}x", self.clock.today(), self.clock.speed());
        println!("Balance: {}", self.money);
        println!(
            "Stations: {}, Lines: {}, Routes: {}, Trains: {}, Sites: {}",
            self.stations.len(),
            self.network.line_count(),
            self.routes.len(),
            self.trains.len(),
            self.sites.len()
        );
        println!();

        println!("--- Stations ---");
        for station in self.stations.values() {
            println!(
                "  {} ({}) at ({}, {}): requests [{}]",
                station.name,
                station.kind.label(),
                station.position.x,
                station.position.y,
                station.requested.join(", ")
            );
        }

        println!("--- Sites ---");
        for site in self.sites.values() {
            let stock: Vec<String> = site
                .inventory()
                .iter()
                .map(|(name, qty)| format!("{}={}", name, qty))
                .collect();
            println!("  {}: {}", site.name(), stock.join(", "));
        }

        println!("--- Routes ---");
        for route in self.routes.values() {
            println!(
                "  {}: {} segments, {}",
                route.name,
                route.segments.len(),
                match route.assigned_train {
                    Some(train_id) => format!("active with {:?}", train_id),
                    None => "inactive".to_string(),
                }
            );
        }

        println!("--- Ledger ---");
        for record in self.ledger.records() {
            println!(
                "  year {}: earnings {}, expenses {}, net {}",
                record.year,
                record.earning,
                record.total_expenses(),
                record.net_revenue()
            );
        }
        println!();
    }

    /// Draw a text map of the world grid
    pub fn draw_map(&self) {
        let track = self.network.occupied_cells();
        println!("=== World Map ===");
        println!("Legend: S=Station, I=Industry, H=House block, #=Obstacle, ==Track");
        for y in 0..self.map.height {
            let mut row = String::with_capacity(self.map.width as usize);
            for x in 0..self.map.width {
                let position = Position::new(x, y);
                let cell = if self.stations.values().any(|s| s.position == position) {
                    'S'
                } else if self
                    .sites
                    .values()
                    .any(|site| site.position() == position && site.as_industry().is_some())
                {
                    'I'
                } else if self.sites.values().any(|site| site.position() == position) {
                    'H'
                } else if self.map.obstacles.contains(&position) {
                    '#'
                } else if track.contains(&position) {
                    '='
                } else {
                    '.'
                };
                row.push(cell);
            }
            println!("{}", row);
        }
        println!();
    }

    // --- demo scenario ---------------------------------------------------

    /// The resource catalog used by the demo scenario
    pub fn demo_catalog() -> Result<ResourceCatalog> {
        let specs = vec![
            ResourceTypeSpec::primary("Coal", 100, 2, 4),
            ResourceTypeSpec::primary("IronOre", 100, 3, 4),
            ResourceTypeSpec::primary("Grain", 120, 2, 6),
            ResourceTypeSpec::transforming("Steel", 80, 4, 3, vec![
                "Coal".to_string(),
                "IronOre".to_string(),
            ])?,
            ResourceTypeSpec::transforming("Bread", 90, 3, 4, vec!["Grain".to_string()])?,
        ];
        Ok(ResourceCatalog::new(specs)?)
    }

    /// The map used by the demo scenario: a 40x30 grid with a band of
    /// scattered obstacles, deterministic per seed. The band stays clear
    /// of the columns the demo places its sites and stations in.
    pub fn demo_map(seed: u64) -> MapSnapshot {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut obstacles = HashSet::new();
        while obstacles.len() < 15 {
            let x = rng.random_range(8..34);
            let y = rng.random_range(3..27);
            obstacles.insert(Position::new(x, y));
        }
        MapSnapshot::new(40, 30, obstacles)
    }

    /// Build a small working world: mines and a farm in the west feeding a
    /// steelworks and bakery, house blocks in the east, two stations, one
    /// line, one train on an active route.
    pub fn demo_scenario(seed: u64) -> Result<SimWorld> {
        let bounds = ScenarioBounds {
            start: TimeDate::new(1950, 1, 1),
            end: TimeDate::new(1980, 12, 31),
            starting_money: 10_000,
        };
        let mut world = SimWorld::new(Self::demo_map(seed), Self::demo_catalog()?, bounds);

        // Western industrial cluster, all inside the junction's radius.
        world.register_industry("Blackwater Colliery", Position::new(2, 6), "Coal")?;
        world.register_industry("Northfield Ore Pit", Position::new(3, 9), "IronOre")?;
        world.register_industry("Harrow Farm", Position::new(2, 11), "Grain")?;
        world.register_industry("Calder Steelworks", Position::new(5, 5), "Steel")?;
        world.register_industry("Millbrook Bakery", Position::new(6, 11), "Bread")?;

        // Eastern settlement.
        world.register_house_block(
            "Easton Terrace",
            Position::new(37, 8),
            vec!["Bread".to_string(), "Steel".to_string()],
        )?;
        world.register_house_block(
            "Ridgeway Cottages",
            Position::new(36, 12),
            vec!["Bread".to_string()],
        )?;

        let west =
            world.build_station(StationKind::Terminal, "Calder Junction", Position::new(5, 8))?;
        let east = world.build_station(StationKind::Station, "Easton Halt", Position::new(34, 10))?;

        let line = world.build_line(west, east, RailwayLineType::SingleNonElectrified)?;

        let locomotive = Locomotive::new("Class 40", FuelType::Diesel, 2000, 6, 900, 45);
        let carriages = vec![
            Carriage::new("Box van", 12, 60),
            Carriage::new("Box van", 12, 60),
            Carriage::new("Hopper", 16, 80),
        ];
        let train = world.buy_train(locomotive, carriages)?;

        let route = world.create_route("Calder to Easton", vec![line], false)?;
        world.activate_route(route, train)?;

        Ok(world)
    }
}

impl SimWorld {
    /// Restore hook used by snapshots: overwrite the clock wholesale
    pub(crate) fn restore_clock(&mut self, today: TimeDate, speed: u32) {
        self.clock = SimulationClock::new(today);
        self.clock.set_speed(speed);
    }

    /// Restore hook used by snapshots: overwrite the balance
    pub(crate) fn restore_money(&mut self, money: i64) {
        self.money = money;
    }
}
