//! Snapshot DTOs for persisting a simulation run
//!
//! The persistence collaborator owns the on-disk format; this module gives
//! it an explicit, versioned structure capturing exactly the simulation
//! state that must round-trip: inventories, money, active flags and
//! pending-event due days. Nothing here serializes live object graphs.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use super::ledger::YearRecord;
use super::railway::{RailwayLine, RailwayLineType};
use super::resource::ResourceCatalog;
use super::route::Route;
use super::scheduler::{EventKind, ProductionEvent};
use super::site::{HouseBlock, Industry, ProductionSite};
use super::station::{Building, Station, StationKind};
use super::train::{Carriage, Locomotive, Train};
use super::types::{LineId, Position, RouteId, SimId, SiteId, StationId, TimeDate, TrainId};
use super::world::{MapSnapshot, ScenarioBounds, SimWorld};

/// Current snapshot schema version.
/// v1 = date, speed, money, bounds, sites, stations, lines, routes,
///      trains, pending events, ledger records
pub const CURRENT_SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveBounds {
    pub start_ordinal: i64,
    pub end_ordinal: i64,
    pub starting_money: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveSite {
    pub id: usize,
    pub name: String,
    pub x: i32,
    pub y: i32,
    /// Set for industries; `None` marks a house block
    pub industry_output: Option<String>,
    pub consumables: Vec<String>,
    pub inventory: Vec<(String, u32)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveStation {
    pub id: usize,
    pub name: String,
    pub kind: StationKind,
    pub x: i32,
    pub y: i32,
    pub requested: Vec<String>,
    pub buildings: Vec<Building>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveLine {
    pub id: usize,
    pub station_a: usize,
    pub station_b: usize,
    pub line_type: RailwayLineType,
    pub path: Vec<(i32, i32)>,
    pub built_ordinal: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveRoute {
    pub id: usize,
    pub name: String,
    pub segments: Vec<usize>,
    pub waypoints: Vec<usize>,
    pub requires_electric: bool,
    pub active: bool,
    pub assigned_train: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveTrain {
    pub id: usize,
    pub locomotive: Locomotive,
    pub carriages: Vec<Carriage>,
    pub cargo: Vec<(String, u32)>,
    pub active: bool,
    pub acquired_ordinal: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveEvent {
    pub site: usize,
    pub resource: String,
    pub kind: EventKind,
    pub due: i64,
    pub interval_days: u32,
    pub quantity: u32,
}

/// A complete, self-contained snapshot of one simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveData {
    /// Snapshot schema version; defaults to 0 for pre-versioning saves
    #[serde(default)]
    pub version: u32,
    pub date_ordinal: i64,
    pub speed: u32,
    pub money: i64,
    pub bounds: SaveBounds,
    pub next_id: usize,
    pub sites: Vec<SaveSite>,
    pub stations: Vec<SaveStation>,
    pub lines: Vec<SaveLine>,
    pub routes: Vec<SaveRoute>,
    pub trains: Vec<SaveTrain>,
    pub events: Vec<SaveEvent>,
    pub ledger: Vec<YearRecord>,
}

impl SaveData {
    /// Capture the persistable state of a world
    pub fn capture(world: &SimWorld) -> Self {
        let sites = world
            .sites()
            .map(|site| {
                let inventory = site
                    .inventory()
                    .iter()
                    .map(|(name, qty)| (name.to_string(), qty))
                    .collect();
                match site {
                    ProductionSite::Industry(industry) => SaveSite {
                        id: industry.id.0 .0,
                        name: industry.name.clone(),
                        x: industry.position.x,
                        y: industry.position.y,
                        industry_output: Some(industry.output.clone()),
                        consumables: Vec::new(),
                        inventory,
                    },
                    ProductionSite::HouseBlock(block) => SaveSite {
                        id: block.id.0 .0,
                        name: block.name.clone(),
                        x: block.position.x,
                        y: block.position.y,
                        industry_output: None,
                        consumables: block.consumables.clone(),
                        inventory,
                    },
                }
            })
            .collect();

        let stations = world
            .stations()
            .map(|station| SaveStation {
                id: station.id.0 .0,
                name: station.name.clone(),
                kind: station.kind,
                x: station.position.x,
                y: station.position.y,
                requested: station.requested.clone(),
                buildings: station.buildings.clone(),
            })
            .collect();

        let mut lines: Vec<SaveLine> = world
            .network()
            .lines()
            .map(|line| SaveLine {
                id: line.id.0 .0,
                station_a: line.stations.0 .0 .0,
                station_b: line.stations.1 .0 .0,
                line_type: line.line_type,
                path: line.path.iter().map(|cell| (cell.x, cell.y)).collect(),
                built_ordinal: line.built.ordinal(),
            })
            .collect();
        lines.sort_by_key(|line| line.id);

        let routes = world
            .routes()
            .map(|route| SaveRoute {
                id: route.id.0 .0,
                name: route.name.clone(),
                segments: route.segments.iter().map(|line_id| line_id.0 .0).collect(),
                waypoints: route
                    .waypoints
                    .iter()
                    .map(|station_id| station_id.0 .0)
                    .collect(),
                requires_electric: route.requires_electric,
                active: route.active,
                assigned_train: route.assigned_train.map(|train_id| train_id.0 .0),
            })
            .collect();

        let trains = world
            .trains()
            .map(|train| SaveTrain {
                id: train.id.0 .0,
                locomotive: train.locomotive.clone(),
                carriages: train.carriages.clone(),
                cargo: train
                    .inventory
                    .iter()
                    .map(|(name, qty)| (name.to_string(), qty))
                    .collect(),
                active: train.active,
                acquired_ordinal: train.acquired.ordinal(),
            })
            .collect();

        let events = world
            .scheduler()
            .events()
            .iter()
            .map(|event| SaveEvent {
                site: event.site.0 .0,
                resource: event.resource.clone(),
                kind: event.kind,
                due: event.due,
                interval_days: event.interval_days,
                quantity: event.quantity,
            })
            .collect();

        Self {
            version: CURRENT_SAVE_VERSION,
            date_ordinal: world.today().ordinal(),
            speed: world.speed(),
            money: world.balance(),
            bounds: SaveBounds {
                start_ordinal: world.bounds().start.ordinal(),
                end_ordinal: world.bounds().end.ordinal(),
                starting_money: world.bounds().starting_money,
            },
            next_id: world.next_id,
            sites,
            stations,
            lines,
            routes,
            trains,
            events,
            ledger: world.ledger().records().copied().collect(),
        }
    }

    /// Rebuild a world from this snapshot.
    ///
    /// The map and resource catalog are bootstrap data owned by the world
    /// collaborator and are supplied from outside. Inventories are
    /// backfilled through the uncapped path; the capped invariant holds
    /// again as soon as normal insertions resume.
    pub fn restore(self, map: MapSnapshot, catalog: ResourceCatalog) -> Result<SimWorld> {
        if self.version > CURRENT_SAVE_VERSION {
            bail!(
                "snapshot version {} is newer than supported version {}",
                self.version,
                CURRENT_SAVE_VERSION
            );
        }

        let bounds = ScenarioBounds {
            start: TimeDate::from_ordinal(self.bounds.start_ordinal),
            end: TimeDate::from_ordinal(self.bounds.end_ordinal),
            starting_money: self.bounds.starting_money,
        };
        let mut world = SimWorld::new(map, catalog, bounds);
        world.restore_clock(TimeDate::from_ordinal(self.date_ordinal), self.speed);
        world.restore_money(self.money);
        world.next_id = self.next_id;

        for save in self.sites {
            let id = SiteId(SimId(save.id));
            let position = Position::new(save.x, save.y);
            let mut site = match save.industry_output {
                Some(output) => {
                    world
                        .catalog
                        .get(&output)
                        .with_context(|| format!("snapshot references unknown resource '{}'", output))?;
                    ProductionSite::Industry(Industry::new(id, save.name, position, output))
                }
                None => ProductionSite::HouseBlock(HouseBlock::new(
                    id,
                    save.name,
                    position,
                    save.consumables,
                )),
            };
            for (resource, quantity) in save.inventory {
                site.inventory_mut().store_uncapped(&resource, quantity);
            }
            world.sites.insert(id, site);
        }

        for save in self.stations {
            let id = StationId(SimId(save.id));
            let mut station = Station::new(id, save.name, save.kind, Position::new(save.x, save.y));
            station.requested = save.requested;
            station.buildings = save.buildings;
            world.stations.insert(id, station);
            world.network.add_station(id);
        }

        for save in self.lines {
            let id = LineId(SimId(save.id));
            let line = RailwayLine::new(
                id,
                (
                    StationId(SimId(save.station_a)),
                    StationId(SimId(save.station_b)),
                ),
                save.line_type,
                save.path
                    .into_iter()
                    .map(|(x, y)| Position::new(x, y))
                    .collect(),
                TimeDate::from_ordinal(save.built_ordinal),
            );
            world.network.add_line(line);
        }

        for save in self.routes {
            let id = RouteId(SimId(save.id));
            let mut route = Route::new(
                id,
                save.name,
                save.segments.into_iter().map(|raw| LineId(SimId(raw))).collect(),
                save.waypoints
                    .into_iter()
                    .map(|raw| StationId(SimId(raw)))
                    .collect(),
                save.requires_electric,
            );
            route.active = save.active;
            route.assigned_train = save.assigned_train.map(|raw| TrainId(SimId(raw)));
            world.routes.insert(id, route);
        }

        for save in self.trains {
            let id = TrainId(SimId(save.id));
            let mut train = Train::new(
                id,
                save.locomotive,
                save.carriages,
                TimeDate::from_ordinal(save.acquired_ordinal),
            );
            for (resource, quantity) in save.cargo {
                train.inventory.store_uncapped(&resource, quantity);
            }
            train.active = save.active;
            world.trains.insert(id, train);
        }

        let events = self
            .events
            .into_iter()
            .map(|save| ProductionEvent {
                site: SiteId(SimId(save.site)),
                resource: save.resource,
                kind: save.kind,
                due: save.due,
                interval_days: save.interval_days,
                quantity: save.quantity,
            })
            .collect();
        world.scheduler.restore_events(events);

        for record in self.ledger {
            world.ledger.restore_record(record);
        }

        Ok(world)
    }
}
