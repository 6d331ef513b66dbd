//! Standalone railway simulation module
//!
//! This module contains all the core simulation logic and runs
//! independently of any rendering or persistence layer. It can be
//! exercised from the console without booting a full game.

mod clock;
mod demand;
mod ledger;
mod pathfinder;
mod railway;
mod resource;
mod route;
mod scheduler;
mod site;
mod snapshot;
mod station;
mod train;
mod types;
mod world;

pub use clock::{SimulationClock, MAX_SPEED, MIN_SPEED};
pub use demand::requested_resources;
pub use ledger::{FinancialLedger, TransactionCategory, YearRecord};
pub use pathfinder::{plan_track, GridOccupancy, PathError, TrackPlan};
pub use railway::{RailNetwork, RailwayLine, RailwayLineType};
pub use resource::{
    Inventory, ResourceCatalog, ResourceKind, ResourceTypeSpec, SpecError, StoreOutcome,
};
pub use route::{AssignmentError, Route};
pub use scheduler::{EventKind, EventOutcome, ProductionEvent, Scheduler};
pub use site::{HouseBlock, Industry, ProductionSite};
pub use snapshot::{SaveData, CURRENT_SAVE_VERSION};
pub use station::{Building, Station, StationKind};
pub use train::{Carriage, FuelType, Locomotive, Train};
pub use types::{
    LineId, Position, RouteId, SimId, SiteId, StationId, TimeDate, TrainId, DAYS_PER_YEAR,
};
pub use world::{
    MapSnapshot, PurchaseError, ScenarioBounds, SimWorld, WorldError, EARNING_PER_UNIT_DELIVERED,
};
