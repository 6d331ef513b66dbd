//! Locomotives, carriages and trains

use serde::{Deserialize, Serialize};

use super::resource::{Inventory, StoreOutcome};
use super::types::{TimeDate, TrainId};

/// Locomotive fuel; electric locomotives only run on electrified routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuelType {
    Diesel,
    Steam,
    Electricity,
}

impl FuelType {
    /// Daily running cost while the train is assigned to an active route
    pub fn daily_cost(&self) -> i64 {
        match self {
            FuelType::Diesel => 4,
            FuelType::Steam => 6,
            FuelType::Electricity => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FuelType::Diesel => "diesel",
            FuelType::Steam => "steam",
            FuelType::Electricity => "electric",
        }
    }
}

/// An engine specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Locomotive {
    pub name: String,
    pub fuel: FuelType,
    pub power: u32,
    pub max_carriages: u32,
    pub acquisition_cost: i64,
    pub yearly_maintenance: i64,
}

impl Locomotive {
    pub fn new(
        name: impl Into<String>,
        fuel: FuelType,
        power: u32,
        max_carriages: u32,
        acquisition_cost: i64,
        yearly_maintenance: i64,
    ) -> Self {
        Self {
            name: name.into(),
            fuel,
            power,
            max_carriages,
            acquisition_cost,
            yearly_maintenance,
        }
    }
}

/// A freight carriage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Carriage {
    pub name: String,
    pub capacity: u32,
    pub acquisition_cost: i64,
}

impl Carriage {
    pub fn new(name: impl Into<String>, capacity: u32, acquisition_cost: i64) -> Self {
        Self {
            name: name.into(),
            capacity,
            acquisition_cost,
        }
    }
}

/// A locomotive with its carriages and in-transit cargo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Train {
    pub id: TrainId,
    pub locomotive: Locomotive,
    pub carriages: Vec<Carriage>,
    /// Cargo on board; total units never exceed the carriage capacity sum
    pub inventory: Inventory,
    pub active: bool,
    pub acquired: TimeDate,
}

impl Train {
    pub fn new(id: TrainId, locomotive: Locomotive, carriages: Vec<Carriage>, acquired: TimeDate) -> Self {
        Self {
            id,
            locomotive,
            carriages,
            inventory: Inventory::new(),
            active: false,
            acquired,
        }
    }

    /// Total cargo capacity: the sum of carriage capacities
    pub fn cargo_capacity(&self) -> u32 {
        self.carriages.iter().map(|carriage| carriage.capacity).sum()
    }

    /// Free cargo space across all carriages
    pub fn free_capacity(&self) -> u32 {
        self.cargo_capacity().saturating_sub(self.inventory.total())
    }

    /// Load cargo, capped by the remaining carriage capacity
    pub fn load(&mut self, resource: &str, quantity: u32) -> StoreOutcome {
        let space = self.free_capacity();
        if space == 0 {
            return StoreOutcome::Full;
        }
        let loaded = quantity.min(space);
        self.inventory.store_uncapped(resource, loaded);
        if loaded < quantity {
            StoreOutcome::Partial {
                stored: loaded,
                rejected: quantity - loaded,
            }
        } else {
            StoreOutcome::Stored(loaded)
        }
    }

    /// Unload up to `quantity` units of a resource
    pub fn unload(&mut self, resource: &str, quantity: u32) -> u32 {
        self.inventory.take(resource, quantity)
    }

    pub fn total_cost(&self) -> i64 {
        self.locomotive.acquisition_cost
            + self
                .carriages
                .iter()
                .map(|carriage| carriage.acquisition_cost)
                .sum::<i64>()
    }
}
