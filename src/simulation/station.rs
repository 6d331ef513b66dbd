//! Stations and their upgrade buildings

use serde::{Deserialize, Serialize};

use super::types::{Position, StationId};

/// Station kind; each kind fixes the influence radius and construction cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StationKind {
    Depot,
    Station,
    Terminal,
}

impl StationKind {
    /// Distance within which production sites feed this station's demand
    pub fn influence_radius(&self) -> f64 {
        match self {
            StationKind::Depot => 3.0,
            StationKind::Station => 4.0,
            StationKind::Terminal => 5.0,
        }
    }

    pub fn construction_cost(&self) -> i64 {
        match self {
            StationKind::Depot => 50,
            StationKind::Station => 100,
            StationKind::Terminal => 200,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StationKind::Depot => "depot",
            StationKind::Station => "station",
            StationKind::Terminal => "terminal",
        }
    }
}

/// Upgrade structures a station can acquire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Building {
    TelegraphOffice,
    Cafe,
    Silo,
    PassengerTerminal,
}

impl Building {
    pub fn cost(&self) -> i64 {
        match self {
            Building::TelegraphOffice => 30,
            Building::Cafe => 25,
            Building::Silo => 40,
            Building::PassengerTerminal => 60,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Building::TelegraphOffice => "telegraph office",
            Building::Cafe => "cafe",
            Building::Silo => "silo",
            Building::PassengerTerminal => "passenger terminal",
        }
    }
}

/// A player-built station on the grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub kind: StationKind,
    pub position: Position,
    /// Latest demand-resolver answer; recomputed, never authoritative
    pub requested: Vec<String>,
    pub buildings: Vec<Building>,
}

impl Station {
    pub fn new(id: StationId, name: impl Into<String>, kind: StationKind, position: Position) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            position,
            requested: Vec::new(),
            buildings: Vec::new(),
        }
    }

    pub fn influence_radius(&self) -> f64 {
        self.kind.influence_radius()
    }
}
