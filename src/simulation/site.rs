//! Production sites: industries and house blocks
//!
//! A closed tagged variant replaces runtime type inspection; both kinds
//! expose the same capability surface (id, name, position, inventory).

use serde::{Deserialize, Serialize};

use super::resource::Inventory;
use super::types::{Position, SiteId};

/// An industry that generates one output resource on its spec's interval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Industry {
    pub id: SiteId,
    pub name: String,
    pub position: Position,
    /// Name of the resource this industry produces
    pub output: String,
    pub inventory: Inventory,
}

impl Industry {
    pub fn new(id: SiteId, name: impl Into<String>, position: Position, output: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            output: output.into(),
            inventory: Inventory::new(),
        }
    }
}

/// A house block with a fixed list of consumable resources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseBlock {
    pub id: SiteId,
    pub name: String,
    pub position: Position,
    /// Names of the transforming resources this block draws down
    pub consumables: Vec<String>,
    pub inventory: Inventory,
}

impl HouseBlock {
    pub fn new(
        id: SiteId,
        name: impl Into<String>,
        position: Position,
        consumables: Vec<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            consumables,
            inventory: Inventory::new(),
        }
    }
}

/// A production site in the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProductionSite {
    Industry(Industry),
    HouseBlock(HouseBlock),
}

impl ProductionSite {
    pub fn id(&self) -> SiteId {
        match self {
            ProductionSite::Industry(industry) => industry.id,
            ProductionSite::HouseBlock(block) => block.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ProductionSite::Industry(industry) => &industry.name,
            ProductionSite::HouseBlock(block) => &block.name,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            ProductionSite::Industry(industry) => industry.position,
            ProductionSite::HouseBlock(block) => block.position,
        }
    }

    pub fn inventory(&self) -> &Inventory {
        match self {
            ProductionSite::Industry(industry) => &industry.inventory,
            ProductionSite::HouseBlock(block) => &block.inventory,
        }
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        match self {
            ProductionSite::Industry(industry) => &mut industry.inventory,
            ProductionSite::HouseBlock(block) => &mut block.inventory,
        }
    }

    pub fn as_industry(&self) -> Option<&Industry> {
        match self {
            ProductionSite::Industry(industry) => Some(industry),
            ProductionSite::HouseBlock(_) => None,
        }
    }

    pub fn as_house_block(&self) -> Option<&HouseBlock> {
        match self {
            ProductionSite::Industry(_) => None,
            ProductionSite::HouseBlock(block) => Some(block),
        }
    }
}
