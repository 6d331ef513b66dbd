//! Resource type definitions and inventories
//!
//! Resource specs are created once at world bootstrap and are immutable
//! afterwards; inventories are the only mutable runtime state here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration faults raised while building the resource catalog.
/// These abort world initialization; they are never runtime errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpecError {
    #[error("transforming resource '{0}' declared with no recipe inputs")]
    MissingRecipeInputs(String),
    #[error("resource '{0}' declared more than once")]
    DuplicateName(String),
    #[error("resource '{recipe}' references unknown input '{input}'")]
    UnknownInput { recipe: String, input: String },
    #[error("recipe cycle detected through resource '{0}'")]
    RecipeCycle(String),
}

/// How a resource comes into existence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Generated from nothing by primary industries (mines, farms)
    Primary,
    /// Produced by transforming the named input resources
    Transforming { inputs: Vec<String> },
}

/// Immutable definition of a resource type
///
/// The name is the unique key; inventories and events refer to specs by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTypeSpec {
    name: String,
    max_storage: u32,
    interval_days: u32,
    quantity_per_batch: u32,
    kind: ResourceKind,
}

impl ResourceTypeSpec {
    /// A primary resource, generated without inputs
    pub fn primary(
        name: impl Into<String>,
        max_storage: u32,
        interval_days: u32,
        quantity_per_batch: u32,
    ) -> Self {
        Self {
            name: name.into(),
            max_storage,
            interval_days: interval_days.max(1),
            quantity_per_batch,
            kind: ResourceKind::Primary,
        }
    }

    /// A transforming resource; at least one input is required, a recipe
    /// with no inputs is meaningless and rejected at construction time.
    pub fn transforming(
        name: impl Into<String>,
        max_storage: u32,
        interval_days: u32,
        quantity_per_batch: u32,
        inputs: Vec<String>,
    ) -> Result<Self, SpecError> {
        let name = name.into();
        if inputs.is_empty() {
            return Err(SpecError::MissingRecipeInputs(name));
        }
        Ok(Self {
            name,
            max_storage,
            interval_days: interval_days.max(1),
            quantity_per_batch,
            kind: ResourceKind::Transforming { inputs },
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_storage(&self) -> u32 {
        self.max_storage
    }

    pub fn interval_days(&self) -> u32 {
        self.interval_days
    }

    pub fn quantity_per_batch(&self) -> u32 {
        self.quantity_per_batch
    }

    pub fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    /// Recipe inputs, empty for primary resources
    pub fn inputs(&self) -> &[String] {
        match &self.kind {
            ResourceKind::Primary => &[],
            ResourceKind::Transforming { inputs } => inputs,
        }
    }

    pub fn is_transforming(&self) -> bool {
        matches!(self.kind, ResourceKind::Transforming { .. })
    }
}

/// All resource specs for a scenario, keyed by name
///
/// Built once at bootstrap; validation rejects duplicate names, unknown
/// recipe inputs and recipe cycles before the world ever ticks.
#[derive(Debug, Clone)]
pub struct ResourceCatalog {
    specs: BTreeMap<String, ResourceTypeSpec>,
}

impl ResourceCatalog {
    pub fn new(specs: Vec<ResourceTypeSpec>) -> Result<Self, SpecError> {
        let mut map = BTreeMap::new();
        for spec in specs {
            if map.contains_key(spec.name()) {
                return Err(SpecError::DuplicateName(spec.name().to_string()));
            }
            map.insert(spec.name().to_string(), spec);
        }
        let catalog = Self { specs: map };
        catalog.validate_recipes()?;
        Ok(catalog)
    }

    /// Recipes may reference other transforming resources; the reference
    /// graph must be a DAG and every input must name a known resource.
    fn validate_recipes(&self) -> Result<(), SpecError> {
        for spec in self.specs.values() {
            for input in spec.inputs() {
                if !self.specs.contains_key(input) {
                    return Err(SpecError::UnknownInput {
                        recipe: spec.name().to_string(),
                        input: input.clone(),
                    });
                }
            }
        }
        // DFS from each transforming spec; a name recurring on the current
        // walk is a cycle.
        for spec in self.specs.values() {
            let mut walk = Vec::new();
            self.walk_recipe(spec.name(), &mut walk)?;
        }
        Ok(())
    }

    fn walk_recipe<'a>(&'a self, name: &'a str, walk: &mut Vec<&'a str>) -> Result<(), SpecError> {
        if walk.contains(&name) {
            return Err(SpecError::RecipeCycle(name.to_string()));
        }
        walk.push(name);
        if let Some(spec) = self.specs.get(name) {
            for input in spec.inputs() {
                self.walk_recipe(input, walk)?;
            }
        }
        walk.pop();
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ResourceTypeSpec> {
        self.specs.get(name)
    }

    pub fn specs(&self) -> impl Iterator<Item = &ResourceTypeSpec> {
        self.specs.values()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// Result of a capped inventory insertion
///
/// Overflow is a partial-fill outcome, not an error; callers log it and
/// carry on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    /// Everything fit below the cap
    Stored(u32),
    /// Some units fit, the rest were rejected at the cap
    Partial { stored: u32, rejected: u32 },
    /// Storage was already at the cap; nothing was added
    Full,
}

impl StoreOutcome {
    /// Units actually added by the insertion
    pub fn stored(&self) -> u32 {
        match self {
            StoreOutcome::Stored(n) => *n,
            StoreOutcome::Partial { stored, .. } => *stored,
            StoreOutcome::Full => 0,
        }
    }
}

/// Per-site stock of resources, keyed by resource name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    quantities: BTreeMap<String, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quantity(&self, name: &str) -> u32 {
        self.quantities.get(name).copied().unwrap_or(0)
    }

    /// Total units across all resource types
    pub fn total(&self) -> u32 {
        self.quantities.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.quantities.iter().map(|(name, qty)| (name.as_str(), *qty))
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.values().all(|qty| *qty == 0)
    }

    /// Capped insertion: the stored quantity never exceeds the spec's
    /// max storage. Returns how much actually fit.
    pub fn store(&mut self, spec: &ResourceTypeSpec, quantity: u32) -> StoreOutcome {
        let current = self.quantity(spec.name());
        let space = spec.max_storage().saturating_sub(current);
        if space == 0 {
            return StoreOutcome::Full;
        }
        let stored = quantity.min(space);
        *self.quantities.entry(spec.name().to_string()).or_insert(0) += stored;
        if stored < quantity {
            StoreOutcome::Partial {
                stored,
                rejected: quantity - stored,
            }
        } else {
            StoreOutcome::Stored(stored)
        }
    }

    /// Uncapped insertion used only when backfilling restored state;
    /// intentionally bypasses the storage cap.
    pub fn store_uncapped(&mut self, name: &str, quantity: u32) {
        if quantity == 0 {
            return;
        }
        *self.quantities.entry(name.to_string()).or_insert(0) += quantity;
    }

    /// Remove up to `quantity` units; returns the amount actually removed
    pub fn take(&mut self, name: &str, quantity: u32) -> u32 {
        match self.quantities.get_mut(name) {
            Some(current) => {
                let taken = quantity.min(*current);
                *current -= taken;
                if *current == 0 {
                    self.quantities.remove(name);
                }
                taken
            }
            None => 0,
        }
    }
}
