//! Production scheduler
//!
//! Owns the recurring generation/consumption events and fires the ones
//! that have come due. Events are rescheduled forward, never destroyed.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::resource::{ResourceCatalog, StoreOutcome};
use super::site::ProductionSite;
use super::types::SiteId;

/// What a scheduled event does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    /// Add a batch of the resource to the owning site's inventory
    Generation,
    /// Draw a batch of the resource out of the owning site's inventory
    Consumption,
}

/// A recurring occurrence tied to a production site
///
/// The (site, resource, kind) triple identifies an event across refreshes;
/// the due day is the only field that moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionEvent {
    pub site: SiteId,
    pub resource: String,
    pub kind: EventKind,
    /// Day ordinal at which the event next fires
    pub due: i64,
    pub interval_days: u32,
    pub quantity: u32,
}

/// What happened when one event fired
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventOutcome {
    pub site: SiteId,
    pub resource: String,
    pub kind: EventKind,
    /// Units actually added or removed
    pub moved: u32,
    /// Whether a generation hit the storage cap
    pub capped: bool,
}

/// The pending event set, evaluated in insertion order
#[derive(Debug, Default, Clone)]
pub struct Scheduler {
    events: Vec<ProductionEvent>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ProductionEvent] {
        &self.events
    }

    /// Restore the event set from a snapshot; bypasses refresh bookkeeping
    pub fn restore_events(&mut self, events: Vec<ProductionEvent>) {
        self.events = events;
    }

    /// Rebuild the event set from the current production sites.
    ///
    /// One generation event per industry output, one consumption event per
    /// house-block consumable. Idempotent: an event whose (site, resource,
    /// kind) key already exists keeps its due day; events for removed sites
    /// are dropped; new events first come due one interval from `today`.
    pub fn refresh_events(
        &mut self,
        sites: &BTreeMap<SiteId, ProductionSite>,
        catalog: &ResourceCatalog,
        today: i64,
    ) {
        let existing: BTreeMap<(SiteId, String, EventKind), i64> = self
            .events
            .iter()
            .map(|event| ((event.site, event.resource.clone(), event.kind), event.due))
            .collect();

        let mut rebuilt = Vec::new();
        for site in sites.values() {
            match site {
                ProductionSite::Industry(industry) => {
                    self.push_event(
                        &mut rebuilt,
                        &existing,
                        catalog,
                        industry.id,
                        &industry.output,
                        EventKind::Generation,
                        today,
                    );
                }
                ProductionSite::HouseBlock(block) => {
                    for consumable in &block.consumables {
                        self.push_event(
                            &mut rebuilt,
                            &existing,
                            catalog,
                            block.id,
                            consumable,
                            EventKind::Consumption,
                            today,
                        );
                    }
                }
            }
        }
        self.events = rebuilt;
    }

    #[allow(clippy::too_many_arguments)]
    fn push_event(
        &self,
        rebuilt: &mut Vec<ProductionEvent>,
        existing: &BTreeMap<(SiteId, String, EventKind), i64>,
        catalog: &ResourceCatalog,
        site: SiteId,
        resource: &str,
        kind: EventKind,
        today: i64,
    ) {
        let spec = match catalog.get(resource) {
            Some(spec) => spec,
            None => {
                debug!("skipping event for unknown resource '{}'", resource);
                return;
            }
        };
        let key = (site, resource.to_string(), kind);
        let due = existing
            .get(&key)
            .copied()
            .unwrap_or(today + spec.interval_days() as i64);
        rebuilt.push(ProductionEvent {
            site,
            resource: resource.to_string(),
            kind,
            due,
            interval_days: spec.interval_days(),
            quantity: spec.quantity_per_batch(),
        });
    }

    /// Fire every event due on or before `day`, in insertion order, and
    /// reschedule each one forward by its interval.
    ///
    /// Generations store through the capped path; hitting the cap is a
    /// logged partial-fill outcome, never an error. Transforming outputs
    /// additionally consume one unit of every recipe input per unit
    /// produced, limited by the scarcest input on hand.
    pub fn evaluate(
        &mut self,
        day: i64,
        sites: &mut BTreeMap<SiteId, ProductionSite>,
        catalog: &ResourceCatalog,
    ) -> Vec<EventOutcome> {
        let mut outcomes = Vec::new();

        for event in &mut self.events {
            if event.due > day {
                continue;
            }
            let site = match sites.get_mut(&event.site) {
                Some(site) => site,
                None => {
                    // Site was removed since the last refresh; push the
                    // event forward and let the next refresh drop it.
                    event.due = day + event.interval_days as i64;
                    continue;
                }
            };
            let spec = match catalog.get(&event.resource) {
                Some(spec) => spec,
                None => {
                    event.due = day + event.interval_days as i64;
                    continue;
                }
            };

            let outcome = match event.kind {
                EventKind::Generation => {
                    let producible = if spec.is_transforming() {
                        // Limited by the scarcest recipe input on hand.
                        let inventory = site.inventory();
                        spec.inputs()
                            .iter()
                            .map(|input| inventory.quantity(input))
                            .min()
                            .unwrap_or(0)
                            .min(event.quantity)
                    } else {
                        event.quantity
                    };

                    let store = if producible > 0 {
                        site.inventory_mut().store(spec, producible)
                    } else {
                        StoreOutcome::Stored(0)
                    };
                    let stored = store.stored();
                    if stored > 0 && spec.is_transforming() {
                        for input in spec.inputs() {
                            site.inventory_mut().take(input, stored);
                        }
                    }
                    let capped = matches!(store, StoreOutcome::Full | StoreOutcome::Partial { .. });
                    match store {
                        StoreOutcome::Full => {
                            debug!(
                                "{} storage full at {}; generation skipped",
                                event.resource,
                                site.name()
                            );
                        }
                        StoreOutcome::Partial { stored, rejected } => {
                            debug!(
                                "{} storage near cap at {}; stored {} rejected {}",
                                event.resource,
                                site.name(),
                                stored,
                                rejected
                            );
                        }
                        StoreOutcome::Stored(_) => {}
                    }
                    EventOutcome {
                        site: event.site,
                        resource: event.resource.clone(),
                        kind: event.kind,
                        moved: stored,
                        capped,
                    }
                }
                EventKind::Consumption => {
                    let taken = site.inventory_mut().take(&event.resource, event.quantity);
                    EventOutcome {
                        site: event.site,
                        resource: event.resource.clone(),
                        kind: event.kind,
                        moved: taken,
                        capped: false,
                    }
                }
            };

            outcomes.push(outcome);
            event.due = day + event.interval_days as i64;
        }

        outcomes
    }
}
