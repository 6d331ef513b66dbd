//! Station demand resolver
//!
//! Determines which resources a station should request from the production
//! sites inside its influence radius. Recomputed on demand; the surrounding
//! world can change between calls, so nothing here is cached.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

use super::site::ProductionSite;
use super::station::Station;
use super::types::SiteId;

/// Resources a station should request: the union of industry outputs and
/// house-block consumables for every site within the influence radius
/// (Euclidean distance, inclusive). A station with no reachable site yields
/// an empty list.
///
/// The result is deduplicated and ordered by (distance of the nearest
/// offering site, name), which keeps the answer identical across runs.
pub fn requested_resources(
    station: &Station,
    sites: &BTreeMap<SiteId, ProductionSite>,
) -> Vec<String> {
    let radius = station.influence_radius();
    let mut nearest: BTreeMap<String, f64> = BTreeMap::new();

    for site in sites.values() {
        let distance = station.position.distance(&site.position());
        if distance > radius {
            continue;
        }
        for resource in site_resources(site) {
            let entry = nearest.entry(resource.to_string()).or_insert(distance);
            if distance < *entry {
                *entry = distance;
            }
        }
    }

    let mut ordered: Vec<(OrderedFloat<f64>, String)> = nearest
        .into_iter()
        .map(|(name, distance)| (OrderedFloat(distance), name))
        .collect();
    ordered.sort();
    ordered.into_iter().map(|(_, name)| name).collect()
}

/// The resource names a single site contributes to station demand
fn site_resources(site: &ProductionSite) -> Vec<&str> {
    match site {
        ProductionSite::Industry(industry) => vec![industry.output.as_str()],
        ProductionSite::HouseBlock(block) => {
            block.consumables.iter().map(String::as_str).collect()
        }
    }
}
