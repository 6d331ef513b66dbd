//! Railway lines and the station connectivity graph
//!
//! Standalone network model; the graph backs route validation and
//! station-to-station path queries.

use anyhow::{Context, Result};
use petgraph::algo::astar;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::types::{LineId, Position, StationId, TimeDate};

/// Track build variants; each fixes construction cost, yearly maintenance
/// and a transport capacity class (number of tracks)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RailwayLineType {
    SingleElectrified,
    DoubleElectrified,
    SingleNonElectrified,
    DoubleNonElectrified,
}

impl RailwayLineType {
    /// Construction cost for one grid cell of new track
    pub fn cost_per_cell(&self) -> u32 {
        match self {
            RailwayLineType::SingleElectrified => 14,
            RailwayLineType::DoubleElectrified => 22,
            RailwayLineType::SingleNonElectrified => 10,
            RailwayLineType::DoubleNonElectrified => 16,
        }
    }

    /// Yearly maintenance charged per grid cell of track
    pub fn maintenance_per_cell(&self) -> i64 {
        match self {
            RailwayLineType::SingleElectrified => 3,
            RailwayLineType::DoubleElectrified => 5,
            RailwayLineType::SingleNonElectrified => 2,
            RailwayLineType::DoubleNonElectrified => 4,
        }
    }

    /// Number of tracks; double lines carry twice the traffic
    pub fn capacity_class(&self) -> u32 {
        match self {
            RailwayLineType::SingleElectrified | RailwayLineType::SingleNonElectrified => 1,
            RailwayLineType::DoubleElectrified | RailwayLineType::DoubleNonElectrified => 2,
        }
    }

    pub fn is_electrified(&self) -> bool {
        matches!(
            self,
            RailwayLineType::SingleElectrified | RailwayLineType::DoubleElectrified
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            RailwayLineType::SingleElectrified => "single electrified",
            RailwayLineType::DoubleElectrified => "double electrified",
            RailwayLineType::SingleNonElectrified => "single non-electrified",
            RailwayLineType::DoubleNonElectrified => "double non-electrified",
        }
    }
}

/// A constructed track segment connecting two stations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RailwayLine {
    pub id: LineId,
    pub stations: (StationId, StationId),
    pub line_type: RailwayLineType,
    /// Grid cells the track occupies, endpoints inclusive
    pub path: Vec<Position>,
    pub built: TimeDate,
}

impl RailwayLine {
    pub fn new(
        id: LineId,
        stations: (StationId, StationId),
        line_type: RailwayLineType,
        path: Vec<Position>,
        built: TimeDate,
    ) -> Self {
        Self {
            id,
            stations,
            line_type,
            path,
            built,
        }
    }

    pub fn connects(&self, station: StationId) -> bool {
        self.stations.0 == station || self.stations.1 == station
    }

    /// The other endpoint, if `station` is one of this line's endpoints
    pub fn opposite(&self, station: StationId) -> Option<StationId> {
        if self.stations.0 == station {
            Some(self.stations.1)
        } else if self.stations.1 == station {
            Some(self.stations.0)
        } else {
            None
        }
    }
}

/// Edge data for the station connectivity graph
#[derive(Debug, Clone, Copy)]
struct LineEdge {
    line_id: LineId,
    /// Track cell count; the weight used for station-to-station queries
    weight: u32,
}

/// Station connectivity graph over the built railway lines
#[derive(Default)]
pub struct RailNetwork {
    graph: UnGraph<StationId, LineEdge>,
    station_to_node: HashMap<StationId, NodeIndex>,
    node_to_station: HashMap<NodeIndex, StationId>,
    lines: HashMap<LineId, RailwayLine>,
}

impl RailNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a station as a graph node
    pub fn add_station(&mut self, station_id: StationId) {
        if self.station_to_node.contains_key(&station_id) {
            return;
        }
        let node = self.graph.add_node(station_id);
        self.station_to_node.insert(station_id, node);
        self.node_to_station.insert(node, station_id);
    }

    /// Add a built line and its graph edge
    pub fn add_line(&mut self, line: RailwayLine) {
        let (a, b) = line.stations;
        self.add_station(a);
        self.add_station(b);
        let edge = LineEdge {
            line_id: line.id,
            weight: (line.path.len() as u32).max(1),
        };
        self.graph
            .add_edge(self.station_to_node[&a], self.station_to_node[&b], edge);
        self.lines.insert(line.id, line);
    }

    pub fn get_line(&self, line_id: LineId) -> Option<&RailwayLine> {
        self.lines.get(&line_id)
    }

    pub fn lines(&self) -> impl Iterator<Item = &RailwayLine> {
        self.lines.values()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Finds the line connecting two stations
    pub fn find_line_between(&self, a: StationId, b: StationId) -> Result<LineId> {
        let node_a = self
            .station_to_node
            .get(&a)
            .with_context(|| format!("Station {:?} not found in rail network", a))?;
        let node_b = self
            .station_to_node
            .get(&b)
            .with_context(|| format!("Station {:?} not found in rail network", b))?;

        self.graph
            .edges(*node_a)
            .find(|edge| edge.target() == *node_b || edge.source() == *node_b)
            .map(|edge| edge.weight().line_id)
            .with_context(|| format!("No line connecting {:?} and {:?}", a, b))
    }

    /// Remove a line and its graph edge
    pub fn remove_line(&mut self, line_id: LineId) -> Result<RailwayLine> {
        let line = self.lines.remove(&line_id).context("Line not found")?;
        let node_a = self.station_to_node[&line.stations.0];
        let edge = self
            .graph
            .edges(node_a)
            .find(|edge| edge.weight().line_id == line_id)
            .map(|edge| edge.id());
        if let Some(edge_id) = edge {
            self.graph.remove_edge(edge_id);
        }
        Ok(line)
    }

    /// Forget a station. The caller must have removed its lines first;
    /// the graph node itself is kept because petgraph's swap-removal
    /// would invalidate the cached indices of other stations.
    pub fn remove_station(&mut self, station_id: StationId) {
        if let Some(node) = self.station_to_node.remove(&station_id) {
            self.node_to_station.remove(&node);
        }
    }

    /// Whether any built line touches the station
    pub fn station_has_lines(&self, station_id: StationId) -> bool {
        self.lines.values().any(|line| line.connects(station_id))
    }

    /// Shortest station-to-station chain over built lines, as line segments.
    /// Returns `None` when the stations are not connected.
    pub fn find_segment_chain(&self, from: StationId, to: StationId) -> Option<Vec<LineId>> {
        if from == to {
            return Some(Vec::new());
        }
        let start = *self.station_to_node.get(&from)?;
        let goal = *self.station_to_node.get(&to)?;

        let (_, node_path) = astar(
            &self.graph,
            start,
            |node| node == goal,
            |edge| edge.weight().weight,
            |_| 0,
        )?;

        let mut segments = Vec::with_capacity(node_path.len().saturating_sub(1));
        for pair in node_path.windows(2) {
            let a = self.node_to_station[&pair[0]];
            let b = self.node_to_station[&pair[1]];
            segments.push(self.find_line_between(a, b).ok()?);
        }
        Some(segments)
    }

    /// Whether the given segments form a connected chain of built lines.
    /// Returns the ordered station waypoints when they do.
    pub fn chain_waypoints(&self, segments: &[LineId]) -> Option<Vec<StationId>> {
        let first = self.lines.get(segments.first()?)?;
        if segments.len() == 1 {
            return Some(vec![first.stations.0, first.stations.1]);
        }

        // Orient the first segment so that its far end touches the second.
        let second = self.lines.get(&segments[1])?;
        let mut current = if second.connects(first.stations.1) {
            first.stations.1
        } else if second.connects(first.stations.0) {
            first.stations.0
        } else {
            return None;
        };
        let start = first.opposite(current)?;
        let mut waypoints = vec![start, current];

        for line_id in &segments[1..] {
            let line = self.lines.get(line_id)?;
            current = line.opposite(current)?;
            waypoints.push(current);
        }
        Some(waypoints)
    }

    /// Grid cells occupied by track of the given type
    pub fn cells_of_type(&self, line_type: RailwayLineType) -> HashSet<Position> {
        self.lines
            .values()
            .filter(|line| line.line_type == line_type)
            .flat_map(|line| line.path.iter().copied())
            .collect()
    }

    /// Grid cells occupied by track of any *other* type; these block new
    /// construction of `line_type` while same-type cells are reusable.
    pub fn cells_of_other_types(&self, line_type: RailwayLineType) -> HashSet<Position> {
        self.lines
            .values()
            .filter(|line| line.line_type != line_type)
            .flat_map(|line| line.path.iter().copied())
            .collect()
    }

    /// All grid cells occupied by any track
    pub fn occupied_cells(&self) -> HashSet<Position> {
        self.lines
            .values()
            .flat_map(|line| line.path.iter().copied())
            .collect()
    }
}
