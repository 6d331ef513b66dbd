//! Routes and the train assignment state machine
//!
//! A route is either inactive (no train) or active (exactly one train,
//! both flags set). Every illegal transition is rejected before any field
//! is written.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{LineId, RouteId, StationId, TrainId};

/// Assignment failures; all recoverable, none mutate state
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssignmentError {
    #[error("route is already active")]
    RouteAlreadyActive,
    #[error("route is not active")]
    RouteNotActive,
    #[error("train is already assigned to another route")]
    TrainAlreadyAssigned,
    #[error("electric locomotives cannot run on a non-electrified route")]
    FuelIncompatible,
}

/// An ordered run over built railway lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub id: RouteId,
    pub name: String,
    /// Connected chain of line segments
    pub segments: Vec<LineId>,
    /// Station visits implied by the segment chain, in order
    pub waypoints: Vec<StationId>,
    pub requires_electric: bool,
    pub active: bool,
    pub assigned_train: Option<TrainId>,
}

impl Route {
    pub fn new(
        id: RouteId,
        name: impl Into<String>,
        segments: Vec<LineId>,
        waypoints: Vec<StationId>,
        requires_electric: bool,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            segments,
            waypoints,
            requires_electric,
            active: false,
            assigned_train: None,
        }
    }
}
