//! Core types for the railway simulation
//!
//! These are standalone types that don't depend on any UI layer.

use serde::{Deserialize, Serialize};

/// A unique identifier for simulation entities
/// This is a simple wrapper around a usize for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SimId(pub usize);

/// A wrapper type for station IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StationId(pub SimId);

/// A wrapper type for railway line IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineId(pub SimId);

/// A wrapper type for route IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RouteId(pub SimId);

/// A wrapper type for train IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrainId(pub SimId);

/// A wrapper type for production site IDs (industries and house blocks)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SiteId(pub SimId);

/// A position on the world grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position
    pub fn distance(&self, other: &Position) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// Manhattan distance to another position
    pub fn manhattan_distance(&self, other: &Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The four orthogonal neighbours in fixed N/S/W/E order.
    /// The order is part of the deterministic pathfinding contract.
    pub fn neighbours(&self) -> [Position; 4] {
        [
            Position::new(self.x, self.y - 1),
            Position::new(self.x, self.y + 1),
            Position::new(self.x - 1, self.y),
            Position::new(self.x + 1, self.y),
        ]
    }
}

/// Days per month in the simulated calendar (no leap years)
const DAYS_IN_MONTH: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Days per simulated year
pub const DAYS_PER_YEAR: i64 = 365;

/// A simulated calendar date
///
/// Immutable once constructed; advancing always builds a new value. The
/// total-day ordinal is the key used for event scheduling and comparisons,
/// the (year, month, day) form is for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeDate {
    year: i32,
    month: u8,
    day: u8,
}

impl TimeDate {
    /// Create a date. Month and day are 1-based; out-of-range values are
    /// clamped to the nearest valid calendar day.
    pub fn new(year: i32, month: u8, day: u8) -> Self {
        let month = month.clamp(1, 12);
        let day = day.clamp(1, DAYS_IN_MONTH[(month - 1) as usize]);
        Self { year, month, day }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    /// Zero-based day within the year
    fn day_of_year(&self) -> i64 {
        let mut days = 0i64;
        for m in 0..(self.month - 1) as usize {
            days += DAYS_IN_MONTH[m] as i64;
        }
        days + (self.day as i64 - 1)
    }

    /// Total-day ordinal since year zero; the scheduling key
    pub fn ordinal(&self) -> i64 {
        self.year as i64 * DAYS_PER_YEAR + self.day_of_year()
    }

    /// Reconstruct a date from its total-day ordinal
    pub fn from_ordinal(ordinal: i64) -> Self {
        let year = ordinal.div_euclid(DAYS_PER_YEAR);
        let mut remaining = ordinal.rem_euclid(DAYS_PER_YEAR);
        let mut month = 1u8;
        for (index, days) in DAYS_IN_MONTH.iter().enumerate() {
            if remaining < *days as i64 {
                month = (index + 1) as u8;
                break;
            }
            remaining -= *days as i64;
        }
        Self {
            year: year as i32,
            month,
            day: (remaining + 1) as u8,
        }
    }

    /// A new date offset forward by the given number of days
    pub fn plus_days(&self, days: i64) -> Self {
        Self::from_ordinal(self.ordinal() + days)
    }

    pub fn next_day(&self) -> Self {
        self.plus_days(1)
    }
}

impl std::fmt::Display for TimeDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}
