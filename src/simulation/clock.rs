//! Simulation clock: the logical day counter and speed control

use serde::{Deserialize, Serialize};

use super::types::TimeDate;

/// Slowest speed multiplier
pub const MIN_SPEED: u32 = 1;
/// Fastest speed multiplier
pub const MAX_SPEED: u32 = 6;

/// Logical calendar clock
///
/// Purely logical time; the host decides how often to tick. The speed
/// multiplier is how many days one UI frame should advance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationClock {
    today: TimeDate,
    speed: u32,
}

impl SimulationClock {
    pub fn new(start: TimeDate) -> Self {
        Self {
            today: start,
            speed: MIN_SPEED,
        }
    }

    pub fn today(&self) -> TimeDate {
        self.today
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Days one tick of the host loop should advance
    pub fn tick_days(&self) -> u32 {
        self.speed
    }

    /// Advance one day and return the new date
    pub fn step_day(&mut self) -> TimeDate {
        self.today = self.today.next_day();
        self.today
    }

    pub fn set_speed(&mut self, speed: u32) {
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
    }

    /// One step faster; a no-op at the maximum
    pub fn increase_speed(&mut self) {
        if self.speed < MAX_SPEED {
            self.speed += 1;
        }
    }

    /// One step slower; a no-op at the minimum
    pub fn decrease_speed(&mut self) {
        if self.speed > MIN_SPEED {
            self.speed -= 1;
        }
    }
}
