//! Financial ledger: per-year earnings and expense buckets

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fixed transaction categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionCategory {
    Earning,
    TrackMaintenance,
    TrainMaintenance,
    FuelCost,
}

/// One simulated year's totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRecord {
    pub year: i32,
    pub earning: i64,
    pub track_maintenance: i64,
    pub train_maintenance: i64,
    pub fuel_cost: i64,
}

impl YearRecord {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            ..Self::default()
        }
    }

    pub fn total_expenses(&self) -> i64 {
        self.track_maintenance + self.train_maintenance + self.fuel_cost
    }

    pub fn net_revenue(&self) -> i64 {
        self.earning - self.total_expenses()
    }
}

/// Per-year transaction aggregation
#[derive(Debug, Clone, Default)]
pub struct FinancialLedger {
    years: BTreeMap<i32, YearRecord>,
}

impl FinancialLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate an amount into the year's bucket for the category
    pub fn record(&mut self, year: i32, category: TransactionCategory, amount: i64) {
        let record = self.years.entry(year).or_insert_with(|| YearRecord::new(year));
        match category {
            TransactionCategory::Earning => record.earning += amount,
            TransactionCategory::TrackMaintenance => record.track_maintenance += amount,
            TransactionCategory::TrainMaintenance => record.train_maintenance += amount,
            TransactionCategory::FuelCost => record.fuel_cost += amount,
        }
    }

    pub fn year(&self, year: i32) -> Option<&YearRecord> {
        self.years.get(&year)
    }

    /// All recorded years in chronological order
    pub fn records(&self) -> impl Iterator<Item = &YearRecord> {
        self.years.values()
    }

    /// Restore a record wholesale from a snapshot
    pub fn restore_record(&mut self, record: YearRecord) {
        self.years.insert(record.year, record);
    }
}
