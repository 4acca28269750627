//! Passage records

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::domain::vehicle::{Vehicle, VehicleType};

/// Zero out seconds and sub-seconds; passage identity is minute-granular
pub fn truncate_to_minute(timestamp: NaiveDateTime) -> NaiveDateTime {
    timestamp
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(timestamp)
}

/// A registered toll-point passage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Passage {
    pub vehicle: Vehicle,
    pub timestamp: NaiveDateTime,
}

impl Passage {
    /// Build a passage, truncating the timestamp to the minute
    pub fn new(vehicle: Vehicle, timestamp: NaiveDateTime) -> Self {
        Self {
            vehicle,
            timestamp: truncate_to_minute(timestamp),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Whether the stored timestamp lies in `[from, to]`
    pub fn is_within(&self, from: NaiveDateTime, to: NaiveDateTime) -> bool {
        self.timestamp >= from && self.timestamp <= to
    }
}

impl std::fmt::Display for Passage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.vehicle.license_number, self.timestamp)
    }
}

/// Registration payload for one passage, as submitted by a front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPassage {
    pub license_number: String,
    pub vehicle_type: VehicleType,
    pub timestamp: NaiveDateTime,
}

impl NewPassage {
    pub fn new(
        license_number: impl Into<String>,
        vehicle_type: VehicleType,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            license_number: license_number.into(),
            vehicle_type,
            timestamp,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
