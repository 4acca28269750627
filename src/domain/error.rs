//! Domain errors

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::domain::vehicle::VehicleType;

/// Caller errors surfaced by the rule engine and the passage registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Registration only accepts vehicle types that pay road toll
    #[error("Unsupported vehicle type: {0}")]
    UnsupportedVehicleType(VehicleType),

    /// Single-vehicle queries need a non-empty license number
    #[error("License number must not be empty")]
    InvalidLicenseNumber,

    /// Range queries require `from <= to`
    #[error("Invalid time range: {from} is later than {to}")]
    InvertedTimeRange {
        from: NaiveDateTime,
        to: NaiveDateTime,
    },

    /// Daily fee computation takes timestamps from a single date
    #[error("All time stamps must be from the same date")]
    MultipleDatesInSingleDayQuery,
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
