//! # Tollgate Service
//!
//! Road-toll accounting for a single toll station: registers vehicle
//! passages, prices each one from a time-of-day fee schedule and
//! aggregates capped daily totals per vehicle.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, the toll fee schedule and domain errors
//! - **application**: The passage registry service front ends talk to

pub mod application;
pub mod domain;

// Re-export the public surface
pub use application::PassageRegistry;
pub use domain::{
    truncate_to_minute, DailyFee, DomainError, DomainResult, FeeSpan, NewPassage, Passage,
    TollSchedule, Vehicle, VehicleType,
};
