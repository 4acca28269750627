//! Toll schedule aggregate

pub mod model;

pub use model::{DailyFee, FeeSpan, TollSchedule};
