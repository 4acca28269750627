pub mod error;
pub mod passage;
pub mod schedule;
pub mod vehicle;

// Re-export commonly used types
pub use error::{DomainError, DomainResult};
pub use passage::{truncate_to_minute, NewPassage, Passage};
pub use schedule::{DailyFee, FeeSpan, TollSchedule};
pub use vehicle::{Vehicle, VehicleType};
