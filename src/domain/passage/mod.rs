//! Passage aggregate

pub mod model;

pub use model::{truncate_to_minute, NewPassage, Passage};
