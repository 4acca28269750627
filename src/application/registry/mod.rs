//! Passage registry service

mod service;

pub use service::PassageRegistry;
