//! Persistence layer for the barbershop backend.
//!
//! This crate contains:
//! - SQLite connection management and embedded migrations
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - Query timing metrics

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
