//! Async HTTP client for the barbershop API.
//!
//! Catalog lists are cached per entity and dropped whenever the same client
//! saves or deletes records of that entity.

pub mod cache;
pub mod client;
pub mod error;

pub use cache::EntityCache;
pub use client::BarbershopClient;
pub use error::ClientError;
