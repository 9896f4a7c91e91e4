//! Shared utilities and common types for the barbershop backend.
//!
//! This crate provides common functionality used across all other crates:
//! - API key hashing
//! - Field validation (phone, email, money, time of day)
//! - Lenient date and time parsing for wire formats

pub mod crypto;
pub mod dates;
pub mod validation;
