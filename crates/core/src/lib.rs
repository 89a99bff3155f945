//! ChickenDirect Core - Shared domain types.
//!
//! This crate provides the common types used across the ChickenDirect
//! components:
//! - `server` - The REST API serving the customer/product/order domain
//! - `integration-tests` - Black-box tests driving the API
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP.
//! Repositories in the server crate map database columns to these types at
//! their boundary.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
