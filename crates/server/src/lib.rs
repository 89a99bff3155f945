//! ChickenDirect server library.
//!
//! This crate provides the REST API as a library, allowing the router to be
//! driven in-process by tests as well as by the server binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use state::AppState;
