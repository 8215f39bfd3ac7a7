//! # Gesco Shared
//!
//! Configuration, telemetry and startup error types shared by every crate.

pub mod config;
pub mod error;
pub mod telemetry;
