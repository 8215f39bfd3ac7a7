//! # Gesco Core
//!
//! Domain records, repository traits and application services. Persistence
//! lives behind the traits in [`repositories`]; HTTP concerns stay out of
//! this crate entirely.

pub mod domain;
pub mod error;
pub mod messages;
pub mod repositories;
pub mod services;
