//! HTTP handlers for relay-service.

pub mod generate;
pub mod health;
pub mod metrics;
pub mod models;
