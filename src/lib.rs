//! Switchboard - Configuration and health dashboard for self-hosted AI endpoints
//!
//! This library provides the state and reconciliation core behind the
//! dashboard: an endpoint registry, a bounded-timeout health prober, a
//! reconciler with one-shot auto-selection, a periodic sweep scheduler, a
//! preset store, and a broker relay bridge, all exposed over an Axum HTTP API.

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod metrics;
pub mod middleware;
pub mod presets;
pub mod registry;
pub mod relay;
pub mod telemetry;
