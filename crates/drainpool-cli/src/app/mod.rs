//! Binary wiring around the `drainpool` library.
//!
//! ## Structure
//!
//! - [`config`] - CLI/env configuration (`CliArgs` -> `RunConfig`).
//! - [`shutdown`] - OS signal listener used as the cancellation trigger.
//! - [`telemetry`] - Console logging and optional run metrics.

pub mod config;
pub mod shutdown;
pub mod telemetry;
