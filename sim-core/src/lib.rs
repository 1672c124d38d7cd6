//! Core 2-D particle-motion simulation library.
//!
//! Main components:
//! - [`store`] — per-object attribute arrays keyed by field, with the
//!   one-row-per-object invariant.
//! - [`field`] — the dense 2D arrays the store holds.
//! - [`motion`] — position integration with reflecting walls.
//! - [`updater`] — the herd and signal-driven attribute policies.
//! - [`projection`] — fixed position-to-logit maps and the sigmoid.
//! - [`signal`] — the external per-frame scalar series.
//! - [`render`] — the drawing-backend contract and store-to-marker mapping.
//! - [`driver`] — the per-frame pipeline and fixed-length runs.
//! - [`config`] — demo presets and run parameters.
//! - [`error`] — error types.
//! - [`types`] — field identifiers and shared aliases.

pub mod config;
pub mod driver;
pub mod error;
pub mod field;
pub mod motion;
pub mod projection;
pub mod render;
pub mod signal;
pub mod store;
pub mod types;
pub mod updater;
