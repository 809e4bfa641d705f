//! Batch clock, batch driver, configuration, and persistence for Cave Flora.
//!
//! This crate owns the flora state and the cycle that advances it one batch
//! at a time. Plant logic lives in `flora-plants`; the world is reached only
//! through the host traits of `flora-world`.
//!
//! # Modules
//!
//! - [`clock`] -- Batch clock with tick and batch counters and day
//!   derivation.
//! - [`config`] -- Configuration loading from `flora-config.yaml` into
//!   strongly-typed structs.
//! - [`tick`] -- [`FloraState`] and the per-batch cycle ([`run_batch`]).
//! - [`persistence`] -- JSON snapshots of the whole state.
//!
//! [`FloraState`]: tick::FloraState
//! [`run_batch`]: tick::run_batch

pub mod clock;
pub mod config;
pub mod persistence;
pub mod tick;

pub use clock::{BatchClock, ClockError};
pub use config::{ConfigError, SimulationConfig};
pub use persistence::{FloraSnapshot, PersistenceError, SNAPSHOT_VERSION};
pub use tick::{BatchSummary, FloraState, TickError, run_batch};
