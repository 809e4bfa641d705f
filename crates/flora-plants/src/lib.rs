//! Cluster plant lifecycle, reproduction, glowers, and clusters.
//!
//! This crate contains the logic layer for cluster plants: everything that
//! operates on plant state through the host traits of `flora-world`
//! without touching I/O. The batch driver in `flora-core` owns the plants
//! and calls into this crate once per plant per batch.
//!
//! # Modules
//!
//! - [`plant`] -- Per-plant mutable state ([`PlantInstance`])
//! - [`lifecycle`] -- One batch for one plant ([`advance_batch`])
//! - [`death`] -- Dying conditions, decay damage, one-shot destruction
//! - [`reproduction`] -- Seed emission rolls and offspring placement
//! - [`glower`] -- Keeping the light entity in step with growth and visibility
//! - [`cluster`] -- Cluster membership and symbiosis ([`ClusterRegistry`])
//! - [`inspect`] -- Player-facing status ([`PlantStatus`])
//! - [`species`] -- Validated species catalog ([`SpeciesCatalog`])
//! - [`config`] -- Growth tunables ([`GrowthConfig`])
//! - [`error`] -- Error types for plant operations ([`PlantError`])

pub mod cluster;
pub mod config;
pub mod death;
pub mod error;
pub mod glower;
pub mod inspect;
pub mod lifecycle;
pub mod plant;
pub mod reproduction;
pub mod species;

// Re-export primary types at crate root for convenience.
pub use cluster::{Cluster, ClusterMembership, ClusterRegistry};
pub use config::GrowthConfig;
pub use death::{DestructionReport, apply_damage, destroy_plant, dying_reasons};
pub use error::PlantError;
pub use glower::GlowerChange;
pub use inspect::{PlantStatus, growth_percent, inspect};
pub use lifecycle::{BatchHost, BatchOutcome, advance_batch, sow};
pub use plant::PlantInstance;
pub use reproduction::{NeighborhoodPlacer, OffspringPlacer, OffspringRequest};
pub use species::{SpeciesCatalog, builtin_species};
