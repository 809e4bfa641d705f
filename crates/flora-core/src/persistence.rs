//! Saving and restoring flora state.
//!
//! The whole [`FloraState`] externalizes to a [`FloraSnapshot`], written as
//! JSON. Restoring happens before the first batch. Glower handles whose
//! entity the host no longer knows are dropped, and the next batch spawns
//! a fresh glower where one is needed.

use std::path::Path;

use flora_plants::glower::forget_stale_glower;
use flora_plants::{ClusterRegistry, GrowthConfig, PlantError, PlantInstance, SpeciesCatalog};
use flora_types::{ClusterSnapshot, PlantSnapshot};
use flora_world::EntityService;
use serde::{Deserialize, Serialize};

use crate::clock::{BatchClock, ClockError};
use crate::tick::FloraState;

/// Snapshot format version written by this build.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Errors that can occur while saving or loading state.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// Reading or writing the snapshot file failed.
    #[error("snapshot I/O failed: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The snapshot is not valid JSON for this format.
    #[error("snapshot JSON invalid: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The snapshot was written by an incompatible version.
    #[error("unsupported snapshot version {found} (expected {SNAPSHOT_VERSION})")]
    UnsupportedVersion {
        /// Version found in the file.
        found: u32,
    },

    /// The clock could not be restored.
    #[error("snapshot clock invalid: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// A plant refers to a species the catalog does not know.
    #[error("snapshot plant invalid: {source}")]
    Plant {
        /// The underlying plant error.
        #[from]
        source: PlantError,
    },
}

/// Serializable image of the whole flora state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloraSnapshot {
    /// Format version.
    pub version: u32,
    /// Tick at the time of saving.
    pub tick: u64,
    /// Batches completed at the time of saving.
    pub batch: u64,
    /// Every plant.
    pub plants: Vec<PlantSnapshot>,
    /// Every cluster, dissolved ones included.
    pub clusters: Vec<ClusterSnapshot>,
}

impl FloraSnapshot {
    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON, rejecting other format versions.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Json`] for malformed input or
    /// [`PersistenceError::UnsupportedVersion`] for another version.
    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        let snapshot: Self = serde_json::from_str(json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: snapshot.version,
            });
        }
        Ok(snapshot)
    }

    /// Write the snapshot to a file.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] or [`PersistenceError::Json`].
    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read a snapshot from a file.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`], [`PersistenceError::Json`], or
    /// [`PersistenceError::UnsupportedVersion`].
    pub fn load(path: &Path) -> Result<Self, PersistenceError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

impl FloraState {
    /// Capture the current state.
    pub fn snapshot(&self) -> FloraSnapshot {
        FloraSnapshot {
            version: SNAPSHOT_VERSION,
            tick: self.clock.tick(),
            batch: self.clock.batch(),
            plants: self.plants.values().map(PlantInstance::to_snapshot).collect(),
            clusters: self.clusters.snapshots(),
        }
    }

    /// Rebuild state from a snapshot.
    ///
    /// Glower handles the host no longer knows are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Clock`] for an invalid growth config, or
    /// [`PersistenceError::Plant`] if a plant's species is not in the
    /// catalog.
    pub fn restore(
        snapshot: FloraSnapshot,
        catalog: SpeciesCatalog,
        growth: GrowthConfig,
        entities: &dyn EntityService,
    ) -> Result<Self, PersistenceError> {
        let clock = BatchClock::from_parts(snapshot.tick, snapshot.batch, &growth)?;
        let mut plants = std::collections::BTreeMap::new();
        let mut stale = 0_u32;
        for saved in snapshot.plants {
            if !catalog.contains(&saved.species) {
                return Err(PlantError::SpeciesNotFound(saved.species).into());
            }
            let mut plant = PlantInstance::from_snapshot(saved);
            if forget_stale_glower(&mut plant, entities) {
                stale += 1;
            }
            plants.insert(plant.id(), plant);
        }
        tracing::info!(
            tick = clock.tick(),
            plants = plants.len(),
            stale_glowers = stale,
            "flora state restored"
        );
        Ok(Self {
            clock,
            growth,
            catalog,
            plants,
            clusters: ClusterRegistry::from_snapshots(snapshot.clusters),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use flora_plants::builtin_species;
    use flora_types::{DestroyMode, Position, SpeciesId};
    use flora_world::{MemoryEntities, MemoryGrid, SeededRandomness};

    use super::*;
    use crate::tick::run_batch;

    fn catalog() -> SpeciesCatalog {
        SpeciesCatalog::from_definitions(builtin_species()).unwrap()
    }

    fn grown_state(entities: &mut MemoryEntities) -> FloraState {
        let mut state = FloraState::new(catalog(), GrowthConfig::default()).unwrap();
        let mut grid = MemoryGrid::new(16, 16).unwrap();
        grid.fill_temperature(20.0);
        grid.fill_light(0.1);
        grid.fill_fertility(1.0);
        grid.fill_roofed(true);
        let mut rng = SeededRandomness::new(11);
        state
            .found_cluster(&SpeciesId::new("Gleamcap"), Position::new(8, 8))
            .unwrap();
        for _ in 0..5 {
            run_batch(&mut state, &grid, entities, &mut rng).unwrap();
        }
        state
    }

    #[test]
    fn json_round_trip() {
        let mut entities = MemoryEntities::new();
        let state = grown_state(&mut entities);
        let snapshot = state.snapshot();
        let parsed = FloraSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn restore_preserves_plants() {
        let mut entities = MemoryEntities::new();
        let state = grown_state(&mut entities);
        let snapshot = state.snapshot();
        let restored =
            FloraState::restore(snapshot.clone(), catalog(), GrowthConfig::default(), &entities)
                .unwrap();
        assert_eq!(restored.snapshot(), snapshot);
        assert_eq!(restored.clock.batch(), 5);
    }

    #[test]
    fn stale_glower_dropped_on_restore() {
        let mut entities = MemoryEntities::new();
        let state = grown_state(&mut entities);
        let snapshot = state.snapshot();
        let glower = snapshot.plants.first().unwrap().glower.clone().unwrap();
        entities.destroy(glower.entity, DestroyMode::Vanish);

        let restored =
            FloraState::restore(snapshot, catalog(), GrowthConfig::default(), &entities).unwrap();
        assert!(restored.plants.values().all(|p| p.glower().is_none()));
    }

    #[test]
    fn other_version_rejected() {
        let json = r#"{"version":99,"tick":0,"batch":0,"plants":[],"clusters":[]}"#;
        assert!(matches!(
            FloraSnapshot::from_json(json),
            Err(PersistenceError::UnsupportedVersion { found: 99 })
        ));
    }

    #[test]
    fn unknown_species_rejected() {
        let mut entities = MemoryEntities::new();
        let state = grown_state(&mut entities);
        let snapshot = state.snapshot();
        let result = FloraState::restore(
            snapshot,
            SpeciesCatalog::default(),
            GrowthConfig::default(),
            &entities,
        );
        assert!(matches!(result, Err(PersistenceError::Plant { .. })));
    }
}
