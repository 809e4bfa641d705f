//! Batch cycle: the loop that drives every cluster plant.
//!
//! Each call to [`run_batch`] runs these phases:
//!
//! 1. **Clock** -- advance the batch clock by one span.
//! 2. **Plants** -- run the lifecycle once for every plant alive at the
//!    start of the batch, in ID order.
//! 3. **Sweep** -- drop plants destroyed during the batch.
//! 4. **Offspring** -- turn queued offspring requests into plants. They
//!    first run in the next batch.
//!
//! The cycle is deterministic given the same initial state and the same
//! random sequence.

use std::collections::BTreeMap;

use flora_plants::lifecycle::{self, BatchHost};
use flora_plants::{
    ClusterRegistry, DestructionReport, GlowerChange, GrowthConfig,
    NeighborhoodPlacer, PlantError, PlantInstance, PlantStatus, SpeciesCatalog,
};
use flora_types::{ClusterId, DestructionCause, PlantId, Position, SpeciesId};
use flora_world::{EntityService, Randomness, WorldGrid};
use tracing::{debug, info};

use crate::clock::{BatchClock, ClockError};

/// Errors that can occur during batch execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// A plant operation failed.
    #[error("plant error: {source}")]
    Plant {
        /// The underlying plant error.
        #[from]
        source: PlantError,
    },
}

/// Summary of a single batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    /// Batch number that was executed.
    pub batch: u64,
    /// Tick at the end of the batch.
    pub tick: u64,
    /// Plants alive at the end of the batch, offspring included.
    pub plants_alive: u32,
    /// Plants that reached maturity.
    pub matured: u32,
    /// Plants frozen in cryostasis.
    pub in_cryostasis: u32,
    /// Plants taking decay damage.
    pub dying: u32,
    /// Plants destroyed this batch.
    pub destroyed: Vec<DestructionReport>,
    /// Offspring added to the world.
    pub offspring_spawned: u32,
    /// Seed emissions that found no cell.
    pub placement_failures: u32,
    /// Glowers spawned, swapped, or removed.
    pub glower_changes: u32,
}

/// Mutable flora state carried from batch to batch.
#[derive(Debug)]
pub struct FloraState {
    /// The batch clock.
    pub clock: BatchClock,
    /// Growth tunables.
    pub growth: GrowthConfig,
    /// Species definitions.
    pub catalog: SpeciesCatalog,
    /// Every plant, keyed by ID.
    pub plants: BTreeMap<PlantId, PlantInstance>,
    /// Every cluster.
    pub clusters: ClusterRegistry,
}

impl FloraState {
    /// Create an empty state at tick 0.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::Clock`] if the growth config has a zero day
    /// length or batch span.
    pub fn new(catalog: SpeciesCatalog, growth: GrowthConfig) -> Result<Self, TickError> {
        Ok(Self {
            clock: BatchClock::new(&growth)?,
            growth,
            catalog,
            plants: BTreeMap::new(),
            clusters: ClusterRegistry::new(),
        })
    }

    /// Add a plant, counting it as a member of `cluster` if given.
    ///
    /// # Errors
    ///
    /// Returns [`PlantError::SpeciesNotFound`] for an unknown species, or
    /// [`PlantError::ClusterNotFound`] for an unknown or dissolved cluster.
    pub fn spawn_plant(
        &mut self,
        species: &SpeciesId,
        position: Position,
        cluster: Option<ClusterId>,
        growth: f32,
    ) -> Result<PlantId, TickError> {
        let definition = self.catalog.get(species)?;
        if let Some(id) = cluster {
            self.clusters.add_member(id)?;
        }
        let plant = PlantInstance::spawn(definition, position, cluster, growth);
        let id = plant.id();
        debug!(plant = %id, species = %species, position = %position, "plant spawned");
        self.plants.insert(id, plant);
        Ok(id)
    }

    /// Found a cluster around a single founder plant sown at
    /// `offspring_initial_growth`.
    ///
    /// # Errors
    ///
    /// Returns [`PlantError::SpeciesNotFound`] for an unknown species.
    pub fn found_cluster(
        &mut self,
        species: &SpeciesId,
        center: Position,
    ) -> Result<(ClusterId, PlantId), TickError> {
        self.catalog.get(species)?;
        let cluster = self.clusters.found(species.clone(), center);
        let growth = self.growth.offspring_initial_growth;
        let plant = self.spawn_plant(species, center, Some(cluster), growth)?;
        Ok((cluster, plant))
    }

    /// Make two clusters each other's symbiosis partner.
    ///
    /// # Errors
    ///
    /// Returns [`PlantError::ClusterNotFound`] if either is unknown.
    pub fn link_symbiosis(&mut self, a: ClusterId, b: ClusterId) -> Result<(), TickError> {
        Ok(self.clusters.link_symbiosis(a, b)?)
    }

    /// Borrow a plant.
    pub fn plant(&self, id: PlantId) -> Option<&PlantInstance> {
        self.plants.get(&id)
    }

    /// Number of plants in the state.
    pub fn plant_count(&self) -> usize {
        self.plants.len()
    }

    /// Cells that hold a living plant.
    pub fn occupied_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.plants
            .values()
            .filter(|p| !p.is_destroyed())
            .map(PlantInstance::position)
    }

    /// Raise a seed's growth once the host has sown it.
    ///
    /// # Errors
    ///
    /// Returns [`PlantError::PlantNotFound`] for an unknown plant.
    pub fn sow(&mut self, id: PlantId, growth: f32) -> Result<(), TickError> {
        let plant = self
            .plants
            .get_mut(&id)
            .ok_or(PlantError::PlantNotFound(id))?;
        lifecycle::sow(plant, growth);
        Ok(())
    }

    /// Apply damage from outside the growth engine (fire, colonists).
    ///
    /// Returns the destruction report if the damage destroyed the plant.
    /// The destroyed plant leaves the state immediately.
    ///
    /// # Errors
    ///
    /// Returns [`PlantError::PlantNotFound`] for an unknown plant.
    pub fn damage_plant(
        &mut self,
        id: PlantId,
        amount: u32,
        entities: &mut dyn EntityService,
    ) -> Result<Option<DestructionReport>, TickError> {
        let plant = self
            .plants
            .get_mut(&id)
            .ok_or(PlantError::PlantNotFound(id))?;
        let report = flora_plants::apply_damage(
            plant,
            amount,
            DestructionCause::ExternalDamage,
            entities,
            &mut self.clusters,
        );
        if report.is_some() {
            self.plants.remove(&id);
        }
        Ok(report)
    }

    /// Remove a plant on the host's request (cut, deconstructed, map
    /// unloaded). Runs the destruction teardown and drops the plant.
    ///
    /// # Errors
    ///
    /// Returns [`PlantError::PlantNotFound`] for an unknown plant.
    pub fn remove_plant(
        &mut self,
        id: PlantId,
        entities: &mut dyn EntityService,
    ) -> Result<Option<DestructionReport>, TickError> {
        let mut plant = self
            .plants
            .remove(&id)
            .ok_or(PlantError::PlantNotFound(id))?;
        Ok(flora_plants::destroy_plant(
            &mut plant,
            DestructionCause::HostRemoval,
            entities,
            &mut self.clusters,
        ))
    }

    /// Inspect a plant against the current environment.
    ///
    /// # Errors
    ///
    /// Returns [`PlantError::PlantNotFound`] or
    /// [`PlantError::SpeciesNotFound`].
    pub fn inspect(&self, id: PlantId, grid: &dyn WorldGrid) -> Result<PlantStatus, TickError> {
        let plant = self.plants.get(&id).ok_or(PlantError::PlantNotFound(id))?;
        let species = self.catalog.get(plant.species())?;
        Ok(flora_plants::inspect(
            plant,
            species,
            grid,
            &self.clusters,
            &self.growth,
        ))
    }
}

/// Execute one batch for the whole flora.
///
/// # Errors
///
/// Returns [`TickError::Clock`] if the clock overflows. A plant whose
/// species is missing from the catalog is skipped with a warning.
pub fn run_batch(
    state: &mut FloraState,
    grid: &dyn WorldGrid,
    entities: &mut dyn EntityService,
    rng: &mut dyn Randomness,
) -> Result<BatchSummary, TickError> {
    let tick = state.clock.advance()?;
    let batch = state.clock.batch();
    let mut summary = BatchSummary {
        batch,
        tick,
        ..BatchSummary::default()
    };

    let mut placer =
        NeighborhoodPlacer::new(state.occupied_positions(), state.growth.placement_attempts);
    let plant_ids: Vec<PlantId> = state.plants.keys().copied().collect();

    for id in &plant_ids {
        let Some(plant) = state.plants.get_mut(id) else {
            continue;
        };
        let Ok(species) = state.catalog.get(plant.species()) else {
            tracing::warn!(plant = %id, species = %plant.species(), "skipping plant of unknown species");
            continue;
        };
        let mut host = BatchHost {
            grid,
            entities: &mut *entities,
            rng: &mut *rng,
            clusters: &mut state.clusters,
            placer: &mut placer,
        };
        let outcome = lifecycle::advance_batch(plant, species, &state.growth, &mut host);

        if outcome.became_mature {
            summary.matured += 1;
        }
        if outcome.in_cryostasis {
            summary.in_cryostasis += 1;
        }
        if !outcome.dying.is_empty() {
            summary.dying += 1;
        }
        if outcome.glower != GlowerChange::Unchanged {
            summary.glower_changes += 1;
        }
        summary.placement_failures += outcome
            .reproduction_attempts
            .saturating_sub(outcome.offspring_placed);
        if let Some(report) = outcome.destruction {
            summary.destroyed.push(report);
        }
    }

    state.plants.retain(|_, plant| !plant.is_destroyed());

    for request in placer.take_pending() {
        match state.spawn_plant(
            &request.species,
            request.position,
            request.cluster,
            state.growth.offspring_initial_growth,
        ) {
            Ok(_) => summary.offspring_spawned += 1,
            Err(e) => {
                debug!(parent = %request.parent, error = %e, "offspring dropped");
            }
        }
    }

    summary.plants_alive = u32::try_from(state.plants.len()).unwrap_or(u32::MAX);
    info!(
        batch,
        tick,
        plants = summary.plants_alive,
        matured = summary.matured,
        destroyed = summary.destroyed.len(),
        offspring = summary.offspring_spawned,
        "Batch complete"
    );
    Ok(summary)
}
