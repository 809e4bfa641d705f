//! Seed emission and offspring placement.
//!
//! A plant may emit a seed once per batch when it is alive, has grown past
//! the reproduction threshold, and wins a mean-time-between-events roll
//! against its species' seed interval. Fast ecology mode gives eligible
//! plants one more attempt that skips the roll.
//!
//! Placement is delegated to an [`OffspringPlacer`]. The built-in
//! [`NeighborhoodPlacer`] picks a random cell around the parent and queues
//! a request; the batch driver turns queued requests into plants after the
//! batch, so offspring never run in the batch that created them.

use std::collections::BTreeSet;

use flora_types::{ClusterId, PlantId, Position, SpeciesDefinition, SpeciesId};
use flora_world::{Randomness, WorldGrid, terrain};

use crate::config::GrowthConfig;
use crate::error::PlantError;
use crate::plant::PlantInstance;

/// Whether the plant is old enough to emit seeds at all.
pub fn is_eligible(plant: &PlantInstance, config: &GrowthConfig) -> bool {
    !plant.destroyed && plant.growth > config.min_growth_to_reproduce
}

/// Number of placement attempts an eligible plant makes in one batch: 0
/// or 1 from the seed-interval roll, plus 1 in fast ecology mode.
pub fn attempts_this_batch(
    plant: &PlantInstance,
    species: &SpeciesDefinition,
    config: &GrowthConfig,
    rng: &mut dyn Randomness,
) -> u32 {
    if !is_eligible(plant, config) {
        return 0;
    }
    let mut attempts = 0;
    if rng.mtb_event_occurs(
        species.seed_emit_mtb_days,
        config.ticks_per_day,
        config.batch_tick_span,
    ) {
        attempts += 1;
    }
    if config.fast_ecology {
        attempts += 1;
    }
    attempts
}

/// Places offspring for a parent plant. Success is never guaranteed.
pub trait OffspringPlacer {
    /// Try to place one offspring of `parent` and return its cell.
    ///
    /// # Errors
    ///
    /// Returns [`PlantError::PlacementFailed`] when no usable cell was
    /// found. Callers log and drop the failure.
    fn try_place(
        &mut self,
        parent: &PlantInstance,
        species: &SpeciesDefinition,
        grid: &dyn WorldGrid,
        rng: &mut dyn Randomness,
    ) -> Result<Position, PlantError>;
}

/// A queued offspring waiting to be spawned by the batch driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffspringRequest {
    /// Parent plant.
    pub parent: PlantId,
    /// Species of the offspring.
    pub species: SpeciesId,
    /// Chosen cell.
    pub position: Position,
    /// Cluster the offspring joins.
    pub cluster: Option<ClusterId>,
}

/// Places offspring on a random free cell within the species spawn radius
/// around the parent.
///
/// A cell is usable when it is not already taken by a plant (or by an
/// earlier request this batch) and passes
/// [`terrain::can_place_seed_at`].
#[derive(Debug, Clone, Default)]
pub struct NeighborhoodPlacer {
    occupied: BTreeSet<Position>,
    pending: Vec<OffspringRequest>,
    attempts: u32,
}

impl NeighborhoodPlacer {
    /// Create a placer that knows which cells already hold plants and
    /// tries up to `attempts` random cells per offspring.
    pub fn new(occupied: impl IntoIterator<Item = Position>, attempts: u32) -> Self {
        Self {
            occupied: occupied.into_iter().collect(),
            pending: Vec::new(),
            attempts: attempts.max(1),
        }
    }

    /// Requests queued so far.
    pub fn pending(&self) -> &[OffspringRequest] {
        &self.pending
    }

    /// Take every queued request, leaving the queue empty.
    pub fn take_pending(&mut self) -> Vec<OffspringRequest> {
        std::mem::take(&mut self.pending)
    }

    fn is_free(&self, species: &SpeciesDefinition, grid: &dyn WorldGrid, cell: Position) -> bool {
        !self.occupied.contains(&cell) && terrain::can_place_seed_at(species, grid, cell)
    }
}

impl OffspringPlacer for NeighborhoodPlacer {
    fn try_place(
        &mut self,
        parent: &PlantInstance,
        species: &SpeciesDefinition,
        grid: &dyn WorldGrid,
        rng: &mut dyn Randomness,
    ) -> Result<Position, PlantError> {
        let radius = i32::try_from(species.cluster_spawn_radius).unwrap_or(i32::MAX);
        if radius == 0 {
            return Err(PlantError::PlacementFailed {
                parent: parent.id,
                reason: "species has no spawn radius".to_owned(),
            });
        }
        let origin = parent.position;
        for _ in 0..self.attempts {
            let cell = origin.offset(
                rng.range_inclusive(-radius, radius),
                rng.range_inclusive(-radius, radius),
            );
            if cell == origin || !self.is_free(species, grid, cell) {
                continue;
            }
            self.occupied.insert(cell);
            self.pending.push(OffspringRequest {
                parent: parent.id,
                species: species.id.clone(),
                position: cell,
                cluster: parent.cluster,
            });
            return Ok(cell);
        }
        Err(PlantError::PlacementFailed {
            parent: parent.id,
            reason: format!("no free cell within radius {radius} after {} tries", self.attempts),
        })
    }
}
