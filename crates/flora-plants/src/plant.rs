//! A single cluster plant instance.
//!
//! A [`PlantInstance`] carries only the mutable per-plant state: growth,
//! age, hit points, the optional glower handle, and the owning cluster.
//! Everything static comes from the shared [`SpeciesDefinition`].
//!
//! Mutation is restricted to this crate. The lifecycle step, the decay and
//! destruction path, and glower synchronization are the only writers.

use flora_types::{
    ClusterId, GlowerHandle, LifeStage, PlantId, PlantSnapshot, Position, SpeciesDefinition,
    SpeciesId,
};

/// Mutable state of one living (or just destroyed) cluster plant.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantInstance {
    pub(crate) id: PlantId,
    pub(crate) species: SpeciesId,
    pub(crate) position: Position,
    pub(crate) growth: f32,
    pub(crate) age: u64,
    pub(crate) hit_points: u32,
    pub(crate) cluster: Option<ClusterId>,
    pub(crate) glower: Option<GlowerHandle>,
    pub(crate) destroyed: bool,
}

impl PlantInstance {
    /// Create a plant of `species` on `position` with the given starting
    /// growth. Hit points start at the species maximum and age at zero.
    ///
    /// Negative or non-finite growth is stored as zero.
    pub fn spawn(
        species: &SpeciesDefinition,
        position: Position,
        cluster: Option<ClusterId>,
        initial_growth: f32,
    ) -> Self {
        let growth = if initial_growth.is_finite() {
            initial_growth.max(0.0)
        } else {
            0.0
        };
        Self {
            id: PlantId::new(),
            species: species.id.clone(),
            position,
            growth,
            age: 0,
            hit_points: species.max_hit_points,
            cluster,
            glower: None,
            destroyed: false,
        }
    }

    /// Rebuild a plant from its persisted state.
    ///
    /// The glower handle is restored as saved. Callers should drop it if
    /// the host no longer knows the entity (see
    /// [`crate::glower::forget_stale_glower`]).
    pub fn from_snapshot(snapshot: PlantSnapshot) -> Self {
        Self {
            id: snapshot.id,
            species: snapshot.species,
            position: snapshot.position,
            growth: snapshot.growth,
            age: snapshot.age,
            hit_points: snapshot.hit_points,
            cluster: snapshot.cluster,
            glower: snapshot.glower,
            destroyed: false,
        }
    }

    /// Externalize the persistent state.
    pub fn to_snapshot(&self) -> PlantSnapshot {
        PlantSnapshot {
            id: self.id,
            species: self.species.clone(),
            position: self.position,
            growth: self.growth,
            age: self.age,
            hit_points: self.hit_points,
            glower: self.glower.clone(),
            cluster: self.cluster,
        }
    }

    /// Plant identifier.
    pub const fn id(&self) -> PlantId {
        self.id
    }

    /// Species key.
    pub const fn species(&self) -> &SpeciesId {
        &self.species
    }

    /// Cell the plant stands on.
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Growth scalar. Starts near 0 and reaches 1 at maturity; it is not
    /// clamped and may overshoot slightly.
    pub const fn growth(&self) -> f32 {
        self.growth
    }

    /// Ticks spent mature and out of cryostasis.
    pub const fn age(&self) -> u64 {
        self.age
    }

    /// Remaining hit points.
    pub const fn hit_points(&self) -> u32 {
        self.hit_points
    }

    /// Owning cluster, if any.
    pub const fn cluster(&self) -> Option<ClusterId> {
        self.cluster
    }

    /// Live glower handle, if any.
    pub const fn glower(&self) -> Option<&GlowerHandle> {
        self.glower.as_ref()
    }

    /// Whether the plant has been destroyed. A destroyed plant ignores
    /// every further lifecycle call.
    pub const fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Life stage derived from growth.
    pub fn stage(&self) -> LifeStage {
        LifeStage::from_growth(self.growth)
    }

    /// Flip the destroyed flag. Returns `true` only on the first call.
    pub(crate) const fn mark_destroyed(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.destroyed = true;
        true
    }
}
