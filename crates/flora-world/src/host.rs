//! Interfaces the growth engine consumes from its host.
//!
//! The host owns the world grid, spawns and destroys entities, and supplies
//! randomness. The engine only ever reaches the host through these traits,
//! so any platform (or the in-memory host in [`crate::memory`]) can drive it.
//!
//! All queries are synchronous and infallible: a query about a cell the
//! host does not know answers with the least favorable value.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use flora_types::{Building, DestroyMode, EntityId, EntityKind, Position, Terrain};

// ---------------------------------------------------------------------------
// World grid
// ---------------------------------------------------------------------------

/// Read-only environmental queries against the world grid.
pub trait WorldGrid {
    /// Whether the cell lies inside the map.
    fn in_bounds(&self, pos: Position) -> bool;

    /// Soil fertility, normally in `[0, 1]`.
    fn fertility_at(&self, pos: Position) -> f32;

    /// Air temperature in degrees.
    fn temperature_at(&self, pos: Position) -> f32;

    /// Ambient light level in `[0, 1]`.
    fn light_at(&self, pos: Position) -> f32;

    /// Snow depth covering the cell.
    fn snow_depth_at(&self, pos: Position) -> f32;

    /// Whether a roof covers the cell.
    fn is_roofed(&self, pos: Position) -> bool;

    /// Terrain covering the cell, or `None` out of bounds.
    fn terrain_at(&self, pos: Position) -> Option<&Terrain>;

    /// Building standing on the cell, if any.
    fn building_at(&self, pos: Position) -> Option<&Building>;
}

// ---------------------------------------------------------------------------
// Entity service
// ---------------------------------------------------------------------------

/// Mutating calls into the host's entity system.
pub trait EntityService {
    /// Spawn a new entity of `kind` at `pos` and return its handle.
    fn spawn(&mut self, kind: &EntityKind, pos: Position) -> EntityId;

    /// Destroy an entity. Destroying an unknown or already destroyed
    /// entity is a no-op.
    fn destroy(&mut self, entity: EntityId, mode: DestroyMode);

    /// Whether the entity exists and has not been destroyed.
    fn is_alive(&self, entity: EntityId) -> bool;

    /// Mark an entity as forbidden (or allowed) for colonist interaction.
    fn set_forbidden(&mut self, entity: EntityId, forbidden: bool);
}

// ---------------------------------------------------------------------------
// Randomness
// ---------------------------------------------------------------------------

/// Source of randomness supplied by the host.
pub trait Randomness {
    /// Uniform value in `[min, max)`. Returns `min` when the range is empty.
    fn uniform(&mut self, min: f32, max: f32) -> f32;

    /// Uniform integer in `[min, max]`. Returns `min` when the range is empty.
    fn range_inclusive(&mut self, min: i32, max: i32) -> i32;

    /// Mean-time-between-events test for one check window.
    ///
    /// Answers whether an event with a mean interval of `mean_days` happens
    /// during a window of `span_ticks`. See [`mtb_event_chance`].
    fn mtb_event_occurs(&mut self, mean_days: f32, ticks_per_day: u64, span_ticks: u64) -> bool {
        match mtb_event_chance(mean_days, ticks_per_day, span_ticks) {
            Some(chance) if chance >= 1.0 => true,
            Some(chance) if chance > 0.0 => f64::from(self.uniform(0.0, 1.0)) < chance,
            _ => false,
        }
    }
}

/// Probability that a mean-time-between-events check succeeds.
///
/// - A non-finite mean (infinite or NaN) never fires: `Some(0.0)`.
/// - A mean of zero or less always fires: `Some(1.0)`.
/// - Otherwise the chance is `span / (mean_days * ticks_per_day)`, capped at 1.
///
/// Returns `None` when `ticks_per_day` or `span_ticks` is zero (no window to
/// check against).
pub fn mtb_event_chance(mean_days: f32, ticks_per_day: u64, span_ticks: u64) -> Option<f64> {
    if !mean_days.is_finite() {
        return Some(0.0);
    }
    if mean_days <= 0.0 {
        return Some(1.0);
    }
    if ticks_per_day == 0 || span_ticks == 0 {
        return None;
    }
    let mean_ticks = f64::from(mean_days) * ticks_per_day as f64;
    Some((span_ticks as f64 / mean_ticks).min(1.0))
}

/// Deterministic [`Randomness`] backed by a seeded [`StdRng`].
///
/// The same seed always produces the same sequence, which makes whole
/// simulation runs reproducible.
#[derive(Debug, Clone)]
pub struct SeededRandomness {
    /// Underlying generator.
    rng: StdRng,
}

impl SeededRandomness {
    /// Create a generator from a seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Randomness for SeededRandomness {
    fn uniform(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.rng.random_range(min..max)
    }

    fn range_inclusive(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.rng.random_range(min..=max)
    }
}
