//! Environmental suitability of a cell for a cluster plant species.
//!
//! Four independent axes are scored:
//!
//! | Axis        | Kind   | Shape                                             |
//! |-------------|--------|---------------------------------------------------|
//! | Fertility   | scalar | host fertility, or fixed 1.0 for rough-rock species |
//! | Temperature | scalar | 0 → 1 ramp, optimal plateau, 1 → 0 ramp          |
//! | Light       | gate   | 1.0 inside `[min, max]`, else 0.0                 |
//! | Terrain     | gate   | rough rock or fertile soil, plus roof/rock gates  |
//!
//! The numeric growth rate is the product of the first three. Terrain,
//! roof, rock proximity, and symbiosis never slow growth down; they decide
//! whether the plant may grow at all and whether it is dying.
//!
//! Cryostasis (temperature below the species minimum) is reported
//! separately: it suspends the plant instead of killing it.

use flora_types::{Position, SpeciesDefinition, TemperatureRange};

use crate::host::WorldGrid;
use crate::terrain;

/// Temperature growth factor for a temperature against a species range.
///
/// - `0.0` at or outside `[min, max]`
/// - linear `0 → 1` from `min` to `min_optimal`
/// - `1.0` across `[min_optimal, max_optimal]`
/// - linear `1 → 0` from `max_optimal` to `max`
///
/// A degenerate ramp (zero width) counts as fully optimal.
pub fn temperature_factor_for(range: &TemperatureRange, temperature: f32) -> f32 {
    if temperature < range.min || temperature > range.max {
        return 0.0;
    }
    if temperature < range.min_optimal {
        return inverse_lerp(range.min, range.min_optimal, temperature);
    }
    if temperature > range.max_optimal {
        return inverse_lerp(range.max, range.max_optimal, temperature);
    }
    1.0
}

/// Position of `value` between `from` (0) and `to` (1), clamped to `[0, 1]`.
fn inverse_lerp(from: f32, to: f32, value: f32) -> f32 {
    let span = to - from;
    if span.abs() <= f32::EPSILON {
        return 1.0;
    }
    ((value - from) / span).clamp(0.0, 1.0)
}

/// Suitability queries for one species against one host grid.
#[derive(Debug)]
pub struct Suitability<'a, G: WorldGrid + ?Sized> {
    /// Species being evaluated.
    species: &'a SpeciesDefinition,
    /// Host grid answering the queries.
    grid: &'a G,
}

impl<'a, G: WorldGrid + ?Sized> Suitability<'a, G> {
    /// Bind a species to a grid.
    pub const fn new(species: &'a SpeciesDefinition, grid: &'a G) -> Self {
        Self { species, grid }
    }

    /// Fertility multiplier. Rough-rock species ignore soil and get 1.0;
    /// everyone else uses the host fertility value unclamped.
    pub fn fertility_factor(&self, pos: Position) -> f32 {
        if self.species.grow_only_on_rough_rock {
            return 1.0;
        }
        self.grid.fertility_at(pos)
    }

    /// Temperature multiplier at `pos`. See [`temperature_factor_for`].
    pub fn temperature_factor(&self, pos: Position) -> f32 {
        temperature_factor_for(&self.species.temperature, self.grid.temperature_at(pos))
    }

    /// Light gate expressed as a multiplier: 1.0 inside the window, else 0.0.
    pub fn light_factor(&self, pos: Position) -> f32 {
        let light = self.grid.light_at(pos);
        if light >= self.species.light.min && light <= self.species.light.max {
            1.0
        } else {
            0.0
        }
    }

    /// Product of the fertility, temperature, and light factors.
    pub fn combined_growth_rate(&self, pos: Position) -> f32 {
        self.fertility_factor(pos) * self.temperature_factor(pos) * self.light_factor(pos)
    }

    /// Whether the plant at `pos` is suspended by cold.
    pub fn is_in_cryostasis(&self, pos: Position) -> bool {
        self.grid.temperature_at(pos) < self.species.temperature.min
    }

    /// Whether the soil gate passes: rough rock for rock species, otherwise
    /// any positive fertility.
    pub fn is_soil_ok(&self, pos: Position) -> bool {
        if self.species.grow_only_on_rough_rock {
            terrain::is_natural_rough_rock_at(self.grid, pos)
        } else {
            self.fertility_factor(pos) > 0.0
        }
    }

    /// Whether the cell holds an artificial grow surface.
    pub fn is_on_plant_grower(&self, pos: Position) -> bool {
        self.grid
            .building_at(pos)
            .is_some_and(|building| building.is_plant_grower)
    }

    /// Whether the roof gate passes (always true for species that do not
    /// need a roof).
    pub fn is_roof_ok(&self, pos: Position) -> bool {
        !self.species.grow_only_under_roof || self.grid.is_roofed(pos)
    }

    /// Whether the rock-proximity gate passes (always true for species that
    /// do not need nearby rock).
    pub fn is_rock_proximity_ok(&self, pos: Position) -> bool {
        !self.species.grow_only_near_natural_rock
            || terrain::is_near_natural_rock_block(self.grid, pos)
    }

    /// Soil, roof, and rock-proximity gates together.
    pub fn is_on_valid_natural_spot(&self, pos: Position) -> bool {
        self.is_soil_ok(pos) && self.is_roof_ok(pos) && self.is_rock_proximity_ok(pos)
    }

    /// Evaluate every axis once and bundle the answers.
    pub fn evaluate(&self, pos: Position) -> SuitabilityReport {
        let temperature = self.grid.temperature_at(pos);
        let light = self.grid.light_at(pos);
        let soil_ok = self.is_soil_ok(pos);
        let roof_ok = self.is_roof_ok(pos);
        let rock_proximity_ok = self.is_rock_proximity_ok(pos);
        SuitabilityReport {
            fertility_factor: self.fertility_factor(pos),
            temperature,
            temperature_factor: temperature_factor_for(&self.species.temperature, temperature),
            light,
            light_factor: self.light_factor(pos),
            in_cryostasis: temperature < self.species.temperature.min,
            too_hot: temperature > self.species.temperature.max,
            on_plant_grower: self.is_on_plant_grower(pos),
            soil_ok,
            roof_ok,
            rock_proximity_ok,
            snow_depth: self.grid.snow_depth_at(pos),
        }
    }
}

/// All suitability answers for one plant at one moment.
///
/// Computed once at the start of a batch so every later step of the batch
/// sees the same environment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuitabilityReport {
    /// Fertility multiplier.
    pub fertility_factor: f32,
    /// Raw temperature.
    pub temperature: f32,
    /// Temperature multiplier.
    pub temperature_factor: f32,
    /// Raw light level.
    pub light: f32,
    /// Light gate as a multiplier.
    pub light_factor: f32,
    /// Temperature below the species minimum.
    pub in_cryostasis: bool,
    /// Temperature above the species maximum.
    pub too_hot: bool,
    /// Cell holds an artificial grow surface.
    pub on_plant_grower: bool,
    /// Soil gate.
    pub soil_ok: bool,
    /// Roof gate.
    pub roof_ok: bool,
    /// Rock-proximity gate.
    pub rock_proximity_ok: bool,
    /// Snow depth on the cell.
    pub snow_depth: f32,
}

impl SuitabilityReport {
    /// Product of the three numeric factors; zero while in cryostasis.
    pub fn growth_rate(&self) -> f32 {
        if self.in_cryostasis {
            return 0.0;
        }
        self.fertility_factor * self.temperature_factor * self.light_factor
    }

    /// Whether the temperature allows any growth.
    pub fn is_temperature_ok(&self) -> bool {
        self.temperature_factor > 0.0
    }

    /// Whether the light gate passes.
    pub fn is_light_ok(&self) -> bool {
        self.light_factor > 0.0
    }

    /// Soil, roof, and rock-proximity gates together.
    pub const fn is_on_valid_natural_spot(&self) -> bool {
        self.soil_ok && self.roof_ok && self.rock_proximity_ok
    }

    /// Whether the plant has somewhere acceptable to grow: a grow surface
    /// or a valid natural spot.
    pub const fn has_valid_spot(&self) -> bool {
        self.on_plant_grower || self.is_on_valid_natural_spot()
    }
}
