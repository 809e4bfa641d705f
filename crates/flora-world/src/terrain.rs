//! Terrain gates and static placement checks.
//!
//! The gates here need only a species and a cell, never a living plant, so
//! they serve both the per-batch suitability evaluation and the offspring
//! placer deciding where a seed may land.

use flora_types::{Position, SpeciesDefinition};

use crate::host::WorldGrid;

/// Radius of the square scanned for natural rock (2 gives a 5x5 block).
pub const NATURAL_ROCK_SCAN_RADIUS: i32 = 2;

/// Whether the terrain at `pos` is natural, non-layerable, and rough.
pub fn is_natural_rough_rock_at<G: WorldGrid + ?Sized>(grid: &G, pos: Position) -> bool {
    grid.terrain_at(pos)
        .is_some_and(flora_types::Terrain::is_natural_rough_rock)
}

/// Whether a natural rock block stands anywhere in the 5x5 square around
/// `pos`. Cells outside the map are skipped.
pub fn is_near_natural_rock_block<G: WorldGrid + ?Sized>(grid: &G, pos: Position) -> bool {
    pos.square(NATURAL_ROCK_SCAN_RADIUS)
        .filter(|cell| grid.in_bounds(*cell))
        .any(|cell| {
            grid.building_at(cell)
                .is_some_and(|building| building.is_natural_rock)
        })
}

/// Whether the fertility at `pos` lies inside the species fertility window.
pub fn is_fertility_in_range_at<G: WorldGrid + ?Sized>(
    species: &SpeciesDefinition,
    grid: &G,
    pos: Position,
) -> bool {
    let fertility = grid.fertility_at(pos);
    fertility >= species.fertility.min && fertility <= species.fertility.max
}

/// Whether the light at `pos` lies inside the species light window.
pub fn is_light_ok_at<G: WorldGrid + ?Sized>(
    species: &SpeciesDefinition,
    grid: &G,
    pos: Position,
) -> bool {
    let light = grid.light_at(pos);
    light >= species.light.min && light <= species.light.max
}

/// Whether the temperature at `pos` lies inside `[min, max]`.
pub fn is_temperature_ok_at<G: WorldGrid + ?Sized>(
    species: &SpeciesDefinition,
    grid: &G,
    pos: Position,
) -> bool {
    let temperature = grid.temperature_at(pos);
    temperature >= species.temperature.min && temperature <= species.temperature.max
}

/// Whether the ground at `pos` could support the species: rough rock (or a
/// fertility within range), plus the roof and rock-proximity gates the
/// species asks for.
pub fn can_terrain_support_plant_at<G: WorldGrid + ?Sized>(
    species: &SpeciesDefinition,
    grid: &G,
    pos: Position,
) -> bool {
    let soil_ok = if species.grow_only_on_rough_rock {
        is_natural_rough_rock_at(grid, pos)
    } else {
        is_fertility_in_range_at(species, grid, pos)
    };
    soil_ok
        && (!species.grow_only_under_roof || grid.is_roofed(pos))
        && (!species.grow_only_near_natural_rock || is_near_natural_rock_block(grid, pos))
}

/// Full static check for dropping a seed on `pos`: in bounds, no building
/// in the way (grow surfaces excepted), supportive terrain, and light and
/// temperature inside the species windows.
pub fn can_place_seed_at<G: WorldGrid + ?Sized>(
    species: &SpeciesDefinition,
    grid: &G,
    pos: Position,
) -> bool {
    if !grid.in_bounds(pos) {
        return false;
    }
    let blocked = grid
        .building_at(pos)
        .is_some_and(|building| !building.is_plant_grower);
    !blocked
        && can_terrain_support_plant_at(species, grid, pos)
        && is_light_ok_at(species, grid, pos)
        && is_temperature_ok_at(species, grid, pos)
}
