//! Default starting cave for headless runs.
//!
//! A roofed, dim cave enclosed by natural granite, with four areas that
//! exercise the different growth gates:
//!
//! | Area         | Terrain          | Notes                                  |
//! |--------------|------------------|----------------------------------------|
//! | Moss bed     | fertile soil     | fertility 0.9, good for soil species   |
//! | Rock garden  | rough granite    | next to a granite pillar               |
//! | Basin        | wooden floor     | fungiponics basin, fertility 1.1       |
//! | Lit chamber  | rough granite    | unroofed and bright, snow accumulates  |

use flora_types::{Building, EntityId, EntityKind, Position, Terrain};

use crate::error::WorldError;
use crate::memory::MemoryGrid;

/// Smallest side length that fits every area.
pub const MIN_CAVE_SIDE: u32 = 16;

/// Default cave temperature.
pub const CAVE_TEMPERATURE: f32 = 16.0;

/// Default cave light level.
pub const CAVE_LIGHT: f32 = 0.05;

/// Building kind used for natural rock.
pub const ROCK_KIND: &str = "Granite";

/// Building kind used for the grow surface.
pub const BASIN_KIND: &str = "FungiponicsBasin";

/// Fertility the basin provides to whatever grows in it.
pub const BASIN_FERTILITY: f32 = 1.1;

/// Notable cells of the starting cave, returned alongside the grid so
/// callers can found clusters in specific areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaveLandmarks {
    /// Center of the fertile moss bed.
    pub moss_bed: Position,
    /// Center of the rough-rock garden, two cells from a pillar.
    pub rock_garden: Position,
    /// Cell holding the fungiponics basin.
    pub basin: Position,
    /// Center of the bright, unroofed chamber.
    pub lit_chamber: Position,
}

fn rough_granite() -> Terrain {
    Terrain {
        name: "Granite_Rough".to_owned(),
        layerable: false,
    }
}

fn natural_rock() -> Building {
    Building {
        entity: EntityId::new(),
        kind: EntityKind::new(ROCK_KIND),
        is_natural_rock: true,
        is_plant_grower: false,
    }
}

/// Build the starting cave.
///
/// # Errors
///
/// Returns [`WorldError::InvalidDimensions`] if either side is below
/// [`MIN_CAVE_SIDE`].
pub fn create_starting_cave(width: u32, height: u32) -> Result<(MemoryGrid, CaveLandmarks), WorldError> {
    if width < MIN_CAVE_SIDE || height < MIN_CAVE_SIDE {
        return Err(WorldError::InvalidDimensions { width, height });
    }
    let mut grid = MemoryGrid::new(width, height)?;
    grid.fill_roofed(true);
    grid.fill_temperature(CAVE_TEMPERATURE);
    grid.fill_light(CAVE_LIGHT);

    let positions: Vec<Position> = grid.positions().collect();
    for pos in &positions {
        grid.set_terrain(*pos, rough_granite())?;
    }

    let (Ok(w), Ok(h)) = (i32::try_from(width), i32::try_from(height)) else {
        return Err(WorldError::InvalidDimensions { width, height });
    };

    // Granite walls around the edge.
    for pos in positions
        .iter()
        .filter(|p| p.x == 0 || p.z == 0 || p.x == w - 1 || p.z == h - 1)
    {
        grid.place_building(*pos, natural_rock())?;
    }

    let landmarks = CaveLandmarks {
        moss_bed: Position::new(w / 4, h / 4),
        rock_garden: Position::new(w * 3 / 4, h / 4),
        basin: Position::new(w / 4, h * 3 / 4),
        lit_chamber: Position::new(w * 3 / 4, h * 3 / 4),
    };

    for pos in landmarks.moss_bed.square(2) {
        grid.set_terrain(
            pos,
            Terrain {
                name: "Soil".to_owned(),
                layerable: false,
            },
        )?;
        grid.set_fertility(pos, 0.9)?;
    }

    grid.place_building(landmarks.rock_garden.offset(2, 0), natural_rock())?;

    grid.set_terrain(
        landmarks.basin,
        Terrain {
            name: "WoodPlankFloor".to_owned(),
            layerable: true,
        },
    )?;
    grid.set_fertility(landmarks.basin, BASIN_FERTILITY)?;
    grid.place_building(
        landmarks.basin,
        Building {
            entity: EntityId::new(),
            kind: EntityKind::new(BASIN_KIND),
            is_natural_rock: false,
            is_plant_grower: true,
        },
    )?;

    for pos in landmarks.lit_chamber.square(2) {
        grid.set_roofed(pos, false)?;
        grid.set_light(pos, 0.8)?;
    }

    tracing::debug!(
        width,
        height,
        buildings = grid.building_count(),
        "starting cave created"
    );
    Ok((grid, landmarks))
}
