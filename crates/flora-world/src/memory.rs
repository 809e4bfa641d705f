//! In-memory host: a rectangular [`MemoryGrid`] and a [`MemoryEntities`]
//! registry.
//!
//! These back the headless engine binary and every test. Cells are stored
//! row-major; out-of-bounds queries answer with the least favorable value
//! (no fertility, no light, no roof, no terrain).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use flora_types::{Building, DestroyMode, EntityId, EntityKind, Position, Terrain};

use crate::error::WorldError;
use crate::host::{EntityService, WorldGrid};

/// Terrain used for freshly created cells.
pub const DEFAULT_TERRAIN: &str = "Soil";

/// Environmental state of a single cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellState {
    /// Soil fertility.
    pub fertility: f32,
    /// Air temperature.
    pub temperature: f32,
    /// Ambient light.
    pub light: f32,
    /// Snow depth.
    pub snow_depth: f32,
    /// Whether a roof covers the cell.
    pub roofed: bool,
    /// Terrain covering the cell.
    pub terrain: Terrain,
}

impl Default for CellState {
    fn default() -> Self {
        Self {
            fertility: 0.0,
            temperature: 0.0,
            light: 0.0,
            snow_depth: 0.0,
            roofed: false,
            terrain: Terrain {
                name: DEFAULT_TERRAIN.to_owned(),
                layerable: false,
            },
        }
    }
}

/// A rectangular world grid held entirely in memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryGrid {
    /// Number of columns.
    width: u32,
    /// Number of rows.
    height: u32,
    /// Row-major cell states (`width * height` entries).
    cells: Vec<CellState>,
    /// Buildings keyed by the cell they stand on.
    buildings: BTreeMap<Position, Building>,
}

impl MemoryGrid {
    /// Create a grid of default cells.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimensions`] if either side is zero or
    /// the grid would not fit in memory indexing.
    pub fn new(width: u32, height: u32) -> Result<Self, WorldError> {
        let invalid = || WorldError::InvalidDimensions { width, height };
        if width == 0 || height == 0 || i32::try_from(width).is_err() || i32::try_from(height).is_err()
        {
            return Err(invalid());
        }
        let count = usize::try_from(width)
            .ok()
            .and_then(|w| usize::try_from(height).ok().and_then(|h| w.checked_mul(h)))
            .ok_or_else(invalid)?;
        Ok(Self {
            width,
            height,
            cells: vec![CellState::default(); count],
            buildings: BTreeMap::new(),
        })
    }

    /// Number of columns.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Row-major index of an in-bounds position.
    fn index(&self, pos: Position) -> Option<usize> {
        let x = u32::try_from(pos.x).ok()?;
        let z = u32::try_from(pos.z).ok()?;
        if x >= self.width || z >= self.height {
            return None;
        }
        let row = usize::try_from(z).ok()?.checked_mul(usize::try_from(self.width).ok()?)?;
        row.checked_add(usize::try_from(x).ok()?)
    }

    /// Borrow a cell.
    pub fn cell(&self, pos: Position) -> Option<&CellState> {
        self.index(pos).and_then(|i| self.cells.get(i))
    }

    /// Mutably borrow a cell.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] if `pos` is outside the grid.
    pub fn cell_mut(&mut self, pos: Position) -> Result<&mut CellState, WorldError> {
        let index = self.index(pos).ok_or(WorldError::OutOfBounds(pos))?;
        self.cells.get_mut(index).ok_or(WorldError::OutOfBounds(pos))
    }

    /// Iterate over every in-bounds position, row by row.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let width = i32::try_from(self.width).unwrap_or(0);
        let height = i32::try_from(self.height).unwrap_or(0);
        (0..height).flat_map(move |z| (0..width).map(move |x| Position::new(x, z)))
    }

    /// Set the fertility of one cell.
    pub fn set_fertility(&mut self, pos: Position, value: f32) -> Result<(), WorldError> {
        self.cell_mut(pos)?.fertility = value;
        Ok(())
    }

    /// Set the temperature of one cell.
    pub fn set_temperature(&mut self, pos: Position, value: f32) -> Result<(), WorldError> {
        self.cell_mut(pos)?.temperature = value;
        Ok(())
    }

    /// Set the light level of one cell.
    pub fn set_light(&mut self, pos: Position, value: f32) -> Result<(), WorldError> {
        self.cell_mut(pos)?.light = value;
        Ok(())
    }

    /// Set the snow depth of one cell.
    pub fn set_snow_depth(&mut self, pos: Position, value: f32) -> Result<(), WorldError> {
        self.cell_mut(pos)?.snow_depth = value;
        Ok(())
    }

    /// Roof or unroof one cell.
    pub fn set_roofed(&mut self, pos: Position, roofed: bool) -> Result<(), WorldError> {
        self.cell_mut(pos)?.roofed = roofed;
        Ok(())
    }

    /// Replace the terrain of one cell.
    pub fn set_terrain(&mut self, pos: Position, terrain: Terrain) -> Result<(), WorldError> {
        self.cell_mut(pos)?.terrain = terrain;
        Ok(())
    }

    /// Set the fertility of every cell.
    pub fn fill_fertility(&mut self, value: f32) {
        self.cells.iter_mut().for_each(|c| c.fertility = value);
    }

    /// Set the temperature of every cell.
    pub fn fill_temperature(&mut self, value: f32) {
        self.cells.iter_mut().for_each(|c| c.temperature = value);
    }

    /// Set the light level of every cell.
    pub fn fill_light(&mut self, value: f32) {
        self.cells.iter_mut().for_each(|c| c.light = value);
    }

    /// Set the snow depth of every cell.
    pub fn fill_snow_depth(&mut self, value: f32) {
        self.cells.iter_mut().for_each(|c| c.snow_depth = value);
    }

    /// Roof or unroof every cell.
    pub fn fill_roofed(&mut self, roofed: bool) {
        self.cells.iter_mut().for_each(|c| c.roofed = roofed);
    }

    /// Place a building on a free cell.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] outside the grid, or
    /// [`WorldError::CellOccupied`] if a building is already there.
    pub fn place_building(&mut self, pos: Position, building: Building) -> Result<(), WorldError> {
        if self.index(pos).is_none() {
            return Err(WorldError::OutOfBounds(pos));
        }
        if self.buildings.contains_key(&pos) {
            return Err(WorldError::CellOccupied(pos));
        }
        self.buildings.insert(pos, building);
        Ok(())
    }

    /// Remove and return the building on a cell, if any.
    pub fn remove_building(&mut self, pos: Position) -> Option<Building> {
        self.buildings.remove(&pos)
    }

    /// Number of buildings on the grid.
    pub fn building_count(&self) -> usize {
        self.buildings.len()
    }
}

impl WorldGrid for MemoryGrid {
    fn in_bounds(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    fn fertility_at(&self, pos: Position) -> f32 {
        self.cell(pos).map_or(0.0, |c| c.fertility)
    }

    fn temperature_at(&self, pos: Position) -> f32 {
        self.cell(pos).map_or(0.0, |c| c.temperature)
    }

    fn light_at(&self, pos: Position) -> f32 {
        self.cell(pos).map_or(0.0, |c| c.light)
    }

    fn snow_depth_at(&self, pos: Position) -> f32 {
        self.cell(pos).map_or(0.0, |c| c.snow_depth)
    }

    fn is_roofed(&self, pos: Position) -> bool {
        self.cell(pos).is_some_and(|c| c.roofed)
    }

    fn terrain_at(&self, pos: Position) -> Option<&Terrain> {
        self.cell(pos).map(|c| &c.terrain)
    }

    fn building_at(&self, pos: Position) -> Option<&Building> {
        self.buildings.get(&pos)
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A host entity tracked by [`MemoryEntities`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnedEntity {
    /// Kind the entity was spawned as.
    pub kind: EntityKind,
    /// Cell it was spawned on.
    pub position: Position,
    /// Whether colonists may interact with it.
    pub forbidden: bool,
}

/// In-memory entity registry implementing [`EntityService`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEntities {
    /// Living entities.
    alive: BTreeMap<EntityId, SpawnedEntity>,
    /// Total spawns since creation.
    spawned_total: u64,
    /// Total effective destroys since creation.
    destroyed_total: u64,
}

impl MemoryEntities {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            alive: BTreeMap::new(),
            spawned_total: 0,
            destroyed_total: 0,
        }
    }

    /// Borrow a living entity.
    pub fn get(&self, entity: EntityId) -> Option<&SpawnedEntity> {
        self.alive.get(&entity)
    }

    /// Number of living entities.
    pub fn alive_count(&self) -> usize {
        self.alive.len()
    }

    /// Living entities standing on `pos`.
    pub fn entities_at(&self, pos: Position) -> Vec<EntityId> {
        self.alive
            .iter()
            .filter(|(_, e)| e.position == pos)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Total spawns since creation.
    pub const fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    /// Total effective destroys since creation.
    pub const fn destroyed_total(&self) -> u64 {
        self.destroyed_total
    }

    /// Whether the entity is marked forbidden.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EntityNotFound`] for unknown entities.
    pub fn is_forbidden(&self, entity: EntityId) -> Result<bool, WorldError> {
        self.alive
            .get(&entity)
            .map(|e| e.forbidden)
            .ok_or(WorldError::EntityNotFound(entity))
    }
}

impl EntityService for MemoryEntities {
    fn spawn(&mut self, kind: &EntityKind, pos: Position) -> EntityId {
        let id = EntityId::new();
        self.alive.insert(
            id,
            SpawnedEntity {
                kind: kind.clone(),
                position: pos,
                forbidden: false,
            },
        );
        self.spawned_total = self.spawned_total.saturating_add(1);
        id
    }

    fn destroy(&mut self, entity: EntityId, _mode: DestroyMode) {
        if self.alive.remove(&entity).is_some() {
            self.destroyed_total = self.destroyed_total.saturating_add(1);
        }
    }

    fn is_alive(&self, entity: EntityId) -> bool {
        self.alive.contains_key(&entity)
    }

    fn set_forbidden(&mut self, entity: EntityId, forbidden: bool) {
        if let Some(e) = self.alive.get_mut(&entity) {
            e.forbidden = forbidden;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_grid_rejected() {
        assert!(MemoryGrid::new(0, 5).is_err());
        assert!(MemoryGrid::new(5, 0).is_err());
    }

    #[test]
    fn bounds_and_defaults() {
        let grid = MemoryGrid::new(3, 2).unwrap();
        assert!(grid.in_bounds(Position::new(2, 1)));
        assert!(!grid.in_bounds(Position::new(3, 1)));
        assert!(!grid.in_bounds(Position::new(0, -1)));
        assert_eq!(grid.positions().count(), 6);
        assert_eq!(grid.fertility_at(Position::new(9, 9)), 0.0);
        assert!(grid.terrain_at(Position::new(9, 9)).is_none());
        assert_eq!(
            grid.terrain_at(Position::new(1, 1)).map(|t| t.name.as_str()),
            Some(DEFAULT_TERRAIN)
        );
    }

    #[test]
    fn setters_target_one_cell() {
        let mut grid = MemoryGrid::new(4, 4).unwrap();
        grid.set_temperature(Position::new(1, 2), 12.5).unwrap();
        assert_eq!(grid.temperature_at(Position::new(1, 2)), 12.5);
        assert_eq!(grid.temperature_at(Position::new(2, 1)), 0.0);
        assert!(grid.set_light(Position::new(4, 0), 1.0).is_err());
    }

    #[test]
    fn buildings_do_not_stack() {
        let mut grid = MemoryGrid::new(4, 4).unwrap();
        let building = Building {
            entity: EntityId::new(),
            kind: EntityKind::new("PlantPot"),
            is_natural_rock: false,
            is_plant_grower: true,
        };
        let pos = Position::new(1, 1);
        grid.place_building(pos, building.clone()).unwrap();
        assert!(matches!(
            grid.place_building(pos, building),
            Err(WorldError::CellOccupied(_))
        ));
        assert!(grid.remove_building(pos).is_some());
        assert_eq!(grid.building_count(), 0);
    }

    #[test]
    fn entity_lifecycle() {
        let mut entities = MemoryEntities::new();
        let kind = EntityKind::new("GlowerSmall");
        let id = entities.spawn(&kind, Position::new(2, 2));
        assert!(entities.is_alive(id));
        assert_eq!(entities.entities_at(Position::new(2, 2)), vec![id]);

        entities.set_forbidden(id, true);
        assert!(entities.is_forbidden(id).unwrap());

        entities.destroy(id, DestroyMode::Vanish);
        assert!(!entities.is_alive(id));
        entities.destroy(id, DestroyMode::Vanish);
        assert_eq!(entities.destroyed_total(), 1);
        assert!(entities.is_forbidden(id).is_err());
    }
}
