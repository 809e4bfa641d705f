//! Glower synchronization.
//!
//! Light-emitting species keep one host glower entity next to each living
//! plant. Each batch the required glower kind is recomputed from growth and
//! visibility, and the live entity is spawned, swapped, or removed to
//! match. Tiers are compared by entity kind, so a tier change that maps to
//! the same kind leaves the entity alone.

use flora_types::{
    DestroyMode, EntityKind, GlowerHandle, GlowerSpec, GlowerTier, SpeciesDefinition,
};
use flora_world::{EntityService, SuitabilityReport};

use crate::plant::PlantInstance;

/// Growth at which a dynamic glower grows from small to medium.
pub const MEDIUM_GLOWER_MIN_GROWTH: f32 = 0.33;

/// Growth at which a dynamic glower grows from medium to big.
pub const BIG_GLOWER_MIN_GROWTH: f32 = 0.66;

/// What [`sync_glower`] did this batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlowerChange {
    /// Nothing to do.
    Unchanged,
    /// A glower was spawned where there was none.
    Spawned(EntityKind),
    /// The live glower was replaced by one of another kind.
    Swapped {
        /// Kind removed.
        from: EntityKind,
        /// Kind spawned.
        to: EntityKind,
    },
    /// The live glower was removed because the plant is hidden.
    Removed,
}

/// Tier the species needs at `growth`, or `None` if it emits no light.
pub fn required_tier(spec: &GlowerSpec, growth: f32) -> Option<GlowerTier> {
    match spec {
        GlowerSpec::None => None,
        GlowerSpec::Static { .. } => Some(GlowerTier::Static),
        GlowerSpec::Dynamic { .. } => Some(if growth < MEDIUM_GLOWER_MIN_GROWTH {
            GlowerTier::Small
        } else if growth < BIG_GLOWER_MIN_GROWTH {
            GlowerTier::Medium
        } else {
            GlowerTier::Big
        }),
    }
}

/// Entity kind the species needs at `growth`, if any.
pub fn required_kind(spec: &GlowerSpec, growth: f32) -> Option<&EntityKind> {
    required_tier(spec, growth).and_then(|tier| spec.kind_for(tier))
}

/// Whether the glower must be hidden: the plant is in cryostasis or buried
/// under at least the species' snow threshold.
pub fn is_glower_hidden(species: &SpeciesDefinition, report: &SuitabilityReport) -> bool {
    report.in_cryostasis || report.snow_depth >= species.hide_at_snow_depth
}

/// Drop the glower handle if the host no longer knows its entity.
///
/// Returns `true` if a stale handle was dropped.
pub fn forget_stale_glower(plant: &mut PlantInstance, entities: &dyn EntityService) -> bool {
    let stale = plant
        .glower
        .as_ref()
        .is_some_and(|handle| !entities.is_alive(handle.entity));
    if stale {
        plant.glower = None;
    }
    stale
}

/// Remove the plant's glower, if any, and clear the handle.
///
/// Safe to call repeatedly. Returns `true` if a live entity was destroyed.
pub fn teardown_glower(plant: &mut PlantInstance, entities: &mut dyn EntityService) -> bool {
    let Some(handle) = plant.glower.take() else {
        return false;
    };
    if !entities.is_alive(handle.entity) {
        return false;
    }
    entities.destroy(handle.entity, DestroyMode::Vanish);
    true
}

/// Reconcile the plant's glower with what the species needs right now.
///
/// Destroyed plants and species without light are left alone. Spawned
/// glowers are marked forbidden so colonists never haul or deconstruct
/// them.
pub fn sync_glower(
    plant: &mut PlantInstance,
    species: &SpeciesDefinition,
    report: &SuitabilityReport,
    entities: &mut dyn EntityService,
) -> GlowerChange {
    if plant.destroyed || !species.glower.emits_light() {
        return GlowerChange::Unchanged;
    }
    forget_stale_glower(plant, entities);

    if is_glower_hidden(species, report) {
        return if teardown_glower(plant, entities) {
            GlowerChange::Removed
        } else {
            GlowerChange::Unchanged
        };
    }

    let Some(kind) = required_kind(&species.glower, plant.growth) else {
        return GlowerChange::Unchanged;
    };
    let previous = match plant.glower.as_ref() {
        Some(handle) if handle.kind == *kind => return GlowerChange::Unchanged,
        Some(handle) => Some(handle.kind.clone()),
        None => None,
    };

    teardown_glower(plant, entities);
    let entity = entities.spawn(kind, plant.position);
    entities.set_forbidden(entity, true);
    plant.glower = Some(GlowerHandle {
        entity,
        kind: kind.clone(),
    });
    tracing::trace!(plant = %plant.id, kind = %kind, "glower spawned");

    match previous {
        Some(from) => GlowerChange::Swapped {
            from,
            to: kind.clone(),
        },
        None => GlowerChange::Spawned(kind.clone()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use flora_types::{Position, SpeciesId};
    use flora_world::{MemoryEntities, MemoryGrid, Suitability};

    use super::*;
    use crate::species::builtin_species;

    fn species(name: &str) -> SpeciesDefinition {
        builtin_species()
            .into_iter()
            .find(|s| s.id == SpeciesId::new(name))
            .unwrap()
    }

    fn cave() -> MemoryGrid {
        let mut grid = MemoryGrid::new(6, 6).unwrap();
        grid.fill_temperature(20.0);
        grid.fill_light(0.1);
        grid.fill_fertility(1.0);
        grid.fill_roofed(true);
        grid
    }

    #[test]
    fn dynamic_tiers_follow_growth() {
        let spec = species("Gleamcap").glower;
        assert_eq!(required_tier(&spec, 0.1), Some(GlowerTier::Small));
        assert_eq!(required_tier(&spec, 0.33), Some(GlowerTier::Medium));
        assert_eq!(required_tier(&spec, 0.65), Some(GlowerTier::Medium));
        assert_eq!(required_tier(&spec, 0.66), Some(GlowerTier::Big));
        assert_eq!(required_tier(&GlowerSpec::None, 0.5), None);
        assert_eq!(
            required_tier(&species("Starbloom").glower, 0.9),
            Some(GlowerTier::Static)
        );
    }

    #[test]
    fn spawn_then_swap_on_tier_change() {
        let gleamcap = species("Gleamcap");
        let grid = cave();
        let mut entities = MemoryEntities::new();
        let pos = Position::new(2, 2);
        let report = Suitability::new(&gleamcap, &grid).evaluate(pos);
        let mut plant = PlantInstance::spawn(&gleamcap, pos, None, 0.2);

        let change = sync_glower(&mut plant, &gleamcap, &report, &mut entities);
        assert_eq!(change, GlowerChange::Spawned(EntityKind::new("GlowerGleamcapSmall")));
        let first = plant.glower().unwrap().entity;
        assert!(entities.is_forbidden(first).unwrap());

        assert_eq!(
            sync_glower(&mut plant, &gleamcap, &report, &mut entities),
            GlowerChange::Unchanged
        );

        plant.growth = 0.5;
        let change = sync_glower(&mut plant, &gleamcap, &report, &mut entities);
        assert!(matches!(change, GlowerChange::Swapped { .. }));
        assert!(!entities.is_alive(first));
        assert_eq!(entities.alive_count(), 1);
    }

    #[test]
    fn deep_snow_hides_and_recovers() {
        let gleamcap = species("Gleamcap");
        let mut grid = cave();
        let mut entities = MemoryEntities::new();
        let pos = Position::new(2, 2);
        let mut plant = PlantInstance::spawn(&gleamcap, pos, None, 0.8);

        let report = Suitability::new(&gleamcap, &grid).evaluate(pos);
        sync_glower(&mut plant, &gleamcap, &report, &mut entities);
        assert!(plant.glower().is_some());

        grid.set_snow_depth(pos, 0.5).unwrap();
        let report = Suitability::new(&gleamcap, &grid).evaluate(pos);
        assert_eq!(
            sync_glower(&mut plant, &gleamcap, &report, &mut entities),
            GlowerChange::Removed
        );
        assert!(plant.glower().is_none());
        assert_eq!(entities.alive_count(), 0);

        grid.set_snow_depth(pos, 0.0).unwrap();
        let report = Suitability::new(&gleamcap, &grid).evaluate(pos);
        assert_eq!(
            sync_glower(&mut plant, &gleamcap, &report, &mut entities),
            GlowerChange::Spawned(EntityKind::new("GlowerGleamcapBig"))
        );
    }

    #[test]
    fn stale_handle_is_respawned() {
        let gleamcap = species("Gleamcap");
        let grid = cave();
        let mut entities = MemoryEntities::new();
        let pos = Position::new(2, 2);
        let report = Suitability::new(&gleamcap, &grid).evaluate(pos);
        let mut plant = PlantInstance::spawn(&gleamcap, pos, None, 0.2);
        sync_glower(&mut plant, &gleamcap, &report, &mut entities);

        let entity = plant.glower().unwrap().entity;
        entities.destroy(entity, DestroyMode::Vanish);
        let change = sync_glower(&mut plant, &gleamcap, &report, &mut entities);
        assert!(matches!(change, GlowerChange::Spawned(_)));
        assert_eq!(entities.alive_count(), 1);
    }

    #[test]
    fn species_without_light_spawns_nothing() {
        let moss = species("RockMoss");
        let grid = cave();
        let mut entities = MemoryEntities::new();
        let pos = Position::new(2, 2);
        let report = Suitability::new(&moss, &grid).evaluate(pos);
        let mut plant = PlantInstance::spawn(&moss, pos, None, 0.9);
        assert_eq!(
            sync_glower(&mut plant, &moss, &report, &mut entities),
            GlowerChange::Unchanged
        );
        assert_eq!(entities.alive_count(), 0);
    }

    #[test]
    fn teardown_is_idempotent() {
        let gleamcap = species("Gleamcap");
        let grid = cave();
        let mut entities = MemoryEntities::new();
        let pos = Position::new(2, 2);
        let report = Suitability::new(&gleamcap, &grid).evaluate(pos);
        let mut plant = PlantInstance::spawn(&gleamcap, pos, None, 0.2);
        sync_glower(&mut plant, &gleamcap, &report, &mut entities);

        assert!(teardown_glower(&mut plant, &mut entities));
        assert!(!teardown_glower(&mut plant, &mut entities));
        assert_eq!(entities.destroyed_total(), 1);
    }
}
