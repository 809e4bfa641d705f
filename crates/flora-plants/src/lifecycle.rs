//! Per-batch lifecycle of a cluster plant.
//!
//! [`advance_batch`] runs one batch for one plant, in this fixed order:
//!
//! 1. Evaluate suitability once for the plant's cell.
//! 2. Grow, if growing conditions hold.
//! 3. Outside cryostasis: age (mature plants only), then decay if dying,
//!    then seed emission.
//! 4. Synchronize the glower, unless the plant was destroyed in step 3.
//!
//! A destroyed plant is skipped entirely.

use flora_types::{DestructionCause, DyingReason, LifeStage, SpeciesDefinition};
use flora_world::{EntityService, Randomness, Suitability, SuitabilityReport, WorldGrid};

use crate::cluster::ClusterMembership;
use crate::config::GrowthConfig;
use crate::death::{self, DestructionReport};
use crate::glower::{self, GlowerChange};
use crate::plant::PlantInstance;
use crate::reproduction::{self, OffspringPlacer};

/// Host services a batch reaches into.
pub struct BatchHost<'a> {
    /// Environmental queries.
    pub grid: &'a dyn WorldGrid,
    /// Entity spawning and destruction.
    pub entities: &'a mut dyn EntityService,
    /// Randomness for seed rolls and placement.
    pub rng: &'a mut dyn Randomness,
    /// Cluster membership callbacks.
    pub clusters: &'a mut dyn ClusterMembership,
    /// Offspring placement.
    pub placer: &'a mut dyn OffspringPlacer,
}

/// Everything that happened to one plant in one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    /// Growth added this batch.
    pub growth_gained: f32,
    /// The plant crossed into [`LifeStage::Mature`] this batch.
    pub became_mature: bool,
    /// The plant was frozen this batch.
    pub in_cryostasis: bool,
    /// Reasons the plant is dying, empty if healthy.
    pub dying: Vec<DyingReason>,
    /// Decay damage applied.
    pub damage_taken: u32,
    /// Set if the plant was destroyed this batch.
    pub destruction: Option<DestructionReport>,
    /// Seed emission attempts made.
    pub reproduction_attempts: u32,
    /// Attempts that found a cell.
    pub offspring_placed: u32,
    /// What happened to the glower.
    pub glower: GlowerChange,
}

impl BatchOutcome {
    const fn skipped() -> Self {
        Self {
            growth_gained: 0.0,
            became_mature: false,
            in_cryostasis: false,
            dying: Vec::new(),
            damage_taken: 0,
            destruction: None,
            reproduction_attempts: 0,
            offspring_placed: 0,
            glower: GlowerChange::Unchanged,
        }
    }
}

/// Whether the plant grows this batch: it has sprouted but is not yet
/// mature, the temperature allows growth, the light gate passes, and it
/// stands on a grow surface or a valid natural spot.
pub fn is_growing_now(plant: &PlantInstance, report: &SuitabilityReport) -> bool {
    plant.stage() == LifeStage::Growing
        && report.is_temperature_ok()
        && report.is_light_ok()
        && report.has_valid_spot()
}

/// Raise a seed's growth when the host finishes sowing it.
///
/// Growth only ever increases here; destroyed plants are ignored.
pub fn sow(plant: &mut PlantInstance, growth: f32) {
    if plant.destroyed || !growth.is_finite() {
        return;
    }
    if growth > plant.growth {
        plant.growth = growth;
    }
}

/// Run one batch for one plant.
pub fn advance_batch(
    plant: &mut PlantInstance,
    species: &SpeciesDefinition,
    config: &GrowthConfig,
    host: &mut BatchHost<'_>,
) -> BatchOutcome {
    if plant.destroyed {
        return BatchOutcome::skipped();
    }
    let mut outcome = BatchOutcome::skipped();
    let report = Suitability::new(species, host.grid).evaluate(plant.position);
    outcome.in_cryostasis = report.in_cryostasis;

    let span = config.batch_tick_span;
    if is_growing_now(plant, &report) {
        let before = plant.growth;
        let per_tick = config.growth_per_tick(species.grow_days);
        plant.growth += per_tick * span as f32 * report.growth_rate();
        if config.fast_ecology {
            plant.growth += config.fast_ecology_growth_bonus;
        }
        outcome.growth_gained = plant.growth - before;
        outcome.became_mature = LifeStage::from_growth(before) != LifeStage::Mature
            && plant.stage() == LifeStage::Mature;
        if outcome.became_mature {
            tracing::debug!(plant = %plant.id, species = %plant.species, "plant matured");
        }
    }

    if !report.in_cryostasis {
        if plant.stage() == LifeStage::Mature {
            plant.age = plant.age.saturating_add(span);
        }

        let symbiosis_ok = death::is_symbiosis_ok(plant, species, &*host.clusters);
        outcome.dying = death::dying_reasons(
            plant,
            species,
            &report,
            species.lifespan_ticks(config.ticks_per_day),
            symbiosis_ok,
        );
        if !outcome.dying.is_empty() {
            outcome.damage_taken = config.decay_damage_amount();
            tracing::trace!(
                plant = %plant.id,
                damage = outcome.damage_taken,
                reasons = ?outcome.dying,
                "plant decaying"
            );
            outcome.destruction = death::apply_damage(
                plant,
                outcome.damage_taken,
                DestructionCause::Decay,
                host.entities,
                host.clusters,
            );
        }

        outcome.reproduction_attempts =
            reproduction::attempts_this_batch(plant, species, config, host.rng);
        for _ in 0..outcome.reproduction_attempts {
            match host.placer.try_place(plant, species, host.grid, host.rng) {
                Ok(cell) => {
                    outcome.offspring_placed += 1;
                    tracing::trace!(plant = %plant.id, cell = %cell, "offspring placed");
                }
                Err(e) => {
                    tracing::debug!(plant = %plant.id, error = %e, "offspring placement failed");
                }
            }
        }
    }

    if !plant.destroyed {
        outcome.glower = glower::sync_glower(plant, species, &report, host.entities);
    }
    outcome
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use flora_types::{Position, SpeciesId};
    use flora_world::{MemoryEntities, MemoryGrid, SeededRandomness};

    use super::*;
    use crate::cluster::ClusterRegistry;
    use crate::reproduction::NeighborhoodPlacer;
    use crate::species::builtin_species;

    fn species(name: &str) -> SpeciesDefinition {
        builtin_species()
            .into_iter()
            .find(|s| s.id == SpeciesId::new(name))
            .unwrap()
    }

    fn cave() -> MemoryGrid {
        let mut grid = MemoryGrid::new(12, 12).unwrap();
        grid.fill_temperature(20.0);
        grid.fill_light(0.1);
        grid.fill_fertility(1.0);
        grid.fill_roofed(true);
        grid
    }

    struct Host {
        grid: MemoryGrid,
        entities: MemoryEntities,
        rng: SeededRandomness,
        clusters: ClusterRegistry,
        placer: NeighborhoodPlacer,
    }

    impl Host {
        fn new() -> Self {
            Self {
                grid: cave(),
                entities: MemoryEntities::new(),
                rng: SeededRandomness::new(42),
                clusters: ClusterRegistry::new(),
                placer: NeighborhoodPlacer::new([], 8),
            }
        }

        fn run(
            &mut self,
            plant: &mut PlantInstance,
            species: &SpeciesDefinition,
            config: &GrowthConfig,
        ) -> BatchOutcome {
            let mut host = BatchHost {
                grid: &self.grid,
                entities: &mut self.entities,
                rng: &mut self.rng,
                clusters: &mut self.clusters,
                placer: &mut self.placer,
            };
            advance_batch(plant, species, config, &mut host)
        }
    }

    fn quiet(mut species: SpeciesDefinition) -> SpeciesDefinition {
        species.seed_emit_mtb_days = f32::INFINITY;
        species
    }

    #[test]
    fn seed_does_not_grow_until_sown() {
        let gleamcap = quiet(species("Gleamcap"));
        let config = GrowthConfig::default();
        let mut host = Host::new();
        let mut plant = PlantInstance::spawn(&gleamcap, Position::new(5, 5), None, 0.0);

        let outcome = host.run(&mut plant, &gleamcap, &config);
        assert_eq!(outcome.growth_gained, 0.0);
        assert_eq!(plant.stage(), LifeStage::Seed);

        sow(&mut plant, 0.05);
        let outcome = host.run(&mut plant, &gleamcap, &config);
        assert!(outcome.growth_gained > 0.0);
    }

    #[test]
    fn ideal_growth_per_batch() {
        let gleamcap = quiet(species("Gleamcap"));
        let config = GrowthConfig::default();
        let mut host = Host::new();
        let mut plant = PlantInstance::spawn(&gleamcap, Position::new(5, 5), None, 0.05);

        let outcome = host.run(&mut plant, &gleamcap, &config);
        let expected = 2_000.0 / (8.0 * 60_000.0);
        assert!((outcome.growth_gained - expected).abs() < 1e-6);
    }

    #[test]
    fn maturity_edge_fires_once() {
        let gleamcap = quiet(species("Gleamcap"));
        let config = GrowthConfig::default();
        let mut host = Host::new();
        let mut plant = PlantInstance::spawn(&gleamcap, Position::new(5, 5), None, 0.998);

        let first = host.run(&mut plant, &gleamcap, &config);
        assert!(first.became_mature);
        let second = host.run(&mut plant, &gleamcap, &config);
        assert!(!second.became_mature);
        assert_eq!(second.growth_gained, 0.0);
        assert_eq!(plant.age(), 4_000);
    }

    #[test]
    fn cryostasis_freezes_everything() {
        let gleamcap = quiet(species("Gleamcap"));
        let config = GrowthConfig::default();
        let mut host = Host::new();
        host.grid.fill_temperature(-20.0);
        host.grid.fill_light(0.9);
        let mut plant = PlantInstance::spawn(&gleamcap, Position::new(5, 5), None, 1.0);

        for _ in 0..10 {
            let outcome = host.run(&mut plant, &gleamcap, &config);
            assert!(outcome.in_cryostasis);
            assert!(outcome.dying.is_empty());
        }
        assert_eq!(plant.age(), 0);
        assert_eq!(plant.hit_points(), gleamcap.max_hit_points);
        assert!(plant.glower().is_none());
    }

    #[test]
    fn dying_plant_decays_to_destruction() {
        let gleamcap = quiet(species("Gleamcap"));
        let config = GrowthConfig::default();
        let mut host = Host::new();
        host.grid.fill_light(0.9);
        let cluster = host.clusters.found(gleamcap.id.clone(), Position::new(5, 5));
        host.clusters.add_member(cluster).unwrap();
        let mut plant = PlantInstance::spawn(&gleamcap, Position::new(5, 5), Some(cluster), 0.5);

        let mut batches = 0;
        let mut destroyed = 0;
        while !plant.is_destroyed() && batches < 100 {
            let outcome = host.run(&mut plant, &gleamcap, &config);
            assert_eq!(outcome.dying, vec![DyingReason::Overlit]);
            assert_eq!(outcome.damage_taken, 2);
            if outcome.destruction.is_some() {
                destroyed += 1;
            }
            batches += 1;
        }
        assert_eq!(batches, 43);
        assert_eq!(destroyed, 1);
        assert!(host.clusters.get(cluster).unwrap().dissolved);

        let after = host.run(&mut plant, &gleamcap, &config);
        assert_eq!(after, BatchOutcome::skipped());
    }

    #[test]
    fn old_age_kills_mature_plants() {
        let mut gleamcap = quiet(species("Gleamcap"));
        gleamcap.lifespan_days = Some(0.05);
        let config = GrowthConfig::default();
        let mut host = Host::new();
        let mut plant = PlantInstance::spawn(&gleamcap, Position::new(5, 5), None, 1.0);

        assert!(host.run(&mut plant, &gleamcap, &config).dying.is_empty());
        let outcome = host.run(&mut plant, &gleamcap, &config);
        assert_eq!(outcome.dying, vec![DyingReason::OldAge]);
    }

    #[test]
    fn reproduction_queues_offspring() {
        let mut gleamcap = species("Gleamcap");
        gleamcap.seed_emit_mtb_days = 0.0;
        let config = GrowthConfig::default();
        let mut host = Host::new();
        let mut plant = PlantInstance::spawn(&gleamcap, Position::new(5, 5), None, 0.9);

        let outcome = host.run(&mut plant, &gleamcap, &config);
        assert_eq!(outcome.reproduction_attempts, 1);
        assert_eq!(outcome.offspring_placed, 1);
        assert_eq!(host.placer.pending().len(), 1);
    }

    #[test]
    fn frozen_plant_never_reproduces() {
        let mut gleamcap = species("Gleamcap");
        gleamcap.seed_emit_mtb_days = 0.0;
        let config = GrowthConfig {
            fast_ecology: true,
            ..GrowthConfig::default()
        };
        let mut host = Host::new();
        host.grid.fill_temperature(-20.0);
        let mut plant = PlantInstance::spawn(&gleamcap, Position::new(5, 5), None, 0.9);

        for _ in 0..20 {
            let outcome = host.run(&mut plant, &gleamcap, &config);
            assert!(outcome.in_cryostasis);
            assert_eq!(outcome.reproduction_attempts, 0);
            assert_eq!(outcome.offspring_placed, 0);
            assert_eq!(outcome.growth_gained, 0.0);
        }
        assert!(host.placer.pending().is_empty());
        assert_eq!(plant.growth(), 0.9);
    }

    #[test]
    fn growth_never_decreases_while_growing() {
        let gleamcap = quiet(species("Gleamcap"));
        let config = GrowthConfig::default();
        let mut host = Host::new();
        let mut plant = PlantInstance::spawn(&gleamcap, Position::new(5, 5), None, 0.05);

        let mut previous = plant.growth();
        for _ in 0..50 {
            let outcome = host.run(&mut plant, &gleamcap, &config);
            assert!(outcome.growth_gained >= 0.0);
            assert!(plant.growth() >= previous);
            previous = plant.growth();
        }
        assert!(previous > 0.05);
    }

    #[test]
    fn cool_cave_halves_growth() {
        let gleamcap = quiet(species("Gleamcap"));
        let config = GrowthConfig::default();
        let mut host = Host::new();
        host.grid.fill_temperature(5.0);
        let mut plant = PlantInstance::spawn(&gleamcap, Position::new(5, 5), None, 0.05);

        let ideal = 2_000.0 / (8.0 * 60_000.0);
        let mut previous = plant.growth();
        for _ in 0..10 {
            let outcome = host.run(&mut plant, &gleamcap, &config);
            assert!(!outcome.in_cryostasis);
            assert!((outcome.growth_gained - ideal * 0.5).abs() < 1e-6);
            assert!(plant.growth() > previous);
            previous = plant.growth();
        }
    }

    #[test]
    fn fast_ecology_boosts_growth() {
        let gleamcap = quiet(species("Gleamcap"));
        let config = GrowthConfig {
            fast_ecology: true,
            ..GrowthConfig::default()
        };
        let mut host = Host::new();
        let mut plant = PlantInstance::spawn(&gleamcap, Position::new(5, 5), None, 0.05);

        let outcome = host.run(&mut plant, &gleamcap, &config);
        assert!(outcome.growth_gained > 0.1);
        assert_eq!(outcome.reproduction_attempts, 0);
    }

    #[test]
    fn glower_follows_living_plant() {
        let gleamcap = quiet(species("Gleamcap"));
        let config = GrowthConfig::default();
        let mut host = Host::new();
        let mut plant = PlantInstance::spawn(&gleamcap, Position::new(5, 5), None, 0.5);

        let outcome = host.run(&mut plant, &gleamcap, &config);
        assert!(matches!(outcome.glower, GlowerChange::Spawned(_)));
        assert_eq!(host.entities.alive_count(), 1);
    }
}
