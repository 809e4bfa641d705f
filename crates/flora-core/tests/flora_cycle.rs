//! End-to-end tests for the flora batch cycle against the in-memory host.
//!
//! Every test drives [`run_batch`] on a [`MemoryGrid`] and checks the
//! outcome through the public state and the host's entity ledger.

// Integration tests use unwrap extensively for clarity -- panicking on
// failure is the correct behavior in test code.
#![allow(clippy::unwrap_used, clippy::float_cmp, clippy::missing_panics_doc)]

use flora_core::{BatchSummary, FloraSnapshot, FloraState, run_batch};
use flora_plants::{
    ClusterRegistry, GrowthConfig, PlantInstance, SpeciesCatalog, builtin_species, destroy_plant,
};
use flora_types::{DestructionCause, LifeStage, Position, SpeciesId};
use flora_world::{MemoryEntities, MemoryGrid, SeededRandomness, create_starting_cave};

// =============================================================================
// Helpers
// =============================================================================

fn gleamcap() -> SpeciesId {
    SpeciesId::new("Gleamcap")
}

fn starbloom() -> SpeciesId {
    SpeciesId::new("Starbloom")
}

fn builtin_state() -> FloraState {
    let catalog = SpeciesCatalog::from_definitions(builtin_species()).unwrap();
    FloraState::new(catalog, GrowthConfig::default()).unwrap()
}

/// A roofed, dim, temperate cave where every builtin soil species thrives.
fn mild_cave() -> MemoryGrid {
    let mut grid = MemoryGrid::new(16, 16).unwrap();
    grid.fill_temperature(20.0);
    grid.fill_light(0.1);
    grid.fill_fertility(1.0);
    grid.fill_roofed(true);
    grid
}

fn run(
    state: &mut FloraState,
    grid: &MemoryGrid,
    entities: &mut MemoryEntities,
    rng: &mut SeededRandomness,
    batches: u32,
) -> Vec<BatchSummary> {
    (0..batches)
        .map(|_| run_batch(state, grid, entities, rng).unwrap())
        .collect()
}

// =============================================================================
// Growth and maturity
// =============================================================================

#[test]
fn maturity_edge_fires_once() {
    let mut state = builtin_state();
    let grid = mild_cave();
    let mut entities = MemoryEntities::new();
    let mut rng = SeededRandomness::new(1);
    let (_, plant) = state.found_cluster(&gleamcap(), Position::new(8, 8)).unwrap();
    state.sow(plant, 0.995).unwrap();

    let summaries = run(&mut state, &grid, &mut entities, &mut rng, 6);
    let matured: u32 = summaries.iter().map(|s| s.matured).sum();
    assert_eq!(matured, 1);
    let plant = state.plant(plant).unwrap();
    assert_eq!(plant.stage(), LifeStage::Mature);
    assert!(plant.age() > 0);
}

#[test]
fn cryostasis_freezes_the_plant() {
    let mut state = builtin_state();
    let mut grid = mild_cave();
    grid.fill_temperature(-20.0);
    let mut entities = MemoryEntities::new();
    let mut rng = SeededRandomness::new(2);
    let (_, plant) = state.found_cluster(&gleamcap(), Position::new(8, 8)).unwrap();
    let before = state.plant(plant).unwrap().to_snapshot();

    let summaries = run(&mut state, &grid, &mut entities, &mut rng, 10);
    assert!(summaries.iter().all(|s| s.in_cryostasis == 1 && s.dying == 0));

    let after = state.plant(plant).unwrap();
    assert_eq!(after.growth(), before.growth);
    assert_eq!(after.age(), before.age);
    assert_eq!(after.hit_points(), before.hit_points);
    // Hidden while frozen.
    assert!(after.glower().is_none());
    assert_eq!(entities.alive_count(), 0);
}

// =============================================================================
// Death and clusters
// =============================================================================

#[test]
fn overlit_plant_decays_and_dissolves_its_cluster() {
    let (grid, marks) = create_starting_cave(32, 32).unwrap();
    let mut state = builtin_state();
    let mut entities = MemoryEntities::new();
    let mut rng = SeededRandomness::new(3);
    let (cluster, plant) = state.found_cluster(&gleamcap(), marks.lit_chamber).unwrap();

    let summaries = run(&mut state, &grid, &mut entities, &mut rng, 43);
    let destroyed: Vec<_> = summaries.iter().flat_map(|s| s.destroyed.iter()).collect();
    assert_eq!(destroyed.len(), 1);
    let report = destroyed.first().unwrap();
    assert_eq!(report.plant, plant);
    assert_eq!(report.cause, DestructionCause::Decay);
    assert_eq!(report.cluster_notified, Some(cluster));
    assert_eq!(summaries.last().unwrap().destroyed.len(), 1);

    assert!(state.plant(plant).is_none());
    assert!(state.clusters.get(cluster).unwrap().dissolved);
    assert_eq!(entities.alive_count(), 0);
}

#[test]
fn double_destruction_notifies_cluster_once() {
    let catalog = SpeciesCatalog::from_definitions(builtin_species()).unwrap();
    let species = catalog.get(&gleamcap()).unwrap();
    let mut clusters = ClusterRegistry::new();
    let cluster = clusters.found(gleamcap(), Position::new(4, 4));
    clusters.add_member(cluster).unwrap();
    clusters.add_member(cluster).unwrap();
    let mut entities = MemoryEntities::new();
    let mut plant = PlantInstance::spawn(species, Position::new(4, 4), Some(cluster), 0.5);

    let first = destroy_plant(
        &mut plant,
        DestructionCause::Decay,
        &mut entities,
        &mut clusters,
    );
    let second = destroy_plant(
        &mut plant,
        DestructionCause::HostRemoval,
        &mut entities,
        &mut clusters,
    );
    assert!(first.is_some());
    assert!(second.is_none());

    let cluster = clusters.get(cluster).unwrap();
    assert_eq!(cluster.plant_count, 1);
    assert!(!cluster.dissolved);
}

#[test]
fn removal_after_damage_destruction_is_rejected() {
    let mut state = builtin_state();
    let mut entities = MemoryEntities::new();
    let (cluster, first) = state.found_cluster(&gleamcap(), Position::new(8, 8)).unwrap();
    state
        .spawn_plant(&gleamcap(), Position::new(9, 8), Some(cluster), 0.2)
        .unwrap();

    assert!(state.damage_plant(first, 1_000, &mut entities).unwrap().is_some());
    assert!(state.remove_plant(first, &mut entities).is_err());
    assert_eq!(state.clusters.get(cluster).unwrap().plant_count, 1);
}

#[test]
fn broken_symbiosis_kills_starbloom() {
    let mut state = builtin_state();
    let grid = mild_cave();
    let mut entities = MemoryEntities::new();
    let mut rng = SeededRandomness::new(4);
    let (bloom_cluster, bloom) = state.found_cluster(&starbloom(), Position::new(4, 4)).unwrap();
    let (partner_cluster, partner) = state.found_cluster(&gleamcap(), Position::new(12, 12)).unwrap();
    state.link_symbiosis(bloom_cluster, partner_cluster).unwrap();

    let summary = run_batch(&mut state, &grid, &mut entities, &mut rng).unwrap();
    assert_eq!(summary.dying, 0);

    state.remove_plant(partner, &mut entities).unwrap();
    assert!(state.clusters.get(partner_cluster).unwrap().dissolved);

    let summary = run_batch(&mut state, &grid, &mut entities, &mut rng).unwrap();
    assert_eq!(summary.dying, 1);
    let status = state.inspect(bloom, &grid).unwrap();
    assert!(status.is_dying());
}

// =============================================================================
// Reproduction
// =============================================================================

fn gleamcap_with_mtb(days: f32) -> FloraState {
    let species = builtin_species()
        .into_iter()
        .map(|mut s| {
            if s.id == gleamcap() {
                s.seed_emit_mtb_days = days;
            }
            s
        })
        .collect::<Vec<_>>();
    let catalog = SpeciesCatalog::from_definitions(species).unwrap();
    FloraState::new(catalog, GrowthConfig::default()).unwrap()
}

#[test]
fn zero_mean_reproduces_every_batch() {
    let mut state = gleamcap_with_mtb(0.0);
    let grid = mild_cave();
    let mut entities = MemoryEntities::new();
    let mut rng = SeededRandomness::new(5);
    let (cluster, parent) = state.found_cluster(&gleamcap(), Position::new(8, 8)).unwrap();
    state.sow(parent, 0.7).unwrap();

    let summary = run_batch(&mut state, &grid, &mut entities, &mut rng).unwrap();
    assert_eq!(summary.offspring_spawned, 1);
    assert_eq!(state.plant_count(), 2);
    assert_eq!(state.clusters.get(cluster).unwrap().plant_count, 2);

    let child = state
        .plants
        .values()
        .find(|p| p.id() != parent)
        .unwrap();
    assert_eq!(child.cluster(), Some(cluster));
    assert_eq!(child.growth(), GrowthConfig::default().offspring_initial_growth);
}

#[test]
fn infinite_mean_never_reproduces() {
    let mut state = gleamcap_with_mtb(f32::INFINITY);
    let grid = mild_cave();
    let mut entities = MemoryEntities::new();
    let mut rng = SeededRandomness::new(6);
    let (_, parent) = state.found_cluster(&gleamcap(), Position::new(8, 8)).unwrap();
    state.sow(parent, 0.7).unwrap();

    let summaries = run(&mut state, &grid, &mut entities, &mut rng, 20);
    assert!(summaries.iter().all(|s| s.offspring_spawned == 0));
    assert_eq!(state.plant_count(), 1);
}

// =============================================================================
// Glowers
// =============================================================================

#[test]
fn glower_hides_under_snow_and_returns() {
    let mut state = builtin_state();
    let mut grid = mild_cave();
    let mut entities = MemoryEntities::new();
    let mut rng = SeededRandomness::new(7);
    let (_, plant) = state.found_cluster(&gleamcap(), Position::new(8, 8)).unwrap();

    run_batch(&mut state, &grid, &mut entities, &mut rng).unwrap();
    assert_eq!(entities.alive_count(), 1);

    grid.fill_snow_depth(0.5);
    run_batch(&mut state, &grid, &mut entities, &mut rng).unwrap();
    assert_eq!(entities.alive_count(), 0);
    assert!(state.plant(plant).unwrap().glower().is_none());

    grid.fill_snow_depth(0.0);
    run_batch(&mut state, &grid, &mut entities, &mut rng).unwrap();
    assert_eq!(entities.alive_count(), 1);
    assert!(state.plant(plant).unwrap().glower().is_some());
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn snapshot_file_round_trip_resumes_identically() {
    let mut state = builtin_state();
    let grid = mild_cave();
    let mut entities = MemoryEntities::new();
    let mut rng = SeededRandomness::new(8);
    state.found_cluster(&gleamcap(), Position::new(8, 8)).unwrap();
    state.found_cluster(&gleamcap(), Position::new(3, 3)).unwrap();
    run(&mut state, &grid, &mut entities, &mut rng, 10);

    let path = std::env::temp_dir().join(format!("flora-cycle-{}.json", std::process::id()));
    state.snapshot().save(&path).unwrap();
    let loaded = FloraSnapshot::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let catalog = SpeciesCatalog::from_definitions(builtin_species()).unwrap();
    let mut restored =
        FloraState::restore(loaded, catalog, GrowthConfig::default(), &entities).unwrap();
    let mut restored_entities = entities.clone();
    let mut restored_rng = rng.clone();

    run_batch(&mut state, &grid, &mut entities, &mut rng).unwrap();
    run_batch(&mut restored, &grid, &mut restored_entities, &mut restored_rng).unwrap();
    assert_eq!(restored.snapshot(), state.snapshot());
}
