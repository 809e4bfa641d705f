//! Headless flora engine for the Cave Flora growth simulation.
//!
//! This is the main entry point that wires together the configuration,
//! the starting cave, the cluster seeder, and the batch cycle. It runs the
//! configured number of batches against the in-memory host and logs what
//! the flora does.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `flora-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Create the starting cave (walls, moss bed, rock garden, basin, lit chamber)
//! 4. Restore a snapshot, or seed the configured clusters
//! 5. Run the batch loop
//! 6. Log the result

mod error;
mod seeding;

use std::collections::BTreeMap;
use std::path::Path;

use flora_core::{BatchSummary, FloraSnapshot, FloraState, SimulationConfig, run_batch};
use flora_types::LifeStage;
use flora_world::{MemoryEntities, SeededRandomness};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::seeding::SeedingConfig;

/// Where the engine looks for its configuration.
const CONFIG_PATH: &str = "flora-config.yaml";

/// Application entry point for the flora engine.
///
/// # Errors
///
/// Returns an error if any initialization step or a batch fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is not up yet, so where it came
    //    from is reported after step 2.
    let (config, seeding, loaded) = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("flora-engine starting");
    if loaded {
        info!(path = CONFIG_PATH, "Configuration loaded");
    } else {
        warn!(path = CONFIG_PATH, "Config file not found, using defaults");
    }
    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        max_batches = config.time.max_batches,
        fast_ecology = config.growth.fast_ecology,
        species = config.species.len(),
        "Configuration ready"
    );

    run(&config, &seeding)?;
    Ok(())
}

/// Build the cave and flora state, then run the batch loop.
fn run(config: &SimulationConfig, seeding: &SeedingConfig) -> Result<(), EngineError> {
    // 3. Create the starting cave.
    let (grid, landmarks) =
        flora_world::create_starting_cave(config.world.width, config.world.height)?;
    info!(
        width = grid.width(),
        height = grid.height(),
        buildings = grid.building_count(),
        "Starting cave created"
    );

    // 4. Restore or seed.
    let catalog = config.catalog()?;
    let mut entities = MemoryEntities::new();
    let snapshot_path = Path::new(&config.logging.snapshot_path);
    let mut state = if config.logging.resume_from_snapshot && snapshot_path.exists() {
        let snapshot = FloraSnapshot::load(snapshot_path)?;
        FloraState::restore(snapshot, catalog, config.growth.clone(), &entities)?
    } else {
        let mut state = FloraState::new(catalog, config.growth.clone())?;
        let seeded = seeding::seed_clusters(seeding, &mut state, &landmarks)?;
        info!(
            clusters = seeded.clusters.len(),
            symbiosis_links = seeded.links,
            "Clusters seeded"
        );
        state
    };
    let mut rng = SeededRandomness::new(config.world.seed);

    // 5. Run the batch loop.
    info!(plants = state.plant_count(), "Entering batch loop");
    let mut totals = RunTotals::default();
    for _ in 0..config.time.max_batches {
        let summary = run_batch(&mut state, &grid, &mut entities, &mut rng)?;
        totals.record(&summary);

        if is_due(summary.batch, config.time.summary_interval_batches) {
            log_population(&state, &summary);
        }
        if is_due(summary.batch, config.logging.snapshot_interval_batches) {
            state.snapshot().save(snapshot_path)?;
            info!(batch = summary.batch, path = %snapshot_path.display(), "Snapshot written");
        }
        if state.plant_count() == 0 {
            info!(batch = summary.batch, "No plants left, stopping early");
            break;
        }
    }

    // 6. Log results.
    info!(
        batches = state.clock.batch(),
        day = state.clock.day(),
        plants = state.plant_count(),
        active_clusters = state.clusters.active_count(),
        glowers = entities.alive_count(),
        matured = totals.matured,
        destroyed = totals.destroyed,
        offspring = totals.offspring,
        placement_failures = totals.placement_failures,
        "flora-engine shutdown complete"
    );

    Ok(())
}

/// Counters accumulated over the whole run.
#[derive(Debug, Default)]
struct RunTotals {
    matured: u64,
    destroyed: u64,
    offspring: u64,
    placement_failures: u64,
}

impl RunTotals {
    fn record(&mut self, summary: &BatchSummary) {
        self.matured += u64::from(summary.matured);
        self.destroyed += u64::try_from(summary.destroyed.len()).unwrap_or(u64::MAX);
        self.offspring += u64::from(summary.offspring_spawned);
        self.placement_failures += u64::from(summary.placement_failures);
    }
}

/// Whether a periodic action with the given interval falls on `batch`.
/// An interval of zero disables it.
const fn is_due(batch: u64, interval: u64) -> bool {
    interval != 0 && batch % interval == 0
}

/// Log per-species plant counts by life stage.
fn log_population(state: &FloraState, summary: &BatchSummary) {
    let mut by_species: BTreeMap<&str, [u32; 3]> = BTreeMap::new();
    for plant in state.plants.values() {
        let counts = by_species.entry(plant.species().as_str()).or_default();
        let [seeds, growing, mature] = counts;
        match plant.stage() {
            LifeStage::Seed => *seeds += 1,
            LifeStage::Growing => *growing += 1,
            LifeStage::Mature => *mature += 1,
        }
    }
    info!(
        batch = summary.batch,
        day = state.clock.day(),
        plants = summary.plants_alive,
        dying = summary.dying,
        in_cryostasis = summary.in_cryostasis,
        "Population summary"
    );
    for (species, [seeds, growing, mature]) in by_species {
        info!(species, seeds, growing, mature, "Species population");
    }
}

/// Load the simulation and seeding configuration from `flora-config.yaml`.
///
/// Returns whether the file was found. A missing file yields defaults for
/// both.
fn load_config() -> Result<(SimulationConfig, SeedingConfig, bool), EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if !config_path.exists() {
        let mut config = SimulationConfig::default();
        config.apply_seed_override(std::env::var(flora_core::config::SEED_ENV_VAR).ok().as_deref());
        return Ok((config, SeedingConfig::default(), false));
    }

    let config = SimulationConfig::from_file(config_path)?;

    // Parse the full YAML again and extract just the "seeding" section.
    let contents = std::fs::read_to_string(config_path).map_err(|e| EngineError::Seeding {
        message: format!("failed to read config file: {e}"),
    })?;
    let raw: serde_yml::Value = serde_yml::from_str(&contents).map_err(|e| EngineError::Seeding {
        message: format!("failed to parse config YAML: {e}"),
    })?;
    let seeding = seeding::seeding_from_yaml(&raw)?;

    Ok((config, seeding, true))
}
