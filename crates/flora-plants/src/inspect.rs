//! Inspection output for a single plant.
//!
//! [`inspect`] gathers what a player sees when selecting a plant. The
//! [`core::fmt::Display`] impl renders it on one line, e.g.
//! `gleamcap: 42% grown, dying (too dark, unroofed)`.

use flora_types::{DyingReason, LifeStage, SpeciesDefinition};
use flora_world::{Suitability, WorldGrid};

use crate::cluster::ClusterMembership;
use crate::config::GrowthConfig;
use crate::death;
use crate::plant::PlantInstance;

/// Displayed growth never exceeds this, even when growth overshoots 1.0.
pub const MAX_DISPLAYED_GROWTH_PERCENT: f32 = 100.1;

/// Growth as a percentage for display, capped at
/// [`MAX_DISPLAYED_GROWTH_PERCENT`].
pub const fn growth_percent(growth: f32) -> f32 {
    let pct = growth * 100.0;
    if pct > 100.0 {
        MAX_DISPLAYED_GROWTH_PERCENT
    } else {
        pct
    }
}

/// Inspectable status of one plant.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantStatus {
    /// Species label.
    pub label: String,
    /// Life stage.
    pub stage: LifeStage,
    /// Growth percentage, capped for display.
    pub growth_percent: f32,
    /// Frozen by cold.
    pub in_cryostasis: bool,
    /// Reasons the plant is dying, empty if healthy.
    pub dying: Vec<DyingReason>,
    /// Remaining hit points.
    pub hit_points: u32,
    /// Whether a glower is currently lit.
    pub glowing: bool,
}

impl PlantStatus {
    /// Whether any dying condition holds.
    pub fn is_dying(&self) -> bool {
        !self.dying.is_empty()
    }
}

impl core::fmt::Display for PlantStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: ", self.label)?;
        if self.stage == LifeStage::Mature {
            f.write_str("mature")?;
        } else {
            write!(f, "{:.0}% grown", self.growth_percent)?;
        }
        if self.in_cryostasis {
            f.write_str(", in cryostasis")?;
        }
        if self.is_dying() {
            let reasons: Vec<String> = self.dying.iter().map(ToString::to_string).collect();
            write!(f, ", dying ({})", reasons.join(", "))?;
        }
        Ok(())
    }
}

/// Build the status of a plant against the current environment.
pub fn inspect<G: WorldGrid + ?Sized>(
    plant: &PlantInstance,
    species: &SpeciesDefinition,
    grid: &G,
    clusters: &dyn ClusterMembership,
    config: &GrowthConfig,
) -> PlantStatus {
    let report = Suitability::new(species, grid).evaluate(plant.position);
    let symbiosis_ok = death::is_symbiosis_ok(plant, species, clusters);
    let label = if species.label.is_empty() {
        species.id.to_string()
    } else {
        species.label.clone()
    };
    PlantStatus {
        label,
        stage: plant.stage(),
        growth_percent: growth_percent(plant.growth),
        in_cryostasis: report.in_cryostasis,
        dying: death::dying_reasons(
            plant,
            species,
            &report,
            species.lifespan_ticks(config.ticks_per_day),
            symbiosis_ok,
        ),
        hit_points: plant.hit_points,
        glowing: plant.glower.is_some(),
    }
}
