//! Dying conditions, decay damage, and destruction.
//!
//! A plant outside cryostasis is dying when any of these hold:
//! - it has lived past its lifespan as a mature plant
//! - the temperature is above the species maximum
//! - the light level is outside the species window
//! - it stands neither on a grow surface nor on a valid natural spot
//! - its species needs a symbiosis partner that is gone
//!
//! A dying plant takes decay damage every batch. Destruction by any cause
//! goes through [`destroy_plant`], which runs the teardown exactly once.

use flora_types::{
    ClusterId, DestructionCause, DyingReason, PlantId, SpeciesDefinition,
};
use flora_world::{EntityService, SuitabilityReport};

use crate::cluster::ClusterMembership;
use crate::glower;
use crate::plant::PlantInstance;

/// Every reason the plant is dying right now, in display order.
///
/// Empty while in cryostasis: a frozen plant neither ages nor decays.
pub fn dying_reasons(
    plant: &PlantInstance,
    species: &SpeciesDefinition,
    report: &SuitabilityReport,
    lifespan_ticks: Option<u64>,
    symbiosis_ok: bool,
) -> Vec<DyingReason> {
    let mut reasons = Vec::new();
    if report.in_cryostasis {
        return reasons;
    }

    if lifespan_ticks.is_some_and(|lifespan| plant.age > lifespan) {
        reasons.push(DyingReason::OldAge);
    }
    if report.too_hot {
        reasons.push(DyingReason::Drying);
    }
    if !report.is_light_ok() {
        if report.light < species.light.min {
            reasons.push(DyingReason::TooDark);
        } else {
            reasons.push(DyingReason::Overlit);
        }
    }
    if !report.has_valid_spot() {
        if !report.soil_ok {
            reasons.push(DyingReason::UnadaptedSoil);
        }
        if !report.roof_ok {
            reasons.push(DyingReason::Unroofed);
        }
        if !report.rock_proximity_ok {
            reasons.push(DyingReason::TooFarFromRock);
        }
    }
    if !symbiosis_ok {
        reasons.push(DyingReason::BrokenSymbiosis);
    }
    reasons
}

/// Whether the symbiosis requirement holds for this plant.
///
/// Species without the requirement always pass. A symbiosis species with
/// no cluster has no partner and fails.
pub fn is_symbiosis_ok(
    plant: &PlantInstance,
    species: &SpeciesDefinition,
    clusters: &dyn ClusterMembership,
) -> bool {
    !species.requires_symbiosis
        || plant
            .cluster
            .is_some_and(|cluster| clusters.is_symbiosis_partner_alive(cluster))
}

/// Data produced when a plant is destroyed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestructionReport {
    /// The destroyed plant.
    pub plant: PlantId,
    /// What destroyed it.
    pub cause: DestructionCause,
    /// Cluster that was told about the removal, if any.
    pub cluster_notified: Option<ClusterId>,
    /// Whether a live glower was removed.
    pub glower_removed: bool,
}

/// Destroy a plant: remove its glower and notify its cluster.
///
/// Runs at most once per plant. Every later call returns `None` and has
/// no side effects, so decay, external damage, and host removal can race
/// without double-notifying the cluster.
pub fn destroy_plant(
    plant: &mut PlantInstance,
    cause: DestructionCause,
    entities: &mut dyn EntityService,
    clusters: &mut dyn ClusterMembership,
) -> Option<DestructionReport> {
    if !plant.mark_destroyed() {
        return None;
    }
    let glower_removed = glower::teardown_glower(plant, entities);
    let cluster_notified = plant.cluster;
    if let Some(cluster) = cluster_notified {
        clusters.notify_plant_removed(cluster);
    }
    tracing::debug!(
        plant = %plant.id,
        species = %plant.species,
        cause = %cause,
        growth = plant.growth,
        "plant destroyed"
    );
    Some(DestructionReport {
        plant: plant.id,
        cause,
        cluster_notified,
        glower_removed,
    })
}

/// Remove hit points and destroy the plant when they reach zero.
///
/// Damage to an already destroyed plant is ignored.
pub fn apply_damage(
    plant: &mut PlantInstance,
    amount: u32,
    cause: DestructionCause,
    entities: &mut dyn EntityService,
    clusters: &mut dyn ClusterMembership,
) -> Option<DestructionReport> {
    if plant.destroyed {
        return None;
    }
    plant.hit_points = plant.hit_points.saturating_sub(amount);
    if plant.hit_points == 0 {
        return destroy_plant(plant, cause, entities, clusters);
    }
    None
}
