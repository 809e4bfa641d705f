//! Cluster seeding for the starting cave.
//!
//! At startup the engine founds one cluster per entry of the `seeding`
//! section, each around a single founder plant placed relative to one of
//! the cave landmarks. Entries may name a symbiosis partner; the two
//! clusters are linked once every cluster exists.

use std::collections::{BTreeMap, BTreeSet};

use flora_core::FloraState;
use flora_types::{ClusterId, Position, SpeciesId};
use flora_world::CaveLandmarks;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::EngineError;

// -----------------------------------------------------------------------
// Configuration
// -----------------------------------------------------------------------

/// Configuration for the cluster seeder, loaded from `flora-config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedingConfig {
    /// Clusters founded at startup.
    #[serde(default = "default_clusters")]
    pub clusters: Vec<ClusterSeed>,
}

impl Default for SeedingConfig {
    fn default() -> Self {
        Self {
            clusters: default_clusters(),
        }
    }
}

/// One cluster to found at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClusterSeed {
    /// Name used to refer to this cluster from other entries.
    pub name: String,

    /// Species of the founder.
    pub species: SpeciesId,

    /// Landmark the founder is placed relative to.
    pub area: Landmark,

    /// Column offset from the landmark.
    #[serde(default)]
    pub dx: i32,

    /// Row offset from the landmark.
    #[serde(default)]
    pub dz: i32,

    /// Name of the cluster this one lives in symbiosis with.
    #[serde(default)]
    pub partner: Option<String>,
}

/// Named areas of the starting cave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Landmark {
    /// The fertile moss bed.
    MossBed,
    /// The rough-rock garden next to a pillar.
    RockGarden,
    /// The fungiponics basin.
    Basin,
    /// The bright, unroofed chamber.
    LitChamber,
}

impl Landmark {
    /// Cell of this landmark in the given cave.
    pub const fn position(self, landmarks: &CaveLandmarks) -> Position {
        match self {
            Self::MossBed => landmarks.moss_bed,
            Self::RockGarden => landmarks.rock_garden,
            Self::Basin => landmarks.basin,
            Self::LitChamber => landmarks.lit_chamber,
        }
    }
}

fn seed(
    name: &str,
    species: &str,
    area: Landmark,
    offset: (i32, i32),
    partner: Option<&str>,
) -> ClusterSeed {
    ClusterSeed {
        name: name.to_owned(),
        species: SpeciesId::new(species),
        area,
        dx: offset.0,
        dz: offset.1,
        partner: partner.map(str::to_owned),
    }
}

/// One cluster of each builtin species in its home area, a Starbloom in
/// the basin living off a second Gleamcap cluster, and a Gleamcap in the
/// lit chamber that cannot survive there.
fn default_clusters() -> Vec<ClusterSeed> {
    vec![
        seed("moss-bed-gleamcaps", "Gleamcap", Landmark::MossBed, (0, 0), None),
        seed("rock-garden-moss", "RockMoss", Landmark::RockGarden, (0, 0), None),
        seed(
            "basin-starbloom",
            "Starbloom",
            Landmark::Basin,
            (0, 0),
            Some("starbloom-host"),
        ),
        seed(
            "starbloom-host",
            "Gleamcap",
            Landmark::MossBed,
            (2, 2),
            Some("basin-starbloom"),
        ),
        seed("lit-chamber-gleamcap", "Gleamcap", Landmark::LitChamber, (0, 0), None),
    ]
}

// -----------------------------------------------------------------------
// Seeding
// -----------------------------------------------------------------------

/// Clusters founded by [`seed_clusters`], keyed by their configured name.
#[derive(Debug, Default)]
pub struct SeedResult {
    /// Founded clusters.
    pub clusters: BTreeMap<String, ClusterId>,
    /// Symbiosis links made.
    pub links: u32,
}

/// Found every configured cluster and link symbiosis partners.
///
/// Entries whose species is not in the catalog are skipped with a warning,
/// as are partner names that were never founded.
///
/// # Errors
///
/// Returns [`EngineError::Tick`] if founding or linking fails for a known
/// species.
pub fn seed_clusters(
    config: &SeedingConfig,
    state: &mut FloraState,
    landmarks: &CaveLandmarks,
) -> Result<SeedResult, EngineError> {
    let mut result = SeedResult::default();

    for entry in &config.clusters {
        if !state.catalog.contains(&entry.species) {
            warn!(name = entry.name, species = %entry.species, "unknown species, cluster skipped");
            continue;
        }
        let center = entry.area.position(landmarks).offset(entry.dx, entry.dz);
        let (cluster, _) = state.found_cluster(&entry.species, center)?;
        info!(name = entry.name, species = %entry.species, center = %center, "cluster founded");
        result.clusters.insert(entry.name.clone(), cluster);
    }

    let mut linked = BTreeSet::new();
    for entry in &config.clusters {
        let Some(partner) = &entry.partner else {
            continue;
        };
        let (Some(&own), Some(&other)) =
            (result.clusters.get(&entry.name), result.clusters.get(partner))
        else {
            warn!(name = entry.name, partner, "symbiosis partner not founded, link skipped");
            continue;
        };
        // Partners usually name each other.
        if linked.insert((own.min(other), own.max(other))) {
            state.link_symbiosis(own, other)?;
            result.links += 1;
        }
    }

    Ok(result)
}

/// Read the `seeding` section from a parsed YAML document, falling back
/// to the default clusters when the section is absent.
///
/// # Errors
///
/// Returns [`EngineError::Seeding`] if the section is malformed.
pub fn seeding_from_yaml(raw: &serde_yml::Value) -> Result<SeedingConfig, EngineError> {
    raw.get("seeding").map_or_else(
        || Ok(SeedingConfig::default()),
        |value| {
            serde_yml::from_value(value.clone()).map_err(|e| EngineError::Seeding {
                message: format!("failed to parse seeding config: {e}"),
            })
        },
    )
}
