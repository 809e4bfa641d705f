//! Core data structs shared across the Cave Flora workspace.
//!
//! - Grid primitives: [`Position`], [`Terrain`], [`Building`]
//! - Species data: [`SpeciesDefinition`] and its range/glower sub-structs
//! - Persistence: [`PlantSnapshot`], [`ClusterSnapshot`]

use serde::{Deserialize, Serialize};

use crate::enums::GlowerTier;
use crate::ids::{ClusterId, EntityId, PlantId};

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

/// Key of a species in the species catalog (for example `"CaveFungus"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesId(pub String);

impl SpeciesId {
    /// Create a species key from any string-like value.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Definition name of a host entity kind (a glower def, a building def).
///
/// Glower tier changes are detected by comparing kinds, so two tiers that
/// share a kind never cause a respawn.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityKind(pub String);

impl EntityKind {
    /// Create an entity kind from any string-like value.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the kind as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Grid primitives
// ---------------------------------------------------------------------------

/// A cell coordinate on the world grid (horizontal plane).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Column.
    pub x: i32,
    /// Row.
    pub z: i32,
}

impl Position {
    /// Create a position from its two coordinates.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Return the position shifted by `(dx, dz)`, saturating at the `i32` range.
    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            z: self.z.saturating_add(dz),
        }
    }

    /// Iterate over every cell in the square of the given radius centered on
    /// this position, the center included. A radius of 2 yields 25 cells.
    pub fn square(self, radius: i32) -> impl Iterator<Item = Self> {
        let radius = radius.max(0);
        (-radius..=radius)
            .flat_map(move |dx| (-radius..=radius).map(move |dz| self.offset(dx, dz)))
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Terrain covering a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terrain {
    /// Terrain definition name, e.g. `"Granite_Rough"`.
    pub name: String,
    /// Whether the terrain is a constructed floor laid over the ground.
    pub layerable: bool,
}

impl Terrain {
    /// Natural, non-layerable terrain whose name is tagged rough.
    pub fn is_natural_rough_rock(&self) -> bool {
        !self.layerable && self.name.contains("Rough")
    }
}

/// A building occupying a cell, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    /// Host entity handle.
    pub entity: EntityId,
    /// Building definition name.
    pub kind: EntityKind,
    /// Whether the building is a natural rock block.
    pub is_natural_rock: bool,
    /// Whether the building is an artificial grow surface (basin, pot).
    pub is_plant_grower: bool,
}

// ---------------------------------------------------------------------------
// Species definition
// ---------------------------------------------------------------------------

/// Fertility window a cell must fall in for a seed to be placed there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FertilityRange {
    /// Lowest accepted fertility.
    pub min: f32,
    /// Highest accepted fertility.
    pub max: f32,
}

impl Default for FertilityRange {
    fn default() -> Self {
        Self { min: 0.7, max: 1.4 }
    }
}

/// Temperature window with an optimal band, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRange {
    /// Below this the plant enters cryostasis.
    pub min: f32,
    /// Start of the full-speed band.
    pub min_optimal: f32,
    /// End of the full-speed band.
    pub max_optimal: f32,
    /// Above this the plant dries out and dies.
    pub max: f32,
}

/// Ambient light window. Outside it the plant cannot grow and is dying.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightRange {
    /// Lowest accepted light level.
    pub min: f32,
    /// Highest accepted light level.
    pub max: f32,
}

/// Light emission behavior of a species.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GlowerSpec {
    /// The species emits no light.
    #[default]
    None,
    /// One glower regardless of growth.
    Static {
        /// Glower entity kind.
        kind: EntityKind,
    },
    /// Glower size follows growth.
    Dynamic {
        /// Kind used for growth in `[0, 0.33)`.
        small: EntityKind,
        /// Kind used for growth in `[0.33, 0.66)`.
        medium: EntityKind,
        /// Kind used for growth at or above `0.66`.
        big: EntityKind,
    },
}

impl GlowerSpec {
    /// Whether the species emits light at all.
    pub const fn emits_light(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Return the entity kind configured for a tier, if this spec has one.
    pub const fn kind_for(&self, tier: GlowerTier) -> Option<&EntityKind> {
        match (self, tier) {
            (Self::Static { kind }, GlowerTier::Static) => Some(kind),
            (Self::Dynamic { small, .. }, GlowerTier::Small) => Some(small),
            (Self::Dynamic { medium, .. }, GlowerTier::Medium) => Some(medium),
            (Self::Dynamic { big, .. }, GlowerTier::Big) => Some(big),
            _ => None,
        }
    }
}

/// Static, shared description of a cluster plant species.
///
/// Loaded once from the species catalog and read by every instance of the
/// species. Nothing in the engine mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesDefinition {
    /// Catalog key.
    pub id: SpeciesId,

    /// Human-readable label used in inspection output.
    #[serde(default)]
    pub label: String,

    /// Days of ideal conditions needed to go from seed to mature.
    pub grow_days: f32,

    /// Fertility window used by placement checks.
    #[serde(default)]
    pub fertility: FertilityRange,

    /// Temperature window.
    pub temperature: TemperatureRange,

    /// Light window.
    pub light: LightRange,

    /// Days a mature plant lives before dying of old age. `None` = unbounded.
    #[serde(default)]
    pub lifespan_days: Option<f32>,

    /// Mean days between seed emissions once eligible.
    pub seed_emit_mtb_days: f32,

    /// Plant dies when its cluster's symbiosis partner is gone.
    #[serde(default)]
    pub requires_symbiosis: bool,

    /// Plant only grows on natural rough rock; fertility is ignored.
    #[serde(default)]
    pub grow_only_on_rough_rock: bool,

    /// Plant only grows under a roof.
    #[serde(default)]
    pub grow_only_under_roof: bool,

    /// Plant only grows within two cells of a natural rock block.
    #[serde(default)]
    pub grow_only_near_natural_rock: bool,

    /// Light emission behavior.
    #[serde(default)]
    pub glower: GlowerSpec,

    /// Snow depth at which the glower is hidden.
    #[serde(default = "default_hide_at_snow_depth")]
    pub hide_at_snow_depth: f32,

    /// Hit points of a fresh plant.
    #[serde(default = "default_max_hit_points")]
    pub max_hit_points: u32,

    /// Radius around a parent in which offspring may be placed.
    #[serde(default = "default_cluster_spawn_radius")]
    pub cluster_spawn_radius: u32,
}

impl SpeciesDefinition {
    /// Lifespan converted to ticks, if the species has one.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn lifespan_ticks(&self, ticks_per_day: u64) -> Option<u64> {
        self.lifespan_days
            .map(|days| (f64::from(days.max(0.0)) * ticks_per_day as f64).round() as u64)
    }
}

const fn default_hide_at_snow_depth() -> f32 {
    99_999.0
}

const fn default_max_hit_points() -> u32 {
    85
}

const fn default_cluster_spawn_radius() -> u32 {
    3
}

// ---------------------------------------------------------------------------
// Persistence snapshots
// ---------------------------------------------------------------------------

/// A live glower: the host entity and the kind it was spawned as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlowerHandle {
    /// Host entity handle.
    pub entity: EntityId,
    /// Kind the entity was spawned as.
    pub kind: EntityKind,
}

/// Externalized state of one plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantSnapshot {
    /// Plant identifier.
    pub id: PlantId,
    /// Species key.
    pub species: SpeciesId,
    /// Cell the plant stands on.
    pub position: Position,
    /// Growth scalar.
    pub growth: f32,
    /// Ticks spent mature.
    pub age: u64,
    /// Remaining hit points.
    pub hit_points: u32,
    /// Live glower, if any.
    pub glower: Option<GlowerHandle>,
    /// Owning cluster, if any.
    pub cluster: Option<ClusterId>,
}

/// Externalized state of one cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    /// Cluster identifier.
    pub id: ClusterId,
    /// Species every member belongs to.
    pub species: SpeciesId,
    /// Cell the cluster was founded on.
    pub center: Position,
    /// Living member count.
    pub plant_count: u32,
    /// Partner cluster for symbiosis species.
    pub symbiosis_partner: Option<ClusterId>,
    /// Set once the last member is gone.
    pub dissolved: bool,
}
