//! Enumeration types for the Cave Flora growth engine.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Life stage
// ---------------------------------------------------------------------------

/// Growth below this value is still a seed.
pub const SEED_GROWTH_THRESHOLD: f32 = 0.001;

/// Growth at or above this value is mature.
pub const MATURE_GROWTH_THRESHOLD: f32 = 0.999;

/// Life stage of a cluster plant.
///
/// The stage is never stored on a plant. It is always derived from the
/// growth scalar with [`LifeStage::from_growth`], so the two can never
/// disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LifeStage {
    /// Not yet sprouted (growth below [`SEED_GROWTH_THRESHOLD`]).
    Seed,
    /// Actively growing toward maturity.
    Growing,
    /// Fully grown (growth at or above [`MATURE_GROWTH_THRESHOLD`]).
    Mature,
}

impl LifeStage {
    /// Derive the life stage from a growth value.
    pub fn from_growth(growth: f32) -> Self {
        if growth < SEED_GROWTH_THRESHOLD {
            Self::Seed
        } else if growth >= MATURE_GROWTH_THRESHOLD {
            Self::Mature
        } else {
            Self::Growing
        }
    }
}

impl core::fmt::Display for LifeStage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Seed => write!(f, "seed"),
            Self::Growing => write!(f, "growing"),
            Self::Mature => write!(f, "mature"),
        }
    }
}

// ---------------------------------------------------------------------------
// Destruction
// ---------------------------------------------------------------------------

/// How the host should remove an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DestroyMode {
    /// Remove silently, leaving nothing behind.
    Vanish,
}

/// Why a plant was destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DestructionCause {
    /// Hit points exhausted by damage from outside the engine.
    ExternalDamage,
    /// Hit points exhausted by the engine's own dying decay.
    Decay,
    /// The host removed the plant directly (harvest, deconstruction, map unload).
    HostRemoval,
}

impl core::fmt::Display for DestructionCause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ExternalDamage => write!(f, "external_damage"),
            Self::Decay => write!(f, "decay"),
            Self::HostRemoval => write!(f, "host_removal"),
        }
    }
}

// ---------------------------------------------------------------------------
// Dying
// ---------------------------------------------------------------------------

/// One reason a plant is currently dying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DyingReason {
    /// Mature age exceeded the species lifespan.
    OldAge,
    /// Temperature above the species maximum.
    Drying,
    /// Ambient light below the species minimum.
    TooDark,
    /// Ambient light above the species maximum.
    Overlit,
    /// Species needs a roof and the cell is unroofed.
    Unroofed,
    /// Terrain is not rough rock, or fertility is zero.
    UnadaptedSoil,
    /// No natural rock within the 5x5 neighborhood.
    TooFarFromRock,
    /// Species needs a symbiosis partner and the partner cluster is gone.
    BrokenSymbiosis,
}

impl core::fmt::Display for DyingReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OldAge => write!(f, "too old"),
            Self::Drying => write!(f, "drying"),
            Self::TooDark => write!(f, "too dark"),
            Self::Overlit => write!(f, "overlit"),
            Self::Unroofed => write!(f, "unroofed"),
            Self::UnadaptedSoil => write!(f, "unadapted soil"),
            Self::TooFarFromRock => write!(f, "too far from rock"),
            Self::BrokenSymbiosis => write!(f, "broken symbiosis"),
        }
    }
}

// ---------------------------------------------------------------------------
// Glower tiers
// ---------------------------------------------------------------------------

/// Size class of an emitted light source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GlowerTier {
    /// Single fixed light, independent of growth.
    Static,
    /// Growth in `[0, 0.33)`.
    Small,
    /// Growth in `[0.33, 0.66)`.
    Medium,
    /// Growth at or above `0.66`.
    Big,
}
