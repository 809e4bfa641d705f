//! Tunables for the per-batch growth engine.
//!
//! [`GrowthConfig`] bundles every parameter the lifecycle, reproduction,
//! and decay steps read, so the batch driver and tests can override the
//! defaults. It deserializes from the `growth` section of
//! `flora-config.yaml`; missing keys fall back to the defaults below.

use serde::{Deserialize, Serialize};

/// Configuration for cluster plant growth applied once per batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    /// Ticks in one in-game day (default: 60000).
    pub ticks_per_day: u64,

    /// Ticks covered by one batch (default: 2000).
    pub batch_tick_span: u64,

    /// Growth a plant must exceed before it can emit seeds (default: 0.6).
    pub min_growth_to_reproduce: f32,

    /// Decay damage per dying batch before rounding up (default: 1.25, so 2).
    pub decay_damage: f32,

    /// Debug mode: extra growth and an extra reproduction attempt each batch.
    pub fast_ecology: bool,

    /// Growth added per batch in fast ecology mode (default: 0.1).
    pub fast_ecology_growth_bonus: f32,

    /// Growth of freshly placed offspring (default: 0.05).
    pub offspring_initial_growth: f32,

    /// Cells the neighborhood placer tries before giving up (default: 8).
    pub placement_attempts: u32,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            ticks_per_day: 60_000,
            batch_tick_span: 2_000,
            min_growth_to_reproduce: 0.6,
            decay_damage: 1.25,
            fast_ecology: false,
            fast_ecology_growth_bonus: 0.1,
            offspring_initial_growth: 0.05,
            placement_attempts: 8,
        }
    }
}

impl GrowthConfig {
    /// Whole hit points removed per dying batch: the configured decay
    /// rounded up, never negative.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn decay_damage_amount(&self) -> u32 {
        let rounded = self.decay_damage.max(0.0).ceil();
        if rounded >= u32::MAX as f32 {
            u32::MAX
        } else {
            rounded as u32
        }
    }

    /// Growth gained per tick at a growth rate of 1.0.
    ///
    /// Returns 0.0 when either `grow_days` or `ticks_per_day` is not
    /// positive.
    pub fn growth_per_tick(&self, grow_days: f32) -> f32 {
        let ticks = f64::from(grow_days) * self.ticks_per_day as f64;
        if ticks <= 0.0 {
            return 0.0;
        }
        #[allow(clippy::cast_possible_truncation)]
        let per_tick = (1.0 / ticks) as f32;
        per_tick
    }
}
