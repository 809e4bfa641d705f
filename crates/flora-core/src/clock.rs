//! Batch clock for the Cave Flora engine.
//!
//! Plants are processed in batches, each covering a fixed span of ticks.
//! The clock tracks the absolute tick and the batch counter; day numbers
//! are derived from the tick, never stored.
//!
//! All advancement uses checked arithmetic.

use flora_plants::GrowthConfig;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// Invalid time configuration (e.g. zero ticks per batch).
    #[error("invalid time configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Clock advanced once per batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchClock {
    /// Ticks elapsed since the start of the run.
    tick: u64,
    /// Batches completed.
    batch: u64,
    /// Ticks in one in-game day.
    ticks_per_day: u64,
    /// Ticks covered by one batch.
    batch_tick_span: u64,
}

impl BatchClock {
    /// Create a clock at tick 0.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if the day length or batch
    /// span is zero.
    pub fn new(config: &GrowthConfig) -> Result<Self, ClockError> {
        Self::from_parts(0, 0, config)
    }

    /// Create a clock at a given position (used for state restoration).
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if the day length or batch
    /// span is zero.
    pub fn from_parts(tick: u64, batch: u64, config: &GrowthConfig) -> Result<Self, ClockError> {
        if config.ticks_per_day == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "ticks_per_day must be at least 1".to_owned(),
            });
        }
        if config.batch_tick_span == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "batch_tick_span must be at least 1".to_owned(),
            });
        }
        Ok(Self {
            tick,
            batch,
            ticks_per_day: config.ticks_per_day,
            batch_tick_span: config.batch_tick_span,
        })
    }

    /// Advance by one batch. Returns the new tick.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if either counter would exceed
    /// `u64::MAX`. The clock is left unchanged in that case.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        let tick = self
            .tick
            .checked_add(self.batch_tick_span)
            .ok_or(ClockError::TickOverflow)?;
        let batch = self.batch.checked_add(1).ok_or(ClockError::TickOverflow)?;
        self.tick = tick;
        self.batch = batch;
        Ok(tick)
    }

    /// Current tick.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Batches completed.
    pub const fn batch(&self) -> u64 {
        self.batch
    }

    /// Ticks covered by one batch.
    pub const fn batch_tick_span(&self) -> u64 {
        self.batch_tick_span
    }

    /// Whole in-game days elapsed.
    pub const fn day(&self) -> u64 {
        self.tick / self.ticks_per_day
    }

    /// Fraction of the current day elapsed, in `[0, 1)`.
    pub fn day_fraction(&self) -> f32 {
        (self.tick % self.ticks_per_day) as f32 / self.ticks_per_day as f32
    }
}
