//! Error types for the flora engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and the batch loop.

/// Top-level error for the flora engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: flora_core::ConfigError,
    },

    /// Starting cave construction failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: flora_world::WorldError,
    },

    /// A batch or a state edit failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: flora_core::TickError,
    },

    /// Saving or restoring a snapshot failed.
    #[error("persistence error: {source}")]
    Persistence {
        /// The underlying persistence error.
        #[from]
        source: flora_core::PersistenceError,
    },

    /// The `seeding` section could not be read.
    #[error("seeding error: {message}")]
    Seeding {
        /// Description of the seeding failure.
        message: String,
    },
}
