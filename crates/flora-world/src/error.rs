//! Error types for the `flora-world` crate.
//!
//! Environmental queries never fail; they degrade to "condition not met".
//! [`WorldError`] only covers building and editing the in-memory host.

use flora_types::{EntityId, Position};

/// Errors that can occur while building or editing a world grid.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A cell outside the grid was addressed.
    #[error("position {0} is out of bounds")]
    OutOfBounds(Position),

    /// Grid dimensions are zero or too large to index.
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// A building already occupies the cell.
    #[error("cell {0} already holds a building")]
    CellOccupied(Position),

    /// The host has no record of this entity.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),
}
