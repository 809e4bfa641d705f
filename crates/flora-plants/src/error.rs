//! Error types for the flora-plants crate.
//!
//! Environmental checks never produce errors; they answer "condition not
//! met". The only recoverable runtime failure is offspring placement, which
//! callers log and drop.

use flora_types::{ClusterId, PlantId, SpeciesId};

/// Errors that can occur during plant operations.
#[derive(Debug, thiserror::Error)]
pub enum PlantError {
    /// The species is not in the catalog.
    #[error("species not found: {0}")]
    SpeciesNotFound(SpeciesId),

    /// The catalog already holds a species with this key.
    #[error("duplicate species: {0}")]
    DuplicateSpecies(SpeciesId),

    /// A species definition failed validation.
    #[error("invalid species {species}: {reason}")]
    InvalidSpecies {
        /// The rejected species.
        species: SpeciesId,
        /// What is wrong with it.
        reason: String,
    },

    /// No plant with this ID exists.
    #[error("plant not found: {0}")]
    PlantNotFound(PlantId),

    /// No cluster with this ID exists.
    #[error("cluster not found: {0}")]
    ClusterNotFound(ClusterId),

    /// No valid cell was found for offspring. Retry later or drop.
    #[error("offspring placement failed for {parent}: {reason}")]
    PlacementFailed {
        /// The parent plant.
        parent: PlantId,
        /// Why no cell was usable.
        reason: String,
    },
}
