//! Species catalog.
//!
//! Definitions are validated once when the catalog is built and shared
//! read-only by every plant of the species afterwards.

use std::collections::BTreeMap;

use flora_types::{
    EntityKind, FertilityRange, GlowerSpec, LightRange, SpeciesDefinition, SpeciesId,
    TemperatureRange,
};

use crate::error::PlantError;

/// Validated set of species definitions keyed by [`SpeciesId`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeciesCatalog {
    species: BTreeMap<SpeciesId, SpeciesDefinition>,
}

impl SpeciesCatalog {
    /// Build a catalog, validating every definition.
    ///
    /// # Errors
    ///
    /// Returns [`PlantError::DuplicateSpecies`] if two definitions share a
    /// key, or [`PlantError::InvalidSpecies`] if a definition fails
    /// [`validate_species`].
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = SpeciesDefinition>,
    ) -> Result<Self, PlantError> {
        let mut species = BTreeMap::new();
        for definition in definitions {
            validate_species(&definition)?;
            let id = definition.id.clone();
            if species.insert(id.clone(), definition).is_some() {
                return Err(PlantError::DuplicateSpecies(id));
            }
        }
        Ok(Self { species })
    }

    /// Look up a species.
    ///
    /// # Errors
    ///
    /// Returns [`PlantError::SpeciesNotFound`] if the key is unknown.
    pub fn get(&self, id: &SpeciesId) -> Result<&SpeciesDefinition, PlantError> {
        self.species
            .get(id)
            .ok_or_else(|| PlantError::SpeciesNotFound(id.clone()))
    }

    /// Whether the catalog holds the species.
    pub fn contains(&self, id: &SpeciesId) -> bool {
        self.species.contains_key(id)
    }

    /// Number of species.
    pub fn len(&self) -> usize {
        self.species.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}

fn invalid(species: &SpeciesDefinition, reason: &str) -> PlantError {
    PlantError::InvalidSpecies {
        species: species.id.clone(),
        reason: reason.to_owned(),
    }
}

/// Finite and non-decreasing.
fn ascending(values: &[f32]) -> bool {
    values.iter().all(|v| v.is_finite())
        && values.iter().zip(values.iter().skip(1)).all(|(a, b)| a <= b)
}

/// Check a species definition for values the engine cannot work with.
///
/// # Errors
///
/// Returns [`PlantError::InvalidSpecies`] when grow days are not positive,
/// or when the temperature, light, or fertility window is out of order.
pub fn validate_species(species: &SpeciesDefinition) -> Result<(), PlantError> {
    if !(species.grow_days.is_finite() && species.grow_days > 0.0) {
        return Err(invalid(species, "grow_days must be positive"));
    }
    let t = &species.temperature;
    if !ascending(&[t.min, t.min_optimal, t.max_optimal, t.max]) {
        return Err(invalid(
            species,
            "temperature must satisfy min <= min_optimal <= max_optimal <= max",
        ));
    }
    if !ascending(&[species.light.min, species.light.max]) {
        return Err(invalid(species, "light min exceeds max"));
    }
    if !ascending(&[species.fertility.min, species.fertility.max]) {
        return Err(invalid(species, "fertility min exceeds max"));
    }
    if species.max_hit_points == 0 {
        return Err(invalid(species, "max_hit_points must be positive"));
    }
    Ok(())
}

/// The species shipped with the default configuration.
///
/// - `Gleamcap`: roofed soil fungus with a growth-sized glower.
/// - `RockMoss`: grows only on rough rock next to natural stone.
/// - `Starbloom`: needs a living symbiosis partner, fixed glower.
pub fn builtin_species() -> Vec<SpeciesDefinition> {
    vec![
        SpeciesDefinition {
            id: SpeciesId::new("Gleamcap"),
            label: "gleamcap".to_owned(),
            grow_days: 8.0,
            fertility: FertilityRange { min: 0.7, max: 1.4 },
            temperature: TemperatureRange {
                min: 0.0,
                min_optimal: 10.0,
                max_optimal: 30.0,
                max: 40.0,
            },
            light: LightRange { min: 0.0, max: 0.5 },
            lifespan_days: Some(30.0),
            seed_emit_mtb_days: 4.0,
            requires_symbiosis: false,
            grow_only_on_rough_rock: false,
            grow_only_under_roof: true,
            grow_only_near_natural_rock: false,
            glower: GlowerSpec::Dynamic {
                small: EntityKind::new("GlowerGleamcapSmall"),
                medium: EntityKind::new("GlowerGleamcapMedium"),
                big: EntityKind::new("GlowerGleamcapBig"),
            },
            hide_at_snow_depth: 0.4,
            max_hit_points: 85,
            cluster_spawn_radius: 3,
        },
        SpeciesDefinition {
            id: SpeciesId::new("RockMoss"),
            label: "rock moss".to_owned(),
            grow_days: 12.0,
            fertility: FertilityRange::default(),
            temperature: TemperatureRange {
                min: -5.0,
                min_optimal: 5.0,
                max_optimal: 25.0,
                max: 35.0,
            },
            light: LightRange { min: 0.0, max: 0.3 },
            lifespan_days: Some(45.0),
            seed_emit_mtb_days: 6.0,
            requires_symbiosis: false,
            grow_only_on_rough_rock: true,
            grow_only_under_roof: false,
            grow_only_near_natural_rock: true,
            glower: GlowerSpec::None,
            hide_at_snow_depth: 99_999.0,
            max_hit_points: 60,
            cluster_spawn_radius: 2,
        },
        SpeciesDefinition {
            id: SpeciesId::new("Starbloom"),
            label: "starbloom".to_owned(),
            grow_days: 10.0,
            fertility: FertilityRange { min: 0.6, max: 1.4 },
            temperature: TemperatureRange {
                min: 5.0,
                min_optimal: 12.0,
                max_optimal: 28.0,
                max: 35.0,
            },
            light: LightRange { min: 0.0, max: 0.6 },
            lifespan_days: Some(40.0),
            seed_emit_mtb_days: 5.0,
            requires_symbiosis: true,
            grow_only_on_rough_rock: false,
            grow_only_under_roof: false,
            grow_only_near_natural_rock: false,
            glower: GlowerSpec::Static {
                kind: EntityKind::new("GlowerStarbloom"),
            },
            hide_at_snow_depth: 0.6,
            max_hit_points: 85,
            cluster_spawn_radius: 3,
        },
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn builtin_species_are_valid() {
        let catalog = SpeciesCatalog::from_definitions(builtin_species()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.contains(&SpeciesId::new("RockMoss")));
    }

    #[test]
    fn duplicate_rejected() {
        let mut defs = builtin_species();
        defs.push(defs.first().cloned().unwrap());
        let err = SpeciesCatalog::from_definitions(defs).unwrap_err();
        assert!(matches!(err, PlantError::DuplicateSpecies(_)));
    }

    #[test]
    fn unknown_species_is_an_error() {
        let catalog = SpeciesCatalog::default();
        let err = catalog.get(&SpeciesId::new("Nope")).unwrap_err();
        assert!(matches!(err, PlantError::SpeciesNotFound(_)));
    }

    #[test]
    fn bad_windows_rejected() {
        let mut species = builtin_species().remove(0);
        species.temperature.min_optimal = 50.0;
        assert!(validate_species(&species).is_err());

        let mut species = builtin_species().remove(0);
        species.grow_days = 0.0;
        assert!(validate_species(&species).is_err());

        let mut species = builtin_species().remove(0);
        species.light = LightRange { min: 0.8, max: 0.2 };
        assert!(validate_species(&species).is_err());
    }
}
