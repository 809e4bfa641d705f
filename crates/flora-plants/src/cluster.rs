//! Plant clusters.
//!
//! A cluster is a group of same-species plants spread from one founder. It
//! tracks its living member count and, for symbiosis species, the partner
//! cluster whose survival its members depend on.
//!
//! Plants talk to their cluster only through [`ClusterMembership`], so the
//! lifecycle code can be driven by the in-crate [`ClusterRegistry`] or by a
//! host-owned cluster system.

use std::collections::BTreeMap;

use flora_types::{ClusterId, ClusterSnapshot, Position, SpeciesId};

use crate::error::PlantError;

/// Membership callbacks a plant needs from its cluster.
pub trait ClusterMembership {
    /// A member plant was destroyed. Called at most once per plant.
    fn notify_plant_removed(&mut self, cluster: ClusterId);

    /// Whether the cluster's symbiosis partner still exists.
    ///
    /// `false` when the cluster is unknown, has no partner, or the partner
    /// has dissolved.
    fn is_symbiosis_partner_alive(&self, cluster: ClusterId) -> bool;
}

/// One cluster and its bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    /// Cluster identifier.
    pub id: ClusterId,
    /// Species of every member.
    pub species: SpeciesId,
    /// Cell the founder was placed on.
    pub center: Position,
    /// Living member count.
    pub plant_count: u32,
    /// Partner cluster for symbiosis species.
    pub symbiosis_partner: Option<ClusterId>,
    /// Set when the last member is removed. A dissolved cluster accepts no
    /// new members and ignores further removals.
    pub dissolved: bool,
}

impl Cluster {
    fn to_snapshot(&self) -> ClusterSnapshot {
        ClusterSnapshot {
            id: self.id,
            species: self.species.clone(),
            center: self.center,
            plant_count: self.plant_count,
            symbiosis_partner: self.symbiosis_partner,
            dissolved: self.dissolved,
        }
    }
}

/// In-memory registry of every cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterRegistry {
    clusters: BTreeMap<ClusterId, Cluster>,
}

impl ClusterRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            clusters: BTreeMap::new(),
        }
    }

    /// Register a new, empty cluster and return its ID.
    ///
    /// The cluster stays empty until members are added with
    /// [`Self::add_member`].
    pub fn found(&mut self, species: SpeciesId, center: Position) -> ClusterId {
        let id = ClusterId::new();
        tracing::debug!(cluster = %id, species = %species, center = %center, "cluster founded");
        self.clusters.insert(
            id,
            Cluster {
                id,
                species,
                center,
                plant_count: 0,
                symbiosis_partner: None,
                dissolved: false,
            },
        );
        id
    }

    /// Count one more living member.
    ///
    /// # Errors
    ///
    /// Returns [`PlantError::ClusterNotFound`] if the cluster is unknown or
    /// already dissolved.
    pub fn add_member(&mut self, id: ClusterId) -> Result<(), PlantError> {
        let cluster = self
            .clusters
            .get_mut(&id)
            .filter(|c| !c.dissolved)
            .ok_or(PlantError::ClusterNotFound(id))?;
        cluster.plant_count = cluster.plant_count.saturating_add(1);
        Ok(())
    }

    /// Make two clusters each other's symbiosis partner.
    ///
    /// # Errors
    ///
    /// Returns [`PlantError::ClusterNotFound`] if either cluster is unknown.
    pub fn link_symbiosis(&mut self, a: ClusterId, b: ClusterId) -> Result<(), PlantError> {
        if !self.clusters.contains_key(&b) {
            return Err(PlantError::ClusterNotFound(b));
        }
        self.clusters
            .get_mut(&a)
            .ok_or(PlantError::ClusterNotFound(a))?
            .symbiosis_partner = Some(b);
        if let Some(cluster) = self.clusters.get_mut(&b) {
            cluster.symbiosis_partner = Some(a);
        }
        Ok(())
    }

    /// Borrow a cluster.
    pub fn get(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.get(&id)
    }

    /// Iterate over every cluster, dissolved ones included.
    pub fn iter(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.values()
    }

    /// Number of clusters that still have members.
    pub fn active_count(&self) -> usize {
        self.clusters.values().filter(|c| !c.dissolved).count()
    }

    /// Externalize every cluster.
    pub fn snapshots(&self) -> Vec<ClusterSnapshot> {
        self.clusters.values().map(Cluster::to_snapshot).collect()
    }

    /// Rebuild a registry from persisted clusters.
    pub fn from_snapshots(snapshots: impl IntoIterator<Item = ClusterSnapshot>) -> Self {
        let clusters = snapshots
            .into_iter()
            .map(|s| {
                (
                    s.id,
                    Cluster {
                        id: s.id,
                        species: s.species,
                        center: s.center,
                        plant_count: s.plant_count,
                        symbiosis_partner: s.symbiosis_partner,
                        dissolved: s.dissolved,
                    },
                )
            })
            .collect();
        Self { clusters }
    }
}

impl ClusterMembership for ClusterRegistry {
    fn notify_plant_removed(&mut self, id: ClusterId) {
        let Some(cluster) = self.clusters.get_mut(&id) else {
            tracing::warn!(cluster = %id, "removal notice for unknown cluster");
            return;
        };
        if cluster.dissolved {
            return;
        }
        cluster.plant_count = cluster.plant_count.saturating_sub(1);
        if cluster.plant_count == 0 {
            cluster.dissolved = true;
            tracing::debug!(cluster = %id, species = %cluster.species, "cluster dissolved");
        }
    }

    fn is_symbiosis_partner_alive(&self, id: ClusterId) -> bool {
        self.clusters
            .get(&id)
            .and_then(|c| c.symbiosis_partner)
            .and_then(|partner| self.clusters.get(&partner))
            .is_some_and(|partner| !partner.dissolved)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn registry_with_member() -> (ClusterRegistry, ClusterId) {
        let mut registry = ClusterRegistry::new();
        let id = registry.found(SpeciesId::new("Gleamcap"), Position::new(3, 3));
        registry.add_member(id).unwrap();
        (registry, id)
    }

    #[test]
    fn last_removal_dissolves() {
        let (mut registry, id) = registry_with_member();
        registry.add_member(id).unwrap();
        registry.notify_plant_removed(id);
        assert!(!registry.get(id).unwrap().dissolved);
        registry.notify_plant_removed(id);
        let cluster = registry.get(id).unwrap();
        assert!(cluster.dissolved);
        assert_eq!(cluster.plant_count, 0);
        assert_eq!(registry.active_count(), 0);
    }

    #[test]
    fn dissolved_cluster_rejects_members() {
        let (mut registry, id) = registry_with_member();
        registry.notify_plant_removed(id);
        assert!(matches!(registry.add_member(id), Err(PlantError::ClusterNotFound(_))));
    }

    #[test]
    fn removal_on_unknown_cluster_is_ignored() {
        let (mut registry, id) = registry_with_member();
        registry.notify_plant_removed(ClusterId::new());
        assert_eq!(registry.get(id).unwrap().plant_count, 1);
    }

    #[test]
    fn symbiosis_follows_partner() {
        let (mut registry, a) = registry_with_member();
        assert!(!registry.is_symbiosis_partner_alive(a));

        let b = registry.found(SpeciesId::new("Gleamcap"), Position::new(9, 9));
        registry.add_member(b).unwrap();
        registry.link_symbiosis(a, b).unwrap();
        assert!(registry.is_symbiosis_partner_alive(a));
        assert!(registry.is_symbiosis_partner_alive(b));

        registry.notify_plant_removed(b);
        assert!(!registry.is_symbiosis_partner_alive(a));
        assert!(registry.is_symbiosis_partner_alive(b));
    }

    #[test]
    fn snapshots_round_trip() {
        let (registry, _) = registry_with_member();
        let restored = ClusterRegistry::from_snapshots(registry.snapshots());
        assert_eq!(restored, registry);
    }
}
