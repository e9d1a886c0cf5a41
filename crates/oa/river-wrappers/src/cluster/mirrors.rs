//! Host-side mirrors of algorithm-internal clusters.
//!
//! Each algorithm cluster object (identified by a stable `identity`) has at
//! most one mirror `Cluster` in the host `ClusterSet`. The algorithm's
//! current key for the object is tracked alongside, so predictions (which
//! return keys) can be resolved to mirrors.

use std::collections::{HashMap, HashSet};

use oa_types::{Cluster, ClusterId, ClusterProperty, ClusterSet};

use crate::algo::MicroClusterView;
use crate::error::{WrapperError, WrapperResult};

/// Link between an algorithm cluster object and its mirror.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MirrorEntry {
    pub id: ClusterId,
    pub key: usize,
}

/// Outcome of one reconciliation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: usize,
    pub removed: usize,
}

/// Mirror clusters plus the identity map that ties them to the algorithm.
#[derive(Clone, Debug)]
pub struct ClusterMirrors {
    clusters: ClusterSet,
    by_identity: HashMap<u64, MirrorEntry>,
    properties: Vec<ClusterProperty>,
    visualize: bool,
}

impl ClusterMirrors {
    pub fn new(properties: &[ClusterProperty], visualize: bool) -> Self {
        Self {
            clusters: ClusterSet::new(),
            by_identity: HashMap::new(),
            properties: properties.to_vec(),
            visualize,
        }
    }

    /// Make the mirrors match `views` exactly: vanished objects lose their
    /// mirror, unseen objects get one initialized with their center, and
    /// keys of known objects are refreshed.
    pub fn sync(&mut self, views: &[MicroClusterView]) -> WrapperResult<SyncReport> {
        let mut report = SyncReport::default();

        let live: HashSet<u64> = views.iter().map(|v| v.identity).collect();
        let stale: Vec<u64> = self
            .by_identity
            .keys()
            .filter(|identity| !live.contains(identity))
            .copied()
            .collect();
        for identity in stale {
            if let Some(entry) = self.by_identity.remove(&identity) {
                self.clusters.remove_cluster(entry.id)?;
                report.removed += 1;
            }
        }

        for view in views {
            if let Some(entry) = self.by_identity.get_mut(&view.identity) {
                entry.key = view.key;
                continue;
            }
            let id = self.clusters.add_cluster(&self.properties, self.visualize);
            if let Some(cluster) = self.clusters.get_mut(id) {
                cluster.set_centroid(view.center.clone());
            }
            self.by_identity.insert(view.identity, MirrorEntry { id, key: view.key });
            report.created += 1;
        }

        Ok(report)
    }

    /// Overwrite the centroid of the mirror of `identity`.
    pub fn set_centroid(&mut self, identity: u64, center: Vec<f64>) -> WrapperResult<()> {
        let cluster = self
            .by_identity
            .get(&identity)
            .and_then(|entry| self.clusters.get_mut(entry.id))
            .ok_or(WrapperError::UnknownClusterIdentity(identity))?;
        cluster.set_centroid(center);
        Ok(())
    }

    /// Mirror entry of the object currently stored under `key`.
    pub fn entry_for_key(&self, key: usize) -> Option<MirrorEntry> {
        self.by_identity.values().find(|entry| entry.key == key).copied()
    }

    /// Mirror among `identities` whose centroid is closest (Euclidean) to
    /// `point`. Identities without a mirror are ignored.
    pub fn nearest_entry(&self, identities: &[u64], point: &[f64]) -> Option<MirrorEntry> {
        let mut best: Option<(f64, MirrorEntry)> = None;
        for identity in identities {
            let Some(entry) = self.entry(*identity) else {
                continue;
            };
            let Some(centroid) = self.clusters.get(entry.id).and_then(|c| c.centroid()) else {
                continue;
            };
            let dist: f64 = centroid
                .iter()
                .zip(point)
                .map(|(c, p)| (c - p) * (c - p))
                .sum();
            if best.map_or(true, |(d, _)| dist < d) {
                best = Some((dist, entry));
            }
        }
        best.map(|(_, entry)| entry)
    }

    /// Increment the size of the mirror stored under `key`. Returns whether a
    /// mirror was found.
    pub fn increment_size_for_key(&mut self, key: usize) -> bool {
        match self
            .entry_for_key(key)
            .and_then(|entry| self.clusters.get_mut(entry.id))
        {
            Some(cluster) => {
                cluster.increment_size();
                true
            }
            None => false,
        }
    }

    pub fn entry(&self, identity: u64) -> Option<MirrorEntry> {
        self.by_identity.get(&identity).copied()
    }

    /// `(identity, entry)` pairs in identity order.
    pub fn entries(&self) -> Vec<(u64, MirrorEntry)> {
        let mut entries: Vec<_> = self.by_identity.iter().map(|(&i, &e)| (i, e)).collect();
        entries.sort_by_key(|(identity, _)| *identity);
        entries
    }

    pub fn cluster(&self, identity: u64) -> Option<&Cluster> {
        self.entry(identity).and_then(|entry| self.clusters.get(entry.id))
    }

    pub fn clusters(&self) -> &ClusterSet {
        &self.clusters
    }

    pub fn properties(&self) -> &[ClusterProperty] {
        &self.properties
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}
