//! Cluster entities and the arena-backed cluster collection.
//!
//! A `Cluster` carries a set of properties (centroid, size) that cluster
//! analyzers keep up to date. `ClusterSet` stores clusters in indexed slots;
//! a removed cluster's slot is reused with a bumped generation, so a stale
//! `ClusterId` never resolves to a newer cluster.

use serde::{Deserialize, Serialize};

use crate::error::{TypesError, TypesResult};

// ── Identifier ──────────────────────────────────────────────────────────

/// Handle of a cluster inside a `ClusterSet`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClusterId {
    index: u32,
    generation: u32,
}

impl ClusterId {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl std::fmt::Display for ClusterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cluster:{}.{}", self.index, self.generation)
    }
}

// ── Properties ──────────────────────────────────────────────────────────

/// Property a cluster can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClusterProperty {
    /// Center coordinates.
    Centroid,
    /// Number of instances assigned so far.
    Size,
}

impl std::fmt::Display for ClusterProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Centroid => write!(f, "centroid"),
            Self::Size => write!(f, "size"),
        }
    }
}

// ── Cluster ─────────────────────────────────────────────────────────────

/// A cluster with optional centroid and size properties.
///
/// Setting a property the cluster was not created with is a no-op.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    id: ClusterId,
    properties: Vec<ClusterProperty>,
    centroid: Option<Vec<f64>>,
    size: Option<u64>,
    visualize: bool,
}

impl Cluster {
    fn new(id: ClusterId, properties: &[ClusterProperty], visualize: bool) -> Self {
        Self {
            id,
            properties: properties.to_vec(),
            centroid: None,
            size: None,
            visualize,
        }
    }

    pub fn id(&self) -> ClusterId {
        self.id
    }

    pub fn properties(&self) -> &[ClusterProperty] {
        &self.properties
    }

    pub fn has_property(&self, property: ClusterProperty) -> bool {
        self.properties.contains(&property)
    }

    pub fn centroid(&self) -> Option<&[f64]> {
        self.centroid.as_deref()
    }

    pub fn set_centroid(&mut self, values: Vec<f64>) {
        if self.has_property(ClusterProperty::Centroid) {
            self.centroid = Some(values);
        }
    }

    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn set_size(&mut self, size: u64) {
        if self.has_property(ClusterProperty::Size) {
            self.size = Some(size);
        }
    }

    /// Increment the size property, starting from 1 when unset.
    pub fn increment_size(&mut self) {
        if self.has_property(ClusterProperty::Size) {
            self.size = Some(self.size.map_or(1, |s| s + 1));
        }
    }

    pub fn visualize(&self) -> bool {
        self.visualize
    }
}

// ── Cluster Set ─────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    cluster: Option<Cluster>,
}

/// Indexed collection of clusters with slot reuse.
#[derive(Clone, Debug, Default)]
pub struct ClusterSet {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl ClusterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cluster in a free slot and return its id.
    pub fn add_cluster(&mut self, properties: &[ClusterProperty], visualize: bool) -> ClusterId {
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.generation = slot.generation.wrapping_add(1);
                ClusterId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    cluster: None,
                });
                ClusterId {
                    index,
                    generation: 0,
                }
            }
        };
        self.slots[id.index as usize].cluster = Some(Cluster::new(id, properties, visualize));
        self.len += 1;
        id
    }

    /// Remove a cluster, reclaiming its slot.
    pub fn remove_cluster(&mut self, id: ClusterId) -> TypesResult<Cluster> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .ok_or(TypesError::ClusterNotFound(id))?;
        let cluster = slot.cluster.take().ok_or(TypesError::ClusterNotFound(id))?;
        self.free.push(id.index);
        self.len -= 1;
        Ok(cluster)
    }

    pub fn get(&self, id: ClusterId) -> Option<&Cluster> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.cluster.as_ref())
    }

    pub fn get_mut(&mut self, id: ClusterId) -> Option<&mut Cluster> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.cluster.as_mut())
    }

    pub fn contains(&self, id: ClusterId) -> bool {
        self.get(id).is_some()
    }

    /// Iterate live clusters in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Cluster> + '_ {
        self.slots.iter().filter_map(|s| s.cluster.as_ref())
    }

    pub fn ids(&self) -> Vec<ClusterId> {
        self.iter().map(Cluster::id).collect()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
