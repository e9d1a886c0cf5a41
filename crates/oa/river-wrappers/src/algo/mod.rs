//! Calling convention of the wrapped online learning library.
//!
//! River-style algorithms consume one sample at a time as a dictionary of
//! feature key to value and expose `learn_one` / `predict_one` /
//! `score_one` / `update`. The traits here describe exactly the surface the
//! wrappers call, so any implementation of the algorithms can be plugged in.

pub mod params;

use std::collections::BTreeMap;

use oa_types::FeatureData;
use serde::{Deserialize, Serialize};

pub use params::{
    CluStreamParams, DbStreamParams, DenStreamParams, KMeansParams, StreamKMeansParams,
};

// ── Feature Dictionary ──────────────────────────────────────────────────

/// Key of a feature dictionary entry.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FeatureKey {
    /// 1-based feature position.
    Index(usize),
    /// Feature (dimension) name.
    Name(String),
}

/// One sample in the library's calling convention.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureDict(BTreeMap<FeatureKey, f64>);

impl FeatureDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enumerate values from 1: `[a, b]` becomes `{1: a, 2: b}`.
    pub fn from_values(values: &[f64]) -> Self {
        Self(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| (FeatureKey::Index(i + 1), v))
                .collect(),
        )
    }

    /// Key values by their dimension names.
    pub fn from_named(data: &FeatureData) -> Self {
        Self(
            data.iter()
                .map(|(dim, v)| (FeatureKey::Name(dim.0.clone()), v))
                .collect(),
        )
    }

    /// `n` index keys, all zero.
    pub fn zeros(n: usize) -> Self {
        Self::from_values(&vec![0.0; n])
    }

    pub fn insert(&mut self, key: FeatureKey, value: f64) -> Option<f64> {
        self.0.insert(key, value)
    }

    pub fn get(&self, key: &FeatureKey) -> Option<f64> {
        self.0.get(key).copied()
    }

    /// Values in key order.
    pub fn values(&self) -> Vec<f64> {
        self.0.values().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FeatureKey, &f64)> + '_ {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ── Algorithm Traits ────────────────────────────────────────────────────

/// Point anomaly scorer (HalfSpaceTrees, OneClassSVM, GaussianScorer, ...).
pub trait AnomalyScorer {
    /// Anomaly score of a sample; higher means more anomalous.
    fn score_one(&mut self, x: &FeatureDict) -> f64;

    fn learn_one(&mut self, x: &FeatureDict);
}

/// Univariate drift detector (ADWIN, KSWIN, PageHinkley, ...).
pub trait DriftDetector {
    fn update(&mut self, value: f64);

    /// Whether the last `update` detected a drift.
    fn drift_detected(&self) -> bool;
}

/// Incremental clusterer.
pub trait Clusterer {
    fn learn_one(&mut self, x: &FeatureDict);

    /// Index of the cluster the sample is assigned to.
    fn predict_one(&mut self, x: &FeatureDict) -> usize;
}

/// Clusterer that keeps one center per cluster index (KMeans, StreamKMeans,
/// CluStream macro clusters).
pub trait CentroidClusterer: Clusterer {
    fn centers(&self) -> BTreeMap<usize, FeatureDict>;

    /// Overwrite the center of a cluster.
    fn set_center(&mut self, key: usize, center: FeatureDict);
}

/// Read-only view of an algorithm-internal micro cluster.
#[derive(Clone, Debug, PartialEq)]
pub struct MicroClusterView {
    /// Stable identity of the micro cluster object for its whole lifetime.
    pub identity: u64,
    /// Current key of the micro cluster in the algorithm's container.
    pub key: usize,
    pub center: Vec<f64>,
}

/// DBSTREAM state accessors.
///
/// `predict_one` returns a macro cluster index; micro clusters have their own
/// keys.
pub trait DbStreamClusterer: Clusterer {
    fn micro_clusters(&self) -> Vec<MicroClusterView>;

    /// Identities of the micro clusters forming macro cluster `cluster`.
    fn macro_cluster_members(&self, cluster: usize) -> Vec<u64>;
}

/// DenStream state accessors.
pub trait DenStreamClusterer: Clusterer {
    /// Number of macro clusters formed so far.
    fn n_clusters(&self) -> usize;

    /// Samples consumed before the online phase starts.
    fn n_samples_init(&self) -> usize;

    /// Potential micro clusters.
    fn p_micro_clusters(&self) -> Vec<MicroClusterView>;

    /// Identities of the potential micro clusters forming macro cluster
    /// `cluster`.
    fn macro_cluster_members(&self, cluster: usize) -> Vec<u64>;
}

/// Builds an algorithm from its parameter set.
pub trait FromParams<P>: Sized {
    fn from_params(params: &P) -> Self;
}
