//! # oa-types
//!
//! Stream data model shared by online-adaptive stream tasks.
//!
//! Tasks receive `Instance`s one at a time, maintain `Cluster`s in a
//! `ClusterSet`, and publish `ChangeEvent`s (point anomalies, drifts) through
//! the `EventBus` of their `StreamTask` core. A `Normalizer` lets a task move
//! stored values onto new normalization parameters.
//!
//! ```rust
//! use oa_types::{ClusterProperty, ClusterSet, FeatureData, Instance, InstanceId};
//!
//! let inst = Instance::new(InstanceId(1), FeatureData::from_values(vec![1.0, 2.0]));
//! assert_eq!(inst.feature_data().num_dim(), 2);
//!
//! let mut clusters = ClusterSet::new();
//! let id = clusters.add_cluster(&[ClusterProperty::Centroid], false);
//! clusters.get_mut(id).unwrap().set_centroid(vec![1.0, 2.0]);
//! assert_eq!(clusters.len(), 1);
//! ```

#![deny(unsafe_code)]

pub mod cluster;
pub mod error;
pub mod events;
pub mod instance;
pub mod normalizer;
pub mod task;

// ── Re-exports ──────────────────────────────────────────────────────────

pub use cluster::{Cluster, ClusterId, ClusterProperty, ClusterSet};
pub use error::{TypesError, TypesResult};
pub use events::{
    ChangeEvent, DriftSignal, EventBus, EventHandler, EventId, EventKind, PointAnomaly,
};
pub use instance::{DimId, FeatureData, Instance, InstanceId};
pub use normalizer::{Bounds, MinMaxRenormalizer, Normalizer};
pub use task::{LogLevel, StreamTask};
