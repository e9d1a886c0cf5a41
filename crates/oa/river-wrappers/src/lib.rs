//! # oa-river-wrappers
//!
//! Runs River-style online learning algorithms as online-adaptive stream
//! tasks.
//!
//! ## Wrappers
//!
//! - `AnomalyDetectorRiver`: scores each instance and raises a
//!   `PointAnomaly` when the score exceeds 0.8; every instance is learned.
//! - `DriftDetectorRiver`: feeds one feature into a drift detector and raises
//!   a `DriftSignal` when the detector reports a drift.
//! - `ClusterAnalyzerRiver`: learns instances with an incremental clusterer
//!   and mirrors its clusters (KMeans, StreamKMeans, CluStream, DBSTREAM,
//!   DenStream) as host `Cluster`s with crisp memberships.
//!
//! Algorithms plug in through the traits in [`algo`]; the wrappers never
//! depend on a concrete implementation.
//!
//! ```rust
//! use oa_river_wrappers::WrapperRiver;
//!
//! assert_eq!(WrapperRiver::WRAPPED_PACKAGE, "river");
//! assert_eq!(WrapperRiver::sciref().url, "riverml.xyz");
//! ```

#![deny(unsafe_code)]

pub mod algo;
pub mod anomaly;
pub mod buffer;
pub mod cluster;
pub mod config;
pub mod drift;
pub mod error;
pub mod wrapper;

// ── Re-exports ──────────────────────────────────────────────────────────

pub use algo::{
    AnomalyScorer, CentroidClusterer, Clusterer, DbStreamClusterer, DenStreamClusterer,
    DriftDetector, FeatureDict, FeatureKey, FromParams, MicroClusterView,
};
pub use anomaly::{AnomalyDetectorRiver, ANOMALY_SCORE_THRESHOLD};
pub use buffer::{validate_steprate, InstanceBuffer};
pub use cluster::{
    CluStreamBinding, ClusterAnalyzerRiver, ClusterBinding, ClusterMirrors, DbStreamBinding,
    DenStreamBinding, KMeansBinding, Membership, MembershipScope, StreamKMeansBinding,
    WrRiverCluStream, WrRiverDbStream, WrRiverDenStream, WrRiverKMeans, WrRiverStreamKMeans,
};
pub use config::{AnalyzerConfig, DetectorConfig, FeatureSelector};
pub use drift::DriftDetectorRiver;
pub use error::{WrapperError, WrapperResult};
pub use wrapper::{SciRef, Wrapper, WrapperInfo, WrapperRiver};
