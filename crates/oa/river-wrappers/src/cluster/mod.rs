//! Cluster analysis with River incremental clusterers.
//!
//! `ClusterAnalyzerRiver` drives a `ClusterBinding`: every adapted instance
//! is learned by the wrapped algorithm, after which the binding reconciles
//! the host mirror clusters with the algorithm's internal clusters and
//! refreshes their properties. Memberships are crisp: the cluster the
//! algorithm predicts gets 1.0, every other cluster 0.0.

pub mod centroid;
pub mod dbstream;
pub mod denstream;
pub mod mirrors;

use oa_types::{Cluster, ClusterId, ClusterProperty, ClusterSet, Instance, Normalizer, StreamTask};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::algo::{Clusterer, FeatureDict};
use crate::config::AnalyzerConfig;
use crate::error::{WrapperError, WrapperResult};
use crate::wrapper::Wrapper;

pub use centroid::{
    CluStreamBinding, KMeansBinding, StreamKMeansBinding, WrRiverCluStream, WrRiverKMeans,
    WrRiverStreamKMeans,
};
pub use dbstream::{DbStreamBinding, WrRiverDbStream};
pub use denstream::{DenStreamBinding, WrRiverDenStream};
pub use mirrors::{ClusterMirrors, MirrorEntry, SyncReport};

// ── Binding ─────────────────────────────────────────────────────────────

/// Algorithm-specific half of a cluster analyzer.
pub trait ClusterBinding {
    type Algorithm: Clusterer;

    /// Wrapper type label, also the default task name.
    fn wrapper_type(&self) -> &'static str;

    /// Properties of the mirror clusters.
    fn properties(&self) -> &'static [ClusterProperty];

    fn algorithm(&self) -> &Self::Algorithm;

    fn algorithm_mut(&mut self) -> &mut Self::Algorithm;

    /// Create and remove mirrors until they match the algorithm's clusters.
    fn reconcile_clusters(
        &mut self,
        mirrors: &mut ClusterMirrors,
        input: &FeatureDict,
    ) -> WrapperResult<SyncReport>;

    /// Copy centroids (and sizes, where tracked) into the mirrors.
    fn refresh_clusters(
        &mut self,
        mirrors: &mut ClusterMirrors,
        input: &FeatureDict,
    ) -> WrapperResult<()>;

    /// Mirror assigned to `input`, given the index `predict_one` returned.
    ///
    /// Defaults to the mirror currently stored under that key.
    fn resolve_prediction(
        &self,
        mirrors: &ClusterMirrors,
        predicted: usize,
        _input: &FeatureDict,
    ) -> WrapperResult<ClusterId> {
        mirrors
            .entry_for_key(predicted)
            .map(|entry| entry.id)
            .ok_or(WrapperError::UnknownClusterKey(predicted))
    }

    /// Move stored centroids onto new normalization parameters.
    fn renormalize(
        &mut self,
        _mirrors: &mut ClusterMirrors,
        _normalizer: &dyn Normalizer,
    ) -> WrapperResult<()> {
        Err(WrapperError::NotImplemented(format!(
            "renormalization for {}",
            self.wrapper_type()
        )))
    }
}

/// Resolve a predicted macro cluster to the mirror of its member micro
/// cluster closest to `input`.
pub(crate) fn resolve_macro_cluster(
    mirrors: &ClusterMirrors,
    members: &[u64],
    predicted: usize,
    input: &FeatureDict,
) -> WrapperResult<ClusterId> {
    mirrors
        .nearest_entry(members, &input.values())
        .map(|entry| entry.id)
        .ok_or(WrapperError::UnknownClusterKey(predicted))
}

// ── Memberships ─────────────────────────────────────────────────────────

/// Which clusters a membership query reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipScope {
    /// Only the assigned cluster.
    #[default]
    Max,
    /// Every cluster, in slot order.
    All,
}

/// Membership of an instance in one cluster.
#[derive(Clone, Copy, Debug)]
pub struct Membership<'a> {
    pub cluster_id: ClusterId,
    pub membership: f64,
    pub cluster: &'a Cluster,
}

// ── Analyzer ────────────────────────────────────────────────────────────

/// Cluster analyzer task backed by a River clusterer.
pub struct ClusterAnalyzerRiver<B: ClusterBinding> {
    task: StreamTask,
    binding: B,
    mirrors: ClusterMirrors,
}

impl<B: ClusterBinding> ClusterAnalyzerRiver<B> {
    pub fn new(binding: B, config: AnalyzerConfig) -> Self {
        let name = config
            .name
            .unwrap_or_else(|| binding.wrapper_type().to_string());
        let mirrors = ClusterMirrors::new(binding.properties(), config.visualize);
        let task = StreamTask::new(name, config.ada, config.visualize, config.logging);
        Self {
            task,
            binding,
            mirrors,
        }
    }

    /// Learn one instance and bring the mirror clusters up to date.
    ///
    /// Returns `false` without touching anything when adaptivity is off.
    pub fn adapt(&mut self, instance: &Instance) -> WrapperResult<bool> {
        if !self.task.is_adaptive() {
            return Ok(false);
        }

        let input = FeatureDict::from_values(instance.feature_data().values());
        if self.task.logging().logs_info() {
            debug!(task = %self.task.name(), instance = %instance.id, "adapting clusters");
        }

        self.binding.algorithm_mut().learn_one(&input);
        let report = self.binding.reconcile_clusters(&mut self.mirrors, &input)?;
        self.binding.refresh_clusters(&mut self.mirrors, &input)?;

        if self.task.logging().logs_info() && report != SyncReport::default() {
            info!(
                task = %self.task.name(),
                created = report.created,
                removed = report.removed,
                clusters = self.mirrors.len(),
                "clusters reconciled"
            );
        }
        Ok(true)
    }

    /// Crisp memberships of `instance`.
    ///
    /// Fails with `UnknownClusterKey` when the algorithm predicts a cluster
    /// the binding cannot resolve to a mirror.
    pub fn get_cluster_memberships(
        &mut self,
        instance: &Instance,
        scope: MembershipScope,
    ) -> WrapperResult<Vec<Membership<'_>>> {
        let input = FeatureDict::from_values(instance.feature_data().values());
        let key = self.binding.algorithm_mut().predict_one(&input);
        let assigned = self.binding.resolve_prediction(&self.mirrors, key, &input)?;

        if self.task.logging().logs_info() {
            debug!(
                task = %self.task.name(),
                instance = %instance.id,
                key,
                cluster = %assigned,
                "membership computed"
            );
        }

        let memberships = self
            .mirrors
            .clusters()
            .iter()
            .filter_map(|cluster| {
                let membership = if cluster.id() == assigned { 1.0 } else { 0.0 };
                match scope {
                    MembershipScope::Max if membership == 0.0 => None,
                    _ => Some(Membership {
                        cluster_id: cluster.id(),
                        membership,
                        cluster,
                    }),
                }
            })
            .collect();
        Ok(memberships)
    }

    /// Renormalize stored centroids. Only supported by some algorithms.
    pub fn renormalize(&mut self, normalizer: &dyn Normalizer) -> WrapperResult<()> {
        match self.binding.renormalize(&mut self.mirrors, normalizer) {
            Err(WrapperError::NotImplemented(what)) => {
                if self.task.logging().logs_warnings() {
                    warn!(task = %self.task.name(), "{} is not supported", what);
                }
                Err(WrapperError::NotImplemented(what))
            }
            other => other,
        }
    }

    pub fn clusters(&self) -> &ClusterSet {
        self.mirrors.clusters()
    }

    pub fn mirrors(&self) -> &ClusterMirrors {
        &self.mirrors
    }

    pub fn get_algorithm(&self) -> &B::Algorithm {
        self.binding.algorithm()
    }

    pub fn binding(&self) -> &B {
        &self.binding
    }

    pub fn task(&self) -> &StreamTask {
        &self.task
    }

    pub fn switch_adaptivity(&mut self, ada: bool) {
        self.task.switch_adaptivity(ada);
    }
}

impl<B: ClusterBinding> Wrapper for ClusterAnalyzerRiver<B> {
    fn wrapper_type(&self) -> &'static str {
        self.binding.wrapper_type()
    }

    fn task_name(&self) -> &str {
        self.task.name()
    }
}
