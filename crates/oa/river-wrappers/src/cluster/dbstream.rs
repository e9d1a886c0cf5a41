//! Binding for River's `cluster.DBSTREAM`.
//!
//! DBSTREAM creates and removes micro clusters as the stream evolves. After
//! every learned instance the mirrors are reconciled with the live micro
//! clusters, so there is exactly one mirror per micro cluster object.
//! Predictions name a macro cluster and are assigned to its closest member.

use oa_types::{ClusterId, ClusterProperty};

use super::mirrors::{ClusterMirrors, SyncReport};
use super::{resolve_macro_cluster, ClusterAnalyzerRiver, ClusterBinding};
use crate::algo::{DbStreamClusterer, DbStreamParams, FeatureDict, FromParams};
use crate::config::AnalyzerConfig;
use crate::error::WrapperResult;

/// Binding for DBSTREAM micro clusters.
pub struct DbStreamBinding<A> {
    algo: A,
}

impl<A: DbStreamClusterer> DbStreamBinding<A> {
    pub const TYPE: &'static str = "River Cluster Analyzer DBSTREAM";

    pub fn new(algo: A) -> Self {
        Self { algo }
    }
}

impl<A: DbStreamClusterer> ClusterBinding for DbStreamBinding<A> {
    type Algorithm = A;

    fn wrapper_type(&self) -> &'static str {
        Self::TYPE
    }

    fn properties(&self) -> &'static [ClusterProperty] {
        &[ClusterProperty::Centroid]
    }

    fn algorithm(&self) -> &A {
        &self.algo
    }

    fn algorithm_mut(&mut self) -> &mut A {
        &mut self.algo
    }

    fn reconcile_clusters(
        &mut self,
        mirrors: &mut ClusterMirrors,
        _input: &FeatureDict,
    ) -> WrapperResult<SyncReport> {
        mirrors.sync(&self.algo.micro_clusters())
    }

    fn refresh_clusters(
        &mut self,
        mirrors: &mut ClusterMirrors,
        _input: &FeatureDict,
    ) -> WrapperResult<()> {
        for view in self.algo.micro_clusters() {
            mirrors.set_centroid(view.identity, view.center)?;
        }
        Ok(())
    }

    // Predictions are macro cluster indices, resolved to the closest member.
    fn resolve_prediction(
        &self,
        mirrors: &ClusterMirrors,
        predicted: usize,
        input: &FeatureDict,
    ) -> WrapperResult<ClusterId> {
        let members = self.algo.macro_cluster_members(predicted);
        resolve_macro_cluster(mirrors, &members, predicted, input)
    }
}

pub type WrRiverDbStream<A> = ClusterAnalyzerRiver<DbStreamBinding<A>>;

impl<A: DbStreamClusterer> ClusterAnalyzerRiver<DbStreamBinding<A>> {
    pub fn from_algorithm(algo: A, config: AnalyzerConfig) -> Self {
        Self::new(DbStreamBinding::new(algo), config)
    }
}

impl<A> ClusterAnalyzerRiver<DbStreamBinding<A>>
where
    A: DbStreamClusterer + FromParams<DbStreamParams>,
{
    pub fn with_params(
        params: &DbStreamParams,
        config: AnalyzerConfig,
    ) -> WrapperResult<Self> {
        params.validate()?;
        Ok(Self::from_algorithm(A::from_params(params), config))
    }
}
