//! Binding for River's `cluster.DenStream`.
//!
//! DenStream only forms macro clusters once its initialization phase is
//! over, and does so lazily on the first prediction. The binding therefore
//! issues one priming prediction with an all-zero sample as soon as more than
//! `n_samples_init` instances were adapted. Mirrors follow the potential
//! micro clusters, and only once at least one macro cluster exists.

use oa_types::{ClusterId, ClusterProperty};

use super::mirrors::{ClusterMirrors, SyncReport};
use super::{resolve_macro_cluster, ClusterAnalyzerRiver, ClusterBinding};
use crate::algo::{DenStreamClusterer, DenStreamParams, FeatureDict, FromParams};
use crate::config::AnalyzerConfig;
use crate::error::WrapperResult;

/// Binding for DenStream potential micro clusters.
pub struct DenStreamBinding<A> {
    algo: A,
    adapt_cycles: usize,
    primed: bool,
}

impl<A: DenStreamClusterer> DenStreamBinding<A> {
    pub const TYPE: &'static str = "River Cluster Analyzer DenStream";

    pub fn new(algo: A) -> Self {
        Self {
            algo,
            adapt_cycles: 0,
            primed: false,
        }
    }

    pub fn adapt_cycles(&self) -> usize {
        self.adapt_cycles
    }

    /// Whether the priming prediction was issued.
    pub fn is_primed(&self) -> bool {
        self.primed
    }
}

impl<A: DenStreamClusterer> ClusterBinding for DenStreamBinding<A> {
    type Algorithm = A;

    fn wrapper_type(&self) -> &'static str {
        Self::TYPE
    }

    // Predictions refer to macro clusters, so sizes are not tracked.
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
        input: &FeatureDict,
    ) -> WrapperResult<SyncReport> {
        self.adapt_cycles += 1;
        if !self.primed && self.adapt_cycles > self.algo.n_samples_init() {
            self.algo.predict_one(&FeatureDict::zeros(input.len()));
            self.primed = true;
        }

        if self.algo.n_clusters() == 0 {
            return Ok(SyncReport::default());
        }
        mirrors.sync(&self.algo.p_micro_clusters())
    }

    fn refresh_clusters(
        &mut self,
        mirrors: &mut ClusterMirrors,
        _input: &FeatureDict,
    ) -> WrapperResult<()> {
        if self.algo.n_clusters() == 0 {
            return Ok(());
        }
        for view in self.algo.p_micro_clusters() {
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

pub type WrRiverDenStream<A> = ClusterAnalyzerRiver<DenStreamBinding<A>>;

impl<A: DenStreamClusterer> ClusterAnalyzerRiver<DenStreamBinding<A>> {
    pub fn from_algorithm(algo: A, config: AnalyzerConfig) -> Self {
        Self::new(DenStreamBinding::new(algo), config)
    }
}

impl<A> ClusterAnalyzerRiver<DenStreamBinding<A>>
where
    A: DenStreamClusterer + FromParams<DenStreamParams>,
{
    pub fn with_params(
        params: &DenStreamParams,
        config: AnalyzerConfig,
    ) -> WrapperResult<Self> {
        params.validate()?;
        Ok(Self::from_algorithm(A::from_params(params), config))
    }
}
