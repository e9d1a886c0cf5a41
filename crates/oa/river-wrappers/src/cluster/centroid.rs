//! Bindings for clusterers that keep one center per cluster index:
//! KMeans, StreamKMeans and CluStream (macro clusters).
//!
//! The center index is both identity and key. Mirrors only ever grow, since
//! these algorithms never drop a center, and sizes follow `predict_one` on
//! the adapted instance.

use oa_types::{ClusterProperty, Normalizer};

use super::mirrors::{ClusterMirrors, SyncReport};
use super::{ClusterAnalyzerRiver, ClusterBinding};
use crate::algo::{
    CentroidClusterer, CluStreamParams, FeatureDict, FromParams, KMeansParams, MicroClusterView,
    StreamKMeansParams,
};
use crate::config::AnalyzerConfig;
use crate::error::WrapperResult;

const CENTROID_AND_SIZE: &[ClusterProperty] = &[ClusterProperty::Centroid, ClusterProperty::Size];

fn center_views<A: CentroidClusterer>(algo: &A) -> Vec<MicroClusterView> {
    algo.centers()
        .into_iter()
        .map(|(key, center)| MicroClusterView {
            identity: key as u64,
            key,
            center: center.values(),
        })
        .collect()
}

fn refresh_centers<A: CentroidClusterer>(
    algo: &mut A,
    mirrors: &mut ClusterMirrors,
    input: &FeatureDict,
) -> WrapperResult<()> {
    let assigned = algo.predict_one(input);
    for (key, center) in algo.centers() {
        mirrors.set_centroid(key as u64, center.values())?;
    }
    mirrors.increment_size_for_key(assigned);
    Ok(())
}

/// Renormalize each mirror centroid and write it back as the algorithm's
/// center. Nothing is written unless every centroid renormalizes.
fn renormalize_centers<A: CentroidClusterer>(
    algo: &mut A,
    mirrors: &mut ClusterMirrors,
    normalizer: &dyn Normalizer,
) -> WrapperResult<()> {
    let mut renormalized = Vec::new();
    for (identity, entry) in mirrors.entries() {
        let Some(centroid) = mirrors.cluster(identity).and_then(|c| c.centroid()) else {
            continue;
        };
        renormalized.push((identity, entry.key, normalizer.renormalize(centroid)?));
    }

    for (identity, key, center) in renormalized {
        algo.set_center(key, FeatureDict::from_values(&center));
        mirrors.set_centroid(identity, center)?;
    }
    Ok(())
}

macro_rules! centroid_binding {
    (
        $(#[$doc:meta])*
        $binding:ident, $alias:ident, $label:literal $(, renormalize = $renormalize:ident)?
    ) => {
        $(#[$doc])*
        pub struct $binding<A> {
            algo: A,
        }

        impl<A: CentroidClusterer> $binding<A> {
            pub const TYPE: &'static str = $label;

            pub fn new(algo: A) -> Self {
                Self { algo }
            }
        }

        impl<A: CentroidClusterer> ClusterBinding for $binding<A> {
            type Algorithm = A;

            fn wrapper_type(&self) -> &'static str {
                Self::TYPE
            }

            fn properties(&self) -> &'static [ClusterProperty] {
                CENTROID_AND_SIZE
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
                mirrors.sync(&center_views(&self.algo))
            }

            fn refresh_clusters(
                &mut self,
                mirrors: &mut ClusterMirrors,
                input: &FeatureDict,
            ) -> WrapperResult<()> {
                refresh_centers(&mut self.algo, mirrors, input)
            }

            $(
                fn renormalize(
                    &mut self,
                    mirrors: &mut ClusterMirrors,
                    normalizer: &dyn Normalizer,
                ) -> WrapperResult<()> {
                    $renormalize(&mut self.algo, mirrors, normalizer)
                }
            )?
        }

        pub type $alias<A> = ClusterAnalyzerRiver<$binding<A>>;

        impl<A: CentroidClusterer> ClusterAnalyzerRiver<$binding<A>> {
            /// Wrap an instantiated algorithm.
            pub fn from_algorithm(algo: A, config: AnalyzerConfig) -> Self {
                Self::new($binding::new(algo), config)
            }
        }
    };
}

centroid_binding!(
    /// Binding for River's `cluster.KMeans`.
    KMeansBinding,
    WrRiverKMeans,
    "River Cluster Analyzer KMeans",
    renormalize = renormalize_centers
);

centroid_binding!(
    /// Binding for River's `cluster.STREAMKMeans`.
    StreamKMeansBinding,
    WrRiverStreamKMeans,
    "River Cluster Analyzer StreamKMeans",
    renormalize = renormalize_centers
);

// CluStream keeps the default renormalize: its micro clusters hold sums that
// cannot be remapped from the macro centers alone.
centroid_binding!(
    /// Binding for River's `cluster.CluStream`. Mirrors follow the macro
    /// clusters.
    CluStreamBinding,
    WrRiverCluStream,
    "River Cluster Analyzer CluStream"
);

// ── Parameterized construction ──────────────────────────────────────────

impl<A> ClusterAnalyzerRiver<KMeansBinding<A>>
where
    A: CentroidClusterer + FromParams<KMeansParams>,
{
    /// Validate `params` and build the algorithm from them.
    pub fn with_params(params: &KMeansParams, config: AnalyzerConfig) -> WrapperResult<Self> {
        params.validate()?;
        Ok(Self::from_algorithm(A::from_params(params), config))
    }
}

impl<A> ClusterAnalyzerRiver<StreamKMeansBinding<A>>
where
    A: CentroidClusterer + FromParams<StreamKMeansParams>,
{
    pub fn with_params(
        params: &StreamKMeansParams,
        config: AnalyzerConfig,
    ) -> WrapperResult<Self> {
        params.validate()?;
        Ok(Self::from_algorithm(A::from_params(params), config))
    }
}

impl<A> ClusterAnalyzerRiver<CluStreamBinding<A>>
where
    A: CentroidClusterer + FromParams<CluStreamParams>,
{
    pub fn with_params(params: &CluStreamParams, config: AnalyzerConfig) -> WrapperResult<Self> {
        params.validate()?;
        Ok(Self::from_algorithm(A::from_params(params), config))
    }
}
