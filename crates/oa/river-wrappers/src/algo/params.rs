//! Parameter sets of the wrapped clustering algorithms.
//!
//! Defaults follow the River documentation of each algorithm. `validate()`
//! rejects values outside the documented domains before an algorithm is built.

use serde::{Deserialize, Serialize};

use crate::error::{WrapperError, WrapperResult};

fn positive(name: &str, value: f64) -> WrapperResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(WrapperError::invalid(name, format!("must be > 0, got {}", value)))
    }
}

fn at_least_one(name: &str, value: u64) -> WrapperResult<()> {
    if value >= 1 {
        Ok(())
    } else {
        Err(WrapperError::invalid(name, "must be >= 1"))
    }
}

// ── KMeans ──────────────────────────────────────────────────────────────

/// Incremental KMeans.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeansParams {
    /// Maximum number of clusters.
    pub n_clusters: usize,
    /// Amount by which centers move towards new samples.
    pub halflife: f64,
    /// Mean of the normal distribution used to place initial centers.
    pub mu: f64,
    /// Standard deviation used to place initial centers.
    pub sigma: f64,
    /// Minkowski power (1 = Manhattan, 2 = Euclidean).
    pub p: u32,
    pub seed: Option<u64>,
}

impl Default for KMeansParams {
    fn default() -> Self {
        Self {
            n_clusters: 5,
            halflife: 0.5,
            mu: 0.0,
            sigma: 1.0,
            p: 2,
            seed: None,
        }
    }
}

impl KMeansParams {
    pub fn validate(&self) -> WrapperResult<()> {
        at_least_one("n_clusters", self.n_clusters as u64)?;
        positive("halflife", self.halflife)?;
        positive("sigma", self.sigma)?;
        at_least_one("p", u64::from(self.p))
    }
}

// ── StreamKMeans ────────────────────────────────────────────────────────

/// KMeans over chunks of the stream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamKMeansParams {
    /// Samples collected before a chunk is clustered.
    pub chunk_size: usize,
    pub n_clusters: usize,
    pub halflife: f64,
    pub mu: f64,
    pub sigma: f64,
    pub p: u32,
    pub seed: Option<u64>,
}

impl Default for StreamKMeansParams {
    fn default() -> Self {
        Self {
            chunk_size: 10,
            n_clusters: 2,
            halflife: 0.5,
            mu: 0.0,
            sigma: 1.0,
            p: 2,
            seed: None,
        }
    }
}

impl StreamKMeansParams {
    pub fn validate(&self) -> WrapperResult<()> {
        at_least_one("chunk_size", self.chunk_size as u64)?;
        at_least_one("n_clusters", self.n_clusters as u64)?;
        positive("halflife", self.halflife)?;
        positive("sigma", self.sigma)?;
        at_least_one("p", u64::from(self.p))
    }
}

// ── CluStream ───────────────────────────────────────────────────────────

/// CluStream micro/macro clustering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CluStreamParams {
    /// Number of macro clusters (k of the offline k-means).
    pub n_macro_clusters: usize,
    pub max_micro_clusters: usize,
    /// Multiplier of the RMS deviation bounding a micro cluster.
    pub micro_cluster_r_factor: f64,
    /// Only data within `(T - time_window, T)` is considered.
    pub time_window: u64,
    /// Macro clusters are recomputed every `time_gap` samples.
    pub time_gap: u64,
    pub seed: Option<u64>,
    pub halflife: f64,
    pub mu: f64,
    pub sigma: f64,
    pub p: u32,
}

impl Default for CluStreamParams {
    fn default() -> Self {
        Self {
            n_macro_clusters: 5,
            max_micro_clusters: 100,
            micro_cluster_r_factor: 2.0,
            time_window: 1000,
            time_gap: 100,
            seed: None,
            halflife: 0.5,
            mu: 1.0,
            sigma: 1.0,
            p: 2,
        }
    }
}

impl CluStreamParams {
    pub fn validate(&self) -> WrapperResult<()> {
        at_least_one("n_macro_clusters", self.n_macro_clusters as u64)?;
        if self.max_micro_clusters < self.n_macro_clusters {
            return Err(WrapperError::invalid(
                "max_micro_clusters",
                format!(
                    "must be >= n_macro_clusters ({}), got {}",
                    self.n_macro_clusters, self.max_micro_clusters
                ),
            ));
        }
        positive("micro_cluster_r_factor", self.micro_cluster_r_factor)?;
        at_least_one("time_window", self.time_window)?;
        at_least_one("time_gap", self.time_gap)?;
        positive("halflife", self.halflife)?;
        positive("sigma", self.sigma)?;
        at_least_one("p", u64::from(self.p))
    }
}

// ── DBSTREAM ────────────────────────────────────────────────────────────

/// DBSTREAM shared-density clustering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbStreamParams {
    /// Radius around a micro cluster's leader.
    pub clustering_threshold: f64,
    /// Weight decay of historical data; must not be 0.
    pub fading_factor: f64,
    /// Time between two cleanup passes.
    pub cleanup_interval: f64,
    /// Overlap ratio deciding whether a micro cluster or shared density is weak.
    pub intersection_factor: f64,
    /// Minimum weight of a non-noise cluster.
    pub minimum_weight: f64,
}

impl Default for DbStreamParams {
    fn default() -> Self {
        Self {
            clustering_threshold: 1.0,
            fading_factor: 0.01,
            cleanup_interval: 2.0,
            intersection_factor: 0.3,
            minimum_weight: 1.0,
        }
    }
}

impl DbStreamParams {
    pub fn validate(&self) -> WrapperResult<()> {
        positive("clustering_threshold", self.clustering_threshold)?;
        positive("fading_factor", self.fading_factor)?;
        positive("cleanup_interval", self.cleanup_interval)?;
        positive("intersection_factor", self.intersection_factor)?;
        if self.minimum_weight < 0.0 {
            return Err(WrapperError::invalid("minimum_weight", "must be >= 0"));
        }
        Ok(())
    }
}

// ── DenStream ───────────────────────────────────────────────────────────

/// DenStream density clustering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DenStreamParams {
    /// Weight decay of historical data; must not be 0.
    pub decaying_factor: f64,
    /// Outlier threshold relative to core micro clusters, in `(0, 1)`.
    pub beta: f64,
    /// Core weight threshold; `beta * mu` must exceed 1.
    pub mu: f64,
    /// Radius of the epsilon neighborhood.
    pub epsilon: f64,
    /// Samples used to initialize the online phase.
    pub n_samples_init: usize,
    /// Samples arriving per time unit.
    pub stream_speed: usize,
}

impl Default for DenStreamParams {
    fn default() -> Self {
        Self {
            decaying_factor: 0.25,
            beta: 0.75,
            mu: 2.0,
            epsilon: 0.02,
            n_samples_init: 1000,
            stream_speed: 100,
        }
    }
}

impl DenStreamParams {
    pub fn validate(&self) -> WrapperResult<()> {
        positive("decaying_factor", self.decaying_factor)?;
        if !(self.beta > 0.0 && self.beta < 1.0) {
            return Err(WrapperError::invalid(
                "beta",
                format!("must be within (0, 1), got {}", self.beta),
            ));
        }
        if self.beta * self.mu <= 1.0 {
            return Err(WrapperError::invalid(
                "mu",
                format!("beta * mu must be > 1, got {}", self.beta * self.mu),
            ));
        }
        positive("epsilon", self.epsilon)?;
        at_least_one("n_samples_init", self.n_samples_init as u64)?;
        at_least_one("stream_speed", self.stream_speed as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(KMeansParams::default().validate().is_ok());
        assert!(StreamKMeansParams::default().validate().is_ok());
        assert!(CluStreamParams::default().validate().is_ok());
        assert!(DbStreamParams::default().validate().is_ok());
        assert!(DenStreamParams::default().validate().is_ok());
    }

    #[test]
    fn kmeans_rejects_zero_clusters() {
        let params = KMeansParams {
            n_clusters: 0,
            ..KMeansParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(WrapperError::InvalidParameter { ref name, .. }) if name == "n_clusters"
        ));
    }

    #[test]
    fn dbstream_rejects_zero_fading_factor() {
        let params = DbStreamParams {
            fading_factor: 0.0,
            ..DbStreamParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn denstream_requires_beta_mu_above_one() {
        let params = DenStreamParams {
            beta: 0.5,
            mu: 2.0,
            ..DenStreamParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(WrapperError::InvalidParameter { ref name, .. }) if name == "mu"
        ));

        let params = DenStreamParams {
            beta: 1.0,
            ..DenStreamParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn clustream_micro_clusters_cover_macro_clusters() {
        let params = CluStreamParams {
            n_macro_clusters: 10,
            max_micro_clusters: 5,
            ..CluStreamParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let params: CluStreamParams =
            serde_json::from_str(r#"{ "n_macro_clusters": 3, "seed": 42 }"#).unwrap();
        assert_eq!(params.n_macro_clusters, 3);
        assert_eq!(params.seed, Some(42));
        assert_eq!(params.time_window, 1000);
        assert_eq!(params.mu, 1.0);
    }
}
