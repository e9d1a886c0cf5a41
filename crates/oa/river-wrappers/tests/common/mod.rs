//! Test doubles implementing the algorithm traits.

#![allow(dead_code)]

use std::collections::BTreeMap;

use oa_river_wrappers::algo::{KMeansParams, StreamKMeansParams};
use oa_river_wrappers::{
    AnomalyScorer, CentroidClusterer, Clusterer, DbStreamClusterer, DriftDetector, FeatureDict,
    FromParams, MicroClusterView,
};
use oa_types::{FeatureData, Instance, InstanceId, LogLevel};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub fn instance(id: u64, values: &[f64]) -> Instance {
    Instance::new(InstanceId(id), FeatureData::from_values(values.to_vec()))
}

pub fn quiet_analyzer() -> oa_river_wrappers::AnalyzerConfig {
    oa_river_wrappers::AnalyzerConfig {
        logging: LogLevel::Nothing,
        ..Default::default()
    }
}

pub fn quiet_detector(buffer: usize, step: usize) -> oa_river_wrappers::DetectorConfig {
    oa_river_wrappers::DetectorConfig {
        logging: LogLevel::Nothing,
        instance_buffer_size: buffer,
        detection_steprate: step,
        ..Default::default()
    }
}

// ── Online KMeans ───────────────────────────────────────────────────────

/// Sequential KMeans: the closest center moves towards each learned sample
/// by `halflife`. Centers start uniformly in `[mu - sigma, mu + sigma]`.
pub struct OnlineKMeans {
    n_clusters: usize,
    halflife: f64,
    mu: f64,
    sigma: f64,
    p: f64,
    rng: StdRng,
    centers: Vec<Vec<f64>>,
}

impl OnlineKMeans {
    pub fn new(n_clusters: usize, halflife: f64, mu: f64, sigma: f64, p: u32, seed: u64) -> Self {
        Self {
            n_clusters,
            halflife,
            mu,
            sigma,
            p: f64::from(p),
            rng: StdRng::seed_from_u64(seed),
            centers: Vec::new(),
        }
    }

    fn ensure_centers(&mut self, dim: usize) {
        if !self.centers.is_empty() {
            return;
        }
        let (lo, hi) = (self.mu - self.sigma, self.mu + self.sigma);
        let mut centers = Vec::with_capacity(self.n_clusters);
        for _ in 0..self.n_clusters {
            let center: Vec<f64> = (0..dim).map(|_| self.rng.gen_range(lo..=hi)).collect();
            centers.push(center);
        }
        self.centers = centers;
    }

    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        a.iter()
            .zip(b)
            .map(|(x, y)| (x - y).abs().powf(self.p))
            .sum::<f64>()
            .powf(1.0 / self.p)
    }

    /// Index of the center nearest to `x`.
    pub fn closest(&self, x: &[f64]) -> usize {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (i, center) in self.centers.iter().enumerate() {
            let d = self.distance(center, x);
            if d < best_dist {
                best = i;
                best_dist = d;
            }
        }
        best
    }

    pub fn raw_centers(&self) -> &[Vec<f64>] {
        &self.centers
    }
}

impl Clusterer for OnlineKMeans {
    fn learn_one(&mut self, x: &FeatureDict) {
        let x = x.values();
        self.ensure_centers(x.len());
        let k = self.closest(&x);
        let halflife = self.halflife;
        for (c, v) in self.centers[k].iter_mut().zip(&x) {
            *c += halflife * (v - *c);
        }
    }

    fn predict_one(&mut self, x: &FeatureDict) -> usize {
        let x = x.values();
        self.ensure_centers(x.len());
        self.closest(&x)
    }
}

impl CentroidClusterer for OnlineKMeans {
    fn centers(&self) -> BTreeMap<usize, FeatureDict> {
        self.centers
            .iter()
            .enumerate()
            .map(|(i, c)| (i, FeatureDict::from_values(c)))
            .collect()
    }

    fn set_center(&mut self, key: usize, center: FeatureDict) {
        if let Some(slot) = self.centers.get_mut(key) {
            *slot = center.values();
        }
    }
}

impl FromParams<KMeansParams> for OnlineKMeans {
    fn from_params(params: &KMeansParams) -> Self {
        Self::new(
            params.n_clusters,
            params.halflife,
            params.mu,
            params.sigma,
            params.p,
            params.seed.unwrap_or(0),
        )
    }
}

impl FromParams<StreamKMeansParams> for OnlineKMeans {
    fn from_params(params: &StreamKMeansParams) -> Self {
        Self::new(
            params.n_clusters,
            params.halflife,
            params.mu,
            params.sigma,
            params.p,
            params.seed.unwrap_or(0),
        )
    }
}

// ── Churning micro clusters ─────────────────────────────────────────────

/// Micro clusters that are randomly created, moved and dropped on every
/// learned sample. Keys are positions, so they shift after removals.
pub struct ChurnClusterer {
    rng: StdRng,
    next_identity: u64,
    micro: Vec<(u64, Vec<f64>)>,
}

impl ChurnClusterer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            next_identity: 1,
            micro: Vec::new(),
        }
    }
}

impl Clusterer for ChurnClusterer {
    fn learn_one(&mut self, x: &FeatureDict) {
        let x = x.values();
        match self.rng.gen_range(0..3) {
            0 if !self.micro.is_empty() => {
                let victim = self.rng.gen_range(0..self.micro.len());
                self.micro.remove(victim);
            }
            1 if !self.micro.is_empty() => {
                let moved = self.rng.gen_range(0..self.micro.len());
                self.micro[moved].1 = x;
            }
            _ => {
                self.micro.push((self.next_identity, x));
                self.next_identity += 1;
            }
        }
    }

    fn predict_one(&mut self, _x: &FeatureDict) -> usize {
        0
    }
}

impl DbStreamClusterer for ChurnClusterer {
    fn micro_clusters(&self) -> Vec<MicroClusterView> {
        self.micro
            .iter()
            .enumerate()
            .map(|(key, (identity, center))| MicroClusterView {
                identity: *identity,
                key,
                center: center.clone(),
            })
            .collect()
    }

    /// One macro cluster holding every micro cluster.
    fn macro_cluster_members(&self, cluster: usize) -> Vec<u64> {
        if cluster == 0 {
            self.micro.iter().map(|(identity, _)| *identity).collect()
        } else {
            Vec::new()
        }
    }
}

// ── Detector doubles ────────────────────────────────────────────────────

/// Replays scores in order, cycling.
pub struct ScriptedScorer {
    scores: Vec<f64>,
    pub scored: usize,
    pub learned: usize,
}

impl ScriptedScorer {
    pub fn new(scores: Vec<f64>) -> Self {
        Self {
            scores,
            scored: 0,
            learned: 0,
        }
    }
}

impl AnomalyScorer for ScriptedScorer {
    fn score_one(&mut self, _x: &FeatureDict) -> f64 {
        let score = self.scores[self.scored % self.scores.len()];
        self.scored += 1;
        score
    }

    fn learn_one(&mut self, _x: &FeatureDict) {
        self.learned += 1;
    }
}

/// Reports drift flags in order, one per update.
pub struct ScriptedDrift {
    flags: Vec<bool>,
    pub values: Vec<f64>,
    current: bool,
}

impl ScriptedDrift {
    pub fn new(flags: Vec<bool>) -> Self {
        Self {
            flags,
            values: Vec::new(),
            current: false,
        }
    }
}

impl DriftDetector for ScriptedDrift {
    fn update(&mut self, value: f64) {
        self.current = self.flags.get(self.values.len()).copied().unwrap_or(false);
        self.values.push(value);
    }

    fn drift_detected(&self) -> bool {
        self.current
    }
}
