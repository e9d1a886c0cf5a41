//! Point anomaly detection with a River anomaly scorer.
//!
//! Every delivered instance is buffered; when a detection run is due, each
//! pending instance is scored, an anomaly is raised when the score exceeds
//! `ANOMALY_SCORE_THRESHOLD`, and the instance is learned afterwards
//! regardless of the outcome.

use std::collections::VecDeque;

use oa_types::{ChangeEvent, EventHandler, EventKind, Instance, PointAnomaly, StreamTask};
use tracing::{debug, info};

use crate::algo::{AnomalyScorer, FeatureDict};
use crate::buffer::InstanceBuffer;
use crate::config::DetectorConfig;
use crate::error::WrapperResult;
use crate::wrapper::{short_type_name, Wrapper};

/// Scores strictly above this raise a point anomaly.
pub const ANOMALY_SCORE_THRESHOLD: f64 = 0.8;

/// Anomaly detector task backed by a River anomaly scorer.
pub struct AnomalyDetectorRiver<A: AnomalyScorer> {
    task: StreamTask,
    algo: A,
    buffer: InstanceBuffer,
    anomalies: VecDeque<PointAnomaly>,
    anomaly_buffer_size: usize,
}

impl<A: AnomalyScorer> AnomalyDetectorRiver<A> {
    pub const TYPE: &'static str = "Anomaly Detector (river)";

    /// Wrap an instantiated scorer.
    ///
    /// Fails unless `1 <= detection_steprate <= instance_buffer_size`.
    pub fn new(algo: A, config: DetectorConfig) -> WrapperResult<Self> {
        config.validate()?;
        let buffer = InstanceBuffer::new(config.instance_buffer_size, config.detection_steprate)?;
        let name = config.name.unwrap_or_else(short_type_name::<A>);
        let task = StreamTask::new(name, true, config.visualize, config.logging);

        Ok(Self {
            task,
            algo,
            buffer,
            anomalies: VecDeque::with_capacity(config.event_buffer_size),
            anomaly_buffer_size: config.event_buffer_size,
        })
    }

    /// Deliver one instance. Returns the anomalies raised by this call.
    pub fn process(&mut self, instance: &Instance) -> WrapperResult<Vec<PointAnomaly>> {
        if !self.buffer.push(instance.clone()) {
            return Ok(Vec::new());
        }
        Ok(self.run_detection())
    }

    /// Run detection on buffered instances that have not been scored yet.
    pub fn flush(&mut self) -> Vec<PointAnomaly> {
        if self.buffer.pending() == 0 {
            return Vec::new();
        }
        self.run_detection()
    }

    fn run_detection(&mut self) -> Vec<PointAnomaly> {
        let pending = self.buffer.drain_pending();
        pending
            .iter()
            .filter_map(|instance| self.detect(instance))
            .collect()
    }

    fn detect(&mut self, instance: &Instance) -> Option<PointAnomaly> {
        let x = FeatureDict::from_named(instance.feature_data());
        let score = self.algo.score_one(&x);

        if self.task.logging().logs_info() {
            debug!(task = %self.task.name(), instance = %instance.id, score, "instance scored");
        }

        let raised = if score > ANOMALY_SCORE_THRESHOLD {
            let anomaly = PointAnomaly::new(instance, self.task.name(), self.task.visualization());
            self.raise_anomaly(anomaly.clone(), score);
            Some(anomaly)
        } else {
            None
        };

        self.algo.learn_one(&x);
        raised
    }

    fn raise_anomaly(&mut self, anomaly: PointAnomaly, score: f64) {
        if self.task.logging().logs_info() {
            info!(
                task = %self.task.name(),
                instance = %anomaly.instances[0],
                score,
                "point anomaly raised"
            );
        }
        if self.anomalies.len() == self.anomaly_buffer_size {
            self.anomalies.pop_front();
        }
        self.anomalies.push_back(anomaly.clone());
        self.task.raise_event(&ChangeEvent::Anomaly(anomaly));
    }

    pub fn register_event_handler(&mut self, handler: EventHandler) {
        self.task.register_event_handler(EventKind::Anomaly, handler);
    }

    /// Most recently raised anomalies, oldest first.
    pub fn anomalies(&self) -> impl Iterator<Item = &PointAnomaly> + '_ {
        self.anomalies.iter()
    }

    pub fn get_algorithm(&self) -> &A {
        &self.algo
    }

    pub fn get_algorithm_mut(&mut self) -> &mut A {
        &mut self.algo
    }

    pub fn buffer(&self) -> &InstanceBuffer {
        &self.buffer
    }

    pub fn task(&self) -> &StreamTask {
        &self.task
    }
}

impl<A: AnomalyScorer> Wrapper for AnomalyDetectorRiver<A> {
    fn wrapper_type(&self) -> &'static str {
        Self::TYPE
    }

    fn task_name(&self) -> &str {
        self.task.name()
    }
}
