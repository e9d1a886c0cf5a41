//! Drift detection with a River univariate drift detector.
//!
//! The wrapper feeds one selected feature of each instance into the
//! detector's `update` and raises a drift whenever the detector reports one
//! right after the update. It keeps no drift state of its own.

use std::collections::VecDeque;

use oa_types::{ChangeEvent, DriftSignal, EventHandler, EventKind, Instance, StreamTask};
use tracing::{debug, info, warn};

use crate::algo::DriftDetector;
use crate::buffer::InstanceBuffer;
use crate::config::{DetectorConfig, FeatureSelector};
use crate::error::{WrapperError, WrapperResult};
use crate::wrapper::{short_type_name, Wrapper};

/// Drift detector task backed by a River drift detector.
pub struct DriftDetectorRiver<D: DriftDetector> {
    task: StreamTask,
    algo: D,
    feature: FeatureSelector,
    buffer: InstanceBuffer,
    drifts: VecDeque<DriftSignal>,
    drift_buffer_size: usize,
}

impl<D: DriftDetector> DriftDetectorRiver<D> {
    pub const TYPE: &'static str = "Drift Detector (river)";

    /// Wrap an instantiated drift detector monitoring `feature`.
    ///
    /// Fails unless `1 <= detection_steprate <= instance_buffer_size`.
    pub fn new(algo: D, config: DetectorConfig, feature: FeatureSelector) -> WrapperResult<Self> {
        config.validate()?;
        let buffer = InstanceBuffer::new(config.instance_buffer_size, config.detection_steprate)?;
        let name = config.name.unwrap_or_else(short_type_name::<D>);
        let task = StreamTask::new(name, true, config.visualize, config.logging);

        Ok(Self {
            task,
            algo,
            feature,
            buffer,
            drifts: VecDeque::with_capacity(config.event_buffer_size),
            drift_buffer_size: config.event_buffer_size,
        })
    }

    /// Deliver one instance. Returns the drifts raised by this call.
    ///
    /// An instance lacking the monitored feature is skipped and the rest of
    /// the run still reaches the detector; the first such error is returned
    /// once the run is complete. Drifts raised in a failing run are still
    /// recorded and published to handlers.
    pub fn process(&mut self, instance: &Instance) -> WrapperResult<Vec<DriftSignal>> {
        if !self.buffer.push(instance.clone()) {
            return Ok(Vec::new());
        }
        self.run_detection()
    }

    /// Run detection on buffered instances that have not been fed yet.
    pub fn flush(&mut self) -> WrapperResult<Vec<DriftSignal>> {
        if self.buffer.pending() == 0 {
            return Ok(Vec::new());
        }
        self.run_detection()
    }

    fn run_detection(&mut self) -> WrapperResult<Vec<DriftSignal>> {
        let mut raised = Vec::new();
        let mut first_error = None;
        for instance in self.buffer.drain_pending() {
            match self.detect(&instance) {
                Ok(Some(drift)) => raised.push(drift),
                Ok(None) => {}
                Err(e) => {
                    if self.task.logging().logs_warnings() {
                        warn!(
                            task = %self.task.name(),
                            instance = %instance.id,
                            error = %e,
                            "instance skipped"
                        );
                    }
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(raised),
        }
    }

    fn detect(&mut self, instance: &Instance) -> WrapperResult<Option<DriftSignal>> {
        let value = self.monitored_value(instance)?;
        self.algo.update(value);

        if self.task.logging().logs_info() {
            debug!(task = %self.task.name(), instance = %instance.id, value, "detector updated");
        }

        if !self.algo.drift_detected() {
            return Ok(None);
        }

        let drift = DriftSignal::new(instance, self.task.name(), self.task.visualization());
        if self.task.logging().logs_info() {
            info!(task = %self.task.name(), instance = %instance.id, value, "drift raised");
        }
        if self.drifts.len() == self.drift_buffer_size {
            self.drifts.pop_front();
        }
        self.drifts.push_back(drift.clone());
        self.task.raise_event(&ChangeEvent::Drift(drift.clone()));
        Ok(Some(drift))
    }

    fn monitored_value(&self, instance: &Instance) -> WrapperResult<f64> {
        let data = instance.feature_data();
        let value = match &self.feature.id {
            Some(id) => data.value(id),
            None => data.get(self.feature.index),
        };
        value.ok_or_else(|| {
            WrapperError::FeatureNotFound(format!("{} in instance {}", self.feature, instance.id))
        })
    }

    pub fn register_event_handler(&mut self, handler: EventHandler) {
        self.task.register_event_handler(EventKind::Drift, handler);
    }

    /// Most recently raised drifts, oldest first.
    pub fn drifts(&self) -> impl Iterator<Item = &DriftSignal> + '_ {
        self.drifts.iter()
    }

    pub fn feature(&self) -> &FeatureSelector {
        &self.feature
    }

    pub fn get_algorithm(&self) -> &D {
        &self.algo
    }

    pub fn get_algorithm_mut(&mut self) -> &mut D {
        &mut self.algo
    }

    pub fn buffer(&self) -> &InstanceBuffer {
        &self.buffer
    }

    pub fn task(&self) -> &StreamTask {
        &self.task
    }
}

impl<D: DriftDetector> Wrapper for DriftDetectorRiver<D> {
    fn wrapper_type(&self) -> &'static str {
        Self::TYPE
    }

    fn task_name(&self) -> &str {
        self.task.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oa_types::{DimId, FeatureData, InstanceId, LogLevel};

    /// Flags a drift whenever the value exceeds a level.
    struct LevelDetector {
        level: f64,
        seen: Vec<f64>,
        flag: bool,
    }

    impl LevelDetector {
        fn new(level: f64) -> Self {
            Self {
                level,
                seen: Vec::new(),
                flag: false,
            }
        }
    }

    impl DriftDetector for LevelDetector {
        fn update(&mut self, value: f64) {
            self.seen.push(value);
            self.flag = value > self.level;
        }

        fn drift_detected(&self) -> bool {
            self.flag
        }
    }

    fn inst(id: u64, values: Vec<f64>) -> Instance {
        let dims = vec![DimId::new("a"), DimId::new("b")];
        Instance::new(InstanceId(id), FeatureData::new(dims, values).unwrap())
    }

    fn quiet() -> DetectorConfig {
        DetectorConfig {
            logging: LogLevel::Nothing,
            ..DetectorConfig::default()
        }
    }

    #[test]
    fn index_selects_monitored_value() {
        let mut det =
            DriftDetectorRiver::new(LevelDetector::new(10.0), quiet(), FeatureSelector::by_index(1))
                .unwrap();
        det.process(&inst(1, vec![1.0, 2.0])).unwrap();
        assert_eq!(det.get_algorithm().seen, vec![2.0]);
    }

    #[test]
    fn id_takes_precedence_over_index() {
        let selector = FeatureSelector {
            index: 1,
            id: Some("a".into()),
        };
        let mut det = DriftDetectorRiver::new(LevelDetector::new(10.0), quiet(), selector).unwrap();
        det.process(&inst(1, vec![7.0, 2.0])).unwrap();
        assert_eq!(det.get_algorithm().seen, vec![7.0]);
    }

    #[test]
    fn drift_raised_only_when_flag_set() {
        let mut det =
            DriftDetectorRiver::new(LevelDetector::new(5.0), quiet(), FeatureSelector::default())
                .unwrap();
        let counts: Vec<usize> = [1.0, 2.0, 9.0, 3.0]
            .iter()
            .enumerate()
            .map(|(i, &v)| det.process(&inst(i as u64, vec![v, 0.0])).unwrap().len())
            .collect();
        assert_eq!(counts, vec![0, 0, 1, 0]);

        let drift = det.drifts().next().unwrap();
        assert_eq!(drift.instances, vec![InstanceId(2)]);
        assert!(drift.status);
        assert_eq!(drift.raised_by, "LevelDetector");
    }

    #[test]
    fn missing_feature_is_an_error() {
        let mut det =
            DriftDetectorRiver::new(LevelDetector::new(5.0), quiet(), FeatureSelector::by_id("zz"))
                .unwrap();
        let err = det.process(&inst(1, vec![1.0, 2.0])).unwrap_err();
        assert!(matches!(err, WrapperError::FeatureNotFound(_)));

        let mut det =
            DriftDetectorRiver::new(LevelDetector::new(5.0), quiet(), FeatureSelector::by_index(4))
                .unwrap();
        assert!(det.process(&inst(1, vec![1.0, 2.0])).is_err());
    }

    #[test]
    fn failing_instance_does_not_drop_the_rest_of_the_run() {
        let config = DetectorConfig {
            instance_buffer_size: 3,
            detection_steprate: 3,
            ..quiet()
        };
        let mut det =
            DriftDetectorRiver::new(LevelDetector::new(5.0), config, FeatureSelector::by_id("b"))
                .unwrap();
        let without_b = Instance::new(
            InstanceId(2),
            FeatureData::new(vec![DimId::new("a")], vec![9.0]).unwrap(),
        );

        assert!(det.process(&inst(1, vec![0.0, 1.0])).unwrap().is_empty());
        assert!(det.process(&without_b).unwrap().is_empty());
        let err = det.process(&inst(3, vec![0.0, 7.0])).unwrap_err();
        assert!(matches!(err, WrapperError::FeatureNotFound(_)));

        assert_eq!(det.get_algorithm().seen, vec![1.0, 7.0]);
        let drifted: Vec<_> = det.drifts().map(|d| d.instances[0]).collect();
        assert_eq!(drifted, vec![InstanceId(3)]);
        assert_eq!(det.buffer().pending(), 0);
        assert!(det.flush().unwrap().is_empty());
        assert_eq!(det.get_algorithm().seen, vec![1.0, 7.0]);
    }

    #[test]
    fn invalid_steprate_is_rejected() {
        let config = DetectorConfig {
            instance_buffer_size: 3,
            detection_steprate: 4,
            ..quiet()
        };
        let result =
            DriftDetectorRiver::new(LevelDetector::new(5.0), config, FeatureSelector::default());
        assert!(matches!(result, Err(WrapperError::InvalidParameter { .. })));
    }
}
