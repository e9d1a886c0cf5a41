//! Bounded instance buffer with step-rate triggered detection.
//!
//! Detectors push every delivered instance into an `InstanceBuffer`. Every
//! `step_rate` pushes a detection run is due, covering the instances pushed
//! since the previous run. Since `step_rate <= capacity`, those instances are
//! always still held by the buffer. When full, the oldest instance is
//! silently overwritten.

use oa_types::Instance;

use crate::error::{WrapperError, WrapperResult};

/// Check `1 <= detection_steprate <= instance_buffer_size`.
pub fn validate_steprate(
    instance_buffer_size: usize,
    detection_steprate: usize,
) -> WrapperResult<()> {
    if detection_steprate < 1 || detection_steprate > instance_buffer_size {
        return Err(WrapperError::invalid(
            "detection_steprate",
            format!(
                "must be >= 1 and <= instance_buffer_size ({}), got {}",
                instance_buffer_size, detection_steprate
            ),
        ));
    }
    Ok(())
}

/// Circular buffer of recently delivered instances.
#[derive(Clone, Debug)]
pub struct InstanceBuffer {
    slots: Vec<Option<Instance>>,
    head: usize,
    len: usize,
    step_rate: usize,
    pending: usize,
    total_pushed: u64,
}

impl InstanceBuffer {
    pub fn new(capacity: usize, step_rate: usize) -> WrapperResult<Self> {
        validate_steprate(capacity, step_rate)?;
        Ok(Self {
            slots: vec![None; capacity],
            head: 0,
            len: 0,
            step_rate,
            pending: 0,
            total_pushed: 0,
        })
    }

    /// Store an instance. Returns `true` when a detection run is due.
    ///
    /// Pending instances that get overwritten before a drain are dropped.
    pub fn push(&mut self, instance: Instance) -> bool {
        self.slots[self.head] = Some(instance);
        self.head = (self.head + 1) % self.slots.len();
        if self.len < self.slots.len() {
            self.len += 1;
        }
        if self.pending < self.slots.len() {
            self.pending += 1;
        }
        self.total_pushed += 1;
        self.pending >= self.step_rate
    }

    /// Take the instances pushed since the last run, oldest first.
    pub fn drain_pending(&mut self) -> Vec<Instance> {
        let cap = self.slots.len();
        let start = (self.head + cap - self.pending) % cap;
        let drained = (0..self.pending)
            .filter_map(|i| self.slots[(start + i) % cap].clone())
            .collect();
        self.pending = 0;
        drained
    }

    /// Iterate held instances, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Instance> + '_ {
        let cap = self.slots.len();
        let start = if self.len < cap { 0 } else { self.head };
        (0..self.len).filter_map(move |i| self.slots[(start + i) % cap].as_ref())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn step_rate(&self) -> usize {
        self.step_rate
    }

    /// Instances waiting for the next detection run.
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn total_pushed(&self) -> u64 {
        self.total_pushed
    }

    /// Detection runs over whole, non-overlapping buffer fills.
    pub fn block_mode(&self) -> bool {
        self.step_rate == self.slots.len()
    }
}
