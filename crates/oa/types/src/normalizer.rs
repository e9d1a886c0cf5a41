//! Renormalization of task-internal values after upstream normalization changes.
//!
//! When a normalizer earlier in a workflow updates its parameters, values a
//! task stored in normalized form (e.g. cluster centroids) become stale. A
//! `Normalizer` maps such values from the previous normalization to the
//! current one.

use serde::{Deserialize, Serialize};

use crate::error::{TypesError, TypesResult};

/// Maps values normalized with previous parameters onto current parameters.
pub trait Normalizer {
    fn renormalize(&self, values: &[f64]) -> TypesResult<Vec<f64>>;
}

/// Closed value range of one dimension.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn span(&self, dim: usize) -> TypesResult<f64> {
        let span = self.max - self.min;
        if span.abs() < f64::EPSILON {
            return Err(TypesError::InvalidBounds {
                dim,
                detail: format!("min {} equals max {}", self.min, self.max),
            });
        }
        Ok(span)
    }
}

/// Min-max normalization onto `[-1, 1]` with a parameter change.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MinMaxRenormalizer {
    previous: Vec<Bounds>,
    current: Vec<Bounds>,
}

impl MinMaxRenormalizer {
    pub fn new(previous: Vec<Bounds>, current: Vec<Bounds>) -> TypesResult<Self> {
        if previous.len() != current.len() {
            return Err(TypesError::DimensionMismatch {
                expected: previous.len(),
                actual: current.len(),
            });
        }
        for (dim, (prev, curr)) in previous.iter().zip(current.iter()).enumerate() {
            prev.span(dim)?;
            curr.span(dim)?;
        }
        Ok(Self { previous, current })
    }

    pub fn num_dim(&self) -> usize {
        self.previous.len()
    }
}

impl Normalizer for MinMaxRenormalizer {
    fn renormalize(&self, values: &[f64]) -> TypesResult<Vec<f64>> {
        if values.len() != self.previous.len() {
            return Err(TypesError::DimensionMismatch {
                expected: self.previous.len(),
                actual: values.len(),
            });
        }
        values
            .iter()
            .enumerate()
            .map(|(dim, &v)| {
                let prev = &self.previous[dim];
                let curr = &self.current[dim];
                let raw = (v + 1.0) / 2.0 * prev.span(dim)? + prev.min;
                Ok((raw - curr.min) * 2.0 / curr.span(dim)? - 1.0)
            })
            .collect()
    }
}
