//! Stream instances and their feature data.
//!
//! An `Instance` is a single data point delivered by a stream: an id, a
//! timestamp and a feature vector over an ordered set of named dimensions.
//! Tasks only ever read instances.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{TypesError, TypesResult};

/// Identifier of a feature dimension (its short name).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DimId(pub String);

impl DimId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DimId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a stream instance, assigned by the stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub u64);

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "inst:{}", self.0)
    }
}

/// Feature vector of an instance, aligned with its dimension ids.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureData {
    dims: Vec<DimId>,
    values: Vec<f64>,
}

impl FeatureData {
    /// Create feature data from dimension ids and matching values.
    pub fn new(dims: Vec<DimId>, values: Vec<f64>) -> TypesResult<Self> {
        if dims.len() != values.len() {
            return Err(TypesError::DimensionMismatch {
                expected: dims.len(),
                actual: values.len(),
            });
        }
        Ok(Self { dims, values })
    }

    /// Create feature data with generated dimension ids `f0`, `f1`, ...
    pub fn from_values(values: Vec<f64>) -> Self {
        let dims = (0..values.len())
            .map(|i| DimId(format!("f{}", i)))
            .collect();
        Self { dims, values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn dim_ids(&self) -> &[DimId] {
        &self.dims
    }

    pub fn num_dim(&self) -> usize {
        self.dims.len()
    }

    /// Value at a 0-based position.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Value of the dimension with the given id.
    pub fn value(&self, dim: &str) -> Option<f64> {
        self.dims
            .iter()
            .position(|d| d.as_str() == dim)
            .map(|pos| self.values[pos])
    }

    /// Iterate `(dimension id, value)` pairs in dimension order.
    pub fn iter(&self) -> impl Iterator<Item = (&DimId, f64)> + '_ {
        self.dims.iter().zip(self.values.iter().copied())
    }
}

/// A single stream instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub id: InstanceId,
    pub tstamp: DateTime<Utc>,
    feature_data: FeatureData,
}

impl Instance {
    /// Create an instance stamped with the current time.
    pub fn new(id: InstanceId, feature_data: FeatureData) -> Self {
        Self {
            id,
            tstamp: Utc::now(),
            feature_data,
        }
    }

    pub fn with_tstamp(id: InstanceId, tstamp: DateTime<Utc>, feature_data: FeatureData) -> Self {
        Self {
            id,
            tstamp,
            feature_data,
        }
    }

    pub fn feature_data(&self) -> &FeatureData {
        &self.feature_data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_data_rejects_mismatched_lengths() {
        let result = FeatureData::new(vec![DimId::new("x")], vec![1.0, 2.0]);
        assert!(matches!(
            result,
            Err(TypesError::DimensionMismatch {
                expected: 1,
                actual: 2
            })
        ));
    }

    #[test]
    fn generated_dim_ids_follow_position() {
        let fd = FeatureData::from_values(vec![1.0, 4.0]);
        assert_eq!(fd.dim_ids()[0].as_str(), "f0");
        assert_eq!(fd.dim_ids()[1].as_str(), "f1");
        assert_eq!(fd.num_dim(), 2);
    }

    #[test]
    fn value_lookup_by_name_and_index() {
        let fd = FeatureData::new(
            vec![DimId::new("temp"), DimId::new("load")],
            vec![21.5, 0.7],
        )
        .unwrap();
        assert_eq!(fd.value("load"), Some(0.7));
        assert_eq!(fd.value("missing"), None);
        assert_eq!(fd.get(0), Some(21.5));
        assert_eq!(fd.get(2), None);
    }

    #[test]
    fn instance_serializes() {
        let inst = Instance::new(InstanceId(7), FeatureData::from_values(vec![1.0, 2.0]));
        let json = serde_json::to_string(&inst).unwrap();
        let back: Instance = serde_json::from_str(&json).unwrap();
        assert_eq!(back, inst);
        assert_eq!(back.id.to_string(), "inst:7");
    }
}
