use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::scoring::OkrScoreResult;

/// One immutable, timestamped bundle of scoring results: the overall score
/// plus per-dimension result sets keyed by dimension name. Written once per
/// analysis run and never updated in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub overall: OkrScoreResult,
    #[serde(default)]
    pub dimensions: BTreeMap<String, Vec<OkrScoreResult>>,
}

impl Snapshot {
    /// Bundle results taken now.
    pub fn new(overall: OkrScoreResult, dimensions: BTreeMap<String, Vec<OkrScoreResult>>) -> Self {
        Self::at(Utc::now(), overall, dimensions)
    }

    /// Bundle results with an explicit timestamp. The timestamp is stamped
    /// onto every contained result so trend math can read it from either.
    pub fn at(
        timestamp: DateTime<Utc>,
        mut overall: OkrScoreResult,
        mut dimensions: BTreeMap<String, Vec<OkrScoreResult>>,
    ) -> Self {
        overall.timestamp = Some(timestamp);
        for results in dimensions.values_mut() {
            for result in results {
                result.timestamp = Some(timestamp);
            }
        }
        Self {
            timestamp,
            overall,
            dimensions,
        }
    }

    /// The result set for one dimension, empty if the snapshot has none.
    pub fn dimension(&self, key: &str) -> &[OkrScoreResult] {
        self.dimensions.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}
