use std::collections::HashSet;

use thiserror::Error;

use crate::inventory::{Counters, DeviceRecord};
use crate::scoring::{self, OkrScoreResult, ScoringConfig};

/// Organizational dimensions a record set can be partitioned by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Country,
    Sdm,
    Site,
}

/// Caller errors for dimension-scoped aggregation. Asking for a dimension
/// the record set cannot support is an error, never a silent empty result.
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("unknown dimension '{0}' (expected one of: country, sdm, site)")]
    UnknownDimension(String),
    #[error("dimension '{0}' is not populated in the record set")]
    UnpopulatedDimension(&'static str),
}

impl Dimension {
    pub fn parse(key: &str) -> Result<Self, AggregateError> {
        match key.to_lowercase().as_str() {
            "country" => Ok(Dimension::Country),
            "sdm" => Ok(Dimension::Sdm),
            "site" => Ok(Dimension::Site),
            _ => Err(AggregateError::UnknownDimension(key.to_string())),
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Dimension::Country => "country",
            Dimension::Sdm => "sdm",
            Dimension::Site => "site",
        }
    }

    fn value<'a>(&self, record: &'a DeviceRecord) -> Option<&'a str> {
        match self {
            Dimension::Country => record.country.as_deref(),
            Dimension::Sdm => record.sdm.as_deref(),
            Dimension::Site => record.site.as_deref(),
        }
    }
}

/// Records with a missing dimension value or this sentinel are excluded from
/// aggregation. Documented policy: exclude, never error.
const UNKNOWN_SENTINEL: &str = "Unknown";

/// Score one record subset as a whole (the overall result, or reused per
/// partition by `aggregate_by_dimension`).
pub fn score_records<C: Counters>(
    records: &[DeviceRecord],
    counters: &C,
    scoring: &ScoringConfig,
) -> OkrScoreResult {
    scoring::score(&counters.raw_counts(records), scoring)
}

/// Score each distinct value of a dimension, sorted by overall score
/// descending. The sort is stable, so ties keep partition-discovery order.
pub fn aggregate_by_dimension<C: Counters>(
    records: &[DeviceRecord],
    dimension: Dimension,
    counters: &C,
    scoring: &ScoringConfig,
) -> Result<Vec<OkrScoreResult>, AggregateError> {
    if !records.is_empty() && records.iter().all(|r| dimension.value(r).is_none()) {
        return Err(AggregateError::UnpopulatedDimension(dimension.key()));
    }

    // Distinct values in first-seen order, dropping null/"Unknown"
    let mut seen = HashSet::new();
    let mut values = Vec::new();
    for record in records {
        if let Some(value) = dimension.value(record) {
            if value == UNKNOWN_SENTINEL {
                continue;
            }
            if seen.insert(value.to_string()) {
                values.push(value.to_string());
            }
        }
    }

    let mut results = Vec::with_capacity(values.len());
    for value in values {
        let partition: Vec<DeviceRecord> = records
            .iter()
            .filter(|r| dimension.value(r) == Some(value.as_str()))
            .cloned()
            .collect();

        let mut result = score_records(&partition, counters, scoring);
        result.label = Some(value);
        results.push(result);
    }

    results.sort_by(|a, b| {
        b.overall_score
            .partial_cmp(&a.overall_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(results)
}
