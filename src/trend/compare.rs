use serde::{Deserialize, Serialize};

use crate::scoring::OkrScoreResult;

/// Default FLAT band for direction classification. Callers pass a threshold
/// explicitly (usually from `trend.flat_threshold` config); this is only the
/// fallback for code without a loaded config.
pub const DEFAULT_FLAT_THRESHOLD: f64 = 0.5;

/// Directional indicator for a score delta.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

/// Shared arrow rule: deltas inside the threshold band read as FLAT.
pub fn direction_for(delta: f64, threshold: f64) -> Direction {
    if delta > threshold {
        Direction::Up
    } else if delta < -threshold {
        Direction::Down
    } else {
        Direction::Flat
    }
}

/// Delta and direction for one score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoreTrend {
    pub delta: f64,
    pub direction: Direction,
}

impl ScoreTrend {
    fn between(current: f64, previous: f64, threshold: f64) -> Self {
        let delta = current - previous;
        Self {
            delta,
            direction: direction_for(delta, threshold),
        }
    }

    fn neutral() -> Self {
        Self {
            delta: 0.0,
            direction: Direction::Flat,
        }
    }
}

/// Point-to-point comparison of two overall results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendResult {
    pub overall: ScoreTrend,
    pub kr1: ScoreTrend,
    pub kr2: ScoreTrend,
    pub kr3: ScoreTrend,
    pub kr4: ScoreTrend,
    /// False on cold start (no previous snapshot); all trends are neutral.
    pub has_history: bool,
    /// Whole days between the two compared snapshots.
    pub days_elapsed: i64,
}

/// Compare a current result against its predecessor. A missing predecessor
/// is the defined cold-start state: zero deltas, all FLAT, not an error.
pub fn compare(
    current: &OkrScoreResult,
    previous: Option<&OkrScoreResult>,
    flat_threshold: f64,
) -> TrendResult {
    let Some(previous) = previous else {
        return TrendResult {
            overall: ScoreTrend::neutral(),
            kr1: ScoreTrend::neutral(),
            kr2: ScoreTrend::neutral(),
            kr3: ScoreTrend::neutral(),
            kr4: ScoreTrend::neutral(),
            has_history: false,
            days_elapsed: 0,
        };
    };

    let days_elapsed = match (current.timestamp, previous.timestamp) {
        (Some(cur), Some(prev)) => (cur - prev).num_days(),
        _ => 0,
    };

    TrendResult {
        overall: ScoreTrend::between(current.overall_score, previous.overall_score, flat_threshold),
        kr1: ScoreTrend::between(current.kr1.score, previous.kr1.score, flat_threshold),
        kr2: ScoreTrend::between(current.kr2.score, previous.kr2.score, flat_threshold),
        kr3: ScoreTrend::between(current.kr3.score, previous.kr3.score, flat_threshold),
        kr4: ScoreTrend::between(current.kr4.score, previous.kr4.score, flat_threshold),
        has_history: true,
        days_elapsed,
    }
}

/// Overall-score trend for one dimension row, matched by label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DimensionTrend {
    pub label: String,
    pub trend: ScoreTrend,
}

/// Attach trends to a dimension result set: left join on the dimension
/// label, so rows without history (first-seen values) get a neutral trend.
/// Output order matches `current`.
pub fn compare_dimension(
    current: &[OkrScoreResult],
    previous: &[OkrScoreResult],
    flat_threshold: f64,
) -> Vec<DimensionTrend> {
    current
        .iter()
        .map(|row| {
            let label = row.label.clone().unwrap_or_default();
            let trend = previous
                .iter()
                .find(|prev| prev.label == row.label)
                .map(|prev| ScoreTrend::between(row.overall_score, prev.overall_score, flat_threshold))
                .unwrap_or_else(ScoreTrend::neutral);
            DimensionTrend { label, trend }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{score, RawCounts, ScoringConfig};
    use chrono::{Duration, Utc};

    fn result_with_overall(label: Option<&str>, legacy_2024: u64) -> OkrScoreResult {
        let mut result = score(
            &RawCounts {
                total_devices: 1000,
                legacy_2024,
                legacy_2025: 0,
                adoption_pct: 90.0,
                reprovision_count: 0,
            },
            &ScoringConfig::default(),
        );
        result.label = label.map(str::to_string);
        result
    }

    #[test]
    fn test_cold_start_is_neutral() {
        let current = result_with_overall(None, 5);
        let trend = compare(&current, None, DEFAULT_FLAT_THRESHOLD);

        assert!(!trend.has_history);
        assert_eq!(trend.days_elapsed, 0);
        for t in [trend.overall, trend.kr1, trend.kr2, trend.kr3, trend.kr4] {
            assert_eq!(t.delta, 0.0);
            assert_eq!(t.direction, Direction::Flat);
        }
    }

    #[test]
    fn test_improvement_reads_up() {
        // Backlog shrank from 8 to 2 devices: KR1 score rises
        let mut previous = result_with_overall(None, 8);
        let mut current = result_with_overall(None, 2);
        previous.timestamp = Some(Utc::now() - Duration::days(7));
        current.timestamp = Some(Utc::now());

        let trend = compare(&current, Some(&previous), DEFAULT_FLAT_THRESHOLD);
        assert!(trend.has_history);
        assert_eq!(trend.days_elapsed, 7);
        assert_eq!(trend.kr1.direction, Direction::Up);
        assert!(trend.kr1.delta > 0.0);
        assert_eq!(trend.overall.direction, Direction::Up);
        // Untouched KRs sit inside the flat band
        assert_eq!(trend.kr3.direction, Direction::Flat);
    }

    #[test]
    fn test_direction_threshold_band() {
        assert_eq!(direction_for(0.6, 0.5), Direction::Up);
        assert_eq!(direction_for(-0.6, 0.5), Direction::Down);
        assert_eq!(direction_for(0.5, 0.5), Direction::Flat);
        assert_eq!(direction_for(-0.5, 0.5), Direction::Flat);
        assert_eq!(direction_for(0.0, 0.5), Direction::Flat);
        // The band is a parameter, not a constant
        assert_eq!(direction_for(0.6, 1.0), Direction::Flat);
    }

    #[test]
    fn test_dimension_left_join_by_label() {
        let current = vec![
            result_with_overall(Some("USA"), 2),
            result_with_overall(Some("UK"), 8),
            result_with_overall(Some("France"), 0), // first seen this run
        ];
        let previous = vec![
            result_with_overall(Some("UK"), 2),
            result_with_overall(Some("USA"), 8),
        ];

        let trends = compare_dimension(&current, &previous, DEFAULT_FLAT_THRESHOLD);
        assert_eq!(trends.len(), 3);
        assert_eq!(trends[0].label, "USA");
        assert_eq!(trends[0].trend.direction, Direction::Up);
        assert_eq!(trends[1].label, "UK");
        assert_eq!(trends[1].trend.direction, Direction::Down);
        // Unmatched row: neutral, not an error
        assert_eq!(trends[2].label, "France");
        assert_eq!(trends[2].trend.delta, 0.0);
        assert_eq!(trends[2].trend.direction, Direction::Flat);
    }

    #[test]
    fn test_dimension_empty_previous_all_neutral() {
        let current = vec![result_with_overall(Some("USA"), 2)];
        let trends = compare_dimension(&current, &[], DEFAULT_FLAT_THRESHOLD);
        assert_eq!(trends[0].trend.direction, Direction::Flat);
    }

    #[test]
    fn test_direction_serializes_screaming_snake() {
        assert_eq!(serde_json::to_string(&Direction::Up).unwrap(), "\"UP\"");
        assert_eq!(serde_json::to_string(&Direction::Flat).unwrap(), "\"FLAT\"");
    }
}
