use serde::{Deserialize, Serialize};

use crate::history::Snapshot;

/// Overall direction across the four KR velocities, by majority vote.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
}

/// Velocity and projection analysis over a chronological snapshot history.
/// Velocities are raw-value change per day with positive meaning improving:
/// shrinking backlogs for KR1/KR2/KR4, rising adoption for KR3.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BurndownTrend {
    pub kr1_velocity: f64,
    pub kr2_velocity: f64,
    pub kr3_velocity: f64,
    pub kr4_velocity: f64,
    pub trend_direction: TrendDirection,
    /// Projected whole days until the backlog reaches zero at the current
    /// velocity. None when the velocity is not strictly positive: a stalled
    /// or growing backlog has no crossing, never a negative day count.
    pub kr1_days_to_zero: Option<i64>,
    pub kr2_days_to_zero: Option<i64>,
    pub kr4_days_to_zero: Option<i64>,
    /// False with fewer than 2 snapshots; velocities are neutral zeros.
    pub has_sufficient_history: bool,
    pub days_elapsed: i64,
    pub snapshots_analyzed: usize,
}

impl BurndownTrend {
    fn insufficient(snapshots_analyzed: usize) -> Self {
        Self {
            kr1_velocity: 0.0,
            kr2_velocity: 0.0,
            kr3_velocity: 0.0,
            kr4_velocity: 0.0,
            trend_direction: TrendDirection::Stable,
            kr1_days_to_zero: None,
            kr2_days_to_zero: None,
            kr4_days_to_zero: None,
            has_sufficient_history: false,
            days_elapsed: 0,
            snapshots_analyzed,
        }
    }
}

/// Compute burndown velocities from a chronologically ordered history.
/// Velocity spans the first and last snapshot; intermediate snapshots only
/// count toward `snapshots_analyzed`.
pub fn burndown(snapshots: &[Snapshot]) -> BurndownTrend {
    if snapshots.len() < 2 {
        return BurndownTrend::insufficient(snapshots.len());
    }

    let first = &snapshots[0];
    let last = &snapshots[snapshots.len() - 1];
    let days_elapsed = (last.timestamp - first.timestamp).num_days().max(1);
    let days = days_elapsed as f64;

    // Want-to-decrease KRs: positive velocity = backlog shrinking
    let kr1_velocity = (first.overall.kr1.value - last.overall.kr1.value) / days;
    let kr2_velocity = (first.overall.kr2.value - last.overall.kr2.value) / days;
    let kr4_velocity = (first.overall.kr4.value - last.overall.kr4.value) / days;
    // Want-to-increase adoption KR: positive velocity = adoption rising
    let kr3_velocity = (last.overall.kr3.value - first.overall.kr3.value) / days;

    let positive = [kr1_velocity, kr2_velocity, kr3_velocity, kr4_velocity]
        .iter()
        .filter(|v| **v > 0.0)
        .count();
    let trend_direction = if positive >= 3 {
        TrendDirection::Improving
    } else if positive <= 1 {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    };

    BurndownTrend {
        kr1_velocity,
        kr2_velocity,
        kr3_velocity,
        kr4_velocity,
        trend_direction,
        kr1_days_to_zero: days_to_zero(last.overall.kr1.value, kr1_velocity),
        kr2_days_to_zero: days_to_zero(last.overall.kr2.value, kr2_velocity),
        kr4_days_to_zero: days_to_zero(last.overall.kr4.value, kr4_velocity),
        has_sufficient_history: true,
        days_elapsed,
        snapshots_analyzed: snapshots.len(),
    }
}

/// Zero-crossing projection, only defined for a strictly positive velocity.
fn days_to_zero(current_value: f64, velocity: f64) -> Option<i64> {
    if velocity > 0.0 {
        Some((current_value / velocity) as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{score, RawCounts, ScoringConfig};
    use chrono::{DateTime, Utc};
    use std::collections::BTreeMap;

    fn snapshot(
        ts: &str,
        legacy_2024: u64,
        legacy_2025: u64,
        adoption_pct: f64,
        kiosks: u64,
    ) -> Snapshot {
        let overall = score(
            &RawCounts {
                total_devices: 1000,
                legacy_2024,
                legacy_2025,
                adoption_pct,
                reprovision_count: kiosks,
            },
            &ScoringConfig::default(),
        );
        let ts: DateTime<Utc> = ts.parse().unwrap();
        Snapshot::at(ts, overall, BTreeMap::new())
    }

    #[test]
    fn test_insufficient_history_is_degraded_not_error() {
        let single = [snapshot("2026-08-01T00:00:00Z", 10, 50, 80.0, 5)];

        for history in [&[] as &[Snapshot], &single] {
            let trend = burndown(history);
            assert!(!trend.has_sufficient_history);
            assert_eq!(trend.kr1_velocity, 0.0);
            assert_eq!(trend.trend_direction, TrendDirection::Stable);
            assert_eq!(trend.kr1_days_to_zero, None);
            assert_eq!(trend.snapshots_analyzed, history.len());
        }
    }

    #[test]
    fn test_velocities_and_projection() {
        // Over 10 days: legacy 2024 down 20 (2/day), legacy 2025 down 10
        // (1/day), adoption up 5 points, kiosks unchanged.
        let history = [
            snapshot("2026-08-01T00:00:00Z", 60, 100, 80.0, 5),
            snapshot("2026-08-06T00:00:00Z", 50, 95, 82.0, 5),
            snapshot("2026-08-11T00:00:00Z", 40, 90, 85.0, 5),
        ];

        let trend = burndown(&history);
        assert!(trend.has_sufficient_history);
        assert_eq!(trend.days_elapsed, 10);
        assert_eq!(trend.snapshots_analyzed, 3);
        assert!((trend.kr1_velocity - 2.0).abs() < 1e-9);
        assert!((trend.kr2_velocity - 1.0).abs() < 1e-9);
        assert!((trend.kr3_velocity - 0.5).abs() < 1e-9);
        assert_eq!(trend.kr4_velocity, 0.0);

        // 3 of 4 velocities positive
        assert_eq!(trend.trend_direction, TrendDirection::Improving);

        // 40 remaining at 2/day, 90 remaining at 1/day
        assert_eq!(trend.kr1_days_to_zero, Some(20));
        assert_eq!(trend.kr2_days_to_zero, Some(90));
        // Flat kiosk count projects nothing
        assert_eq!(trend.kr4_days_to_zero, None);
    }

    #[test]
    fn test_declining_majority() {
        // Everything moving the wrong way except kiosks (flat)
        let history = [
            snapshot("2026-08-01T00:00:00Z", 10, 20, 85.0, 3),
            snapshot("2026-08-11T00:00:00Z", 15, 30, 82.0, 3),
        ];

        let trend = burndown(&history);
        assert_eq!(trend.trend_direction, TrendDirection::Declining);
        // Growing backlogs never project a crossing
        assert_eq!(trend.kr1_days_to_zero, None);
        assert_eq!(trend.kr2_days_to_zero, None);
    }

    #[test]
    fn test_mixed_velocities_are_stable() {
        // Two improving (KR1, KR3), two not
        let history = [
            snapshot("2026-08-01T00:00:00Z", 20, 20, 80.0, 3),
            snapshot("2026-08-11T00:00:00Z", 10, 25, 85.0, 3),
        ];

        let trend = burndown(&history);
        assert_eq!(trend.trend_direction, TrendDirection::Stable);
    }

    #[test]
    fn test_same_day_snapshots_use_floor_of_one_day() {
        // Two snapshots hours apart: elapsed days floor to 1, no div by zero
        let history = [
            snapshot("2026-08-01T08:00:00Z", 20, 20, 80.0, 3),
            snapshot("2026-08-01T18:00:00Z", 10, 20, 80.0, 3),
        ];

        let trend = burndown(&history);
        assert_eq!(trend.days_elapsed, 1);
        assert!((trend.kr1_velocity - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_kiosk_projection_when_burning_down() {
        let history = [
            snapshot("2026-08-01T00:00:00Z", 0, 0, 90.0, 10),
            snapshot("2026-08-11T00:00:00Z", 0, 0, 90.0, 4),
        ];

        let trend = burndown(&history);
        assert!((trend.kr4_velocity - 0.6).abs() < 1e-9);
        // 4 remaining at 0.6/day -> 6 whole days
        assert_eq!(trend.kr4_days_to_zero, Some(6));
    }
}
