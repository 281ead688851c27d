use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::config::ScoringConfig;

/// Raw quantities the score model consumes for one record set (overall or a
/// single dimension partition). Produced by the counting collaborators.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawCounts {
    pub total_devices: u64,
    /// Devices in the legacy 2024 backlog (must trend to zero).
    pub legacy_2024: u64,
    /// Devices in the legacy 2025 backlog (must trend to zero).
    pub legacy_2025: u64,
    /// Projected OS adoption percentage (0-100) across enterprise devices.
    pub adoption_pct: f64,
    /// Kiosk devices still awaiting reprovisioning (must trend to zero).
    pub reprovision_count: u64,
}

/// One scored key result: normalized score, the raw value it was derived
/// from, and the weight it carries in the overall score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct KrScore {
    /// Normalized score, clamped to 0-100.
    pub score: f64,
    /// Raw metric value: a device count for KR1/KR2/KR4, a percentage for KR3.
    pub value: f64,
    /// Percentage share of the overall score.
    pub weight: f64,
}

/// Status classification derived from the overall score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    OnTrack,
    Caution,
    AtRisk,
}

impl Status {
    /// Classify an overall score against the configured cut points.
    pub fn classify(overall_score: f64, thresholds: &super::config::StatusThresholds) -> Self {
        if overall_score >= thresholds.on_track_min {
            Status::OnTrack
        } else if overall_score >= thresholds.caution_min {
            Status::Caution
        } else {
            Status::AtRisk
        }
    }
}

/// One scored unit: the whole organization (no label) or one dimension value.
/// Never mutated after construction; `timestamp` is set when the result is
/// bundled into a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OkrScoreResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub total_devices: u64,
    pub kr1: KrScore,
    pub kr2: KrScore,
    pub kr3: KrScore,
    pub kr4: KrScore,
    /// Weighted sum of the four KR scores.
    pub overall_score: f64,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Score one record set. Pure: no I/O, deterministic for all inputs,
/// including `total_devices == 0` (derived percentages are 0, never NaN).
pub fn score(counts: &RawCounts, config: &ScoringConfig) -> OkrScoreResult {
    let legacy_2024_pct = percentage_of(counts.legacy_2024, counts.total_devices);
    let legacy_2025_pct = percentage_of(counts.legacy_2025, counts.total_devices);

    let kr1_score = zero_target_pct_score(legacy_2024_pct, config.penalties.legacy_2024_pct);
    let kr2_score = zero_target_pct_score(legacy_2025_pct, config.penalties.legacy_2025_pct);
    let kr3_score = target_pct_score(counts.adoption_pct, config.targets.adoption_pct);
    let kr4_score = zero_target_count_score(counts.reprovision_count, config.targets.reprovision_count);

    let weights = &config.weights;
    let overall_score = kr1_score * (weights.legacy_2024 / 100.0)
        + kr2_score * (weights.legacy_2025 / 100.0)
        + kr3_score * (weights.adoption / 100.0)
        + kr4_score * (weights.reprovision / 100.0);

    OkrScoreResult {
        label: None,
        total_devices: counts.total_devices,
        kr1: KrScore {
            score: kr1_score,
            value: counts.legacy_2024 as f64,
            weight: weights.legacy_2024,
        },
        kr2: KrScore {
            score: kr2_score,
            value: counts.legacy_2025 as f64,
            weight: weights.legacy_2025,
        },
        kr3: KrScore {
            score: kr3_score,
            value: counts.adoption_pct,
            weight: weights.adoption,
        },
        kr4: KrScore {
            score: kr4_score,
            value: counts.reprovision_count as f64,
            weight: weights.reprovision,
        },
        overall_score,
        status: Status::classify(overall_score, &config.status),
        timestamp: None,
    }
}

fn percentage_of(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (count as f64 / total as f64) * 100.0
    }
}

/// Zero-target percentage rule: 0% scores 100, and the score degrades
/// linearly until it reaches 0 at the penalty threshold.
fn zero_target_pct_score(current_pct: f64, penalty_pct: f64) -> f64 {
    if current_pct <= 0.0 {
        return 100.0;
    }
    // Degenerate penalty threshold: any nonzero presence is a full failure.
    if penalty_pct <= 0.0 {
        return 0.0;
    }
    (100.0 - (current_pct / penalty_pct) * 100.0).clamp(0.0, 100.0)
}

/// Target-percentage rule: proportional progress toward the target, capped
/// at 100. A target <= 0 is already satisfied.
fn target_pct_score(current_pct: f64, target_pct: f64) -> f64 {
    if target_pct <= 0.0 {
        return 100.0;
    }
    ((current_pct / target_pct) * 100.0).clamp(0.0, 100.0)
}

/// Zero-target count rule: binary pass/fail against the allowed count.
fn zero_target_count_score(current: u64, target: u64) -> f64 {
    if current <= target {
        100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::config::{KrWeights, StatusThresholds};

    fn counts(total: u64, legacy_2024: u64, legacy_2025: u64, adoption_pct: f64, kiosks: u64) -> RawCounts {
        RawCounts {
            total_devices: total,
            legacy_2024,
            legacy_2025,
            adoption_pct,
            reprovision_count: kiosks,
        }
    }

    #[test]
    fn test_reference_scenario() {
        // 1000 devices: 0.5% legacy 2024, 2.0% legacy 2025, 85% adoption,
        // 5 kiosks outstanding. Default config (25/25/40/10, penalties 1/5,
        // adoption target 90, kiosk target 0).
        let config = ScoringConfig::default();
        let result = score(&counts(1000, 5, 20, 85.0, 5), &config);

        assert!((result.kr1.score - 50.0).abs() < 1e-9);
        assert!((result.kr2.score - 60.0).abs() < 1e-9);
        assert!((result.kr3.score - 94.444444).abs() < 1e-4);
        assert_eq!(result.kr4.score, 0.0);
        assert!((result.overall_score - 65.277777).abs() < 1e-4);
        assert_eq!(result.status, Status::Caution);
    }

    #[test]
    fn test_zero_target_pct_boundaries() {
        // Clean metric scores full marks
        assert_eq!(zero_target_pct_score(0.0, 1.0), 100.0);
        // Score hits exactly 0 at the penalty threshold
        assert_eq!(zero_target_pct_score(1.0, 1.0), 0.0);
        assert_eq!(zero_target_pct_score(5.0, 5.0), 0.0);
        // And stays 0 beyond it
        assert_eq!(zero_target_pct_score(3.0, 1.0), 0.0);
    }

    #[test]
    fn test_zero_target_pct_monotonic() {
        let penalty = 2.0;
        let mut previous = zero_target_pct_score(0.0, penalty);
        for step in 1..=20 {
            let x = step as f64 * 0.1;
            let current = zero_target_pct_score(x, penalty);
            assert!(
                current <= previous,
                "score increased from {} to {} at x={}",
                previous,
                current,
                x
            );
            previous = current;
        }
    }

    #[test]
    fn test_zero_target_pct_degenerate_penalty() {
        assert_eq!(zero_target_pct_score(0.5, 0.0), 0.0);
        assert_eq!(zero_target_pct_score(0.0, 0.0), 100.0);
    }

    #[test]
    fn test_target_pct_rule() {
        assert_eq!(target_pct_score(90.0, 90.0), 100.0);
        assert_eq!(target_pct_score(120.0, 90.0), 100.0);
        assert_eq!(target_pct_score(0.0, 90.0), 0.0);
        assert!((target_pct_score(45.0, 90.0) - 50.0).abs() < 1e-9);
        // Zero or negative target is automatically satisfied
        assert_eq!(target_pct_score(0.0, 0.0), 100.0);
        assert_eq!(target_pct_score(50.0, -1.0), 100.0);
    }

    #[test]
    fn test_count_rule_is_binary() {
        assert_eq!(zero_target_count_score(0, 0), 100.0);
        assert_eq!(zero_target_count_score(1, 0), 0.0);
        assert_eq!(zero_target_count_score(3, 3), 100.0);
        assert_eq!(zero_target_count_score(4, 3), 0.0);
    }

    #[test]
    fn test_zero_devices_scores_deterministically() {
        let config = ScoringConfig::default();
        let result = score(&counts(0, 0, 0, 0.0, 0), &config);

        // Zero-target KRs are satisfied, adoption sits at 0 of target
        assert_eq!(result.kr1.score, 100.0);
        assert_eq!(result.kr2.score, 100.0);
        assert_eq!(result.kr3.score, 0.0);
        assert_eq!(result.kr4.score, 100.0);
        assert!(result.overall_score.is_finite());
    }

    #[test]
    fn test_overall_in_range_for_valid_weights() {
        let config = ScoringConfig::default();
        let cases = [
            counts(100, 0, 0, 100.0, 0),
            counts(100, 100, 100, 0.0, 50),
            counts(100, 1, 3, 45.0, 0),
        ];
        for c in cases {
            let result = score(&c, &config);
            assert!(
                (0.0..=100.0).contains(&result.overall_score),
                "overall {} out of range",
                result.overall_score
            );
        }
    }

    #[test]
    fn test_weights_are_applied_as_configured() {
        // All weight on KR4, which fails: overall collapses to 0
        let mut config = ScoringConfig::default();
        config.weights = KrWeights {
            legacy_2024: 0.0,
            legacy_2025: 0.0,
            adoption: 0.0,
            reprovision: 100.0,
        };
        let result = score(&counts(100, 0, 0, 90.0, 5), &config);
        assert_eq!(result.overall_score, 0.0);
        assert_eq!(result.status, Status::AtRisk);
    }

    #[test]
    fn test_status_classification() {
        let thresholds = StatusThresholds::default();
        assert_eq!(Status::classify(80.0, &thresholds), Status::OnTrack);
        assert_eq!(Status::classify(79.9, &thresholds), Status::Caution);
        assert_eq!(Status::classify(60.0, &thresholds), Status::Caution);
        assert_eq!(Status::classify(59.9, &thresholds), Status::AtRisk);
    }

    #[test]
    fn test_status_serializes_screaming_snake() {
        assert_eq!(serde_json::to_string(&Status::OnTrack).unwrap(), "\"ON_TRACK\"");
        assert_eq!(serde_json::to_string(&Status::AtRisk).unwrap(), "\"AT_RISK\"");
    }
}
