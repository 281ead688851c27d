use serde::{Deserialize, Serialize};

/// Main scoring configuration.
///
/// Defines how the four key results are scored and combined. Every value is
/// config-driven; there are no hard-coded penalty divisors or cut points.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   weights:
///     legacy_2024: 25
///     legacy_2025: 25
///     adoption: 40
///     reprovision: 10
///   targets:
///     adoption_pct: 90.0
///     reprovision_count: 0
///   penalties:
///     legacy_2024_pct: 1.0
///     legacy_2025_pct: 5.0
///   status:
///     on_track_min: 80.0
///     caution_min: 60.0
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Percentage share each KR contributes to the overall score.
    /// Should sum to 100; validation warns (but does not fail) otherwise.
    #[serde(default)]
    pub weights: KrWeights,

    /// Target values the KRs are measured against.
    #[serde(default)]
    pub targets: Targets,

    /// Raw-value points at which the zero-target percentage KRs score 0.
    #[serde(default)]
    pub penalties: PenaltyThresholds,

    /// Overall-score cut points for status classification.
    #[serde(default)]
    pub status: StatusThresholds,
}

/// Weights for KR1..KR4, as percentage shares of the overall score.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct KrWeights {
    /// KR1: legacy 2024 backlog remediation
    #[serde(default = "default_legacy_2024_weight")]
    pub legacy_2024: f64,

    /// KR2: legacy 2025 backlog remediation
    #[serde(default = "default_legacy_2025_weight")]
    pub legacy_2025: f64,

    /// KR3: OS upgrade adoption
    #[serde(default = "default_adoption_weight")]
    pub adoption: f64,

    /// KR4: kiosk reprovisioning
    #[serde(default = "default_reprovision_weight")]
    pub reprovision: f64,
}

fn default_legacy_2024_weight() -> f64 {
    25.0
}
fn default_legacy_2025_weight() -> f64 {
    25.0
}
fn default_adoption_weight() -> f64 {
    40.0
}
fn default_reprovision_weight() -> f64 {
    10.0
}

impl Default for KrWeights {
    fn default() -> Self {
        Self {
            legacy_2024: default_legacy_2024_weight(),
            legacy_2025: default_legacy_2025_weight(),
            adoption: default_adoption_weight(),
            reprovision: default_reprovision_weight(),
        }
    }
}

impl KrWeights {
    pub fn sum(&self) -> f64 {
        self.legacy_2024 + self.legacy_2025 + self.adoption + self.reprovision
    }
}

/// Target values per KR. The two legacy percentages are targets in name only
/// (the zero-target scoring rule drives them to 0 regardless); they stay in
/// the config for reporting alongside the live adoption and count targets.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Targets {
    #[serde(default)]
    pub legacy_2024_pct: f64,

    #[serde(default)]
    pub legacy_2025_pct: f64,

    /// Adoption percentage to reach (KR3). A target <= 0 is treated as
    /// already satisfied.
    #[serde(default = "default_adoption_target")]
    pub adoption_pct: f64,

    /// Allowed remaining reprovision count (KR4). Typically 0.
    #[serde(default)]
    pub reprovision_count: u64,
}

fn default_adoption_target() -> f64 {
    90.0
}

impl Default for Targets {
    fn default() -> Self {
        Self {
            legacy_2024_pct: 0.0,
            legacy_2025_pct: 0.0,
            adoption_pct: default_adoption_target(),
            reprovision_count: 0,
        }
    }
}

/// Penalty thresholds for the zero-target percentage KRs: the percentage at
/// which the score reaches exactly 0. The two KRs carry independent values
/// because the same percentage is not equally severe across the two metrics.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PenaltyThresholds {
    #[serde(default = "default_legacy_2024_penalty")]
    pub legacy_2024_pct: f64,

    #[serde(default = "default_legacy_2025_penalty")]
    pub legacy_2025_pct: f64,
}

fn default_legacy_2024_penalty() -> f64 {
    1.0
}
fn default_legacy_2025_penalty() -> f64 {
    5.0
}

impl Default for PenaltyThresholds {
    fn default() -> Self {
        Self {
            legacy_2024_pct: default_legacy_2024_penalty(),
            legacy_2025_pct: default_legacy_2025_penalty(),
        }
    }
}

/// Status classification cut points. `on_track_min` must be strictly greater
/// than `caution_min`; validation rejects the config otherwise.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StatusThresholds {
    #[serde(default = "default_on_track_min")]
    pub on_track_min: f64,

    #[serde(default = "default_caution_min")]
    pub caution_min: f64,
}

fn default_on_track_min() -> f64 {
    80.0
}
fn default_caution_min() -> f64 {
    60.0
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            on_track_min: default_on_track_min(),
            caution_min: default_caution_min(),
        }
    }
}
