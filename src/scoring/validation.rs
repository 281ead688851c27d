use super::config::ScoringConfig;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first). Non-fatal
/// findings, such as weights not summing to 100, come back as warnings on
/// the Ok path so the run can proceed with them surfaced.
pub fn validate_scoring(config: &ScoringConfig) -> Result<Vec<String>, Vec<String>> {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // Weights: negatives are errors, an off-100 sum is a warning
    for (name, weight) in [
        ("scoring.weights.legacy_2024", config.weights.legacy_2024),
        ("scoring.weights.legacy_2025", config.weights.legacy_2025),
        ("scoring.weights.adoption", config.weights.adoption),
        ("scoring.weights.reprovision", config.weights.reprovision),
    ] {
        if weight < 0.0 {
            errors.push(format!("{}: must be non-negative, got {}", name, weight));
        }
    }

    let weight_sum = config.weights.sum();
    if (weight_sum - 100.0).abs() > 1e-6 {
        warnings.push(format!(
            "scoring.weights: sum to {} instead of 100; overall scores will not be normalized",
            weight_sum
        ));
    }

    // Penalty thresholds define the full-failure point and divide the
    // current percentage; zero or negative values are rejected
    for (name, penalty) in [
        ("scoring.penalties.legacy_2024_pct", config.penalties.legacy_2024_pct),
        ("scoring.penalties.legacy_2025_pct", config.penalties.legacy_2025_pct),
    ] {
        if penalty <= 0.0 {
            errors.push(format!("{}: must be positive, got {}", name, penalty));
        }
    }

    // Status cut points must be strictly ordered
    if config.status.on_track_min <= config.status.caution_min {
        errors.push(format!(
            "scoring.status: on_track_min ({}) must be greater than caution_min ({})",
            config.status.on_track_min, config.status.caution_min
        ));
    }

    if config.targets.adoption_pct <= 0.0 {
        warnings.push(format!(
            "scoring.targets.adoption_pct is {}; the adoption KR will always score 100",
            config.targets.adoption_pct
        ));
    }

    if errors.is_empty() {
        Ok(warnings)
    } else {
        Err(errors)
    }
}
