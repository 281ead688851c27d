use std::io::IsTerminal;

use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::history::Snapshot;
use crate::scoring::{OkrScoreResult, Status};
use crate::trend::{BurndownTrend, DimensionTrend, Direction, TrendDirection, TrendResult};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Trend arrow for a direction
pub fn arrow(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "↑",
        Direction::Down => "↓",
        Direction::Flat => "→",
    }
}

fn status_text(status: Status) -> &'static str {
    match status {
        Status::OnTrack => "ON TRACK",
        Status::Caution => "CAUTION",
        Status::AtRisk => "AT RISK",
    }
}

fn format_status(status: Status, use_colors: bool) -> String {
    let text = status_text(status);
    if !use_colors {
        return text.to_string();
    }
    match status {
        Status::OnTrack => text.green().bold().to_string(),
        Status::Caution => text.yellow().bold().to_string(),
        Status::AtRisk => text.red().bold().to_string(),
    }
}

fn format_delta(delta: f64, direction: Direction) -> String {
    match direction {
        Direction::Flat => arrow(direction).to_string(),
        _ => format!("{} {:+.1}", arrow(direction), delta),
    }
}

/// Multi-line overall summary with per-KR scores and trend arrows.
pub fn format_overall(result: &OkrScoreResult, trend: &TrendResult, use_colors: bool) -> String {
    let mut lines = Vec::new();

    let heading = format!(
        "Overall OKR score: {:.1}  [{}]  {}",
        result.overall_score,
        format_status(result.status, use_colors),
        format_delta(trend.overall.delta, trend.overall.direction),
    );
    lines.push(heading);

    if trend.has_history {
        lines.push(format!("  vs. snapshot {} days ago", trend.days_elapsed));
    } else {
        lines.push("  no history yet (first snapshot)".to_string());
    }
    lines.push(format!("  Devices: {}", result.total_devices));

    let rows = [
        ("KR1 legacy 2024 backlog", &result.kr1, &trend.kr1, true),
        ("KR2 legacy 2025 backlog", &result.kr2, &trend.kr2, true),
        ("KR3 OS adoption", &result.kr3, &trend.kr3, false),
        ("KR4 kiosk reprovisioning", &result.kr4, &trend.kr4, true),
    ];
    for (name, kr, kr_trend, value_is_count) in rows {
        let value = if value_is_count {
            format!("{:.0} devices", kr.value)
        } else {
            format!("{:.1}%", kr.value)
        };
        lines.push(format!(
            "  {:<26} {:>5.1}  (weight {:>3.0}%, {})  {}",
            name,
            kr.score,
            kr.weight,
            value,
            format_delta(kr_trend.delta, kr_trend.direction),
        ));
    }

    lines.join("\n")
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a dimension label, accounting for Unicode
fn truncate_label(label: &str, max_width: usize) -> String {
    let chars: Vec<char> = label.chars().collect();
    if chars.len() <= max_width {
        label.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// One table per dimension: label, device count, overall score, status and
/// trend, sorted as the aggregator produced them (score descending).
pub fn format_dimension_table(
    dimension: &str,
    results: &[OkrScoreResult],
    trends: &[DimensionTrend],
    use_colors: bool,
) -> String {
    if results.is_empty() {
        return format!("By {}: no data", dimension);
    }

    // Leave room for the fixed columns; labels take what remains
    let label_width = get_terminal_width()
        .map(|w| w.saturating_sub(40).clamp(12, 40))
        .unwrap_or(40);

    let mut lines = vec![format!("By {}:", dimension)];
    for result in results {
        let label = result.label.as_deref().unwrap_or("-");
        let trend = trends
            .iter()
            .find(|t| t.label == label)
            .map(|t| format_delta(t.trend.delta, t.trend.direction))
            .unwrap_or_else(|| arrow(Direction::Flat).to_string());
        lines.push(format!(
            "  {:<width$} {:>6} devices  {:>5.1}  [{}]  {}",
            truncate_label(label, label_width),
            result.total_devices,
            result.overall_score,
            format_status(result.status, use_colors),
            trend,
            width = label_width,
        ));
    }
    lines.join("\n")
}

fn format_direction(direction: TrendDirection, use_colors: bool) -> String {
    let text = match direction {
        TrendDirection::Improving => "improving",
        TrendDirection::Declining => "declining",
        TrendDirection::Stable => "stable",
    };
    if !use_colors {
        return text.to_string();
    }
    match direction {
        TrendDirection::Improving => text.green().to_string(),
        TrendDirection::Declining => text.red().to_string(),
        TrendDirection::Stable => text.to_string(),
    }
}

/// Burndown velocity summary with zero-crossing projections.
pub fn format_burndown(trend: &BurndownTrend, use_colors: bool) -> String {
    if !trend.has_sufficient_history {
        return format!(
            "Burndown: insufficient history ({} snapshot{}, need at least 2)",
            trend.snapshots_analyzed,
            if trend.snapshots_analyzed == 1 { "" } else { "s" },
        );
    }

    let projection = |days: Option<i64>| match days {
        Some(days) => format!("zero in ~{} days", days),
        None => "no projection".to_string(),
    };

    let mut lines = vec![format!(
        "Burndown over {} days ({} snapshots): {}",
        trend.days_elapsed,
        trend.snapshots_analyzed,
        format_direction(trend.trend_direction, use_colors),
    )];
    lines.push(format!(
        "  KR1 legacy 2024:  {:+.2} devices/day  ({})",
        trend.kr1_velocity,
        projection(trend.kr1_days_to_zero),
    ));
    lines.push(format!(
        "  KR2 legacy 2025:  {:+.2} devices/day  ({})",
        trend.kr2_velocity,
        projection(trend.kr2_days_to_zero),
    ));
    lines.push(format!(
        "  KR3 OS adoption:  {:+.2} pts/day",
        trend.kr3_velocity,
    ));
    lines.push(format!(
        "  KR4 kiosks:       {:+.2} devices/day  ({})",
        trend.kr4_velocity,
        projection(trend.kr4_days_to_zero),
    ));
    lines.join("\n")
}

/// One history listing line per snapshot.
pub fn format_history_line(snapshot: &Snapshot, use_colors: bool) -> String {
    format!(
        "{}  score {:>5.1}  [{}]  {} devices",
        snapshot.timestamp.format("%Y-%m-%d %H:%M:%S"),
        snapshot.overall.overall_score,
        format_status(snapshot.overall.status, use_colors),
        snapshot.overall.total_devices,
    )
}
