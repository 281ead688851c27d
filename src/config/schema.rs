use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scoring::ScoringConfig;

/// Top-level configuration, loaded from `~/.config/okr-pulse/config.yaml`.
/// One instance is passed by reference into every component.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Inventory column names and category matching rules.
    #[serde(default)]
    pub data: DataConfig,

    /// Weights, targets, penalty thresholds and status cut points.
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Trend comparison settings.
    #[serde(default)]
    pub trend: TrendConfig,

    /// Dimensions to aggregate by, in report order.
    #[serde(default = "default_dimensions")]
    pub dimensions: Vec<String>,

    /// Snapshot directory. Defaults to `<config dir>/history`.
    #[serde(default)]
    pub history_dir: Option<PathBuf>,
}

fn default_dimensions() -> Vec<String> {
    vec!["country".to_string(), "sdm".to_string(), "site".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            scoring: ScoringConfig::default(),
            trend: TrendConfig::default(),
            dimensions: default_dimensions(),
            history_dir: None,
        }
    }
}

/// Column names and matching rules for the inventory export. The export's
/// headers vary between sources, so every column is remappable.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    #[serde(default = "default_device_name_column")]
    pub device_name_column: String,
    #[serde(default = "default_action_column")]
    pub action_column: String,
    #[serde(default = "default_os_column")]
    pub os_column: String,
    #[serde(default = "default_edition_column")]
    pub edition_column: String,
    #[serde(default = "default_user_column")]
    pub user_column: String,
    #[serde(default = "default_country_column")]
    pub country_column: String,
    #[serde(default = "default_sdm_column")]
    pub sdm_column: String,
    #[serde(default = "default_site_column")]
    pub site_column: String,

    /// Action values that put a device in each legacy replacement wave.
    #[serde(default = "default_legacy_2024_action")]
    pub legacy_2024_action: String,
    #[serde(default = "default_legacy_2025_action")]
    pub legacy_2025_action: String,
    #[serde(default = "default_legacy_2026_action")]
    pub legacy_2026_action: String,

    /// Case-insensitive substrings identifying the new OS in the OS column.
    #[serde(default = "default_os_upgrade_patterns")]
    pub os_upgrade_patterns: Vec<String>,

    /// Case-insensitive substrings marking kiosk devices by name or by the
    /// last logged-on user.
    #[serde(default = "default_kiosk_device_patterns")]
    pub kiosk_device_patterns: Vec<String>,
    #[serde(default = "default_kiosk_user_patterns")]
    pub kiosk_user_patterns: Vec<String>,

    #[serde(default = "default_enterprise_edition")]
    pub enterprise_edition: String,
    #[serde(default = "default_ltsc_edition")]
    pub ltsc_edition: String,
}

fn default_device_name_column() -> String {
    "Device Name".to_string()
}
fn default_action_column() -> String {
    "Action to take".to_string()
}
fn default_os_column() -> String {
    "OS Build".to_string()
}
fn default_edition_column() -> String {
    "LTSC or Enterprise".to_string()
}
fn default_user_column() -> String {
    "Last User LoggedOn".to_string()
}
fn default_country_column() -> String {
    "Country".to_string()
}
fn default_sdm_column() -> String {
    "SDM".to_string()
}
fn default_site_column() -> String {
    "Site Location".to_string()
}
fn default_legacy_2024_action() -> String {
    "Urgent Replacement".to_string()
}
fn default_legacy_2025_action() -> String {
    "Replace by 14/10/2025".to_string()
}
fn default_legacy_2026_action() -> String {
    "Replace by 11/11/2026".to_string()
}
fn default_os_upgrade_patterns() -> Vec<String> {
    vec!["Windows 11".to_string(), "22631".to_string(), "26100".to_string()]
}
fn default_kiosk_device_patterns() -> Vec<String> {
    vec!["KIOSK".to_string()]
}
fn default_kiosk_user_patterns() -> Vec<String> {
    vec!["kiosk".to_string()]
}
fn default_enterprise_edition() -> String {
    "Enterprise".to_string()
}
fn default_ltsc_edition() -> String {
    "LTSC".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            device_name_column: default_device_name_column(),
            action_column: default_action_column(),
            os_column: default_os_column(),
            edition_column: default_edition_column(),
            user_column: default_user_column(),
            country_column: default_country_column(),
            sdm_column: default_sdm_column(),
            site_column: default_site_column(),
            legacy_2024_action: default_legacy_2024_action(),
            legacy_2025_action: default_legacy_2025_action(),
            legacy_2026_action: default_legacy_2026_action(),
            os_upgrade_patterns: default_os_upgrade_patterns(),
            kiosk_device_patterns: default_kiosk_device_patterns(),
            kiosk_user_patterns: default_kiosk_user_patterns(),
            enterprise_edition: default_enterprise_edition(),
            ltsc_edition: default_ltsc_edition(),
        }
    }
}

/// Trend comparison settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TrendConfig {
    /// Deltas with absolute value at or below this read as FLAT.
    #[serde(default = "default_flat_threshold")]
    pub flat_threshold: f64,

    /// How far back to look for the comparison snapshot (nearest match).
    #[serde(default = "default_compare_days_back")]
    pub compare_days_back: i64,
}

fn default_flat_threshold() -> f64 {
    0.5
}
fn default_compare_days_back() -> i64 {
    7
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            flat_threshold: default_flat_threshold(),
            compare_days_back: default_compare_days_back(),
        }
    }
}
