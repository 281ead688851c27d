use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Commented starter config written by `okr-pulse init`. Values mirror the
/// built-in defaults so the file is safe to trim down.
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# okr-pulse configuration
#
# Every section is optional; omitted values fall back to the defaults below.

# Column names in the inventory CSV export.
data:
  device_name_column: "Device Name"
  action_column: "Action to take"
  os_column: "OS Build"
  edition_column: "LTSC or Enterprise"
  user_column: "Last User LoggedOn"
  country_column: "Country"
  sdm_column: "SDM"
  site_column: "Site Location"
  # Action values per legacy replacement wave
  legacy_2024_action: "Urgent Replacement"
  legacy_2025_action: "Replace by 14/10/2025"
  legacy_2026_action: "Replace by 11/11/2026"
  # Substrings identifying the new OS (case-insensitive)
  os_upgrade_patterns: ["Windows 11", "22631", "26100"]
  # Substrings identifying kiosk devices (case-insensitive)
  kiosk_device_patterns: ["KIOSK"]
  kiosk_user_patterns: ["kiosk"]
  enterprise_edition: "Enterprise"
  ltsc_edition: "LTSC"

scoring:
  # Percentage share of each KR in the overall score; should sum to 100
  weights:
    legacy_2024: 25
    legacy_2025: 25
    adoption: 40
    reprovision: 10
  targets:
    adoption_pct: 90.0
    reprovision_count: 0
  # Percentage at which a zero-target KR's score reaches 0
  penalties:
    legacy_2024_pct: 1.0
    legacy_2025_pct: 5.0
  status:
    on_track_min: 80.0
    caution_min: 60.0

trend:
  # Score deltas at or below this read as flat
  flat_threshold: 0.5
  # Compare against the snapshot nearest to this many days ago
  compare_days_back: 7

# Dimensions to break scores down by, in report order
dimensions: ["country", "sdm", "site"]

# Snapshot directory; defaults to <config dir>/history
# history_dir: /var/lib/okr-pulse/history
"#;

/// Write the starter config file. Refuses to overwrite an existing one.
pub fn write_default_config(path: Option<PathBuf>) -> Result<PathBuf> {
    let config_path = path.unwrap_or_else(super::get_config_path);

    if config_path.exists() {
        anyhow::bail!("Config file already exists at {}", config_path.display());
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory at {}", parent.display()))?;
    }

    fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write config file at {}", config_path.display()))?;

    Ok(config_path)
}
