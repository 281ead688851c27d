use anyhow::{Context, Result};
use std::path::Path;

use super::types::DeviceRecord;
use crate::config::DataConfig;

/// Load device records from a CSV export, mapping columns by the configured
/// header names. The action and edition columns are required (scoring is
/// meaningless without them); dimension and pattern columns are optional and
/// load as `None` when absent.
pub fn load_records(path: &Path, data: &DataConfig) -> Result<Vec<DeviceRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open inventory file at {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read CSV headers from {}", path.display()))?
        .clone();

    let find = |name: &str| headers.iter().position(|h| h.trim() == name);

    let action_idx = find(&data.action_column).with_context(|| {
        format!(
            "Required column '{}' not found in {} (available: {})",
            data.action_column,
            path.display(),
            headers.iter().collect::<Vec<_>>().join(", ")
        )
    })?;
    let edition_idx = find(&data.edition_column).with_context(|| {
        format!(
            "Required column '{}' not found in {}",
            data.edition_column,
            path.display()
        )
    })?;

    let device_name_idx = find(&data.device_name_column);
    let os_idx = find(&data.os_column);
    let user_idx = find(&data.user_column);
    let country_idx = find(&data.country_column);
    let sdm_idx = find(&data.sdm_column);
    let site_idx = find(&data.site_column);

    let field = |record: &csv::StringRecord, idx: Option<usize>| -> Option<String> {
        let value = record.get(idx?)?.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    };

    let mut records = Vec::new();
    for (line, row) in reader.records().enumerate() {
        let row = row.with_context(|| {
            format!("Failed to parse CSV record {} in {}", line + 2, path.display())
        })?;
        records.push(DeviceRecord {
            device_name: field(&row, device_name_idx),
            action: field(&row, Some(action_idx)),
            os_build: field(&row, os_idx),
            edition: field(&row, Some(edition_idx)),
            last_user: field(&row, user_idx),
            country: field(&row, country_idx),
            sdm: field(&row, sdm_idx),
            site: field(&row, site_idx),
        });
    }

    Ok(records)
}
