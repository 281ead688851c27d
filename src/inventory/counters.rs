use super::types::DeviceRecord;
use crate::config::DataConfig;
use crate::scoring::RawCounts;

/// Legacy backlog counts per replacement wave.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LegacyCounts {
    pub total_devices: u64,
    pub legacy_2024: u64,
    pub legacy_2025: u64,
    pub legacy_2026: u64,
    pub total_legacy: u64,
}

/// OS adoption counts across enterprise-edition devices. Devices in a legacy
/// replacement wave reach the new OS via hardware replacement, so they count
/// toward the adoption path rather than against it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AdoptionCounts {
    pub total_enterprise: u64,
    pub on_new_os: u64,
    pub via_replacement: u64,
    /// Projected adoption percentage (on_new_os + via_replacement over
    /// total_enterprise). 0 when there are no enterprise devices.
    pub adoption_pct: f64,
    /// Adoption counting only devices already on the new OS.
    pub current_pct: f64,
}

/// Kiosk reprovisioning counts. Kiosks still on the enterprise edition are
/// the outstanding reprovisioning backlog.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReprovisionCounts {
    pub total_kiosk: u64,
    pub enterprise_count: u64,
    pub ltsc_count: u64,
}

/// Counting collaborators the aggregator invokes once per record subset
/// (overall or one dimension partition). Implementations must return
/// well-defined zero counts for empty subsets.
pub trait Counters {
    fn legacy(&self, records: &[DeviceRecord]) -> LegacyCounts;
    fn adoption(&self, records: &[DeviceRecord]) -> AdoptionCounts;
    fn reprovision(&self, records: &[DeviceRecord]) -> ReprovisionCounts;

    /// Bundle all three counters into the raw quantities the score model takes.
    fn raw_counts(&self, records: &[DeviceRecord]) -> RawCounts {
        let legacy = self.legacy(records);
        let adoption = self.adoption(records);
        let reprovision = self.reprovision(records);
        RawCounts {
            total_devices: legacy.total_devices,
            legacy_2024: legacy.legacy_2024,
            legacy_2025: legacy.legacy_2025,
            adoption_pct: adoption.adoption_pct,
            reprovision_count: reprovision.enterprise_count,
        }
    }
}

/// Production counters driven by the configured matching rules.
#[derive(Debug, Clone)]
pub struct FleetCounters {
    data: DataConfig,
}

impl FleetCounters {
    pub fn new(data: &DataConfig) -> Self {
        Self { data: data.clone() }
    }

    fn is_enterprise(&self, record: &DeviceRecord) -> bool {
        record.edition.as_deref() == Some(self.data.enterprise_edition.as_str())
    }

    fn is_ltsc(&self, record: &DeviceRecord) -> bool {
        record.edition.as_deref() == Some(self.data.ltsc_edition.as_str())
    }

    fn in_replacement_wave(&self, record: &DeviceRecord) -> bool {
        matches!(record.action.as_deref(), Some(action)
            if action == self.data.legacy_2024_action || action == self.data.legacy_2025_action)
    }

    fn on_new_os(&self, record: &DeviceRecord) -> bool {
        match record.os_build.as_deref() {
            Some(os) => contains_any(os, &self.data.os_upgrade_patterns),
            None => false,
        }
    }

    fn is_kiosk(&self, record: &DeviceRecord) -> bool {
        let by_name = record
            .device_name
            .as_deref()
            .is_some_and(|name| contains_any(name, &self.data.kiosk_device_patterns));
        let by_user = record
            .last_user
            .as_deref()
            .is_some_and(|user| contains_any(user, &self.data.kiosk_user_patterns));
        by_name || by_user
    }
}

fn contains_any(haystack: &str, patterns: &[String]) -> bool {
    let haystack = haystack.to_lowercase();
    patterns
        .iter()
        .any(|p| haystack.contains(&p.to_lowercase()))
}

impl Counters for FleetCounters {
    fn legacy(&self, records: &[DeviceRecord]) -> LegacyCounts {
        let mut counts = LegacyCounts {
            total_devices: records.len() as u64,
            ..LegacyCounts::default()
        };
        for record in records {
            match record.action.as_deref() {
                Some(action) if action == self.data.legacy_2024_action => counts.legacy_2024 += 1,
                Some(action) if action == self.data.legacy_2025_action => counts.legacy_2025 += 1,
                Some(action) if action == self.data.legacy_2026_action => counts.legacy_2026 += 1,
                _ => {}
            }
        }
        counts.total_legacy = counts.legacy_2024 + counts.legacy_2025 + counts.legacy_2026;
        counts
    }

    fn adoption(&self, records: &[DeviceRecord]) -> AdoptionCounts {
        let mut counts = AdoptionCounts::default();
        for record in records.iter().filter(|r| self.is_enterprise(r)) {
            counts.total_enterprise += 1;
            if self.in_replacement_wave(record) {
                counts.via_replacement += 1;
            } else if self.on_new_os(record) {
                counts.on_new_os += 1;
            }
        }
        if counts.total_enterprise > 0 {
            let total = counts.total_enterprise as f64;
            counts.adoption_pct = ((counts.on_new_os + counts.via_replacement) as f64 / total) * 100.0;
            counts.current_pct = (counts.on_new_os as f64 / total) * 100.0;
        }
        counts
    }

    fn reprovision(&self, records: &[DeviceRecord]) -> ReprovisionCounts {
        let mut counts = ReprovisionCounts::default();
        for record in records.iter().filter(|r| self.is_kiosk(r)) {
            counts.total_kiosk += 1;
            if self.is_enterprise(record) {
                counts.enterprise_count += 1;
            } else if self.is_ltsc(record) {
                counts.ltsc_count += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(
        name: &str,
        action: &str,
        os: &str,
        edition: &str,
        user: &str,
    ) -> DeviceRecord {
        let opt = |s: &str| {
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        };
        DeviceRecord {
            device_name: opt(name),
            action: opt(action),
            os_build: opt(os),
            edition: opt(edition),
            last_user: opt(user),
            ..DeviceRecord::default()
        }
    }

    fn counters() -> FleetCounters {
        FleetCounters::new(&DataConfig::default())
    }

    #[test]
    fn test_legacy_counts_by_action_value() {
        let records = vec![
            device("PC-1", "Urgent Replacement", "Windows 10", "Enterprise", "a"),
            device("PC-2", "Replace by 14/10/2025", "Windows 10", "Enterprise", "b"),
            device("PC-3", "Replace by 14/10/2025", "Windows 10", "Enterprise", "c"),
            device("PC-4", "Replace by 11/11/2026", "Windows 10", "LTSC", "d"),
            device("PC-5", "N/A", "Windows 11", "Enterprise", "e"),
        ];
        let counts = counters().legacy(&records);
        assert_eq!(counts.total_devices, 5);
        assert_eq!(counts.legacy_2024, 1);
        assert_eq!(counts.legacy_2025, 2);
        assert_eq!(counts.legacy_2026, 1);
        assert_eq!(counts.total_legacy, 4);
    }

    #[test]
    fn test_adoption_counts_replacement_wave_toward_path() {
        let records = vec![
            // Already upgraded
            device("PC-1", "N/A", "Windows 11 23H2", "Enterprise", "a"),
            // Gets the new OS via hardware replacement
            device("PC-2", "Urgent Replacement", "Windows 10", "Enterprise", "b"),
            // Neither upgraded nor scheduled
            device("PC-3", "N/A", "Windows 10", "Enterprise", "c"),
            // LTSC devices are outside the adoption scope
            device("PC-4", "N/A", "Windows 11", "LTSC", "d"),
        ];
        let counts = counters().adoption(&records);
        assert_eq!(counts.total_enterprise, 3);
        assert_eq!(counts.on_new_os, 1);
        assert_eq!(counts.via_replacement, 1);
        assert!((counts.adoption_pct - 66.666666).abs() < 1e-4);
        assert!((counts.current_pct - 33.333333).abs() < 1e-4);
    }

    #[test]
    fn test_adoption_empty_scope_is_zero_not_nan() {
        let records = vec![device("PC-1", "N/A", "Windows 10", "LTSC", "a")];
        let counts = counters().adoption(&records);
        assert_eq!(counts.total_enterprise, 0);
        assert_eq!(counts.adoption_pct, 0.0);
    }

    #[test]
    fn test_kiosk_matching_by_name_and_user() {
        let records = vec![
            device("KIOSK-01", "N/A", "Windows 10", "Enterprise", "svc"),
            // Lowercase name still matches (case-insensitive)
            device("wh-kiosk-02", "N/A", "Windows 10", "LTSC", "svc"),
            // Matched by the logged-on user instead of the name
            device("PC-9", "N/A", "Windows 10", "Enterprise", "KIOSK-floor3"),
            device("PC-10", "N/A", "Windows 10", "Enterprise", "jdoe"),
        ];
        let counts = counters().reprovision(&records);
        assert_eq!(counts.total_kiosk, 3);
        assert_eq!(counts.enterprise_count, 2);
        assert_eq!(counts.ltsc_count, 1);
    }

    #[test]
    fn test_raw_counts_bundle() {
        let records = vec![
            device("PC-1", "Urgent Replacement", "Windows 10", "Enterprise", "a"),
            device("PC-2", "N/A", "Windows 11", "Enterprise", "b"),
            device("KIOSK-03", "N/A", "Windows 10", "Enterprise", "svc"),
        ];
        let raw = counters().raw_counts(&records);
        assert_eq!(raw.total_devices, 3);
        assert_eq!(raw.legacy_2024, 1);
        assert_eq!(raw.legacy_2025, 0);
        assert_eq!(raw.reprovision_count, 1);
        assert!((raw.adoption_pct - 66.666666).abs() < 1e-4);
    }

    #[test]
    fn test_empty_records_all_zero() {
        let c = counters();
        assert_eq!(c.legacy(&[]).total_devices, 0);
        assert_eq!(c.adoption(&[]).adoption_pct, 0.0);
        assert_eq!(c.reprovision(&[]).total_kiosk, 0);
    }
}
