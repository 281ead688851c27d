/// One device row from the inventory export. Fields the export did not carry
/// (or left blank) are `None`; downstream filters treat blank and missing the
/// same way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceRecord {
    pub device_name: Option<String>,
    /// Remediation action assigned to the device (legacy wave membership).
    pub action: Option<String>,
    pub os_build: Option<String>,
    /// OS edition, e.g. "Enterprise" or "LTSC".
    pub edition: Option<String>,
    pub last_user: Option<String>,
    pub country: Option<String>,
    pub sdm: Option<String>,
    pub site: Option<String>,
}
