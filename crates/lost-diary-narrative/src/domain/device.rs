//! Device metadata supplied by the host.

use serde::{Deserialize, Serialize};

/// Read-only snapshot of the reader's device. Detection happens elsewhere;
/// every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeviceInfo {
    /// Coarse device class, e.g. `iPhone` or `Windows PC`.
    pub device_type: Option<String>,
    /// Operating system name.
    pub os: Option<String>,
    /// Browser name.
    pub browser: Option<String>,
}

impl DeviceInfo {
    /// A snapshot with the given device class.
    #[must_use]
    pub fn with_device_type(device_type: &str) -> Self {
        Self {
            device_type: Some(device_type.to_owned()),
            ..Self::default()
        }
    }

    /// The device class, or `fallback` when it is missing or blank.
    #[must_use]
    pub fn device_type_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        non_blank(self.device_type.as_deref()).unwrap_or(fallback)
    }

    /// The operating system, or `fallback` when it is missing or blank.
    #[must_use]
    pub fn os_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        non_blank(self.os.as_deref()).unwrap_or(fallback)
    }

    /// The browser, or `fallback` when it is missing or blank.
    #[must_use]
    pub fn browser_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        non_blank(self.browser.as_deref()).unwrap_or(fallback)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
