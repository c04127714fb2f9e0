//! Capture device enumeration results.
//!
//! Enumeration itself belongs to the capture backend; this module only defines
//! the value types a backend returns. Passing a [`DeviceList`] by value keeps
//! "the current device list" out of process-global state: callers enumerate,
//! pick an entry, and hand the resulting source to the session.

use serde::{Deserialize, Serialize};

/// Description of one capture-capable network interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Backend identifier for the interface (e.g. `eth0`, `\Device\NPF_{...}`)
    pub name: String,

    /// Human-readable description, if the backend provides one
    pub description: Option<String>,
}

impl DeviceInfo {
    /// Create a device entry.
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self { name: name.into(), description }
    }
}

impl std::fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.description {
            Some(desc) => write!(f, "{} ({})", self.name, desc),
            None => write!(f, "{}", self.name),
        }
    }
}

/// An enumeration result: the capture-capable interfaces visible at one point
/// in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceList {
    devices: Vec<DeviceInfo>,
}

impl DeviceList {
    /// Wrap an enumeration result.
    pub fn new(devices: Vec<DeviceInfo>) -> Self {
        Self { devices }
    }

    /// Whether the machine exposed no capture-capable interfaces.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Number of enumerated interfaces.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Look up an interface by position, as shown to the user.
    pub fn get(&self, index: usize) -> Option<&DeviceInfo> {
        self.devices.get(index)
    }

    /// Iterate over the enumerated interfaces.
    pub fn iter(&self) -> impl Iterator<Item = &DeviceInfo> {
        self.devices.iter()
    }
}

impl From<Vec<DeviceInfo>> for DeviceList {
    fn from(devices: Vec<DeviceInfo>) -> Self {
        Self::new(devices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_enumeration_is_detectable() {
        let list = DeviceList::default();
        assert!(list.is_empty());
        assert!(list.get(0).is_none());
    }

    #[test]
    fn display_includes_description_when_present() {
        let plain = DeviceInfo::new("eth0", None);
        let described = DeviceInfo::new("eth0", Some("Intel I219-V".to_string()));
        assert_eq!(plain.to_string(), "eth0");
        assert_eq!(described.to_string(), "eth0 (Intel I219-V)");
    }
}
