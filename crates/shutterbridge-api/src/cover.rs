use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum CoverDeviceClass {
    Shutter,
}

/// Feature flags advertised to the host platform.
///
/// Hosts are expected to gate command surfaces on these flags, the same way
/// they gate tilt controls on tilt-capable covers.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Default, Eq, PartialEq)]
pub struct CoverCapabilities {
    pub open: bool,
    pub close: bool,
    pub stop: bool,
    pub set_position: bool,
    pub open_tilt: bool,
    pub close_tilt: bool,
    pub set_tilt_position: bool,
}

impl CoverCapabilities {
    #[must_use]
    pub const fn positional() -> Self {
        Self {
            open: true,
            close: true,
            stop: true,
            set_position: true,
            open_tilt: false,
            close_tilt: false,
            set_tilt_position: false,
        }
    }

    #[must_use]
    pub const fn positional_with_tilt() -> Self {
        Self {
            open: true,
            close: true,
            stop: true,
            set_position: true,
            open_tilt: true,
            close_tilt: true,
            set_tilt_position: true,
        }
    }

    #[must_use]
    pub const fn supports_tilt(&self) -> bool {
        self.open_tilt || self.close_tilt || self.set_tilt_position
    }
}

/// Snapshot of everything the host reads from a cover entity.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct CoverReport {
    pub name: String,
    pub device_class: CoverDeviceClass,
    pub available: bool,
    pub is_opening: bool,
    pub is_closing: bool,
    pub is_closed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tilt_position: Option<u8>,
    pub capabilities: CoverCapabilities,
}
