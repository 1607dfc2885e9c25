//! Controllable entities known to the hub.

use serde::{Deserialize, Serialize};

/// Kind of controllable entity.
///
/// The set is closed: routing decisions match on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    /// The hub itself.
    Gateway,
    /// Zigbee end device behind the hub radio.
    Zigbee,
    /// Bluetooth-mesh end device.
    Mesh,
    /// Mesh group.
    Group,
    /// Matter end device.
    Matter,
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gateway => write!(f, "gateway"),
            Self::Zigbee => write!(f, "zigbee"),
            Self::Mesh => write!(f, "mesh"),
            Self::Group => write!(f, "group"),
            Self::Matter => write!(f, "matter"),
        }
    }
}

/// One controllable entity.
///
/// Owned by the external device inventory; the routing layer treats it as
/// read-only input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Device id ("did") on the hub.
    pub did: String,
    /// Entity kind.
    pub device_type: DeviceType,
}

impl DeviceDescriptor {
    /// Create a new descriptor.
    pub fn new(did: impl Into<String>, device_type: DeviceType) -> Self {
        Self {
            did: did.into(),
            device_type,
        }
    }
}
