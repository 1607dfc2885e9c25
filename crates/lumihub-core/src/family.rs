//! Protocol family identifiers.

use serde::{Deserialize, Serialize};

/// One of the hub's control protocols.
///
/// Adapters register under exactly one family; the router and the bootstrap
/// preparer address them through these identifiers instead of concrete
/// adapter types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolFamily {
    /// Legacy vendor protocol for hub and zigbee devices.
    Lumi,
    /// Method/params RPC protocol, reused locally.
    Miot,
    /// Zigbee radio-firmware protocol.
    Silabs,
    /// On-device interoperability agent.
    OpenMiio,
    /// Bluetooth end devices.
    Ble,
    /// Bluetooth-mesh end devices and groups.
    Mesh,
    /// Matter end devices.
    Matter,
}

impl std::fmt::Display for ProtocolFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lumi => write!(f, "lumi"),
            Self::Miot => write!(f, "miot"),
            Self::Silabs => write!(f, "silabs"),
            Self::OpenMiio => write!(f, "openmiio"),
            Self::Ble => write!(f, "ble"),
            Self::Mesh => write!(f, "mesh"),
            Self::Matter => write!(f, "matter"),
        }
    }
}
