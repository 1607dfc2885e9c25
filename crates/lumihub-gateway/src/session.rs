//! Privileged session and transport contracts.
//!
//! Both traits describe external collaborators: the scoped telnet shell on
//! the hub and the transport that probes, unlocks and streams events from
//! it. The supervisor and the executors only ever talk to the hub through
//! these seams; tests substitute mocks.

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use lumihub_core::{GatewayEvent, ProtocolFamily, Result};

/// Model whose firmware must be gated.
pub const MODEL_MGL03: &str = "lumi.gateway.mgl03";
/// Model carrying the matter subsystem.
pub const MODEL_MGL001: &str = "lumi.gateway.mgl001";
/// Oldest supported mgl03 firmware.
pub const MIN_MGL03_VERSION: &str = "1.4.7_0160";

/// Device identity reported by the miio handshake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiioInfo {
    /// Device model identifier.
    pub model: String,
    /// Remaining handshake fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MiioInfo {
    /// Identity with the given model and no extra fields.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            extra: Map::new(),
        }
    }
}

/// One scoped privileged shell on the hub.
///
/// Acquired through [`GatewayTransport::open_session`]; dropping the boxed
/// session releases it on every exit path.
#[async_trait]
pub trait ShellSession: Send + Sync {
    /// Whether this manager is the only one connected to the hub.
    async fn only_one(&self) -> Result<bool>;

    /// Fetch the device identity.
    async fn get_miio_info(&self) -> Result<MiioInfo>;

    /// Fetch the firmware version string.
    async fn get_version(&self) -> Result<String>;

    /// Whether this session can read the bluetooth database.
    fn supports_bluetooth(&self) -> bool;

    /// Start the on-device FTP server.
    async fn run_ftp(&self) -> Result<()>;

    /// Reboot the hub.
    async fn reboot(&self) -> Result<()>;

    /// Run a shell command and return its output.
    async fn exec(&self, command: &str) -> Result<String>;

    /// Whether the firmware partition is write-locked.
    async fn check_firmware_lock(&self) -> Result<bool>;

    /// Lock or unlock the firmware partition.
    async fn lock_firmware(&self, lock: bool) -> Result<()>;
}

/// Stream of events for one connected phase; the stream ending means the
/// connection dropped.
pub type EventStream = BoxStream<'static, GatewayEvent>;

/// Transport to one physical hub.
#[async_trait]
pub trait GatewayTransport: Send + Sync {
    /// Probe whether the administrative port answers.
    async fn check_port(&self) -> bool;

    /// Enable telnet access using the miio protocol; returns the
    /// protocol-level acknowledgement (success is `"ok"`).
    async fn enable_telnet(&self, token: &str, key: Option<&str>) -> Result<String>;

    /// Open a scoped privileged session.
    async fn open_session(&self) -> Result<Box<dyn ShellSession>>;

    /// Connect to the hub's broker and stream its publishes.
    async fn events(&self) -> Result<EventStream>;
}

/// Protocol families enabled on one hub, computed once per bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayCapabilities {
    /// Bluetooth/mesh subsystem present.
    pub bluetooth: bool,
    /// Matter subsystem present.
    pub matter: bool,
}

impl GatewayCapabilities {
    /// Whether the given protocol family applies to this hub.
    pub fn supports(&self, family: ProtocolFamily) -> bool {
        match family {
            ProtocolFamily::Lumi
            | ProtocolFamily::Miot
            | ProtocolFamily::Silabs
            | ProtocolFamily::OpenMiio => true,
            ProtocolFamily::Ble | ProtocolFamily::Mesh => self.bluetooth,
            ProtocolFamily::Matter => self.matter,
        }
    }
}

/// Result of one successful bootstrap.
///
/// Created fresh on every cycle and discarded on disconnect; never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayInfo {
    /// Device model identifier.
    pub model: String,
    /// Firmware version string.
    pub version: String,
    /// Enabled protocol families.
    pub capabilities: GatewayCapabilities,
}
