//! Error taxonomy for the gateway manager.
//!
//! Every failure the supervisor can see is classified into one of three
//! recovery buckets (`FailureClass`), so the retry policy branches on the
//! error kind instead of on the mere presence of an error.

use crate::family::ProtocolFamily;

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Gateway manager error types.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Administrative port closed or host not responding.
    #[error("Gateway unreachable: {0}")]
    Unreachable(String),

    /// Telnet access could not be enabled with the configured credentials.
    #[error("Access not enabled: {0}")]
    AccessDenied(String),

    /// Another manager already holds the hub.
    #[error("Another manager is already connected")]
    Conflict,

    /// Reported model/firmware combination is below the supported threshold.
    #[error("Unsupported firmware: {model} {version}")]
    UnsupportedFirmware {
        /// Device model identifier.
        model: String,
        /// Firmware version string.
        version: String,
    },

    /// Identity or version fetch failed.
    #[error("Handshake failed: {0}")]
    Handshake(String),

    /// Per-family inventory read failed during bootstrap.
    #[error("Inventory read failed for {family}: {message}")]
    Inventory {
        /// Protocol family whose read failed.
        family: ProtocolFamily,
        /// Underlying failure.
        message: String,
    },

    /// Connection dropped during steady-state event handling.
    #[error("Connection lost: {0}")]
    Disconnected(String),

    /// Privileged session verb failed.
    #[error("Session error: {0}")]
    Session(String),

    /// An adapter is already registered for this family.
    #[error("Adapter already registered: {0}")]
    AlreadyRegistered(ProtocolFamily),

    /// Other error.
    #[error("Gateway error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Recovery bucket for a failure, per the supervisor's retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Port closed / access not enabled: cheap to re-probe.
    Reachability,
    /// Bootstrap failed: handshake, version gate, conflict, inventory.
    Bootstrap,
    /// Steady-state disruption: reconnect immediately, no backoff.
    Disruption,
}

impl GatewayError {
    /// Recovery bucket for this error.
    ///
    /// The version gate and the mutual-exclusion conflict are business-rule
    /// rejections rather than transient faults, but they share the bootstrap
    /// bucket and its backoff interval.
    pub fn class(&self) -> FailureClass {
        match self {
            Self::Unreachable(_) | Self::AccessDenied(_) => FailureClass::Reachability,
            Self::Conflict
            | Self::UnsupportedFirmware { .. }
            | Self::Handshake(_)
            | Self::Inventory { .. }
            | Self::Session(_)
            | Self::AlreadyRegistered(_)
            | Self::Other(_) => FailureClass::Bootstrap,
            Self::Disconnected(_) => FailureClass::Disruption,
        }
    }
}
