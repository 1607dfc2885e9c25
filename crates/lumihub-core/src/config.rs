//! Gateway connection configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Administrative (telnet) port on the hub.
pub const TELNET_PORT: u16 = 23;

/// Identity of one physical hub.
///
/// Created at configuration time and kept for the lifetime of the
/// integration instance. Everything except the options map is immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Hub host address.
    pub host: String,

    /// Shared secret token used to enable telnet access.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Optional encryption key paired with the token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// User-supplied options.
    #[serde(default)]
    pub options: HashMap<String, serde_json::Value>,
}

impl GatewayConfig {
    /// Create a configuration for the given host with no credentials.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            token: None,
            key: None,
            options: HashMap::new(),
        }
    }

    /// Set the shared secret token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the encryption key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}
