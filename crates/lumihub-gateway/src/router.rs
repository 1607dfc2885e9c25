//! Command router.
//!
//! Translates one caller-supplied logical command into protocol-specific
//! adapter calls. The translation itself lives in
//! [`lumihub_core::command`]; this module only walks the resulting variants
//! and hands each payload to the matching registered adapter.

use std::sync::Arc;

use tracing::debug;

use lumihub_core::{CommandPayload, DeviceDescriptor, Result, RoutedCommand};

use crate::adapter::AdapterRegistry;

/// Routes logical commands to the registered protocol adapters.
pub struct CommandRouter {
    registry: Arc<AdapterRegistry>,
}

impl CommandRouter {
    /// Create a router over the given registry.
    pub fn new(registry: Arc<AdapterRegistry>) -> Self {
        Self { registry }
    }

    /// Send one logical command to a device, fanning out to every protocol
    /// the payload targets.
    ///
    /// A planned family with no registered adapter is skipped; adapter
    /// errors propagate to the caller.
    pub async fn send(&self, device: &DeviceDescriptor, payload: &CommandPayload) -> Result<()> {
        for routed in RoutedCommand::plan(device.device_type, payload) {
            let family = routed.family();
            match self.registry.get(family) {
                Some(adapter) => adapter.send(device, routed.into_payload()).await?,
                None => {
                    debug!(%family, did = %device.did, "no adapter for family, command dropped");
                }
            }
        }
        Ok(())
    }
}
