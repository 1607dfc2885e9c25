//! Protocol adapter interface and registry.
//!
//! Each control protocol of the hub is handled by one adapter implementing
//! [`ProtocolAdapter`]. Adapters are external collaborators: they own their
//! wire encodings and device inventories, while this crate only decides when
//! to call them. The registry replaces ad-hoc capability lookups with an
//! explicit family → adapter mapping that the preparer and router iterate.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use lumihub_core::{DeviceDescriptor, GatewayError, GatewayEvent, ProtocolFamily, Result};

use crate::session::ShellSession;

/// One protocol family's adapter.
#[async_trait]
pub trait ProtocolAdapter: Send + Sync {
    /// Family this adapter handles.
    fn family(&self) -> ProtocolFamily;

    /// Whether this adapter needs periodic timer events.
    fn polls(&self) -> bool {
        false
    }

    /// Read this family's device inventory through the given session.
    ///
    /// For the interoperability agent this doubles as the agent setup step
    /// and may return an empty inventory.
    async fn read_devices(&self, session: &dyn ShellSession) -> Result<Vec<DeviceDescriptor>>;

    /// Send a protocol-specific payload to a device.
    async fn send(&self, device: &DeviceDescriptor, payload: Value) -> Result<()>;

    /// Handle one dispatched event.
    async fn on_event(&self, event: &GatewayEvent) -> Result<()>;
}

/// Registration-ordered adapter registry.
///
/// Iteration order is registration order; the preparer relies on it for
/// deterministic inventory reads and listener registration.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: Vec<Arc<dyn ProtocolAdapter>>,
}

impl AdapterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter; at most one per family.
    pub fn register(&mut self, adapter: Arc<dyn ProtocolAdapter>) -> Result<()> {
        let family = adapter.family();
        if self.get(family).is_some() {
            return Err(GatewayError::AlreadyRegistered(family));
        }
        self.adapters.push(adapter);
        Ok(())
    }

    /// Adapter for the given family, if registered.
    pub fn get(&self, family: ProtocolFamily) -> Option<&Arc<dyn ProtocolAdapter>> {
        self.adapters
            .iter()
            .find(|adapter| adapter.family() == family)
    }

    /// Adapters in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ProtocolAdapter>> {
        self.adapters.iter()
    }

    /// Number of registered adapters.
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Whether no adapter is registered.
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::RecordingAdapter;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = AdapterRegistry::new();
        registry
            .register(Arc::new(RecordingAdapter::new(ProtocolFamily::Lumi)))
            .unwrap();
        registry
            .register(Arc::new(RecordingAdapter::new(ProtocolFamily::Silabs)))
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.get(ProtocolFamily::Lumi).is_some());
        assert!(registry.get(ProtocolFamily::Matter).is_none());
    }

    #[test]
    fn test_duplicate_family_rejected() {
        let mut registry = AdapterRegistry::new();
        registry
            .register(Arc::new(RecordingAdapter::new(ProtocolFamily::Miot)))
            .unwrap();
        let err = registry
            .register(Arc::new(RecordingAdapter::new(ProtocolFamily::Miot)))
            .unwrap_err();
        assert!(matches!(
            err,
            GatewayError::AlreadyRegistered(ProtocolFamily::Miot)
        ));
    }

    #[test]
    fn test_iteration_preserves_registration_order() {
        let mut registry = AdapterRegistry::new();
        for family in [
            ProtocolFamily::Lumi,
            ProtocolFamily::Miot,
            ProtocolFamily::OpenMiio,
            ProtocolFamily::Silabs,
        ] {
            registry
                .register(Arc::new(RecordingAdapter::new(family)))
                .unwrap();
        }

        let order: Vec<ProtocolFamily> = registry.iter().map(|a| a.family()).collect();
        assert_eq!(
            order,
            vec![
                ProtocolFamily::Lumi,
                ProtocolFamily::Miot,
                ProtocolFamily::OpenMiio,
                ProtocolFamily::Silabs,
            ]
        );
    }
}
