//! Service facade over one supervised hub.
//!
//! Wires the transport, adapter registry, dispatcher, supervisor, router
//! and shell executor together behind one object, so host applications deal
//! with a single handle per physical hub.

use std::sync::Arc;

use lumihub_core::{CommandPayload, DeviceDescriptor, Result};

use crate::adapter::AdapterRegistry;
use crate::dispatcher::EventDispatcher;
use crate::router::CommandRouter;
use crate::session::{GatewayInfo, GatewayTransport};
use crate::shell::ShellExecutor;
use crate::supervisor::{ConnectionSupervisor, SupervisorConfig};

/// One managed hub: lifecycle, command routing and administrative commands.
pub struct GatewayService {
    supervisor: ConnectionSupervisor,
    router: CommandRouter,
    executor: ShellExecutor,
}

impl GatewayService {
    /// Build a service over the given transport and adapters.
    ///
    /// The registry is fixed at construction; adapters cannot be added to a
    /// running service.
    pub fn new(
        transport: Arc<dyn GatewayTransport>,
        config: SupervisorConfig,
        registry: AdapterRegistry,
    ) -> Self {
        let registry = Arc::new(registry);
        let dispatcher = Arc::new(EventDispatcher::new());
        Self {
            supervisor: ConnectionSupervisor::new(
                transport.clone(),
                registry.clone(),
                dispatcher,
                config,
            ),
            router: CommandRouter::new(registry.clone()),
            executor: ShellExecutor::new(transport, registry),
        }
    }

    /// Launch the supervised connection. No-op if already running.
    pub async fn start(&self) {
        self.supervisor.start().await;
    }

    /// Stop the supervised connection and wait for full termination. No-op
    /// if not running.
    pub async fn stop(&self) {
        self.supervisor.stop().await;
    }

    /// Whether the supervised connection is running.
    pub async fn is_running(&self) -> bool {
        self.supervisor.is_running().await
    }

    /// Bootstrap result of the current cycle, if connected.
    pub async fn info(&self) -> Option<GatewayInfo> {
        self.supervisor.info().await
    }

    /// Send one logical command to a device.
    pub async fn send(&self, device: &DeviceDescriptor, payload: &CommandPayload) -> Result<()> {
        self.router.send(device, payload).await
    }

    /// Run one administrative telnet command.
    pub async fn telnet_command(&self, name: &str) -> Option<bool> {
        self.executor.telnet_command(name).await
    }
}
