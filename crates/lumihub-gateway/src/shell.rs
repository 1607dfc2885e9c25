//! Administrative telnet commands.
//!
//! A narrow RPC surface layered on the privileged session: reboot, FTP,
//! restarting the interoperability agent, and the firmware lock verbs. Each
//! invocation opens its own short-lived session, independent of the
//! supervisor's long-lived cycle.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error};

use lumihub_core::{ProtocolFamily, Result};

use crate::adapter::AdapterRegistry;
use crate::session::GatewayTransport;

/// Recognized administrative commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelnetCommand {
    /// Start the on-device FTP server.
    RunFtp,
    /// Reboot the hub.
    Reboot,
    /// Kill and re-bootstrap the interoperability agent.
    OpenMiioRestart,
    /// Report the firmware lock state.
    CheckFirmwareLock,
    /// Write-lock the firmware partition.
    LockFirmware,
    /// Unlock the firmware partition.
    UnlockFirmware,
}

impl TelnetCommand {
    /// Parse a command name; unrecognized names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "run_ftp" => Some(Self::RunFtp),
            "reboot" => Some(Self::Reboot),
            "openmiio_restart" => Some(Self::OpenMiioRestart),
            "check_firmware_lock" => Some(Self::CheckFirmwareLock),
            "lock_firmware" => Some(Self::LockFirmware),
            "unlock_firmware" => Some(Self::UnlockFirmware),
            _ => None,
        }
    }
}

/// Executes administrative commands over short-lived sessions.
pub struct ShellExecutor {
    transport: Arc<dyn GatewayTransport>,
    registry: Arc<AdapterRegistry>,
}

impl ShellExecutor {
    /// Create an executor over the given transport and adapters.
    pub fn new(transport: Arc<dyn GatewayTransport>, registry: Arc<AdapterRegistry>) -> Self {
        Self { transport, registry }
    }

    /// Run one administrative command.
    ///
    /// Returns `Some(true)` on success, `Some(false)` on an explicit
    /// negative (a lock check disagreeing with the requested state), `None`
    /// for an unrecognized name. Execution errors are logged with the
    /// command name and also surface as `None`.
    pub async fn telnet_command(&self, name: &str) -> Option<bool> {
        debug!(command = name, "telnet_command");
        let command = TelnetCommand::parse(name)?;
        match self.execute(command).await {
            Ok(result) => Some(result),
            Err(error) => {
                error!(command = name, %error, "can't run telnet command");
                None
            }
        }
    }

    async fn execute(&self, command: TelnetCommand) -> Result<bool> {
        let session = self.transport.open_session().await?;
        match command {
            TelnetCommand::RunFtp => {
                session.run_ftp().await?;
                Ok(true)
            }
            TelnetCommand::Reboot => {
                session.reboot().await?;
                Ok(true)
            }
            TelnetCommand::OpenMiioRestart => {
                session.exec("killall openmiio_agent").await?;
                tokio::time::sleep(Duration::from_secs(1)).await;
                if let Some(adapter) = self.registry.get(ProtocolFamily::OpenMiio) {
                    adapter.read_devices(session.as_ref()).await?;
                }
                Ok(true)
            }
            TelnetCommand::CheckFirmwareLock => session.check_firmware_lock().await,
            TelnetCommand::LockFirmware => {
                session.lock_firmware(true).await?;
                session.check_firmware_lock().await
            }
            TelnetCommand::UnlockFirmware => {
                session.lock_firmware(false).await?;
                Ok(!session.check_firmware_lock().await?)
            }
        }
    }
}
