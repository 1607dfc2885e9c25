//! Connection supervisor.
//!
//! Owns the single long-running lifecycle task for one hub and drives the
//! retry state machine: probe the administrative port, enable telnet when it
//! is closed, bootstrap, then dispatch broker and timer events until the
//! connection drops. Every failure class has its own retry policy and none
//! of them is fatal; the loop only ends on an explicit stop request.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::{Mutex, RwLock, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use lumihub_core::{GatewayConfig, GatewayError, GatewayEvent, Result};

use crate::adapter::AdapterRegistry;
use crate::bootstrap;
use crate::dispatcher::EventDispatcher;
use crate::session::{GatewayInfo, GatewayTransport};

/// Telnet-enable acknowledgement meaning success.
const ACK_OK: &str = "ok";

/// Supervisor configuration.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Connection identity of the hub.
    pub connection: GatewayConfig,
    /// Backoff after a reachability or access failure.
    pub reachability_backoff: Duration,
    /// Backoff after a failed bootstrap.
    pub bootstrap_backoff: Duration,
    /// Period of the timer events dispatched to polling adapters.
    pub timer_interval: Duration,
}

impl SupervisorConfig {
    /// Default retry policy for the given connection: 30s reachability
    /// backoff, 60s bootstrap backoff. A reachability failure is cheap to
    /// re-probe; a failed bootstrap is costlier and less likely to resolve
    /// quickly.
    pub fn new(connection: GatewayConfig) -> Self {
        Self {
            connection,
            reachability_backoff: Duration::from_secs(30),
            bootstrap_backoff: Duration::from_secs(60),
            timer_interval: Duration::from_secs(30),
        }
    }
}

/// Live lifecycle task.
struct RunState {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Everything one connection cycle needs.
struct Cycle {
    transport: Arc<dyn GatewayTransport>,
    registry: Arc<AdapterRegistry>,
    dispatcher: Arc<EventDispatcher>,
    config: SupervisorConfig,
    info: Arc<RwLock<Option<GatewayInfo>>>,
}

/// Supervised connection to one hub.
pub struct ConnectionSupervisor {
    transport: Arc<dyn GatewayTransport>,
    registry: Arc<AdapterRegistry>,
    dispatcher: Arc<EventDispatcher>,
    config: SupervisorConfig,
    info: Arc<RwLock<Option<GatewayInfo>>>,
    run_state: Mutex<Option<RunState>>,
}

impl ConnectionSupervisor {
    /// Create a supervisor over the given transport and adapters.
    pub fn new(
        transport: Arc<dyn GatewayTransport>,
        registry: Arc<AdapterRegistry>,
        dispatcher: Arc<EventDispatcher>,
        config: SupervisorConfig,
    ) -> Self {
        Self {
            transport,
            registry,
            dispatcher,
            config,
            info: Arc::new(RwLock::new(None)),
            run_state: Mutex::new(None),
        }
    }

    /// Launch the lifecycle task. No-op if one is already running.
    pub async fn start(&self) {
        let mut run_state = self.run_state.lock().await;
        if run_state.is_some() {
            return;
        }
        debug!(host = %self.config.connection.host, "start");

        let (shutdown, shutdown_rx) = watch::channel(false);
        let cycle = Cycle {
            transport: self.transport.clone(),
            registry: self.registry.clone(),
            dispatcher: self.dispatcher.clone(),
            config: self.config.clone(),
            info: self.info.clone(),
        };
        let handle = tokio::spawn(run(cycle, shutdown_rx));
        *run_state = Some(RunState { shutdown, handle });
    }

    /// Stop the lifecycle task and wait for its termination. No-op if not
    /// running.
    ///
    /// By the time this returns the task has fully exited and the event
    /// dispatcher is empty, so no further dispatch from the stopped cycle
    /// can occur.
    pub async fn stop(&self) {
        let Some(run_state) = self.run_state.lock().await.take() else {
            return;
        };
        debug!(host = %self.config.connection.host, "stop");
        let _ = run_state.shutdown.send(true);
        run_state.handle.await.ok();
    }

    /// Whether the lifecycle task is running.
    pub async fn is_running(&self) -> bool {
        self.run_state.lock().await.is_some()
    }

    /// Result of the current cycle's bootstrap, if connected.
    pub async fn info(&self) -> Option<GatewayInfo> {
        self.info.read().await.clone()
    }
}

/// Lifecycle task body: run cycles until the shutdown signal fires, then
/// tear the cycle state down.
async fn run(cycle: Cycle, mut shutdown: watch::Receiver<bool>) {
    tokio::select! {
        _ = shutdown.changed() => {}
        _ = run_cycles(&cycle) => {}
    }
    cycle.dispatcher.clear().await;
    *cycle.info.write().await = None;
    debug!("lifecycle task finished");
}

/// The retry loop. Never returns; cancellation happens at any await point
/// through the enclosing select.
async fn run_cycles(cycle: &Cycle) {
    loop {
        if !cycle.transport.check_port().await {
            if let Err(error) = enable_telnet(cycle).await {
                debug!(%error, "telnet access not enabled");
                tokio::time::sleep(cycle.config.reachability_backoff).await;
                continue;
            }
        }

        match bootstrap::prepare(
            cycle.transport.as_ref(),
            &cycle.registry,
            &cycle.dispatcher,
        )
        .await
        {
            Ok(info) => {
                info!(model = %info.model, version = %info.version, "gateway ready");
                *cycle.info.write().await = Some(info);
            }
            Err(error) => {
                warn!(%error, class = ?error.class(), "can't prepare gateway");
                tokio::time::sleep(cycle.config.bootstrap_backoff).await;
                continue;
            }
        }

        if let Err(error) = handle_events(cycle).await {
            debug!(%error, "connected phase ended");
        }
        *cycle.info.write().await = None;
        // Immediate reconnect attempt, no backoff.
    }
}

/// Enable telnet with the miio protocol using the configured token.
async fn enable_telnet(cycle: &Cycle) -> Result<()> {
    let token = cycle
        .config
        .connection
        .token
        .as_deref()
        .ok_or_else(|| GatewayError::AccessDenied("no token configured".into()))?;
    let ack = cycle
        .transport
        .enable_telnet(token, cycle.config.connection.key.as_deref())
        .await
        .map_err(|error| GatewayError::AccessDenied(error.to_string()))?;
    debug!(%ack, "enable_telnet");
    if ack == ACK_OK {
        Ok(())
    } else {
        Err(GatewayError::AccessDenied(format!("unexpected ack: {ack}")))
    }
}

/// Connected phase: dispatch broker publishes and periodic timer events
/// until the stream ends or errors.
async fn handle_events(cycle: &Cycle) -> Result<()> {
    let mut events = cycle.transport.events().await?;
    let mut timer = tokio::time::interval(cycle.config.timer_interval);
    // The first tick completes immediately; consume it so polling starts
    // one full interval after connect.
    timer.tick().await;

    loop {
        tokio::select! {
            maybe = events.next() => match maybe {
                Some(event) => cycle.dispatcher.dispatch(event).await,
                None => return Err(GatewayError::Disconnected("event stream closed".into())),
            },
            _ = timer.tick() => {
                cycle.dispatcher.dispatch(GatewayEvent::timer_now()).await;
            }
        }
    }
}
