//! Shared mocks for the crate's tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::StreamExt;
use futures::channel::mpsc;
use serde_json::Value;

use lumihub_core::{
    DeviceDescriptor, DeviceType, GatewayError, GatewayEvent, ProtocolFamily, Result,
};

use crate::adapter::{AdapterRegistry, ProtocolAdapter};
use crate::session::{EventStream, GatewayTransport, MiioInfo, ShellSession};

/// Scripted privileged session. Cloning shares all interior state.
#[derive(Clone)]
pub(crate) struct MockSession {
    model: String,
    version: String,
    only_one: bool,
    bluetooth: bool,
    locked: Arc<Mutex<bool>>,
    lock_writable: bool,
    fail_verbs: bool,
    exec_log: Arc<Mutex<Vec<String>>>,
}

impl MockSession {
    pub(crate) fn new(model: &str, version: &str) -> Self {
        Self {
            model: model.to_string(),
            version: version.to_string(),
            only_one: true,
            bluetooth: true,
            locked: Arc::new(Mutex::new(false)),
            lock_writable: true,
            fail_verbs: false,
            exec_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn with_only_one(mut self, only_one: bool) -> Self {
        self.only_one = only_one;
        self
    }

    pub(crate) fn with_bluetooth(mut self, bluetooth: bool) -> Self {
        self.bluetooth = bluetooth;
        self
    }

    /// Make `lock_firmware` a no-op, so the subsequent check disagrees.
    pub(crate) fn with_stuck_firmware_lock(mut self, lock_writable: bool) -> Self {
        self.lock_writable = lock_writable;
        self
    }

    /// Make every side-effect verb fail.
    pub(crate) fn with_failing_verbs(mut self) -> Self {
        self.fail_verbs = true;
        self
    }

    pub(crate) fn exec_log(&self) -> Vec<String> {
        self.exec_log.lock().unwrap().clone()
    }

    fn verb(&self) -> Result<()> {
        if self.fail_verbs {
            Err(GatewayError::Session("verb failed".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ShellSession for MockSession {
    async fn only_one(&self) -> Result<bool> {
        Ok(self.only_one)
    }

    async fn get_miio_info(&self) -> Result<MiioInfo> {
        Ok(MiioInfo::new(&self.model))
    }

    async fn get_version(&self) -> Result<String> {
        Ok(self.version.clone())
    }

    fn supports_bluetooth(&self) -> bool {
        self.bluetooth
    }

    async fn run_ftp(&self) -> Result<()> {
        self.verb()
    }

    async fn reboot(&self) -> Result<()> {
        self.verb()
    }

    async fn exec(&self, command: &str) -> Result<String> {
        self.verb()?;
        self.exec_log.lock().unwrap().push(command.to_string());
        Ok(String::new())
    }

    async fn check_firmware_lock(&self) -> Result<bool> {
        Ok(*self.locked.lock().unwrap())
    }

    async fn lock_firmware(&self, lock: bool) -> Result<()> {
        self.verb()?;
        if self.lock_writable {
            *self.locked.lock().unwrap() = lock;
        }
        Ok(())
    }
}

/// Scripted transport over a [`MockSession`].
///
/// The first `events()` call yields the stream behind [`Self::event_sender`];
/// later cycles get a stream that never produces.
pub(crate) struct MockTransport {
    session: Mutex<Option<MockSession>>,
    port_open: AtomicBool,
    enable_ack: Mutex<String>,
    enable_calls: AtomicUsize,
    open_calls: AtomicUsize,
    event_tx: Mutex<Option<mpsc::UnboundedSender<GatewayEvent>>>,
    event_rx: Mutex<Option<mpsc::UnboundedReceiver<GatewayEvent>>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        let (event_tx, event_rx) = mpsc::unbounded();
        Self {
            session: Mutex::new(None),
            port_open: AtomicBool::new(true),
            enable_ack: Mutex::new("ok".to_string()),
            enable_calls: AtomicUsize::new(0),
            open_calls: AtomicUsize::new(0),
            event_tx: Mutex::new(Some(event_tx)),
            event_rx: Mutex::new(Some(event_rx)),
        }
    }

    pub(crate) fn with_session(self, session: MockSession) -> Self {
        *self.session.lock().unwrap() = Some(session);
        self
    }

    pub(crate) fn with_port_open(self, open: bool) -> Self {
        self.port_open.store(open, Ordering::Relaxed);
        self
    }

    pub(crate) fn with_enable_ack(self, ack: &str) -> Self {
        *self.enable_ack.lock().unwrap() = ack.to_string();
        self
    }

    /// Sender feeding the first connected phase.
    pub(crate) fn event_sender(&self) -> mpsc::UnboundedSender<GatewayEvent> {
        self.event_tx.lock().unwrap().take().expect("sender already taken")
    }

    pub(crate) fn enable_calls(&self) -> usize {
        self.enable_calls.load(Ordering::Relaxed)
    }

    pub(crate) fn open_calls(&self) -> usize {
        self.open_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl GatewayTransport for MockTransport {
    async fn check_port(&self) -> bool {
        self.port_open.load(Ordering::Relaxed)
    }

    async fn enable_telnet(&self, _token: &str, _key: Option<&str>) -> Result<String> {
        self.enable_calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.enable_ack.lock().unwrap().clone())
    }

    async fn open_session(&self) -> Result<Box<dyn ShellSession>> {
        self.open_calls.fetch_add(1, Ordering::Relaxed);
        let session = self
            .session
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| GatewayError::Session("no session scripted".into()))?;
        Ok(Box::new(session))
    }

    async fn events(&self) -> Result<EventStream> {
        match self.event_rx.lock().unwrap().take() {
            Some(rx) => Ok(rx.boxed()),
            None => Ok(futures::stream::pending().boxed()),
        }
    }
}

/// Adapter recording every interaction.
pub(crate) struct RecordingAdapter {
    family: ProtocolFamily,
    polls: bool,
    fail_reads: bool,
    reads: AtomicUsize,
    sent: Mutex<Vec<(String, Value)>>,
    mqtt_events: AtomicUsize,
    timer_events: AtomicUsize,
}

impl RecordingAdapter {
    pub(crate) fn new(family: ProtocolFamily) -> Self {
        Self {
            family,
            polls: matches!(family, ProtocolFamily::Silabs | ProtocolFamily::OpenMiio),
            fail_reads: false,
            reads: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
            mqtt_events: AtomicUsize::new(0),
            timer_events: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub(crate) fn read_count(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    pub(crate) fn sent(&self) -> Vec<(String, Value)> {
        self.sent.lock().unwrap().clone()
    }

    pub(crate) fn mqtt_event_count(&self) -> usize {
        self.mqtt_events.load(Ordering::Relaxed)
    }

    pub(crate) fn timer_event_count(&self) -> usize {
        self.timer_events.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ProtocolAdapter for RecordingAdapter {
    fn family(&self) -> ProtocolFamily {
        self.family
    }

    fn polls(&self) -> bool {
        self.polls
    }

    async fn read_devices(&self, _session: &dyn ShellSession) -> Result<Vec<DeviceDescriptor>> {
        if self.fail_reads {
            return Err(GatewayError::Session("inventory read failed".into()));
        }
        self.reads.fetch_add(1, Ordering::Relaxed);
        Ok(vec![DeviceDescriptor::new(
            format!("{}.device", self.family),
            DeviceType::Zigbee,
        )])
    }

    async fn send(&self, device: &DeviceDescriptor, payload: Value) -> Result<()> {
        self.sent.lock().unwrap().push((device.did.clone(), payload));
        Ok(())
    }

    async fn on_event(&self, event: &GatewayEvent) -> Result<()> {
        match event {
            GatewayEvent::MqttPublish(_) => {
                self.mqtt_events.fetch_add(1, Ordering::Relaxed);
            }
            GatewayEvent::Timer(_) => {
                self.timer_events.fetch_add(1, Ordering::Relaxed);
            }
        }
        Ok(())
    }
}

/// Registry with one recording adapter per protocol family, in the standard
/// registration order, plus handles to every adapter.
pub(crate) fn full_registry() -> (AdapterRegistry, Vec<Arc<RecordingAdapter>>) {
    let mut registry = AdapterRegistry::new();
    let mut adapters = Vec::new();
    for family in [
        ProtocolFamily::Lumi,
        ProtocolFamily::Miot,
        ProtocolFamily::OpenMiio,
        ProtocolFamily::Silabs,
        ProtocolFamily::Ble,
        ProtocolFamily::Mesh,
        ProtocolFamily::Matter,
    ] {
        let adapter = Arc::new(RecordingAdapter::new(family));
        registry.register(adapter.clone()).unwrap();
        adapters.push(adapter);
    }
    (registry, adapters)
}
