//! Supervised connection manager for a multi-protocol hub.
//!
//! One physical hub speaks several partially-overlapping control protocols
//! (lumi, miot, silabs, ble/mesh, matter, plus the openmiio agent) behind a
//! single management session. This crate keeps that session alive and
//! useful:
//!
//! - **ConnectionSupervisor**: the long-running lifecycle task — port probe,
//!   telnet enable, bootstrap, event dispatch — with per-failure-class
//!   backoff and no terminal failure short of an explicit stop.
//! - **bootstrap**: the once-per-cycle handshake, capability gating,
//!   inventory reads and listener registration.
//! - **EventDispatcher**: kind → ordered listeners, rebuilt every cycle.
//! - **CommandRouter**: logical command → protocol-specific adapter calls,
//!   including dual-protocol fan-out for dual-stack devices.
//! - **ShellExecutor**: administrative telnet verbs over short-lived
//!   sessions.
//! - **GatewayService**: one facade per hub wiring the pieces together.
//!
//! Protocol adapters, the shell transport and the broker transport are
//! external collaborators behind the [`adapter::ProtocolAdapter`],
//! [`session::ShellSession`] and [`session::GatewayTransport`] seams.

pub mod adapter;
pub mod bootstrap;
pub mod dispatcher;
pub mod router;
pub mod service;
pub mod session;
pub mod shell;
pub mod supervisor;

#[cfg(test)]
pub(crate) mod testutil;

pub use adapter::{AdapterRegistry, ProtocolAdapter};
pub use dispatcher::EventDispatcher;
pub use router::CommandRouter;
pub use service::GatewayService;
pub use session::{
    EventStream, GatewayCapabilities, GatewayInfo, GatewayTransport, MiioInfo, ShellSession,
};
pub use shell::{ShellExecutor, TelnetCommand};
pub use supervisor::{ConnectionSupervisor, SupervisorConfig};
