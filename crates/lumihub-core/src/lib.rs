//! Shared data model for the LumiHub gateway manager.
//!
//! This crate carries everything the supervision and routing layers agree on:
//! - **GatewayConfig**: connection identity for one physical hub
//! - **DeviceDescriptor / DeviceType**: the controllable entities
//! - **ProtocolFamily**: identifiers for the hub's control protocols
//! - **GatewayEvent**: broker publishes and periodic ticks
//! - **RoutedCommand**: tagged command variants plus the boundary translation
//!   from loose payload maps
//! - **GatewayError**: the failure taxonomy the supervisor branches on

pub mod command;
pub mod config;
pub mod device;
pub mod error;
pub mod event;
pub mod family;

pub use command::{CommandPayload, RoutedCommand};
pub use config::{GatewayConfig, TELNET_PORT};
pub use device::{DeviceDescriptor, DeviceType};
pub use error::{FailureClass, GatewayError, Result};
pub use event::{EventKind, GatewayEvent, MqttMessage};
pub use family::ProtocolFamily;
