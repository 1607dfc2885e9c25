//! Command payload translation.
//!
//! Callers hand the router a loosely-typed payload map whose keys signal the
//! target protocol(s): `cmd` for lumi, `method` for miot, `commands` for
//! silabs. A payload may carry more than one discriminator ("multispec"),
//! meaning the same logical command fans out to several protocols for a
//! dual-stack device. This module translates such a map, together with the
//! target device type, into an explicit list of [`RoutedCommand`] variants;
//! the router then operates on variants and never inspects map keys itself.

use serde_json::{Map, Value, json};

use crate::device::DeviceType;
use crate::family::ProtocolFamily;

/// Loosely-typed command payload as supplied by the caller.
pub type CommandPayload = Map<String, Value>;

/// Lumi discriminator key.
const KEY_CMD: &str = "cmd";
/// Miot discriminator key.
const KEY_METHOD: &str = "method";
/// Silabs discriminator key.
const KEY_COMMANDS: &str = "commands";

/// Parameter marker selecting lumi entries out of a shared params list.
const MARKER_RES_NAME: &str = "res_name";
/// Parameter marker selecting miot entries out of a shared params list.
const MARKER_SIID: &str = "siid";

/// One protocol-specific command, carrying the exact payload the target
/// adapter must receive.
#[derive(Debug, Clone, PartialEq)]
pub enum RoutedCommand {
    /// Legacy vendor protocol.
    Lumi(Value),
    /// Method/params RPC protocol.
    Miot(Value),
    /// Zigbee radio-firmware protocol.
    Silabs(Value),
    /// Matter protocol.
    Matter(Value),
}

impl RoutedCommand {
    /// Protocol family this command targets.
    pub fn family(&self) -> ProtocolFamily {
        match self {
            Self::Lumi(_) => ProtocolFamily::Lumi,
            Self::Miot(_) => ProtocolFamily::Miot,
            Self::Silabs(_) => ProtocolFamily::Silabs,
            Self::Matter(_) => ProtocolFamily::Matter,
        }
    }

    /// Payload to hand to the adapter.
    pub fn payload(&self) -> &Value {
        match self {
            Self::Lumi(payload)
            | Self::Miot(payload)
            | Self::Silabs(payload)
            | Self::Matter(payload) => payload,
        }
    }

    /// Consume into the payload.
    pub fn into_payload(self) -> Value {
        match self {
            Self::Lumi(payload)
            | Self::Miot(payload)
            | Self::Silabs(payload)
            | Self::Matter(payload) => payload,
        }
    }

    /// Translate a caller payload into protocol-specific commands for the
    /// given device type.
    ///
    /// Hub and zigbee devices support multispec payloads: when more than one
    /// discriminator is present, each protocol receives a sub-payload
    /// filtered down to its own entries; when only one is present, the
    /// payload is forwarded unmodified. Mesh devices and groups always go to
    /// miot, matter devices to matter, both unmodified.
    pub fn plan(device_type: DeviceType, payload: &CommandPayload) -> Vec<RoutedCommand> {
        let mut routed = Vec::new();

        match device_type {
            DeviceType::Gateway => {
                if payload.contains_key(KEY_CMD) {
                    let lumi = if payload.contains_key(KEY_METHOD) {
                        json!({
                            "cmd": payload[KEY_CMD],
                            "did": "lumi.0",
                            "params": filter_params(payload, MARKER_RES_NAME),
                        })
                    } else {
                        Value::Object(payload.clone())
                    };
                    routed.push(RoutedCommand::Lumi(lumi));
                }

                if payload.contains_key(KEY_METHOD) {
                    let miot = if payload.contains_key(KEY_CMD) {
                        json!({
                            "method": payload[KEY_METHOD],
                            "params": filter_params(payload, MARKER_SIID),
                        })
                    } else {
                        Value::Object(payload.clone())
                    };
                    routed.push(RoutedCommand::Miot(miot));
                }
            }

            DeviceType::Zigbee => {
                if payload.contains_key(KEY_CMD) {
                    let lumi = if payload.contains_key(KEY_COMMANDS) {
                        json!({
                            "cmd": payload[KEY_CMD],
                            "did": payload.get("did").cloned().unwrap_or(Value::Null),
                            "params": payload.get("params").cloned().unwrap_or_else(|| json!([])),
                        })
                    } else {
                        Value::Object(payload.clone())
                    };
                    routed.push(RoutedCommand::Lumi(lumi));
                }

                if payload.contains_key(KEY_COMMANDS) {
                    let silabs = if payload.contains_key(KEY_CMD) {
                        json!({ "commands": payload[KEY_COMMANDS] })
                    } else {
                        Value::Object(payload.clone())
                    };
                    routed.push(RoutedCommand::Silabs(silabs));
                }
            }

            DeviceType::Mesh | DeviceType::Group => {
                routed.push(RoutedCommand::Miot(Value::Object(payload.clone())));
            }

            DeviceType::Matter => {
                routed.push(RoutedCommand::Matter(Value::Object(payload.clone())));
            }
        }

        routed
    }
}

/// Entries of the shared params list carrying the given marker key.
///
/// A missing or non-list params entry yields the empty list: a filtered
/// rebuild of an absent list can only be empty.
fn filter_params(payload: &CommandPayload, marker: &str) -> Vec<Value> {
    payload
        .get("params")
        .and_then(Value::as_array)
        .map(|params| {
            params
                .iter()
                .filter(|param| {
                    param
                        .as_object()
                        .is_some_and(|object| object.contains_key(marker))
                })
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}
