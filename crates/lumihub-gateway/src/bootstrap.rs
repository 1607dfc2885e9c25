//! Per-cycle bootstrap: handshake, capability gating, inventory reads and
//! listener registration.

use tracing::{debug, error};

use lumihub_core::{EventKind, GatewayError, Result};

use crate::adapter::AdapterRegistry;
use crate::dispatcher::EventDispatcher;
use crate::session::{
    GatewayCapabilities, GatewayInfo, GatewayTransport, MIN_MGL03_VERSION, MODEL_MGL001,
    MODEL_MGL03,
};

/// Run one bootstrap against the hub.
///
/// All shell work happens inside a single session scope; the session is
/// released on every exit path. Listeners are registered only after every
/// inventory read succeeded, so a failed bootstrap leaves the dispatcher
/// empty. Any error aborts the whole bootstrap and is reported to the
/// supervisor as a bootstrap-class failure.
pub async fn prepare(
    transport: &dyn GatewayTransport,
    registry: &AdapterRegistry,
    dispatcher: &EventDispatcher,
) -> Result<GatewayInfo> {
    // Stale listeners from a previous cycle must not fire.
    dispatcher.clear().await;

    let session = transport.open_session().await?;

    if !session.only_one().await? {
        debug!("connection from a second manager detected");
        return Err(GatewayError::Conflict);
    }

    let identity = session.get_miio_info().await?;
    let version = session.get_version().await?;

    if identity.model == MODEL_MGL03 && version.as_str() < MIN_MGL03_VERSION {
        error!(model = %identity.model, %version, "unsupported firmware");
        return Err(GatewayError::UnsupportedFirmware {
            model: identity.model,
            version,
        });
    }

    let capabilities = GatewayCapabilities {
        bluetooth: session.supports_bluetooth(),
        matter: identity.model == MODEL_MGL001,
    };

    for adapter in registry.iter() {
        let family = adapter.family();
        if !capabilities.supports(family) {
            continue;
        }
        let devices = adapter
            .read_devices(session.as_ref())
            .await
            .map_err(|error| GatewayError::Inventory {
                family,
                message: error.to_string(),
            })?;
        debug!(%family, count = devices.len(), "inventory read");
    }

    drop(session);

    for adapter in registry.iter() {
        let family = adapter.family();
        if !capabilities.supports(family) {
            continue;
        }
        let listener = adapter.clone();
        dispatcher
            .add_listener(EventKind::MqttPublish, format!("{family}:mqtt"), move |event| {
                let listener = listener.clone();
                Box::pin(async move { listener.on_event(&event).await })
            })
            .await;
        if adapter.polls() {
            let listener = adapter.clone();
            dispatcher
                .add_listener(EventKind::Timer, format!("{family}:timer"), move |event| {
                    let listener = listener.clone();
                    Box::pin(async move { listener.on_event(&event).await })
                })
                .await;
        }
    }

    Ok(GatewayInfo {
        model: identity.model,
        version,
        capabilities,
    })
}
