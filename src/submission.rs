//! Order payload assembly and hand-off.
//!
//! The payload is built once, at confirmation, from the session's
//! selections and contact details. It is then handed to a transport
//! exactly once: there is no retry, queueing or delivery confirmation.
//! When no bridge is configured, or the bridge fails, a local
//! acknowledgment stands in so the customer always gets an answer.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::error::{OrderWizardError, Result};
use crate::pricing::{self, Amount};
use crate::wizard::{UserContact, WizardSession};

/// Acknowledgment shown when the order could not be handed to a bridge.
pub const FALLBACK_MESSAGE: &str = "Заявка отправлена! (тестовый режим)";
/// Acknowledgment shown after a successful hand-off.
pub const DELIVERED_MESSAGE: &str = "Заявка отправлена!";

/// The immutable order record handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub trade_point_code: String,
    pub trade_point_address: String,
    pub tariff_id: String,
    pub tariff_name: String,
    /// `"{value} {unit}"` of the chosen speed tier.
    pub speed_description: String,
    pub monthly_price: Amount,
    pub wants_equipment: bool,
    #[serde(flatten)]
    pub contact: UserContact,
}

/// Assemble the order from a session that has passed every step.
///
/// # Errors
///
/// `IncompleteOrder` if a required selection is missing. Step gating makes
/// this unreachable through `WizardSession::advance`.
pub fn build(session: &WizardSession) -> Result<OrderPayload> {
    let trade_point = session
        .selected_trade_point()
        .ok_or(OrderWizardError::IncompleteOrder("trade point"))?;
    let tariff = session
        .selected_tariff()
        .ok_or(OrderWizardError::IncompleteOrder("tariff"))?;
    let speed = session
        .selected_speed()
        .ok_or(OrderWizardError::IncompleteOrder("speed"))?;

    Ok(OrderPayload {
        trade_point_code: trade_point.code.clone(),
        trade_point_address: trade_point.address.clone(),
        tariff_id: tariff.id.clone(),
        tariff_name: tariff.name.clone(),
        speed_description: speed.description(),
        monthly_price: pricing::compute_for_tariff(tariff, speed, session.wants_equipment()),
        wants_equipment: session.wants_equipment(),
        contact: session.contact().trimmed(),
    })
}

/// Somewhere an order can be handed off to.
pub trait SubmissionTransport: Send + Sync {
    /// Hand the payload off. Returns the acknowledgment to show.
    fn submit(&self, payload: &OrderPayload) -> Result<String>;

    /// Human-readable destination for logs.
    fn describe(&self) -> String;
}

/// POSTs the payload as JSON to a host bridge endpoint.
#[derive(Debug, Clone)]
pub struct HttpBridge {
    url: String,
}

impl HttpBridge {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl SubmissionTransport for HttpBridge {
    fn submit(&self, payload: &OrderPayload) -> Result<String> {
        match ureq::post(&self.url).send_json(payload) {
            Ok(_) => Ok(DELIVERED_MESSAGE.to_string()),
            Err(ureq::Error::Status(code, resp)) => Err(OrderWizardError::transport(format!(
                "request to {} failed with a code {}",
                resp.get_url(),
                code
            ))),
            Err(e) => Err(OrderWizardError::transport(e.to_string())),
        }
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Writes the payload as pretty JSON for a host process to pick up.
#[derive(Debug, Clone)]
pub struct FileBridge {
    path: PathBuf,
}

impl FileBridge {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SubmissionTransport for FileBridge {
    fn submit(&self, payload: &OrderPayload) -> Result<String> {
        let json = serde_json::to_string_pretty(payload)?;
        std::fs::write(&self.path, json)?;
        Ok(DELIVERED_MESSAGE.to_string())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Stand-in used when no bridge is available: logs the order and
/// acknowledges it locally.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalAcknowledgment;

impl SubmissionTransport for LocalAcknowledgment {
    fn submit(&self, payload: &OrderPayload) -> Result<String> {
        let json = serde_json::to_string(payload)?;
        info!("Order (not delivered): {}", json);
        Ok(FALLBACK_MESSAGE.to_string())
    }

    fn describe(&self) -> String {
        "local acknowledgment".to_string()
    }
}

/// Outcome of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The bridge accepted the order.
    Delivered { via: String, message: String },
    /// No bridge, or the bridge failed; acknowledged locally.
    Fallback {
        reason: Option<String>,
        message: String,
    },
}

impl Delivery {
    /// Acknowledgment to show the customer.
    pub fn message(&self) -> &str {
        match self {
            Self::Delivered { message, .. } | Self::Fallback { message, .. } => message,
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

/// Routes an order to the configured bridge, falling back to a local
/// acknowledgment.
pub struct Dispatcher {
    bridge: Option<Box<dyn SubmissionTransport>>,
    fallback: LocalAcknowledgment,
}

impl Dispatcher {
    pub fn new(bridge: Option<Box<dyn SubmissionTransport>>) -> Self {
        Self {
            bridge,
            fallback: LocalAcknowledgment,
        }
    }

    /// Dispatcher with no bridge; every order is acknowledged locally.
    pub fn local() -> Self {
        Self::new(None)
    }

    pub fn has_bridge(&self) -> bool {
        self.bridge.is_some()
    }

    /// Hand the payload off once. Never fails.
    pub fn dispatch(&self, payload: &OrderPayload) -> Delivery {
        let reason = match &self.bridge {
            Some(bridge) => match bridge.submit(payload) {
                Ok(message) => {
                    info!("Order delivered via {}", bridge.describe());
                    return Delivery::Delivered {
                        via: bridge.describe(),
                        message,
                    };
                }
                Err(e) => {
                    warn!("Bridge {} failed: {}", bridge.describe(), e);
                    Some(e.to_string())
                }
            },
            None => None,
        };

        let message = self.fallback.submit(payload).unwrap_or_else(|e| {
            error!("Local acknowledgment failed: {}", e);
            FALLBACK_MESSAGE.to_string()
        });
        Delivery::Fallback { reason, message }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("bridge", &self.bridge.as_ref().map(|b| b.describe()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    struct BrokenBridge;

    impl SubmissionTransport for BrokenBridge {
        fn submit(&self, _payload: &OrderPayload) -> Result<String> {
            Err(OrderWizardError::transport("bridge offline"))
        }

        fn describe(&self) -> String {
            "broken".to_string()
        }
    }

    fn payload() -> OrderPayload {
        OrderPayload {
            trade_point_code: "DEFAULT".to_string(),
            trade_point_address: "Офис МТС".to_string(),
            tariff_id: "home_internet".to_string(),
            tariff_name: "Домашний интернет".to_string(),
            speed_description: "100 Мбит/с".to_string(),
            monthly_price: Amount(500),
            wants_equipment: false,
            contact: UserContact::default(),
        }
    }

    #[test]
    fn test_build_requires_selections() {
        let session = WizardSession::new(Catalog::fallback());
        let err = build(&session).unwrap_err();
        assert!(matches!(err, OrderWizardError::IncompleteOrder("trade point")));
    }

    #[test]
    fn test_payload_uses_camel_case_and_flat_contact() {
        let value = serde_json::to_value(payload()).unwrap();
        assert_eq!(value["tradePointCode"], "DEFAULT");
        assert_eq!(value["speedDescription"], "100 Мбит/с");
        assert_eq!(value["monthlyPrice"], 500);
        assert_eq!(value["wantsEquipment"], false);
        assert_eq!(value["apartment"], "");
        assert!(value.get("contact").is_none());
    }

    #[test]
    fn test_no_bridge_falls_back() {
        let delivery = Dispatcher::local().dispatch(&payload());
        assert_eq!(
            delivery,
            Delivery::Fallback {
                reason: None,
                message: FALLBACK_MESSAGE.to_string()
            }
        );
    }

    #[test]
    fn test_failed_bridge_falls_back_with_reason() {
        let dispatcher = Dispatcher::new(Some(Box::new(BrokenBridge)));
        let delivery = dispatcher.dispatch(&payload());
        assert!(!delivery.is_delivered());
        assert_eq!(delivery.message(), FALLBACK_MESSAGE);
        match delivery {
            Delivery::Fallback { reason, .. } => {
                assert!(reason.unwrap().contains("bridge offline"));
            }
            other => panic!("expected fallback, got {:?}", other),
        }
    }

    #[test]
    fn test_file_bridge_writes_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("order.json");
        let dispatcher = Dispatcher::new(Some(Box::new(FileBridge::new(&path))));
        let delivery = dispatcher.dispatch(&payload());
        assert!(delivery.is_delivered());
        assert_eq!(delivery.message(), DELIVERED_MESSAGE);

        let written: OrderPayload =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, payload());
    }
}
