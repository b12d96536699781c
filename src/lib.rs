//! Order Wizard Library
//!
//! A step-by-step ordering flow for home connectivity tariffs: trade point,
//! tariff, speed and options, contact details, confirmation. The wizard
//! core (`wizard`, `pricing`, `submission`) has no terminal dependency; the
//! `app` and `ui` modules put a ratatui front end on top of it.

pub mod app;
pub mod catalog;
pub mod cli;
pub mod components;
pub mod config;
pub mod error;
pub mod logging;
pub mod pricing;
pub mod submission;
pub mod theme;
pub mod types;
pub mod ui;
pub mod wizard;

// Re-export main types for convenience
pub use catalog::{load_catalog, Catalog, CatalogLoad, SpeedTier, Tariff, TradePoint};
pub use config::{BridgeConfig, WizardConfig};
pub use error::{OrderWizardError, Result};
pub use pricing::{compute_total, Amount};
pub use submission::{Delivery, Dispatcher, OrderPayload, SubmissionTransport};
pub use types::{ContactField, WizardStep};
pub use wizard::{Advance, Retreat, StepChange, UserContact, WizardSession, WizardSnapshot};
