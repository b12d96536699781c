//! Trade point and tariff catalogs.
//!
//! This module owns the canonical record shapes the wizard works with and
//! the single normalization step that produces them from whatever a
//! catalog source delivered.
//!
//! # Module Structure
//! - `raw` - wire shapes, tolerant of naming and scalar-type variants
//! - `source` - where catalogs come from and the concurrent loader
//! - main module - canonical types, normalization, fallbacks

mod raw;
pub mod source;

pub use source::{
    load_catalog, CatalogIssue, CatalogLoad, CatalogSource, Collection, FileSource, HttpSource,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{OrderWizardError, Result};
use raw::{RawSpeed, RawTariff, RawTradePoint};

/// Equipment fee value that catalogs use to mean "no rental offered".
const FREE_EQUIPMENT_FEE: &str = "0 ₽/мес";

/// A physical service location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradePoint {
    /// Short identifying code (e.g. `TT-001`).
    pub code: String,
    /// Full postal address.
    pub address: String,
}

impl TradePoint {
    pub fn new(code: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            address: address.into(),
        }
    }

    /// Address without its leading locality, i.e. everything after the
    /// first `", "`. Addresses without a separator are returned whole.
    pub fn short_address(&self) -> &str {
        match self.address.find(", ") {
            Some(idx) => &self.address[idx + 2..],
            None => &self.address,
        }
    }
}

/// One priced bandwidth option of a tariff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedTier {
    pub value: String,
    pub unit: String,
    /// Monthly price as published (e.g. `"700"`).
    pub price: String,
    /// Price after the promotional period; equals `price` when there is none.
    pub full_price: String,
    /// Length of the promotional period in months, empty when there is none.
    pub promo_months: String,
}

impl SpeedTier {
    pub fn new(value: impl Into<String>, unit: impl Into<String>, price: impl Into<String>) -> Self {
        let price = price.into();
        Self {
            value: value.into(),
            unit: unit.into(),
            full_price: price.clone(),
            price,
            promo_months: String::new(),
        }
    }

    /// `"{value} {unit}"`, as shown to the customer and sent in the order.
    pub fn description(&self) -> String {
        format!("{} {}", self.value, self.unit)
    }

    /// Whether a promotional price applies for a limited period.
    pub fn has_promo(&self) -> bool {
        !self.promo_months.is_empty() && self.full_price != self.price
    }
}

/// A named service plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tariff {
    pub id: String,
    pub name: String,
    /// Never empty; index 0 is the "from" price shown in listings.
    pub speeds: Vec<SpeedTier>,
    /// Human-readable summary of what the plan includes.
    pub features: String,
    /// Monthly equipment (TV box) rental, if the plan offers one.
    pub equipment_rental_fee: Option<String>,
    pub router_rental: String,
    pub connection_fee: String,
}

impl Tariff {
    /// The cheapest-listed tier, shown as "from" in the tariff list.
    pub fn entry_speed(&self) -> Option<&SpeedTier> {
        self.speeds.first()
    }

    /// Position of `tier` among this tariff's own speed tiers.
    pub fn speed_index(&self, tier: &SpeedTier) -> Option<usize> {
        self.speeds.iter().position(|own| own == tier)
    }

    /// Equipment fee to offer on the speed step, if any.
    ///
    /// Empty fees and the catalog's explicit zero fee hide the offer.
    pub fn equipment_offer(&self) -> Option<&str> {
        self.equipment_rental_fee
            .as_deref()
            .filter(|fee| !fee.trim().is_empty() && *fee != FREE_EQUIPMENT_FEE)
    }
}

/// The combined set of trade points and tariffs available to a session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub trade_points: Vec<TradePoint>,
    pub tariffs: Vec<Tariff>,
}

impl Catalog {
    pub fn new(trade_points: Vec<TradePoint>, tariffs: Vec<Tariff>) -> Self {
        Self {
            trade_points,
            tariffs,
        }
    }

    /// Catalog used when neither collection could be loaded.
    pub fn fallback() -> Self {
        Self::new(fallback_trade_points(), fallback_tariffs())
    }

    pub fn trade_point(&self, code: &str) -> Option<&TradePoint> {
        self.trade_points.iter().find(|tp| tp.code == code)
    }

    pub fn tariff(&self, id: &str) -> Option<&Tariff> {
        self.tariffs.iter().find(|t| t.id == id)
    }
}

/// Single-entry trade point list used when the real one is unavailable.
pub fn fallback_trade_points() -> Vec<TradePoint> {
    vec![TradePoint::new("DEFAULT", "Офис МТС")]
}

/// Single-entry tariff list used when the real one is unavailable.
pub fn fallback_tariffs() -> Vec<Tariff> {
    vec![Tariff {
        id: "home_internet".to_string(),
        name: "Домашний интернет".to_string(),
        speeds: vec![SpeedTier::new("100", "Мбит/с", "500")],
        features: "Интернет".to_string(),
        equipment_rental_fee: None,
        router_rental: String::new(),
        connection_fee: String::new(),
    }]
}

/// Parse and normalize a trade point collection.
///
/// # Errors
///
/// `CatalogUnavailable` if the document is not a JSON array of trade point
/// records or if no usable record remains.
pub fn parse_trade_points(json: &str) -> Result<Vec<TradePoint>> {
    let raw: Vec<RawTradePoint> = serde_json::from_str(json)
        .map_err(|e| OrderWizardError::catalog(Collection::TradePoints.name(), e.to_string()))?;

    let points: Vec<TradePoint> = raw
        .into_iter()
        .filter_map(|tp| {
            let code = tp.code.trim().to_string();
            if code.is_empty() {
                warn!("Dropping trade point without a code");
                return None;
            }
            Some(TradePoint::new(code, tp.address.trim()))
        })
        .collect();

    if points.is_empty() {
        return Err(OrderWizardError::catalog(
            Collection::TradePoints.name(),
            "no usable trade points",
        ));
    }
    debug!("Normalized {} trade points", points.len());
    Ok(points)
}

/// Parse and normalize a tariff collection.
///
/// Speed tiers without a value are dropped, then tariffs left without any
/// speed tier: every listed tariff must have a "from" price.
///
/// # Errors
///
/// `CatalogUnavailable` if the document is not a JSON array of tariff
/// records or if no usable record remains.
pub fn parse_tariffs(json: &str) -> Result<Vec<Tariff>> {
    let raw: Vec<RawTariff> = serde_json::from_str(json)
        .map_err(|e| OrderWizardError::catalog(Collection::Tariffs.name(), e.to_string()))?;

    let tariffs: Vec<Tariff> = raw.into_iter().filter_map(normalize_tariff).collect();

    if tariffs.is_empty() {
        return Err(OrderWizardError::catalog(
            Collection::Tariffs.name(),
            "no usable tariffs",
        ));
    }
    debug!("Normalized {} tariffs", tariffs.len());
    Ok(tariffs)
}

fn normalize_tariff(raw: RawTariff) -> Option<Tariff> {
    if raw.id.trim().is_empty() {
        warn!("Dropping tariff without an id");
        return None;
    }
    let features = match raw.features.as_deref().map(str::trim) {
        Some(ready) if !ready.is_empty() => ready.to_string(),
        _ => build_features(&raw),
    };

    let speeds: Vec<SpeedTier> = raw.speeds.into_iter().filter_map(normalize_speed).collect();
    if speeds.is_empty() {
        warn!("Dropping tariff {} without speed tiers", raw.id);
        return None;
    }

    Some(Tariff {
        name: if raw.name.trim().is_empty() {
            raw.id.clone()
        } else {
            raw.name
        },
        id: raw.id,
        speeds,
        features,
        equipment_rental_fee: non_empty(raw.tv_box_rental),
        router_rental: raw.router_rental.unwrap_or_default(),
        connection_fee: raw.connection_fee.unwrap_or_default(),
    })
}

fn normalize_speed(raw: RawSpeed) -> Option<SpeedTier> {
    let value = raw.value.trim().to_string();
    if value.is_empty() {
        warn!("Dropping speed tier without a value");
        return None;
    }

    let full_price = non_empty(raw.full_price).unwrap_or_else(|| raw.price.clone());
    Some(SpeedTier {
        value,
        unit: raw.unit,
        price: raw.price,
        full_price,
        promo_months: raw.promo_price_duration_months.unwrap_or_default(),
    })
}

/// Synthesize the one-line feature summary from the tariff's flags.
fn build_features(raw: &RawTariff) -> String {
    let mut features = Vec::new();

    if raw.internet_unlimited {
        features.push("Безлимитный интернет".to_string());
    }

    if raw.mobile_connection_included {
        let details: Vec<String> = [
            (&raw.mobile_internet_gb, "ГБ"),
            (&raw.mobile_minutes, "мин"),
            (&raw.mobile_sms, "SMS"),
        ]
        .into_iter()
        .filter_map(|(value, suffix)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| format!("{v} {suffix}"))
        })
        .collect();

        if details.is_empty() {
            features.push("Мобильная связь".to_string());
        } else {
            features.push(format!("Мобильная связь ({})", details.join(", ")));
        }
    }

    if raw.tv_kion {
        features.push("KION".to_string());
    }
    if let Some(channels) = raw.tv_channels.as_deref().filter(|c| !c.is_empty()) {
        features.push(channels.to_string());
    }

    if features.is_empty() {
        "Интернет".to_string()
    } else {
        features.join(" • ")
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
