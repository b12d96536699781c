//! Wire shapes of catalog records as they arrive from a source.
//!
//! Catalog files have been published in both `snake_case` and `camelCase`
//! flavours, and scalar fields show up as either strings or numbers.
//! Every variant is accepted here so nothing downstream ever sees dual
//! naming; `super::normalize` turns these into the canonical types.

use serde::{Deserialize, Deserializer};

/// A scalar that may be encoded as a string, number or boolean.
#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Text(String),
    Int(i64),
    Float(f64),
    Flag(bool),
}

impl Loose {
    fn into_text(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Int(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Flag(b) => b.to_string(),
        }
    }

    fn into_flag(self) -> bool {
        match self {
            Self::Flag(b) => b,
            Self::Int(n) => n != 0,
            Self::Float(n) => n != 0.0,
            Self::Text(s) => matches!(s.trim(), "true" | "1" | "yes"),
        }
    }
}

fn loose_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Loose>::deserialize(deserializer)?
        .map(Loose::into_text)
        .unwrap_or_default())
}

fn loose_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Loose>::deserialize(deserializer)?.map(Loose::into_text))
}

fn loose_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Loose>::deserialize(deserializer)?
        .map(Loose::into_flag)
        .unwrap_or(false))
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTradePoint {
    #[serde(
        default,
        alias = "tradePoint",
        alias = "trade_point",
        deserialize_with = "loose_text"
    )]
    pub code: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSpeed {
    #[serde(default, deserialize_with = "loose_text")]
    pub value: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub unit: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub price: String,
    #[serde(default, alias = "fullPrice", deserialize_with = "loose_opt_text")]
    pub full_price: Option<String>,
    #[serde(
        default,
        alias = "promoMonths",
        alias = "promoPriceDurationMonths",
        deserialize_with = "loose_opt_text"
    )]
    pub promo_price_duration_months: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTariff {
    #[serde(default, deserialize_with = "loose_text")]
    pub id: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub name: String,
    #[serde(default)]
    pub speeds: Vec<RawSpeed>,

    /// Ready-made summary, present in already-normalized catalogs.
    #[serde(default, deserialize_with = "loose_opt_text")]
    pub features: Option<String>,

    #[serde(default, alias = "internetUnlimited", deserialize_with = "loose_flag")]
    pub internet_unlimited: bool,
    #[serde(
        default,
        alias = "mobileConnectionIncluded",
        deserialize_with = "loose_flag"
    )]
    pub mobile_connection_included: bool,
    #[serde(default, alias = "mobileInternetGb", deserialize_with = "loose_opt_text")]
    pub mobile_internet_gb: Option<String>,
    #[serde(default, alias = "mobileMinutes", deserialize_with = "loose_opt_text")]
    pub mobile_minutes: Option<String>,
    #[serde(default, alias = "mobileSms", deserialize_with = "loose_opt_text")]
    pub mobile_sms: Option<String>,
    #[serde(default, alias = "tvKion", deserialize_with = "loose_flag")]
    pub tv_kion: bool,
    #[serde(default, alias = "tvChannels", deserialize_with = "loose_opt_text")]
    pub tv_channels: Option<String>,

    #[serde(default, alias = "routerRental", deserialize_with = "loose_opt_text")]
    pub router_rental: Option<String>,
    #[serde(
        default,
        alias = "tvBoxRental",
        alias = "equipmentRentalFee",
        alias = "equipment_rental_fee",
        deserialize_with = "loose_opt_text"
    )]
    pub tv_box_rental: Option<String>,
    #[serde(default, alias = "connectionFee", deserialize_with = "loose_opt_text")]
    pub connection_fee: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_become_text() {
        let speed: RawSpeed =
            serde_json::from_str(r#"{"value": 300, "unit": "Мбит/с", "price": 700}"#).unwrap();
        assert_eq!(speed.value, "300");
        assert_eq!(speed.price, "700");
        assert!(speed.full_price.is_none());
    }

    #[test]
    fn test_camel_case_aliases() {
        let tariff: RawTariff = serde_json::from_str(
            r#"{
                "id": "t1",
                "name": "Тариф",
                "speeds": [],
                "tvBoxRental": "150 ₽/мес",
                "internetUnlimited": true,
                "mobileConnectionIncluded": "true"
            }"#,
        )
        .unwrap();
        assert_eq!(tariff.tv_box_rental.as_deref(), Some("150 ₽/мес"));
        assert!(tariff.internet_unlimited);
        assert!(tariff.mobile_connection_included);
    }

    #[test]
    fn test_null_fields_are_absent() {
        let tariff: RawTariff =
            serde_json::from_str(r#"{"id": "t1", "tv_channels": null, "tv_kion": null}"#).unwrap();
        assert!(tariff.tv_channels.is_none());
        assert!(!tariff.tv_kion);
        assert!(tariff.name.is_empty());
    }

    #[test]
    fn test_missing_keys_become_empty() {
        let point: RawTradePoint = serde_json::from_str(r#"{"address": "без кода"}"#).unwrap();
        assert!(point.code.is_empty());

        let speed: RawSpeed = serde_json::from_str(r#"{"unit": "Мбит/с", "price": 500}"#).unwrap();
        assert!(speed.value.is_empty());

        let tariff: RawTariff = serde_json::from_str(r#"{"name": "Без id"}"#).unwrap();
        assert!(tariff.id.is_empty());
    }
}
