//! Catalog loading tests
//!
//! Load the shipped demo catalogs and temporary files through the same
//! path the binary uses.

use std::fs;

use order_wizard::catalog::{Collection, FileSource};
use order_wizard::{load_catalog, Catalog, WizardConfig};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, body: &str) -> FileSource {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    FileSource::new(path)
}

// ============================================================================
// Demo Data
// ============================================================================

#[test]
fn test_demo_catalogs_load_cleanly() {
    let config = WizardConfig::default();
    let load = load_catalog(
        config.trade_point_source().as_ref(),
        config.tariff_source().as_ref(),
    );

    assert!(!load.is_degraded(), "issues: {:?}", load.issues);
    assert!(load.catalog.trade_point("TT-001").is_some());

    let tariff = load.catalog.tariff("home_internet").unwrap();
    assert_eq!(tariff.entry_speed().map(|s| s.price.as_str()), Some("500"));
    // "0 ₽/мес" means no rental is offered
    assert!(tariff.equipment_offer().is_none());

    let bundle = load.catalog.tariff("all_in_one").unwrap();
    assert_eq!(bundle.equipment_offer(), Some("100 ₽/мес"));
    assert!(bundle.speeds[0].has_promo());
    assert!(bundle.features.contains("Мобильная связь (30 ГБ, 800 мин, 200 SMS)"));
}

// ============================================================================
// Partial Failure
// ============================================================================

#[test]
fn test_missing_tariff_file_falls_back_alone() {
    let dir = TempDir::new().unwrap();
    let points = write(
        &dir,
        "points.json",
        r#"[{"tradePoint": "TT-9", "address": "Тула, ул. Советская, д. 1"}]"#,
    );
    let tariffs = FileSource::new(dir.path().join("absent.json"));

    let load = load_catalog(&points, &tariffs);
    assert_eq!(load.catalog.trade_points.len(), 1);
    assert_eq!(load.catalog.trade_points[0].code, "TT-9");
    assert_eq!(load.catalog.tariffs, Catalog::fallback().tariffs);
    assert!(load.degraded(Collection::Tariffs));
    assert!(!load.degraded(Collection::TradePoints));
}

#[test]
fn test_malformed_trade_points_fall_back_alone() {
    let dir = TempDir::new().unwrap();
    let points = write(&dir, "points.json", r#"{"code": "not an array"}"#);
    let tariffs = write(
        &dir,
        "tariffs.json",
        r#"[{"id": "t1", "name": "Тариф", "speeds": [{"value": 200, "unit": "Мбит/с", "price": 600}]}]"#,
    );

    let load = load_catalog(&points, &tariffs);
    assert_eq!(load.catalog.trade_points, Catalog::fallback().trade_points);
    assert_eq!(load.catalog.tariffs[0].id, "t1");
    assert_eq!(load.issues.len(), 1);
    assert_eq!(load.issues[0].collection, Collection::TradePoints);
}

#[test]
fn test_records_without_keys_are_dropped() {
    let dir = TempDir::new().unwrap();
    let points = write(
        &dir,
        "points.json",
        r#"[{"code": "", "address": "нет кода"}, {"code": "TT-2", "address": "Омск, ул. Ленина, д. 3"}]"#,
    );
    let tariffs = write(
        &dir,
        "tariffs.json",
        r#"[
            {"id": "empty", "name": "Без скоростей", "speeds": []},
            {"id": "ok", "name": "Рабочий", "speeds": [{"value": 100, "unit": "Мбит/с", "price": 400}]}
        ]"#,
    );

    let load = load_catalog(&points, &tariffs);
    assert!(!load.is_degraded());
    assert_eq!(load.catalog.trade_points.len(), 1);
    assert_eq!(load.catalog.tariffs.len(), 1);
    assert_eq!(load.catalog.tariffs[0].id, "ok");
}

#[test]
fn test_records_missing_key_fields_are_dropped_individually() {
    let dir = TempDir::new().unwrap();
    let points = write(
        &dir,
        "points.json",
        r#"[{"address": "без кода"}, {"code": "TT-1", "address": "Пермь, ул. Ленина, д. 5"}]"#,
    );
    let tariffs = write(
        &dir,
        "tariffs.json",
        r#"[
            {"name": "Без id", "speeds": [{"value": 100, "unit": "Мбит/с", "price": 400}]},
            {"id": "a", "name": "Неполный", "speeds": [{"unit": "Мбит/с", "price": 450}]},
            {"id": "b", "name": "Рабочий", "speeds": [
                {"unit": "Мбит/с", "price": 300},
                {"value": 200, "unit": "Мбит/с", "price": 500}
            ]}
        ]"#,
    );

    let load = load_catalog(&points, &tariffs);
    assert!(!load.is_degraded(), "issues: {:?}", load.issues);
    assert_eq!(load.catalog.trade_points.len(), 1);
    assert_eq!(load.catalog.trade_points[0].code, "TT-1");
    assert_eq!(load.catalog.tariffs.len(), 1);

    let tariff = &load.catalog.tariffs[0];
    assert_eq!(tariff.id, "b");
    assert_eq!(tariff.speeds.len(), 1);
    assert_eq!(tariff.entry_speed().map(|s| s.price.as_str()), Some("500"));
}

#[test]
fn test_empty_collections_fall_back() {
    let dir = TempDir::new().unwrap();
    let points = write(&dir, "points.json", "[]");
    let tariffs = write(&dir, "tariffs.json", "[]");

    let load = load_catalog(&points, &tariffs);
    assert_eq!(load.catalog, Catalog::fallback());
    assert_eq!(load.issues.len(), 2);
}
