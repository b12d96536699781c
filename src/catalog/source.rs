//! Catalog sources and the session-start loader.
//!
//! Both collections are fetched concurrently and joined before the wizard
//! becomes interactive. Each collection fails independently: a broken
//! tariff feed never costs the trade point list, and vice versa. Failures
//! are recorded as `CatalogIssue`s and replaced by single-entry fallbacks.

use std::fmt;
use std::path::{Path, PathBuf};
use std::thread;

use tracing::{error, info, warn};

use super::{
    fallback_tariffs, fallback_trade_points, parse_tariffs, parse_trade_points, Catalog, Tariff,
    TradePoint,
};
use crate::error::{OrderWizardError, Result};

/// The two independently loaded catalog collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    TradePoints,
    Tariffs,
}

impl Collection {
    pub const fn name(self) -> &'static str {
        match self {
            Self::TradePoints => "trade points",
            Self::Tariffs => "tariffs",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Somewhere a catalog document can be fetched from.
///
/// Implementations return the raw document; parsing and normalization
/// happen in the loader so every source gets identical treatment.
pub trait CatalogSource: Send + Sync {
    /// Fetch the raw JSON document.
    fn fetch(&self) -> anyhow::Result<String>;

    /// Human-readable location for logs.
    fn describe(&self) -> String;
}

/// A catalog stored as a JSON file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for FileSource {
    fn fetch(&self) -> anyhow::Result<String> {
        use anyhow::Context;

        std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read catalog from {:?}", self.path))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// A catalog served over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl CatalogSource for HttpSource {
    fn fetch(&self) -> anyhow::Result<String> {
        match ureq::get(&self.url).call() {
            Ok(resp) => Ok(resp.into_string()?),
            Err(ureq::Error::Status(code, resp)) => {
                anyhow::bail!(
                    "request to {} failed with a code {}",
                    resp.get_url(),
                    code
                )
            }
            Err(e) => anyhow::bail!(e),
        }
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Build a source from a location string: `http://` and `https://` URLs
/// are fetched over the network, anything else is read as a file path.
pub fn source_for(location: &str) -> Box<dyn CatalogSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpSource::new(location))
    } else {
        Box::new(FileSource::new(location))
    }
}

/// A collection that could not be loaded and was replaced by its fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogIssue {
    pub collection: Collection,
    pub reason: String,
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} unavailable: {}", self.collection, self.reason)
    }
}

/// Result of the session-start catalog load.
#[derive(Debug, Clone)]
pub struct CatalogLoad {
    /// Always usable: degraded collections hold their fallback entry.
    pub catalog: Catalog,
    /// One entry per collection that fell back.
    pub issues: Vec<CatalogIssue>,
}

impl CatalogLoad {
    pub fn is_degraded(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn degraded(&self, collection: Collection) -> bool {
        self.issues.iter().any(|i| i.collection == collection)
    }
}

fn fetch_trade_points(source: &dyn CatalogSource) -> Result<Vec<TradePoint>> {
    let body = source
        .fetch()
        .map_err(|e| OrderWizardError::catalog(Collection::TradePoints.name(), format!("{e:#}")))?;
    parse_trade_points(&body)
}

fn fetch_tariffs(source: &dyn CatalogSource) -> Result<Vec<Tariff>> {
    let body = source
        .fetch()
        .map_err(|e| OrderWizardError::catalog(Collection::Tariffs.name(), format!("{e:#}")))?;
    parse_tariffs(&body)
}

/// Resolve one collection's outcome, substituting the fallback on failure.
fn settle<T>(
    collection: Collection,
    source: &dyn CatalogSource,
    outcome: thread::Result<Result<Vec<T>>>,
    fallback: fn() -> Vec<T>,
    issues: &mut Vec<CatalogIssue>,
) -> Vec<T> {
    let reason = match outcome {
        Ok(Ok(records)) => {
            info!(
                "Loaded {} {} from {}",
                records.len(),
                collection,
                source.describe()
            );
            return records;
        }
        Ok(Err(OrderWizardError::CatalogUnavailable { reason, .. })) => reason,
        Ok(Err(e)) => e.to_string(),
        Err(_) => "loader thread panicked".to_string(),
    };

    warn!(
        "Failed to load {} from {}: {}; using fallback",
        collection,
        source.describe(),
        reason
    );
    issues.push(CatalogIssue { collection, reason });
    fallback()
}

/// Fetch both collections concurrently and normalize them.
///
/// Never fails: any collection that cannot be fetched or parsed is replaced
/// by its single-entry fallback and reported in `CatalogLoad::issues`.
pub fn load_catalog(
    trade_points: &dyn CatalogSource,
    tariffs: &dyn CatalogSource,
) -> CatalogLoad {
    info!(
        "Loading catalog: trade points from {}, tariffs from {}",
        trade_points.describe(),
        tariffs.describe()
    );

    let (tp_outcome, tariff_outcome) = thread::scope(|scope| {
        let tp_handle = scope.spawn(|| fetch_trade_points(trade_points));
        let tariff_handle = scope.spawn(|| fetch_tariffs(tariffs));
        (tp_handle.join(), tariff_handle.join())
    });

    let mut issues = Vec::new();
    let trade_points = settle(
        Collection::TradePoints,
        trade_points,
        tp_outcome,
        fallback_trade_points,
        &mut issues,
    );
    let tariffs = settle(
        Collection::Tariffs,
        tariffs,
        tariff_outcome,
        fallback_tariffs,
        &mut issues,
    );

    if issues.len() == 2 {
        error!("Both catalog collections unavailable; wizard runs on fallbacks only");
    }

    CatalogLoad {
        catalog: Catalog::new(trade_points, tariffs),
        issues,
    }
}
