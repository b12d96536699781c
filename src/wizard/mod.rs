//! Order wizard state machine.
//!
//! `WizardSession` is the single owner of one customer's progress through
//! the order flow. It enforces step gating and the selection invariants and
//! publishes a `WizardSnapshot` to every subscriber after each mutation.
//!
//! # Design Principles
//!
//! - **No Global State**: one session per wizard run, passed explicitly
//! - **Gated Forward Moves**: leaving a step forwards requires its predicate
//! - **No Stale Selections**: speed tiers are stored as an index into the
//!   selected tariff, and changing the tariff clears the speed
//! - **Silent No-ops**: out-of-range or unreachable navigation is ignored,
//!   not reported as an error
//!
//! # Step Flow
//!
//! ```text
//! TradePointSelection -> TariffSelection -> SpeedAndOptions -> ContactInfo -> Confirmation
//!                                                                               |
//!                                                                     advance() submits
//! ```

pub mod snapshot;
pub mod validation;

pub use snapshot::WizardSnapshot;

use std::sync::mpsc::{self, Receiver, Sender};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::catalog::{Catalog, SpeedTier, Tariff, TradePoint};
use crate::pricing::{self, Amount};
use crate::submission::{self, OrderPayload};
use crate::types::{ContactField, WizardStep};

/// Contact details entered on the `ContactInfo` step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserContact {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub city: String,
    pub street: String,
    pub house: String,
    pub apartment: String,
}

impl UserContact {
    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Phone => &self.phone,
            ContactField::Email => &self.email,
            ContactField::City => &self.city,
            ContactField::Street => &self.street,
            ContactField::House => &self.house,
            ContactField::Apartment => &self.apartment,
        }
    }

    pub fn get_mut(&mut self, field: ContactField) -> &mut String {
        match field {
            ContactField::Name => &mut self.name,
            ContactField::Phone => &mut self.phone,
            ContactField::Email => &mut self.email,
            ContactField::City => &mut self.city,
            ContactField::Street => &mut self.street,
            ContactField::House => &mut self.house,
            ContactField::Apartment => &mut self.apartment,
        }
    }

    /// Copy with every field trimmed.
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            city: self.city.trim().to_string(),
            street: self.street.trim().to_string(),
            house: self.house.trim().to_string(),
            apartment: self.apartment.trim().to_string(),
        }
    }

    /// Postal address for the summary screen, e.g.
    /// `г. Москва, ул. Ленина, д. 1, кв. 5`. Blank parts are left out.
    pub fn address_line(&self) -> String {
        [
            ("г.", &self.city),
            ("ул.", &self.street),
            ("д.", &self.house),
            ("кв.", &self.apartment),
        ]
        .into_iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(prefix, value)| format!("{} {}", prefix, value.trim()))
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Result of `go_to_step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepChange {
    Moved { from: WizardStep, to: WizardStep },
    /// Target out of range, unreachable, or already current.
    Unchanged,
}

/// Result of `advance`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Moved forward to the contained step.
    Moved(WizardStep),
    /// The current step's predicate failed; nothing changed.
    Blocked(WizardStep),
    /// Confirmation passed; the order is ready for the transport.
    Submit(OrderPayload),
}

/// Result of `retreat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retreat {
    /// Moved back to the contained step.
    Moved(WizardStep),
    /// Already at the first step: the host should close the wizard.
    Exit,
}

/// One customer's progress through the order flow.
#[derive(Debug)]
pub struct WizardSession {
    catalog: Catalog,
    step: WizardStep,
    trade_point: Option<usize>,
    tariff: Option<usize>,
    /// Index into the selected tariff's speed tiers.
    speed: Option<usize>,
    wants_equipment: bool,
    contact: UserContact,
    /// Cached monthly total; refreshed whenever a priced input changes.
    monthly_total: Option<Amount>,
    subscribers: Vec<Sender<WizardSnapshot>>,
}

impl WizardSession {
    /// Start a session at the first step with nothing selected.
    pub fn new(catalog: Catalog) -> Self {
        info!(
            "Starting wizard session with {} trade points and {} tariffs",
            catalog.trade_points.len(),
            catalog.tariffs.len()
        );
        Self {
            catalog,
            step: WizardStep::FIRST,
            trade_point: None,
            tariff: None,
            speed: None,
            wants_equipment: false,
            contact: UserContact::default(),
            monthly_total: None,
            subscribers: Vec::new(),
        }
    }

    /// Register for post-mutation snapshots.
    ///
    /// The current snapshot is delivered immediately so a renderer has
    /// something to draw before the first input.
    pub fn subscribe(&mut self) -> Receiver<WizardSnapshot> {
        let (tx, rx) = mpsc::channel();
        // A fresh channel cannot be disconnected yet
        let _ = tx.send(self.snapshot());
        self.subscribers.push(tx);
        rx
    }

    /// Read-only projection of the current state.
    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot::capture(self)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[inline]
    pub fn current_step(&self) -> WizardStep {
        self.step
    }

    pub fn selected_trade_point(&self) -> Option<&TradePoint> {
        self.trade_point.and_then(|i| self.catalog.trade_points.get(i))
    }

    pub fn selected_tariff(&self) -> Option<&Tariff> {
        self.tariff.and_then(|i| self.catalog.tariffs.get(i))
    }

    pub fn selected_speed(&self) -> Option<&SpeedTier> {
        let tariff = self.selected_tariff()?;
        self.speed.and_then(|i| tariff.speeds.get(i))
    }

    /// Index of the selected speed tier within the selected tariff.
    pub fn selected_speed_index(&self) -> Option<usize> {
        self.speed
    }

    #[inline]
    pub fn wants_equipment(&self) -> bool {
        self.wants_equipment
    }

    pub fn contact(&self) -> &UserContact {
        &self.contact
    }

    /// Monthly total as of the last priced change, if a speed is selected.
    pub fn monthly_total(&self) -> Option<Amount> {
        self.monthly_total
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Jump to step `n` (1-indexed).
    ///
    /// Requests outside `1..=TOTAL_STEPS`, or past the highest step the
    /// current selections allow, are ignored.
    pub fn go_to_step(&mut self, n: i64) -> StepChange {
        let Some(target) = WizardStep::from_number(n) else {
            debug!("Ignoring navigation to out-of-range step {}", n);
            return StepChange::Unchanged;
        };

        let reachable = validation::highest_reachable(self);
        if target > reachable {
            debug!(
                "Ignoring navigation to {} (highest reachable is {})",
                target, reachable
            );
            return StepChange::Unchanged;
        }
        if target == self.step {
            return StepChange::Unchanged;
        }

        let from = self.step;
        self.step = target;
        if matches!(
            target,
            WizardStep::SpeedAndOptions | WizardStep::Confirmation
        ) {
            self.recompute_derived();
        }
        debug!("Step {} -> {}", from, target);
        self.publish();
        StepChange::Moved { from, to: target }
    }

    /// Move forward if the current step validates.
    ///
    /// At the confirmation step a successful advance produces the order
    /// payload instead of a step change.
    pub fn advance(&mut self) -> Advance {
        let current = self.step;
        if !validation::validate(current, self) {
            debug!("Advance blocked at {}", current);
            return Advance::Blocked(current);
        }

        match current.next() {
            Some(next) => match self.go_to_step(i64::from(next.number())) {
                StepChange::Moved { to, .. } => Advance::Moved(to),
                StepChange::Unchanged => Advance::Blocked(current),
            },
            None => match submission::build(self) {
                Ok(payload) => {
                    info!(
                        "Order ready: tariff {} at {} for {}",
                        payload.tariff_id, payload.trade_point_code, payload.monthly_price
                    );
                    Advance::Submit(payload)
                }
                Err(e) => {
                    error!("Confirmation passed with an incomplete order: {}", e);
                    Advance::Blocked(current)
                }
            },
        }
    }

    /// Move back one step. Always permitted; at the first step this asks
    /// the host to exit instead.
    pub fn retreat(&mut self) -> Retreat {
        match self.step.previous() {
            Some(previous) => {
                let from = self.step;
                self.step = previous;
                debug!("Step {} -> {} (back)", from, previous);
                self.publish();
                Retreat::Moved(previous)
            }
            None => {
                info!("Back pressed on the first step; requesting exit");
                Retreat::Exit
            }
        }
    }

    // =========================================================================
    // Selections
    // =========================================================================

    /// Select a trade point from the catalog. Returns `false` (and changes
    /// nothing) if the entry is not in the catalog.
    pub fn select_trade_point(&mut self, entry: &TradePoint) -> bool {
        self.select_trade_point_by_code(&entry.code)
    }

    pub fn select_trade_point_by_code(&mut self, code: &str) -> bool {
        let Some(idx) = self.catalog.trade_points.iter().position(|tp| tp.code == code) else {
            debug!("Unknown trade point {}", code);
            return false;
        };
        self.trade_point = Some(idx);
        self.after_mutation();
        true
    }

    /// Select a tariff. Any selected speed is cleared, even when the same
    /// tariff is selected again.
    pub fn select_tariff(&mut self, entry: &Tariff) -> bool {
        self.select_tariff_by_id(&entry.id)
    }

    pub fn select_tariff_by_id(&mut self, id: &str) -> bool {
        let Some(idx) = self.catalog.tariffs.iter().position(|t| t.id == id) else {
            debug!("Unknown tariff {}", id);
            return false;
        };
        self.tariff = Some(idx);
        self.speed = None;
        if self.catalog.tariffs[idx].equipment_offer().is_none() {
            self.wants_equipment = false;
        }
        self.recompute_derived();
        self.after_mutation();
        true
    }

    /// Select a speed tier of the current tariff. Tiers belonging to any
    /// other tariff are rejected.
    pub fn select_speed(&mut self, tier: &SpeedTier) -> bool {
        let Some(idx) = self.selected_tariff().and_then(|t| t.speed_index(tier)) else {
            debug!("Speed {} is not offered by the selected tariff", tier.description());
            return false;
        };
        self.select_speed_at(idx)
    }

    pub fn select_speed_at(&mut self, index: usize) -> bool {
        let in_range = self
            .selected_tariff()
            .is_some_and(|t| index < t.speeds.len());
        if !in_range {
            return false;
        }
        self.speed = Some(index);
        self.recompute_derived();
        self.after_mutation();
        true
    }

    pub fn set_equipment(&mut self, wants: bool) {
        self.wants_equipment = wants;
        self.recompute_derived();
        self.after_mutation();
    }

    pub fn set_contact_field(&mut self, field: ContactField, value: impl Into<String>) {
        *self.contact.get_mut(field) = value.into();
        self.after_mutation();
    }

    pub fn set_contact(&mut self, contact: UserContact) {
        self.contact = contact;
        self.after_mutation();
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn recompute_derived(&mut self) {
        self.monthly_total = match (self.selected_tariff(), self.selected_speed()) {
            (Some(tariff), Some(speed)) => Some(pricing::compute_for_tariff(
                tariff,
                speed,
                self.wants_equipment,
            )),
            _ => None,
        };
    }

    /// Pull the step back if a mutation invalidated an earlier step, then
    /// notify subscribers.
    fn after_mutation(&mut self) {
        let reachable = validation::highest_reachable(self);
        if self.step > reachable {
            info!(
                "Selections changed; moving back from {} to {}",
                self.step, reachable
            );
            self.step = reachable;
        }
        self.publish();
    }

    fn publish(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        self.subscribers
            .retain(|tx| tx.send(snapshot.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(
            vec![
                TradePoint::new("TT-001", "Москва, ул. Ленина, 1"),
                TradePoint::new("TT-002", "Москва, пр. Мира, 5"),
            ],
            vec![
                Tariff {
                    id: "home_internet".to_string(),
                    name: "Домашний интернет".to_string(),
                    speeds: vec![
                        SpeedTier::new("300", "Мбит/с", "700"),
                        SpeedTier::new("500", "Мбит/с", "850"),
                    ],
                    features: "Безлимитный интернет".to_string(),
                    equipment_rental_fee: Some("150 ₽/мес".to_string()),
                    router_rental: String::new(),
                    connection_fee: String::new(),
                },
                Tariff {
                    id: "tv_bundle".to_string(),
                    name: "Интернет + ТВ".to_string(),
                    speeds: vec![SpeedTier::new("300", "Мбит/с", "900")],
                    features: "KION".to_string(),
                    equipment_rental_fee: None,
                    router_rental: String::new(),
                    connection_fee: String::new(),
                },
            ],
        )
    }

    fn fill_contact(session: &mut WizardSession) {
        session.set_contact(UserContact {
            name: "Иван".to_string(),
            phone: "+7999".to_string(),
            email: "i@example.org".to_string(),
            city: "Москва".to_string(),
            street: "Ленина".to_string(),
            house: "1".to_string(),
            apartment: String::new(),
        });
    }

    fn session_at_confirmation() -> WizardSession {
        let mut s = WizardSession::new(catalog());
        s.select_trade_point_by_code("TT-001");
        s.advance();
        s.select_tariff_by_id("home_internet");
        s.advance();
        s.select_speed_at(0);
        s.advance();
        fill_contact(&mut s);
        s.advance();
        assert_eq!(s.current_step(), WizardStep::Confirmation);
        s
    }

    #[test]
    fn test_initial_state() {
        let s = WizardSession::new(catalog());
        assert_eq!(s.current_step(), WizardStep::TradePointSelection);
        assert!(s.selected_trade_point().is_none());
        assert!(s.selected_tariff().is_none());
        assert!(s.selected_speed().is_none());
        assert!(!s.wants_equipment());
        assert!(s.monthly_total().is_none());
    }

    #[test]
    fn test_advance_blocked_without_selection() {
        let mut s = WizardSession::new(catalog());
        assert_eq!(s.advance(), Advance::Blocked(WizardStep::TradePointSelection));
        assert_eq!(s.current_step(), WizardStep::TradePointSelection);
    }

    #[test]
    fn test_select_tariff_clears_speed() {
        let mut s = WizardSession::new(catalog());
        s.select_tariff_by_id("home_internet");
        s.select_speed_at(1);
        assert!(s.selected_speed().is_some());
        s.select_tariff_by_id("home_internet");
        assert!(s.selected_speed().is_none());
        assert!(s.monthly_total().is_none());
    }

    #[test]
    fn test_foreign_speed_rejected() {
        let mut s = WizardSession::new(catalog());
        s.select_tariff_by_id("tv_bundle");
        let foreign = SpeedTier::new("500", "Мбит/с", "850");
        assert!(!s.select_speed(&foreign));
        assert!(s.selected_speed().is_none());
    }

    #[test]
    fn test_tariff_without_equipment_clears_toggle() {
        let mut s = session_at_confirmation();
        s.set_equipment(true);
        s.select_tariff_by_id("tv_bundle");
        assert!(!s.wants_equipment());

        s.select_tariff_by_id("home_internet");
        s.set_equipment(true);
        s.select_tariff_by_id("home_internet");
        assert!(s.wants_equipment());
    }

    #[test]
    fn test_go_to_step_respects_reachability() {
        let mut s = WizardSession::new(catalog());
        assert_eq!(s.go_to_step(3), StepChange::Unchanged);
        s.select_trade_point_by_code("TT-001");
        assert_eq!(
            s.go_to_step(2),
            StepChange::Moved {
                from: WizardStep::TradePointSelection,
                to: WizardStep::TariffSelection
            }
        );
        assert_eq!(s.go_to_step(4), StepChange::Unchanged);
        assert_eq!(s.current_step(), WizardStep::TariffSelection);
    }

    #[test]
    fn test_tariff_change_at_confirmation_pulls_step_back() {
        let mut s = session_at_confirmation();
        s.select_tariff_by_id("tv_bundle");
        assert_eq!(s.current_step(), WizardStep::SpeedAndOptions);
    }

    #[test]
    fn test_total_tracks_equipment() {
        let mut s = session_at_confirmation();
        assert_eq!(s.monthly_total(), Some(Amount(700)));
        s.set_equipment(true);
        assert_eq!(s.monthly_total(), Some(Amount(850)));
    }

    #[test]
    fn test_advance_at_confirmation_submits() {
        let mut s = session_at_confirmation();
        match s.advance() {
            Advance::Submit(payload) => {
                assert_eq!(payload.tariff_id, "home_internet");
                assert_eq!(payload.monthly_price, 700);
            }
            other => panic!("expected submit, got {:?}", other),
        }
        assert_eq!(s.current_step(), WizardStep::Confirmation);
    }

    #[test]
    fn test_retreat_at_first_step_exits() {
        let mut s = WizardSession::new(catalog());
        assert_eq!(s.retreat(), Retreat::Exit);
        assert_eq!(s.current_step(), WizardStep::TradePointSelection);
    }

    #[test]
    fn test_subscribers_receive_snapshots() {
        let mut s = WizardSession::new(catalog());
        let rx = s.subscribe();
        let initial = rx.try_recv().expect("initial snapshot");
        assert_eq!(initial.step, WizardStep::TradePointSelection);

        s.select_trade_point_by_code("TT-002");
        s.advance();
        let latest: Vec<_> = rx.try_iter().collect();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[1].step, WizardStep::TariffSelection);
        assert_eq!(
            latest[1].trade_point.as_ref().map(|tp| tp.code.as_str()),
            Some("TT-002")
        );
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let mut s = WizardSession::new(catalog());
        drop(s.subscribe());
        s.select_trade_point_by_code("TT-001");
        assert!(s.subscribers.is_empty());
    }

    #[test]
    fn test_address_line_skips_blank_parts() {
        let contact = UserContact {
            city: "Москва".to_string(),
            street: "Ленина".to_string(),
            house: "1".to_string(),
            apartment: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(contact.address_line(), "г. Москва, ул. Ленина, д. 1");
    }
}
