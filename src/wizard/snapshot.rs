//! Read-only projection of a wizard session for renderers.

use serde::Serialize;

use super::{validation, UserContact, WizardSession};
use crate::catalog::{SpeedTier, Tariff, TradePoint};
use crate::pricing::Amount;
use crate::types::{ContactField, WizardStep};

/// Label of the primary action on every step but the last.
pub const NEXT_LABEL: &str = "Далее";
/// Label of the primary action on the confirmation step.
pub const SUBMIT_LABEL: &str = "Отправить заявку";

/// Everything needed to draw one frame of the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardSnapshot {
    pub step: WizardStep,
    pub title: &'static str,
    pub progress_percent: u16,
    pub trade_point: Option<TradePoint>,
    pub tariff: Option<Tariff>,
    pub speed: Option<SpeedTier>,
    pub speed_index: Option<usize>,
    pub wants_equipment: bool,
    /// Equipment fee to offer, if the selected tariff has one.
    pub equipment_offer: Option<String>,
    pub total: Option<Amount>,
    pub contact: UserContact,
    pub missing_fields: Vec<ContactField>,
    pub can_advance: bool,
    pub blocked_hint: Option<String>,
    pub next_label: &'static str,
    pub back_visible: bool,
    /// Formatted delivery address for the summary.
    pub address_summary: String,
}

impl WizardSnapshot {
    pub fn capture(session: &WizardSession) -> Self {
        let step = session.current_step();
        let tariff = session.selected_tariff();

        Self {
            step,
            title: step.title(),
            progress_percent: step.progress_percent(),
            trade_point: session.selected_trade_point().cloned(),
            tariff: tariff.cloned(),
            speed: session.selected_speed().cloned(),
            speed_index: session.selected_speed_index(),
            wants_equipment: session.wants_equipment(),
            equipment_offer: tariff
                .and_then(Tariff::equipment_offer)
                .map(str::to_string),
            total: session.monthly_total(),
            contact: session.contact().clone(),
            missing_fields: validation::missing_contact_fields(session.contact()),
            can_advance: validation::validate(step, session),
            blocked_hint: validation::blocked_hint(step, session),
            next_label: if step.is_last() { SUBMIT_LABEL } else { NEXT_LABEL },
            back_visible: step != WizardStep::FIRST,
            address_summary: session.contact().address_line(),
        }
    }

    /// Whether the equipment toggle should be shown on the speed step.
    pub fn shows_equipment_toggle(&self) -> bool {
        self.equipment_offer.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn test_first_step_hides_back() {
        let session = WizardSession::new(Catalog::fallback());
        let snap = session.snapshot();
        assert_eq!(snap.step, WizardStep::TradePointSelection);
        assert_eq!(snap.title, "Выбор точки");
        assert!(!snap.back_visible);
        assert!(!snap.can_advance);
        assert_eq!(snap.next_label, NEXT_LABEL);
        assert_eq!(snap.blocked_hint.as_deref(), Some("Выберите торговую точку"));
    }

    #[test]
    fn test_fallback_tariff_hides_equipment() {
        let mut session = WizardSession::new(Catalog::fallback());
        session.select_tariff_by_id("home_internet");
        assert!(!session.snapshot().shows_equipment_toggle());
    }

    #[test]
    fn test_last_step_labels_submit() {
        let mut session = WizardSession::new(Catalog::fallback());
        session.select_trade_point_by_code("DEFAULT");
        session.select_tariff_by_id("home_internet");
        session.select_speed_at(0);
        for field in ContactField::all() {
            if field.is_required() {
                session.set_contact_field(field, "x");
            }
        }
        session.go_to_step(5);
        let snap = session.snapshot();
        assert_eq!(snap.step, WizardStep::Confirmation);
        assert_eq!(snap.next_label, SUBMIT_LABEL);
        assert_eq!(snap.total, Some(Amount(500)));
        assert!(snap.back_visible);
        assert_eq!(snap.address_summary, "г. x, ул. x, д. x");
    }
}
