//! Per-step gating predicates.
//!
//! A step's predicate is only consulted when leaving it forwards. Going
//! back is always allowed.

use super::{UserContact, WizardSession};
use crate::types::{ContactField, WizardStep};

/// Whether `step` is complete enough to move past it.
pub fn validate(step: WizardStep, session: &WizardSession) -> bool {
    match step {
        WizardStep::TradePointSelection => session.selected_trade_point().is_some(),
        WizardStep::TariffSelection => session.selected_tariff().is_some(),
        WizardStep::SpeedAndOptions => session.selected_speed().is_some(),
        WizardStep::ContactInfo => contact_is_complete(session.contact()),
        WizardStep::Confirmation => true,
    }
}

/// Required contact fields that are blank after trimming, in form order.
pub fn missing_contact_fields(contact: &UserContact) -> Vec<ContactField> {
    ContactField::all()
        .into_iter()
        .filter(|field| field.is_required() && contact.get(*field).trim().is_empty())
        .collect()
}

/// Whether every required contact field is filled.
pub fn contact_is_complete(contact: &UserContact) -> bool {
    missing_contact_fields(contact).is_empty()
}

/// Highest step the session may currently occupy.
///
/// That is the first step whose predicate fails, or the last step if all
/// of them pass.
pub fn highest_reachable(session: &WizardSession) -> WizardStep {
    let mut step = WizardStep::FIRST;
    while validate(step, session) {
        match step.next() {
            Some(next) => step = next,
            None => break,
        }
    }
    step
}

/// Short hint explaining why leaving `step` is blocked.
pub fn blocked_hint(step: WizardStep, session: &WizardSession) -> Option<String> {
    if validate(step, session) {
        return None;
    }
    let hint = match step {
        WizardStep::TradePointSelection => "Выберите торговую точку".to_string(),
        WizardStep::TariffSelection => "Выберите тариф".to_string(),
        WizardStep::SpeedAndOptions => "Выберите скорость".to_string(),
        WizardStep::ContactInfo => {
            let labels: Vec<&str> = missing_contact_fields(session.contact())
                .into_iter()
                .map(ContactField::label)
                .collect();
            format!("Заполните поля: {}", labels.join(", "))
        }
        WizardStep::Confirmation => return None,
    };
    Some(hint)
}
