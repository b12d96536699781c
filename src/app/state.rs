//! Application state definitions
//!
//! Contains the presentation-side state of the terminal app: which screen
//! is showing, the highlighted row, the focused contact field and the
//! latest wizard snapshot. Business state lives in `WizardSession`.

use crate::types::{ContactField, WizardStep};
use crate::wizard::WizardSnapshot;

/// Application operating modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppMode {
    /// Collecting the order, one wizard step at a time
    Wizard,
    /// Order handed to the dispatcher, waiting for the outcome
    Submitting,
    /// Acknowledgment shown; any key exits
    Acknowledged,
}

/// What is on screen, used to pick keybindings and help content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    TradePoints,
    Tariffs,
    SpeedOptions,
    Contact,
    Confirmation,
    Submitting,
    Acknowledged,
}

impl Screen {
    pub fn for_step(step: WizardStep) -> Self {
        match step {
            WizardStep::TradePointSelection => Self::TradePoints,
            WizardStep::TariffSelection => Self::Tariffs,
            WizardStep::SpeedAndOptions => Self::SpeedOptions,
            WizardStep::ContactInfo => Self::Contact,
            WizardStep::Confirmation => Self::Confirmation,
        }
    }

    /// Screen name shown in the help overlay.
    pub fn name(self) -> &'static str {
        match self {
            Self::TradePoints => WizardStep::TradePointSelection.title(),
            Self::Tariffs => WizardStep::TariffSelection.title(),
            Self::SpeedOptions => WizardStep::SpeedAndOptions.title(),
            Self::Contact => WizardStep::ContactInfo.title(),
            Self::Confirmation => WizardStep::Confirmation.title(),
            Self::Submitting => "Отправка",
            Self::Acknowledged => "Готово",
        }
    }

    /// Whether printable keys are text input on this screen.
    pub fn captures_text(self) -> bool {
        matches!(self, Self::Contact)
    }
}

/// Main application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Current application mode
    pub mode: AppMode,
    /// Latest projection of the wizard session
    pub snapshot: WizardSnapshot,
    /// Highlighted row on list screens
    pub cursor: usize,
    /// Focused field on the contact screen (index into `ContactField::all()`)
    pub contact_focus: usize,
    /// Status message for user feedback
    pub status_message: String,
    /// Whether help overlay is visible
    pub help_visible: bool,
    /// Acknowledgment returned by the dispatcher
    pub acknowledgment: Option<String>,
}

impl AppState {
    pub fn new(snapshot: WizardSnapshot) -> Self {
        Self {
            mode: AppMode::Wizard,
            snapshot,
            cursor: 0,
            contact_focus: 0,
            status_message: String::new(),
            help_visible: false,
            acknowledgment: None,
        }
    }

    pub fn screen(&self) -> Screen {
        match self.mode {
            AppMode::Wizard => Screen::for_step(self.snapshot.step),
            AppMode::Submitting => Screen::Submitting,
            AppMode::Acknowledged => Screen::Acknowledged,
        }
    }

    /// The contact field that currently receives typed text.
    pub fn focused_field(&self) -> ContactField {
        let fields = ContactField::all();
        fields
            .get(self.contact_focus)
            .copied()
            .unwrap_or(ContactField::Name)
    }

    pub fn focus_next_field(&mut self) {
        let max = ContactField::all().len() - 1;
        if self.contact_focus < max {
            self.contact_focus += 1;
        }
    }

    pub fn focus_previous_field(&mut self) {
        self.contact_focus = self.contact_focus.saturating_sub(1);
    }

    pub fn is_last_field_focused(&self) -> bool {
        self.contact_focus + 1 >= ContactField::all().len()
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self, rows: usize) {
        if rows > 0 && self.cursor + 1 < rows {
            self.cursor += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::wizard::WizardSession;

    fn state() -> AppState {
        AppState::new(WizardSession::new(Catalog::fallback()).snapshot())
    }

    #[test]
    fn test_initial_screen_is_trade_points() {
        let state = state();
        assert_eq!(state.mode, AppMode::Wizard);
        assert_eq!(state.screen(), Screen::TradePoints);
        assert!(!state.help_visible);
    }

    #[test]
    fn test_field_focus_is_bounded() {
        let mut state = state();
        state.focus_previous_field();
        assert_eq!(state.focused_field(), ContactField::Name);
        for _ in 0..20 {
            state.focus_next_field();
        }
        assert_eq!(state.focused_field(), ContactField::Apartment);
        assert!(state.is_last_field_focused());
    }

    #[test]
    fn test_cursor_is_bounded() {
        let mut state = state();
        state.cursor_down(2);
        state.cursor_down(2);
        assert_eq!(state.cursor, 1);
        state.cursor_up();
        state.cursor_up();
        assert_eq!(state.cursor, 0);
        state.cursor_down(0);
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn test_only_contact_captures_text() {
        assert!(Screen::Contact.captures_text());
        assert!(!Screen::Tariffs.captures_text());
    }
}
