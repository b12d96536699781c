//! Application module
//!
//! Contains the terminal host for the wizard: the event loop, key
//! handling, and the hand-off of confirmed orders to the dispatcher.
//!
//! # Module Structure
//! - `state` - Presentation state types (AppState, AppMode, Screen)
//! - Main module - App struct and event loop
//!
//! The app never mutates wizard state directly. Every change goes through
//! `WizardSession`, and the app redraws from the snapshots the session
//! publishes on its subscription channel.

mod state;

pub use state::{AppMode, AppState, Screen};

use crate::catalog::{CatalogLoad, Collection};
use crate::components::keybindings::{KeyAction, KeybindingContext};
use crate::error::Result;
use crate::submission::{Delivery, Dispatcher, OrderPayload};
use crate::types::WizardStep;
use crate::ui::UiRenderer;
use crate::wizard::{Advance, Retreat, WizardSession, WizardSnapshot};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::Backend, Terminal};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Messages sent from the submission thread to the main UI thread
#[derive(Debug)]
pub enum SubmissionMessage {
    Finished(Delivery),
}

/// Main application struct
pub struct App {
    session: WizardSession,
    /// Snapshots published by the session after each mutation
    snapshots: Receiver<WizardSnapshot>,
    state: AppState,
    ui_renderer: UiRenderer,
    /// Keybinding context for key resolution and navigation hints
    keybinding_context: KeybindingContext,
    dispatcher: Arc<Dispatcher>,
    /// Channel sender for submission outcomes (cloned to the worker)
    submit_tx: Sender<SubmissionMessage>,
    /// Channel receiver for submission outcomes (polled in main loop)
    submit_rx: Receiver<SubmissionMessage>,
}

impl App {
    /// Create a new application instance
    pub fn new(load: CatalogLoad, dispatcher: Dispatcher) -> Self {
        info!("Creating new App instance");
        let (submit_tx, submit_rx) = mpsc::channel();

        let mut session = WizardSession::new(load.catalog);
        let snapshots = session.subscribe();
        let mut state = AppState::new(session.snapshot());
        state.status_message = degraded_notice(&load.issues);

        let mut app = Self {
            session,
            snapshots,
            state,
            ui_renderer: UiRenderer::new(),
            keybinding_context: KeybindingContext::new(),
            dispatcher: Arc::new(dispatcher),
            submit_tx,
            submit_rx,
        };
        app.sync_snapshots();
        app
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn session(&self) -> &WizardSession {
        &self.session
    }

    /// Toggle help overlay visibility
    pub fn toggle_help(&mut self) {
        self.state.help_visible = !self.state.help_visible;
    }

    /// Run the event loop until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        info!("Wizard ready");

        loop {
            self.poll_submission();

            terminal.draw(|f| {
                self.ui_renderer.render(
                    f,
                    &self.state,
                    self.session.catalog(),
                    &self.keybinding_context,
                )
            })?;

            if crossterm::event::poll(Duration::from_millis(50))? {
                if let Event::Key(key_event) = crossterm::event::read()? {
                    if self.handle_key_event(key_event) {
                        info!("Exit requested");
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    /// Handle one key press. Returns `true` when the app should exit.
    pub fn handle_key_event(&mut self, key_event: KeyEvent) -> bool {
        if key_event.kind != KeyEventKind::Press {
            return false;
        }

        let screen = self.state.screen();

        // Help overlay swallows everything except its own dismissal
        if self.state.help_visible {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?')
            ) {
                self.toggle_help();
            }
            return false;
        }

        let exit = match self.keybinding_context.action_for(screen, &key_event) {
            Some(action) => self.perform(screen, action),
            None if screen == Screen::Acknowledged => true,
            None if screen.captures_text() => {
                self.edit_contact(key_event);
                false
            }
            None => false,
        };

        self.sync_snapshots();
        exit
    }

    /// Apply any finished submission.
    pub fn poll_submission(&mut self) {
        while let Ok(message) = self.submit_rx.try_recv() {
            match message {
                SubmissionMessage::Finished(delivery) => {
                    if let Delivery::Fallback {
                        reason: Some(reason),
                        ..
                    } = &delivery
                    {
                        warn!("Order acknowledged locally after bridge failure: {}", reason);
                    }
                    self.state.mode = AppMode::Acknowledged;
                    self.state.acknowledgment = Some(delivery.message().to_string());
                    self.state.status_message.clear();
                }
            }
        }
    }

    fn perform(&mut self, screen: Screen, action: KeyAction) -> bool {
        debug!("{:?} on {:?}", action, screen);
        match action {
            KeyAction::Quit | KeyAction::Dismiss => return true,
            KeyAction::Help => self.toggle_help(),
            KeyAction::NavigateUp => self.state.cursor_up(),
            KeyAction::NavigateDown => {
                let rows = self.row_count();
                self.state.cursor_down(rows);
            }
            KeyAction::Select => self.select_highlighted(),
            KeyAction::Choose => {
                // On the equipment row Enter only flips the toggle
                let toggle_only = self.on_equipment_row();
                self.select_highlighted();
                if !toggle_only {
                    self.advance();
                }
            }
            KeyAction::Next | KeyAction::Submit => self.advance(),
            KeyAction::NextField => {
                if self.state.is_last_field_focused() {
                    self.advance();
                } else {
                    self.state.focus_next_field();
                }
            }
            KeyAction::PreviousField => self.state.focus_previous_field(),
            KeyAction::Back => {
                if self.state.mode != AppMode::Wizard {
                    return false;
                }
                if self.session.retreat() == Retreat::Exit {
                    return true;
                }
                self.state.status_message.clear();
            }
        }
        false
    }

    fn advance(&mut self) {
        if self.state.mode != AppMode::Wizard {
            return;
        }
        match self.session.advance() {
            Advance::Moved(step) => {
                debug!("Advanced to {}", step);
                self.state.status_message.clear();
            }
            Advance::Blocked(step) => {
                self.state.status_message =
                    crate::wizard::validation::blocked_hint(step, &self.session)
                        .unwrap_or_default();
            }
            Advance::Submit(payload) => self.start_submission(payload),
        }
    }

    /// Hand the order to the dispatcher on a worker thread so a slow
    /// bridge never freezes the UI.
    fn start_submission(&mut self, payload: OrderPayload) {
        info!("Submitting order for tariff {}", payload.tariff_id);
        self.state.mode = AppMode::Submitting;
        self.state.status_message = "Отправка заявки...".to_string();

        let dispatcher = Arc::clone(&self.dispatcher);
        let tx = self.submit_tx.clone();
        thread::spawn(move || {
            let delivery = dispatcher.dispatch(&payload);
            // Receiver only disappears when the app is shutting down
            let _ = tx.send(SubmissionMessage::Finished(delivery));
        });
    }

    /// Rows on the current list screen.
    fn row_count(&self) -> usize {
        let catalog = self.session.catalog();
        let snapshot = &self.state.snapshot;
        match snapshot.step {
            WizardStep::TradePointSelection => catalog.trade_points.len(),
            WizardStep::TariffSelection => catalog.tariffs.len(),
            WizardStep::SpeedAndOptions => {
                let speeds = snapshot.tariff.as_ref().map_or(0, |t| t.speeds.len());
                speeds + usize::from(snapshot.shows_equipment_toggle())
            }
            WizardStep::ContactInfo | WizardStep::Confirmation => 0,
        }
    }

    /// The equipment toggle is the row after the last speed tier.
    fn on_equipment_row(&self) -> bool {
        let snapshot = &self.state.snapshot;
        snapshot.step == WizardStep::SpeedAndOptions
            && snapshot.shows_equipment_toggle()
            && snapshot
                .tariff
                .as_ref()
                .is_some_and(|t| self.state.cursor == t.speeds.len())
    }

    fn select_highlighted(&mut self) {
        let cursor = self.state.cursor;
        match self.state.snapshot.step {
            WizardStep::TradePointSelection => {
                if let Some(code) = self
                    .session
                    .catalog()
                    .trade_points
                    .get(cursor)
                    .map(|tp| tp.code.clone())
                {
                    self.session.select_trade_point_by_code(&code);
                }
            }
            WizardStep::TariffSelection => {
                if let Some(id) = self
                    .session
                    .catalog()
                    .tariffs
                    .get(cursor)
                    .map(|t| t.id.clone())
                {
                    self.session.select_tariff_by_id(&id);
                }
            }
            WizardStep::SpeedAndOptions => {
                if self.on_equipment_row() {
                    let wants = !self.session.wants_equipment();
                    self.session.set_equipment(wants);
                } else {
                    self.session.select_speed_at(cursor);
                }
            }
            WizardStep::ContactInfo | WizardStep::Confirmation => {}
        }
    }

    fn edit_contact(&mut self, key_event: KeyEvent) {
        let field = self.state.focused_field();
        let mut value = self.session.contact().get(field).to_string();
        match key_event.code {
            KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                value.push(c);
            }
            KeyCode::Backspace => {
                value.pop();
            }
            _ => return,
        }
        self.session.set_contact_field(field, value);
    }

    /// Drain published snapshots, resetting the cursor when the step changed.
    fn sync_snapshots(&mut self) {
        let previous_step = self.state.snapshot.step;
        let mut changed = false;
        while let Ok(snapshot) = self.snapshots.try_recv() {
            self.state.snapshot = snapshot;
            changed = true;
        }
        if changed && self.state.snapshot.step != previous_step {
            self.on_step_entered();
        }
    }

    /// Put the cursor on the current selection, or the first row.
    fn on_step_entered(&mut self) {
        let snapshot = &self.state.snapshot;
        let catalog = self.session.catalog();
        self.state.cursor = match snapshot.step {
            WizardStep::TradePointSelection => snapshot
                .trade_point
                .as_ref()
                .and_then(|tp| catalog.trade_points.iter().position(|p| p.code == tp.code)),
            WizardStep::TariffSelection => snapshot
                .tariff
                .as_ref()
                .and_then(|t| catalog.tariffs.iter().position(|c| c.id == t.id)),
            WizardStep::SpeedAndOptions => snapshot.speed_index,
            WizardStep::ContactInfo | WizardStep::Confirmation => None,
        }
        .unwrap_or(0);

        if snapshot.step == WizardStep::ContactInfo {
            let fields = crate::types::ContactField::all();
            self.state.contact_focus = snapshot
                .missing_fields
                .first()
                .and_then(|missing| fields.iter().position(|f| f == missing))
                .unwrap_or(0);
        }
    }
}

/// Status line shown when a catalog collection fell back.
fn degraded_notice(issues: &[crate::catalog::CatalogIssue]) -> String {
    let parts: Vec<&str> = issues
        .iter()
        .map(|issue| match issue.collection {
            Collection::TradePoints => "список точек",
            Collection::Tariffs => "список тарифов",
        })
        .collect();
    if parts.is_empty() {
        String::new()
    } else {
        format!("Не удалось загрузить {}; показан базовый вариант", parts.join(" и "))
    }
}
