//! User interface rendering module
//!
//! - `header` - Title, step progress, status line and nav bar
//! - `screens` - One renderer per wizard screen

mod header;
pub mod screens;

use crate::app::{AppState, Screen};
use crate::catalog::Catalog;
use crate::components::keybindings::KeybindingContext;
use crate::theme::{Styles, UiConstants};
use ratatui::{
    layout::{Constraint, Direction, Layout, Margin},
    widgets::Block,
    Frame,
};

/// UI renderer for the order wizard
#[derive(Debug, Default)]
pub struct UiRenderer;

impl UiRenderer {
    /// Create a new UI renderer
    pub fn new() -> Self {
        Self
    }

    /// Render the complete UI for the current application state
    pub fn render(
        &self,
        f: &mut Frame,
        state: &AppState,
        catalog: &Catalog,
        keybinding_ctx: &KeybindingContext,
    ) {
        f.render_widget(Block::default().style(Styles::panel_bg()), f.area());

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(UiConstants::HEADER_HEIGHT),
                Constraint::Min(1), // Main content area
                Constraint::Length(UiConstants::STATUS_BAR_HEIGHT),
                Constraint::Length(UiConstants::NAV_BAR_HEIGHT),
            ])
            .split(f.area());

        header::render_header(f, chunks[0], state);

        let content = chunks[1].inner(Margin {
            horizontal: 1,
            vertical: 0,
        });
        match state.screen() {
            Screen::TradePoints => screens::render_trade_points(f, content, state, catalog),
            Screen::Tariffs => screens::render_tariffs(f, content, state, catalog),
            Screen::SpeedOptions => screens::render_speed_options(f, content, state),
            Screen::Contact => screens::render_contact(f, content, state),
            Screen::Confirmation => screens::render_confirmation(f, content, state),
            Screen::Submitting => screens::render_submitting(f, content),
            Screen::Acknowledged => screens::render_acknowledgment(f, content, state),
        }

        header::render_status_bar(f, chunks[2], state);
        header::render_nav_bar(f, state, keybinding_ctx, chunks[3]);

        if state.help_visible {
            header::render_help_overlay(f, state, keybinding_ctx);
        }
    }
}
