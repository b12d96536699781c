//! Header and common widget rendering
//!
//! Title, step progress, the status line and the navigation bar.

use crate::app::{AppMode, AppState};
use crate::components::help_overlay::HelpOverlay;
use crate::components::keybindings::{KeyAction, KeybindingContext, NavBarItem};
use crate::theme::{Colors, Styles, UiText};
use crate::types::WizardStep;
use crate::wizard::WizardSnapshot;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// `"Шаг N из 5: Title"`
pub fn step_caption(step: WizardStep) -> String {
    format!(
        "Шаг {} из {}: {}",
        step.number(),
        WizardStep::TOTAL_STEPS,
        step.title()
    )
}

/// Render the title and the progress gauge for the current step
pub fn render_header(f: &mut Frame, area: Rect, state: &AppState) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // App title
            Constraint::Length(1), // Step caption
            Constraint::Min(1),    // Gauge
        ])
        .split(area);

    let title = Paragraph::new(UiText::APP_TITLE)
        .alignment(Alignment::Center)
        .style(Styles::title());
    f.render_widget(title, chunks[0]);

    let caption = Paragraph::new(step_caption(state.snapshot.step))
        .alignment(Alignment::Center)
        .style(Styles::text_secondary());
    f.render_widget(caption, chunks[1]);

    let percent = state.snapshot.progress_percent.min(100);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::NONE))
        .gauge_style(Styles::progress())
        .percent(percent)
        .label(format!("{}%", percent));
    f.render_widget(gauge, chunks[2]);
}

/// Render the one-line status bar
///
/// Blocked-advance hints and catalog notices show in the warning color.
pub fn render_status_bar(f: &mut Frame, area: Rect, state: &AppState) {
    let style = if state.status_message.is_empty() {
        Styles::text_muted()
    } else {
        Styles::warning()
    };
    let status = Paragraph::new(state.status_message.as_str()).style(style);
    f.render_widget(status, area);
}

/// Drop the back item on the first step and label the forward action
/// for the current step.
fn adjust_for_step(items: Vec<NavBarItem>, snapshot: &WizardSnapshot) -> Vec<NavBarItem> {
    items
        .into_iter()
        .filter(|item| snapshot.back_visible || item.action != KeyAction::Back)
        .map(|mut item| {
            if matches!(item.action, KeyAction::Next | KeyAction::Submit) {
                item.action_label = snapshot.next_label.to_string();
            }
            item
        })
        .collect()
}

fn nav_spans(items: &[NavBarItem]) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(items.len() * 3);
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  │  ", Style::default().fg(Colors::BORDER_INACTIVE)));
        }
        spans.push(Span::styled(item.key_display.clone(), Styles::key_hint()));
        spans.push(Span::styled(format!(" {}", item.action_label), Styles::nav_hint()));
    }
    spans
}

/// Render the navigation bar
pub fn render_nav_bar(
    f: &mut Frame,
    state: &AppState,
    keybinding_ctx: &KeybindingContext,
    area: Rect,
) {
    let mut nav_items = keybinding_ctx.get_nav_items(state.screen());
    if state.mode == AppMode::Wizard {
        nav_items = adjust_for_step(nav_items, &state.snapshot);
    }
    let nav_bar = Paragraph::new(Line::from(nav_spans(&nav_items))).alignment(Alignment::Center);
    f.render_widget(nav_bar, area);
}

/// Render the help overlay
pub fn render_help_overlay(f: &mut Frame, state: &AppState, keybinding_ctx: &KeybindingContext) {
    let help_overlay = HelpOverlay::new(state.screen(), keybinding_ctx);
    help_overlay.render(f, f.area());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_caption() {
        assert_eq!(
            step_caption(WizardStep::FIRST),
            "Шаг 1 из 5: Выбор точки"
        );
    }

    #[test]
    fn test_nav_spans_separate_items() {
        let items = vec![
            NavBarItem {
                action: KeyAction::Choose,
                key_display: "Enter".to_string(),
                action_label: "Выбрать".to_string(),
            },
            NavBarItem {
                action: KeyAction::Back,
                key_display: "Esc".to_string(),
                action_label: "Назад".to_string(),
            },
        ];
        let spans = nav_spans(&items);
        assert_eq!(spans.len(), 5);
        assert_eq!(spans[0].content, "Enter");
        assert_eq!(spans[4].content, " Назад");
    }

    #[test]
    fn test_first_step_hides_back() {
        let session = crate::wizard::WizardSession::new(crate::catalog::Catalog::fallback());
        let snapshot = session.snapshot();
        let ctx = KeybindingContext::new();

        let items = adjust_for_step(ctx.get_nav_items(crate::app::Screen::TradePoints), &snapshot);
        assert!(items.iter().all(|i| i.action != KeyAction::Back));
        let next = items.iter().find(|i| i.action == KeyAction::Next).unwrap();
        assert_eq!(next.action_label, "Далее");
    }

    #[test]
    fn test_confirmation_labels_submit() {
        let mut session = crate::wizard::WizardSession::new(crate::catalog::Catalog::fallback());
        session.select_trade_point_by_code("DEFAULT");
        session.advance();
        let mut snapshot = session.snapshot();
        snapshot.next_label = crate::wizard::snapshot::SUBMIT_LABEL;

        let ctx = KeybindingContext::new();
        let items = adjust_for_step(ctx.get_nav_items(crate::app::Screen::Confirmation), &snapshot);
        let submit = items.iter().find(|i| i.action == KeyAction::Submit).unwrap();
        assert_eq!(submit.action_label, "Отправить заявку");
        assert!(items.iter().any(|i| i.action == KeyAction::Back));
    }
}
