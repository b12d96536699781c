//! Wizard screens.
//!
//! One render function per step, plus the submission and acknowledgment
//! screens. Screens only read the `AppState` snapshot and the catalog;
//! they never touch the session.

use crate::app::AppState;
use crate::catalog::{Catalog, SpeedTier, Tariff, TradePoint};
use crate::pricing::Amount;
use crate::theme::{Styles, UiConstants, UiText};
use crate::types::ContactField;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Placeholder for empty summary values.
const EMPTY: &str = "-";

// ============================================================================
// Display Helpers
// ============================================================================

/// Radio marker for list rows.
fn marker(chosen: bool) -> &'static str {
    if chosen { "(•) " } else { "( ) " }
}

/// `"{price} ₽/мес"`, using the catalog's price string as published.
pub fn monthly(price: &str) -> String {
    format!("{} ₽{}", price, UiText::PER_MONTH)
}

/// Price line of a speed tier, with the promotional terms when present.
pub fn speed_price_line(tier: &SpeedTier) -> String {
    if tier.has_promo() {
        format!(
            "{} первые {} мес., далее {}",
            monthly(&tier.price),
            tier.promo_months,
            monthly(&tier.full_price)
        )
    } else {
        monthly(&tier.price)
    }
}

/// Headline of a tariff card: top entry speed and "from" price.
pub fn tariff_headline(tariff: &Tariff) -> String {
    match tariff.entry_speed() {
        Some(entry) => format!(
            "до {}  ·  от {}",
            entry.description(),
            monthly(&entry.price)
        ),
        None => String::new(),
    }
}

/// Total line shown on the speed and confirmation steps.
pub fn total_line(total: Option<Amount>) -> String {
    let amount = total.unwrap_or(Amount::ZERO);
    format!("{}: {}{}", UiText::TOTAL, amount, UiText::PER_MONTH)
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() { EMPTY } else { value }
}

/// Label/value rows of the confirmation summary.
pub fn summary_rows(state: &AppState) -> Vec<(&'static str, String)> {
    let snapshot = &state.snapshot;
    let contact = &snapshot.contact;
    vec![
        (
            "Точка",
            snapshot
                .trade_point
                .as_ref()
                .map_or_else(|| EMPTY.to_string(), |tp| format!("{} ({})", tp.address, tp.code)),
        ),
        (
            "Тариф",
            snapshot
                .tariff
                .as_ref()
                .map_or_else(|| EMPTY.to_string(), |t| t.name.clone()),
        ),
        (
            "Скорость",
            snapshot
                .speed
                .as_ref()
                .map_or_else(|| EMPTY.to_string(), SpeedTier::description),
        ),
        (
            "ТВ-приставка",
            if snapshot.wants_equipment { "Да" } else { "Нет" }.to_string(),
        ),
        ("ФИО", or_dash(&contact.name).to_string()),
        ("Телефон", or_dash(&contact.phone).to_string()),
        ("Email", or_dash(&contact.email).to_string()),
        ("Адрес", or_dash(&snapshot.address_summary).to_string()),
    ]
}

fn list_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::border_inactive())
        .title(format!(" {} ", title))
        .title_style(Styles::title())
}

fn render_list(f: &mut Frame, area: Rect, items: Vec<ListItem<'static>>, cursor: usize, title: &str) {
    let list = List::new(items)
        .block(list_block(title))
        .highlight_style(Styles::highlighted());
    let mut list_state = ListState::default();
    list_state.select(Some(cursor));
    f.render_stateful_widget(list, area, &mut list_state);
}

// ============================================================================
// Step 1: Trade Points
// ============================================================================

fn trade_point_item(tp: &TradePoint, chosen: bool) -> ListItem<'static> {
    let style = if chosen { Styles::chosen() } else { Styles::text() };
    ListItem::new(Line::from(vec![
        Span::styled(marker(chosen), style),
        Span::styled(format!("{:<10}", tp.code), style),
        Span::styled(tp.short_address().to_string(), Styles::text_secondary()),
    ]))
}

pub fn render_trade_points(f: &mut Frame, area: Rect, state: &AppState, catalog: &Catalog) {
    let selected = state.snapshot.trade_point.as_ref().map(|tp| tp.code.as_str());
    let items = catalog
        .trade_points
        .iter()
        .map(|tp| trade_point_item(tp, selected == Some(tp.code.as_str())))
        .collect();
    render_list(f, area, items, state.cursor, "Где вы оформляете заявку?");
}

// ============================================================================
// Step 2: Tariffs
// ============================================================================

fn tariff_item(tariff: &Tariff, chosen: bool) -> ListItem<'static> {
    let name_style = if chosen { Styles::chosen() } else { Styles::text() };
    ListItem::new(vec![
        Line::from(vec![
            Span::styled(marker(chosen), name_style),
            Span::styled(tariff.name.clone(), name_style),
        ]),
        Line::from(vec![
            Span::raw("    "),
            Span::styled(tariff_headline(tariff), Styles::price()),
        ]),
        Line::from(vec![
            Span::raw("    "),
            Span::styled(tariff.features.clone(), Styles::text_secondary()),
        ]),
        Line::from(""),
    ])
}

pub fn render_tariffs(f: &mut Frame, area: Rect, state: &AppState, catalog: &Catalog) {
    let selected = state.snapshot.tariff.as_ref().map(|t| t.id.as_str());
    let items = catalog
        .tariffs
        .iter()
        .map(|t| tariff_item(t, selected == Some(t.id.as_str())))
        .collect();
    render_list(f, area, items, state.cursor, "Выберите тариф");
}

// ============================================================================
// Step 3: Speed and Options
// ============================================================================

pub fn render_speed_options(f: &mut Frame, area: Rect, state: &AppState) {
    let snapshot = &state.snapshot;
    let Some(tariff) = snapshot.tariff.as_ref() else {
        let hint = Paragraph::new("Сначала выберите тариф").style(Styles::warning());
        f.render_widget(hint, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Selected tariff
            Constraint::Min(3),    // Speeds and equipment
            Constraint::Length(UiConstants::TOTAL_PANEL_HEIGHT),
        ])
        .split(area);

    let header = Paragraph::new(vec![
        Line::from(Span::styled(tariff.name.clone(), Styles::title())),
        Line::from(Span::styled(tariff.features.clone(), Styles::text_secondary())),
    ])
    .wrap(Wrap { trim: true });
    f.render_widget(header, chunks[0]);

    let mut items: Vec<ListItem<'static>> = tariff
        .speeds
        .iter()
        .enumerate()
        .map(|(i, tier)| {
            let chosen = snapshot.speed_index == Some(i);
            let style = if chosen { Styles::chosen() } else { Styles::text() };
            ListItem::new(Line::from(vec![
                Span::styled(marker(chosen), style),
                Span::styled(format!("{:<14}", tier.description()), style),
                Span::styled(speed_price_line(tier), Styles::price()),
            ]))
        })
        .collect();

    if let Some(fee) = snapshot.equipment_offer.as_deref() {
        let check = if snapshot.wants_equipment { "[x] " } else { "[ ] " };
        items.push(ListItem::new(Line::from(vec![
            Span::styled(check, Styles::text()),
            Span::styled(format!("{:<14}", UiText::EQUIPMENT), Styles::text()),
            Span::styled(format!("+{}", fee), Styles::price()),
        ])));
    }

    render_list(f, chunks[1], items, state.cursor, "Скорость");

    let total = Paragraph::new(total_line(snapshot.total))
        .style(Styles::price())
        .alignment(Alignment::Right)
        .block(Block::default().borders(Borders::TOP).border_style(Styles::border_inactive()));
    f.render_widget(total, chunks[2]);
}

// ============================================================================
// Step 4: Contact
// ============================================================================

pub fn render_contact(f: &mut Frame, area: Rect, state: &AppState) {
    let contact = &state.snapshot.contact;
    let focused = state.focused_field();

    let lines: Vec<Line<'static>> = ContactField::all()
        .into_iter()
        .map(|field| {
            let is_focused = field == focused;
            let required = if field.is_required() { "*" } else { " " };
            let missing = state.snapshot.missing_fields.contains(&field);
            let label_style = if is_focused {
                Styles::title()
            } else if missing {
                Styles::text_muted()
            } else {
                Styles::text()
            };
            let mut value = contact.get(field).to_string();
            if is_focused {
                value.push('▏');
            }
            Line::from(vec![
                Span::styled(format!("{:<10}{} ", field.label(), required), label_style),
                Span::styled(
                    value,
                    if is_focused { Styles::highlighted() } else { Styles::text() },
                ),
            ])
        })
        .collect();

    let form = Paragraph::new(lines).block(list_block("Ваши данные"));
    f.render_widget(form, area);
}

// ============================================================================
// Step 5: Confirmation
// ============================================================================

pub fn render_confirmation(f: &mut Frame, area: Rect, state: &AppState) {
    let mut lines: Vec<Line<'static>> = summary_rows(state)
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{:<14}", label), Styles::text_secondary()),
                Span::styled(value, Styles::text()),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        total_line(state.snapshot.total),
        Styles::price(),
    )));

    let summary = Paragraph::new(lines)
        .block(list_block("Проверьте заявку"))
        .wrap(Wrap { trim: false });
    f.render_widget(summary, area);
}

// ============================================================================
// Submission
// ============================================================================

pub fn render_submitting(f: &mut Frame, area: Rect) {
    let text = Paragraph::new(UiText::SUBMITTING)
        .style(Styles::text_secondary())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Styles::border_inactive()));
    f.render_widget(text, area);
}

pub fn render_acknowledgment(f: &mut Frame, area: Rect, state: &AppState) {
    let message = state.acknowledgment.clone().unwrap_or_default();
    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message, Styles::success())),
        Line::from(""),
        Line::from(Span::styled(UiText::PRESS_ANY_KEY, Styles::text_muted())),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).border_style(Styles::border_active()));
    f.render_widget(text, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fallback_tariffs;
    use crate::wizard::WizardSession;

    #[test]
    fn test_speed_price_line_with_promo() {
        let mut tier = SpeedTier::new("300", "Мбит/с", "700");
        assert_eq!(speed_price_line(&tier), "700 ₽/мес");
        tier.full_price = "900".to_string();
        tier.promo_months = "3".to_string();
        assert_eq!(
            speed_price_line(&tier),
            "700 ₽/мес первые 3 мес., далее 900 ₽/мес"
        );
    }

    #[test]
    fn test_tariff_headline_uses_entry_speed() {
        let tariff = fallback_tariffs().remove(0);
        assert_eq!(tariff_headline(&tariff), "до 100 Мбит/с  ·  от 500 ₽/мес");
    }

    #[test]
    fn test_total_line() {
        assert_eq!(total_line(Some(Amount(650))), "Итого: 650 ₽/мес");
        assert_eq!(total_line(None), "Итого: 0 ₽/мес");
    }

    #[test]
    fn test_summary_rows_use_dash_for_empty() {
        let session = WizardSession::new(Catalog::fallback());
        let state = AppState::new(session.snapshot());
        let rows = summary_rows(&state);
        assert_eq!(rows[0], ("Точка", "-".to_string()));
        assert_eq!(rows[3], ("ТВ-приставка", "Нет".to_string()));
        assert_eq!(rows[7], ("Адрес", "-".to_string()));
    }
}
