//! Help overlay component
//!
//! Displays context-sensitive help in a centered floating window.

use super::keybindings::{HelpSection, KeybindingContext};
use crate::app::Screen;
use crate::theme::{Colors, Styles};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const WIDTH_PERCENT: u16 = 60;
const HEIGHT_PERCENT: u16 = 70;
const MIN_WIDTH: u16 = 40;
const MIN_HEIGHT: u16 = 12;

/// Help overlay component
pub struct HelpOverlay {
    content: Vec<Line<'static>>,
}

impl HelpOverlay {
    /// Create a new help overlay for the given screen
    pub fn new(screen: Screen, keybinding_ctx: &KeybindingContext) -> Self {
        let sections = keybinding_ctx.get_help_content(screen);
        Self {
            content: Self::build_content(&sections, screen),
        }
    }

    fn build_content(sections: &[HelpSection], screen: Screen) -> Vec<Line<'static>> {
        let mut lines: Vec<Line<'static>> = vec![
            Line::from(vec![
                Span::styled("Экран: ", Style::default().fg(Colors::FG_MUTED)),
                Span::styled(screen.name().to_string(), Style::default().fg(Colors::SECONDARY)),
            ]),
            Line::from(""),
        ];

        for section in sections {
            lines.push(Line::from(vec![Span::styled(
                format!("  {}  ", section.title),
                Style::default()
                    .fg(Colors::SUCCESS)
                    .add_modifier(Modifier::BOLD),
            )]));

            for (key, description) in &section.items {
                lines.push(Line::from(vec![
                    Span::raw("    "),
                    Span::styled(format!("{:<8}", key), Styles::key_hint()),
                    Span::styled(description.clone(), Styles::text()),
                ]));
            }
            lines.push(Line::from(""));
        }

        lines
    }

    pub fn lines(&self) -> &[Line<'static>] {
        &self.content
    }

    /// Render the help overlay
    pub fn render(&self, f: &mut Frame, parent: Rect) {
        let area = centered_rect(parent);
        f.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::border_active())
            .title(" Справка ")
            .title_bottom(Line::from(" F1 или Esc - закрыть ").alignment(Alignment::Center));

        let paragraph = Paragraph::new(self.content.clone())
            .block(block)
            .style(Styles::panel_bg())
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }
}

fn centered_rect(parent: Rect) -> Rect {
    let width = (parent.width * WIDTH_PERCENT / 100)
        .max(MIN_WIDTH)
        .min(parent.width);
    let height = (parent.height * HEIGHT_PERCENT / 100)
        .max(MIN_HEIGHT)
        .min(parent.height);
    Rect {
        x: parent.x + (parent.width - width) / 2,
        y: parent.y + (parent.height - height) / 2,
        width,
        height,
    }
}
