//! Centralized theme and styling for the TUI
//!
//! Single source of truth for the colors and styles the wizard screens
//! use, so every screen looks like part of the same app.
//!
//! # Usage
//! ```rust
//! use order_wizard::theme::{Colors, Styles};
//! use ratatui::style::Style;
//!
//! let accent = Style::default().fg(Colors::PRIMARY);
//! let title = Styles::title();
//! ```

use ratatui::style::{Color, Modifier, Style};

// =============================================================================
// COLOR PALETTE
// =============================================================================

/// Core color palette for the application
pub struct Colors;

impl Colors {
    // -------------------------------------------------------------------------
    // Base Colors
    // -------------------------------------------------------------------------

    /// Panel and dialog background
    pub const BG_PRIMARY: Color = Color::Rgb(20, 20, 30);

    /// Progress gauge background
    pub const BG_GAUGE: Color = Color::Rgb(40, 40, 50);

    /// Default foreground text color
    pub const FG_PRIMARY: Color = Color::White;

    /// Secondary text (addresses, feature lines)
    pub const FG_SECONDARY: Color = Color::Gray;

    /// Hints and inactive text
    pub const FG_MUTED: Color = Color::DarkGray;

    // -------------------------------------------------------------------------
    // Accent Colors
    // -------------------------------------------------------------------------

    /// Brand accent: titles, borders, the progress bar
    pub const PRIMARY: Color = Color::Rgb(227, 6, 19);

    /// Prices and the running total
    pub const SECONDARY: Color = Color::Yellow;

    // -------------------------------------------------------------------------
    // Semantic Colors
    // -------------------------------------------------------------------------

    pub const SUCCESS: Color = Color::Green;

    pub const WARNING: Color = Color::Yellow;

    // -------------------------------------------------------------------------
    // UI Element Colors
    // -------------------------------------------------------------------------

    pub const BORDER_ACTIVE: Color = Color::Rgb(227, 6, 19);

    pub const BORDER_INACTIVE: Color = Color::DarkGray;

    /// Highlighted row background
    pub const HIGHLIGHT_BG: Color = Color::Rgb(60, 60, 75);
}

// =============================================================================
// PRE-BUILT STYLES
// =============================================================================

/// Pre-built styles for common UI patterns
pub struct Styles;

impl Styles {
    /// Default text style
    pub fn text() -> Style {
        Style::default().fg(Colors::FG_PRIMARY)
    }

    /// Muted/secondary text
    pub fn text_muted() -> Style {
        Style::default().fg(Colors::FG_MUTED)
    }

    pub fn text_secondary() -> Style {
        Style::default().fg(Colors::FG_SECONDARY)
    }

    /// Main title style
    pub fn title() -> Style {
        Style::default()
            .fg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_active() -> Style {
        Style::default().fg(Colors::BORDER_ACTIVE)
    }

    pub fn border_inactive() -> Style {
        Style::default().fg(Colors::BORDER_INACTIVE)
    }

    pub fn panel_bg() -> Style {
        Style::default().bg(Colors::BG_PRIMARY)
    }

    /// Row under the cursor
    pub fn highlighted() -> Style {
        Style::default()
            .bg(Colors::HIGHLIGHT_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Row that is the current selection
    pub fn chosen() -> Style {
        Style::default()
            .fg(Colors::SUCCESS)
            .add_modifier(Modifier::BOLD)
    }

    /// Prices
    pub fn price() -> Style {
        Style::default()
            .fg(Colors::SECONDARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn warning() -> Style {
        Style::default().fg(Colors::WARNING)
    }

    pub fn success() -> Style {
        Style::default().fg(Colors::SUCCESS)
    }

    /// Progress bar style
    pub fn progress() -> Style {
        Style::default().fg(Colors::PRIMARY).bg(Colors::BG_GAUGE)
    }

    /// Key name in the nav bar and help overlay
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Action label in the nav bar
    pub fn nav_hint() -> Style {
        Style::default().fg(Colors::FG_MUTED)
    }
}

// =============================================================================
// UI CONSTANTS
// =============================================================================

/// Layout constants shared by the screens
pub struct UiConstants;

impl UiConstants {
    /// Title line plus progress gauge
    pub const HEADER_HEIGHT: u16 = 4;

    pub const STATUS_BAR_HEIGHT: u16 = 1;

    pub const NAV_BAR_HEIGHT: u16 = 1;

    /// Height of the running total panel on the speed step
    pub const TOTAL_PANEL_HEIGHT: u16 = 3;
}

/// Fixed UI strings
pub struct UiText;

impl UiText {
    pub const APP_TITLE: &'static str = "Подключение домашнего интернета";
    pub const SUBMITTING: &'static str = "Отправляем заявку...";
    pub const PRESS_ANY_KEY: &'static str = "Нажмите любую клавишу, чтобы закрыть";
    pub const EQUIPMENT: &'static str = "Аренда ТВ-приставки";
    pub const TOTAL: &'static str = "Итого";
    pub const PER_MONTH: &'static str = "/мес";
}
