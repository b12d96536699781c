//! Keybinding system for context-aware keyboard shortcuts
//!
//! Provides a registry of keybindings that change based on the current
//! screen. The app resolves key events through it, and the nav bar and
//! help overlay are generated from the same table.

use crate::app::Screen;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Actions that can be triggered by keybindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    NavigateUp,
    NavigateDown,
    /// Mark the highlighted row without moving on
    Select,
    /// Mark the highlighted row and move to the next step
    Choose,
    /// Move to the next step
    Next,
    Back,
    NextField,
    PreviousField,
    Submit,
    Dismiss,
    Quit,
    Help,
}

/// A keybinding definition
#[derive(Debug, Clone)]
pub struct Keybinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub action: KeyAction,
    pub display: String,
    pub description: String,
}

impl Keybinding {
    /// Create a new keybinding with no modifiers
    pub fn new(key: KeyCode, action: KeyAction, display: &str, description: &str) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::NONE,
            action,
            display: display.to_string(),
            description: description.to_string(),
        }
    }

    /// Create a keybinding with modifiers
    pub fn with_modifiers(
        key: KeyCode,
        modifiers: KeyModifiers,
        action: KeyAction,
        display: &str,
        description: &str,
    ) -> Self {
        Self {
            key,
            modifiers,
            action,
            display: display.to_string(),
            description: description.to_string(),
        }
    }

    fn matches(&self, event: &KeyEvent) -> bool {
        // Shift is implied by some keys (BackTab, upper-case letters)
        let relevant = event.modifiers.difference(KeyModifiers::SHIFT);
        self.key == event.code && self.modifiers.difference(KeyModifiers::SHIFT) == relevant
    }
}

/// Context-aware keybinding registry
pub struct KeybindingContext {
    /// Screen-specific keybindings
    screen_bindings: HashMap<Screen, Vec<Keybinding>>,
    /// Global keybindings (available on every screen)
    global_bindings: Vec<Keybinding>,
}

impl Default for KeybindingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl KeybindingContext {
    /// Create a new keybinding context with default bindings
    pub fn new() -> Self {
        let mut ctx = Self {
            screen_bindings: HashMap::new(),
            global_bindings: Vec::new(),
        };
        ctx.register_defaults();
        ctx
    }

    fn register_defaults(&mut self) {
        self.global_bindings = vec![
            Keybinding::new(KeyCode::F(1), KeyAction::Help, "F1", "Справка"),
            Keybinding::with_modifiers(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL,
                KeyAction::Quit,
                "Ctrl+C",
                "Выход",
            ),
        ];

        let list_bindings = |choose: &str| {
            vec![
                Keybinding::new(KeyCode::Up, KeyAction::NavigateUp, "Up", "Вверх"),
                Keybinding::new(KeyCode::Char('k'), KeyAction::NavigateUp, "k", "Вверх"),
                Keybinding::new(KeyCode::Down, KeyAction::NavigateDown, "Down", "Вниз"),
                Keybinding::new(KeyCode::Char('j'), KeyAction::NavigateDown, "j", "Вниз"),
                Keybinding::new(KeyCode::Enter, KeyAction::Choose, "Enter", choose),
                Keybinding::new(KeyCode::Char(' '), KeyAction::Select, "Space", "Отметить"),
                Keybinding::new(KeyCode::Right, KeyAction::Next, "Right", "Далее"),
                Keybinding::new(KeyCode::Esc, KeyAction::Back, "Esc", "Назад"),
                Keybinding::new(KeyCode::Left, KeyAction::Back, "Left", "Назад"),
                Keybinding::new(KeyCode::Char('?'), KeyAction::Help, "?", "Справка"),
                Keybinding::new(KeyCode::Char('q'), KeyAction::Quit, "q", "Выход"),
            ]
        };

        self.screen_bindings
            .insert(Screen::TradePoints, list_bindings("Выбрать точку"));
        self.screen_bindings
            .insert(Screen::Tariffs, list_bindings("Выбрать тариф"));
        self.screen_bindings
            .insert(Screen::SpeedOptions, list_bindings("Выбрать / переключить"));

        self.screen_bindings.insert(
            Screen::Contact,
            vec![
                Keybinding::new(KeyCode::Tab, KeyAction::NextField, "Tab", "Следующее поле"),
                Keybinding::new(KeyCode::Down, KeyAction::NextField, "Down", "Следующее поле"),
                Keybinding::new(KeyCode::BackTab, KeyAction::PreviousField, "S-Tab", "Предыдущее поле"),
                Keybinding::new(KeyCode::Up, KeyAction::PreviousField, "Up", "Предыдущее поле"),
                Keybinding::new(KeyCode::Enter, KeyAction::NextField, "Enter", "Следующее поле / далее"),
                Keybinding::new(KeyCode::PageDown, KeyAction::Next, "PgDn", "Далее"),
                Keybinding::new(KeyCode::Esc, KeyAction::Back, "Esc", "Назад"),
            ],
        );

        self.screen_bindings.insert(
            Screen::Confirmation,
            vec![
                Keybinding::new(KeyCode::Enter, KeyAction::Submit, "Enter", "Отправить заявку"),
                Keybinding::new(KeyCode::Esc, KeyAction::Back, "Esc", "Назад"),
                Keybinding::new(KeyCode::Left, KeyAction::Back, "Left", "Назад"),
                Keybinding::new(KeyCode::Char('?'), KeyAction::Help, "?", "Справка"),
                Keybinding::new(KeyCode::Char('q'), KeyAction::Quit, "q", "Выход"),
            ],
        );

        self.screen_bindings.insert(Screen::Submitting, Vec::new());

        self.screen_bindings.insert(
            Screen::Acknowledged,
            vec![
                Keybinding::new(KeyCode::Enter, KeyAction::Dismiss, "Enter", "Закрыть"),
                Keybinding::new(KeyCode::Esc, KeyAction::Dismiss, "Esc", "Закрыть"),
            ],
        );
    }

    /// Get keybindings for a specific screen (includes global bindings)
    pub fn get_bindings(&self, screen: Screen) -> Vec<&Keybinding> {
        let mut bindings: Vec<&Keybinding> = Vec::new();

        if let Some(screen_bindings) = self.screen_bindings.get(&screen) {
            bindings.extend(screen_bindings.iter());
        }
        bindings.extend(self.global_bindings.iter());

        bindings
    }

    /// Resolve a key event on a screen to an action.
    pub fn action_for(&self, screen: Screen, event: &KeyEvent) -> Option<KeyAction> {
        self.get_bindings(screen)
            .into_iter()
            .find(|b| b.matches(event))
            .map(|b| b.action)
    }

    /// Get navigation bar items for display
    pub fn get_nav_items(&self, screen: Screen) -> Vec<NavBarItem> {
        let priority_actions: &[KeyAction] = match screen {
            Screen::TradePoints | Screen::Tariffs | Screen::SpeedOptions => &[
                KeyAction::NavigateUp,
                KeyAction::Choose,
                KeyAction::Select,
                KeyAction::Next,
                KeyAction::Back,
                KeyAction::Help,
            ],
            Screen::Contact => &[
                KeyAction::NextField,
                KeyAction::PreviousField,
                KeyAction::Next,
                KeyAction::Back,
                KeyAction::Help,
            ],
            Screen::Confirmation => &[KeyAction::Submit, KeyAction::Back, KeyAction::Help],
            Screen::Submitting => &[KeyAction::Quit],
            Screen::Acknowledged => &[KeyAction::Dismiss],
        };

        let bindings = self.get_bindings(screen);
        let mut items = Vec::new();

        for action in priority_actions {
            if *action == KeyAction::NavigateUp {
                // Up/Down share one item
                items.push(NavBarItem {
                    action: KeyAction::NavigateUp,
                    key_display: "Up/Dn".to_string(),
                    action_label: "Навигация".to_string(),
                });
                continue;
            }
            if let Some(binding) = bindings.iter().find(|b| b.action == *action) {
                items.push(NavBarItem {
                    action: binding.action,
                    key_display: binding.display.clone(),
                    action_label: binding.description.clone(),
                });
            }
        }

        items
    }

    /// Get full help content for a screen (for help overlay)
    pub fn get_help_content(&self, screen: Screen) -> Vec<HelpSection> {
        let groups: [(&str, &[KeyAction]); 3] = [
            (
                "Навигация",
                &[
                    KeyAction::NavigateUp,
                    KeyAction::NavigateDown,
                    KeyAction::NextField,
                    KeyAction::PreviousField,
                ],
            ),
            (
                "Действия",
                &[
                    KeyAction::Choose,
                    KeyAction::Select,
                    KeyAction::Next,
                    KeyAction::Submit,
                    KeyAction::Dismiss,
                ],
            ),
            ("Общие", &[KeyAction::Back, KeyAction::Help, KeyAction::Quit]),
        ];

        let bindings = self.get_bindings(screen);
        groups
            .into_iter()
            .filter_map(|(title, actions)| {
                let items: Vec<(String, String)> = bindings
                    .iter()
                    .filter(|b| actions.contains(&b.action))
                    .map(|b| (b.display.clone(), b.description.clone()))
                    .collect();
                (!items.is_empty()).then(|| HelpSection {
                    title: title.to_string(),
                    items,
                })
            })
            .collect()
    }
}

/// Navigation bar item for display
#[derive(Debug, Clone)]
pub struct NavBarItem {
    pub action: KeyAction,
    pub key_display: String,
    pub action_label: String,
}

/// Help section for the help overlay
#[derive(Debug, Clone)]
pub struct HelpSection {
    pub title: String,
    pub items: Vec<(String, String)>,
}
