//! Reusable UI components
//!
//! - `keybindings` - Per-screen key maps, nav bar items and help content
//! - `help_overlay` - Floating help window

pub mod help_overlay;
pub mod keybindings;
