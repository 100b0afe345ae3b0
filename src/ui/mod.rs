//! User interface layer
//!
//! The interactive form application and its render widgets.

pub mod result_cards;
pub mod tui_app;
