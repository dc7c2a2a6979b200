//! Presentation layer handling terminal UI and user input.
//!
//! This module manages the terminal user interface using ratatui,
//! handles keyboard and mouse input, and renders the board lanes.

pub mod input;
pub mod layout;
pub mod ui;

pub use input::*;
pub use layout::*;
pub use ui::*;
