//! Application layer managing state and board workflows.
//!
//! This module coordinates between the domain layer and presentation layer:
//! the board state container with its write-through persistence, and the
//! UI state driving it.

pub mod board;
pub mod state;

pub use board::*;
pub use state::*;
