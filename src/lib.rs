//! TKAN - Terminal Kanban Library
//!
//! A three-lane kanban board for the terminal, persisted to a local
//! key-value store after every change.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
