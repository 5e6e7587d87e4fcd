//! Terminal User Interface for browsing a heap snapshot.
//!
//! This module provides an interactive TUI similar to atop/htop for walking
//! the object graph of a loaded dump: summary, object and garbage listings,
//! and a drill-down detail popup.

mod app;
mod event;
mod input;
mod models;
mod render;
mod state;
mod style;
mod table;
mod widgets;

pub use app::App;
pub use state::{AppState, Tab};
