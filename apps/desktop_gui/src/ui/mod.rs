//! UI layer for the desktop app: app shell, section panels, and theme.

pub mod app;
pub mod content;
pub mod theme;

pub use app::CoralWatchApp;
