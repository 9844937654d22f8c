//! Terminal front end for Stratus: styling, screens and the menu loop.

pub mod app;
pub mod display;
mod settings;
pub mod spinner;
pub mod style;
pub mod views;

pub use app::{build_service, App};
pub use display::Printer;
pub use style::Theme;
