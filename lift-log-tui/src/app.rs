// lift-log-tui/src/app.rs
mod actions;
mod input;
mod modals;
mod navigation_helpers;
pub mod state;

pub use state::{ActiveModal, App, LogFocus};
