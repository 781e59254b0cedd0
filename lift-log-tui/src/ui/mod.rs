// lift-log-tui/src/ui/mod.rs
mod layout;
mod log_tab;
mod modals;
mod status_bar;

pub use layout::render_ui;
