pub mod desktop;
pub mod setup;
pub mod ui;
