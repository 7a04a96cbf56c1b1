pub mod app;
pub mod dispatch;
pub mod event;
pub mod keymap;
pub mod layout;
pub mod panel;
pub mod runner;
pub mod view;
