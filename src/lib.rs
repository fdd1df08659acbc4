pub mod api;
pub mod app;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod terminal;
