//! Application service layer - config, estimate endpoint, upstream proxy

pub mod app;
pub mod config;
pub mod proxy;
