//! Domain services - volume, consensus and pricing

pub mod service;

pub use service::*;
