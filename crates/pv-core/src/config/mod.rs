//! # Pure Data Module - Data Transfer Objects Only
//!
//! Configuration data structures and the TOML → DTO mapping. No validation,
//! no business policy: whatever the file says is taken as a fact.

mod app_config;

pub use app_config::{AppConfig, GatewayConfig};
