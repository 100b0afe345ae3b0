//! Configuration module
//!
//! Settings loaded from the TOML config file, with env-var override for
//! the service endpoint.

pub mod config;
