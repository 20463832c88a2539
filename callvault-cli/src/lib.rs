//! Operator tooling around the callvault decryption engine.

pub mod commands;
pub mod config;
pub mod logging;

pub use config::CallvaultConfig;
