// src/lib.rs
pub mod config;
pub mod endpoint;
pub mod executor;
pub mod health;
pub mod probes;
pub mod registry;
pub mod server;
