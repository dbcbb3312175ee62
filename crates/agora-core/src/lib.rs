//! Ambient building blocks shared by Agora services.

pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod tracing;
