//! Test utilities for Agora services.
//!
//! Import in tests only, never in production code.

pub mod auth;
pub mod env;
