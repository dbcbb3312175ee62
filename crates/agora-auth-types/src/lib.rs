//! Auth types shared across Agora services.
//!
//! Provides access-token validation and the `CurrentUser` extractor that
//! protected handlers use to learn who is calling.

pub mod identity;
pub mod token;
