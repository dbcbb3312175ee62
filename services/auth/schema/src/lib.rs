//! sea-orm entities read by the auth service.

pub mod users;
