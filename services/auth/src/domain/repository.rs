#![allow(async_fn_in_trait)]

use crate::domain::types::AuthUser;
use crate::error::AuthServiceError;

/// Port for looking up users by their login identifier.
///
/// Implemented by the persistence collaborator; lookup failures other than
/// "not found" surface as [`AuthServiceError::Internal`].
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthServiceError>;
}
