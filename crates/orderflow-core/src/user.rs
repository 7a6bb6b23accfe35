//! User-service lookup abstraction.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Profile data returned by the external user service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    /// User identity in the user service.
    pub id: i64,
    /// Given name.
    pub name: String,
    /// Family name.
    pub surname: String,
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// Contact email.
    pub email: String,
}

/// Synchronous call-and-translate boundary to the user service.
///
/// Implementations translate the remote "not found" into
/// `DomainError::NotFound` and everything else (timeout, 5xx, malformed
/// body) into `DomainError::Upstream`. No retries.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetches a user profile by numeric id.
    async fn user_by_id(&self, id: i64) -> Result<UserInfo, DomainError>;

    /// Fetches a user profile by email.
    async fn user_by_email(&self, email: &str) -> Result<UserInfo, DomainError>;
}
