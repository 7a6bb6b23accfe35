//! Fake user directories.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use orderflow_core::error::DomainError;
use orderflow_core::user::{UserDirectory, UserInfo};

/// Builds a deterministic profile for the given user id.
///
/// # Panics
///
/// Never panics; the fixture date is valid.
#[must_use]
pub fn user_fixture(id: i64) -> UserInfo {
    UserInfo {
        id,
        name: format!("user-{id}"),
        surname: "Fixture".to_string(),
        birth_date: NaiveDate::from_ymd_opt(1990, 6, 15).unwrap(),
        email: format!("user-{id}@example.test"),
    }
}

/// A user directory serving a fixed set of profiles. Unknown ids and emails
/// resolve to `DomainError::NotFound`, like a 404 from the real service.
#[derive(Debug, Default)]
pub struct StaticUserDirectory {
    users: Mutex<HashMap<i64, UserInfo>>,
}

impl StaticUserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory preloaded with fixture profiles for `ids`.
    #[must_use]
    pub fn with_users(ids: &[i64]) -> Self {
        let directory = Self::new();
        for &id in ids {
            directory.add(user_fixture(id));
        }
        directory
    }

    /// Adds one profile.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn add(&self, user: UserInfo) {
        self.users.lock().unwrap().insert(user.id, user);
    }

    /// Removes one profile, simulating a user deleted out from under an
    /// existing order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn remove(&self, id: i64) {
        self.users.lock().unwrap().remove(&id);
    }
}

#[async_trait]
impl UserDirectory for StaticUserDirectory {
    async fn user_by_id(&self, id: i64) -> Result<UserInfo, DomainError> {
        self.users
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("user", id))
    }

    async fn user_by_email(&self, email: &str) -> Result<UserInfo, DomainError> {
        self.users
            .lock()
            .unwrap()
            .values()
            .find(|user| user.email == email)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("user with email {email} not found")))
    }
}

/// A user directory that always fails with an upstream error. Useful for
/// testing 500 paths.
#[derive(Debug)]
pub struct FailingUserDirectory;

#[async_trait]
impl UserDirectory for FailingUserDirectory {
    async fn user_by_id(&self, _id: i64) -> Result<UserInfo, DomainError> {
        Err(DomainError::Upstream("user service unreachable".into()))
    }

    async fn user_by_email(&self, _email: &str) -> Result<UserInfo, DomainError> {
        Err(DomainError::Upstream("user service unreachable".into()))
    }
}
