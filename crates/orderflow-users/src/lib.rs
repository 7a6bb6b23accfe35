//! Orderflow Users — HTTP client for the external user service.
//!
//! A single call-and-translate boundary: the remote 404 becomes
//! `DomainError::NotFound`, every other failure (timeout, 5xx, malformed
//! body) becomes `DomainError::Upstream`. Nothing is retried here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use orderflow_core::error::DomainError;
use orderflow_core::user::{UserDirectory, UserInfo};

/// User-service client over HTTP with an explicit request timeout.
#[derive(Debug, Clone)]
pub struct HttpUserClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpUserClient {
    /// Creates a client against `base_url` (no trailing slash) with the
    /// given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Upstream` if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Upstream(format!("failed to build user client: {e}")))?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self { client, base_url })
    }

    async fn fetch(&self, url: String, subject: String) -> Result<UserInfo, DomainError> {
        debug!(url = %url, "fetching user profile");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DomainError::Upstream(format!("user service request failed: {e}")))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(DomainError::NotFound(format!("{subject} not found")));
        }
        if !response.status().is_success() {
            return Err(DomainError::Upstream(format!(
                "user service returned {} for {subject}",
                response.status()
            )));
        }

        response
            .json::<UserInfo>()
            .await
            .map_err(|e| DomainError::Upstream(format!("malformed user service response: {e}")))
    }
}

#[async_trait]
impl UserDirectory for HttpUserClient {
    async fn user_by_id(&self, id: i64) -> Result<UserInfo, DomainError> {
        self.fetch(
            format!("{}/{id}", self.base_url),
            format!("user with id {id}"),
        )
        .await
    }

    async fn user_by_email(&self, email: &str) -> Result<UserInfo, DomainError> {
        self.fetch(
            format!("{}/email/{email}", self.base_url),
            format!("user with email {email}"),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::extract::Path;
    use axum::http::StatusCode as AxumStatus;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};

    use orderflow_test_support::user_fixture;

    /// Serves a stub user service on an ephemeral local port and returns
    /// its base URL. Only user 1 exists; `/broken` always answers 500 and
    /// `/garbled` answers 200 with a non-JSON body.
    async fn spawn_user_service() -> String {
        let app = Router::new()
            .route(
                "/users/{id}",
                get(|Path(id): Path<i64>| async move {
                    if id == 1 {
                        Json(user_fixture(1)).into_response()
                    } else {
                        AxumStatus::NOT_FOUND.into_response()
                    }
                }),
            )
            .route(
                "/users/email/{email}",
                get(|Path(email): Path<String>| async move {
                    let known = user_fixture(1);
                    if email == known.email {
                        Json(known).into_response()
                    } else {
                        AxumStatus::NOT_FOUND.into_response()
                    }
                }),
            )
            .route(
                "/broken/{id}",
                get(|| async { AxumStatus::INTERNAL_SERVER_ERROR }),
            )
            .route("/garbled/{id}", get(|| async { "user profile, honest" }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client_for(base: &str) -> HttpUserClient {
        HttpUserClient::new(base, Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_known_user_resolves_by_id_and_email() {
        let base = spawn_user_service().await;
        let client = client_for(&format!("{base}/users"));

        let by_id = client.user_by_id(1).await.unwrap();
        assert_eq!(by_id, user_fixture(1));

        let by_email = client.user_by_email(&by_id.email).await.unwrap();
        assert_eq!(by_email, user_fixture(1));
    }

    #[tokio::test]
    async fn test_remote_404_becomes_not_found() {
        let base = spawn_user_service().await;
        let client = client_for(&format!("{base}/users"));

        let err = client.user_by_id(99).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)), "got {err:?}");

        let err = client.user_by_email("nobody@example.test").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_remote_500_becomes_upstream() {
        let base = spawn_user_service().await;
        let client = client_for(&format!("{base}/broken"));

        let err = client.user_by_id(1).await.unwrap_err();
        assert!(matches!(err, DomainError::Upstream(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_malformed_body_becomes_upstream() {
        let base = spawn_user_service().await;
        let client = client_for(&format!("{base}/garbled"));

        let err = client.user_by_id(1).await.unwrap_err();
        assert!(matches!(err, DomainError::Upstream(_)), "got {err:?}");
    }

    #[test]
    fn test_new_strips_trailing_slashes_from_base_url() {
        let client =
            HttpUserClient::new("http://users.internal/api/users//", Duration::from_secs(5))
                .unwrap();
        assert_eq!(client.base_url, "http://users.internal/api/users");
    }

    #[tokio::test]
    async fn test_unreachable_host_surfaces_as_upstream() {
        // Reserved TEST-NET address; connection fails fast, never retried.
        let client =
            HttpUserClient::new("http://192.0.2.1:1/users", Duration::from_millis(200)).unwrap();
        let err = client.user_by_id(1).await.unwrap_err();
        assert!(matches!(err, DomainError::Upstream(_)));
    }
}
