//! All `aide::`[`ApiRouter`]s with related `axum::`[`Handler`]s.
//!
//! # Usage Example
//!
//! ```rust,ignore
//! use aide::axum::ApiRouter;
//! use aide::axum::routing::get;
//! use secreto_server::handler::{CustomRoutes, routes};
//! use secreto_server::middleware::{OpenApiConfig, RouterOpenApiExt};
//! use secreto_server::service::{ServiceConfig, ServiceState};
//!
//! async fn custom_handler() -> &'static str {
//!     "Hello from custom route!"
//! }
//!
//! # async fn example(config: ServiceConfig) -> anyhow::Result<()> {
//! let state = ServiceState::from_config(&config).await?;
//!
//! let custom_routes = CustomRoutes::new()
//!     .with_private_routes(ApiRouter::new().api_route("/custom-private", get(custom_handler)))
//!     .with_public_routes(ApiRouter::new().api_route("/custom-public", get(custom_handler)));
//!
//! let router = routes(custom_routes, state.clone())
//!     .with_open_api(OpenApiConfig::default())
//!     .with_state(state);
//! # Ok(())
//! # }
//! ```
//!
//! [`ApiRouter`]: aide::axum::ApiRouter
//! [`Handler`]: axum::handler::Handler

mod authentication;
mod error;
mod favorites;
mod messages;
mod monitors;
mod request;
mod response;
mod root;
mod users;
mod utility;

use aide::axum::ApiRouter;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::response::ErrorResponse;
pub use crate::handler::utility::CustomRoutes;
use crate::middleware::RouterAuthExt;
use crate::service::ServiceState;

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns an [`ApiRouter`] with all routes that require a session token.
fn private_routes(
    additional_routes: Option<ApiRouter<ServiceState>>,
    state: ServiceState,
) -> ApiRouter<ServiceState> {
    let mut router = ApiRouter::new()
        .merge(users::private_routes())
        .merge(favorites::routes());

    if let Some(additional) = additional_routes {
        router = router.merge(additional);
    }

    router.with_authentication(state)
}

/// Returns an [`ApiRouter`] with all public routes.
///
/// Message routes live here because `/messages` mixes an anonymous `POST`
/// with an authenticated `GET`; the protected handlers extract the identity
/// themselves.
fn public_routes(additional_routes: Option<ApiRouter<ServiceState>>) -> ApiRouter<ServiceState> {
    let mut router = ApiRouter::new()
        .merge(root::routes())
        .merge(monitors::routes())
        .merge(authentication::routes())
        .merge(users::public_routes())
        .merge(messages::routes());

    if let Some(additional) = additional_routes {
        router = router.merge(additional);
    }

    router
}

/// Returns an [`ApiRouter`] with all routes.
///
/// Unmatched paths answer with the `404` error body.
pub fn routes(routes: CustomRoutes, state: ServiceState) -> ApiRouter<ServiceState> {
    let private_router = private_routes(routes.private_routes, state);
    let public_router = public_routes(routes.public_routes);

    ApiRouter::new()
        .merge(private_router)
        .merge(public_router)
        .fallback(handler)
}

#[cfg(test)]
pub(crate) mod test {
    use aide::axum::ApiRouter;
    use axum::Router;
    use axum::http::header;
    use axum_test::TestServer;
    use jiff::{SignedDuration, Timestamp};
    use secreto_postgres::PgConfig;
    use serde_json::json;
    use uuid::Uuid;

    use super::authentication;
    use crate::handler::response::AccessToken;
    use crate::handler::{CustomRoutes, routes};
    use crate::middleware::{OpenApiConfig, RouterOpenApiExt};
    use crate::service::{
        CredentialGuard, FixedClock, ServiceConfig, ServiceState, SessionKeys, SessionKeysConfig,
    };

    /// Signing secret shared by every test server.
    pub const TEST_AUTH_SECRET: &str = "secreto-test-secret-0123456789abcdef";

    /// Password used by [`signup_test_user`].
    pub const TEST_PASSWORD: &str = "trinity123";

    /// Returns a guard signing with [`TEST_AUTH_SECRET`].
    pub fn test_guard() -> anyhow::Result<CredentialGuard> {
        let keys = SessionKeys::from_config(&SessionKeysConfig::new(TEST_AUTH_SECRET))?;
        Ok(CredentialGuard::new(keys))
    }

    /// Returns a state whose database is never reachable.
    ///
    /// The pool connects lazily, so routes that do not touch Postgres work as
    /// usual and routes that do fail fast.
    pub fn test_state() -> anyhow::Result<ServiceState> {
        let postgres = PgConfig::new("postgresql://secreto@localhost:1/secreto")
            .with_connection_timeout_secs(1)
            .build()?;

        Ok(ServiceState::new(postgres, test_guard()?))
    }

    /// Returns a new [`TestServer`] with the given router and an offline state.
    pub fn create_test_server_with_router(
        router: impl Fn(ServiceState) -> ApiRouter<ServiceState>,
    ) -> anyhow::Result<TestServer> {
        let state = test_state()?;
        let router = router(state.clone());
        create_test_server_with_state(router, state)
    }

    /// Returns a new [`TestServer`] with the given router and state.
    pub fn create_test_server_with_state(
        router: ApiRouter<ServiceState>,
        state: ServiceState,
    ) -> anyhow::Result<TestServer> {
        let app: Router = router.with_state(state).into();
        let server = TestServer::new(app)?;
        Ok(server)
    }

    /// Returns a new [`TestServer`] backed by the database at `POSTGRES_URL`.
    ///
    /// Authentication routes are always mounted so tests can sign up users.
    pub async fn create_database_test_server(
        router: impl Fn(ServiceState) -> ApiRouter<ServiceState>,
    ) -> anyhow::Result<TestServer> {
        let database_url = std::env::var("POSTGRES_URL")?;
        let config = ServiceConfig::builder()
            .with_postgres(PgConfig::new(database_url))
            .with_session(SessionKeysConfig::new(TEST_AUTH_SECRET))
            .build()?;

        let state = ServiceState::from_config(&config).await?;
        let router = router(state.clone()).merge(authentication::routes());
        create_test_server_with_state(router, state)
    }

    /// Registers a fresh user and returns its username and access token.
    pub async fn signup_test_user(server: &TestServer) -> anyhow::Result<(String, String)> {
        let username = format!("user_{}", Uuid::new_v4().simple());

        let response = server
            .post("/auth/signup")
            .json(&json!({ "username": username, "password": TEST_PASSWORD }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);

        let token = response.json::<AccessToken>().access_token;
        Ok((username, token))
    }

    /// Returns a new [`TestServer`] with every route and an offline state.
    pub fn create_test_server() -> anyhow::Result<TestServer> {
        create_test_server_with_router(|state| routes(CustomRoutes::new(), state))
    }

    #[tokio::test]
    async fn handlers() -> anyhow::Result<()> {
        let server = create_test_server()?;
        assert!(server.is_running());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server.get("/there/is/no/spoon").await;
        response.assert_status_not_found();
        response.assert_json_contains(&json!({ "name": "not_found" }));

        Ok(())
    }

    #[tokio::test]
    async fn rejected_tokens_are_indistinguishable() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let issued_at: Timestamp = Timestamp::now() - SignedDuration::from_hours(2);
        let expired = test_guard()?
            .with_clock(FixedClock::new(issued_at))
            .create_token("neo")?;

        let forged = CredentialGuard::new(SessionKeys::from_config(&SessionKeysConfig::new(
            "a-different-secret-0123456789abcdef",
        ))?)
        .create_token("neo")?;

        let expected = json!({
            "name": "unauthorized",
            "message": "Could not validate credentials",
        });

        let missing = server.get("/users/me").await;
        missing.assert_status_unauthorized();
        missing.assert_json(&expected);

        for token in ["not-a-token", expired.as_str(), forged.as_str()] {
            let response = server.get("/users/me").authorization_bearer(token).await;
            response.assert_status_unauthorized();
            response.assert_json(&expected);
            assert_eq!(
                response.header(header::WWW_AUTHENTICATE).to_str()?,
                "Bearer"
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn serves_openapi_document() -> anyhow::Result<()> {
        let state = test_state()?;
        let app: Router = routes(CustomRoutes::new(), state.clone())
            .with_open_api(OpenApiConfig::default())
            .with_state(state);
        let server = TestServer::new(app)?;

        let response = server.get("/api/openapi.json").await;
        response.assert_status_ok();
        let document = response.json::<serde_json::Value>();
        assert!(document["paths"]["/auth/signup"].is_object());
        assert!(document["paths"]["/messages"].is_object());
        assert_eq!(
            document["components"]["securitySchemes"]["bearer"]["scheme"],
            "bearer"
        );
        assert!(document["paths"]["/users/me"]["get"]["security"].is_array());

        Ok(())
    }
}
