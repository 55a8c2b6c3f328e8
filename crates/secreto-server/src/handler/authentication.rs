//! Authentication handlers for signup and login.
//!
//! Both operations answer with a bearer session token. Login failures never
//! reveal whether the username exists.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use secreto_postgres::PgClient;
use secreto_postgres::query::UserRepository;

use crate::extract::{Json, ValidateForm, ValidateJson};
use crate::handler::request::{Login, Signup};
use crate::handler::response::{AccessToken, ErrorResponse};
use crate::handler::{ErrorKind, Result};
use crate::service::{CredentialGuard, ServiceState};

/// Tracing target for authentication operations.
const TRACING_TARGET: &str = "secreto_server::handler::authentication";

/// Registers a new user and issues a session token.
#[tracing::instrument(skip_all, fields(username = %request.username))]
async fn signup(
    State(pg_client): State<PgClient>,
    State(guard): State<CredentialGuard>,
    ValidateJson(request): ValidateJson<Signup>,
) -> Result<(StatusCode, Json<AccessToken>)> {
    tracing::debug!(target: TRACING_TARGET, "Signing up");

    let mut conn = pg_client.get_connection().await?;
    if conn.username_exists(&request.username).await? {
        tracing::debug!(target: TRACING_TARGET, "Username already taken");
        return Err(ErrorKind::BadRequest
            .with_message("Username already registered")
            .with_resource("user"));
    }

    let password_hash = guard.hash_password(&request.password)?;
    // The unique index still rejects a concurrent signup with the same name.
    let user = conn.create_user(request.into_model(password_hash)).await?;
    let access_token = guard.create_token(&user.username)?;

    tracing::info!(
        target: TRACING_TARGET,
        user_id = %user.id,
        "User signed up",
    );

    Ok((StatusCode::CREATED, Json(AccessToken::bearer(access_token))))
}

fn signup_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Sign up")
        .description("Creates a user and returns a bearer session token.")
        .response::<201, Json<AccessToken>>()
        .response::<400, Json<ErrorResponse>>()
}

/// Checks credentials and issues a session token.
///
/// Takes the OAuth2 password form; a JSON body with the same fields works too.
#[tracing::instrument(skip_all, fields(username = %request.username))]
async fn login(
    State(pg_client): State<PgClient>,
    State(guard): State<CredentialGuard>,
    ValidateForm(request): ValidateForm<Login>,
) -> Result<(StatusCode, Json<AccessToken>)> {
    tracing::debug!(target: TRACING_TARGET, "Logging in");

    let user = guard
        .authenticate(&request.username, &request.password, &pg_client)
        .await?;
    let access_token = guard.create_token(&user.username)?;

    tracing::info!(
        target: TRACING_TARGET,
        user_id = %user.id,
        "Session token issued",
    );

    Ok((StatusCode::OK, Json(AccessToken::bearer(access_token))))
}

fn login_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Log in")
        .description(
            "Exchanges a username and password, sent as a URL-encoded or multipart \
            form, for a bearer session token. Unknown users and wrong passwords \
            get the same response.",
        )
        .response::<200, Json<AccessToken>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Returns a [`Router`] with all authentication routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/auth/signup", post_with(signup, signup_docs))
        .api_route("/auth/token", post_with(login, login_docs))
        .with_path_items(|item| item.tag("Authentication"))
}
