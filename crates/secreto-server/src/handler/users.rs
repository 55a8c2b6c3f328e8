//! User profile handlers.
//!
//! The caller's own profile includes contact details; every other profile is
//! served in its public shape.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use secreto_postgres::PgClient;
use secreto_postgres::query::UserRepository;
use validator::Validate;

use crate::extract::{AuthState, Json, Path, Query, ValidateJson};
use crate::handler::request::{SearchUsers, UpdateProfile, UsernamePathParams};
use crate::handler::response::{ErrorResponse, PublicUser, PublicUsers, UserProfile};
use crate::handler::{ErrorKind, Result};
use crate::middleware::BEARER_SCHEME;
use crate::service::ServiceState;

/// Tracing target for user operations.
const TRACING_TARGET: &str = "secreto_server::handler::users";

/// Returns the profile of the authenticated caller.
#[tracing::instrument(skip_all, fields(user_id = %identity.user_id()))]
async fn read_me(AuthState(identity): AuthState) -> Result<(StatusCode, Json<UserProfile>)> {
    tracing::debug!(target: TRACING_TARGET, "Reading own profile");
    Ok((StatusCode::OK, Json(identity.into_user().into())))
}

fn read_me_docs(op: TransformOperation) -> TransformOperation {
    op.security_requirement(BEARER_SCHEME)
        .summary("Get own profile")
        .description("Returns the caller's profile including contact details.")
        .response::<200, Json<UserProfile>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Updates the name or bio of the authenticated caller.
#[tracing::instrument(skip_all, fields(user_id = %identity.user_id()))]
async fn update_me(
    State(pg_client): State<PgClient>,
    AuthState(identity): AuthState,
    ValidateJson(request): ValidateJson<UpdateProfile>,
) -> Result<(StatusCode, Json<UserProfile>)> {
    tracing::debug!(target: TRACING_TARGET, "Updating own profile");

    let mut conn = pg_client.get_connection().await?;
    let Some(user) = conn
        .update_user(identity.user_id(), request.into_model())
        .await?
    else {
        // Deleted between identity resolution and the update.
        return Err(ErrorKind::NotFound
            .with_message("User not found")
            .with_resource("user"));
    };

    tracing::info!(target: TRACING_TARGET, "Profile updated");

    Ok((StatusCode::OK, Json(user.into())))
}

fn update_me_docs(op: TransformOperation) -> TransformOperation {
    op.security_requirement(BEARER_SCHEME)
        .summary("Update own profile")
        .description("Sets the caller's display name or biography. Absent fields are kept.")
        .response::<200, Json<UserProfile>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Lists users whose username contains the query.
#[tracing::instrument(skip_all)]
async fn search_users(
    State(pg_client): State<PgClient>,
    Query(query): Query<SearchUsers>,
) -> Result<(StatusCode, Json<PublicUsers>)> {
    query.validate()?;
    tracing::debug!(target: TRACING_TARGET, query = %query.q, "Searching users");

    let mut conn = pg_client.get_connection().await?;
    let users = conn
        .search_users_by_username(&query.q, query.pagination())
        .await?;

    tracing::debug!(
        target: TRACING_TARGET,
        user_count = users.len(),
        "Users found",
    );

    let response = users.into_iter().map(PublicUser::from).collect();
    Ok((StatusCode::OK, Json(response)))
}

fn search_users_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Search users")
        .description("Returns public profiles whose username contains `q`.")
        .response::<200, Json<PublicUsers>>()
        .response::<400, Json<ErrorResponse>>()
}

/// Returns the public profile of a user.
#[tracing::instrument(skip_all, fields(username = %path_params.username))]
async fn read_user(
    State(pg_client): State<PgClient>,
    Path(path_params): Path<UsernamePathParams>,
) -> Result<(StatusCode, Json<PublicUser>)> {
    tracing::debug!(target: TRACING_TARGET, "Reading user profile");

    let mut conn = pg_client.get_connection().await?;
    let Some(user) = conn.find_user_by_username(&path_params.username).await? else {
        return Err(ErrorKind::NotFound
            .with_message("User not found")
            .with_resource("user"));
    };

    Ok((StatusCode::OK, Json(user.into())))
}

fn read_user_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get user profile")
        .description("Returns the public profile of a user.")
        .response::<200, Json<PublicUser>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns a [`Router`] with the routes acting on the caller's own profile.
///
/// [`Router`]: axum::routing::Router
pub fn private_routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/users/me",
            get_with(read_me, read_me_docs).patch_with(update_me, update_me_docs),
        )
        .with_path_items(|item| item.tag("Users"))
}

/// Returns a [`Router`] with the public user routes.
///
/// [`Router`]: axum::routing::Router
pub fn public_routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/users/search", get_with(search_users, search_users_docs))
        .api_route("/users/{username}", get_with(read_user, read_user_docs))
        .with_path_items(|item| item.tag("Users"))
}
