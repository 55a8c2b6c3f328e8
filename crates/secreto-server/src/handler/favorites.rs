//! Favorite user handlers.
//!
//! A favorite is a one-way bookmark from the caller to another user.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use secreto_postgres::PgClient;
use secreto_postgres::model::NewFavorite;
use secreto_postgres::query::{FavoriteRepository, UserRepository};

use crate::extract::{AuthState, Json, Path};
use crate::handler::request::UserIdPathParams;
use crate::handler::response::{ActionMessage, ErrorResponse, PublicUser, PublicUsers};
use crate::handler::{ErrorKind, Result};
use crate::middleware::BEARER_SCHEME;
use crate::service::ServiceState;

/// Tracing target for favorite operations.
const TRACING_TARGET: &str = "secreto_server::handler::favorites";

/// Adds a user to the caller's favorites.
#[tracing::instrument(
    skip_all,
    fields(
        user_id = %identity.user_id(),
        favorite_user_id = %path_params.user_id,
    )
)]
async fn add_favorite(
    State(pg_client): State<PgClient>,
    AuthState(identity): AuthState,
    Path(path_params): Path<UserIdPathParams>,
) -> Result<(StatusCode, Json<ActionMessage>)> {
    tracing::debug!(target: TRACING_TARGET, "Adding favorite");

    if path_params.user_id == identity.user_id() {
        return Err(ErrorKind::BadRequest
            .with_message("Cannot add yourself to favorites")
            .with_resource("favorite"));
    }

    let mut conn = pg_client.get_connection().await?;
    if conn.find_user_by_id(path_params.user_id).await?.is_none() {
        return Err(ErrorKind::NotFound
            .with_message("User not found")
            .with_resource("user"));
    }

    let new_favorite = NewFavorite {
        user_id: identity.user_id(),
        favorite_user_id: path_params.user_id,
    };

    let Some(favorite) = conn.create_favorite(new_favorite).await? else {
        tracing::debug!(target: TRACING_TARGET, "Favorite already present");
        return Ok((
            StatusCode::OK,
            Json(ActionMessage::new("Already previously added")),
        ));
    };

    tracing::info!(
        target: TRACING_TARGET,
        favorite_id = %favorite.id,
        "Favorite added",
    );

    Ok((StatusCode::OK, Json(ActionMessage::new("Added to favorites"))))
}

fn add_favorite_docs(op: TransformOperation) -> TransformOperation {
    op.security_requirement(BEARER_SCHEME)
        .summary("Add favorite")
        .description("Adds a user to the caller's favorites. Adding twice is not an error.")
        .response::<200, Json<ActionMessage>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Lists the users the caller has favorited.
#[tracing::instrument(skip_all, fields(user_id = %identity.user_id()))]
async fn list_favorites(
    State(pg_client): State<PgClient>,
    AuthState(identity): AuthState,
) -> Result<(StatusCode, Json<PublicUsers>)> {
    tracing::debug!(target: TRACING_TARGET, "Listing favorites");

    let mut conn = pg_client.get_connection().await?;
    let users = conn.list_favorite_users(identity.user_id()).await?;

    tracing::debug!(
        target: TRACING_TARGET,
        favorite_count = users.len(),
        "Favorites listed",
    );

    let response = users.into_iter().map(PublicUser::from).collect();
    Ok((StatusCode::OK, Json(response)))
}

fn list_favorites_docs(op: TransformOperation) -> TransformOperation {
    op.security_requirement(BEARER_SCHEME)
        .summary("List favorites")
        .description("Returns the public profiles of the caller's favorites.")
        .response::<200, Json<PublicUsers>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Removes a user from the caller's favorites.
#[tracing::instrument(
    skip_all,
    fields(
        user_id = %identity.user_id(),
        favorite_user_id = %path_params.user_id,
    )
)]
async fn remove_favorite(
    State(pg_client): State<PgClient>,
    AuthState(identity): AuthState,
    Path(path_params): Path<UserIdPathParams>,
) -> Result<(StatusCode, Json<ActionMessage>)> {
    tracing::debug!(target: TRACING_TARGET, "Removing favorite");

    let mut conn = pg_client.get_connection().await?;
    let removed = conn
        .delete_favorite(identity.user_id(), path_params.user_id)
        .await?;

    if !removed {
        return Err(ErrorKind::NotFound
            .with_message("Favorite not found")
            .with_resource("favorite"));
    }

    tracing::info!(target: TRACING_TARGET, "Favorite removed");

    Ok((
        StatusCode::OK,
        Json(ActionMessage::new("User removed from favorites")),
    ))
}

fn remove_favorite_docs(op: TransformOperation) -> TransformOperation {
    op.security_requirement(BEARER_SCHEME)
        .summary("Remove favorite")
        .description("Removes a user from the caller's favorites.")
        .response::<200, Json<ActionMessage>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns a [`Router`] with all favorite routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/users/favorites/list",
            get_with(list_favorites, list_favorites_docs),
        )
        .api_route(
            "/users/favorites/{user_id}",
            post_with(add_favorite, add_favorite_docs)
                .delete_with(remove_favorite, remove_favorite_docs),
        )
        .with_path_items(|item| item.tag("Favorites"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use uuid::Uuid;

    use super::*;
    use crate::handler::test::{
        create_database_test_server, create_test_server_with_router, signup_test_user,
    };
    use crate::handler::users;

    #[tokio::test]
    async fn favorites_require_token() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes())?;

        server
            .get("/users/favorites/list")
            .await
            .assert_status_unauthorized();
        server
            .post(&format!("/users/favorites/{}", Uuid::new_v4()))
            .await
            .assert_status_unauthorized();

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires POSTGRES_URL"]
    async fn favorite_lifecycle() -> anyhow::Result<()> {
        let server = create_database_test_server(|_| {
            routes()
                .merge(users::private_routes())
                .merge(users::public_routes())
        })
        .await?;

        let (_, token) = signup_test_user(&server).await?;
        let (other, _) = signup_test_user(&server).await?;
        let other = server.get(&format!("/users/{other}")).await.json::<PublicUser>();
        let me = server
            .get("/users/me")
            .authorization_bearer(&token)
            .await
            .json::<PublicUser>();

        let path = format!("/users/favorites/{}", other.id);
        let response = server.post(&path).authorization_bearer(&token).await;
        response.assert_json(&json!({ "message": "Added to favorites" }));
        let response = server.post(&path).authorization_bearer(&token).await;
        response.assert_json(&json!({ "message": "Already previously added" }));

        let response = server
            .post(&format!("/users/favorites/{}", me.id))
            .authorization_bearer(&token)
            .await;
        response.assert_status_bad_request();

        let response = server
            .post(&format!("/users/favorites/{}", Uuid::new_v4()))
            .authorization_bearer(&token)
            .await;
        response.assert_status_not_found();

        let favorites = server
            .get("/users/favorites/list")
            .authorization_bearer(&token)
            .await
            .json::<PublicUsers>();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id, other.id);

        let response = server.delete(&path).authorization_bearer(&token).await;
        response.assert_json(&json!({ "message": "User removed from favorites" }));
        let response = server.delete(&path).authorization_bearer(&token).await;
        response.assert_status_not_found();
        response.assert_json_contains(&json!({ "message": "Favorite not found" }));

        Ok(())
    }
}
