//! Anonymous message handlers.
//!
//! Anyone may send a message to a user by name; the sender is neither
//! required to authenticate nor recorded. Receivers triage their inbox and
//! choose which messages appear on their public board.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use secreto_postgres::PgClient;
use secreto_postgres::query::{MessageRepository, UserRepository};

use crate::extract::{AuthState, Json, Path, Query, ValidateJson};
use crate::handler::request::{
    ListMessagesQuery, MessagePathParams, SendMessage, UpdateStatusQuery, UsernamePathParams,
};
use crate::handler::response::{ActionMessage, ErrorResponse, Message, Messages};
use crate::handler::{ErrorKind, Result};
use crate::middleware::BEARER_SCHEME;
use crate::service::ServiceState;

/// Tracing target for message operations.
const TRACING_TARGET: &str = "secreto_server::handler::messages";

/// Delivers an anonymous message to a user.
#[tracing::instrument(skip_all)]
async fn send_message(
    State(pg_client): State<PgClient>,
    ValidateJson(request): ValidateJson<SendMessage>,
) -> Result<(StatusCode, Json<ActionMessage>)> {
    tracing::debug!(target: TRACING_TARGET, "Sending message");

    let mut conn = pg_client.get_connection().await?;
    let Some(receiver) = conn.find_user_by_username(&request.receiver_username).await? else {
        return Err(ErrorKind::NotFound
            .with_message("User not found")
            .with_resource("user"));
    };

    let message = conn.create_message(request.into_model(receiver.id)).await?;

    tracing::info!(
        target: TRACING_TARGET,
        message_id = %message.id,
        "Message delivered",
    );

    Ok((
        StatusCode::CREATED,
        Json(ActionMessage::new("Message sent anonymously")),
    ))
}

fn send_message_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Send message")
        .description("Sends an anonymous message to a user. No authentication is required.")
        .response::<201, Json<ActionMessage>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Lists the caller's received messages, newest first.
#[tracing::instrument(skip_all, fields(user_id = %identity.user_id()))]
async fn list_messages(
    State(pg_client): State<PgClient>,
    AuthState(identity): AuthState,
    Query(query): Query<ListMessagesQuery>,
) -> Result<(StatusCode, Json<Messages>)> {
    tracing::debug!(
        target: TRACING_TARGET,
        status = ?query.status,
        "Listing messages",
    );

    let mut conn = pg_client.get_connection().await?;
    let messages = conn
        .list_received_messages(identity.user_id(), query.status)
        .await?;

    tracing::debug!(
        target: TRACING_TARGET,
        message_count = messages.len(),
        "Messages listed",
    );

    Ok((StatusCode::OK, Json(Message::from_models(messages))))
}

fn list_messages_docs(op: TransformOperation) -> TransformOperation {
    op.security_requirement(BEARER_SCHEME)
        .summary("List messages")
        .description("Returns the caller's messages, optionally filtered by status.")
        .response::<200, Json<Messages>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Moves one of the caller's messages to another status.
#[tracing::instrument(
    skip_all,
    fields(
        user_id = %identity.user_id(),
        message_id = %path_params.message_id,
    )
)]
async fn update_message_status(
    State(pg_client): State<PgClient>,
    AuthState(identity): AuthState,
    Path(path_params): Path<MessagePathParams>,
    Query(query): Query<UpdateStatusQuery>,
) -> Result<(StatusCode, Json<ActionMessage>)> {
    tracing::debug!(
        target: TRACING_TARGET,
        new_status = %query.new_status,
        "Updating message status",
    );

    let mut conn = pg_client.get_connection().await?;
    let updated = conn
        .update_message_status(path_params.message_id, identity.user_id(), query.new_status)
        .await?;

    if updated.is_none() {
        return Err(message_not_found());
    }

    tracing::info!(
        target: TRACING_TARGET,
        new_status = %query.new_status,
        "Message status updated",
    );

    Ok((StatusCode::OK, Json(ActionMessage::new("Status updated"))))
}

fn update_message_status_docs(op: TransformOperation) -> TransformOperation {
    op.security_requirement(BEARER_SCHEME)
        .summary("Update message status")
        .description("Files one of the caller's messages as inbox, public or favorite.")
        .response::<200, Json<ActionMessage>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Deletes one of the caller's messages.
#[tracing::instrument(
    skip_all,
    fields(
        user_id = %identity.user_id(),
        message_id = %path_params.message_id,
    )
)]
async fn delete_message(
    State(pg_client): State<PgClient>,
    AuthState(identity): AuthState,
    Path(path_params): Path<MessagePathParams>,
) -> Result<(StatusCode, Json<ActionMessage>)> {
    tracing::debug!(target: TRACING_TARGET, "Deleting message");

    let mut conn = pg_client.get_connection().await?;
    let deleted = conn
        .delete_message(path_params.message_id, identity.user_id())
        .await?;

    if !deleted {
        return Err(message_not_found());
    }

    tracing::info!(target: TRACING_TARGET, "Message deleted");

    Ok((StatusCode::OK, Json(ActionMessage::new("Message deleted"))))
}

fn delete_message_docs(op: TransformOperation) -> TransformOperation {
    op.security_requirement(BEARER_SCHEME)
        .summary("Delete message")
        .description("Deletes one of the caller's messages.")
        .response::<200, Json<ActionMessage>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Lists the public board of a user, newest first.
#[tracing::instrument(skip_all, fields(username = %path_params.username))]
async fn list_public_messages(
    State(pg_client): State<PgClient>,
    Path(path_params): Path<UsernamePathParams>,
) -> Result<(StatusCode, Json<Messages>)> {
    tracing::debug!(target: TRACING_TARGET, "Listing public messages");

    let mut conn = pg_client.get_connection().await?;
    let Some(user) = conn.find_user_by_username(&path_params.username).await? else {
        return Err(ErrorKind::NotFound
            .with_message("User not found")
            .with_resource("user"));
    };

    let messages = conn.list_public_messages(user.id).await?;
    Ok((StatusCode::OK, Json(Message::from_models(messages))))
}

fn list_public_messages_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List public messages")
        .description("Returns the messages a user has made public.")
        .response::<200, Json<Messages>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Messages owned by someone else are reported as missing.
fn message_not_found() -> crate::handler::Error<'static> {
    ErrorKind::NotFound
        .with_message("Message not found")
        .with_resource("message")
}

/// Returns a [`Router`] with all message routes.
///
/// `/messages` accepts anonymous posts and authenticated reads on the same
/// path, so protected handlers here authenticate through [`AuthState`]
/// rather than the router-level middleware.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/messages",
            post_with(send_message, send_message_docs).get_with(list_messages, list_messages_docs),
        )
        .api_route(
            "/messages/{message_id}/status",
            put_with(update_message_status, update_message_status_docs),
        )
        .api_route(
            "/messages/{message_id}",
            delete_with(delete_message, delete_message_docs),
        )
        .api_route(
            "/messages/public/{username}",
            get_with(list_public_messages, list_public_messages_docs),
        )
        .with_path_items(|item| item.tag("Messages"))
}

#[cfg(test)]
mod tests {
    use secreto_postgres::types::MessageStatus;
    use serde_json::json;
    use uuid::Uuid;

    use super::*;
    use crate::handler::test::{
        create_database_test_server, create_test_server_with_router, signup_test_user,
    };

    #[tokio::test]
    async fn inbox_requires_token() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes())?;

        server.get("/messages").await.assert_status_unauthorized();
        server
            .delete(&format!("/messages/{}", Uuid::new_v4()))
            .await
            .assert_status_unauthorized();

        Ok(())
    }

    #[tokio::test]
    async fn send_rejects_empty_content() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes())?;

        let response = server
            .post("/messages")
            .json(&json!({ "receiver_username": "neo", "content": "" }))
            .await;
        response.assert_status_bad_request();

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires POSTGRES_URL"]
    async fn message_lifecycle() -> anyhow::Result<()> {
        let server = create_database_test_server(|_| routes()).await?;
        let (username, token) = signup_test_user(&server).await?;

        let response = server
            .post("/messages")
            .json(&json!({ "receiver_username": username, "content": "  Wake up, Neo\n" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.assert_json(&json!({ "message": "Message sent anonymously" }));

        let inbox = server
            .get("/messages")
            .authorization_bearer(&token)
            .await
            .json::<Messages>();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].content, "  Wake up, Neo\n");
        assert_eq!(inbox[0].status, MessageStatus::Inbox);
        let message_id = inbox[0].id;

        let board = server
            .get(&format!("/messages/public/{username}"))
            .await
            .json::<Messages>();
        assert!(board.is_empty());

        let response = server
            .put(&format!("/messages/{message_id}/status"))
            .add_query_param("new_status", "public")
            .authorization_bearer(&token)
            .await;
        response.assert_json(&json!({ "message": "Status updated" }));

        let board = server
            .get(&format!("/messages/public/{username}"))
            .await
            .json::<Messages>();
        assert_eq!(board.len(), 1);

        let filtered = server
            .get("/messages")
            .add_query_param("status", "favorite")
            .authorization_bearer(&token)
            .await
            .json::<Messages>();
        assert!(filtered.is_empty());

        let response = server
            .delete(&format!("/messages/{message_id}"))
            .authorization_bearer(&token)
            .await;
        response.assert_json(&json!({ "message": "Message deleted" }));

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires POSTGRES_URL"]
    async fn foreign_messages_are_not_found() -> anyhow::Result<()> {
        let server = create_database_test_server(|_| routes()).await?;
        let (receiver, receiver_token) = signup_test_user(&server).await?;
        let (_, intruder_token) = signup_test_user(&server).await?;

        server
            .post("/messages")
            .json(&json!({ "receiver_username": receiver, "content": "for your eyes only" }))
            .await
            .assert_status(StatusCode::CREATED);

        let inbox = server
            .get("/messages")
            .authorization_bearer(&receiver_token)
            .await
            .json::<Messages>();
        let message_id = inbox[0].id;

        let response = server
            .delete(&format!("/messages/{message_id}"))
            .authorization_bearer(&intruder_token)
            .await;
        response.assert_status_not_found();
        response.assert_json_contains(&json!({ "message": "Message not found" }));

        let response = server
            .put(&format!("/messages/{message_id}/status"))
            .add_query_param("new_status", "public")
            .authorization_bearer(&intruder_token)
            .await;
        response.assert_status_not_found();

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires POSTGRES_URL"]
    async fn sending_to_unknown_user_is_not_found() -> anyhow::Result<()> {
        let server = create_database_test_server(|_| routes()).await?;

        let response = server
            .post("/messages")
            .json(&json!({ "receiver_username": "nobody_at_all", "content": "hello?" }))
            .await;
        response.assert_status_not_found();
        response.assert_json_contains(&json!({ "message": "User not found" }));

        Ok(())
    }
}
