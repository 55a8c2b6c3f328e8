//! Service root handler.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::http::StatusCode;

use crate::extract::Json;
use crate::handler::Result;
use crate::handler::response::ActionMessage;
use crate::service::ServiceState;

/// Greeting returned by the service root.
const WELCOME_MESSAGE: &str = "Welcome to Secreto API";

/// Returns the service greeting.
#[tracing::instrument(skip_all)]
async fn welcome() -> Result<(StatusCode, Json<ActionMessage>)> {
    Ok((StatusCode::OK, Json(ActionMessage::new(WELCOME_MESSAGE))))
}

fn welcome_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Welcome")
        .description("Returns a greeting; useful as a liveness check.")
        .response::<200, Json<ActionMessage>>()
}

/// Returns a [`Router`] with the root route.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/", get_with(welcome, welcome_docs))
        .with_path_items(|item| item.tag("Root"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::test::create_test_server_with_router;

    #[tokio::test]
    async fn root_greets() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes())?;

        let response = server.get("/").await;
        response.assert_status_ok();
        response.assert_json(&serde_json::json!({ "message": "Welcome to Secreto API" }));

        Ok(())
    }
}
