//! System health monitoring handlers.
//!
//! The health check pings the database; the response code tells load
//! balancers whether to route traffic here.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use secreto_postgres::PgClient;

use crate::extract::Json;
use crate::handler::Result;
use crate::handler::response::{MonitorStatus, ServiceStatus};
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "secreto_server::handler::monitors";

/// Reports whether the service and its database are reachable.
#[tracing::instrument(skip_all)]
async fn health_status(
    State(pg_client): State<PgClient>,
) -> Result<(StatusCode, Json<MonitorStatus>)> {
    tracing::debug!(target: TRACING_TARGET, "Health status check requested");

    let status = match pg_client.ping().await {
        Ok(()) => ServiceStatus::Healthy,
        Err(error) => {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %error,
                "Database did not respond to health check"
            );
            ServiceStatus::Unhealthy
        }
    };

    let response = MonitorStatus::new(status);
    let status_code = if response.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    tracing::info!(
        target: TRACING_TARGET,
        is_healthy = response.is_healthy(),
        status_code = status_code.as_u16(),
        "Health status response prepared"
    );

    Ok((status_code, Json(response)))
}

fn health_status_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get system health status")
        .description("Checks database connectivity.")
        .response_with::<200, Json<MonitorStatus>, _>(|res| res.description("System is healthy."))
        .response_with::<503, Json<MonitorStatus>, _>(|res| {
            res.description("System is unhealthy.")
        })
}

/// Returns a [`Router`] with all health monitoring routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/health", post_with(health_status, health_status_docs))
        .with_path_items(|item| item.tag("Monitors"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::test::{create_database_test_server, create_test_server_with_router};

    #[tokio::test]
    async fn unreachable_database_is_unhealthy() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes())?;

        let response = server.post("/health").await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

        let status = response.json::<MonitorStatus>();
        assert_eq!(status.status, ServiceStatus::Unhealthy);
        assert_eq!(status.version, env!("CARGO_PKG_VERSION"));

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires POSTGRES_URL"]
    async fn reachable_database_is_healthy() -> anyhow::Result<()> {
        let server = create_database_test_server(|_| routes()).await?;

        let response = server.post("/health").await;
        response.assert_status_ok();
        assert!(response.json::<MonitorStatus>().is_healthy());

        Ok(())
    }
}
