//! Observability middleware for request tracing.
//!
//! Every request gets an `x-request-id` (generated unless the client sent
//! one) that is echoed in the response and recorded on the trace span.

use axum::Router;
use axum::http::{HeaderName, header};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;

/// Header carrying the request identifier.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Extension trait for `axum::`[`Router`] to apply observability middleware.
pub trait RouterObservabilityExt<S> {
    /// Layers request id generation and propagation, tracing spans and
    /// redaction of the `Authorization` and `Cookie` headers.
    fn with_observability(self) -> Self;
}

impl<S> RouterObservabilityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_observability(self) -> Self {
        self.layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
            .layer(SetSensitiveRequestHeadersLayer::new([
                header::AUTHORIZATION,
                header::COOKIE,
            ]))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
    }
}

#[cfg(test)]
mod tests {
    use axum::routing::get;
    use axum_test::TestServer;

    use super::*;

    #[tokio::test]
    async fn generates_request_id() -> anyhow::Result<()> {
        let router: Router = Router::new().route("/", get(|| async { "ok" }));
        let server = TestServer::new(router.with_observability())?;

        let response = server.get("/").await;
        assert!(!response.header(REQUEST_ID_HEADER).is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn propagates_client_request_id() -> anyhow::Result<()> {
        let router: Router = Router::new().route("/", get(|| async { "ok" }));
        let server = TestServer::new(router.with_observability())?;

        let response = server
            .get("/")
            .add_header(REQUEST_ID_HEADER, "trace-me")
            .await;
        assert_eq!(response.header(REQUEST_ID_HEADER), "trace-me");

        Ok(())
    }
}
