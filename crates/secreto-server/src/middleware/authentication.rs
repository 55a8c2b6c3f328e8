//! Authentication middleware for protected routes.

use aide::axum::ApiRouter;
use axum::extract::Request;
use axum::middleware::{Next, from_fn_with_state};
use axum::response::Response;

use crate::extract::AuthState;
use crate::service::ServiceState;

/// Extension trait for [`ApiRouter`] to put routes behind bearer authentication.
pub trait RouterAuthExt {
    /// Requires a valid session token for every route registered so far.
    ///
    /// Routes added after this call are not protected.
    fn with_authentication(self, state: ServiceState) -> Self;
}

impl RouterAuthExt for ApiRouter<ServiceState> {
    fn with_authentication(self, state: ServiceState) -> Self {
        self.route_layer(from_fn_with_state(state, require_authentication))
    }
}

/// Rejects the request unless it carries a session token that resolves to
/// an existing user.
///
/// The resolved identity stays in the request extensions, so a handler that
/// extracts [`AuthState`] again does not repeat the lookup.
pub async fn require_authentication(
    AuthState(_): AuthState,
    request: Request,
    next: Next,
) -> Response {
    next.run(request).await
}
