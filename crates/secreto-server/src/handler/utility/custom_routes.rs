//! Custom routes for extending the API router.

use aide::axum::ApiRouter;

use crate::service::ServiceState;

/// Additional routes merged into the main API router.
///
/// Private routes sit behind the same bearer authentication as the built-in
/// protected routes; public routes do not.
///
/// # Examples
///
/// ```rust
/// use secreto_server::handler::CustomRoutes;
///
/// let custom = CustomRoutes::new();
/// assert!(custom.is_empty());
/// ```
#[derive(Default, Clone)]
pub struct CustomRoutes {
    /// Custom private routes that require authentication.
    pub private_routes: Option<ApiRouter<ServiceState>>,
    /// Custom public routes that don't require authentication.
    pub public_routes: Option<ApiRouter<ServiceState>>,
}

impl CustomRoutes {
    /// Creates a new empty `CustomRoutes` instance.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the private routes.
    pub fn with_private_routes(mut self, routes: ApiRouter<ServiceState>) -> Self {
        self.private_routes = Some(routes);
        self
    }

    /// Sets the public routes.
    pub fn with_public_routes(mut self, routes: ApiRouter<ServiceState>) -> Self {
        self.public_routes = Some(routes);
        self
    }

    /// Adds custom private routes, merging with existing private routes if any.
    pub fn add_private_routes(mut self, routes: ApiRouter<ServiceState>) -> Self {
        self.private_routes = match self.private_routes {
            Some(existing) => Some(existing.merge(routes)),
            None => Some(routes),
        };
        self
    }

    /// Adds custom public routes, merging with existing public routes if any.
    pub fn add_public_routes(mut self, routes: ApiRouter<ServiceState>) -> Self {
        self.public_routes = match self.public_routes {
            Some(existing) => Some(existing.merge(routes)),
            None => Some(routes),
        };
        self
    }

    /// Returns true if there are any private routes configured.
    pub fn has_private_routes(&self) -> bool {
        self.private_routes.is_some()
    }

    /// Returns true if there are any public routes configured.
    pub fn has_public_routes(&self) -> bool {
        self.public_routes.is_some()
    }

    /// Returns true if no custom routes are configured.
    pub fn is_empty(&self) -> bool {
        !self.has_private_routes() && !self.has_public_routes()
    }
}
