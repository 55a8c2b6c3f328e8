//! Generated API reference.
//!
//! Route docs collected by [`ApiRouter`] become an OpenAPI document with a
//! `bearer` security scheme. It is served as JSON next to a Scalar page.
//!
//! [`ApiRouter`]: aide::axum::ApiRouter

use aide::axum::ApiRouter;
use aide::openapi::{OpenApi, SecurityScheme, Tag};
use aide::scalar::Scalar;
use aide::transform::TransformOpenApi;
use axum::routing::{Router, get};
use axum::{Extension, Json};
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Name of the security scheme protected operations refer to.
pub const BEARER_SCHEME: &str = "bearer";

/// Paths of the API reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct OpenApiConfig {
    /// Path of the OpenAPI JSON document.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "OPENAPI_JSON_PATH", default_value = "/api/openapi.json")
    )]
    pub open_api_json: String,

    /// Path of the Scalar reference page.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "OPENAPI_SCALAR_PATH", default_value = "/api/scalar")
    )]
    pub scalar_ui: String,
}

impl Default for OpenApiConfig {
    fn default() -> Self {
        Self {
            open_api_json: "/api/openapi.json".to_owned(),
            scalar_ui: "/api/scalar".to_owned(),
        }
    }
}

/// Turns an [`ApiRouter`] into a plain router that also serves its reference.
///
/// [`ApiRouter`]: aide::axum::ApiRouter
pub trait RouterOpenApiExt<S> {
    fn with_open_api(self, config: OpenApiConfig) -> Router<S>;
}

impl<S> RouterOpenApiExt<S> for ApiRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_open_api(self, config: OpenApiConfig) -> Router<S> {
        async fn serve_openapi(Extension(api): Extension<OpenApi>) -> Json<OpenApi> {
            Json(api)
        }

        let mut api = OpenApi::default();
        let router = self
            .route(
                &config.scalar_ui,
                Scalar::new(&config.open_api_json).axum_route(),
            )
            .route(&config.open_api_json, get(serve_openapi));

        router
            .finish_api_with(&mut api, describe_api)
            .layer(Extension(api))
    }
}

fn describe_api(api: TransformOpenApi<'_>) -> TransformOpenApi<'_> {
    api.title("Secreto API")
        .summary("Anonymous messaging")
        .description(
            "Receive anonymous messages, triage them and publish the ones you \
            like on your public board. Protected operations take a bearer token \
            from `/auth/signup` or `/auth/token`.",
        )
        .version(env!("CARGO_PKG_VERSION"))
        .security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http {
                scheme: "bearer".to_owned(),
                bearer_format: Some("JWT".to_owned()),
                description: Some("Session token issued at signup or login.".to_owned()),
                extensions: Default::default(),
            },
        )
        .tag(tag("Authentication", "Signup and login"))
        .tag(tag("Users", "Profiles and search"))
        .tag(tag("Favorites", "Users the caller keeps track of"))
        .tag(tag("Messages", "Anonymous inbox and public board"))
}

fn tag(name: &str, description: &str) -> Tag {
    Tag {
        name: name.to_owned(),
        description: Some(description.to_owned()),
        ..Tag::default()
    }
}
