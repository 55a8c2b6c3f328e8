//! HTTP/HTTPS server startup with graceful shutdown.
//!
//! The protocol is chosen from the configuration: HTTPS when the `tls`
//! feature is enabled and both certificate paths are set, plain HTTP
//! otherwise.

mod http_server;
#[cfg(feature = "tls")]
mod https_server;
mod lifecycle;
mod shutdown;

use std::io;

use axum::Router;

use self::http_server::serve_http;
#[cfg(feature = "tls")]
use self::https_server::serve_https;
use self::shutdown::shutdown_signal;
use crate::config::ServerConfig;

/// Serves `app` until a shutdown signal arrives.
///
/// # Errors
///
/// Returns an error if the address cannot be bound, the TLS files cannot be
/// loaded, or the server fails while running.
pub async fn serve(app: Router, config: ServerConfig) -> io::Result<()> {
    #[cfg(feature = "tls")]
    if let (Some(cert_path), Some(key_path)) =
        (config.tls_cert_path.clone(), config.tls_key_path.clone())
    {
        return serve_https(app, config, cert_path, key_path).await;
    }

    serve_http(app, config).await
}
