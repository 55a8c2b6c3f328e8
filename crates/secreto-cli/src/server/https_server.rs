//! HTTPS server backed by rustls.

use std::io;
use std::path::{Path, PathBuf};

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;

use crate::TRACING_TARGET_SERVER_STARTUP;
use crate::config::ServerConfig;
use crate::server::lifecycle::serve_with_shutdown;
use crate::server::shutdown_signal;

/// Loads the PEM certificate and key and serves `app` over HTTPS.
pub async fn serve_https(
    app: Router,
    server_config: ServerConfig,
    cert_path: PathBuf,
    key_path: PathBuf,
) -> io::Result<()> {
    let server_addr = server_config.server_addr();
    let shutdown_timeout = server_config.shutdown_timeout();

    validate_tls_files(&cert_path, &key_path)?;

    serve_with_shutdown(&server_config, move || async move {
        let tls_config = RustlsConfig::from_pem_file(&cert_path, &key_path)
            .await
            .map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("Failed to load TLS certificates: {e}"),
                )
            })?;

        tracing::info!(
            target: TRACING_TARGET_SERVER_STARTUP,
            addr = %server_addr,
            cert_path = %cert_path.display(),
            "HTTPS server bound and ready"
        );

        let handle = axum_server::Handle::new();
        let shutdown_handle = handle.clone();

        tokio::spawn(async move {
            shutdown_signal(shutdown_timeout).await;
            shutdown_handle.graceful_shutdown(Some(shutdown_timeout));
        });

        axum_server::bind_rustls(server_addr, tls_config)
            .handle(handle)
            .serve(app.into_make_service())
            .await
    })
    .await
}

/// Checks that both PEM files exist and are not empty.
fn validate_tls_files(cert_path: &Path, key_path: &Path) -> io::Result<()> {
    let validate_file = |path: &Path, file_type: &str| -> io::Result<()> {
        let metadata = std::fs::metadata(path).map_err(|err| {
            io::Error::new(
                err.kind(),
                format!("Cannot read {file_type} file {}: {err}", path.display()),
            )
        })?;

        if !metadata.is_file() || metadata.len() == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{file_type} file is empty or not a file: {}", path.display()),
            ));
        }

        Ok(())
    };

    validate_file(cert_path, "Certificate")?;
    validate_file(key_path, "Private key")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_tls_files_rejects_nonexistent_files() {
        let result = validate_tls_files(
            Path::new("nonexistent_cert.pem"),
            Path::new("nonexistent_key.pem"),
        );

        let Err(err) = result else {
            panic!("expected missing certificate to be rejected");
        };
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("Certificate"));
    }
}
