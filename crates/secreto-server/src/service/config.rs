#[cfg(any(test, feature = "config"))]
use clap::Args;
use derive_builder::Builder;
use secreto_postgres::{PgClient, PgClientMigrationExt, PgConfig};
use serde::{Deserialize, Serialize};

use crate::service::{CredentialGuard, Error, Result, SessionKeys, SessionKeysConfig};

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
#[must_use = "config does nothing unless you use it"]
#[builder(
    pattern = "owned",
    setter(into, prefix = "with"),
    build_fn(validate = "Self::validate")
)]
pub struct ServiceConfig {
    /// Postgres connection and pool settings.
    #[cfg_attr(any(test, feature = "config"), command(flatten))]
    pub postgres: PgConfig,

    /// Session token signing settings.
    #[cfg_attr(any(test, feature = "config"), command(flatten))]
    pub session: SessionKeysConfig,
}

impl ServiceConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Connects to Postgres database and runs migrations.
    ///
    /// Fails early when the database does not answer a ping.
    pub async fn connect_postgres(&self) -> Result<PgClient> {
        self.postgres.validate().map_err(|e| {
            Error::config("Invalid database configuration").with_source(e)
        })?;

        let pg_client = PgClient::new_with_test(self.postgres.clone())
            .await
            .map_err(|e| {
                Error::external("postgres", "Database is unreachable").with_source(e)
            })?;

        pg_client.run_pending_migrations().await.map_err(|e| {
            Error::internal("postgres", "Failed to apply database migrations").with_source(e)
        })?;

        Ok(pg_client)
    }

    /// Loads the session signing keys.
    pub fn load_session_keys(&self) -> Result<SessionKeys> {
        SessionKeys::from_config(&self.session)
    }

    /// Creates the credential guard backed by the system clock.
    pub fn create_guard(&self) -> Result<CredentialGuard> {
        Ok(CredentialGuard::new(self.load_session_keys()?))
    }
}

impl ServiceConfigBuilder {
    /// Wrapper for builder validation that returns String errors.
    fn validate(builder: &ServiceConfigBuilder) -> Result<(), String> {
        if let Some(postgres) = &builder.postgres {
            postgres.validate().map_err(|e| e.to_string())?;
        }

        if let Some(session) = &builder.session {
            session.validate().map_err(|e| e.to_string())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    const TEST_SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        service: ServiceConfig,
    }

    #[test]
    fn builder_accepts_valid_config() -> anyhow::Result<()> {
        let config = ServiceConfig::builder()
            .with_postgres(PgConfig::new("postgresql://localhost/secreto"))
            .with_session(SessionKeysConfig::new(TEST_SECRET))
            .build()?;

        assert_eq!(config.session.auth_token_ttl_mins, 30);
        assert!(config.create_guard().is_ok());
        Ok(())
    }

    #[test]
    fn builder_rejects_short_secret() {
        let result = ServiceConfig::builder()
            .with_postgres(PgConfig::new("postgresql://localhost/secreto"))
            .with_session(SessionKeysConfig::new("short"))
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn builder_rejects_invalid_pool_size() {
        let result = ServiceConfig::builder()
            .with_postgres(PgConfig::new("postgresql://localhost/secreto").with_max_connections(0))
            .with_session(SessionKeysConfig::new(TEST_SECRET))
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn builder_requires_all_sections() {
        let result = ServiceConfig::builder()
            .with_session(SessionKeysConfig::new(TEST_SECRET))
            .build();

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn unreachable_database_fails_fast() -> anyhow::Result<()> {
        let config = ServiceConfig::builder()
            .with_postgres(
                PgConfig::new("postgresql://secreto@localhost:1/secreto")
                    .with_connection_timeout_secs(1),
            )
            .with_session(SessionKeysConfig::new(TEST_SECRET))
            .build()?;

        let error = config.connect_postgres().await.err();
        assert_eq!(
            error.as_ref().map(Error::message),
            Some("postgres: Database is unreachable")
        );
        Ok(())
    }

    #[test]
    fn parse_from_cli_args() -> anyhow::Result<()> {
        let cli = TestCli::try_parse_from([
            "secreto",
            "--postgres-url",
            "postgresql://localhost/secreto",
            "--auth-secret",
            TEST_SECRET,
        ])?;

        assert_eq!(cli.service.postgres.database_url(), "postgresql://localhost/secreto");
        assert_eq!(cli.service.session.auth_token_ttl_mins, 30);
        Ok(())
    }
}
