//! Embedded schema migrations for users, messages and favorites.

use std::time::Instant;

use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_async::pooled_connection::PoolableConnection;
use diesel_migrations::MigrationHarness;
use tokio::task::spawn_blocking;

use crate::{MIGRATIONS, PgClient, PgError, PgResult, TRACING_TARGET_MIGRATION};

/// Migration support for [`PgClient`].
pub trait PgClientMigrationExt {
    /// Applies every embedded migration the database has not seen yet.
    ///
    /// Returns the versions applied by this call, oldest first. An
    /// up-to-date schema yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`PgError::Migration`] if a migration fails or the blocking
    /// task dies, and a pool error if no connection can be acquired.
    fn run_pending_migrations(&self) -> impl Future<Output = PgResult<Vec<String>>> + Send;
}

impl PgClientMigrationExt for PgClient {
    #[tracing::instrument(skip(self), target = TRACING_TARGET_MIGRATION)]
    async fn run_pending_migrations(&self) -> PgResult<Vec<String>> {
        let start = Instant::now();
        let mut conn = self.get_pooled_connection().await?;
        if conn.is_broken() {
            return Err(PgError::Migration(
                "connection is broken before migrations".into(),
            ));
        }

        // The diesel harness is synchronous, so it runs on a blocking thread.
        let mut conn: AsyncConnectionWrapper<_> = conn.into();
        let applied = spawn_blocking(move || {
            conn.run_pending_migrations(MIGRATIONS).map(|versions| {
                versions
                    .into_iter()
                    .map(|version| version.to_string())
                    .collect::<Vec<_>>()
            })
        })
        .await
        .map_err(|err| PgError::Migration(err.into()))?
        .map_err(|err| {
            tracing::error!(
                target: TRACING_TARGET_MIGRATION,
                error = %err,
                "Schema migration failed"
            );
            PgError::Migration(err)
        })?;

        tracing::info!(
            target: TRACING_TARGET_MIGRATION,
            elapsed = ?start.elapsed(),
            applied = ?applied,
            "Schema is up to date"
        );

        Ok(applied)
    }
}
