//! Database bootstrap.
//!
//! Opens a connection pool for the configured driver and verifies the
//! database is reachable with a ping before the server starts serving.

use sqlx::Connection;
use sqlx::AnyPool;
use sqlx::any::AnyPoolOptions;
use thiserror::Error;

/// Drivers the `[database]` section accepts.
const SUPPORTED_DRIVERS: &[&str] = &["postgres", "mysql", "sqlite"];

/// Errors from database bootstrap.
#[derive(Debug, Error)]
pub enum DbError {
    /// The configured driver is not one of the supported backends.
    #[error("unsupported database driver '{driver}' (expected one of: postgres, mysql, sqlite)")]
    UnsupportedDriver {
        /// The driver name from the configuration.
        driver: String,
    },

    /// Opening or pinging the database failed.
    #[error("failed to connect to {driver} database")]
    Connect {
        /// The driver name from the configuration.
        driver: String,
        /// Underlying error.
        #[source]
        source: sqlx::Error,
    },
}

/// Open a connection pool and verify connectivity.
///
/// # Errors
///
/// Returns [`DbError::UnsupportedDriver`] for an unknown driver name, and
/// [`DbError::Connect`] when opening the pool or pinging the database
/// fails.
pub async fn connect(driver: &str, url: &str) -> Result<AnyPool, DbError> {
    if !SUPPORTED_DRIVERS.contains(&driver) {
        return Err(DbError::UnsupportedDriver {
            driver: driver.to_owned(),
        });
    }

    sqlx::any::install_default_drivers();

    let pool = AnyPoolOptions::new()
        .max_connections(5)
        .connect(url)
        .await
        .map_err(|source| DbError::Connect {
            driver: driver.to_owned(),
            source,
        })?;

    // A fresh pool may be lazy about actually dialing the database, so
    // ping once before declaring the bootstrap successful.
    let mut conn = pool.acquire().await.map_err(|source| DbError::Connect {
        driver: driver.to_owned(),
        source,
    })?;
    conn.ping().await.map_err(|source| DbError::Connect {
        driver: driver.to_owned(),
        source,
    })?;

    tracing::info!(driver, "Database connection verified");
    Ok(pool)
}
