//! CLI error types.

use weft_config::ConfigError;
use weft_server::db::DbError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Db(#[from] DbError),

    #[error("{0}")]
    Server(String),
}
