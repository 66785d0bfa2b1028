use thiserror::Error;
use usersync_db::DbError;

#[derive(Debug, Error)]
pub enum SyncError {
    /// Network failure or non-2xx from the upstream API. Not retried
    /// within a single request.
    #[error("upstream request failed: {0}")]
    UpstreamUnavailable(String),

    /// Body fetched but does not parse into the expected shape. Treated
    /// like an unavailable upstream for callers, logged distinctly.
    #[error("upstream payload malformed: {0}")]
    MalformedPayload(String),

    /// Secondary uniqueness violation during upsert.
    #[error("username conflict: {0}")]
    Conflict(String),

    #[error("user not found")]
    NotFound,

    #[error("database error: {0}")]
    Db(DbError),

    /// Blocking DB task failed to join.
    #[error("task failed: {0}")]
    Task(String),
}

impl From<DbError> for SyncError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::UsernameConflict(username) => SyncError::Conflict(username),
            other => SyncError::Db(other),
        }
    }
}
