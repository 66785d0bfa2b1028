use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// Secondary uniqueness violation: the username already belongs to a
    /// row with a different id. The enclosing transaction is rolled back.
    #[error("username '{0}' already belongs to a different user")]
    UsernameConflict(String),

    #[error("database lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}
