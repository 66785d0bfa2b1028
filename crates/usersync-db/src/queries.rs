use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use usersync_types::models::UserProfile;

use crate::models::UserRow;
use crate::{Database, DbError};

const USER_COLUMNS: &str = "id, name, username, email, website, company_name, updated_at";

impl Database {
    // -- Point lookups --

    pub fn get_user(&self, id: i64) -> Result<Option<UserRow>, DbError> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>, DbError> {
        self.with_conn(|conn| {
            let row = conn
                .prepare(&format!(
                    "SELECT {USER_COLUMNS} FROM users WHERE username = ?1"
                ))?
                .query_row([username], map_user_row)
                .optional()?;
            Ok(row)
        })
    }

    // -- Upsert --

    /// Insert-or-update keyed by id, stamped with `now`.
    ///
    /// The lookup-then-write sequence runs inside one explicit transaction.
    /// Losing an insert race on the primary key resolves to an update; a
    /// username collision with a different id rolls the transaction back
    /// and surfaces as [`DbError::UsernameConflict`].
    pub fn upsert_user(
        &self,
        profile: &UserProfile,
        now: DateTime<Utc>,
    ) -> Result<UserRow, DbError> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let exists = tx
                .query_row("SELECT 1 FROM users WHERE id = ?1", [profile.id], |_| Ok(()))
                .optional()?
                .is_some();

            if exists {
                update_user(&tx, profile, now)?;
            } else if let Err(e) = insert_user(&tx, profile, now) {
                match e {
                    DbError::Sqlite(ref sql_err) if is_primary_key_conflict(sql_err) => {
                        // Another writer created the row between our lookup
                        // and the insert. Their row wins the insert; our
                        // fields win the update.
                        debug!(id = profile.id, "insert raced, resolving to update");
                        update_user(&tx, profile, now)?;
                    }
                    other => return Err(other),
                }
            }

            tx.commit()?;

            // The write confirmed these exact values; no read-back needed.
            Ok(UserRow {
                id: profile.id,
                name: profile.name.clone(),
                username: profile.username.clone(),
                email: profile.email.clone(),
                website: profile.website.clone(),
                company_name: profile.company_name.clone(),
                updated_at: now,
            })
        })
    }

    // -- Diagnostics / administration --

    pub fn list_users(&self) -> Result<Vec<UserRow>, DbError> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))?;
            let rows = stmt
                .query_map([], map_user_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Rows whose `updated_at` is strictly older than `cutoff`.
    pub fn list_stale(&self, cutoff: DateTime<Utc>) -> Result<Vec<UserRow>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE updated_at < ?1 ORDER BY id"
            ))?;
            let rows = stmt
                .query_map([cutoff], map_user_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn count_users(&self) -> Result<i64, DbError> {
        self.with_conn(|conn| {
            let count = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
            Ok(count)
        })
    }

    /// Returns false when no row with that id existed.
    pub fn delete_user(&self, id: i64) -> Result<bool, DbError> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }
}

fn query_user_by_id(conn: &Connection, id: i64) -> Result<Option<UserRow>, DbError> {
    let row = conn
        .prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))?
        .query_row([id], map_user_row)
        .optional()?;
    Ok(row)
}

fn insert_user(conn: &Connection, profile: &UserProfile, now: DateTime<Utc>) -> Result<(), DbError> {
    conn.execute(
        "INSERT INTO users (id, name, username, email, website, company_name, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            profile.id,
            profile.name,
            profile.username,
            profile.email,
            profile.website,
            profile.company_name,
            now,
        ],
    )
    .map_err(|e| map_username_conflict(e, profile))?;
    Ok(())
}

fn update_user(conn: &Connection, profile: &UserProfile, now: DateTime<Utc>) -> Result<(), DbError> {
    conn.execute(
        "UPDATE users
         SET name = ?2, username = ?3, email = ?4, website = ?5, company_name = ?6, updated_at = ?7
         WHERE id = ?1",
        params![
            profile.id,
            profile.name,
            profile.username,
            profile.email,
            profile.website,
            profile.company_name,
            now,
        ],
    )
    .map_err(|e| map_username_conflict(e, profile))?;
    Ok(())
}

/// The username UNIQUE constraint can fire on both insert and update; the
/// primary-key conflict is left as a plain sqlite error so the upsert can
/// tell the two apart.
fn map_username_conflict(e: rusqlite::Error, profile: &UserProfile) -> DbError {
    if is_unique_conflict(&e) && !is_primary_key_conflict(&e) {
        DbError::UsernameConflict(profile.username.clone())
    } else {
        DbError::Sqlite(e)
    }
}

fn is_primary_key_conflict(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

fn is_unique_conflict(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

fn map_user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        name: row.get(1)?,
        username: row.get(2)?,
        email: row.get(3)?,
        website: row.get(4)?,
        company_name: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
