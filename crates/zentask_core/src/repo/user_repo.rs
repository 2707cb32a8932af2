//! User account repository contract and SQLite implementation.

use super::{is_unique_violation, timestamp_column, uuid_column, RepoError, RepoResult};
use crate::model::time::to_epoch_millis;
use crate::model::user::{normalize_email, User, UserId, UserRecord};
use rusqlite::{params, Connection, Row};

const USER_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    email,
    password_hash,
    created_at,
    updated_at
FROM users";

pub trait UserRepository {
    /// Inserts an account; an already-registered email yields `Duplicate`.
    fn create_user(&self, record: &UserRecord) -> RepoResult<UserId>;
    fn find_by_email(&self, email: &str) -> RepoResult<Option<UserRecord>>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
}

pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, record: &UserRecord) -> RepoResult<UserId> {
        let user = &record.user;
        let email = normalize_email(&user.email);
        let result = self.conn.execute(
            "INSERT INTO users (
                uuid,
                name,
                email,
                password_hash,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                user.id.to_string(),
                user.name.as_str(),
                email.as_str(),
                record.password_hash.as_str(),
                to_epoch_millis(user.created_at),
                to_epoch_millis(user.updated_at),
            ],
        );

        match result {
            Ok(_) => Ok(user.id),
            Err(err) if is_unique_violation(&err) => Err(RepoError::Duplicate(email)),
            Err(err) => Err(err.into()),
        }
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<UserRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE email = ?1;"))?;
        let mut rows = stmt.query([normalize_email(email)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }

        Ok(None)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?.user));
        }

        Ok(None)
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<UserRecord> {
    Ok(UserRecord {
        user: User {
            id: uuid_column(row, "uuid", "users")?,
            name: row.get("name")?,
            email: row.get("email")?,
            created_at: timestamp_column(row, "created_at", "users")?,
            updated_at: timestamp_column(row, "updated_at", "users")?,
        },
        password_hash: row.get("password_hash")?,
    })
}
