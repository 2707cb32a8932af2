//! SQLite storage bootstrap and schema migration entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the Zentask store.
//! - Resolve configured database targets (file or in-memory).
//! - Apply schema migrations in deterministic order.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write application data before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory, open_target};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Where the store lives, parsed from a database connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    /// Private in-memory database; contents vanish with the connection.
    Memory,
    /// SQLite database file.
    File(PathBuf),
}

impl DatabaseTarget {
    /// Parses a connection string.
    ///
    /// Accepted shapes: `:memory:`, `sqlite::memory:`, `sqlite://<path>`,
    /// `sqlite:<path>` and a bare `<path>`.
    pub fn parse(url: &str) -> Result<Self, String> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err("database url cannot be empty".to_string());
        }

        let rest = trimmed
            .strip_prefix("sqlite://")
            .or_else(|| trimmed.strip_prefix("sqlite:"))
            .unwrap_or(trimmed);

        match rest {
            "" => Err(format!("database url `{trimmed}` has no path")),
            ":memory:" => Ok(Self::Memory),
            path => Ok(Self::File(PathBuf::from(path))),
        }
    }
}

impl Display for DatabaseTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => write!(f, ":memory:"),
            Self::File(path) => write!(f, "sqlite://{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DatabaseTarget;
    use std::path::PathBuf;

    #[test]
    fn parse_accepts_memory_aliases() {
        assert_eq!(DatabaseTarget::parse(":memory:"), Ok(DatabaseTarget::Memory));
        assert_eq!(
            DatabaseTarget::parse("sqlite::memory:"),
            Ok(DatabaseTarget::Memory)
        );
    }

    #[test]
    fn parse_strips_sqlite_scheme() {
        assert_eq!(
            DatabaseTarget::parse("sqlite:///var/lib/zentask.db"),
            Ok(DatabaseTarget::File(PathBuf::from("/var/lib/zentask.db")))
        );
        assert_eq!(
            DatabaseTarget::parse(" data/zentask.db "),
            Ok(DatabaseTarget::File(PathBuf::from("data/zentask.db")))
        );
    }

    #[test]
    fn parse_rejects_empty_values() {
        assert!(DatabaseTarget::parse("   ").is_err());
        assert!(DatabaseTarget::parse("sqlite://").is_err());
    }
}
