//! Whole-state repository backed by the `app_state` table.
//!
//! The blob layout is `{"state": {"notes": [...], "deliveries": [...]},
//! "version": 0}`.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::delivery::NoteDelivery;
use crate::model::note::Note;
use crate::model::Timestamp;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Namespace key the application state is stored under.
pub const STATE_KEY: &str = "future-you-storage";

/// Blob layout version written by this binary.
pub const STATE_VERSION: u32 = 0;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Persisted blob could not be encoded or decoded.
    Codec(serde_json::Error),
    UnsupportedStateVersion {
        stored: u32,
        latest_supported: u32,
    },
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Codec(err) => write!(f, "invalid persisted state blob: {err}"),
            Self::UnsupportedStateVersion {
                stored,
                latest_supported,
            } => write!(
                f,
                "persisted state version {stored} is newer than supported {latest_supported}"
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Codec(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Codec(value)
    }
}

/// Everything the store persists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub deliveries: Vec<NoteDelivery>,
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    state: &'a PersistedState,
    version: u32,
}

#[derive(Deserialize)]
struct Envelope {
    state: PersistedState,
    #[serde(default)]
    version: u32,
}

/// Encodes state into the versioned blob layout.
pub fn encode_state(state: &PersistedState) -> RepoResult<String> {
    let envelope = EnvelopeRef {
        state,
        version: STATE_VERSION,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Decodes a versioned blob.
///
/// # Errors
/// - `Codec` when the blob is not valid JSON of the expected shape.
/// - `UnsupportedStateVersion` when written by a newer layout.
pub fn decode_state(blob: &str) -> RepoResult<PersistedState> {
    let envelope: Envelope = serde_json::from_str(blob)?;
    if envelope.version > STATE_VERSION {
        return Err(RepoError::UnsupportedStateVersion {
            stored: envelope.version,
            latest_supported: STATE_VERSION,
        });
    }
    Ok(envelope.state)
}

/// Whole-state persistence contract.
pub trait StateRepository {
    /// Loads the state stored under `key`, or `None` when nothing was saved.
    fn load(&self, key: &str) -> RepoResult<Option<PersistedState>>;
    /// Overwrites the state stored under `key`.
    fn save(&self, key: &str, state: &PersistedState, saved_at: Timestamp) -> RepoResult<()>;
}

/// SQLite-backed state repository.
pub struct SqliteStateRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStateRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` on schema drift.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl StateRepository for SqliteStateRepository<'_> {
    fn load(&self, key: &str) -> RepoResult<Option<PersistedState>> {
        let blob: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM app_state WHERE key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;

        blob.as_deref().map(decode_state).transpose()
    }

    fn save(&self, key: &str, state: &PersistedState, saved_at: Timestamp) -> RepoResult<()> {
        let blob = encode_state(state)?;
        self.conn.execute(
            "INSERT INTO app_state (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, blob, saved_at],
        )?;
        Ok(())
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "app_state")? {
        return Err(RepoError::MissingRequiredTable("app_state"));
    }
    for column in ["key", "value", "updated_at"] {
        if !table_has_column(conn, "app_state", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "app_state",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
