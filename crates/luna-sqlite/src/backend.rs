use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use luna_refs::{validate_pointer_name, RefError, RefStore};
use luna_store::{ObjectKind, ObjectStore, StoreError, StoreResult, StoredObject};
use luna_types::ContentId;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::SqliteError;

const CREATE_SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS objects (
    id   TEXT PRIMARY KEY NOT NULL,
    kind TEXT NOT NULL,
    data BLOB NOT NULL
);
CREATE TABLE IF NOT EXISTS pointers (
    name   TEXT PRIMARY KEY NOT NULL,
    target TEXT NOT NULL
);
";

/// Objects and pointers in one SQLite file.
pub struct SqliteBackend {
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    /// Open (or create) the database at `path` and ensure the schema exists.
    pub fn open(path: &Path) -> Result<Self, SqliteError> {
        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "opened database");
        Self::init(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, SqliteError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, SqliteError> {
        conn.execute_batch("PRAGMA busy_timeout = 5000;")?;
        conn.execute_batch(CREATE_SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, SqliteError> {
        self.conn.lock().map_err(|_| SqliteError::LockPoisoned)
    }

    /// Number of stored objects.
    pub fn object_count(&self) -> Result<usize, SqliteError> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM objects", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

impl std::fmt::Debug for SqliteBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteBackend").finish_non_exhaustive()
    }
}

fn parse_id(text: &str) -> Result<ContentId, String> {
    text.parse::<ContentId>().map_err(|e| e.to_string())
}

#[async_trait]
impl ObjectStore for SqliteBackend {
    async fn put(&self, object: &StoredObject) -> StoreResult<ContentId> {
        let id = object.compute_id();
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO objects (id, kind, data) VALUES (?1, ?2, ?3)",
            params![id.to_hex(), object.kind.as_str(), object.data],
        )
        .map_err(SqliteError::from)?;
        tracing::debug!(%id, kind = %object.kind, size = object.size, "stored object");
        Ok(id)
    }

    async fn get(&self, id: &ContentId) -> StoreResult<Option<StoredObject>> {
        let row = {
            let conn = self.conn()?;
            conn.query_row(
                "SELECT kind, data FROM objects WHERE id = ?1",
                params![id.to_hex()],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?)),
            )
            .optional()
            .map_err(SqliteError::from)?
        };

        let Some((kind, data)) = row else {
            return Ok(None);
        };

        let kind = kind
            .parse::<ObjectKind>()
            .map_err(|reason| StoreError::CorruptObject { id: *id, reason })?;
        let object = StoredObject::new(kind, data);
        if !object.verify(id) {
            return Err(StoreError::HashMismatch {
                id: *id,
                computed: object.compute_id(),
            });
        }
        Ok(Some(object))
    }

    async fn delete(&self, id: &ContentId) -> StoreResult<bool> {
        let conn = self.conn()?;
        let removed = conn
            .execute("DELETE FROM objects WHERE id = ?1", params![id.to_hex()])
            .map_err(SqliteError::from)?;
        Ok(removed > 0)
    }

    async fn exists(&self, id: &ContentId) -> StoreResult<bool> {
        let conn = self.conn()?;
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM objects WHERE id = ?1)",
                params![id.to_hex()],
                |row| row.get(0),
            )
            .map_err(SqliteError::from)?;
        Ok(exists)
    }
}

#[async_trait]
impl RefStore for SqliteBackend {
    async fn get(&self, name: &str) -> luna_refs::Result<Option<ContentId>> {
        let target = {
            let conn = self.conn()?;
            conn.query_row(
                "SELECT target FROM pointers WHERE name = ?1",
                params![name],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(SqliteError::from)?
        };

        target
            .map(|text| {
                parse_id(&text).map_err(|reason| RefError::CorruptTarget {
                    name: name.to_string(),
                    reason,
                })
            })
            .transpose()
    }

    async fn put(&self, name: &str, target: ContentId) -> luna_refs::Result<()> {
        validate_pointer_name(name)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO pointers (name, target) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET target = excluded.target",
            params![name, target.to_hex()],
        )
        .map_err(SqliteError::from)?;
        tracing::debug!(name, %target, "pointer updated");
        Ok(())
    }
}
