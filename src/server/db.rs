//! The `tools` table behind the REST API.
//!
//! One flat SQLite table. The connection is opened lazily so that a missing
//! or unreachable database file surfaces as `TableError::Unavailable` on the
//! request that needed it, not as a startup failure.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use thiserror::Error;

use crate::domain::{Tool, ToolData, ToolStatus};
use crate::id::{generate_tool_id, now_ms};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS tools (
    id               TEXT PRIMARY KEY,
    name             TEXT NOT NULL,
    inventory_code   TEXT NOT NULL,
    description      TEXT,
    status           TEXT NOT NULL,
    current_holder   TEXT,
    current_location TEXT,
    created_at       INTEGER NOT NULL
);
";

const SELECT_COLUMNS: &str =
    "id, name, inventory_code, description, status, current_holder, current_location";

#[derive(Debug, Error)]
pub enum TableError {
    #[error("database unavailable: {0}")]
    Unavailable(rusqlite::Error),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("stored status is invalid: {0}")]
    BadStatus(String),

    #[error("database lock poisoned")]
    Poisoned,
}

pub type TableResult<T> = std::result::Result<T, TableError>;

enum Location {
    File(PathBuf),
    Memory,
}

/// Lazily-connected handle to the `tools` table
pub struct ToolTable {
    location: Location,
    conn: Mutex<Option<Connection>>,
}

impl std::fmt::Debug for ToolTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let location = match &self.location {
            Location::File(path) => path.display().to_string(),
            Location::Memory => ":memory:".to_string(),
        };
        f.debug_struct("ToolTable").field("location", &location).finish_non_exhaustive()
    }
}

/// Raw row before status validation
struct Row {
    id: String,
    name: String,
    inventory_code: String,
    description: Option<String>,
    status: String,
    current_holder: Option<String>,
    current_location: Option<String>,
}

impl Row {
    fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            inventory_code: row.get(2)?,
            description: row.get(3)?,
            status: row.get(4)?,
            current_holder: row.get(5)?,
            current_location: row.get(6)?,
        })
    }

    fn into_tool(self) -> TableResult<Tool> {
        let status = self
            .status
            .parse::<ToolStatus>()
            .map_err(|_| TableError::BadStatus(self.status.clone()))?;
        Ok(Tool {
            id: self.id,
            name: self.name,
            inventory_code: self.inventory_code,
            description: self.description,
            status,
            current_holder: self.current_holder,
            current_location: self.current_location,
        })
    }
}

impl ToolTable {
    /// Table stored in the SQLite file at `path` (connected on first use)
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            location: Location::File(path.as_ref().to_path_buf()),
            conn: Mutex::new(None),
        }
    }

    /// Private in-memory table, mainly for tests
    pub fn in_memory() -> Self {
        Self {
            location: Location::Memory,
            conn: Mutex::new(None),
        }
    }

    fn connect(&self) -> TableResult<Connection> {
        let conn = match &self.location {
            Location::File(path) => Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
            ),
            Location::Memory => Connection::open_in_memory(),
        }
        .map_err(TableError::Unavailable)?;
        conn.execute_batch(SCHEMA)?;
        Ok(conn)
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> TableResult<T>) -> TableResult<T> {
        let mut guard = self.conn.lock().map_err(|_| TableError::Poisoned)?;
        if guard.is_none() {
            *guard = Some(self.connect()?);
            log::info!("Connected to tools table ({:?})", self);
        }
        match guard.as_ref() {
            Some(conn) => f(conn),
            None => Err(TableError::Poisoned),
        }
    }

    /// All tools, newest first
    pub fn list(&self) -> TableResult<Vec<Tool>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM tools ORDER BY created_at DESC, rowid DESC",
                SELECT_COLUMNS
            ))?;
            let rows = stmt.query_map([], Row::read)?.collect::<rusqlite::Result<Vec<_>>>()?;
            rows.into_iter().map(Row::into_tool).collect()
        })
    }

    /// Fetch one tool
    pub fn get(&self, id: &str) -> TableResult<Option<Tool>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!("SELECT {} FROM tools WHERE id = ?1", SELECT_COLUMNS),
                    params![id],
                    Row::read,
                )
                .optional()?;
            row.map(Row::into_tool).transpose()
        })
    }

    /// Insert a new in-stock tool with a fresh id
    pub fn insert(&self, data: ToolData) -> TableResult<Tool> {
        let tool = Tool::with_id(generate_tool_id(), data);
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tools (id, name, inventory_code, description, status, current_holder, current_location, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    tool.id,
                    tool.name,
                    tool.inventory_code,
                    tool.description,
                    tool.status.as_str(),
                    tool.current_holder,
                    tool.current_location,
                    now_ms(),
                ],
            )?;
            Ok(())
        })?;
        Ok(tool)
    }

    /// Overwrite the editable fields of `id`
    ///
    /// `status: None` keeps the stored status. Returns `None` if no such tool.
    /// The written row is read back by the same statement.
    pub fn update(&self, id: &str, data: &ToolData, status: Option<ToolStatus>) -> TableResult<Option<Tool>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!(
                        "UPDATE tools
                         SET name = ?2, inventory_code = ?3, description = ?4,
                             status = COALESCE(?5, status), current_holder = ?6, current_location = ?7
                         WHERE id = ?1
                         RETURNING {}",
                        SELECT_COLUMNS
                    ),
                    params![
                        id,
                        data.name,
                        data.inventory_code,
                        data.description,
                        status.map(|s| s.as_str()),
                        data.current_holder,
                        data.current_location,
                    ],
                    Row::read,
                )
                .optional()?;
            row.map(Row::into_tool).transpose()
        })
    }

    /// Delete `id`; returns whether a row was removed
    pub fn delete(&self, id: &str) -> TableResult<bool> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM tools WHERE id = ?1", params![id])? > 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_insert_and_list_newest_first() {
        let table = ToolTable::in_memory();
        let first = table.insert(ToolData::new("Drill", "H78-B")).unwrap();
        let second = table.insert(ToolData::new("Saw", "S-1").with_holder("Dave")).unwrap();

        let tools = table.list().unwrap();
        assert_eq!(tools, vec![second, first]);
        assert!(tools.iter().all(|t| t.status == ToolStatus::InStock));
    }

    #[test]
    fn test_update_keeps_status_when_absent() {
        let table = ToolTable::in_memory();
        let tool = table.insert(ToolData::new("Drill", "H78-B")).unwrap();

        let moved = table
            .update(&tool.id, &ToolData::new("Drill", "H78-B"), Some(ToolStatus::Issued))
            .unwrap()
            .unwrap();
        assert_eq!(moved.status, ToolStatus::Issued);

        let renamed = table
            .update(&tool.id, &ToolData::new("Hammer drill", "H78-B"), None)
            .unwrap()
            .unwrap();
        assert_eq!(renamed.name, "Hammer drill");
        assert_eq!(renamed.status, ToolStatus::Issued);
    }

    #[test]
    fn test_update_returns_written_row() {
        let table = ToolTable::in_memory();
        let tool = table.insert(ToolData::new("Drill", "H78-B")).unwrap();

        let data = ToolData::new("Drill", "H78-B").with_holder("Dave").with_location("North Site");
        let updated = table.update(&tool.id, &data, Some(ToolStatus::Issued)).unwrap().unwrap();
        assert_eq!(updated.current_holder.as_deref(), Some("Dave"));
        assert_eq!(updated.status, ToolStatus::Issued);
        assert_eq!(table.get(&tool.id).unwrap(), Some(updated));
    }

    #[test]
    fn test_update_racing_delete_never_reports_stale_row() {
        let table = std::sync::Arc::new(ToolTable::in_memory());
        for _ in 0..20 {
            let tool = table.insert(ToolData::new("Drill", "H78-B")).unwrap();
            let deleter = {
                let table = table.clone();
                let id = tool.id.clone();
                std::thread::spawn(move || table.delete(&id).unwrap())
            };
            let renamed = ToolData::new("Hammer drill", "H78-B");
            let updated = table.update(&tool.id, &renamed, None).unwrap();
            let deleted = deleter.join().unwrap();

            assert!(deleted);
            if let Some(updated) = updated {
                assert_eq!(updated.name, "Hammer drill");
                assert_eq!(updated.id, tool.id);
            }
        }
    }

    #[test]
    fn test_update_missing() {
        let table = ToolTable::in_memory();
        let result = table.update("nope", &ToolData::new("Drill", "X"), None).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_delete() {
        let table = ToolTable::in_memory();
        let tool = table.insert(ToolData::new("Drill", "H78-B")).unwrap();
        assert!(table.delete(&tool.id).unwrap());
        assert!(!table.delete(&tool.id).unwrap());
        assert!(table.list().unwrap().is_empty());
    }

    #[test]
    fn test_file_table_persists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tools.db");

        let tool = ToolTable::file(&path).insert(ToolData::new("Drill", "H78-B")).unwrap();
        let tools = ToolTable::file(&path).list().unwrap();
        assert_eq!(tools, vec![tool]);
    }

    #[test]
    fn test_unopenable_file_is_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let table = ToolTable::file(temp_dir.path().join("missing-dir").join("tools.db"));
        assert!(matches!(table.list(), Err(TableError::Unavailable(_))));
    }

    #[test]
    fn test_bad_status_row() {
        let table = ToolTable::in_memory();
        table
            .with_conn(|conn| {
                conn.execute(
                    "INSERT INTO tools (id, name, inventory_code, status, created_at) VALUES ('t', 'n', 'c', 'Lost', 0)",
                    [],
                )?;
                Ok(())
            })
            .unwrap();
        assert!(matches!(table.list(), Err(TableError::BadStatus(_))));
    }
}
