//! SQLite-backed experience log
//!
//! A single connection is shared behind a mutex and every statement runs on
//! the blocking pool. The schema is created on open when missing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::models::experience::{Experience, NewExperience, Source};

use super::traits::{ExperienceError, ExperienceStore};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS experiences (\
       id INTEGER PRIMARY KEY AUTOINCREMENT,\
       timestamp DATETIME NOT NULL,\
       source TEXT NOT NULL,\
       prompt TEXT NOT NULL,\
       generated_query TEXT NOT NULL DEFAULT '',\
       execution_result TEXT NOT NULL DEFAULT '',\
       user_feedback INTEGER NOT NULL DEFAULT 0\
     );";

const SELECT_COLUMNS: &str =
    "id, timestamp, source, prompt, generated_query, execution_result, user_feedback";

impl From<rusqlite::Error> for ExperienceError {
    fn from(e: rusqlite::Error) -> Self {
        ExperienceError::Storage(e.to_string())
    }
}

impl From<std::io::Error> for ExperienceError {
    fn from(e: std::io::Error) -> Self {
        ExperienceError::Storage(e.to_string())
    }
}

impl ToSql for Source {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Source {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

/// Experience log persisted to a SQLite file
#[derive(Clone)]
pub struct SqliteExperienceStore {
    /// `None` once closed
    conn: Arc<Mutex<Option<Connection>>>,
}

impl SqliteExperienceStore {
    /// Open (or create) the database at `path`, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ExperienceError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;\
             PRAGMA synchronous=NORMAL;\
             PRAGMA busy_timeout=5000;",
        )?;
        conn.execute_batch(SCHEMA)?;

        info!("Experience log opened at {}", path.display());
        Ok(Self::from_connection(conn))
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, ExperienceError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(Some(conn))),
        }
    }

    fn with_conn<F, R>(&self, f: F) -> Result<R, ExperienceError>
    where
        F: FnOnce(&Connection) -> Result<R, ExperienceError>,
    {
        let guard = self.conn.lock();
        match guard.as_ref() {
            Some(conn) => f(conn),
            None => Err(ExperienceError::Closed),
        }
    }

    async fn blocking<F, R>(&self, f: F) -> Result<R, ExperienceError>
    where
        F: FnOnce(&Connection) -> Result<R, ExperienceError> + Send + 'static,
        R: Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.with_conn(f))
            .await
            .map_err(|e| ExperienceError::Join(e.to_string()))?
    }
}

fn row_to_experience(row: &Row<'_>) -> rusqlite::Result<Experience> {
    Ok(Experience {
        id: row.get(0)?,
        timestamp: row.get::<_, DateTime<Utc>>(1)?,
        source: row.get(2)?,
        prompt: row.get(3)?,
        generated_query: row.get(4)?,
        execution_result: row.get(5)?,
        user_feedback: row.get(6)?,
    })
}

#[async_trait]
impl ExperienceStore for SqliteExperienceStore {
    async fn append(&self, record: NewExperience) -> Result<i64, ExperienceError> {
        let source = record.source;
        let id = self
            .blocking(move |conn| {
                conn.execute(
                    "INSERT INTO experiences (timestamp, source, prompt, generated_query, \
                     execution_result) VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        Utc::now(),
                        record.source,
                        record.prompt,
                        record.generated_query,
                        record.execution_result,
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;

        info!("Experience logged [id: {}] source: {}", id, source);
        Ok(id)
    }

    async fn set_feedback(&self, id: i64, feedback: i64) -> Result<(), ExperienceError> {
        self.blocking(move |conn| {
            let rows = conn.execute(
                "UPDATE experiences SET user_feedback = ?1 WHERE id = ?2",
                params![feedback, id],
            )?;
            if rows == 0 {
                return Err(ExperienceError::NotFound(id));
            }
            Ok(())
        })
        .await?;

        info!("Experience feedback updated [id: {}] feedback: {}", id, feedback);
        Ok(())
    }

    async fn get(&self, id: i64) -> Result<Option<Experience>, ExperienceError> {
        self.blocking(move |conn| {
            let row = conn
                .query_row(
                    &format!("SELECT {SELECT_COLUMNS} FROM experiences WHERE id = ?1"),
                    params![id],
                    row_to_experience,
                )
                .optional()?;
            Ok(row)
        })
        .await
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Experience>, ExperienceError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.blocking(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM experiences ORDER BY id DESC LIMIT ?1"
            ))?;
            let rows = stmt
                .query_map(params![limit], row_to_experience)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
    }

    async fn close(&self) -> Result<(), ExperienceError> {
        let conn = self.conn.clone();
        let closed = tokio::task::spawn_blocking(move || {
            let taken = conn.lock().take();
            match taken {
                Some(conn) => conn
                    .close()
                    .map(|_| true)
                    .map_err(|(_, e)| ExperienceError::from(e)),
                None => Ok(false),
            }
        })
        .await
        .map_err(|e| ExperienceError::Join(e.to_string()))??;

        if closed {
            info!("Experience log closed");
        } else {
            debug!("Experience log already closed");
        }
        Ok(())
    }
}
