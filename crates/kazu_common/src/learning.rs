//! Learned-answer store.
//!
//! SQLite-backed persistent mapping from question text to accepted answers.
//! Location: /var/lib/kazu/kazu_memoria.db (system) or
//! ~/.local/share/kazu/kazu_memoria.db (user).
//!
//! Schema stays compatible with the original `kazu_memoria.db`: the
//! `aprendizaje` table holds learned answers keyed by question text; the
//! `notas` and `lista_compras` tables back features outside the resolution
//! path and are only created here.

use crate::error::ResolveError;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::info;

/// Learned-answer store backed by SQLite.
///
/// The connection is shared behind a mutex: lookups from concurrent requests
/// serialize through it, and `remember` holds it for the whole write.
/// Clones share the same connection.
#[derive(Clone)]
pub struct LearningStore {
    conn: Arc<Mutex<Connection>>,
    db_path: PathBuf,
}

impl LearningStore {
    /// Open or create the store at the default location.
    pub fn open_default() -> Result<Self, ResolveError> {
        let db_path = Self::default_path();
        Self::open(&db_path)
    }

    /// Open or create the store at a specific path.
    pub fn open(path: &Path) -> Result<Self, ResolveError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ResolveError::StoreUnavailable(format!(
                    "failed to create directory {:?}: {}",
                    parent, e
                ))
            })?;
        }

        let conn = Connection::open(path).map_err(|e| {
            ResolveError::StoreUnavailable(format!("failed to open database {:?}: {}", path, e))
        })?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path: path.to_path_buf(),
        };

        store.init_schema()?;
        info!("Learning store ready at {:?}", store.db_path);
        Ok(store)
    }

    /// Get the default database path.
    pub fn default_path() -> PathBuf {
        let system_path = PathBuf::from("/var/lib/kazu/kazu_memoria.db");
        if system_path.parent().map(|p| p.exists()).unwrap_or(false) {
            return system_path;
        }

        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("kazu")
            .join("kazu_memoria.db")
    }

    /// Initialize the database schema.
    fn init_schema(&self) -> Result<(), ResolveError> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS aprendizaje (pregunta TEXT PRIMARY KEY, respuesta TEXT NOT NULL)",
            [],
        )
        .map_err(store_err)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS notas (id INTEGER PRIMARY KEY, texto TEXT)",
            [],
        )
        .map_err(store_err)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS lista_compras (id INTEGER PRIMARY KEY, producto TEXT)",
            [],
        )
        .map_err(store_err)?;

        Ok(())
    }

    /// Exact-match lookup against the normalized question key.
    pub fn lookup(&self, question: &str) -> Result<Option<String>, ResolveError> {
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            "SELECT respuesta FROM aprendizaje WHERE pregunta = ?",
            params![question],
            |row| row.get(0),
        )
        .optional()
        .map_err(store_err)
    }

    /// Insert or overwrite the answer for a question. Idempotent.
    ///
    /// Empty questions or answers are never stored.
    pub fn remember(&self, question: &str, answer: &str) -> Result<(), ResolveError> {
        if question.trim().is_empty() || answer.trim().is_empty() {
            return Err(ResolveError::StoreUnavailable(
                "refusing to store an empty question or answer".to_string(),
            ));
        }

        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT OR REPLACE INTO aprendizaje (pregunta, respuesta) VALUES (?, ?)",
            params![question, answer],
        )
        .map_err(store_err)?;

        Ok(())
    }

    /// Number of learned entries. Used by the health endpoint and tests.
    pub fn learned_count(&self) -> Result<usize, ResolveError> {
        let conn = self.conn.lock().unwrap();

        conn.query_row("SELECT COUNT(*) FROM aprendizaje", [], |row| {
            row.get::<_, i64>(0)
        })
        .map(|n| n as usize)
        .map_err(store_err)
    }
}

fn store_err(e: rusqlite::Error) -> ResolveError {
    ResolveError::StoreUnavailable(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn temp_store() -> (tempfile::TempDir, LearningStore) {
        let dir = tempdir().unwrap();
        let store = LearningStore::open(&dir.path().join("kazu_memoria.db")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_lookup_missing_returns_none() {
        let (_dir, store) = temp_store();
        assert_eq!(store.lookup("qué hora es").unwrap(), None);
    }

    #[test]
    fn test_remember_then_lookup() {
        let (_dir, store) = temp_store();
        store
            .remember("cuál es la capital de ecuador", "Quito es la capital de Ecuador.")
            .unwrap();
        assert_eq!(
            store.lookup("cuál es la capital de ecuador").unwrap(),
            Some("Quito es la capital de Ecuador.".to_string())
        );
    }

    #[test]
    fn test_remember_is_idempotent() {
        let (_dir, store) = temp_store();
        store.remember("pregunta", "respuesta").unwrap();
        store.remember("pregunta", "respuesta").unwrap();
        assert_eq!(store.learned_count().unwrap(), 1);
        assert_eq!(
            store.lookup("pregunta").unwrap(),
            Some("respuesta".to_string())
        );
    }

    #[test]
    fn test_remember_overwrites() {
        let (_dir, store) = temp_store();
        store.remember("pregunta", "primera").unwrap();
        store.remember("pregunta", "segunda").unwrap();
        assert_eq!(store.learned_count().unwrap(), 1);
        assert_eq!(
            store.lookup("pregunta").unwrap(),
            Some("segunda".to_string())
        );
    }

    #[test]
    fn test_remember_rejects_empty() {
        let (_dir, store) = temp_store();
        assert!(store.remember("", "respuesta").is_err());
        assert!(store.remember("pregunta", "   ").is_err());
        assert_eq!(store.learned_count().unwrap(), 0);
    }
}
