//! Append-only local history of successful lookups, backed by SQLite.

use parking_lot::Mutex;
use rusqlite::{Connection, params};
use std::{fs, path::Path};
use tracing::debug;

use crate::{error::WeatherError, model::HistoryRecord};

const SCHEMA_VERSION: i64 = 1;

const SCHEMA: &str = "
create table if not exists history (
    id          integer primary key autoincrement,
    city_name   text not null,
    temperature text not null,
    date        text not null,
    condition   text not null
);
";

/// Durable record list. Both calls block; run them off the interactive task.
pub trait HistoryStore: Send + Sync {
    fn append(&self, record: &HistoryRecord) -> Result<(), WeatherError>;

    /// All records, oldest first.
    fn list_all(&self) -> Result<Vec<HistoryRecord>, WeatherError>;
}

pub struct SqliteHistoryStore {
    conn: Mutex<Connection>,
}

impl SqliteHistoryStore {
    /// Open (or create) the database file, creating parent directories as needed.
    pub fn open(path: &Path) -> Result<Self, WeatherError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                WeatherError::Persistence(format!(
                    "failed to create history directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened history database");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, WeatherError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, WeatherError> {
        migrate(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }
}

fn migrate(conn: &Connection) -> Result<(), WeatherError> {
    let version: i64 = conn.query_row("pragma user_version", [], |r| r.get(0))?;
    if version < SCHEMA_VERSION {
        conn.execute_batch(SCHEMA)?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        debug!(from = version, to = SCHEMA_VERSION, "history schema upgraded");
    }
    Ok(())
}

impl HistoryStore for SqliteHistoryStore {
    fn append(&self, record: &HistoryRecord) -> Result<(), WeatherError> {
        self.conn.lock().execute(
            "insert into history (city_name, temperature, date, condition) values (?1, ?2, ?3, ?4)",
            params![record.city_name, record.temperature, record.date, record.condition],
        )?;
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<HistoryRecord>, WeatherError> {
        let conn = self.conn.lock();
        let mut stmt =
            conn.prepare("select city_name, temperature, date, condition from history order by id")?;

        let rows = stmt.query_map([], |r| {
            Ok(HistoryRecord {
                city_name: r.get(0)?,
                temperature: r.get(1)?,
                date: r.get(2)?,
                condition: r.get(3)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(WeatherError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(city: &str, temp: &str) -> HistoryRecord {
        HistoryRecord {
            city_name: city.into(),
            temperature: temp.into(),
            date: "14 November 2023".into(),
            condition: "Clear".into(),
        }
    }

    #[test]
    fn empty_store_lists_nothing() {
        let store = SqliteHistoryStore::open_in_memory().unwrap();
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn list_returns_insertion_order_with_duplicates() {
        let store = SqliteHistoryStore::open_in_memory().unwrap();

        store.append(&record("Indore", "25.3")).unwrap();
        store.append(&record("Hanoi", "31")).unwrap();
        store.append(&record("Indore", "26.1")).unwrap();

        let cities: Vec<_> =
            store.list_all().unwrap().into_iter().map(|r| (r.city_name, r.temperature)).collect();
        assert_eq!(
            cities,
            vec![
                ("Indore".to_string(), "25.3".to_string()),
                ("Hanoi".to_string(), "31".to_string()),
                ("Indore".to_string(), "26.1".to_string()),
            ]
        );
    }

    #[test]
    fn records_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.sqlite3");

        {
            let store = SqliteHistoryStore::open(&path).unwrap();
            store.append(&record("Indore", "25.3")).unwrap();
        }

        let store = SqliteHistoryStore::open(&path).unwrap();
        assert_eq!(store.list_all().unwrap(), vec![record("Indore", "25.3")]);
    }

    #[test]
    fn schema_version_is_recorded() {
        let store = SqliteHistoryStore::open_in_memory().unwrap();
        let version: i64 =
            store.conn.lock().query_row("pragma user_version", [], |r| r.get(0)).unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn unreadable_table_is_a_persistence_error() {
        let store = SqliteHistoryStore::open_in_memory().unwrap();
        store.conn.lock().execute_batch("drop table history").unwrap();

        let err = store.list_all().unwrap_err();
        assert!(matches!(err, WeatherError::Persistence(_)));
    }
}
