//! SQLite database for simulation results
//!
//! Provides persistent storage and querying of headless runs.
//! Uses WAL mode for concurrent reads during writes.

use rusqlite::{Connection, Result, params};
use std::path::Path;

use super::metrics::RunResult;
use crate::events::serialize_event;

/// Database wrapper for simulation results
pub struct SimDatabase {
    conn: Connection,
}

impl SimDatabase {
    /// Open or create a database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;

        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                created_at TEXT NOT NULL,
                session_type TEXT NOT NULL,
                config_json TEXT
            );

            CREATE TABLE IF NOT EXISTS runs (
                id INTEGER PRIMARY KEY,
                session_id TEXT REFERENCES sessions(id),
                seed INTEGER NOT NULL,
                speed REAL NOT NULL,
                viewport_width REAL NOT NULL,
                viewport_height REAL NOT NULL,
                frames_run INTEGER NOT NULL,
                hits INTEGER NOT NULL,
                final_population INTEGER NOT NULL,
                first_hit_frame INTEGER,
                max_trail_len INTEGER NOT NULL,
                max_penetration REAL NOT NULL,
                end_reason TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_runs_session ON runs(session_id);
            CREATE INDEX IF NOT EXISTS idx_runs_speed ON runs(speed);

            CREATE TABLE IF NOT EXISTS events (
                id INTEGER PRIMARY KEY,
                run_id INTEGER REFERENCES runs(id),
                time_ms INTEGER NOT NULL,
                event_type TEXT NOT NULL,
                data TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_events_run ON events(run_id);
            CREATE INDEX IF NOT EXISTS idx_events_type ON events(event_type);
            "#,
        )?;
        Ok(())
    }

    /// Create a new session and return its ID
    pub fn create_session(&self, session_type: &str, config_json: Option<&str>) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().to_rfc3339();

        self.conn.execute(
            "INSERT INTO sessions (id, created_at, session_type, config_json) VALUES (?1, ?2, ?3, ?4)",
            params![id, created_at, session_type, config_json],
        )?;

        Ok(id)
    }

    /// Insert a run result (and its events) and return the run ID
    pub fn insert_run(&self, session_id: &str, result: &RunResult) -> Result<i64> {
        self.conn.execute(
            r#"INSERT INTO runs
               (session_id, seed, speed, viewport_width, viewport_height, frames_run, hits,
                final_population, first_hit_frame, max_trail_len, max_penetration, end_reason)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"#,
            params![
                session_id,
                result.seed as i64,
                result.speed,
                result.viewport.0,
                result.viewport.1,
                result.frames_run as i64,
                result.hits,
                result.final_population as i64,
                result.first_hit_frame.map(|f| f as i64),
                result.max_trail_len as i64,
                result.max_penetration,
                result.end_reason,
            ],
        )?;

        let run_id = self.conn.last_insert_rowid();

        let lines: Vec<(u32, &str, String)> = result
            .events
            .iter()
            .map(|(ts, event)| (*ts, event.type_code(), serialize_event(*ts, event)))
            .collect();
        self.insert_events(run_id, &lines)?;

        Ok(run_id)
    }

    /// Insert a batch of events for a run
    pub fn insert_events(&self, run_id: i64, events: &[(u32, &str, String)]) -> Result<()> {
        let mut stmt = self.conn.prepare(
            "INSERT INTO events (run_id, time_ms, event_type, data) VALUES (?1, ?2, ?3, ?4)",
        )?;

        for (time_ms, event_type, data) in events {
            stmt.execute(params![run_id, time_ms, event_type, data])?;
        }

        Ok(())
    }

    /// Runs with optional filtering
    pub fn query_runs(&self, filter: &RunFilter) -> Result<Vec<RunSummary>> {
        let mut sql = String::from(
            "SELECT id, seed, speed, frames_run, hits, final_population, end_reason
             FROM runs WHERE 1=1",
        );

        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(session_id) = &filter.session_id {
            sql.push_str(" AND session_id = ?");
            params.push(Box::new(session_id.clone()));
        }

        if let Some(speed) = filter.speed {
            sql.push_str(" AND speed = ?");
            params.push(Box::new(speed as f64));
        }

        sql.push_str(" ORDER BY id");

        if let Some(limit) = filter.limit {
            sql.push_str(" LIMIT ?");
            params.push(Box::new(limit as i64));
        }

        let mut stmt = self.conn.prepare(&sql)?;

        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let rows = stmt.query_map(param_refs.as_slice(), |row| {
            Ok(RunSummary {
                id: row.get(0)?,
                seed: row.get::<_, i64>(1)? as u64,
                speed: row.get(2)?,
                frames_run: row.get::<_, i64>(3)? as u64,
                hits: row.get(4)?,
                final_population: row.get::<_, i64>(5)? as usize,
                end_reason: row.get(6)?,
            })
        })?;

        rows.collect()
    }

    /// Average hits per run for one speed
    pub fn avg_hits_for_speed(&self, speed: f32) -> Result<Option<f64>> {
        self.conn.query_row(
            "SELECT AVG(hits) FROM runs WHERE speed = ?1",
            params![speed as f64],
            |row| row.get(0),
        )
    }

    /// Every speed with at least one run, ascending
    pub fn speeds(&self) -> Result<Vec<f32>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT speed FROM runs ORDER BY speed")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect()
    }

    pub fn run_count(&self) -> Result<u64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM runs", [], |row| row.get(0))
    }

    pub fn session_count(&self) -> Result<u64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))
    }

    /// Get event count for a run
    pub fn event_count(&self, run_id: i64) -> Result<u64> {
        self.conn.query_row(
            "SELECT COUNT(*) FROM events WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )
    }
}

/// Filter for querying runs
#[derive(Debug, Clone, Default)]
pub struct RunFilter {
    pub session_id: Option<String>,
    pub speed: Option<f32>,
    pub limit: Option<u32>,
}

/// Summary of a run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub id: i64,
    pub seed: u64,
    pub speed: f32,
    pub frames_run: u64,
    pub hits: u32,
    pub final_population: usize,
    pub end_reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::BounceEvent;

    fn sample_result(seed: u64, speed: f32, hits: u32) -> RunResult {
        RunResult {
            seed,
            speed,
            viewport: (800.0, 600.0),
            frames_run: 600,
            hits,
            final_population: hits as usize + 1,
            first_hit_frame: Some(12),
            max_trail_len: 50,
            max_penetration: 0.0,
            end_reason: "frames".to_string(),
            events: vec![(
                200,
                BounceEvent::WallHit {
                    frame: 12,
                    ball: 0,
                    pos: (100.0, 300.0),
                    hits: 1,
                },
            )],
        }
    }

    #[test]
    fn test_create_database() {
        let db = SimDatabase::open_in_memory().unwrap();
        assert_eq!(db.run_count().unwrap(), 0);
        assert_eq!(db.session_count().unwrap(), 0);
    }

    #[test]
    fn test_insert_run_with_events() {
        let db = SimDatabase::open_in_memory().unwrap();
        let session_id = db.create_session("test", None).unwrap();

        let run_id = db.insert_run(&session_id, &sample_result(1, 5.0, 3)).unwrap();

        assert!(run_id > 0);
        assert_eq!(db.run_count().unwrap(), 1);
        assert_eq!(db.event_count(run_id).unwrap(), 1);
    }

    #[test]
    fn test_query_by_speed() {
        let db = SimDatabase::open_in_memory().unwrap();
        let session_id = db.create_session("sweep", Some("{}")).unwrap();

        db.insert_run(&session_id, &sample_result(1, 2.0, 4)).unwrap();
        db.insert_run(&session_id, &sample_result(2, 2.0, 8)).unwrap();
        db.insert_run(&session_id, &sample_result(3, 6.0, 20)).unwrap();

        let filter = RunFilter {
            speed: Some(2.0),
            ..Default::default()
        };
        let runs = db.query_runs(&filter).unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].seed, 1);
        assert_eq!(db.avg_hits_for_speed(2.0).unwrap(), Some(6.0));
        assert_eq!(db.avg_hits_for_speed(9.0).unwrap(), None);
        assert_eq!(db.speeds().unwrap(), vec![2.0, 6.0]);
    }

    #[test]
    fn test_query_by_session_with_limit() {
        let db = SimDatabase::open_in_memory().unwrap();
        let first = db.create_session("single", None).unwrap();
        let second = db.create_session("multi_run", None).unwrap();

        db.insert_run(&first, &sample_result(1, 5.0, 3)).unwrap();
        for seed in 10..14 {
            db.insert_run(&second, &sample_result(seed, 5.0, 1)).unwrap();
        }

        let filter = RunFilter {
            session_id: Some(second),
            limit: Some(2),
            ..Default::default()
        };
        let runs = db.query_runs(&filter).unwrap();
        assert_eq!(runs.iter().map(|r| r.seed).collect::<Vec<_>>(), vec![10, 11]);
        assert_eq!(db.session_count().unwrap(), 2);
        assert_eq!(db.run_count().unwrap(), 5);
    }
}
