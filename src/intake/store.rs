//! SQLite-backed record store. One row per normalized email per audience,
//! enforced by a UNIQUE constraint and written through a single
//! insert-or-update statement so concurrent submissions for the same identity
//! can never race into duplicate rows.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use tracing::info;

use super::domain::{
    format_timestamp, CaregiverProfile, CaregiverRecord, ParentProfile, ParentRecord,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("invalid stored timestamp '{value}'")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::format::ParseError,
    },
}

/// Result of reconciling one submission: the stable row id and whether an
/// existing record was merged into rather than a new one created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub id: i64,
    pub duplicate: bool,
}

/// Identity-keyed store for both applicant collections.
pub struct InterestStore {
    conn: Mutex<Connection>,
}

impl InterestStore {
    /// Open or create the database file, creating parent directories as
    /// needed.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|err| StoreError::Unavailable(err.to_string()))?;
            }
        }

        info!(path = %path.display(), "opening interest database");
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// In-memory database for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|err| StoreError::Unavailable(format!("connection mutex poisoned: {err}")))
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn()?.execute_batch(
            "CREATE TABLE IF NOT EXISTS parents (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                full_name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                phone TEXT,
                baby_timing TEXT,
                start_timeframe TEXT NOT NULL,
                notes TEXT,
                updates_opt_in INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS caregivers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                full_name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                phone TEXT NOT NULL,
                certs TEXT,
                years_experience INTEGER,
                availability TEXT NOT NULL,
                notes TEXT,
                updates_opt_in INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Insert a parent record or merge into the one already holding this
    /// email. The merge overwrites every mutable attribute, including
    /// blanking optionals the new submission omitted; `created_at` and the
    /// row id are untouched.
    pub fn upsert_parent(&self, profile: &ParentProfile) -> Result<UpsertOutcome, StoreError> {
        let stamp = format_timestamp(&Utc::now());
        let conn = self.conn()?;

        // created_at survives the conflict update, so the returned value
        // equals this write's stamp only when the row was freshly inserted.
        let (id, created_at): (i64, String) = conn.query_row(
            "INSERT INTO parents
                (full_name, email, phone, baby_timing, start_timeframe, notes,
                 updates_opt_in, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
             ON CONFLICT(email) DO UPDATE SET
                full_name = excluded.full_name,
                phone = excluded.phone,
                baby_timing = excluded.baby_timing,
                start_timeframe = excluded.start_timeframe,
                notes = excluded.notes,
                updates_opt_in = excluded.updates_opt_in,
                updated_at = excluded.updated_at
             RETURNING id, created_at",
            params![
                profile.full_name,
                profile.email,
                profile.phone,
                profile.baby_timing,
                profile.start_timeframe,
                profile.notes,
                profile.updates_opt_in,
                stamp,
            ],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(UpsertOutcome {
            id,
            duplicate: created_at != stamp,
        })
    }

    /// Caregiver counterpart of [`InterestStore::upsert_parent`].
    pub fn upsert_caregiver(
        &self,
        profile: &CaregiverProfile,
    ) -> Result<UpsertOutcome, StoreError> {
        let stamp = format_timestamp(&Utc::now());
        let conn = self.conn()?;

        let (id, created_at): (i64, String) = conn.query_row(
            "INSERT INTO caregivers
                (full_name, email, phone, certs, years_experience, availability,
                 notes, updates_opt_in, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
             ON CONFLICT(email) DO UPDATE SET
                full_name = excluded.full_name,
                phone = excluded.phone,
                certs = excluded.certs,
                years_experience = excluded.years_experience,
                availability = excluded.availability,
                notes = excluded.notes,
                updates_opt_in = excluded.updates_opt_in,
                updated_at = excluded.updated_at
             RETURNING id, created_at",
            params![
                profile.full_name,
                profile.email,
                profile.phone,
                profile.certs,
                profile.years_experience,
                profile.availability,
                profile.notes,
                profile.updates_opt_in,
                stamp,
            ],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(UpsertOutcome {
            id,
            duplicate: created_at != stamp,
        })
    }

    /// All parent records, newest first.
    pub fn parents(&self) -> Result<Vec<ParentRecord>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, full_name, email, phone, baby_timing, start_timeframe,
                    notes, updates_opt_in, created_at, updated_at
             FROM parents
             ORDER BY created_at DESC, id DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(ParentRow {
                id: row.get(0)?,
                full_name: row.get(1)?,
                email: row.get(2)?,
                phone: row.get(3)?,
                baby_timing: row.get(4)?,
                start_timeframe: row.get(5)?,
                notes: row.get(6)?,
                updates_opt_in: row.get(7)?,
                created_at: row.get(8)?,
                updated_at: row.get(9)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.into_record()?);
        }
        Ok(records)
    }

    /// All caregiver records, newest first.
    pub fn caregivers(&self) -> Result<Vec<CaregiverRecord>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, full_name, email, phone, certs, years_experience,
                    availability, notes, updates_opt_in, created_at, updated_at
             FROM caregivers
             ORDER BY created_at DESC, id DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(CaregiverRow {
                id: row.get(0)?,
                full_name: row.get(1)?,
                email: row.get(2)?,
                phone: row.get(3)?,
                certs: row.get(4)?,
                years_experience: row.get(5)?,
                availability: row.get(6)?,
                notes: row.get(7)?,
                updates_opt_in: row.get(8)?,
                created_at: row.get(9)?,
                updated_at: row.get(10)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.into_record()?);
        }
        Ok(records)
    }
}

fn parse_timestamp(value: String) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(&value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| StoreError::Timestamp { value, source })
}

struct ParentRow {
    id: i64,
    full_name: String,
    email: String,
    phone: String,
    baby_timing: String,
    start_timeframe: String,
    notes: Option<String>,
    updates_opt_in: bool,
    created_at: String,
    updated_at: String,
}

impl ParentRow {
    fn into_record(self) -> Result<ParentRecord, StoreError> {
        Ok(ParentRecord {
            id: self.id,
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
            baby_timing: self.baby_timing,
            start_timeframe: self.start_timeframe,
            notes: self.notes,
            updates_opt_in: self.updates_opt_in,
            created_at: parse_timestamp(self.created_at)?,
            updated_at: parse_timestamp(self.updated_at)?,
        })
    }
}

struct CaregiverRow {
    id: i64,
    full_name: String,
    email: String,
    phone: String,
    certs: Option<String>,
    years_experience: Option<i64>,
    availability: String,
    notes: Option<String>,
    updates_opt_in: bool,
    created_at: String,
    updated_at: String,
}

impl CaregiverRow {
    fn into_record(self) -> Result<CaregiverRecord, StoreError> {
        Ok(CaregiverRecord {
            id: self.id,
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
            certs: self.certs,
            years_experience: self.years_experience,
            availability: self.availability,
            notes: self.notes,
            updates_opt_in: self.updates_opt_in,
            created_at: parse_timestamp(self.created_at)?,
            updated_at: parse_timestamp(self.updated_at)?,
        })
    }
}
