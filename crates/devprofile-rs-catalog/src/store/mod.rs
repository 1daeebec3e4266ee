// crates/devprofile-rs-catalog/src/store/mod.rs

//! SQLite persistence of profiles and quality reports.

mod mapper;

use crate::error::StoreError;
use crate::pqa::{DiffRecord, QualityReport};
use devprofile_rs::config::StorageConfig;
use devprofile_rs::grammar::Grammar;
use devprofile_rs::model::DeviceProfile;
use log::debug;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

const SCHEMA_VERSION: i64 = 1;

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path, config: &StorageConfig) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Id of the profile ingested from content with this checksum.
    pub fn find_by_checksum(&self, checksum: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .conn
            .query_row(
                "SELECT id FROM profiles WHERE checksum = ?1",
                params![checksum],
                |row| row.get(0),
            )
            .optional()?)
    }

    /// Decomposes `profile` into rows in one transaction and returns the new
    /// profile id. Nothing is written if any table fails.
    ///
    /// If another connection committed the same checksum first, the unique
    /// key rejects this insert and the id already stored is returned.
    pub fn insert_profile(
        &mut self,
        profile: &DeviceProfile,
        source: &[u8],
        checksum: &str,
    ) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let ingested_at = chrono::Utc::now().to_rfc3339();
        let record = mapper::SourceRecord {
            checksum,
            bytes: source,
            ingested_at: &ingested_at,
        };

        let failed = |source: rusqlite::Error| StoreError::StorageTransactionFailed {
            operation: "decompose",
            source,
        };
        let tx = self.conn.transaction()?;
        let written = mapper::decompose(&tx, &id, profile, &record).and_then(|()| tx.commit());
        if let Err(source) = written {
            if source.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation) {
                if let Some(existing) = self.find_by_checksum(checksum)? {
                    debug!("Checksum {} was stored concurrently as {}", checksum, existing);
                    return Ok(existing);
                }
            }
            return Err(failed(source));
        }
        debug!("Decomposed profile {} ({} parameters)", id, profile.parameters.len());
        Ok(id)
    }

    /// Recomposes the profile stored under `id`.
    pub fn load_profile(&self, id: &str) -> Result<DeviceProfile, StoreError> {
        mapper::recompose(&self.conn, id)
    }

    /// Grammar and raw bytes of the document stored under `id`.
    pub fn load_source(&self, id: &str) -> Result<(Grammar, Vec<u8>), StoreError> {
        mapper::load_source(&self.conn, id)
    }

    /// Deletes a profile and, by cascade, every row that belongs to it.
    pub fn delete_profile(&mut self, id: &str) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        let deleted = tx
            .execute("DELETE FROM profiles WHERE id = ?1", params![id])
            .map_err(|source| StoreError::StorageTransactionFailed {
                operation: "delete",
                source,
            })?;
        if deleted == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        tx.commit().map_err(|source| StoreError::StorageTransactionFailed {
            operation: "delete",
            source,
        })?;
        Ok(())
    }

    pub fn profile_ids(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM profiles ORDER BY ingested_at, id")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<_, _>>()?;
        Ok(ids)
    }

    /// Persists `report` for `profile_id`, stamping it with the run time.
    /// Returns the stored report.
    pub fn insert_report(
        &mut self,
        profile_id: &str,
        report: &QualityReport,
    ) -> Result<QualityReport, StoreError> {
        let run_at = chrono::Utc::now().to_rfc3339();
        let failed = |source: rusqlite::Error| StoreError::StorageTransactionFailed {
            operation: "insert_report",
            source,
        };

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO quality_reports (profile_id, run_at, grammar, score, \
                 weighted_field_count, weighted_mismatch) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                profile_id,
                run_at,
                report.grammar.as_str(),
                report.score,
                report.weighted_field_count,
                report.weighted_mismatch,
            ],
        )
        .map_err(failed)?;
        let report_id = tx.last_insert_rowid();
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO diff_records (report_id, ordinal, kind, category, path, \
                         expected, actual, weight) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                )
                .map_err(failed)?;
            for (ordinal, r) in report.records.iter().enumerate() {
                stmt.execute(params![
                    report_id,
                    ordinal,
                    r.kind.as_str(),
                    r.category,
                    r.path,
                    r.expected,
                    r.actual,
                    r.weight,
                ])
                .map_err(failed)?;
            }
        }
        tx.commit().map_err(failed)?;

        let mut stored = report.clone();
        stored.profile_id = Some(profile_id.to_string());
        stored.run_at = Some(run_at);
        Ok(stored)
    }

    /// Every stored report of `profile_id`, oldest first.
    pub fn load_reports(&self, profile_id: &str) -> Result<Vec<QualityReport>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, run_at, grammar, score, weighted_field_count, weighted_mismatch \
             FROM quality_reports WHERE profile_id = ?1 ORDER BY run_at, id",
        )?;
        let heads: Vec<(i64, String, String, f64, f64, f64)> = stmt
            .query_map(params![profile_id], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                ))
            })?
            .collect::<Result<_, _>>()?;

        let mut records_stmt = self.conn.prepare(
            "SELECT kind, category, path, expected, actual, weight FROM diff_records \
             WHERE report_id = ?1 ORDER BY ordinal",
        )?;
        let mut reports = Vec::with_capacity(heads.len());
        for (report_id, run_at, grammar, score, field_count, mismatch) in heads {
            let rows = records_stmt.query_map(params![report_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, f64>(5)?,
                ))
            })?;
            let mut records = Vec::new();
            for row in rows {
                let (kind, category, path, expected, actual, weight) = row?;
                records.push(DiffRecord {
                    kind: kind.parse().map_err(StoreError::InvalidData)?,
                    category,
                    path,
                    expected,
                    actual,
                    weight,
                });
            }
            reports.push(QualityReport {
                profile_id: Some(profile_id.to_string()),
                run_at: Some(run_at),
                grammar: grammar.parse().map_err(StoreError::InvalidData)?,
                score,
                weighted_field_count: field_count,
                weighted_mismatch: mismatch,
                records,
            });
        }
        Ok(reports)
    }
}
