//! Medication catalog database operations.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::{Corpus, MedicationRecord};

const SELECT_COLUMNS: &str = r#"
    SELECT id, name, name_localized, generic_name, generic_name_localized,
           category, category_localized, primary_use, primary_use_localized,
           dosage, dosage_localized, warnings, warnings_localized
    FROM medications
"#;

impl Database {
    /// Insert or update a medication. Updates keep the original position.
    pub fn upsert_medication(&self, record: &MedicationRecord) -> DbResult<()> {
        upsert(&self.conn, record)
    }

    /// Insert many medications in one transaction, in slice order.
    pub fn import_medications(&mut self, records: &[MedicationRecord]) -> DbResult<usize> {
        let tx = self.transaction()?;
        for record in records {
            upsert(&tx, record)?;
        }
        tx.commit()?;
        Ok(records.len())
    }

    /// Get a medication by id.
    pub fn get_medication(&self, id: &str) -> DbResult<Option<MedicationRecord>> {
        let sql = format!("{} WHERE id = ?", SELECT_COLUMNS);
        let record = self.conn.query_row(&sql, [id], map_record).optional()?;
        Ok(record)
    }

    /// All medications in insertion order.
    pub fn list_medications(&self) -> DbResult<Vec<MedicationRecord>> {
        let sql = format!("{} ORDER BY seq", SELECT_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], map_record)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Number of stored medications.
    pub fn medication_count(&self) -> DbResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM medications", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Delete a medication.
    pub fn delete_medication(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM medications WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// Load every stored medication into a validated, immutable corpus.
    pub fn load_corpus(&self) -> DbResult<Corpus> {
        let records = self.list_medications()?;
        let corpus = Corpus::new(records)?;
        tracing::info!(records = corpus.len(), "corpus loaded from database");
        Ok(corpus)
    }
}

fn upsert(conn: &Connection, record: &MedicationRecord) -> DbResult<()> {
    conn.execute(
        r#"
        INSERT INTO medications (
            id, name, name_localized, generic_name, generic_name_localized,
            category, category_localized, primary_use, primary_use_localized,
            dosage, dosage_localized, warnings, warnings_localized, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, datetime('now'))
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            name_localized = excluded.name_localized,
            generic_name = excluded.generic_name,
            generic_name_localized = excluded.generic_name_localized,
            category = excluded.category,
            category_localized = excluded.category_localized,
            primary_use = excluded.primary_use,
            primary_use_localized = excluded.primary_use_localized,
            dosage = excluded.dosage,
            dosage_localized = excluded.dosage_localized,
            warnings = excluded.warnings,
            warnings_localized = excluded.warnings_localized,
            updated_at = datetime('now')
        "#,
        params![
            record.id,
            record.name,
            record.name_localized,
            record.generic_name,
            record.generic_name_localized,
            record.category,
            record.category_localized,
            record.primary_use,
            record.primary_use_localized,
            record.dosage,
            record.dosage_localized,
            record.warnings,
            record.warnings_localized,
        ],
    )?;
    Ok(())
}

fn map_record(row: &Row<'_>) -> rusqlite::Result<MedicationRecord> {
    Ok(MedicationRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        name_localized: row.get(2)?,
        generic_name: row.get(3)?,
        generic_name_localized: row.get(4)?,
        category: row.get(5)?,
        category_localized: row.get(6)?,
        primary_use: row.get(7)?,
        primary_use_localized: row.get(8)?,
        dosage: row.get(9)?,
        dosage_localized: row.get(10)?,
        warnings: row.get(11)?,
        warnings_localized: row.get(12)?,
    })
}
