use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::{classify, DatabaseError};
use crate::models::*;

const DIAGNOSIS_COLUMNS: &str = "id, diagnosis_type, date, description, patient_id";

fn diagnosis_from_row(row: &Row<'_>) -> rusqlite::Result<Diagnosis> {
    Ok(Diagnosis {
        id: row.get(0)?,
        diagnosis_type: row.get(1)?,
        date: row.get::<_, NaiveDate>(2)?,
        description: row.get(3)?,
        patient_id: row.get(4)?,
    })
}

fn query_diagnoses(
    conn: &Connection,
    filter: &str,
    args: impl rusqlite::Params,
) -> Result<Vec<Diagnosis>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DIAGNOSIS_COLUMNS} FROM diagnoses {filter} ORDER BY id"
    ))?;
    let rows = stmt.query_map(args, diagnosis_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn insert_diagnosis(conn: &Connection, diag: &Diagnosis) -> Result<Diagnosis, DatabaseError> {
    conn.execute(
        "INSERT INTO diagnoses (diagnosis_type, date, description, patient_id)
         VALUES (?1, ?2, ?3, ?4)",
        params![diag.diagnosis_type, diag.date, diag.description, diag.patient_id],
    )
    .map_err(classify)?;
    Ok(Diagnosis {
        id: conn.last_insert_rowid(),
        ..diag.clone()
    })
}

pub fn get_diagnosis(conn: &Connection, id: i64) -> Result<Option<Diagnosis>, DatabaseError> {
    let diagnosis = conn
        .query_row(
            &format!("SELECT {DIAGNOSIS_COLUMNS} FROM diagnoses WHERE id = ?1"),
            params![id],
            diagnosis_from_row,
        )
        .optional()?;
    Ok(diagnosis)
}

pub fn get_all_diagnoses(conn: &Connection) -> Result<Vec<Diagnosis>, DatabaseError> {
    query_diagnoses(conn, "", [])
}

pub fn get_diagnoses_by_type_containing(
    conn: &Connection,
    fragment: &str,
) -> Result<Vec<Diagnosis>, DatabaseError> {
    query_diagnoses(conn, "WHERE instr(diagnosis_type, ?1) > 0", params![fragment])
}

/// Diagnoses made strictly after `date`.
pub fn get_diagnoses_after(
    conn: &Connection,
    date: NaiveDate,
) -> Result<Vec<Diagnosis>, DatabaseError> {
    query_diagnoses(conn, "WHERE date > ?1", params![date])
}

pub fn replace_diagnosis(
    conn: &Connection,
    id: i64,
    diag: &Diagnosis,
) -> Result<Option<Diagnosis>, DatabaseError> {
    let changed = conn
        .execute(
            "UPDATE diagnoses SET diagnosis_type = ?1, date = ?2, description = ?3,
             patient_id = ?4 WHERE id = ?5",
            params![diag.diagnosis_type, diag.date, diag.description, diag.patient_id, id],
        )
        .map_err(classify)?;
    if changed == 0 {
        return Ok(None);
    }
    Ok(Some(Diagnosis {
        id,
        ..diag.clone()
    }))
}

pub fn delete_diagnosis(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let changed = conn
        .execute("DELETE FROM diagnoses WHERE id = ?1", params![id])
        .map_err(classify)?;
    Ok(changed > 0)
}
