use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::{classify, DatabaseError};
use crate::models::*;

const PROCEDURE_COLUMNS: &str =
    "id, procedure_type, date, cost, fraud_risk, patient_id, dentist_id, claim_id";

fn procedure_from_row(row: &Row<'_>) -> rusqlite::Result<Procedure> {
    Ok(Procedure {
        id: row.get(0)?,
        procedure_type: row.get(1)?,
        date: row.get::<_, NaiveDate>(2)?,
        cost: row.get(3)?,
        fraud_risk: row.get::<_, i32>(4)? != 0,
        patient_id: row.get(5)?,
        dentist_id: row.get(6)?,
        claim_id: row.get(7)?,
    })
}

fn query_procedures(
    conn: &Connection,
    filter: &str,
    args: impl rusqlite::Params,
) -> Result<Vec<Procedure>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROCEDURE_COLUMNS} FROM procedures {filter} ORDER BY id"
    ))?;
    let rows = stmt.query_map(args, procedure_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Insert a procedure. The incoming `id` is ignored; the stored row is returned.
pub fn insert_procedure(conn: &Connection, proc: &Procedure) -> Result<Procedure, DatabaseError> {
    conn.execute(
        "INSERT INTO procedures (procedure_type, date, cost, fraud_risk, patient_id,
         dentist_id, claim_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            proc.procedure_type,
            proc.date,
            proc.cost,
            proc.fraud_risk as i32,
            proc.patient_id,
            proc.dentist_id,
            proc.claim_id,
        ],
    )
    .map_err(classify)?;
    Ok(Procedure {
        id: conn.last_insert_rowid(),
        ..proc.clone()
    })
}

pub fn get_procedure(conn: &Connection, id: i64) -> Result<Option<Procedure>, DatabaseError> {
    let procedure = conn
        .query_row(
            &format!("SELECT {PROCEDURE_COLUMNS} FROM procedures WHERE id = ?1"),
            params![id],
            procedure_from_row,
        )
        .optional()?;
    Ok(procedure)
}

pub fn get_all_procedures(conn: &Connection) -> Result<Vec<Procedure>, DatabaseError> {
    query_procedures(conn, "", [])
}

pub fn get_fraud_risk_procedures(conn: &Connection) -> Result<Vec<Procedure>, DatabaseError> {
    query_procedures(conn, "WHERE fraud_risk = 1", [])
}

pub fn get_procedures_by_type(
    conn: &Connection,
    procedure_type: &str,
) -> Result<Vec<Procedure>, DatabaseError> {
    query_procedures(conn, "WHERE procedure_type = ?1", params![procedure_type])
}

/// Procedures performed strictly before `date`.
pub fn get_procedures_before(
    conn: &Connection,
    date: NaiveDate,
) -> Result<Vec<Procedure>, DatabaseError> {
    query_procedures(conn, "WHERE date < ?1", params![date])
}

pub fn get_procedures_costing_more_than(
    conn: &Connection,
    cost: f64,
) -> Result<Vec<Procedure>, DatabaseError> {
    query_procedures(conn, "WHERE cost > ?1", params![cost])
}

pub fn count_procedures_for_claim(conn: &Connection, claim_id: i64) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM procedures WHERE claim_id = ?1",
        params![claim_id],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(count)
}

/// Overwrite every column of row `id`. Returns `None` if the id is unknown.
pub fn replace_procedure(
    conn: &Connection,
    id: i64,
    proc: &Procedure,
) -> Result<Option<Procedure>, DatabaseError> {
    let changed = conn
        .execute(
            "UPDATE procedures SET procedure_type = ?1, date = ?2, cost = ?3, fraud_risk = ?4,
             patient_id = ?5, dentist_id = ?6, claim_id = ?7
             WHERE id = ?8",
            params![
                proc.procedure_type,
                proc.date,
                proc.cost,
                proc.fraud_risk as i32,
                proc.patient_id,
                proc.dentist_id,
                proc.claim_id,
                id,
            ],
        )
        .map_err(classify)?;
    if changed == 0 {
        return Ok(None);
    }
    Ok(Some(Procedure {
        id,
        ..proc.clone()
    }))
}

pub fn delete_procedure(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let changed = conn
        .execute("DELETE FROM procedures WHERE id = ?1", params![id])
        .map_err(classify)?;
    Ok(changed > 0)
}
