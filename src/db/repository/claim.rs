use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::{classify, DatabaseError};
use crate::models::*;

const CLAIM_COLUMNS: &str =
    "id, claim_type, description, date, fraud_risk, procedure_id, dentist_id, patient_id";

fn claim_from_row(row: &Row<'_>) -> rusqlite::Result<Claim> {
    Ok(Claim {
        id: row.get(0)?,
        claim_type: row.get(1)?,
        description: row.get(2)?,
        date: row.get::<_, NaiveDate>(3)?,
        fraud_risk: row.get::<_, i32>(4)? != 0,
        procedure_id: row.get(5)?,
        dentist_id: row.get(6)?,
        patient_id: row.get(7)?,
    })
}

fn query_claims(
    conn: &Connection,
    filter: &str,
    args: impl rusqlite::Params,
) -> Result<Vec<Claim>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CLAIM_COLUMNS} FROM claims {filter} ORDER BY id"
    ))?;
    let rows = stmt.query_map(args, claim_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn insert_claim(conn: &Connection, claim: &Claim) -> Result<Claim, DatabaseError> {
    conn.execute(
        "INSERT INTO claims (claim_type, description, date, fraud_risk, procedure_id,
         dentist_id, patient_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            claim.claim_type,
            claim.description,
            claim.date,
            claim.fraud_risk as i32,
            claim.procedure_id,
            claim.dentist_id,
            claim.patient_id,
        ],
    )
    .map_err(classify)?;
    Ok(Claim {
        id: conn.last_insert_rowid(),
        ..claim.clone()
    })
}

pub fn get_claim(conn: &Connection, id: i64) -> Result<Option<Claim>, DatabaseError> {
    let claim = conn
        .query_row(
            &format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE id = ?1"),
            params![id],
            claim_from_row,
        )
        .optional()?;
    Ok(claim)
}

pub fn get_all_claims(conn: &Connection) -> Result<Vec<Claim>, DatabaseError> {
    query_claims(conn, "", [])
}

pub fn get_fraud_risk_claims(conn: &Connection) -> Result<Vec<Claim>, DatabaseError> {
    query_claims(conn, "WHERE fraud_risk = 1", [])
}

pub fn count_claims_for_procedure(
    conn: &Connection,
    procedure_id: i64,
) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM claims WHERE procedure_id = ?1",
        params![procedure_id],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(count)
}

pub fn replace_claim(
    conn: &Connection,
    id: i64,
    claim: &Claim,
) -> Result<Option<Claim>, DatabaseError> {
    let changed = conn
        .execute(
            "UPDATE claims SET claim_type = ?1, description = ?2, date = ?3, fraud_risk = ?4,
             procedure_id = ?5, dentist_id = ?6, patient_id = ?7
             WHERE id = ?8",
            params![
                claim.claim_type,
                claim.description,
                claim.date,
                claim.fraud_risk as i32,
                claim.procedure_id,
                claim.dentist_id,
                claim.patient_id,
                id,
            ],
        )
        .map_err(classify)?;
    if changed == 0 {
        return Ok(None);
    }
    Ok(Some(Claim {
        id,
        ..claim.clone()
    }))
}

pub fn delete_claim(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let changed = conn
        .execute("DELETE FROM claims WHERE id = ?1", params![id])
        .map_err(classify)?;
    Ok(changed > 0)
}
