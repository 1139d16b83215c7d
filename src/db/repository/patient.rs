use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::{classify, DatabaseError};
use crate::models::*;

const PATIENT_COLUMNS: &str = "id, name, cpf, age, dental_plan, active";

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        cpf: row.get(2)?,
        age: row.get(3)?,
        dental_plan: row.get(4)?,
        active: row.get::<_, i32>(5)? != 0,
    })
}

fn query_patients(
    conn: &Connection,
    filter: &str,
    args: impl rusqlite::Params,
) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PATIENT_COLUMNS} FROM patients {filter} ORDER BY id"
    ))?;
    let rows = stmt.query_map(args, patient_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Insert a patient. The incoming `id` is ignored; the stored row is returned.
pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<Patient, DatabaseError> {
    conn.execute(
        "INSERT INTO patients (name, cpf, age, dental_plan, active)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            patient.name,
            patient.cpf,
            patient.age,
            patient.dental_plan,
            patient.active as i32,
        ],
    )
    .map_err(classify)?;
    Ok(Patient {
        id: conn.last_insert_rowid(),
        ..patient.clone()
    })
}

pub fn get_patient(conn: &Connection, id: i64) -> Result<Option<Patient>, DatabaseError> {
    let patient = conn
        .query_row(
            &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?1"),
            params![id],
            patient_from_row,
        )
        .optional()?;
    Ok(patient)
}

pub fn get_patient_by_cpf(conn: &Connection, cpf: &str) -> Result<Option<Patient>, DatabaseError> {
    let patient = conn
        .query_row(
            &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE cpf = ?1"),
            params![cpf],
            patient_from_row,
        )
        .optional()?;
    Ok(patient)
}

pub fn get_all_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    query_patients(conn, "", [])
}

pub fn get_active_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    query_patients(conn, "WHERE active = 1", [])
}

pub fn get_patients_by_plan(conn: &Connection, plan: &str) -> Result<Vec<Patient>, DatabaseError> {
    query_patients(conn, "WHERE dental_plan = ?1", params![plan])
}

pub fn get_patients_by_name_containing(
    conn: &Connection,
    fragment: &str,
) -> Result<Vec<Patient>, DatabaseError> {
    query_patients(conn, "WHERE instr(name, ?1) > 0", params![fragment])
}

/// Patients strictly older than `age`.
pub fn get_patients_older_than(conn: &Connection, age: i32) -> Result<Vec<Patient>, DatabaseError> {
    query_patients(conn, "WHERE age > ?1", params![age])
}

/// Overwrite every column of row `id`. Returns `None` if the id is unknown.
pub fn replace_patient(
    conn: &Connection,
    id: i64,
    patient: &Patient,
) -> Result<Option<Patient>, DatabaseError> {
    let changed = conn
        .execute(
            "UPDATE patients SET name = ?1, cpf = ?2, age = ?3, dental_plan = ?4, active = ?5
             WHERE id = ?6",
            params![
                patient.name,
                patient.cpf,
                patient.age,
                patient.dental_plan,
                patient.active as i32,
                id,
            ],
        )
        .map_err(classify)?;
    if changed == 0 {
        return Ok(None);
    }
    Ok(Some(Patient {
        id,
        ..patient.clone()
    }))
}

/// Physically remove a patient. Fails with `ConstraintViolation` while any
/// procedure, diagnosis or claim still references it.
pub fn delete_patient(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let changed = conn
        .execute("DELETE FROM patients WHERE id = ?1", params![id])
        .map_err(classify)?;
    Ok(changed > 0)
}
