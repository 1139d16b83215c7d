use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::{classify, DatabaseError};
use crate::models::*;

const DENTIST_COLUMNS: &str = "id, name, license_number, active";

fn dentist_from_row(row: &Row<'_>) -> rusqlite::Result<Dentist> {
    Ok(Dentist {
        id: row.get(0)?,
        name: row.get(1)?,
        license_number: row.get(2)?,
        active: row.get::<_, i32>(3)? != 0,
    })
}

fn query_dentists(
    conn: &Connection,
    filter: &str,
    args: impl rusqlite::Params,
) -> Result<Vec<Dentist>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DENTIST_COLUMNS} FROM dentists {filter} ORDER BY id"
    ))?;
    let rows = stmt.query_map(args, dentist_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Insert a dentist. The incoming `id` is ignored; the stored row is returned.
pub fn insert_dentist(conn: &Connection, dentist: &Dentist) -> Result<Dentist, DatabaseError> {
    conn.execute(
        "INSERT INTO dentists (name, license_number, active) VALUES (?1, ?2, ?3)",
        params![dentist.name, dentist.license_number, dentist.active as i32],
    )
    .map_err(classify)?;
    Ok(Dentist {
        id: conn.last_insert_rowid(),
        ..dentist.clone()
    })
}

pub fn get_dentist(conn: &Connection, id: i64) -> Result<Option<Dentist>, DatabaseError> {
    let dentist = conn
        .query_row(
            &format!("SELECT {DENTIST_COLUMNS} FROM dentists WHERE id = ?1"),
            params![id],
            dentist_from_row,
        )
        .optional()?;
    Ok(dentist)
}

pub fn get_all_dentists(conn: &Connection) -> Result<Vec<Dentist>, DatabaseError> {
    query_dentists(conn, "", [])
}

pub fn get_active_dentists(conn: &Connection) -> Result<Vec<Dentist>, DatabaseError> {
    query_dentists(conn, "WHERE active = 1", [])
}

pub fn get_dentists_by_name_containing(
    conn: &Connection,
    fragment: &str,
) -> Result<Vec<Dentist>, DatabaseError> {
    query_dentists(conn, "WHERE instr(name, ?1) > 0", params![fragment])
}

pub fn get_dentist_by_license(
    conn: &Connection,
    license_number: &str,
) -> Result<Option<Dentist>, DatabaseError> {
    let dentist = conn
        .query_row(
            &format!("SELECT {DENTIST_COLUMNS} FROM dentists WHERE license_number = ?1"),
            params![license_number],
            dentist_from_row,
        )
        .optional()?;
    Ok(dentist)
}

/// Overwrite every column of row `id`. Returns `None` if the id is unknown.
pub fn replace_dentist(
    conn: &Connection,
    id: i64,
    dentist: &Dentist,
) -> Result<Option<Dentist>, DatabaseError> {
    let changed = conn
        .execute(
            "UPDATE dentists SET name = ?1, license_number = ?2, active = ?3 WHERE id = ?4",
            params![dentist.name, dentist.license_number, dentist.active as i32, id],
        )
        .map_err(classify)?;
    if changed == 0 {
        return Ok(None);
    }
    Ok(Some(Dentist {
        id,
        ..dentist.clone()
    }))
}

/// Physically remove a dentist. Fails with `ConstraintViolation` while any
/// procedure or claim still references it.
pub fn delete_dentist(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let changed = conn
        .execute("DELETE FROM dentists WHERE id = ?1", params![id])
        .map_err(classify)?;
    Ok(changed > 0)
}
