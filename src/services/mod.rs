//! Entity lifecycles: transfer object in, validated entity stored, transfer
//! object out. Each service function runs against one borrowed connection;
//! callers hold the connection lock for the whole call, so read-modify-write
//! sequences (update, deactivate) cannot interleave.

pub mod claim;
pub mod dentist;
pub mod diagnosis;
pub mod patient;
pub mod procedure;

use thiserror::Error;

use crate::core_state::CoreError;
use crate::db::DatabaseError;
use crate::validation::FieldError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Dentist not found with id {0}")]
    DentistNotFound(i64),

    #[error("Patient not found with id {0}")]
    PatientNotFound(i64),

    #[error("Procedure not found with id {0}")]
    ProcedureNotFound(i64),

    #[error("Diagnosis not found with id {0}")]
    DiagnosisNotFound(i64),

    #[error("Claim not found with id {0}")]
    ClaimNotFound(i64),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(DatabaseError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::ConstraintViolation(detail) => ServiceError::Conflict(detail),
            other => ServiceError::Database(other),
        }
    }
}

impl From<Vec<FieldError>> for ServiceError {
    fn from(errors: Vec<FieldError>) -> Self {
        ServiceError::Validation(errors)
    }
}

/// Reference date for "not in the future" checks.
pub(crate) fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Shared builders for service tests.

    use chrono::NaiveDate;
    use rusqlite::Connection;

    use super::*;
    use crate::db::open_memory_database;
    use crate::models::*;

    pub fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn dentist_dto(name: &str, license: &str) -> DentistDto {
        DentistDto {
            name: name.into(),
            license_number: license.into(),
            ..Default::default()
        }
    }

    pub fn patient_dto(name: &str, cpf: &str, age: i32, plan: Option<&str>) -> PatientDto {
        PatientDto {
            name: name.into(),
            cpf: cpf.into(),
            age: Some(age),
            dental_plan: plan.map(String::from),
            ..Default::default()
        }
    }

    pub fn procedure_dto(kind: &str, patient_id: i64, dentist_id: i64, fraud: bool) -> ProcedureDto {
        ProcedureDto {
            procedure_type: kind.into(),
            date: Some(date(2024, 1, 10)),
            cost: Some(150.0),
            fraud_risk: fraud,
            patient_id: Some(patient_id),
            dentist_id: Some(dentist_id),
            ..Default::default()
        }
    }

    /// Creates one dentist and one patient; returns `(dentist_id, patient_id)`.
    pub fn seed_people(conn: &Connection) -> (i64, i64) {
        let d = dentist::create(conn, dentist_dto("Dr. Silva", "CRO12345")).unwrap();
        let p = patient::create(conn, patient_dto("Ana", "111.111.111-11", 30, None)).unwrap();
        (d.id.unwrap(), p.id.unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_violation_maps_to_conflict() {
        let err: ServiceError = DatabaseError::ConstraintViolation("UNIQUE".into()).into();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[test]
    fn not_found_message_embeds_id() {
        assert_eq!(
            ServiceError::PatientNotFound(7).to_string(),
            "Patient not found with id 7"
        );
    }
}
