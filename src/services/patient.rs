use rusqlite::Connection;
use serde::Deserialize;

use super::ServiceError;
use crate::db::repository as repo;
use crate::models::{Patient, PatientDto};
use crate::validation::{self, Mode};

/// Optional filters for patient search. All given filters must match.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PatientQuery {
    #[serde(rename = "nome")]
    pub name: Option<String>,
    #[serde(rename = "plano")]
    pub plan: Option<String>,
    /// Inclusive lower bound on age.
    #[serde(rename = "idadeMinima")]
    pub min_age: Option<i32>,
}

/// Look a patient up regardless of its active flag (foreign-key resolution).
pub fn resolve(conn: &Connection, id: i64) -> Result<Patient, ServiceError> {
    repo::get_patient(conn, id)?.ok_or(ServiceError::PatientNotFound(id))
}

fn find_active(conn: &Connection, id: i64) -> Result<Patient, ServiceError> {
    match repo::get_patient(conn, id)? {
        Some(p) if p.active => Ok(p),
        _ => Err(ServiceError::PatientNotFound(id)),
    }
}

fn normalize_plan(plan: Option<String>) -> Option<String> {
    plan.map(|p| p.trim().to_string())
}

pub fn create(conn: &Connection, dto: PatientDto) -> Result<PatientDto, ServiceError> {
    validation::validate_patient(&dto, Mode::Create)?;
    let cpf = dto.cpf.trim().to_string();
    if repo::get_patient_by_cpf(conn, &cpf)?.is_some() {
        return Err(ServiceError::Conflict(format!("cpf {cpf} is already registered")));
    }

    let saved = repo::insert_patient(conn, &Patient {
        id: 0,
        name: dto.name.trim().to_string(),
        cpf,
        age: dto.age.unwrap_or_default(),
        dental_plan: normalize_plan(dto.dental_plan),
        active: true,
    })?;
    tracing::info!(patient_id = saved.id, "Patient created");
    Ok(PatientDto::from(&saved))
}

pub fn list_active(conn: &Connection) -> Result<Vec<PatientDto>, ServiceError> {
    Ok(repo::get_active_patients(conn)?
        .iter()
        .map(PatientDto::from)
        .collect())
}

/// Active patients matching every filter in `query`, in insertion order.
pub fn search(conn: &Connection, query: &PatientQuery) -> Result<Vec<PatientDto>, ServiceError> {
    let candidates = if let Some(name) = &query.name {
        repo::get_patients_by_name_containing(conn, name)?
    } else if let Some(plan) = &query.plan {
        repo::get_patients_by_plan(conn, plan)?
    } else if let Some(min_age) = query.min_age {
        repo::get_patients_older_than(conn, min_age.saturating_sub(1))?
    } else {
        repo::get_active_patients(conn)?
    };

    Ok(candidates
        .iter()
        .filter(|p| p.active)
        .filter(|p| query.plan.is_none() || p.dental_plan == query.plan)
        .filter(|p| query.min_age.map_or(true, |min| p.age >= min))
        .map(PatientDto::from)
        .collect())
}

/// Inactive patients are reported as not found.
pub fn get_by_id(conn: &Connection, id: i64) -> Result<PatientDto, ServiceError> {
    find_active(conn, id).map(|p| PatientDto::from(&p))
}

/// Overwrite name, age and plan. CPF, identifier and active flag are kept.
pub fn update(conn: &Connection, id: i64, dto: PatientDto) -> Result<PatientDto, ServiceError> {
    validation::validate_patient(&dto, Mode::Update)?;
    let current = find_active(conn, id)?;

    let updated = repo::replace_patient(conn, id, &Patient {
        name: dto.name.trim().to_string(),
        age: dto.age.unwrap_or(current.age),
        dental_plan: normalize_plan(dto.dental_plan),
        ..current
    })?
    .ok_or(ServiceError::PatientNotFound(id))?;
    tracing::info!(patient_id = id, "Patient updated");
    Ok(PatientDto::from(&updated))
}

/// Soft delete. The only removal path for patients.
pub fn deactivate(conn: &Connection, id: i64) -> Result<(), ServiceError> {
    let current = resolve(conn, id)?;
    repo::replace_patient(conn, id, &Patient {
        active: false,
        ..current
    })?
    .ok_or(ServiceError::PatientNotFound(id))?;
    tracing::info!(patient_id = id, "Patient deactivated");
    Ok(())
}
