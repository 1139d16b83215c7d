use rusqlite::Connection;

use super::{dentist, patient, procedure, ServiceError};
use crate::db::repository as repo;
use crate::models::{Claim, ClaimDto};
use crate::validation::{self, Mode};

pub fn resolve(conn: &Connection, id: i64) -> Result<Claim, ServiceError> {
    repo::get_claim(conn, id)?.ok_or(ServiceError::ClaimNotFound(id))
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

pub fn create(conn: &Connection, dto: ClaimDto) -> Result<ClaimDto, ServiceError> {
    validation::validate_claim(&dto, Mode::Create)?;
    let procedure_id = procedure::resolve(conn, dto.procedure_id.unwrap_or_default())?.id;
    let dentist_id = dentist::resolve(conn, dto.dentist_id.unwrap_or_default())?.id;
    let patient_id = patient::resolve(conn, dto.patient_id.unwrap_or_default())?.id;

    let saved = repo::insert_claim(conn, &Claim {
        id: 0,
        claim_type: dto.claim_type.trim().to_string(),
        description: normalize_description(dto.description),
        date: dto.date.unwrap_or_default(),
        fraud_risk: dto.fraud_risk,
        procedure_id,
        dentist_id,
        patient_id,
    })?;
    tracing::info!(claim_id = saved.id, fraud_risk = saved.fraud_risk, "Claim created");
    Ok(ClaimDto::from(&saved))
}

pub fn list_all(conn: &Connection) -> Result<Vec<ClaimDto>, ServiceError> {
    Ok(repo::get_all_claims(conn)?.iter().map(ClaimDto::from).collect())
}

pub fn list_fraud_risk(conn: &Connection) -> Result<Vec<ClaimDto>, ServiceError> {
    Ok(repo::get_fraud_risk_claims(conn)?
        .iter()
        .map(ClaimDto::from)
        .collect())
}

pub fn get_by_id(conn: &Connection, id: i64) -> Result<ClaimDto, ServiceError> {
    resolve(conn, id).map(|c| ClaimDto::from(&c))
}

pub fn update(conn: &Connection, id: i64, dto: ClaimDto) -> Result<ClaimDto, ServiceError> {
    validation::validate_claim(&dto, Mode::Update)?;
    let current = resolve(conn, id)?;

    let procedure_id = match dto.procedure_id {
        Some(pid) => procedure::resolve(conn, pid)?.id,
        None => current.procedure_id,
    };
    let dentist_id = match dto.dentist_id {
        Some(did) => dentist::resolve(conn, did)?.id,
        None => current.dentist_id,
    };
    let patient_id = match dto.patient_id {
        Some(pid) => patient::resolve(conn, pid)?.id,
        None => current.patient_id,
    };

    let updated = repo::replace_claim(conn, id, &Claim {
        id,
        claim_type: dto.claim_type.trim().to_string(),
        description: normalize_description(dto.description),
        date: dto.date.unwrap_or(current.date),
        fraud_risk: dto.fraud_risk,
        procedure_id,
        dentist_id,
        patient_id,
    })?
    .ok_or(ServiceError::ClaimNotFound(id))?;
    tracing::info!(claim_id = id, fraud_risk = updated.fraud_risk, "Claim updated");
    Ok(ClaimDto::from(&updated))
}

/// Hard delete. Refused while a procedure still links to the claim.
pub fn delete(conn: &Connection, id: i64) -> Result<(), ServiceError> {
    resolve(conn, id)?;
    let linked = repo::count_procedures_for_claim(conn, id)?;
    if linked > 0 {
        return Err(ServiceError::Conflict(format!(
            "claim {id} is linked to {linked} procedure(s)"
        )));
    }
    repo::delete_claim(conn, id)?;
    tracing::info!(claim_id = id, "Claim deleted");
    Ok(())
}
