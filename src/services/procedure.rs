use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Deserialize;

use super::{claim, dentist, patient, today, ServiceError};
use crate::db::repository as repo;
use crate::models::{Procedure, ProcedureDto};
use crate::validation::{self, Mode};

/// Optional listing filters. All given filters must match.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProcedureQuery {
    #[serde(rename = "tipo")]
    pub procedure_type: Option<String>,
    /// Performed strictly before this date.
    #[serde(rename = "antesDe")]
    pub before: Option<NaiveDate>,
    /// Cost strictly greater than this amount.
    #[serde(rename = "custoAcimaDe")]
    pub cost_above: Option<f64>,
}

impl ProcedureQuery {
    fn matches(&self, p: &Procedure) -> bool {
        self.procedure_type
            .as_ref()
            .map_or(true, |t| &p.procedure_type == t)
            && self.before.map_or(true, |d| p.date < d)
            && self.cost_above.map_or(true, |c| p.cost > c)
    }
}

pub fn resolve(conn: &Connection, id: i64) -> Result<Procedure, ServiceError> {
    repo::get_procedure(conn, id)?.ok_or(ServiceError::ProcedureNotFound(id))
}

pub fn create(conn: &Connection, dto: ProcedureDto) -> Result<ProcedureDto, ServiceError> {
    validation::validate_procedure(&dto, Mode::Create, today())?;
    let patient_id = patient::resolve(conn, dto.patient_id.unwrap_or_default())?.id;
    let dentist_id = dentist::resolve(conn, dto.dentist_id.unwrap_or_default())?.id;
    if let Some(claim_id) = dto.claim_id {
        claim::resolve(conn, claim_id)?;
    }

    let saved = repo::insert_procedure(conn, &Procedure {
        id: 0,
        procedure_type: dto.procedure_type.trim().to_string(),
        date: dto.date.unwrap_or_default(),
        cost: dto.cost.unwrap_or_default(),
        fraud_risk: dto.fraud_risk,
        patient_id,
        dentist_id,
        claim_id: dto.claim_id,
    })?;
    tracing::info!(procedure_id = saved.id, fraud_risk = saved.fraud_risk, "Procedure created");
    Ok(ProcedureDto::from(&saved))
}

pub fn list(conn: &Connection, query: &ProcedureQuery) -> Result<Vec<ProcedureDto>, ServiceError> {
    let candidates = if let Some(kind) = &query.procedure_type {
        repo::get_procedures_by_type(conn, kind)?
    } else if let Some(before) = query.before {
        repo::get_procedures_before(conn, before)?
    } else if let Some(cost) = query.cost_above {
        repo::get_procedures_costing_more_than(conn, cost)?
    } else {
        repo::get_all_procedures(conn)?
    };

    Ok(candidates
        .iter()
        .filter(|p| query.matches(p))
        .map(ProcedureDto::from)
        .collect())
}

/// Procedures flagged for manual review, in insertion order.
pub fn list_fraud_risk(conn: &Connection) -> Result<Vec<ProcedureDto>, ServiceError> {
    Ok(repo::get_fraud_risk_procedures(conn)?
        .iter()
        .map(ProcedureDto::from)
        .collect())
}

pub fn get_by_id(conn: &Connection, id: i64) -> Result<ProcedureDto, ServiceError> {
    resolve(conn, id).map(|p| ProcedureDto::from(&p))
}

/// Full-field replace. Patient and dentist ids present in `dto` are
/// re-resolved and absent ones keep their current value. The claim link is
/// optional, so an absent `sinistroId` clears it.
pub fn update(conn: &Connection, id: i64, dto: ProcedureDto) -> Result<ProcedureDto, ServiceError> {
    validation::validate_procedure(&dto, Mode::Update, today())?;
    let current = resolve(conn, id)?;

    let patient_id = match dto.patient_id {
        Some(pid) => patient::resolve(conn, pid)?.id,
        None => current.patient_id,
    };
    let dentist_id = match dto.dentist_id {
        Some(did) => dentist::resolve(conn, did)?.id,
        None => current.dentist_id,
    };
    let claim_id = dto
        .claim_id
        .map(|cid| claim::resolve(conn, cid).map(|c| c.id))
        .transpose()?;

    let updated = repo::replace_procedure(conn, id, &Procedure {
        id,
        procedure_type: dto.procedure_type.trim().to_string(),
        date: dto.date.unwrap_or(current.date),
        cost: dto.cost.unwrap_or(current.cost),
        fraud_risk: dto.fraud_risk,
        patient_id,
        dentist_id,
        claim_id,
    })?
    .ok_or(ServiceError::ProcedureNotFound(id))?;
    tracing::info!(procedure_id = id, fraud_risk = updated.fraud_risk, "Procedure updated");
    Ok(ProcedureDto::from(&updated))
}

/// Hard delete. Refused while a claim still references the procedure.
pub fn delete(conn: &Connection, id: i64) -> Result<(), ServiceError> {
    resolve(conn, id)?;
    let claims = repo::count_claims_for_procedure(conn, id)?;
    if claims > 0 {
        return Err(ServiceError::Conflict(format!(
            "procedure {id} is referenced by {claims} claim(s)"
        )));
    }
    repo::delete_procedure(conn, id)?;
    tracing::info!(procedure_id = id, "Procedure deleted");
    Ok(())
}
