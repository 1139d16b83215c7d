use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Procedure {
    pub id: i64,
    pub procedure_type: String,
    pub date: NaiveDate,
    pub cost: f64,
    pub fraud_risk: bool,
    pub patient_id: i64,
    pub dentist_id: i64,
    pub claim_id: Option<i64>,
}

/// Boundary shape of a procedure with flattened foreign keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcedureDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "tipoProcedimento", default)]
    pub procedure_type: String,
    #[serde(rename = "dataProcedimento", default)]
    pub date: Option<NaiveDate>,
    #[serde(rename = "custo", default)]
    pub cost: Option<f64>,
    #[serde(rename = "riscoFraude", default)]
    pub fraud_risk: bool,
    #[serde(rename = "pacienteId", default)]
    pub patient_id: Option<i64>,
    #[serde(rename = "dentistaId", default)]
    pub dentist_id: Option<i64>,
    #[serde(rename = "sinistroId", default)]
    pub claim_id: Option<i64>,
}

impl From<&Procedure> for ProcedureDto {
    fn from(p: &Procedure) -> Self {
        Self {
            id: Some(p.id),
            procedure_type: p.procedure_type.clone(),
            date: Some(p.date),
            cost: Some(p.cost),
            fraud_risk: p.fraud_risk,
            patient_id: Some(p.patient_id),
            dentist_id: Some(p.dentist_id),
            claim_id: p.claim_id,
        }
    }
}
