use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An insurance claim ("sinistro") raised against a procedure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: i64,
    pub claim_type: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub fraud_risk: bool,
    pub procedure_id: i64,
    pub dentist_id: i64,
    pub patient_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "tipoSinistro", default)]
    pub claim_type: String,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "dataSinistro", default)]
    pub date: Option<NaiveDate>,
    #[serde(rename = "riscoFraude", default)]
    pub fraud_risk: bool,
    #[serde(rename = "procedimentoId", default)]
    pub procedure_id: Option<i64>,
    #[serde(rename = "dentistaId", default)]
    pub dentist_id: Option<i64>,
    #[serde(rename = "pacienteId", default)]
    pub patient_id: Option<i64>,
}

impl From<&Claim> for ClaimDto {
    fn from(c: &Claim) -> Self {
        Self {
            id: Some(c.id),
            claim_type: c.claim_type.clone(),
            description: c.description.clone(),
            date: Some(c.date),
            fraud_risk: c.fraud_risk,
            procedure_id: Some(c.procedure_id),
            dentist_id: Some(c.dentist_id),
            patient_id: Some(c.patient_id),
        }
    }
}
