use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub id: i64,
    pub diagnosis_type: String,
    pub date: NaiveDate,
    pub description: String,
    pub patient_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "tipoDiagnostico", default)]
    pub diagnosis_type: String,
    #[serde(rename = "dataDiagnostico", default)]
    pub date: Option<NaiveDate>,
    #[serde(rename = "descricao", default)]
    pub description: String,
    #[serde(rename = "pacienteId", default)]
    pub patient_id: Option<i64>,
}

impl From<&Diagnosis> for DiagnosisDto {
    fn from(d: &Diagnosis) -> Self {
        Self {
            id: Some(d.id),
            diagnosis_type: d.diagnosis_type.clone(),
            date: Some(d.date),
            description: d.description.clone(),
            patient_id: Some(d.patient_id),
        }
    }
}
