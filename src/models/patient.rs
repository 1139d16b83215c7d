use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    /// National id, `###.###.###-##`. Unique and immutable after creation.
    pub cpf: String,
    pub age: i32,
    pub dental_plan: Option<String>,
    pub active: bool,
}

/// Boundary shape of a patient. `id` and `ativo` are output-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(default)]
    pub cpf: String,
    #[serde(rename = "idade", default)]
    pub age: Option<i32>,
    #[serde(rename = "planoOdontologico", default)]
    pub dental_plan: Option<String>,
    #[serde(rename = "ativo", default)]
    pub active: Option<bool>,
}

impl From<&Patient> for PatientDto {
    fn from(p: &Patient) -> Self {
        Self {
            id: Some(p.id),
            name: p.name.clone(),
            cpf: p.cpf.clone(),
            age: Some(p.age),
            dental_plan: p.dental_plan.clone(),
            active: Some(p.active),
        }
    }
}
