use serde::{Deserialize, Serialize};

/// A dentist row. `active = false` means soft-deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dentist {
    pub id: i64,
    pub name: String,
    /// Professional license, `CRO` followed by five digits. Unique.
    pub license_number: String,
    pub active: bool,
}

/// Boundary shape of a dentist. `id` and `ativo` are output-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DentistDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(rename = "numeroLicenca", default)]
    pub license_number: String,
    #[serde(rename = "ativo", default)]
    pub active: Option<bool>,
}

impl From<&Dentist> for DentistDto {
    fn from(d: &Dentist) -> Self {
        Self {
            id: Some(d.id),
            name: d.name.clone(),
            license_number: d.license_number.clone(),
            active: Some(d.active),
        }
    }
}
