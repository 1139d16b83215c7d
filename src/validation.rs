//! Field-level validation of inbound transfer objects.
//!
//! Every rule failure is collected rather than returned early, so a client
//! gets the complete list of offending fields in a single 400 response.
//! Field names are reported with their wire (JSON) spelling.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use crate::models::{ClaimDto, DentistDto, DiagnosisDto, PatientDto, ProcedureDto};

static LICENSE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^CRO[0-9]{5}$").expect("static license pattern"));

static CPF_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{3}\.[0-9]{3}\.[0-9]{3}-[0-9]{2}$").expect("static CPF pattern"));

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Whether a payload creates a row or replaces an existing one.
///
/// Foreign keys are mandatory on create; on update an absent key keeps
/// the current reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Update,
}

#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    fn reject(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Non-blank text whose trimmed length (in characters) is within bounds.
    pub fn text(&mut self, field: &'static str, value: &str, min: usize, max: usize) {
        let len = value.trim().chars().count();
        if len == 0 {
            self.reject(field, format!("{field} is required"));
        } else if len < min || len > max {
            self.reject(
                field,
                format!("{field} must be between {min} and {max} characters"),
            );
        }
    }

    pub fn not_blank(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.reject(field, format!("{field} is required"));
        }
    }

    pub fn pattern(&mut self, field: &'static str, value: &str, re: &Regex, example: &str) {
        if value.trim().is_empty() {
            self.reject(field, format!("{field} is required"));
        } else if !re.is_match(value) {
            self.reject(field, format!("{field} must follow the format {example}"));
        }
    }

    pub fn required<T>(&mut self, field: &'static str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.reject(field, format!("{field} is required"));
        }
        value
    }

    /// A required date that is not in the future.
    pub fn past_or_present(&mut self, field: &'static str, value: Option<NaiveDate>, today: NaiveDate) {
        if let Some(date) = self.required(field, value) {
            if date > today {
                self.reject(field, format!("{field} must not be in the future"));
            }
        }
    }

    pub fn id(&mut self, field: &'static str, value: Option<i64>, mode: Mode) {
        match value {
            None if mode == Mode::Create => self.reject(field, format!("{field} is required")),
            Some(id) if id <= 0 => self.reject(field, format!("{field} must be a positive id")),
            _ => {}
        }
    }

    pub fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

pub fn validate_dentist(dto: &DentistDto) -> Result<(), Vec<FieldError>> {
    let mut v = Validator::new();
    v.text("nome", &dto.name, 3, 100);
    v.pattern("numeroLicenca", &dto.license_number, &LICENSE_PATTERN, "CRO12345");
    v.finish()
}

/// CPF is only checked on create: it cannot be changed afterwards.
pub fn validate_patient(dto: &PatientDto, mode: Mode) -> Result<(), Vec<FieldError>> {
    let mut v = Validator::new();
    v.text("nome", &dto.name, 2, 100);
    if mode == Mode::Create {
        v.pattern("cpf", &dto.cpf, &CPF_PATTERN, "###.###.###-##");
    }
    if let Some(age) = v.required("idade", dto.age) {
        if age < 0 {
            v.reject("idade", "idade must be greater than or equal to 0");
        }
    }
    if let Some(plan) = &dto.dental_plan {
        v.text("planoOdontologico", plan, 3, 50);
    }
    v.finish()
}

pub fn validate_procedure(
    dto: &ProcedureDto,
    mode: Mode,
    today: NaiveDate,
) -> Result<(), Vec<FieldError>> {
    let mut v = Validator::new();
    v.text("tipoProcedimento", &dto.procedure_type, 3, 100);
    v.past_or_present("dataProcedimento", dto.date, today);
    if let Some(cost) = v.required("custo", dto.cost) {
        if !(cost.is_finite() && cost > 0.0) {
            v.reject("custo", "custo must be greater than 0");
        }
    }
    v.id("pacienteId", dto.patient_id, mode);
    v.id("dentistaId", dto.dentist_id, mode);
    v.id("sinistroId", dto.claim_id, Mode::Update);
    v.finish()
}

pub fn validate_diagnosis(
    dto: &DiagnosisDto,
    mode: Mode,
    today: NaiveDate,
) -> Result<(), Vec<FieldError>> {
    let mut v = Validator::new();
    v.not_blank("tipoDiagnostico", &dto.diagnosis_type);
    v.past_or_present("dataDiagnostico", dto.date, today);
    v.not_blank("descricao", &dto.description);
    v.id("pacienteId", dto.patient_id, mode);
    v.finish()
}

pub fn validate_claim(dto: &ClaimDto, mode: Mode) -> Result<(), Vec<FieldError>> {
    let mut v = Validator::new();
    v.not_blank("tipoSinistro", &dto.claim_type);
    v.required("dataSinistro", dto.date);
    v.id("procedimentoId", dto.procedure_id, mode);
    v.id("dentistaId", dto.dentist_id, mode);
    v.id("pacienteId", dto.patient_id, mode);
    v.finish()
}
