use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Deserialize;

use super::{patient, today, ServiceError};
use crate::db::repository as repo;
use crate::models::{Diagnosis, DiagnosisDto};
use crate::validation::{self, Mode};

#[derive(Debug, Default, Clone, Deserialize)]
pub struct DiagnosisQuery {
    /// Substring of the diagnosis type.
    #[serde(rename = "tipo")]
    pub diagnosis_type: Option<String>,
    /// Made strictly after this date.
    #[serde(rename = "aposData")]
    pub after: Option<NaiveDate>,
}

fn resolve(conn: &Connection, id: i64) -> Result<Diagnosis, ServiceError> {
    repo::get_diagnosis(conn, id)?.ok_or(ServiceError::DiagnosisNotFound(id))
}

pub fn create(conn: &Connection, dto: DiagnosisDto) -> Result<DiagnosisDto, ServiceError> {
    validation::validate_diagnosis(&dto, Mode::Create, today())?;
    let patient_id = patient::resolve(conn, dto.patient_id.unwrap_or_default())?.id;

    let saved = repo::insert_diagnosis(conn, &Diagnosis {
        id: 0,
        diagnosis_type: dto.diagnosis_type.trim().to_string(),
        date: dto.date.unwrap_or_default(),
        description: dto.description,
        patient_id,
    })?;
    tracing::info!(diagnosis_id = saved.id, patient_id, "Diagnosis created");
    Ok(DiagnosisDto::from(&saved))
}

pub fn list(conn: &Connection, query: &DiagnosisQuery) -> Result<Vec<DiagnosisDto>, ServiceError> {
    let candidates = match (&query.diagnosis_type, query.after) {
        (Some(fragment), _) => repo::get_diagnoses_by_type_containing(conn, fragment)?,
        (None, Some(after)) => repo::get_diagnoses_after(conn, after)?,
        (None, None) => repo::get_all_diagnoses(conn)?,
    };
    Ok(candidates
        .iter()
        .filter(|d| query.after.map_or(true, |after| d.date > after))
        .map(DiagnosisDto::from)
        .collect())
}

pub fn get_by_id(conn: &Connection, id: i64) -> Result<DiagnosisDto, ServiceError> {
    resolve(conn, id).map(|d| DiagnosisDto::from(&d))
}

pub fn update(conn: &Connection, id: i64, dto: DiagnosisDto) -> Result<DiagnosisDto, ServiceError> {
    validation::validate_diagnosis(&dto, Mode::Update, today())?;
    let current = resolve(conn, id)?;
    let patient_id = match dto.patient_id {
        Some(pid) => patient::resolve(conn, pid)?.id,
        None => current.patient_id,
    };

    let updated = repo::replace_diagnosis(conn, id, &Diagnosis {
        id,
        diagnosis_type: dto.diagnosis_type.trim().to_string(),
        date: dto.date.unwrap_or(current.date),
        description: dto.description,
        patient_id,
    })?
    .ok_or(ServiceError::DiagnosisNotFound(id))?;
    tracing::info!(diagnosis_id = id, "Diagnosis updated");
    Ok(DiagnosisDto::from(&updated))
}

pub fn delete(conn: &Connection, id: i64) -> Result<(), ServiceError> {
    if !repo::delete_diagnosis(conn, id)? {
        return Err(ServiceError::DiagnosisNotFound(id));
    }
    tracing::info!(diagnosis_id = id, "Diagnosis deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::*;

    fn diagnosis_dto(kind: &str, on: NaiveDate, patient_id: i64) -> DiagnosisDto {
        DiagnosisDto {
            diagnosis_type: kind.into(),
            date: Some(on),
            description: "Avaliação clínica".into(),
            patient_id: Some(patient_id),
            ..Default::default()
        }
    }

    #[test]
    fn create_requires_existing_patient() {
        let conn = test_db();
        let err = create(&conn, diagnosis_dto("Cárie", date(2024, 1, 5), 9)).unwrap_err();
        assert!(matches!(err, ServiceError::PatientNotFound(9)));
        assert!(repo::get_all_diagnoses(&conn).unwrap().is_empty());
    }

    #[test]
    fn future_date_is_a_validation_error() {
        let conn = test_db();
        let (_, patient_id) = seed_people(&conn);
        let tomorrow = today().succ_opt().unwrap();
        let err = create(&conn, diagnosis_dto("Cárie", tomorrow, patient_id)).unwrap_err();
        match err {
            ServiceError::Validation(fields) => assert_eq!(fields[0].field, "dataDiagnostico"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn create_update_delete_cycle() {
        let conn = test_db();
        let (_, patient_id) = seed_people(&conn);
        let created = create(&conn, diagnosis_dto("Cárie", date(2024, 1, 5), patient_id)).unwrap();
        let id = created.id.unwrap();

        let mut changed = created.clone();
        changed.description = "Molar superior".into();
        changed.patient_id = None;
        let updated = update(&conn, id, changed).unwrap();
        assert_eq!(updated.description, "Molar superior");
        assert_eq!(updated.patient_id, Some(patient_id));
        assert_eq!(get_by_id(&conn, id).unwrap(), updated);

        delete(&conn, id).unwrap();
        assert!(matches!(get_by_id(&conn, id), Err(ServiceError::DiagnosisNotFound(_))));
        assert!(matches!(delete(&conn, id), Err(ServiceError::DiagnosisNotFound(_))));
    }

    #[test]
    fn update_missing_is_not_found() {
        let conn = test_db();
        let (_, patient_id) = seed_people(&conn);
        let err = update(&conn, 12, diagnosis_dto("Cárie", date(2024, 1, 5), patient_id)).unwrap_err();
        assert!(matches!(err, ServiceError::DiagnosisNotFound(12)));
    }

    #[test]
    fn list_filters_by_type_and_date() {
        let conn = test_db();
        let (_, patient_id) = seed_people(&conn);
        create(&conn, diagnosis_dto("Cárie profunda", date(2024, 1, 5), patient_id)).unwrap();
        create(&conn, diagnosis_dto("Gengivite", date(2024, 3, 5), patient_id)).unwrap();

        assert_eq!(list(&conn, &DiagnosisQuery::default()).unwrap().len(), 2);
        let caries = list(&conn, &DiagnosisQuery {
            diagnosis_type: Some("Cárie".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(caries.len(), 1);

        let later_caries = list(&conn, &DiagnosisQuery {
            diagnosis_type: Some("Cárie".into()),
            after: Some(date(2024, 2, 1)),
        })
        .unwrap();
        assert!(later_caries.is_empty());
    }
}
