use rusqlite::Connection;

use super::ServiceError;
use crate::db::repository as repo;
use crate::models::{Dentist, DentistDto};
use crate::validation;

/// Look a dentist up regardless of its active flag. Used to resolve foreign
/// keys: deactivated dentists stay valid targets for historical records.
pub fn resolve(conn: &Connection, id: i64) -> Result<Dentist, ServiceError> {
    repo::get_dentist(conn, id)?.ok_or(ServiceError::DentistNotFound(id))
}

fn find_active(conn: &Connection, id: i64) -> Result<Dentist, ServiceError> {
    match repo::get_dentist(conn, id)? {
        Some(d) if d.active => Ok(d),
        _ => Err(ServiceError::DentistNotFound(id)),
    }
}

fn ensure_license_free(
    conn: &Connection,
    license_number: &str,
    owner: Option<i64>,
) -> Result<(), ServiceError> {
    match repo::get_dentist_by_license(conn, license_number)? {
        Some(existing) if Some(existing.id) != owner => Err(ServiceError::Conflict(format!(
            "numeroLicenca {license_number} is already registered"
        ))),
        _ => Ok(()),
    }
}

pub fn create(conn: &Connection, dto: DentistDto) -> Result<DentistDto, ServiceError> {
    validation::validate_dentist(&dto)?;
    let license_number = dto.license_number.trim().to_string();
    ensure_license_free(conn, &license_number, None)?;

    let saved = repo::insert_dentist(conn, &Dentist {
        id: 0,
        name: dto.name.trim().to_string(),
        license_number,
        active: true,
    })?;
    tracing::info!(dentist_id = saved.id, "Dentist created");
    Ok(DentistDto::from(&saved))
}

pub fn list_active(conn: &Connection) -> Result<Vec<DentistDto>, ServiceError> {
    Ok(repo::get_active_dentists(conn)?
        .iter()
        .map(DentistDto::from)
        .collect())
}

/// Active dentists whose name contains `fragment` (case-sensitive).
pub fn search(conn: &Connection, fragment: &str) -> Result<Vec<DentistDto>, ServiceError> {
    Ok(repo::get_dentists_by_name_containing(conn, fragment)?
        .iter()
        .filter(|d| d.active)
        .map(DentistDto::from)
        .collect())
}

/// Inactive dentists are reported as not found.
pub fn get_by_id(conn: &Connection, id: i64) -> Result<DentistDto, ServiceError> {
    find_active(conn, id).map(|d| DentistDto::from(&d))
}

/// Overwrite name and license. Identifier and active flag never come from input.
pub fn update(conn: &Connection, id: i64, dto: DentistDto) -> Result<DentistDto, ServiceError> {
    validation::validate_dentist(&dto)?;
    let current = find_active(conn, id)?;
    let license_number = dto.license_number.trim().to_string();
    ensure_license_free(conn, &license_number, Some(id))?;

    let updated = repo::replace_dentist(conn, id, &Dentist {
        name: dto.name.trim().to_string(),
        license_number,
        ..current
    })?
    .ok_or(ServiceError::DentistNotFound(id))?;
    tracing::info!(dentist_id = id, "Dentist updated");
    Ok(DentistDto::from(&updated))
}

/// Soft delete. Procedures and claims that reference the dentist are untouched.
pub fn deactivate(conn: &Connection, id: i64) -> Result<(), ServiceError> {
    set_active(conn, id, false)?;
    tracing::info!(dentist_id = id, "Dentist deactivated");
    Ok(())
}

pub fn reactivate(conn: &Connection, id: i64) -> Result<DentistDto, ServiceError> {
    let dentist = set_active(conn, id, true)?;
    tracing::info!(dentist_id = id, "Dentist reactivated");
    Ok(DentistDto::from(&dentist))
}

fn set_active(conn: &Connection, id: i64, active: bool) -> Result<Dentist, ServiceError> {
    let current = resolve(conn, id)?;
    repo::replace_dentist(conn, id, &Dentist { active, ..current })?
        .ok_or(ServiceError::DentistNotFound(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::*;

    #[test]
    fn create_assigns_id_and_marks_active() {
        let conn = test_db();
        let created = create(&conn, dentist_dto("Dr. Silva", "CRO12345")).unwrap();
        assert_eq!(created.id, Some(1));
        assert_eq!(created.active, Some(true));
        assert_eq!(created.license_number, "CRO12345");
    }

    #[test]
    fn create_rejects_invalid_payload() {
        let conn = test_db();
        let err = create(&conn, dentist_dto("Dr. Silva", "12345")).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref f) if f[0].field == "numeroLicenca"));
        assert!(repo::get_all_dentists(&conn).unwrap().is_empty());
    }

    #[test]
    fn duplicate_license_rejected() {
        let conn = test_db();
        create(&conn, dentist_dto("Dr. Silva", "CRO12345")).unwrap();
        let err = create(&conn, dentist_dto("Dra. Souza", "CRO12345")).unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[test]
    fn update_keeps_own_license() {
        let conn = test_db();
        let id = create(&conn, dentist_dto("Dr. Silva", "CRO12345")).unwrap().id.unwrap();
        let updated = update(&conn, id, dentist_dto("Dr. Silva Jr.", "CRO12345")).unwrap();
        assert_eq!(updated.id, Some(id));
        assert_eq!(updated.name, "Dr. Silva Jr.");
        assert_eq!(get_by_id(&conn, id).unwrap(), updated);
    }

    #[test]
    fn deactivate_hides_from_listing_and_lookup() {
        let conn = test_db();
        let id = create(&conn, dentist_dto("Dr. Silva", "CRO12345")).unwrap().id.unwrap();
        create(&conn, dentist_dto("Dra. Souza", "CRO54321")).unwrap();

        deactivate(&conn, id).unwrap();

        let names: Vec<String> = list_active(&conn).unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Dra. Souza"]);
        assert!(matches!(get_by_id(&conn, id), Err(ServiceError::DentistNotFound(i)) if i == id));
        assert!(matches!(
            update(&conn, id, dentist_dto("Dr. Silva", "CRO12345")),
            Err(ServiceError::DentistNotFound(_))
        ));
        // Still resolvable as a foreign-key target.
        assert!(!resolve(&conn, id).unwrap().active);
    }

    #[test]
    fn reactivate_restores_visibility() {
        let conn = test_db();
        let id = create(&conn, dentist_dto("Dr. Silva", "CRO12345")).unwrap().id.unwrap();
        deactivate(&conn, id).unwrap();
        let back = reactivate(&conn, id).unwrap();
        assert_eq!(back.active, Some(true));
        assert!(get_by_id(&conn, id).is_ok());
    }

    #[test]
    fn missing_dentist_signals_not_found() {
        let conn = test_db();
        assert!(matches!(deactivate(&conn, 9), Err(ServiceError::DentistNotFound(9))));
        assert!(matches!(reactivate(&conn, 9), Err(ServiceError::DentistNotFound(9))));
    }

    #[test]
    fn search_matches_active_names_only() {
        let conn = test_db();
        let id = create(&conn, dentist_dto("Dr. Silva", "CRO12345")).unwrap().id.unwrap();
        create(&conn, dentist_dto("Dra. Silvana", "CRO54321")).unwrap();
        deactivate(&conn, id).unwrap();
        let found = search(&conn, "Silva").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Dra. Silvana");
    }
}
