use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::PatientDto;
use crate::services::patient::{self, PatientQuery};

/// `POST /pacientes`
pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<PatientDto>, JsonRejection>,
) -> Result<(StatusCode, Json<PatientDto>), ApiError> {
    let Json(dto) = payload?;
    let created = ctx.core.write_patients(|conn| patient::create(conn, dto))?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /pacientes`: cached listing of active patients.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<PatientDto>>, ApiError> {
    let listing = ctx.core.list_active_patients()?;
    Ok(Json(listing.as_ref().clone()))
}

/// `GET /pacientes/busca?nome=&plano=&idadeMinima=`
pub async fn search(
    State(ctx): State<ApiContext>,
    query: Result<Query<PatientQuery>, QueryRejection>,
) -> Result<Json<Vec<PatientDto>>, ApiError> {
    let Query(query) = query?;
    Ok(Json(ctx.core.with_db(|conn| patient::search(conn, &query))?))
}

/// `GET /pacientes/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<PatientDto>, ApiError> {
    let Path(id) = id?;
    Ok(Json(ctx.core.with_db(|conn| patient::get_by_id(conn, id))?))
}

/// `PUT /pacientes/:id`
pub async fn update(
    State(ctx): State<ApiContext>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<PatientDto>, JsonRejection>,
) -> Result<Json<PatientDto>, ApiError> {
    let Path(id) = id?;
    let Json(dto) = payload?;
    Ok(Json(ctx.core.write_patients(|conn| patient::update(conn, id, dto))?))
}

/// `DELETE /pacientes/:id`: soft delete.
pub async fn deactivate(
    State(ctx): State<ApiContext>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    ctx.core.write_patients(|conn| patient::deactivate(conn, id))?;
    Ok(StatusCode::NO_CONTENT)
}
