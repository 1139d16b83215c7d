use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::DentistDto;
use crate::services::dentist;

#[derive(Debug, Default, Deserialize)]
pub struct DentistQuery {
    pub nome: Option<String>,
}

/// `POST /dentistas`
pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<DentistDto>, JsonRejection>,
) -> Result<(StatusCode, Json<DentistDto>), ApiError> {
    let Json(dto) = payload?;
    let created = ctx.core.with_db(|conn| dentist::create(conn, dto))?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /dentistas[?nome=]`: active dentists, optionally by name fragment.
pub async fn list(
    State(ctx): State<ApiContext>,
    query: Result<Query<DentistQuery>, QueryRejection>,
) -> Result<Json<Vec<DentistDto>>, ApiError> {
    let Query(query) = query?;
    let dentists = ctx.core.with_db(|conn| match &query.nome {
        Some(name) => dentist::search(conn, name),
        None => dentist::list_active(conn),
    })?;
    Ok(Json(dentists))
}

/// `GET /dentistas/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DentistDto>, ApiError> {
    let Path(id) = id?;
    Ok(Json(ctx.core.with_db(|conn| dentist::get_by_id(conn, id))?))
}

/// `PUT /dentistas/:id`
pub async fn update(
    State(ctx): State<ApiContext>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<DentistDto>, JsonRejection>,
) -> Result<Json<DentistDto>, ApiError> {
    let Path(id) = id?;
    let Json(dto) = payload?;
    Ok(Json(ctx.core.with_db(|conn| dentist::update(conn, id, dto))?))
}

/// `DELETE /dentistas/:id`: soft delete.
pub async fn deactivate(
    State(ctx): State<ApiContext>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    ctx.core.with_db(|conn| dentist::deactivate(conn, id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /dentistas/:id/reativar`
pub async fn reactivate(
    State(ctx): State<ApiContext>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DentistDto>, ApiError> {
    let Path(id) = id?;
    Ok(Json(ctx.core.with_db(|conn| dentist::reactivate(conn, id))?))
}
