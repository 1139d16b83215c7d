use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::DiagnosisDto;
use crate::services::diagnosis::{self, DiagnosisQuery};

/// `POST /diagnosticos`
pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<DiagnosisDto>, JsonRejection>,
) -> Result<(StatusCode, Json<DiagnosisDto>), ApiError> {
    let Json(dto) = payload?;
    let created = ctx.core.with_db(|conn| diagnosis::create(conn, dto))?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /diagnosticos[?tipo=&aposData=]`
pub async fn list(
    State(ctx): State<ApiContext>,
    query: Result<Query<DiagnosisQuery>, QueryRejection>,
) -> Result<Json<Vec<DiagnosisDto>>, ApiError> {
    let Query(query) = query?;
    Ok(Json(ctx.core.with_db(|conn| diagnosis::list(conn, &query))?))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DiagnosisDto>, ApiError> {
    let Path(id) = id?;
    Ok(Json(ctx.core.with_db(|conn| diagnosis::get_by_id(conn, id))?))
}

pub async fn update(
    State(ctx): State<ApiContext>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<DiagnosisDto>, JsonRejection>,
) -> Result<Json<DiagnosisDto>, ApiError> {
    let Path(id) = id?;
    let Json(dto) = payload?;
    Ok(Json(ctx.core.with_db(|conn| diagnosis::update(conn, id, dto))?))
}

pub async fn delete(
    State(ctx): State<ApiContext>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    ctx.core.with_db(|conn| diagnosis::delete(conn, id))?;
    Ok(StatusCode::NO_CONTENT)
}
