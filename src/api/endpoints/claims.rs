use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::ClaimDto;
use crate::services::claim;

/// `POST /sinistros`
pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<ClaimDto>, JsonRejection>,
) -> Result<(StatusCode, Json<ClaimDto>), ApiError> {
    let Json(dto) = payload?;
    let created = ctx.core.with_db(|conn| claim::create(conn, dto))?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /sinistros`
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<ClaimDto>>, ApiError> {
    Ok(Json(ctx.core.with_db(claim::list_all)?))
}

/// `GET /sinistros/suspeitas-fraude`
pub async fn fraud_risk(State(ctx): State<ApiContext>) -> Result<Json<Vec<ClaimDto>>, ApiError> {
    Ok(Json(ctx.core.with_db(claim::list_fraud_risk)?))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ClaimDto>, ApiError> {
    let Path(id) = id?;
    Ok(Json(ctx.core.with_db(|conn| claim::get_by_id(conn, id))?))
}

pub async fn update(
    State(ctx): State<ApiContext>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ClaimDto>, JsonRejection>,
) -> Result<Json<ClaimDto>, ApiError> {
    let Path(id) = id?;
    let Json(dto) = payload?;
    Ok(Json(ctx.core.with_db(|conn| claim::update(conn, id, dto))?))
}

pub async fn delete(
    State(ctx): State<ApiContext>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    ctx.core.with_db(|conn| claim::delete(conn, id))?;
    Ok(StatusCode::NO_CONTENT)
}
