use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::ProcedureDto;
use crate::services::procedure::{self, ProcedureQuery};

/// `POST /procedimentos`
pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<ProcedureDto>, JsonRejection>,
) -> Result<(StatusCode, Json<ProcedureDto>), ApiError> {
    let Json(dto) = payload?;
    let created = ctx.core.with_db(|conn| procedure::create(conn, dto))?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /procedimentos[?tipo=&antesDe=&custoAcimaDe=]`
pub async fn list(
    State(ctx): State<ApiContext>,
    query: Result<Query<ProcedureQuery>, QueryRejection>,
) -> Result<Json<Vec<ProcedureDto>>, ApiError> {
    let Query(query) = query?;
    Ok(Json(ctx.core.with_db(|conn| procedure::list(conn, &query))?))
}

/// `GET /procedimentos/suspeitas-fraude`
pub async fn fraud_risk(State(ctx): State<ApiContext>) -> Result<Json<Vec<ProcedureDto>>, ApiError> {
    Ok(Json(ctx.core.with_db(procedure::list_fraud_risk)?))
}

/// `GET /procedimentos/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ProcedureDto>, ApiError> {
    let Path(id) = id?;
    Ok(Json(ctx.core.with_db(|conn| procedure::get_by_id(conn, id))?))
}

/// `PUT /procedimentos/:id`
pub async fn update(
    State(ctx): State<ApiContext>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ProcedureDto>, JsonRejection>,
) -> Result<Json<ProcedureDto>, ApiError> {
    let Path(id) = id?;
    let Json(dto) = payload?;
    Ok(Json(ctx.core.with_db(|conn| procedure::update(conn, id, dto))?))
}

/// `DELETE /procedimentos/:id`
pub async fn delete(
    State(ctx): State<ApiContext>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    ctx.core.with_db(|conn| procedure::delete(conn, id))?;
    Ok(StatusCode::NO_CONTENT)
}
