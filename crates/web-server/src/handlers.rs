use crate::{error::AppError, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use core_types::{parse_stock_id, MutationResponse, NewStock, Stock};
use std::sync::Arc;

/// # POST /api/stock
/// Inserts a stock and returns the id the database assigned.
pub async fn create_stock(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(stock), _): WithRejection<Json<NewStock>, AppError>,
) -> Result<(StatusCode, Json<MutationResponse>), AppError> {
    let id = state.store.create_stock(&stock).await?;
    Ok((StatusCode::CREATED, Json(MutationResponse::created(id))))
}

/// # GET /api/stock/:id
/// An unknown id answers 200 with the empty stock.
pub async fn get_stock(
    Path(raw_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Stock>, AppError> {
    let id = parse_stock_id(&raw_id)?;
    let stock = state.store.get_stock(id).await?;
    Ok(Json(stock))
}

/// # GET /api/stock
pub async fn get_all_stocks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Stock>>, AppError> {
    let stocks = state.store.get_all_stocks().await?;
    Ok(Json(stocks))
}

/// # PUT /api/stock/:id
/// Overwrites every field; the message carries the affected-count.
pub async fn update_stock(
    Path(raw_id): Path<String>,
    State(state): State<Arc<AppState>>,
    WithRejection(Json(stock), _): WithRejection<Json<NewStock>, AppError>,
) -> Result<Json<MutationResponse>, AppError> {
    let id = parse_stock_id(&raw_id)?;
    let rows_affected = state.store.update_stock(id, &stock).await?;
    Ok(Json(MutationResponse::updated(id, rows_affected)))
}

/// # DELETE /api/stock/:id
pub async fn delete_stock(
    Path(raw_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<MutationResponse>, AppError> {
    let id = parse_stock_id(&raw_id)?;
    let rows_affected = state.store.delete_stock(id).await?;
    Ok(Json(MutationResponse::deleted(id, rows_affected)))
}
