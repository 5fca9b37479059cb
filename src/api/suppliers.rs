use crate::api::AppState;
use crate::error::Result;
use crate::models::{CreateSupplier, Supplier, UpdateSupplier};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<CreateSupplier>,
) -> Result<(StatusCode, Json<Supplier>)> {
    let supplier = state.suppliers.create(dto).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Supplier>>> {
    Ok(Json(state.suppliers.list().await?))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Supplier>> {
    Ok(Json(state.suppliers.get(id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(dto): Json<UpdateSupplier>,
) -> Result<Json<Supplier>> {
    Ok(Json(state.suppliers.update(id, dto).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    state.suppliers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
