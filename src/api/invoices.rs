use crate::api::AppState;
use crate::error::Result;
use crate::models::{
    CreateInvoice, Invoice, InvoiceFilter, InvoiceWithSupplier, Paginated, UpdateInvoice,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<CreateInvoice>,
) -> Result<(StatusCode, Json<Invoice>)> {
    let invoice = state.invoices.create(dto).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<InvoiceFilter>,
) -> Result<Json<Paginated<InvoiceWithSupplier>>> {
    Ok(Json(state.invoices.list(filter).await?))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<InvoiceWithSupplier>> {
    Ok(Json(state.invoices.get(id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(dto): Json<UpdateInvoice>,
) -> Result<Json<Invoice>> {
    Ok(Json(state.invoices.update(id, dto).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    state.invoices.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct MarkAsPaidRequest {
    pub date: NaiveDate,
}

pub async fn mark_as_paid(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<MarkAsPaidRequest>,
) -> Result<Json<Invoice>> {
    Ok(Json(state.invoices.mark_as_paid(id, req.date).await?))
}
