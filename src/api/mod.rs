pub mod auth;
pub mod invoices;
pub mod ocr;
pub mod suppliers;

use crate::middleware::require_auth;
use crate::service::{AuthService, InvoiceService, OcrService, SupplierService};
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

/// Shared state: one service object per concern, owned by the
/// composition root in `main`.
#[derive(Clone)]
pub struct AppState {
    pub suppliers: Arc<SupplierService>,
    pub invoices: Arc<InvoiceService>,
    pub ocr: Arc<OcrService>,
    pub auth: Arc<AuthService>,
}

/// Health check
pub async fn health_check() -> &'static str {
    "OK"
}

/// Build the full route table.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health_check))
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login));

    let protected = Router::new()
        .route("/auth/profile", get(auth::profile))
        .route("/auth/logout", post(auth::logout))
        .route("/api/suppliers", get(suppliers::list).post(suppliers::create))
        .route(
            "/api/suppliers/:id",
            get(suppliers::get_one)
                .put(suppliers::update)
                .delete(suppliers::delete),
        )
        .route("/api/invoices", get(invoices::list).post(invoices::create))
        .route(
            "/api/invoices/:id",
            get(invoices::get_one)
                .put(invoices::update)
                .delete(invoices::delete),
        )
        .route("/api/invoices/:id/pay", put(invoices::mark_as_paid))
        .route("/api/invoices/process-image", post(ocr::process_image))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public.merge(protected).with_state(state)
}
