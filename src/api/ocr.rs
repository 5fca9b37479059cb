use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::service::OcrOutcome;
use axum::{extract::State, Json};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ProcessImageRequest {
    /// Base64-encoded JPEG of the photographed invoice.
    pub image_base64: String,
    /// Preselected supplier; skips CUIT auto-matching.
    pub supplier_id: Option<i64>,
    /// Overrides the configured confidence gate (0-100).
    pub confidence_threshold: Option<f64>,
}

pub async fn process_image(
    State(state): State<AppState>,
    Json(req): Json<ProcessImageRequest>,
) -> Result<Json<OcrOutcome>> {
    if let Some(threshold) = req.confidence_threshold {
        if !(0.0..=100.0).contains(&threshold) {
            return Err(AppError::Validation(
                "confidence_threshold must be between 0 and 100".into(),
            ));
        }
    }

    let image = BASE64
        .decode(req.image_base64.as_bytes())
        .map_err(|_| AppError::Validation("image_base64 is not valid base64".into()))?;

    let outcome = state
        .ocr
        .process_image(
            &state.suppliers,
            &image,
            req.supplier_id,
            req.confidence_threshold,
        )
        .await?;

    Ok(Json(outcome))
}
