//! OCR workflow: one engine call, one parse, one supplier auto-match.

use crate::config::OcrConfig;
use crate::error::{AppError, Result};
use crate::models::Supplier;
use crate::ocr::{self, OcrDraft, ParseOptions, PromptLanguage, VisionEngine};
use crate::service::SupplierService;
use serde::Serialize;
use std::sync::Arc;

/// Draft plus the supplier it auto-matched to, if any.
#[derive(Debug, Serialize)]
pub struct OcrOutcome {
    #[serde(flatten)]
    pub draft: OcrDraft,
    pub matched_supplier: Option<Supplier>,
}

pub struct OcrService {
    engine: Arc<dyn VisionEngine>,
    config: OcrConfig,
}

impl OcrService {
    pub fn new(engine: Arc<dyn VisionEngine>, config: OcrConfig) -> Self {
        Self { engine, config }
    }

    /// Run one photographed invoice through the vision model and parser.
    ///
    /// The caller may retry on upstream failure; nothing is retried here.
    pub async fn process_image(
        &self,
        suppliers: &SupplierService,
        image_jpeg: &[u8],
        supplier_id_hint: Option<i64>,
        confidence_threshold: Option<f64>,
    ) -> Result<OcrOutcome> {
        if image_jpeg.is_empty() {
            return Err(AppError::Validation("image payload is empty".into()));
        }

        let language = PromptLanguage::from_code(&self.config.prompt_language);
        let prompt = ocr::prompt::extraction_prompt(language);

        let raw = self
            .engine
            .extract(image_jpeg, &prompt, self.config.temperature)
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        let options = ParseOptions {
            confidence_threshold: confidence_threshold
                .unwrap_or(self.config.confidence_threshold),
            supplier_id_hint,
        };

        let mut draft = ocr::parse(&raw, &options)?;

        // A checksum-valid CUIT gates auto-matching; a valid CUIT with no
        // supplier on file still sends the client back to manual selection.
        let matched_supplier = match (&draft.supplier_cuit, supplier_id_hint) {
            (Some(cuit), None) => suppliers.find_by_cuit(cuit).await?,
            _ => None,
        };

        if supplier_id_hint.is_none() && matched_supplier.is_none() {
            draft.requires_supplier_selection = true;
        }

        tracing::info!(
            confidence = draft.confidence,
            matched = matched_supplier.is_some(),
            keywords = draft.matched_keywords.len(),
            elapsed_ms = draft.elapsed_ms,
            "processed invoice image"
        );

        Ok(OcrOutcome {
            draft,
            matched_supplier,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, OcrEngineKind};
    use crate::ocr::{EngineError, MockVisionEngine};
    use async_trait::async_trait;

    struct FailingEngine;

    #[async_trait]
    impl VisionEngine for FailingEngine {
        async fn extract(
            &self,
            _image: &[u8],
            _prompt: &str,
            _temperature: f32,
        ) -> std::result::Result<String, EngineError> {
            Err(EngineError::Api("boom".into()))
        }
    }

    fn service(engine: Arc<dyn VisionEngine>) -> OcrService {
        let mut config = AppConfig::default().ocr;
        config.engine = OcrEngineKind::Mock;
        OcrService::new(engine, config)
    }

    #[tokio::test]
    async fn empty_image_is_a_validation_error() {
        let svc = service(Arc::new(MockVisionEngine));
        // The supplier lookup is never reached, so a disconnected pool is
        // fine for this test.
        let pool = sqlx::postgres::PgPoolOptions::new().connect_lazy("postgres://localhost/none");
        let suppliers = SupplierService::new(pool.unwrap());
        let err = svc.process_image(&suppliers, b"", None, None).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn engine_failure_surfaces_as_upstream() {
        let svc = service(Arc::new(FailingEngine));
        let pool = sqlx::postgres::PgPoolOptions::new().connect_lazy("postgres://localhost/none");
        let suppliers = SupplierService::new(pool.unwrap());
        let err = svc
            .process_image(&suppliers, b"jpeg", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }
}
