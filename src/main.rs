use factura_backend::api::{self, AppState};
use factura_backend::{
    create_pool, ocr, AppConfig, AuthService, InvoiceService, OcrService, SupplierService,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    let config = AppConfig::from_env();
    info!("Starting server with config: {:?}", config);

    let pool = create_pool(&config.database.url).await?;
    info!("Database pool created");

    factura_backend::db::pool::run_migrations(&pool).await?;
    info!("Migrations applied");

    let engine = ocr::engine::from_config(&config.ocr)?;
    info!("OCR engine: {:?}", config.ocr.engine);

    let state = AppState {
        suppliers: Arc::new(SupplierService::new(pool.clone())),
        invoices: Arc::new(InvoiceService::new(pool.clone())),
        ocr: Arc::new(OcrService::new(engine, config.ocr.clone())),
        auth: Arc::new(AuthService::new(pool, &config.auth)),
    };

    let app = api::router(state).layer(ServiceBuilder::new());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /auth/signup | /auth/login          - authentication");
    info!("  CRUD /api/suppliers                      - suppliers");
    info!("  CRUD /api/invoices (+filters)            - invoices");
    info!("  PUT  /api/invoices/:id/pay               - payment workflow");
    info!("  POST /api/invoices/process-image         - OCR draft extraction");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
