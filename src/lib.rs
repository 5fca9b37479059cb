pub mod api;
pub mod config;
pub mod cuit;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod ocr;
pub mod service;

pub use config::AppConfig;
pub use db::create_pool;
pub use error::{AppError, Result};
pub use service::{AuthService, InvoiceService, OcrService, SupplierService};
