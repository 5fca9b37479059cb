pub mod auth;
pub mod invoice;
pub mod ocr;
pub mod supplier;

pub use auth::{AuthService, Claims, LoginResponse};
pub use invoice::InvoiceService;
pub use ocr::{OcrOutcome, OcrService};
pub use supplier::SupplierService;
