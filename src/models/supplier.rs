use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Supplier master record. `cuit` is stored canonical (`XX-XXXXXXXX-X`)
/// and checksum-valid whenever present.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub cuit: Option<String>,
    /// Bank account reference (CBU).
    pub cbu: Option<String>,
    /// Payment term in days.
    pub payment_term: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSupplier {
    pub name: String,
    pub cuit: Option<String>,
    pub cbu: Option<String>,
    #[serde(default)]
    pub payment_term: i32,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSupplier {
    pub name: Option<String>,
    pub cuit: Option<String>,
    pub cbu: Option<String>,
    pub payment_term: Option<i32>,
}
