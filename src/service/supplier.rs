use crate::cuit;
use crate::db::suppliers;
use crate::error::{AppError, Result};
use crate::models::{CreateSupplier, Supplier, UpdateSupplier};
use sqlx::PgPool;

/// Supplier CRUD with CUIT canonicalization and uniqueness enforcement.
pub struct SupplierService {
    pool: PgPool,
}

impl SupplierService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, mut dto: CreateSupplier) -> Result<Supplier> {
        if dto.name.trim().is_empty() {
            return Err(AppError::Validation("supplier name must not be empty".into()));
        }
        if dto.payment_term < 0 {
            return Err(AppError::Validation("payment_term must not be negative".into()));
        }
        dto.cuit = canonicalize_cuit(dto.cuit)?;

        suppliers::insert(&self.pool, &dto)
            .await
            .map_err(map_unique_violation)
    }

    pub async fn list(&self) -> Result<Vec<Supplier>> {
        Ok(suppliers::list(&self.pool).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Supplier> {
        suppliers::get(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound {
                entity: "supplier",
                id,
            })
    }

    pub async fn update(&self, id: i64, mut dto: UpdateSupplier) -> Result<Supplier> {
        if let Some(name) = &dto.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("supplier name must not be empty".into()));
            }
        }
        if matches!(dto.payment_term, Some(term) if term < 0) {
            return Err(AppError::Validation("payment_term must not be negative".into()));
        }
        dto.cuit = canonicalize_cuit(dto.cuit)?;

        suppliers::update(&self.pool, id, &dto)
            .await
            .map_err(map_unique_violation)?
            .ok_or(AppError::NotFound {
                entity: "supplier",
                id,
            })
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if suppliers::delete(&self.pool, id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound {
                entity: "supplier",
                id,
            })
        }
    }

    /// Auto-match lookup used by the OCR flow. Expects a canonical CUIT.
    pub async fn find_by_cuit(&self, cuit: &str) -> Result<Option<Supplier>> {
        Ok(suppliers::find_by_cuit(&self.pool, cuit).await?)
    }
}

/// Validate and hyphenate an incoming CUIT. Invalid input is a client
/// error here, unlike the OCR path where it silently degrades.
fn canonicalize_cuit(raw: Option<String>) -> Result<Option<String>> {
    match raw {
        None => Ok(None),
        Some(value) => {
            let formatted = cuit::format(&value);
            if !cuit::validate(&formatted) {
                return Err(AppError::Validation(format!("invalid CUIT: {value}")));
            }
            Ok(Some(formatted))
        }
    }
}

fn map_unique_violation(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict("supplier name or CUIT already exists".into())
        }
        _ => AppError::Database(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_accepts_and_hyphenates_valid_cuit() {
        let out = canonicalize_cuit(Some("30710564295".into())).unwrap();
        assert_eq!(out.as_deref(), Some("30-71056429-5"));
    }

    #[test]
    fn canonicalize_rejects_bad_checksum() {
        assert!(canonicalize_cuit(Some("30-71056429-7".into())).is_err());
    }

    #[test]
    fn canonicalize_rejects_non_ascii_without_panicking() {
        let err = canonicalize_cuit(Some("€€€ab".into())).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn canonicalize_passes_through_absent_cuit() {
        assert!(canonicalize_cuit(None).unwrap().is_none());
    }
}
