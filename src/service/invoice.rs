use crate::db::{invoices, suppliers};
use crate::error::{AppError, Result};
use crate::models::{
    CreateInvoice, Invoice, InvoiceFilter, InvoiceStatus, InvoiceWithSupplier, Paginated,
    UpdateInvoice,
};
use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;
use sqlx::PgPool;

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

/// Invoice CRUD, the filtered/paginated listing and the payment workflow.
pub struct InvoiceService {
    pool: PgPool,
}

impl InvoiceService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, dto: CreateInvoice) -> Result<Invoice> {
        check_non_negative(&[
            ("amount", &dto.amount),
            ("amount_105", &dto.amount_105),
            ("total_neto", &dto.total_neto),
            ("vat_amount_21", &dto.vat_amount_21),
            ("vat_amount_105", &dto.vat_amount_105),
            ("ii_bb_amount", &dto.ii_bb_amount),
            ("total_amount", &dto.total_amount),
        ])?;

        if dto.status == Some(InvoiceStatus::Paid) && dto.payment_date.is_none() {
            return Err(AppError::Validation(
                "a paid invoice requires a payment date".into(),
            ));
        }

        // Surface a missing supplier as NotFound rather than an FK error.
        if suppliers::get(&self.pool, dto.supplier_id).await?.is_none() {
            return Err(AppError::NotFound {
                entity: "supplier",
                id: dto.supplier_id,
            });
        }

        Ok(invoices::insert(&self.pool, &dto).await?)
    }

    pub async fn list(&self, filter: InvoiceFilter) -> Result<Paginated<InvoiceWithSupplier>> {
        let page = filter.page.unwrap_or(1).max(1);
        let limit = filter
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let data = invoices::list(&self.pool, &filter, page, limit).await?;
        let total = invoices::count(&self.pool, &filter).await?;

        Ok(Paginated::new(data, total, page, limit))
    }

    pub async fn get(&self, id: i64) -> Result<InvoiceWithSupplier> {
        invoices::get(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound {
                entity: "invoice",
                id,
            })
    }

    pub async fn update(&self, id: i64, dto: UpdateInvoice) -> Result<Invoice> {
        let monetary: Vec<(&str, &BigDecimal)> = [
            ("amount", dto.amount.as_ref()),
            ("amount_105", dto.amount_105.as_ref()),
            ("total_neto", dto.total_neto.as_ref()),
            ("vat_amount_21", dto.vat_amount_21.as_ref()),
            ("vat_amount_105", dto.vat_amount_105.as_ref()),
            ("ii_bb_amount", dto.ii_bb_amount.as_ref()),
            ("total_amount", dto.total_amount.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect();
        check_non_negative(&monetary)?;

        // Moving to paid needs a payment date from the update itself or
        // one already on the row.
        if dto.status == Some(InvoiceStatus::Paid) && dto.payment_date.is_none() {
            let current = self.get(id).await?;
            if current.invoice.payment_date.is_none() {
                return Err(AppError::Validation(
                    "a paid invoice requires a payment date".into(),
                ));
            }
        }

        if let Some(supplier_id) = dto.supplier_id {
            if suppliers::get(&self.pool, supplier_id).await?.is_none() {
                return Err(AppError::NotFound {
                    entity: "supplier",
                    id: supplier_id,
                });
            }
        }

        invoices::update(&self.pool, id, &dto)
            .await?
            .ok_or(AppError::NotFound {
                entity: "invoice",
                id,
            })
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if invoices::delete(&self.pool, id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound {
                entity: "invoice",
                id,
            })
        }
    }

    /// Set status to paid and record the payment date in one statement.
    pub async fn mark_as_paid(&self, id: i64, payment_date: NaiveDate) -> Result<Invoice> {
        invoices::mark_as_paid(&self.pool, id, payment_date)
            .await?
            .ok_or(AppError::NotFound {
                entity: "invoice",
                id,
            })
    }
}

fn check_non_negative(fields: &[(&str, &BigDecimal)]) -> Result<()> {
    for (name, value) in fields {
        if **value < BigDecimal::zero() {
            return Err(AppError::Validation(format!(
                "{name} must not be negative"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn negative_amounts_are_rejected() {
        let neg = BigDecimal::from_str("-0.01").unwrap();
        let err = check_non_negative(&[("amount", &neg)]).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn zero_amounts_are_allowed() {
        let zero = BigDecimal::zero();
        assert!(check_non_negative(&[("amount", &zero)]).is_ok());
    }
}
