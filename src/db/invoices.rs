//! Invoice queries: CRUD, the filtered/paginated listing and the atomic
//! mark-as-paid update.

use crate::models::{
    CreateInvoice, Invoice, InvoiceFilter, InvoiceSortDir, InvoiceSortKey, InvoiceStatus,
    InvoiceWithSupplier, UpdateInvoice,
};
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};

const INVOICE_COLUMNS: &str = "i.id, i.date, i.amount, i.amount_105, i.total_neto, \
     i.vat_amount_21, i.vat_amount_105, i.has_ii_bb, i.ii_bb_amount, i.total_amount, \
     i.status, i.type, i.payment_date, i.supplier_id";

pub async fn insert(pool: &PgPool, dto: &CreateInvoice) -> Result<Invoice, sqlx::Error> {
    sqlx::query_as::<_, Invoice>(
        r#"
        INSERT INTO invoice (
            date, amount, amount_105, total_neto, vat_amount_21, vat_amount_105,
            has_ii_bb, ii_bb_amount, total_amount, status, type, payment_date, supplier_id
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING *
        "#,
    )
    .bind(dto.date)
    .bind(&dto.amount)
    .bind(&dto.amount_105)
    .bind(&dto.total_neto)
    .bind(&dto.vat_amount_21)
    .bind(&dto.vat_amount_105)
    .bind(dto.has_ii_bb)
    .bind(&dto.ii_bb_amount)
    .bind(&dto.total_amount)
    .bind(dto.status.unwrap_or(InvoiceStatus::ToPay))
    .bind(dto.invoice_type)
    .bind(dto.payment_date)
    .bind(dto.supplier_id)
    .fetch_one(pool)
    .await
}

pub async fn get(pool: &PgPool, id: i64) -> Result<Option<InvoiceWithSupplier>, sqlx::Error> {
    sqlx::query_as::<_, InvoiceWithSupplier>(&format!(
        r#"
        SELECT {INVOICE_COLUMNS}, s.name AS supplier_name, s.cuit AS supplier_cuit
        FROM invoice i
        INNER JOIN supplier s ON s.id = i.supplier_id
        WHERE i.id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Append the conjunctive WHERE clauses for the given filter.
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &InvoiceFilter) {
    if let Some(statuses) = &filter.status {
        qb.push(" AND i.status IN (");
        let mut separated = qb.separated(", ");
        for status in statuses {
            separated.push_bind(*status);
        }
        separated.push_unseparated(")");
    }
    if let Some(invoice_type) = filter.invoice_type {
        qb.push(" AND i.type = ").push_bind(invoice_type);
    }
    if let Some(supplier_id) = filter.supplier_id {
        qb.push(" AND i.supplier_id = ").push_bind(supplier_id);
    }
    if let Some(from_date) = filter.from_date {
        qb.push(" AND i.date >= ").push_bind(from_date);
    }
    if let Some(to_date) = filter.to_date {
        qb.push(" AND i.date <= ").push_bind(to_date);
    }
}

/// ORDER BY clause for the requested sort; issue date descending by default.
fn order_clause(filter: &InvoiceFilter) -> &'static str {
    let dir_desc = match filter.sort_dir {
        Some(InvoiceSortDir::Asc) => false,
        Some(InvoiceSortDir::Desc) => true,
        // Date sorts default to newest-first, name sorts to A-Z.
        None => !matches!(filter.sort_by, Some(InvoiceSortKey::SupplierName)),
    };

    match (filter.sort_by.unwrap_or(InvoiceSortKey::Date), dir_desc) {
        (InvoiceSortKey::Date, true) => " ORDER BY i.date DESC, i.id DESC",
        (InvoiceSortKey::Date, false) => " ORDER BY i.date ASC, i.id ASC",
        (InvoiceSortKey::SupplierName, true) => " ORDER BY s.name DESC, i.date DESC",
        (InvoiceSortKey::SupplierName, false) => " ORDER BY s.name ASC, i.date DESC",
    }
}

fn list_query<'a>(filter: &'a InvoiceFilter, page: i64, limit: i64) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {INVOICE_COLUMNS}, s.name AS supplier_name, s.cuit AS supplier_cuit \
         FROM invoice i INNER JOIN supplier s ON s.id = i.supplier_id WHERE 1=1"
    ));
    push_filters(&mut qb, filter);
    qb.push(order_clause(filter));
    qb.push(" LIMIT ").push_bind(limit);
    qb.push(" OFFSET ").push_bind((page - 1) * limit);
    qb
}

fn count_query<'a>(filter: &'a InvoiceFilter) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new(
        "SELECT COUNT(*) FROM invoice i INNER JOIN supplier s ON s.id = i.supplier_id WHERE 1=1",
    );
    push_filters(&mut qb, filter);
    qb
}

/// One page of matching invoices. `page` is 1-indexed.
pub async fn list(
    pool: &PgPool,
    filter: &InvoiceFilter,
    page: i64,
    limit: i64,
) -> Result<Vec<InvoiceWithSupplier>, sqlx::Error> {
    list_query(filter, page, limit)
        .build_query_as::<InvoiceWithSupplier>()
        .fetch_all(pool)
        .await
}

/// Total match count for the same filter, independent of pagination.
pub async fn count(pool: &PgPool, filter: &InvoiceFilter) -> Result<i64, sqlx::Error> {
    count_query(filter)
        .build_query_scalar::<i64>()
        .fetch_one(pool)
        .await
}

/// Partial update; NULL parameters keep the current column value.
pub async fn update(
    pool: &PgPool,
    id: i64,
    dto: &UpdateInvoice,
) -> Result<Option<Invoice>, sqlx::Error> {
    sqlx::query_as::<_, Invoice>(
        r#"
        UPDATE invoice
        SET date = COALESCE($2, date),
            amount = COALESCE($3, amount),
            amount_105 = COALESCE($4, amount_105),
            total_neto = COALESCE($5, total_neto),
            vat_amount_21 = COALESCE($6, vat_amount_21),
            vat_amount_105 = COALESCE($7, vat_amount_105),
            has_ii_bb = COALESCE($8, has_ii_bb),
            ii_bb_amount = COALESCE($9, ii_bb_amount),
            total_amount = COALESCE($10, total_amount),
            status = COALESCE($11, status),
            type = COALESCE($12, type),
            payment_date = COALESCE($13, payment_date),
            supplier_id = COALESCE($14, supplier_id)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(dto.date)
    .bind(&dto.amount)
    .bind(&dto.amount_105)
    .bind(&dto.total_neto)
    .bind(&dto.vat_amount_21)
    .bind(&dto.vat_amount_105)
    .bind(dto.has_ii_bb)
    .bind(&dto.ii_bb_amount)
    .bind(&dto.total_amount)
    .bind(dto.status)
    .bind(dto.invoice_type)
    .bind(dto.payment_date)
    .bind(dto.supplier_id)
    .fetch_optional(pool)
    .await
}

/// Returns whether a row was deleted.
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM invoice WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Atomic payment update: status and payment date change in one statement.
pub async fn mark_as_paid(
    pool: &PgPool,
    id: i64,
    payment_date: NaiveDate,
) -> Result<Option<Invoice>, sqlx::Error> {
    sqlx::query_as::<_, Invoice>(
        r#"
        UPDATE invoice
        SET status = $2, payment_date = $3
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(InvoiceStatus::Paid)
    .bind(payment_date)
    .fetch_optional(pool)
    .await
}
