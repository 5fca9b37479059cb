//! Row-level listing behavior against a real database.
//!
//! Ignored by default; point DATABASE_URL at a scratch PostgreSQL
//! database and run with `cargo test -- --ignored`.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use factura_backend::models::{
    CreateInvoice, CreateSupplier, InvoiceFilter, InvoiceStatus, InvoiceType,
};
use factura_backend::{create_pool, InvoiceService, SupplierService};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn invoice(supplier_id: i64, on: NaiveDate, status: InvoiceStatus) -> CreateInvoice {
    CreateInvoice {
        supplier_id,
        date: on,
        amount: BigDecimal::from(100),
        amount_105: BigDecimal::from(0),
        total_neto: BigDecimal::from(100),
        vat_amount_21: BigDecimal::from(21),
        vat_amount_105: BigDecimal::from(0),
        has_ii_bb: false,
        ii_bb_amount: BigDecimal::from(0),
        total_amount: BigDecimal::from(121),
        invoice_type: InvoiceType::A,
        status: Some(status),
        payment_date: (status == InvoiceStatus::Paid).then_some(on),
    }
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn status_and_date_filters_return_only_matching_rows() {
    let url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://localhost/factura_backend_test".to_string());
    let pool = create_pool(&url).await.expect("database pool");
    factura_backend::db::pool::run_migrations(&pool)
        .await
        .expect("migrations");

    let suppliers = SupplierService::new(pool.clone());
    let invoices = InvoiceService::new(pool.clone());

    // Unique name so reruns against the same database do not collide.
    let supplier = suppliers
        .create(CreateSupplier {
            name: format!("Listado Test SA {}", chrono::Utc::now().timestamp_nanos_opt().unwrap()),
            cuit: None,
            cbu: None,
            payment_term: 30,
        })
        .await
        .expect("supplier");

    // In range: one to_pay, one paid. Out of band: wrong status, too old.
    let in_range_to_pay = invoices
        .create(invoice(supplier.id, date(2026, 3, 10), InvoiceStatus::ToPay))
        .await
        .expect("invoice");
    let in_range_paid = invoices
        .create(invoice(supplier.id, date(2026, 4, 5), InvoiceStatus::Paid))
        .await
        .expect("invoice");
    let wrong_status = invoices
        .create(invoice(supplier.id, date(2026, 5, 1), InvoiceStatus::Prepared))
        .await
        .expect("invoice");
    let too_old = invoices
        .create(invoice(supplier.id, date(2025, 12, 31), InvoiceStatus::ToPay))
        .await
        .expect("invoice");

    let filter = InvoiceFilter {
        status: Some(vec![InvoiceStatus::Paid, InvoiceStatus::ToPay]),
        supplier_id: Some(supplier.id),
        from_date: Some(date(2026, 1, 1)),
        to_date: Some(date(2026, 6, 30)),
        ..Default::default()
    };

    let page = invoices.list(filter.clone()).await.expect("listing");
    let ids: Vec<i64> = page.data.iter().map(|row| row.invoice.id).collect();

    // Only the two in-range, status-matching rows, newest first.
    assert_eq!(ids, vec![in_range_paid.id, in_range_to_pay.id]);
    assert_eq!(page.meta.total, 2);

    // Total count is independent of page size.
    let small_page = invoices
        .list(InvoiceFilter {
            limit: Some(1),
            ..filter
        })
        .await
        .expect("listing");
    assert_eq!(small_page.data.len(), 1);
    assert_eq!(small_page.meta.total, 2);
    assert_eq!(small_page.data[0].invoice.id, in_range_paid.id);

    // mark_as_paid flips the row atomically.
    let paid = invoices
        .mark_as_paid(in_range_to_pay.id, date(2026, 6, 1))
        .await
        .expect("mark as paid");
    assert_eq!(paid.status, InvoiceStatus::Paid);
    assert_eq!(paid.payment_date, Some(date(2026, 6, 1)));

    for id in [in_range_to_pay.id, in_range_paid.id, wrong_status.id, too_old.id] {
        invoices.delete(id).await.expect("cleanup invoice");
    }
    suppliers.delete(supplier.id).await.expect("cleanup supplier");
}
