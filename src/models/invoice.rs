use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Payment workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "invoice_status", rename_all = "snake_case")]
pub enum InvoiceStatus {
    ToPay,
    Prepared,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::ToPay => "to_pay",
            InvoiceStatus::Prepared => "prepared",
            InvoiceStatus::Paid => "paid",
        }
    }
}

impl FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "to_pay" => Ok(InvoiceStatus::ToPay),
            "prepared" => Ok(InvoiceStatus::Prepared),
            "paid" => Ok(InvoiceStatus::Paid),
            other => Err(format!("invalid invoice status: {other}")),
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Argentine invoice class code (VAT treatment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "invoice_type")]
pub enum InvoiceType {
    A,
    X,
}

impl FromStr for InvoiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(InvoiceType::A),
            "X" => Ok(InvoiceType::X),
            other => Err(format!("invalid invoice type: {other}")),
        }
    }
}

/// Invoice row. Monetary fields are NUMERIC, non-negative by invariant;
/// `status = paid` implies `payment_date` is set.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: BigDecimal,
    pub amount_105: BigDecimal,
    pub total_neto: BigDecimal,
    pub vat_amount_21: BigDecimal,
    pub vat_amount_105: BigDecimal,
    pub has_ii_bb: bool,
    pub ii_bb_amount: BigDecimal,
    pub total_amount: BigDecimal,
    pub status: InvoiceStatus,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub invoice_type: InvoiceType,
    pub payment_date: Option<NaiveDate>,
    pub supplier_id: i64,
}

/// Invoice joined with its supplier's display columns, as returned by
/// the list/get endpoints.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct InvoiceWithSupplier {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub invoice: Invoice,
    pub supplier_name: String,
    pub supplier_cuit: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoice {
    pub supplier_id: i64,
    pub date: NaiveDate,
    pub amount: BigDecimal,
    #[serde(default)]
    pub amount_105: BigDecimal,
    #[serde(default)]
    pub total_neto: BigDecimal,
    #[serde(default)]
    pub vat_amount_21: BigDecimal,
    #[serde(default)]
    pub vat_amount_105: BigDecimal,
    #[serde(default)]
    pub has_ii_bb: bool,
    #[serde(default)]
    pub ii_bb_amount: BigDecimal,
    #[serde(default)]
    pub total_amount: BigDecimal,
    #[serde(rename = "type")]
    pub invoice_type: InvoiceType,
    pub status: Option<InvoiceStatus>,
    pub payment_date: Option<NaiveDate>,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateInvoice {
    pub supplier_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub amount: Option<BigDecimal>,
    pub amount_105: Option<BigDecimal>,
    pub total_neto: Option<BigDecimal>,
    pub vat_amount_21: Option<BigDecimal>,
    pub vat_amount_105: Option<BigDecimal>,
    pub has_ii_bb: Option<bool>,
    pub ii_bb_amount: Option<BigDecimal>,
    pub total_amount: Option<BigDecimal>,
    #[serde(rename = "type")]
    pub invoice_type: Option<InvoiceType>,
    pub status: Option<InvoiceStatus>,
    pub payment_date: Option<NaiveDate>,
}

/// Listing sort key; default ordering is issue date descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceSortKey {
    Date,
    SupplierName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceSortDir {
    Asc,
    Desc,
}

/// Conjunctive listing filters, straight from query parameters.
/// `status` accepts a comma-separated set (`status=paid,to_pay`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceFilter {
    #[serde(default, deserialize_with = "deserialize_status_set")]
    pub status: Option<Vec<InvoiceStatus>>,
    #[serde(rename = "type")]
    pub invoice_type: Option<InvoiceType>,
    pub supplier_id: Option<i64>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub sort_by: Option<InvoiceSortKey>,
    pub sort_dir: Option<InvoiceSortDir>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

fn deserialize_status_set<'de, D>(de: D) -> Result<Option<Vec<InvoiceStatus>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(de)?;
    match raw {
        None => Ok(None),
        Some(s) => {
            let statuses = s
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(InvoiceStatus::from_str)
                .collect::<Result<Vec<_>, _>>()
                .map_err(serde::de::Error::custom)?;
            Ok(if statuses.is_empty() { None } else { Some(statuses) })
        }
    }
}
