//! Turns the free-form vision-model response into a structured,
//! confidence-gated invoice draft.
//!
//! The model is asked for bare JSON but routinely wraps it in markdown
//! fences or prose, omits fields, or hallucinates tax ids. This module
//! owns all of that cleanup so the rest of the service only ever sees a
//! normalized [`OcrDraft`].

use crate::cuit;
use crate::models::{InvoiceStatus, InvoiceType};
use bigdecimal::{BigDecimal, Zero};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use std::str::FromStr;
use std::time::Instant;
use thiserror::Error;

/// IIBB (gross-receipts withholding) synonyms looked up in the raw text,
/// independent of what the model put in `has_ii_bb`.
const IIBB_KEYWORDS: &[&str] = &[
    "ingresos brutos",
    "ing. brutos",
    "ing brutos",
    "iibb",
    "ii.bb.",
    "ii.bb",
    "ii bb",
    "percepciones",
    "percepcion",
    "percepción",
    "retenciones iibb",
    "retencion iibb",
    "retención iibb",
];

#[derive(Debug, Error)]
pub enum OcrParseError {
    /// Neither a fenced block nor a `{...}` span parsed as JSON.
    #[error("no JSON found in model response")]
    NoJson,

    /// Extraction succeeded but the model was not confident enough.
    /// Carries both values so the client can prompt for a clearer photo.
    #[error("confidence {confidence} below threshold {threshold}")]
    BelowThreshold { confidence: f64, threshold: f64 },
}

#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Minimum confidence (0-100) for the draft to be accepted.
    pub confidence_threshold: f64,
    /// Supplier preselected by the caller; skips CUIT auto-matching.
    pub supplier_id_hint: Option<i64>,
}

/// Ephemeral invoice draft extracted from one photographed document.
/// Never persisted; accepted into a regular invoice-create call or thrown
/// away.
#[derive(Debug, Clone, Serialize)]
pub struct OcrDraft {
    pub supplier_name: Option<String>,
    /// Canonical `XX-XXXXXXXX-X`, present only if it passed the checksum.
    pub supplier_cuit: Option<String>,
    pub date: NaiveDate,
    pub amount: BigDecimal,
    pub amount_105: BigDecimal,
    pub total_neto: BigDecimal,
    pub vat_amount_21: BigDecimal,
    pub vat_amount_105: BigDecimal,
    pub has_ii_bb: bool,
    pub ii_bb_amount: BigDecimal,
    pub total_amount: BigDecimal,
    #[serde(rename = "type")]
    pub invoice_type: InvoiceType,
    pub status: InvoiceStatus,
    pub confidence: f64,
    /// Raw model response, kept for diagnostics and manual review.
    pub extracted_text: String,
    /// IIBB synonyms that fired in the raw text, for observability.
    pub matched_keywords: Vec<String>,
    pub requires_supplier_selection: bool,
    pub elapsed_ms: u64,
}

/// Parse and normalize a raw model response.
///
/// Fails only when no JSON can be located or the confidence gate rejects
/// the extraction; every field-level problem degrades to a default
/// instead.
pub fn parse(raw: &str, options: &ParseOptions) -> Result<OcrDraft, OcrParseError> {
    let started = Instant::now();

    let json = locate_json(raw).ok_or(OcrParseError::NoJson)?;

    let confidence = json
        .get("confidence")
        .and_then(Value::as_f64)
        .unwrap_or(75.0);

    if confidence < options.confidence_threshold {
        return Err(OcrParseError::BelowThreshold {
            confidence,
            threshold: options.confidence_threshold,
        });
    }

    let matched_keywords = detect_iibb_keywords(raw);
    let model_flag = json.get("has_ii_bb").and_then(Value::as_bool).unwrap_or(false);

    // The detector only forces the boolean; the amount is always the
    // model's. A keyword hit with no amount reports withholding present
    // at zero, which the matched_keywords list lets clients flag.
    let has_ii_bb = model_flag || !matched_keywords.is_empty();

    let supplier_cuit = json
        .get("supplierCuit")
        .and_then(Value::as_str)
        .map(cuit::format)
        .filter(|formatted| cuit::validate(formatted));

    let requires_supplier_selection =
        options.supplier_id_hint.is_none() && supplier_cuit.is_none();

    let draft = OcrDraft {
        supplier_name: json
            .get("supplierName")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from),
        supplier_cuit,
        date: coerce_date(json.get("date")),
        amount: coerce_amount(json.get("amount")),
        amount_105: coerce_amount(json.get("amount_105")),
        total_neto: coerce_amount(json.get("total_neto")),
        vat_amount_21: coerce_amount(json.get("vat_amount_21")),
        vat_amount_105: coerce_amount(json.get("vat_amount_105")),
        has_ii_bb,
        ii_bb_amount: coerce_amount(json.get("ii_bb_amount")),
        total_amount: coerce_amount(json.get("total_amount")),
        invoice_type: coerce_invoice_type(json.get("invoiceType")),
        status: InvoiceStatus::ToPay,
        confidence,
        extracted_text: raw.to_string(),
        matched_keywords,
        requires_supplier_selection,
        elapsed_ms: started.elapsed().as_millis() as u64,
    };

    Ok(draft)
}

/// Locate the JSON object inside the raw response. A fenced code block
/// wins; otherwise the greedy span from the first `{` to the last `}`.
fn locate_json(raw: &str) -> Option<Value> {
    if let Some(candidate) = fenced_block(raw) {
        if let Some(value) = parse_object(candidate) {
            return Some(value);
        }
    }

    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }

    parse_object(&raw[start..=end])
}

/// Content of the first triple-backtick fence, with an optional language
/// tag on the opening line.
fn fenced_block(raw: &str) -> Option<&str> {
    let open = raw.find("```")?;
    let after_open = &raw[open + 3..];
    let body_start = after_open.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_open[body_start..];
    let close = body.find("```")?;
    Some(&body[..close])
}

fn parse_object(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text.trim())
        .ok()
        .filter(Value::is_object)
}

/// Coerce a monetary JSON field. Numbers pass through exactly; strings
/// are cleaned of currency noise (`$ 1.234,56` style) and parsed as far
/// as they go; anything else is zero.
fn coerce_amount(value: Option<&Value>) -> BigDecimal {
    match value {
        Some(Value::Number(n)) => {
            BigDecimal::from_str(&n.to_string()).unwrap_or_else(|_| BigDecimal::zero())
        }
        Some(Value::String(s)) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
                .map(|c| if c == ',' { '.' } else { c })
                .collect();
            parse_decimal_prefix(&cleaned).unwrap_or_else(BigDecimal::zero)
        }
        _ => BigDecimal::zero(),
    }
}

/// Longest leading `digits[.digits]` prefix, so `1.234.56` still yields
/// `1.234` the way a lenient float parse would.
fn parse_decimal_prefix(s: &str) -> Option<BigDecimal> {
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in s.char_indices() {
        match c {
            '0'..='9' => end = i + 1,
            '.' if !seen_dot => {
                seen_dot = true;
                end = i + 1;
            }
            _ => break,
        }
    }
    BigDecimal::from_str(s[..end].trim_end_matches('.')).ok()
}

/// `YYYY-MM-DD` or today's date when absent or unreadable.
fn coerce_date(value: Option<&Value>) -> NaiveDate {
    value
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
        .unwrap_or_else(|| Utc::now().date_naive())
}

/// Uppercased `A`/`X`; anything else defaults to `A`.
fn coerce_invoice_type(value: Option<&Value>) -> InvoiceType {
    match value.and_then(Value::as_str).map(str::to_uppercase).as_deref() {
        Some("X") => InvoiceType::X,
        _ => InvoiceType::A,
    }
}

fn detect_iibb_keywords(raw: &str) -> Vec<String> {
    let haystack = raw.to_lowercase();
    IIBB_KEYWORDS
        .iter()
        .filter(|kw| haystack.contains(*kw))
        .map(|kw| kw.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(threshold: f64) -> ParseOptions {
        ParseOptions {
            confidence_threshold: threshold,
            supplier_id_hint: None,
        }
    }

    fn fenced(json: &str) -> String {
        format!("Here is the extraction:\n```json\n{json}\n```\nDone.")
    }

    const FULL_JSON: &str = r#"{
        "supplierName": "Distribuidora Sur SA",
        "supplierCuit": "30-71056429-5",
        "amount": 1000.50,
        "amount_105": 0,
        "total_neto": 1000.50,
        "vat_amount_21": 210.11,
        "vat_amount_105": 0,
        "has_ii_bb": false,
        "ii_bb_amount": 0,
        "total_amount": 1210.61,
        "date": "2026-07-15",
        "invoiceType": "A",
        "confidence": 97
    }"#;

    #[test]
    fn parses_fenced_json_above_threshold() {
        let draft = parse(&fenced(FULL_JSON), &opts(95.0)).expect("draft");
        assert_eq!(draft.status, InvoiceStatus::ToPay);
        assert_eq!(draft.invoice_type, InvoiceType::A);
        assert_eq!(draft.supplier_name.as_deref(), Some("Distribuidora Sur SA"));
        assert_eq!(draft.supplier_cuit.as_deref(), Some("30-71056429-5"));
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2026, 7, 15).unwrap());
        assert_eq!(draft.total_amount, BigDecimal::from_str("1210.61").unwrap());
        assert_eq!(draft.confidence, 97.0);
        assert!(!draft.requires_supplier_selection);
    }

    #[test]
    fn falls_back_to_brace_span_without_fence() {
        let raw = format!("The invoice data is {FULL_JSON} as requested.");
        let draft = parse(&raw, &opts(95.0)).expect("draft");
        assert_eq!(draft.vat_amount_21, BigDecimal::from_str("210.11").unwrap());
    }

    #[test]
    fn rejects_below_threshold_without_partial_draft() {
        let json = FULL_JSON.replace("\"confidence\": 97", "\"confidence\": 80");
        let err = parse(&fenced(&json), &opts(95.0)).unwrap_err();
        match err {
            OcrParseError::BelowThreshold {
                confidence,
                threshold,
            } => {
                assert_eq!(confidence, 80.0);
                assert_eq!(threshold, 95.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_confidence_defaults_to_75_and_fails_default_gate() {
        let json = FULL_JSON.replace("\"confidence\": 97", "\"confidence\": null");
        assert!(parse(&fenced(&json), &opts(95.0)).is_err());
        let draft = parse(&fenced(&json), &opts(70.0)).expect("draft");
        assert_eq!(draft.confidence, 75.0);
    }

    #[test]
    fn no_json_at_all_is_a_parse_error() {
        assert!(matches!(
            parse("I could not read the image, sorry.", &opts(95.0)),
            Err(OcrParseError::NoJson)
        ));
        assert!(matches!(
            parse("braces { but not } json", &opts(95.0)),
            Err(OcrParseError::NoJson)
        ));
        assert!(matches!(parse("", &opts(95.0)), Err(OcrParseError::NoJson)));
    }

    #[test]
    fn keyword_detector_forces_iibb_flag() {
        // Model omitted has_ii_bb entirely, but the raw text mentions it.
        let json = r#"{"total_amount": 500, "confidence": 96}"#;
        let raw = format!(
            "```json\n{json}\n```\nLa factura incluye Percepciones de ingresos brutos."
        );
        let draft = parse(&raw, &opts(95.0)).expect("draft");
        assert!(draft.has_ii_bb);
        assert!(draft
            .matched_keywords
            .iter()
            .any(|k| k == "percepciones"));
        // Detector contributes no amount.
        assert_eq!(draft.ii_bb_amount, BigDecimal::zero());
    }

    #[test]
    fn model_flag_survives_without_keywords() {
        let json = r#"{"has_ii_bb": true, "ii_bb_amount": 35.20, "confidence": 96}"#;
        let draft = parse(&fenced(json), &opts(95.0)).expect("draft");
        assert!(draft.has_ii_bb);
        assert!(draft.matched_keywords.is_empty());
        assert_eq!(draft.ii_bb_amount, BigDecimal::from_str("35.20").unwrap());
    }

    #[test]
    fn invalid_cuit_is_dropped_and_supplier_selection_required() {
        let json = FULL_JSON.replace("30-71056429-5", "30-71056429-7");
        let draft = parse(&fenced(&json), &opts(95.0)).expect("draft");
        assert!(draft.supplier_cuit.is_none());
        assert!(draft.requires_supplier_selection);
    }

    #[test]
    fn supplier_hint_overrides_selection_requirement() {
        let json = FULL_JSON.replace("30-71056429-5", "not-a-cuit");
        let options = ParseOptions {
            confidence_threshold: 95.0,
            supplier_id_hint: Some(7),
        };
        let draft = parse(&fenced(&json), &options).expect("draft");
        assert!(draft.supplier_cuit.is_none());
        assert!(!draft.requires_supplier_selection);
    }

    #[test]
    fn non_ascii_cuit_is_dropped_not_a_crash() {
        // A hallucinated tax id whose cleaned form is 11 bytes of
        // multibyte text must degrade like any other invalid id.
        let json = FULL_JSON.replace("30-71056429-5", "€€€ab");
        let draft = parse(&fenced(&json), &opts(95.0)).expect("draft");
        assert!(draft.supplier_cuit.is_none());
        assert!(draft.requires_supplier_selection);
    }

    #[test]
    fn unhyphenated_cuit_is_canonicalized() {
        let json = FULL_JSON.replace("30-71056429-5", "30710564295");
        let draft = parse(&fenced(&json), &opts(95.0)).expect("draft");
        assert_eq!(draft.supplier_cuit.as_deref(), Some("30-71056429-5"));
    }

    #[test]
    fn string_amounts_are_cleaned() {
        let json = r#"{"amount": "$ 1234.56", "total_amount": "1.234.56", "confidence": 96}"#;
        let draft = parse(&fenced(json), &opts(95.0)).expect("draft");
        assert_eq!(draft.amount, BigDecimal::from_str("1234.56").unwrap());
        // Lenient prefix parse, like the original float coercion.
        assert_eq!(draft.total_amount, BigDecimal::from_str("1.234").unwrap());
        assert_eq!(draft.vat_amount_21, BigDecimal::zero());
    }

    #[test]
    fn comma_decimal_separator_is_normalized() {
        let json = r#"{"amount": "1234,56", "confidence": 96}"#;
        let draft = parse(&fenced(json), &opts(95.0)).expect("draft");
        assert_eq!(draft.amount, BigDecimal::from_str("1234.56").unwrap());
    }

    #[test]
    fn unknown_invoice_type_defaults_to_a() {
        for t in ["\"B\"", "\"c\"", "null", "7"] {
            let json = format!(r#"{{"invoiceType": {t}, "confidence": 96}}"#);
            let draft = parse(&fenced(&json), &opts(95.0)).expect("draft");
            assert_eq!(draft.invoice_type, InvoiceType::A);
        }
        let json = r#"{"invoiceType": "x", "confidence": 96}"#;
        let draft = parse(&fenced(json), &opts(95.0)).expect("draft");
        assert_eq!(draft.invoice_type, InvoiceType::X);
    }

    #[test]
    fn unreadable_date_falls_back_to_today() {
        let json = r#"{"date": "15/07/2026", "confidence": 96}"#;
        let draft = parse(&fenced(json), &opts(95.0)).expect("draft");
        assert_eq!(draft.date, Utc::now().date_naive());
    }
}
