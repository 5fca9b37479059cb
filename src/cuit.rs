//! Argentine CUIT (tax id) validation, formatting and classification.
//!
//! A CUIT is 11 digits: a 2-digit taxpayer prefix, an 8-digit document
//! number and a mod-11 check digit, usually written `XX-XXXXXXXX-X`.

use serde::Serialize;

/// Weights applied to the first 10 digits for the check-digit computation.
const WEIGHTS: [u32; 10] = [5, 4, 3, 2, 7, 6, 5, 4, 3, 2];

/// Taxpayer kind derived from the CUIT prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxpayerKind {
    MaleNaturalPerson,
    FemaleNaturalPerson,
    LegalEntity,
    Unknown,
}

/// Strip hyphens and whitespace. Any other character survives and will
/// fail the digit check downstream.
fn clean(input: &str) -> String {
    input
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect()
}

/// Check format and mod-11 check digit. Empty or malformed input is
/// simply invalid, never an error.
pub fn validate(input: &str) -> bool {
    let cleaned = clean(input);

    if cleaned.len() != 11 || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let digits: Vec<u32> = cleaned.bytes().map(|b| u32::from(b - b'0')).collect();
    let verifier = digits[10];

    let sum: u32 = digits[..10]
        .iter()
        .zip(WEIGHTS.iter())
        .map(|(d, w)| d * w)
        .sum();

    let remainder = sum % 11;
    let expected = if remainder < 2 { remainder } else { 11 - remainder };

    verifier == expected
}

/// Re-hyphenate a cleaned 11-digit string as `XX-XXXXXXXX-X`.
///
/// Input that does not clean down to 11 digits is returned unchanged, so
/// the function is idempotent and never fails.
pub fn format(input: &str) -> String {
    let cleaned = clean(input);

    // Digit check before slicing: 11 bytes of non-ASCII are not 11 digits.
    if cleaned.len() != 11 || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return input.to_string();
    }

    format!("{}-{}-{}", &cleaned[..2], &cleaned[2..10], &cleaned[10..])
}

/// Map the two-digit prefix to a taxpayer kind. Unknown prefixes yield
/// [`TaxpayerKind::Unknown`] rather than an error.
pub fn classify(input: &str) -> TaxpayerKind {
    let cleaned = clean(input);

    match cleaned.get(..2) {
        Some("20") | Some("23") | Some("24") => TaxpayerKind::MaleNaturalPerson,
        Some("27") => TaxpayerKind::FemaleNaturalPerson,
        Some("30") | Some("33") | Some("34") => TaxpayerKind::LegalEntity,
        _ => TaxpayerKind::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_cuit_with_hyphens() {
        // weighted sum 138, 138 % 11 = 6, check digit 11 - 6 = 5
        assert!(validate("30-71056429-5"));
    }

    #[test]
    fn accepts_valid_cuit_without_hyphens() {
        assert!(validate("30710564295"));
        assert!(validate("27 18765432 2"));
    }

    #[test]
    fn remainder_below_two_is_used_directly() {
        // weighted sum 155, 155 % 11 = 1, check digit 1
        assert!(validate("20-12743549-1"));
        // weighted sum 99, 99 % 11 = 0, check digit 0
        assert!(validate("20-40123456-0"));
    }

    #[test]
    fn rejects_wrong_check_digit() {
        assert!(!validate("30-71056429-7"));
        assert!(!validate("30-71056429-0"));
        for wrong in [0, 2, 3, 4, 5, 6, 7, 8, 9] {
            assert!(!validate(&format!("2012743549{wrong}")));
        }
    }

    #[test]
    fn rejects_empty_and_malformed() {
        assert!(!validate(""));
        assert!(!validate("abc"));
        assert!(!validate("30-7105642-9X5"));
        assert!(!validate("3071056429"));   // 10 digits
        assert!(!validate("307105642951")); // 12 digits
    }

    #[test]
    fn format_hyphenates_clean_input() {
        assert_eq!(format("30710564295"), "30-71056429-5");
        assert_eq!(format("30-71056429-5"), "30-71056429-5");
    }

    #[test]
    fn format_is_idempotent() {
        let once = format("  30 71056429 5 ");
        assert_eq!(format(&once), once);
    }

    #[test]
    fn format_returns_non_cuit_input_unchanged() {
        assert_eq!(format("hello"), "hello");
        assert_eq!(format("12345"), "12345");
        assert_eq!(format(""), "");
    }

    #[test]
    fn format_returns_non_ascii_input_unchanged() {
        // "€€€ab" cleans to 11 bytes but only 5 chars; must not panic.
        assert_eq!(format("€€€ab"), "€€€ab");
        assert_eq!(format("３０７１０５６４２９７"), "３０７１０５６４２９７");
        assert!(!validate("€€€ab"));
    }

    #[test]
    fn classify_known_prefixes() {
        assert_eq!(classify("20-12743549-2"), TaxpayerKind::MaleNaturalPerson);
        assert_eq!(classify("23000000000"), TaxpayerKind::MaleNaturalPerson);
        assert_eq!(classify("24000000000"), TaxpayerKind::MaleNaturalPerson);
        assert_eq!(classify("27000000000"), TaxpayerKind::FemaleNaturalPerson);
        assert_eq!(classify("30-71056429-7"), TaxpayerKind::LegalEntity);
        assert_eq!(classify("33000000000"), TaxpayerKind::LegalEntity);
        assert_eq!(classify("34000000000"), TaxpayerKind::LegalEntity);
    }

    #[test]
    fn classify_unknown_prefixes() {
        assert_eq!(classify("99-00000000-0"), TaxpayerKind::Unknown);
        assert_eq!(classify("10"), TaxpayerKind::Unknown);
        assert_eq!(classify(""), TaxpayerKind::Unknown);
    }
}
