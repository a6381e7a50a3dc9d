//! Format validators shared by the request DTOs.
//!
//! The patterns mirror the Indian statutory number formats the business
//! records: GSTIN, PAN, Aadhaar, and 10-digit mobile numbers.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

static GST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z]{1}[1-9A-Z]{1}Z[0-9A-Z]{1}$").unwrap()
});

static PAN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]{1}$").unwrap());

static AADHAAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{12}$").unwrap());

static MOBILE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[6-9]\d{9}$").unwrap());

fn format_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

pub fn validate_gst_number(value: &str) -> Result<(), ValidationError> {
    if GST_RE.is_match(value) {
        Ok(())
    } else {
        Err(format_error("gst_number", "Enter a valid GST number"))
    }
}

pub fn validate_pan_number(value: &str) -> Result<(), ValidationError> {
    if PAN_RE.is_match(value) {
        Ok(())
    } else {
        Err(format_error("pan_number", "Enter a valid PAN number"))
    }
}

pub fn validate_aadhaar_number(value: &str) -> Result<(), ValidationError> {
    if AADHAAR_RE.is_match(value) {
        Ok(())
    } else {
        Err(format_error(
            "aadhar_number",
            "Enter a valid 12-digit Aadhaar number",
        ))
    }
}

pub fn validate_mobile_number(value: &str) -> Result<(), ValidationError> {
    if MOBILE_RE.is_match(value) {
        Ok(())
    } else {
        Err(format_error(
            "mobile_no",
            "Enter a valid 10-digit mobile number",
        ))
    }
}

pub fn validate_non_negative_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        Err(format_error("amount", "Amount cannot be negative"))
    } else {
        Ok(())
    }
}

pub fn validate_positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value > &Decimal::ZERO {
        Ok(())
    } else {
        Err(format_error("amount", "Amount must be greater than zero"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn gst_pattern_accepts_valid_numbers() {
        assert!(validate_gst_number("24AAACI1234F1Z5").is_ok());
        assert!(validate_gst_number("27ABCDE9876K2ZA").is_ok());
    }

    #[test]
    fn gst_pattern_rejects_malformed_numbers() {
        // wrong length
        assert!(validate_gst_number("24AAACI1234F1Z").is_err());
        // lowercase letters
        assert!(validate_gst_number("24aaaci1234f1z5").is_err());
        // 14th character must be Z
        assert!(validate_gst_number("24AAACI1234F1X5").is_err());
        // entity code 0 is not allowed
        assert!(validate_gst_number("24AAACI1234F0Z5").is_err());
        assert!(validate_gst_number("").is_err());
    }

    #[test]
    fn pan_pattern() {
        assert!(validate_pan_number("AAACI1234F").is_ok());
        assert!(validate_pan_number("AAACI12345").is_err());
        assert!(validate_pan_number("aaaci1234f").is_err());
    }

    #[test]
    fn aadhaar_pattern() {
        assert!(validate_aadhaar_number("123412341234").is_ok());
        assert!(validate_aadhaar_number("12341234123").is_err());
        assert!(validate_aadhaar_number("12341234123a").is_err());
    }

    #[test]
    fn mobile_pattern() {
        assert!(validate_mobile_number("9876543210").is_ok());
        assert!(validate_mobile_number("6000000000").is_ok());
        // must start with 6-9
        assert!(validate_mobile_number("5876543210").is_err());
        assert!(validate_mobile_number("98765").is_err());
    }

    #[test]
    fn amount_checks() {
        assert!(validate_non_negative_amount(&dec!(0)).is_ok());
        assert!(validate_non_negative_amount(&dec!(-1)).is_err());
        assert!(validate_positive_amount(&dec!(10.50)).is_ok());
        assert!(validate_positive_amount(&dec!(0)).is_err());
    }
}
