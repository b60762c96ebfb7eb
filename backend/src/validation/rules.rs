//! Common validation rules shared across request payloads.

use validator::ValidationError;

const MAX_BARCODE_LEN: usize = 64;

/// Rejects values that are empty once surrounding whitespace is removed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Validates a store-scoped barcode.
///
/// Requirements:
/// - ASCII letters, digits and `-` only
/// - At most 64 characters
/// - Empty (after trimming) is accepted and means "no barcode"
pub fn validate_barcode(barcode: &str) -> Result<(), ValidationError> {
    let barcode = barcode.trim();
    if barcode.len() > MAX_BARCODE_LEN {
        return Err(ValidationError::new("barcode_too_long"));
    }
    if !barcode
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(ValidationError::new("barcode_invalid_characters"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_rejects_whitespace() {
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank(" Linen ").is_ok());
    }

    #[test]
    fn barcode_rejects_special_chars() {
        assert!(validate_barcode("12 34").is_err());
        assert!(validate_barcode("EAN#1").is_err());
    }

    #[test]
    fn barcode_accepts_valid_and_empty() {
        assert!(validate_barcode("4006381333931").is_ok());
        assert!(validate_barcode("SKU-0042").is_ok());
        assert!(validate_barcode("").is_ok());
    }

    #[test]
    fn barcode_rejects_too_long() {
        assert!(validate_barcode(&"9".repeat(65)).is_err());
    }
}
