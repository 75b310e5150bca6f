use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Regex for validating username fields
    /// Must start with letter or underscore and contain only alphanumeric characters and underscores
    /// - Valid: "john_doe", "user123", "_admin", "JohnDoe"
    /// - Invalid: "123user", "-user", "user-name", "user name"
    pub static ref USERNAME_REGEX: Regex = Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap();

    /// Checkout phone number: exactly ten ASCII digits, nothing else
    /// - Valid: "9876543210", "0000000000"
    /// - Invalid: "98765 43210", "+919876543210", "987654321", "９８７６５４３２１０"
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^[0-9]{10}$").unwrap();
}

/// Reject values that are empty once surrounding whitespace is ignored
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("required");
        error.message = Some("This field is required".into());
        return Err(error);
    }
    Ok(())
}

/// Trim a required text field in place
pub fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Trim an optional text field, turning blank input into `None`
pub fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_regex_valid() {
        assert!(PHONE_REGEX.is_match("9876543210"));
        assert!(PHONE_REGEX.is_match("0000000000"));
    }

    #[test]
    fn test_phone_regex_invalid() {
        assert!(!PHONE_REGEX.is_match("987654321")); // nine digits
        assert!(!PHONE_REGEX.is_match("98765432101")); // eleven digits
        assert!(!PHONE_REGEX.is_match("98765 43210")); // space
        assert!(!PHONE_REGEX.is_match("+919876543210")); // country code
        assert!(!PHONE_REGEX.is_match("98765-4321")); // dash
        assert!(!PHONE_REGEX.is_match("９８７６５４３２１０")); // full-width digits
        assert!(!PHONE_REGEX.is_match(""));
    }

    #[test]
    fn test_username_regex() {
        assert!(USERNAME_REGEX.is_match("john_doe"));
        assert!(USERNAME_REGEX.is_match("_admin"));
        assert!(!USERNAME_REGEX.is_match("123user"));
        assert!(!USERNAME_REGEX.is_match("user name"));
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Pune").is_ok());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("").is_err());
    }

    #[test]
    fn test_trim_helpers() {
        let mut city = "  Pune ".to_string();
        trim_in_place(&mut city);
        assert_eq!(city, "Pune");

        assert_eq!(trim_optional(Some("   ".to_string())), None);
        assert_eq!(
            trim_optional(Some(" Acme ".to_string())),
            Some("Acme".to_string())
        );
        assert_eq!(trim_optional(None), None);
    }
}
