use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationErrors;

lazy_static! {
    /// Regex for base64 image data URIs as produced by browser file readers
    /// - Valid: "data:image/png;base64,iVBORw0KGgo=", "data:image/svg+xml;base64,PHN2Zz4="
    /// - Invalid: "data:text/plain;base64,aGk=", "data:image/png,raw", "image/png;base64,AA=="
    pub static ref DATA_URI_REGEX: Regex =
        Regex::new(r"^data:(image/[a-zA-Z0-9.+-]+);base64,([A-Za-z0-9+/=\s]+)$").unwrap();
}

/// Trimmed value of an optional field, `None` when missing or blank
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Message of the first failing field, checking `fields` in order
pub fn first_error_message(errors: &ValidationErrors, fields: &[&str]) -> Option<String> {
    let field_errors = errors.field_errors();
    fields
        .iter()
        .filter_map(|field| field_errors.get(*field))
        .flat_map(|errs| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_regex_valid() {
        assert!(DATA_URI_REGEX.is_match("data:image/png;base64,iVBORw0KGgo="));
        assert!(DATA_URI_REGEX.is_match("data:image/jpeg;base64,/9j/4AAQ"));
        assert!(DATA_URI_REGEX.is_match("data:image/svg+xml;base64,PHN2Zz4="));
    }

    #[test]
    fn test_data_uri_regex_invalid() {
        assert!(!DATA_URI_REGEX.is_match("data:text/plain;base64,aGk=")); // not an image
        assert!(!DATA_URI_REGEX.is_match("data:image/png,raw")); // not base64
        assert!(!DATA_URI_REGEX.is_match("image/png;base64,AA==")); // no scheme
        assert!(!DATA_URI_REGEX.is_match("https://cdn.lipci.bg/hat.png"));
    }

    #[test]
    fn test_data_uri_regex_captures_type_and_payload() {
        let caps = DATA_URI_REGEX
            .captures("data:image/webp;base64,UklGRg==")
            .unwrap();
        assert_eq!(&caps[1], "image/webp");
        assert_eq!(&caps[2], "UklGRg==");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  Шапки ")), Some("Шапки"));
        assert_eq!(non_blank(Some("")), None);
        assert_eq!(non_blank(Some("   \t")), None);
        assert_eq!(non_blank(None), None);
    }
}
