use std::collections::HashMap;

use crate::errors::Rejection;

/// Form field carrying the shared secret.
pub const SECRET_FIELD: &str = "pocketailor_adjustments_secret";

/// Form field carrying the JSON-encoded adjustment record.
pub const ADJUSTMENT_FIELD: &str = "adjustment";

/// Decode a request body as flat `application/x-www-form-urlencoded` pairs.
///
/// Percent-decoding is total over valid UTF-8 input, so the concrete failure
/// path is a body that is not valid UTF-8.
pub fn parse(body: &[u8]) -> Result<HashMap<String, String>, Rejection> {
    let text = std::str::from_utf8(body).map_err(|_| Rejection::BodyDecode)?;
    Ok(url::form_urlencoded::parse(text.as_bytes())
        .into_owned()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_both_fields() {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair(SECRET_FIELD, "testing_secret")
            .append_pair(ADJUSTMENT_FIELD, r#"{"g":1,"b":42}"#)
            .finish();

        let fields = parse(body.as_bytes()).unwrap();
        assert_eq!(fields[SECRET_FIELD], "testing_secret");
        assert_eq!(fields[ADJUSTMENT_FIELD], r#"{"g":1,"b":42}"#);
    }

    #[test]
    fn test_percent_decoding() {
        let fields = parse(b"adjustment=%7B%22g%22%3A1%7D").unwrap();
        assert_eq!(fields[ADJUSTMENT_FIELD], r#"{"g":1}"#);
    }

    #[test]
    fn test_missing_fields_absent_from_map() {
        let fields = parse(b"other=1").unwrap();
        assert!(!fields.contains_key(SECRET_FIELD));
        assert!(!fields.contains_key(ADJUSTMENT_FIELD));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let result = parse(&[0x80, 0xff, 0x41]);
        assert!(matches!(result, Err(Rejection::BodyDecode)));
    }

    #[test]
    fn test_empty_body_parses_to_empty_map() {
        assert!(parse(b"").unwrap().is_empty());
    }
}
