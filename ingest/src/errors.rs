use thiserror::Error;

/// Errors that terminate a listener or connection, as opposed to rejections
/// scoped to a single request.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not build response: {0}")]
    Http(#[from] http::Error),

    /// Returned for non-POST requests. Surfacing this as a service error makes
    /// hyper tear the connection down without writing a response, so the
    /// caller sees neither a status nor a body.
    #[error("request method is not accepted")]
    MethodNotAllowed,
}

/// A per-request rejection. Every variant maps to the same generic failure
/// response; the reason string goes only to the log sink.
#[derive(Error, Debug)]
pub enum Rejection {
    #[error("non-secure request")]
    NonSecure,

    #[error("max body exceeded")]
    BodyTooLarge,

    #[error("could not read request body")]
    BodyRead,

    #[error("could not parse request body")]
    BodyDecode,

    #[error("missing {0} field in request body")]
    MissingField(&'static str),

    #[error("secret mismatch")]
    SecretMismatch,

    #[error("could not parse adjustment payload")]
    PayloadDecode,

    #[error("could not insert record: {0}")]
    Insert(String),
}

impl Rejection {
    /// Stable low-cardinality tag for metrics. The `MissingField` and
    /// `Insert` payloads stay out of the tag value.
    pub fn reason_tag(&self) -> &'static str {
        match self {
            Rejection::NonSecure => "non_secure",
            Rejection::BodyTooLarge => "body_too_large",
            Rejection::BodyRead => "body_read",
            Rejection::BodyDecode => "body_decode",
            Rejection::MissingField(_) => "missing_field",
            Rejection::SecretMismatch => "secret_mismatch",
            Rejection::PayloadDecode => "payload_decode",
            Rejection::Insert(_) => "insert",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form;

    #[test]
    fn test_rejection_reason_strings() {
        assert_eq!(Rejection::NonSecure.to_string(), "non-secure request");
        assert_eq!(Rejection::BodyTooLarge.to_string(), "max body exceeded");
        assert_eq!(Rejection::BodyRead.to_string(), "could not read request body");
        assert_eq!(
            Rejection::BodyDecode.to_string(),
            "could not parse request body"
        );
        assert_eq!(
            Rejection::SecretMismatch.to_string(),
            "secret mismatch"
        );
        assert_eq!(
            Rejection::PayloadDecode.to_string(),
            "could not parse adjustment payload"
        );
        assert_eq!(
            Rejection::Insert("connection refused".to_string()).to_string(),
            "could not insert record: connection refused"
        );
    }

    #[test]
    fn test_missing_field_reason_names_the_field() {
        assert_eq!(
            Rejection::MissingField(form::SECRET_FIELD).to_string(),
            "missing pocketailor_adjustments_secret field in request body"
        );
        assert_eq!(
            Rejection::MissingField(form::ADJUSTMENT_FIELD).to_string(),
            "missing adjustment field in request body"
        );
    }

    #[test]
    fn test_reason_tags() {
        assert_eq!(Rejection::NonSecure.reason_tag(), "non_secure");
        assert_eq!(Rejection::BodyTooLarge.reason_tag(), "body_too_large");
        assert_eq!(Rejection::BodyRead.reason_tag(), "body_read");
        assert_eq!(Rejection::BodyDecode.reason_tag(), "body_decode");
        assert_eq!(
            Rejection::MissingField(form::SECRET_FIELD).reason_tag(),
            "missing_field"
        );
        assert_eq!(Rejection::SecretMismatch.reason_tag(), "secret_mismatch");
        assert_eq!(Rejection::PayloadDecode.reason_tag(), "payload_decode");
        assert_eq!(
            Rejection::Insert(String::new()).reason_tag(),
            "insert"
        );
    }
}
