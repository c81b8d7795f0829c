//! Input validation helpers shared by the services.
//!
//! Messages follow a single convention, `"<field>" <problem>`, so clients can
//! show them verbatim.

use uuid::Uuid;

use crate::error::DomainError;

/// Require a present, non-blank string field.
pub fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, DomainError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        Some(_) => Err(DomainError::validation(format!(
            "\"{field}\" is not allowed to be empty"
        ))),
        None => Err(DomainError::validation(format!("\"{field}\" is required"))),
    }
}

/// Reject a supplied-but-blank optional field.
pub fn not_empty<'a>(field: &str, value: Option<&'a str>) -> Result<Option<&'a str>, DomainError> {
    match value {
        Some(_) => required(field, value).map(Some),
        None => Ok(None),
    }
}

/// Require a syntactically valid email address.
pub fn email<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, DomainError> {
    let value = required(field, value)?;
    if is_valid_email(value) {
        Ok(value)
    } else {
        Err(DomainError::validation(format!(
            "\"{field}\" must be a valid email"
        )))
    }
}

/// Parse a UUID identifier.
pub fn uuid(field: &str, value: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(value.trim())
        .map_err(|_| DomainError::validation(format!("\"{field}\" must be a valid GUID")))
}

/// Require an integer >= `min`.
pub fn at_least(field: &str, value: i64, min: i64) -> Result<u64, DomainError> {
    if value < min {
        return Err(DomainError::validation(format!(
            "\"{field}\" must be greater than or equal to {min}"
        )));
    }
    Ok(value as u64)
}

/// Require an integer <= `max`.
pub fn at_most(field: &str, value: u64, max: u64) -> Result<u64, DomainError> {
    if value > max {
        return Err(DomainError::validation(format!(
            "\"{field}\" must be less than or equal to {max}"
        )));
    }
    Ok(value)
}

/// Parse one of a fixed set of values.
pub fn one_of<T: std::str::FromStr>(
    field: &str,
    value: &str,
    allowed: &[&str],
) -> Result<T, DomainError> {
    value.parse().map_err(|_| {
        let list = allowed
            .iter()
            .map(|a| format!("\"{a}\""))
            .collect::<Vec<_>>();
        let list = list.join(", ");
        DomainError::validation(format!("\"{field}\" must be one of [{list}]"))
    })
}

/// A pragmatic address check: one `@`, a non-empty local part, a dotted
/// domain and no whitespace.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}

/// Mask an email for logging to avoid PII in logs.
pub fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = match local.chars().next() {
                Some(first) if local.chars().count() > 1 => format!("{first}***"),
                _ => "***".to_string(),
            };
            format!("{masked_local}{domain}")
        }
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PostStatus;

    #[test]
    fn test_required() {
        assert_eq!(required("name", Some("John")).unwrap(), "John");
        assert_eq!(
            required("name", None).unwrap_err().to_string(),
            "\"name\" is required"
        );
        assert_eq!(
            required("name", Some("  ")).unwrap_err().to_string(),
            "\"name\" is not allowed to be empty"
        );
    }

    #[test]
    fn test_email() {
        assert!(email("email", Some("john@gmail.com")).is_ok());
        for bad in ["john", "john@", "@gmail.com", "john@gmail", "jo hn@gmail.com", "a@b@c.com"] {
            assert_eq!(
                email("email", Some(bad)).unwrap_err().to_string(),
                "\"email\" must be a valid email",
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(uuid("postId", &id.to_string()).unwrap(), id);
        assert_eq!(
            uuid("postId", "not-a-uuid").unwrap_err().to_string(),
            "\"postId\" must be a valid GUID"
        );
    }

    #[test]
    fn test_at_least() {
        assert_eq!(at_least("page", 2, 1).unwrap(), 2);
        assert_eq!(
            at_least("page", 0, 1).unwrap_err().to_string(),
            "\"page\" must be greater than or equal to 1"
        );
        assert!(at_least("limit", -3, 1).is_err());
    }

    #[test]
    fn test_at_most() {
        assert_eq!(at_most("limit", 100, 100).unwrap(), 100);
        assert_eq!(
            at_most("limit", 101, 100).unwrap_err().to_string(),
            "\"limit\" must be less than or equal to 100"
        );
    }

    #[test]
    fn test_one_of() {
        let status: PostStatus = one_of("status", "DRAFT", &["DRAFT", "PUBLISHED"]).unwrap();
        assert_eq!(status, PostStatus::Draft);

        let err = one_of::<PostStatus>("status", "LIVE", &["DRAFT", "PUBLISHED"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "\"status\" must be one of [\"DRAFT\", \"PUBLISHED\"]"
        );
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("john@gmail.com"), "j***@gmail.com");
        assert_eq!(mask_email("j@gmail.com"), "***@gmail.com");
        assert_eq!(mask_email("nope"), "***");
    }
}
