//! Input validation for todo routes.

use std::collections::HashMap;

use crate::http::error::{ApiError, FieldError};

/// Parse a todo id: an integer greater than zero.
pub fn parse_id(field: &str, raw: &str) -> Result<u64, ApiError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ApiError::validation(vec![FieldError::new(field, "ID must be an integer.")]))?;

    if value < 1 {
        return Err(ApiError::validation(vec![FieldError::new(
            field,
            "ID must be greater than zero.",
        )]));
    }
    Ok(value as u64)
}

/// Validate the list/get query string: only an optional `id` is accepted.
pub fn parse_todo_query(query: &HashMap<String, String>) -> Result<Option<u64>, ApiError> {
    let mut unknown: Vec<_> = query
        .keys()
        .filter(|key| key.as_str() != "id")
        .map(|key| FieldError::new(key.clone(), "Invalid parameter"))
        .collect();
    if !unknown.is_empty() {
        unknown.sort_by(|a, b| a.field.cmp(&b.field));
        return Err(ApiError::validation(unknown));
    }

    query.get("id").map(|raw| parse_id("id", raw)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn details(err: ApiError) -> Vec<FieldError> {
        match err {
            ApiError::Validation { details, .. } => details,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("id", "42").unwrap(), 42);
        assert_eq!(
            details(parse_id("id", "abc").unwrap_err())[0].message,
            "ID must be an integer."
        );
        assert_eq!(
            details(parse_id("id", "0").unwrap_err())[0].message,
            "ID must be greater than zero."
        );
        assert_eq!(
            details(parse_id("id", "-3").unwrap_err())[0].message,
            "ID must be greater than zero."
        );
    }

    #[test]
    fn test_query_accepts_only_id() {
        assert_eq!(parse_todo_query(&query(&[])).unwrap(), None);
        assert_eq!(parse_todo_query(&query(&[("id", "3")])).unwrap(), Some(3));

        let errs = details(parse_todo_query(&query(&[("id", "1"), ("sort", "x"), ("page", "2")])).unwrap_err());
        assert_eq!(
            errs,
            vec![
                FieldError::new("page", "Invalid parameter"),
                FieldError::new("sort", "Invalid parameter"),
            ]
        );
    }
}
