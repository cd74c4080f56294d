use lec_core::errors::CoreError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Parse a `snake_case` enum value; `in-progress` is accepted for `in_progress`.
///
/// Failures are `CoreError::Validation` so they report as 422.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().to_lowercase().replace('-', "_");
    serde_json::from_value(Value::String(normalized))
        .map_err(|_| CoreError::Validation(format!("invalid {field} '{raw}'")).into())
}

/// Parse task parameters; absent means an empty object.
pub fn parse_params(raw: Option<&str>) -> anyhow::Result<Value> {
    let Some(raw) = raw else {
        return Ok(Value::Object(serde_json::Map::new()));
    };
    let value: Value = serde_json::from_str(raw)
        .map_err(|error| CoreError::Validation(format!("invalid params JSON: {error}")))?;
    if !value.is_object() {
        return Err(CoreError::Validation("params must be a JSON object".into()).into());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use lec_core::enums::{MaterialKind, TaskStatus};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_snake_case_enum() {
        let status: TaskStatus = parse_enum("completed", "status").expect("status should parse");
        assert_eq!(status, TaskStatus::Completed);
    }

    #[test]
    fn parses_hyphenated_alias() {
        let status: TaskStatus = parse_enum("in-progress", "status").expect("status should parse");
        assert_eq!(status, TaskStatus::InProgress);
        let kind: MaterialKind = parse_enum("Quiz", "kind").expect("kind should parse");
        assert_eq!(kind, MaterialKind::Quiz);
    }

    #[test]
    fn invalid_enum_is_a_validation_error() {
        let err = parse_enum::<TaskStatus>("done", "status").expect_err("should fail");
        assert!(err.to_string().contains("invalid status 'done'"));
        assert!(matches!(
            err.downcast_ref::<CoreError>(),
            Some(CoreError::Validation(_))
        ));
    }

    #[test]
    fn params_default_to_empty_object() {
        assert_eq!(parse_params(None).unwrap(), json!({}));
        assert_eq!(
            parse_params(Some(r#"{"questions": 10}"#)).unwrap(),
            json!({"questions": 10})
        );
    }

    #[test]
    fn params_must_be_an_object() {
        assert!(parse_params(Some("[1, 2]")).is_err());
        assert!(parse_params(Some("{not json")).is_err());
    }
}
