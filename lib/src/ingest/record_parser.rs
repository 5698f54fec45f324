// lib/src/ingest/record_parser.rs

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use models::{EventRecord, Identifier, ValidationError, ValidationResult};

/// Wire format of `created_time`.
pub const WIRE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const WIRE_TIME_LEN: usize = "2016-04-07T03:33:19Z".len();

pub const ACTOR_FIELD: &str = "actor";
pub const TARGET_FIELD: &str = "target";
pub const CREATED_TIME_FIELD: &str = "created_time";

/// Parses one JSON line into a validated event.
///
/// The line must be a JSON object with fields `actor`, `target` and
/// `created_time`. An identity must not be blank once trimmed, but is kept
/// exactly as written; numbers and booleans are taken in their JSON text
/// form. The timestamp must match `WIRE_TIME_FORMAT` exactly. Unknown fields
/// are ignored.
pub fn parse_record(line: &str) -> ValidationResult<EventRecord> {
    let value: Value = serde_json::from_str(line)
        .map_err(|e| ValidationError::MalformedRecord(e.to_string()))?;
    let Value::Object(fields) = value else {
        return Err(ValidationError::MalformedRecord("expected a JSON object".to_string()));
    };

    let actor = identity_field(&fields, ACTOR_FIELD)?;
    let target = identity_field(&fields, TARGET_FIELD)?;
    let created_time = string_field(&fields, CREATED_TIME_FIELD)?;
    let time = parse_timestamp(created_time)?;

    Ok(EventRecord::new(actor, target, time))
}

/// Parses a `created_time` value. chrono alone tolerates padding and
/// single-digit fields, so the fixed width is checked first.
pub fn parse_timestamp(raw: &str) -> ValidationResult<DateTime<Utc>> {
    if raw.len() != WIRE_TIME_LEN || raw.contains(char::is_whitespace) {
        return Err(ValidationError::InvalidTimestamp(raw.to_string()));
    }
    NaiveDateTime::parse_from_str(raw, WIRE_TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| ValidationError::InvalidTimestamp(raw.to_string()))
}

fn identity_field(fields: &Map<String, Value>, name: &'static str) -> ValidationResult<Identifier> {
    let raw = match fields.get(name) {
        None => return Err(ValidationError::MissingField(name)),
        Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(_) => return Err(ValidationError::InvalidFieldType(name)),
    };
    if raw.trim().is_empty() {
        return Err(ValidationError::EmptyIdentity(name));
    }
    Identifier::new(raw)
}

fn string_field<'a>(fields: &'a Map<String, Value>, name: &'static str) -> ValidationResult<&'a str> {
    match fields.get(name) {
        None => Err(ValidationError::MissingField(name)),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(ValidationError::InvalidFieldType(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn should_parse_valid_record() {
        let line = r#"{"created_time": "2016-04-07T03:33:19Z", "target": "Jamie-Korn", "actor": "Jordan-Gruber"}"#;
        let event = parse_record(line).unwrap();
        assert_eq!(event.actor().as_str(), "Jordan-Gruber");
        assert_eq!(event.target().as_str(), "Jamie-Korn");
        assert_eq!(event.time(), Utc.with_ymd_and_hms(2016, 4, 7, 3, 33, 19).unwrap());
    }

    #[test]
    fn should_keep_surrounding_whitespace_in_identities() {
        let line = r#"{"created_time": "2016-04-07T03:33:19Z", "target": " Jamie-Korn ", "actor": "\tJordan-Gruber"}"#;
        let event = parse_record(line).unwrap();
        assert_eq!(event.actor().as_str(), "\tJordan-Gruber");
        assert_eq!(event.target().as_str(), " Jamie-Korn ");
        assert_ne!(event.target(), Identifier::new("Jamie-Korn").unwrap());
    }

    #[test]
    fn should_reject_invalid_json() {
        assert!(matches!(parse_record("{\"actor\": "), Err(ValidationError::MalformedRecord(_))));
        assert!(matches!(parse_record("[1, 2]"), Err(ValidationError::MalformedRecord(_))));
        assert!(matches!(parse_record(""), Err(ValidationError::MalformedRecord(_))));
    }

    #[test]
    fn should_reject_missing_fields() {
        let no_actor = r#"{"created_time": "2016-04-07T03:33:19Z", "target": "b"}"#;
        assert_eq!(parse_record(no_actor), Err(ValidationError::MissingField("actor")));
        let no_target = r#"{"created_time": "2016-04-07T03:33:19Z", "actor": "a"}"#;
        assert_eq!(parse_record(no_target), Err(ValidationError::MissingField("target")));
        let no_time = r#"{"target": "b", "actor": "a"}"#;
        assert_eq!(parse_record(no_time), Err(ValidationError::MissingField("created_time")));
    }

    #[test]
    fn should_reject_empty_identities() {
        let blank = r#"{"created_time": "2016-04-07T03:33:19Z", "target": "b", "actor": "   "}"#;
        assert_eq!(parse_record(blank), Err(ValidationError::EmptyIdentity("actor")));
        let null = r#"{"created_time": "2016-04-07T03:33:19Z", "target": null, "actor": "a"}"#;
        assert_eq!(parse_record(null), Err(ValidationError::EmptyIdentity("target")));
    }

    #[test]
    fn should_take_scalar_identities_as_text() {
        let numeric = r#"{"created_time": "2016-04-07T03:33:19Z", "target": 7, "actor": true}"#;
        let event = parse_record(numeric).unwrap();
        assert_eq!(event.target().as_str(), "7");
        assert_eq!(event.actor().as_str(), "true");
    }

    #[test]
    fn should_reject_structured_identities() {
        let nested = r#"{"created_time": "2016-04-07T03:33:19Z", "target": {"id": 7}, "actor": "a"}"#;
        assert_eq!(parse_record(nested), Err(ValidationError::InvalidFieldType("target")));
        let list = r#"{"created_time": "2016-04-07T03:33:19Z", "target": "b", "actor": ["a"]}"#;
        assert_eq!(parse_record(list), Err(ValidationError::InvalidFieldType("actor")));
    }

    #[test]
    fn should_reject_bad_timestamps() {
        for raw in [
            "2016-04-07 03:33:19",
            "2016-04-07T03:33:19",
            "2016-13-07T03:33:19Z",
            " 2016-04-07T03:33:19Z ",
            " 2016-04-07T03:33:19Z",
            "2016-4-7T03:33:19Z",
            "2016-04-07T03:33: 9Z",
            "yesterday",
            "",
        ] {
            let line = format!(r#"{{"created_time": "{}", "target": "b", "actor": "a"}}"#, raw);
            assert_eq!(
                parse_record(&line),
                Err(ValidationError::InvalidTimestamp(raw.to_string())),
                "timestamp {:?} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn should_accept_self_payment() {
        let line = r#"{"created_time": "2016-04-07T03:33:19Z", "target": "a", "actor": "a"}"#;
        let event = parse_record(line).unwrap();
        assert!(event.is_self_loop());
        let spaced = r#"{"created_time": "2016-04-07T03:33:19Z", "target": "a ", "actor": "a"}"#;
        assert!(!parse_record(spaced).unwrap().is_self_loop());
    }
}
