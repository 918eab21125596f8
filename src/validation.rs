//! Field validation for task payloads.
//!
//! One declarative rule table drives both creation and update. Creation runs
//! in [`Mode::Strict`] (required fields must be present), update in
//! [`Mode::Partial`] (only supplied fields are checked, absent fields are
//! left untouched). Payloads arrive as raw JSON objects so an absent key and
//! an explicit null can be told apart, which is what gives partial updates
//! their semantics: null is only accepted where a field is nullable.
//!
//! Violations accumulate into [`validator::ValidationErrors`] keyed by field,
//! which the error boundary renders as `{message, errors: {field: [..]}}`.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use validator::{ValidationError, ValidationErrors};

use crate::models::{TaskPriority, TaskStatus};

/// Validation mode. Strict for create, Partial for update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Strict,
    Partial,
}

/// What a field's value must look like once present.
enum FieldKind {
    /// A JSON string, optionally capped at `max` characters.
    Text { max: Option<usize> },
    /// A JSON string drawn from a fixed set of names.
    Choice(&'static [&'static str]),
    /// A JSON string parseable as a date or date-time.
    Date,
}

/// One row of the rule table.
struct FieldRule {
    name: &'static str,
    required: bool,
    nullable: bool,
    kind: FieldKind,
}

/// The task rule table. Fields not listed here (`owner_id` included) are
/// ignored wherever they appear in a payload.
const TASK_FIELDS: &[FieldRule] = &[
    FieldRule {
        name: "title",
        required: true,
        nullable: false,
        kind: FieldKind::Text { max: Some(255) },
    },
    FieldRule {
        name: "description",
        required: false,
        nullable: true,
        kind: FieldKind::Text { max: None },
    },
    FieldRule {
        name: "status",
        required: false,
        nullable: false,
        kind: FieldKind::Choice(&TaskStatus::NAMES),
    },
    FieldRule {
        name: "priority",
        required: false,
        nullable: false,
        kind: FieldKind::Choice(&TaskPriority::NAMES),
    },
    FieldRule {
        name: "due_date",
        required: false,
        nullable: true,
        kind: FieldKind::Date,
    },
];

/// The validated change set produced from a payload.
///
/// The outer `Option` means "was the field supplied"; the inner `Option` on
/// nullable fields means "set to this value or clear it". Fields left `None`
/// must not be touched by the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl TaskChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }
}

/// Checks `payload` against the task rule table in the given mode.
///
/// A non-object payload validates as an empty object, so a strict run over
/// it reports the required fields as missing.
pub fn validate_task_payload(payload: &Value, mode: Mode) -> Result<TaskChanges, ValidationErrors> {
    let empty = serde_json::Map::new();
    let object = payload.as_object().unwrap_or(&empty);

    let mut errors = ValidationErrors::new();
    let mut changes = TaskChanges::default();

    for rule in TASK_FIELDS {
        match object.get(rule.name) {
            None => {
                if rule.required && mode == Mode::Strict {
                    errors.add(rule.name, rule_error("required", required_message(rule.name)));
                }
            }
            Some(Value::Null) => {
                if rule.nullable {
                    set_null(&mut changes, rule.name);
                } else if rule.required {
                    errors.add(rule.name, rule_error("required", required_message(rule.name)));
                } else {
                    errors.add(rule.name, invalid_value_error(rule));
                }
            }
            Some(value) => match check_value(rule, value) {
                Ok(()) => set_value(&mut changes, rule.name, value),
                Err(error) => errors.add(rule.name, error),
            },
        }
    }

    if errors.is_empty() {
        Ok(changes)
    } else {
        Err(errors)
    }
}

/// Accepts `YYYY-MM-DD HH:MM:SS`, RFC 3339, or a bare `YYYY-MM-DD` (midnight).
/// Naive inputs are taken as UTC.
pub fn parse_datetime(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    None
}

fn check_value(rule: &FieldRule, value: &Value) -> Result<(), ValidationError> {
    match &rule.kind {
        FieldKind::Text { max } => {
            let Some(text) = value.as_str() else {
                return Err(rule_error(
                    "string",
                    format!("The {} field must be a string.", label(rule.name)),
                ));
            };
            if rule.required && text.trim().is_empty() {
                return Err(rule_error("required", required_message(rule.name)));
            }
            if let Some(max) = max {
                if text.chars().count() > *max {
                    return Err(rule_error(
                        "max",
                        format!(
                            "The {} field must not be greater than {} characters.",
                            label(rule.name),
                            max
                        ),
                    ));
                }
            }
            Ok(())
        }
        FieldKind::Choice(names) => match value.as_str() {
            Some(text) if names.contains(&text) => Ok(()),
            _ => Err(invalid_value_error(rule)),
        },
        FieldKind::Date => match value.as_str().and_then(parse_datetime) {
            Some(_) => Ok(()),
            None => Err(rule_error(
                "date",
                format!("The {} field must be a valid date.", label(rule.name)),
            )),
        },
    }
}

/// Records an already-checked value into the change set.
fn set_value(changes: &mut TaskChanges, name: &str, value: &Value) {
    match name {
        "title" => changes.title = value.as_str().map(str::to_string),
        "description" => changes.description = value.as_str().map(|s| Some(s.to_string())),
        "status" => changes.status = value.as_str().and_then(TaskStatus::from_name),
        "priority" => changes.priority = value.as_str().and_then(TaskPriority::from_name),
        "due_date" => changes.due_date = value.as_str().and_then(parse_datetime).map(Some),
        _ => {}
    }
}

fn set_null(changes: &mut TaskChanges, name: &str) {
    match name {
        "description" => changes.description = Some(None),
        "due_date" => changes.due_date = Some(None),
        _ => {}
    }
}

fn rule_error(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Owned(message));
    error
}

fn invalid_value_error(rule: &FieldRule) -> ValidationError {
    rule_error("in", format!("The selected {} is invalid.", label(rule.name)))
}

fn required_message(name: &str) -> String {
    format!("The {} field is required.", label(name))
}

fn label(name: &str) -> String {
    name.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn field_messages(errors: &ValidationErrors, field: &str) -> Vec<String> {
        errors
            .field_errors()
            .get(field)
            .map(|errs| {
                errs.iter()
                    .map(|e| e.message.as_ref().unwrap().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn strict_mode_requires_title() {
        let errors = validate_task_payload(&json!({}), Mode::Strict).unwrap_err();
        assert_eq!(
            field_messages(&errors, "title"),
            vec!["The title field is required."]
        );

        let errors =
            validate_task_payload(&json!({"description": "no title"}), Mode::Strict).unwrap_err();
        assert!(!field_messages(&errors, "title").is_empty());
    }

    #[test]
    fn partial_mode_allows_absent_title() {
        let changes =
            validate_task_payload(&json!({"description": "only this"}), Mode::Partial).unwrap();
        assert_eq!(changes.title, None);
        assert_eq!(changes.description, Some(Some("only this".to_string())));
    }

    #[test]
    fn empty_title_fails_in_both_modes() {
        for mode in [Mode::Strict, Mode::Partial] {
            let errors = validate_task_payload(&json!({"title": ""}), mode).unwrap_err();
            assert_eq!(
                field_messages(&errors, "title"),
                vec!["The title field is required."]
            );
        }
    }

    #[test]
    fn title_over_255_chars_is_rejected() {
        let long = "a".repeat(256);
        let errors = validate_task_payload(&json!({ "title": long }), Mode::Strict).unwrap_err();
        assert_eq!(
            field_messages(&errors, "title"),
            vec!["The title field must not be greater than 255 characters."]
        );

        let exactly = "a".repeat(255);
        assert!(validate_task_payload(&json!({ "title": exactly }), Mode::Strict).is_ok());
    }

    #[test]
    fn title_must_be_a_string() {
        let errors = validate_task_payload(&json!({"title": 42}), Mode::Strict).unwrap_err();
        assert_eq!(
            field_messages(&errors, "title"),
            vec!["The title field must be a string."]
        );
    }

    #[test]
    fn status_and_priority_must_be_members_of_their_enumerations() {
        let errors = validate_task_payload(
            &json!({"title": "t", "status": "done", "priority": "critical"}),
            Mode::Strict,
        )
        .unwrap_err();
        assert_eq!(
            field_messages(&errors, "status"),
            vec!["The selected status is invalid."]
        );
        assert_eq!(
            field_messages(&errors, "priority"),
            vec!["The selected priority is invalid."]
        );

        let changes = validate_task_payload(
            &json!({"title": "t", "status": "in_progress", "priority": "urgent"}),
            Mode::Strict,
        )
        .unwrap();
        assert_eq!(changes.status, Some(TaskStatus::InProgress));
        assert_eq!(changes.priority, Some(TaskPriority::Urgent));
    }

    #[test]
    fn null_status_is_invalid_but_null_description_clears_it() {
        let errors = validate_task_payload(
            &json!({"title": "t", "status": null}),
            Mode::Partial,
        )
        .unwrap_err();
        assert_eq!(
            field_messages(&errors, "status"),
            vec!["The selected status is invalid."]
        );

        let changes =
            validate_task_payload(&json!({"description": null}), Mode::Partial).unwrap();
        assert_eq!(changes.description, Some(None));
    }

    #[test]
    fn due_date_accepts_the_wire_format_and_rejects_garbage() {
        let changes = validate_task_payload(
            &json!({"title": "t", "due_date": "2026-08-07 09:30:00"}),
            Mode::Strict,
        )
        .unwrap();
        let due = changes.due_date.unwrap().unwrap();
        assert_eq!(due.format("%Y-%m-%d %H:%M:%S").to_string(), "2026-08-07 09:30:00");

        assert!(validate_task_payload(
            &json!({"title": "t", "due_date": "2026-08-07T09:30:00Z"}),
            Mode::Strict
        )
        .is_ok());
        assert!(validate_task_payload(
            &json!({"title": "t", "due_date": "2026-08-07"}),
            Mode::Strict
        )
        .is_ok());

        let errors = validate_task_payload(
            &json!({"title": "t", "due_date": "next tuesday"}),
            Mode::Strict,
        )
        .unwrap_err();
        assert_eq!(
            field_messages(&errors, "due_date"),
            vec!["The due date field must be a valid date."]
        );
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let changes = validate_task_payload(
            &json!({"title": "t", "owner_id": 999, "bogus": true}),
            Mode::Strict,
        )
        .unwrap();
        assert_eq!(changes.title, Some("t".to_string()));
        // Nothing else supplied, nothing else recorded.
        assert_eq!(changes.status, None);
        assert_eq!(changes.priority, None);
    }

    #[test]
    fn non_object_payload_validates_as_empty() {
        let errors = validate_task_payload(&json!("not an object"), Mode::Strict).unwrap_err();
        assert!(!field_messages(&errors, "title").is_empty());

        let changes = validate_task_payload(&json!(null), Mode::Partial).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn parse_datetime_truncates_to_seconds_on_format() {
        let dt = parse_datetime("2026-01-02T03:04:05.678Z").unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M:%S").to_string(), "2026-01-02 03:04:05");
    }
}
