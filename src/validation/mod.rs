//! Collected-violations validation of JSON object payloads.
//!
//! A [`Collection`] declares the exact field set a payload must have and the
//! constraints each field's value must meet. Validation never stops at the
//! first problem: every violation is reported with its property path.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonType {
    /// A number written with a fraction or exponent.
    Float,
}

impl JsonType {
    fn matches(self, value: &Value) -> bool {
        match self {
            JsonType::Float => value.as_number().is_some_and(|n| n.is_f64()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Rejects `null`, `false`, `""`, `[]` and `{}`.
    NotBlank,
    /// Rejects values of another JSON type. `null` passes.
    Type(JsonType),
}

impl Constraint {
    fn accepts(self, value: &Value) -> bool {
        match self {
            Constraint::NotBlank => !is_blank(value),
            Constraint::Type(_) if value.is_null() => true,
            Constraint::Type(kind) => kind.matches(value),
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(_) => false,
    }
}

/// One failed check, located by its bracketed property path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub property_path: String,
}

impl Violation {
    fn at(field: &str) -> Self {
        Self {
            property_path: format!("[{field}]"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Collection {
    fields: Vec<(&'static str, Vec<Constraint>)>,
    allow_missing_fields: bool,
    allow_extra_fields: bool,
}

impl Collection {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            allow_missing_fields: false,
            allow_extra_fields: false,
        }
    }

    pub fn field(mut self, name: &'static str, constraints: Vec<Constraint>) -> Self {
        self.fields.push((name, constraints));
        self
    }

    pub fn allow_missing_fields(mut self, allow: bool) -> Self {
        self.allow_missing_fields = allow;
        self
    }

    pub fn allow_extra_fields(mut self, allow: bool) -> Self {
        self.allow_extra_fields = allow;
        self
    }

    pub fn validate(&self, payload: &Map<String, Value>) -> Vec<Violation> {
        let mut violations = Vec::new();

        for (name, constraints) in &self.fields {
            match payload.get(*name) {
                Some(value) => violations.extend(
                    constraints
                        .iter()
                        .filter(|c| !c.accepts(value))
                        .map(|_| Violation::at(name)),
                ),
                None if !self.allow_missing_fields => {
                    violations.push(Violation::at(name))
                }
                None => {}
            }
        }

        if !self.allow_extra_fields {
            violations.extend(
                payload
                    .keys()
                    .filter(|key| !self.fields.iter().any(|(name, _)| *name == key.as_str()))
                    .map(|key| Violation::at(key)),
            );
        }

        violations
    }
}

impl Default for Collection {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns a raw body into an object map; anything else counts as empty.
pub fn object_or_empty(body: &[u8]) -> Map<String, Value> {
    match serde_json::from_slice(body) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn limit_collection() -> Collection {
        Collection::new().field(
            "limit",
            vec![Constraint::NotBlank, Constraint::Type(JsonType::Float)],
        )
    }

    fn paths(payload: Value) -> Vec<String> {
        let map = payload.as_object().cloned().unwrap_or_default();
        limit_collection()
            .validate(&map)
            .into_iter()
            .map(|v| v.property_path)
            .collect()
    }

    #[test]
    fn float_limit_passes() {
        assert!(paths(json!({ "limit": 500.0 })).is_empty());
        assert!(paths(json!({ "limit": 0.0 })).is_empty());
    }

    #[test]
    fn exponent_notation_is_a_float() {
        let map = object_or_empty(br#"{"limit": 5e2}"#);
        assert!(limit_collection().validate(&map).is_empty());
    }

    #[test]
    fn missing_field_is_reported_once() {
        let violations = limit_collection().validate(&Map::new());
        assert_eq!(
            violations,
            vec![Violation {
                property_path: "[limit]".into(),
            }]
        );
    }

    #[test]
    fn integer_and_string_limits_fail_type() {
        assert_eq!(paths(json!({ "limit": 500 })), vec!["[limit]"]);
        assert_eq!(paths(json!({ "limit": "500.0" })), vec!["[limit]"]);
    }

    #[test]
    fn null_limit_is_blank_only() {
        let map = object_or_empty(br#"{"limit": null}"#);
        assert_eq!(limit_collection().validate(&map).len(), 1);
        assert!(!Constraint::NotBlank.accepts(&Value::Null));
        assert!(Constraint::Type(JsonType::Float).accepts(&Value::Null));
    }

    #[test]
    fn empty_string_collects_both_violations() {
        assert_eq!(paths(json!({ "limit": "" })), vec!["[limit]", "[limit]"]);
    }

    #[test]
    fn extra_fields_are_reported_after_declared_ones() {
        assert_eq!(
            paths(json!({ "limit": 1, "currency": "USD" })),
            vec!["[limit]", "[currency]"]
        );
    }

    #[test]
    fn extra_fields_allowed_when_configured() {
        let map = object_or_empty(br#"{"limit": 1.5, "note": "x"}"#);
        let violations = limit_collection()
            .allow_extra_fields(true)
            .validate(&map);
        assert!(violations.is_empty());
    }

    #[test]
    fn zero_is_not_blank() {
        assert!(!is_blank(&json!(0)));
        assert!(!is_blank(&json!("0")));
        assert!(is_blank(&json!(false)));
        assert!(is_blank(&json!([])));
        assert!(is_blank(&json!({})));
    }

    #[test]
    fn malformed_or_non_object_bodies_are_empty() {
        assert!(object_or_empty(b"{not json").is_empty());
        assert!(object_or_empty(b"").is_empty());
        assert!(object_or_empty(b"[1, 2]").is_empty());
        assert!(object_or_empty(b"42").is_empty());
    }
}
