//! Field-by-field reader over an untyped JSON payload.
//!
//! Reading never stops at the first problem: every violation is pushed onto
//! the shared issue list with its dotted path, and the caller decides at the
//! end whether the payload is usable. A field under a parent that was itself
//! invalid reads as absent without adding noise.

use serde_json::{Map, Value};
use url::Url;

use super::PayloadIssue;

pub(crate) type Issues = Vec<PayloadIssue>;

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

/// A view onto one JSON object at a known path.
#[derive(Clone)]
pub(crate) struct Fields<'v> {
    obj: Option<&'v Map<String, Value>>,
    path: String,
}

impl<'v> Fields<'v> {
    /// Reads the document root, which must be an object.
    pub fn root(value: &'v Value, issues: &mut Issues) -> Self {
        let obj = match value {
            Value::Object(map) => Some(map),
            other => {
                issues.push(PayloadIssue::new(
                    "",
                    format!("Expected object, received {}", kind_of(other)),
                ));
                None
            }
        };
        Self {
            obj,
            path: String::new(),
        }
    }

    pub fn path_of(&self, key: &str) -> String {
        join(&self.path, key)
    }

    /// Present and non-null value.
    fn present(&self, key: &str) -> Option<&'v Value> {
        self.obj?.get(key).filter(|v| !v.is_null())
    }

    /// Reports a missing or null required field. Returns `None` when the
    /// parent itself is unreadable.
    fn require(&self, key: &str, issues: &mut Issues) -> Option<&'v Value> {
        let obj = self.obj?;
        match obj.get(key) {
            None => {
                issues.push(PayloadIssue::new(self.path_of(key), "Required"));
                None
            }
            Some(Value::Null) => {
                issues.push(PayloadIssue::new(
                    self.path_of(key),
                    "Expected a value, received null",
                ));
                None
            }
            Some(value) => Some(value),
        }
    }

    fn mismatch(&self, key: &str, expected: &str, got: &Value, issues: &mut Issues) {
        issues.push(PayloadIssue::new(
            self.path_of(key),
            format!("Expected {}, received {}", expected, kind_of(got)),
        ));
    }

    fn as_object(&self, key: &str, value: &'v Value, issues: &mut Issues) -> Option<Fields<'v>> {
        match value {
            Value::Object(map) => Some(Fields {
                obj: Some(map),
                path: self.path_of(key),
            }),
            other => {
                self.mismatch(key, "object", other, issues);
                None
            }
        }
    }

    pub fn required_object(&self, key: &str, issues: &mut Issues) -> Option<Fields<'v>> {
        let value = self.require(key, issues)?;
        self.as_object(key, value, issues)
    }

    /// Absent or null reads as `None`.
    pub fn optional_object(&self, key: &str, issues: &mut Issues) -> Option<Fields<'v>> {
        let value = self.present(key)?;
        self.as_object(key, value, issues)
    }

    fn as_string(&self, key: &str, value: &'v Value, issues: &mut Issues) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            other => {
                self.mismatch(key, "string", other, issues);
                None
            }
        }
    }

    pub fn required_string(&self, key: &str, issues: &mut Issues) -> Option<String> {
        let value = self.require(key, issues)?;
        self.as_string(key, value, issues)
    }

    /// Required string that must contain something other than whitespace.
    pub fn required_non_blank(&self, key: &str, issues: &mut Issues) -> Option<String> {
        let value = self.required_string(key, issues)?;
        if value.trim().is_empty() {
            issues.push(PayloadIssue::new(self.path_of(key), "Must not be empty"));
            return None;
        }
        Some(value)
    }

    pub fn optional_string(&self, key: &str, issues: &mut Issues) -> Option<String> {
        let value = self.present(key)?;
        self.as_string(key, value, issues)
    }

    /// Required string equal to `expected`.
    pub fn literal(&self, key: &str, expected: &str, issues: &mut Issues) -> Option<String> {
        let value = self.required_string(key, issues)?;
        if value != expected {
            issues.push(PayloadIssue::new(
                self.path_of(key),
                format!("Invalid literal value, expected \"{}\"", expected),
            ));
            return None;
        }
        Some(value)
    }

    /// Required string drawn from a closed set.
    pub fn one_of(&self, key: &str, allowed: &[&str], issues: &mut Issues) -> Option<String> {
        let value = self.required_string(key, issues)?;
        if !allowed.contains(&value.as_str()) {
            let expected = allowed
                .iter()
                .map(|a| format!("'{}'", a))
                .collect::<Vec<_>>()
                .join(" | ");
            issues.push(PayloadIssue::new(
                self.path_of(key),
                format!("Invalid enum value. Expected {}, received '{}'", expected, value),
            ));
            return None;
        }
        Some(value)
    }

    /// Optional absolute URL.
    pub fn optional_url(&self, key: &str, issues: &mut Issues) -> Option<String> {
        let value = self.optional_string(key, issues)?;
        if Url::parse(&value).is_err() {
            issues.push(PayloadIssue::new(self.path_of(key), "Invalid url"));
            return None;
        }
        Some(value)
    }

    fn as_bool(&self, key: &str, value: &Value, issues: &mut Issues) -> Option<bool> {
        match value {
            Value::Bool(b) => Some(*b),
            other => {
                self.mismatch(key, "boolean", other, issues);
                None
            }
        }
    }

    pub fn required_bool(&self, key: &str, issues: &mut Issues) -> Option<bool> {
        let value = self.require(key, issues)?;
        self.as_bool(key, value, issues)
    }

    /// Optional boolean; absent or null yields `default`.
    pub fn bool_or(&self, key: &str, default: bool, issues: &mut Issues) -> Option<bool> {
        match self.present(key) {
            None => Some(default),
            Some(value) => self.as_bool(key, value, issues),
        }
    }

    /// Required integer no smaller than `min`.
    pub fn int_at_least(&self, key: &str, min: i64, issues: &mut Issues) -> Option<i64> {
        let value = self.require(key, issues)?;
        let Some(number) = value.as_i64() else {
            let message = if value.is_number() {
                "Expected integer, received float".to_string()
            } else {
                format!("Expected number, received {}", kind_of(value))
            };
            issues.push(PayloadIssue::new(self.path_of(key), message));
            return None;
        };
        if number < min {
            issues.push(PayloadIssue::new(
                self.path_of(key),
                format!("Number must be greater than or equal to {}", min),
            ));
            return None;
        }
        Some(number)
    }

    /// Required number within `[min, max]`.
    pub fn number_in(&self, key: &str, min: f64, max: f64, issues: &mut Issues) -> Option<f64> {
        let value = self.require(key, issues)?;
        let Some(number) = value.as_f64() else {
            self.mismatch(key, "number", value, issues);
            return None;
        };
        if number < min || number > max {
            issues.push(PayloadIssue::new(
                self.path_of(key),
                format!("Number must be between {} and {}", min, max),
            ));
            return None;
        }
        Some(number)
    }

    /// Optional list of strings; absent or null yields an empty list.
    pub fn string_list(&self, key: &str, issues: &mut Issues) -> Option<Vec<String>> {
        let Some(value) = self.present(key) else {
            return Some(Vec::new());
        };
        let Value::Array(items) = value else {
            self.mismatch(key, "array", value, issues);
            return None;
        };

        let mut out = Vec::with_capacity(items.len());
        let mut ok = true;
        for (i, item) in items.iter().enumerate() {
            match item {
                Value::String(s) => out.push(s.clone()),
                other => {
                    ok = false;
                    issues.push(PayloadIssue::new(
                        format!("{}.{}", self.path_of(key), i),
                        format!("Expected string, received {}", kind_of(other)),
                    ));
                }
            }
        }
        ok.then_some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_object_root_is_reported_at_root() {
        let mut issues = Issues::new();
        let value = json!([1, 2]);
        let fields = Fields::root(&value, &mut issues);

        assert!(fields.required_string("id", &mut issues).is_none());
        assert_eq!(issues, vec![PayloadIssue::new("root", "Expected object, received array")]);
    }

    #[test]
    fn nested_paths_are_dotted() {
        let mut issues = Issues::new();
        let value = json!({"campaign": {"venue": {"geo": {"lat": 100.0, "lon": 0}}}});
        let root = Fields::root(&value, &mut issues);
        let geo = root
            .required_object("campaign", &mut issues)
            .and_then(|c| c.optional_object("venue", &mut issues))
            .and_then(|v| v.optional_object("geo", &mut issues))
            .unwrap();

        assert!(geo.number_in("lat", -90.0, 90.0, &mut issues).is_none());
        assert_eq!(geo.number_in("lon", -180.0, 180.0, &mut issues), Some(0.0));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "campaign.venue.geo.lat");
    }

    #[test]
    fn null_optional_reads_as_absent() {
        let mut issues = Issues::new();
        let value = json!({"subtitle": null, "tags": null});
        let root = Fields::root(&value, &mut issues);

        assert!(root.optional_string("subtitle", &mut issues).is_none());
        assert_eq!(root.string_list("tags", &mut issues), Some(vec![]));
        assert_eq!(root.bool_or("public", false, &mut issues), Some(false));
        assert!(issues.is_empty());
    }

    #[test]
    fn null_required_is_an_issue() {
        let mut issues = Issues::new();
        let value = json!({"name": null});
        let root = Fields::root(&value, &mut issues);

        assert!(root.required_string("name", &mut issues).is_none());
        assert_eq!(issues[0].path, "name");
    }

    #[test]
    fn version_must_be_positive_integer() {
        let mut issues = Issues::new();
        let value = json!({"a": 0, "b": 1.5, "c": "1", "d": 2});
        let root = Fields::root(&value, &mut issues);

        assert!(root.int_at_least("a", 1, &mut issues).is_none());
        assert!(root.int_at_least("b", 1, &mut issues).is_none());
        assert!(root.int_at_least("c", 1, &mut issues).is_none());
        assert_eq!(root.int_at_least("d", 1, &mut issues), Some(2));
        assert_eq!(issues.len(), 3);
    }

    #[test]
    fn string_list_reports_each_bad_element() {
        let mut issues = Issues::new();
        let value = json!({"tags": ["ok", 3, false]});
        let root = Fields::root(&value, &mut issues);

        assert!(root.string_list("tags", &mut issues).is_none());
        let paths: Vec<_> = issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["tags.1", "tags.2"]);
    }

    #[test]
    fn url_must_be_absolute() {
        let mut issues = Issues::new();
        let value = json!({"good": "https://example.com/x", "bad": "/relative"});
        let root = Fields::root(&value, &mut issues);

        assert!(root.optional_url("good", &mut issues).is_some());
        assert!(root.optional_url("bad", &mut issues).is_none());
        assert_eq!(issues, vec![PayloadIssue::new("bad", "Invalid url")]);
    }
}
