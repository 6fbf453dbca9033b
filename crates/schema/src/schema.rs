use std::collections::HashMap;
use std::sync::LazyLock;

use parking_lot::RwLock;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ValidationError, Violation, ViolationKind};
use crate::spec::{DefaultValue, ParamKind, ParameterSpec};
use crate::values::ParameterValues;

/// Compiled `valid_regex` patterns, keyed by their source.
///
/// Schemas are `const` data, so patterns are compiled on first use and kept
/// for the life of the process. Broken patterns are cached as their error.
static PATTERNS: LazyLock<RwLock<HashMap<&'static str, Result<Regex, String>>>> =
    LazyLock::new(Default::default);

/// The full parameter contract of one action type.
///
/// A thin wrapper around a `'static` slice so it can be declared as a
/// `static` item next to the action it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParameterSchema {
    params: &'static [ParameterSpec],
}

impl ParameterSchema {
    /// Wrap a slice of field specs.
    #[must_use]
    pub const fn new(params: &'static [ParameterSpec]) -> Self {
        Self { params }
    }

    /// Schema with no declared fields.
    #[must_use]
    pub const fn empty() -> Self {
        Self { params: &[] }
    }

    /// Look up a field spec by wire name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'static ParameterSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Whether a field with `name` is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate over the field specs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &'static ParameterSpec> {
        self.params.iter()
    }

    /// Number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether no fields are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Validate `values` and return the normalised copy.
    ///
    /// Strings are trimmed unless the field is `no_trim`, and absent fields
    /// with a default receive it. Keys not declared in the schema pass
    /// through untouched. The first failed rule of every field is reported;
    /// all fields are checked before returning.
    pub fn validate(&self, values: &ParameterValues) -> Result<ParameterValues, ValidationError> {
        let mut normalised = values.clone();
        let mut violations = Vec::new();

        for spec in self.params {
            let value = normalise(spec, values.get(spec.name));
            if let Err(kind) = check(spec, value.as_ref()) {
                violations.push(Violation::new(spec.name, kind));
            }
            if let Some(value) = value {
                normalised.set(spec.name, value);
            }
        }

        if violations.is_empty() {
            Ok(normalised)
        } else {
            Err(ValidationError::new(violations))
        }
    }
}

impl<'a> IntoIterator for &'a ParameterSchema {
    type Item = &'static ParameterSpec;
    type IntoIter = std::slice::Iter<'static, ParameterSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

fn normalise(spec: &ParameterSpec, value: Option<&Value>) -> Option<Value> {
    match value {
        None => spec.default.map(DefaultValue::to_json),
        Some(Value::String(s)) if !spec.no_trim => Some(Value::String(s.trim().to_owned())),
        Some(v) => Some(v.clone()),
    }
}

fn check(spec: &ParameterSpec, value: Option<&Value>) -> Result<(), ViolationKind> {
    let Some(value) = value else {
        return if spec.required {
            Err(ViolationKind::MissingRequiredField)
        } else {
            Ok(())
        };
    };

    if spec.nonempty && is_empty(value) {
        return Err(ViolationKind::EmptyValueNotAllowed);
    }

    if !spec.empty_string && value.as_str() == Some("") {
        return Err(ViolationKind::EmptyStringNotAllowed);
    }

    if let Value::Array(items) = value {
        if !spec.null_elements {
            if let Some(index) = items.iter().position(Value::is_null) {
                return Err(ViolationKind::NullElementNotAllowed { index });
            }
        }
        if !spec.empty_string && items.iter().any(|item| item.as_str() == Some("")) {
            return Err(ViolationKind::EmptyStringNotAllowed);
        }
    }

    if !spec.kind.matches(value) {
        return Err(ViolationKind::TypeMismatch {
            expected: spec.kind.as_str(),
            actual: json_type(value),
        });
    }

    match value {
        Value::String(s) => check_string(spec, s),
        Value::Number(n) if spec.kind == ParamKind::Integer => check_number(spec, n.as_i64()),
        _ => Ok(()),
    }
}

fn compiled(pattern: &'static str) -> Result<Regex, ViolationKind> {
    let invalid = |reason| ViolationKind::InvalidPattern { pattern, reason };

    if let Some(cached) = PATTERNS.read().get(pattern) {
        return cached.clone().map_err(invalid);
    }

    let fresh = Regex::new(pattern).map_err(|e| e.to_string());
    PATTERNS
        .write()
        .entry(pattern)
        .or_insert(fresh)
        .clone()
        .map_err(invalid)
}

fn check_string(spec: &ParameterSpec, s: &str) -> Result<(), ViolationKind> {
    if !spec.valid_values.is_empty() && !spec.valid_values.contains(&s) {
        return Err(ViolationKind::ValueNotAllowed {
            value: s.to_owned(),
            allowed: spec.valid_values,
        });
    }

    if let Some(pattern) = spec.valid_regex {
        let re = compiled(pattern)?;
        if !re.is_match(s) {
            return Err(ViolationKind::PatternMismatch {
                value: s.to_owned(),
                pattern,
            });
        }
    }

    if spec.min_length.is_some() || spec.max_length.is_some() {
        let min = spec.min_length.unwrap_or(0);
        let max = spec.max_length.unwrap_or(usize::MAX);
        let length = s.chars().count();
        if length < min || length > max {
            return Err(ViolationKind::LengthOutOfRange { length, min, max });
        }
    }

    Ok(())
}

fn check_number(spec: &ParameterSpec, value: Option<i64>) -> Result<(), ViolationKind> {
    let Some((min, max)) = spec.number_range else {
        return Ok(());
    };
    // u64 values beyond i64::MAX are always above any declared bound.
    let value = value.unwrap_or(i64::MAX);
    if value < min || value > max {
        return Err(ViolationKind::NumberOutOfRange { value, min, max });
    }
    Ok(())
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}
