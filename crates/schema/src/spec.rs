use serde::Serialize;
use serde_json::Value;

/// The wire type a parameter is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// A JSON string.
    String,
    /// A JSON integer (signed or unsigned).
    Integer,
    /// A JSON boolean.
    Boolean,
    /// A JSON array; member rules (`null_elements`, `empty_string`) apply.
    List,
    /// A JSON object.
    Map,
    /// Any JSON value; only presence rules apply.
    Any,
}

impl ParamKind {
    /// Whether `value` has this kind. `null` never matches.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
            Self::List => value.is_array(),
            Self::Map => value.is_object(),
            Self::Any => !value.is_null(),
        }
    }

    /// Lower-case name used in diagnostics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::List => "list",
            Self::Map => "map",
            Self::Any => "any",
        }
    }
}

/// Value substituted for an absent parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DefaultValue {
    /// Integer default, e.g. pagination `limit`.
    Int(i64),
    /// Boolean default.
    Bool(bool),
    /// String default.
    Str(&'static str),
}

impl DefaultValue {
    /// JSON form of the default.
    #[must_use]
    pub fn to_json(self) -> Value {
        match self {
            Self::Int(v) => Value::from(v),
            Self::Bool(v) => Value::Bool(v),
            Self::Str(v) => Value::from(v),
        }
    }
}

/// Validation contract for one action field.
///
/// Built with `const fn` builders so a whole schema can live in a `static`:
///
/// ```rust
/// use zsdk_schema::ParameterSpec;
///
/// const UUID: ParameterSpec = ParameterSpec::string("uuid").required().nonempty();
/// assert!(UUID.required);
/// assert!(!UUID.no_trim);
/// ```
///
/// Defaults match what generated actions declare for an optional field:
/// not required, empty values allowed, empty strings allowed, `null`
/// collection members rejected, strings trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParameterSpec {
    /// Wire name of the field (matches the action's serialized key).
    pub name: &'static str,
    /// Declared type.
    pub kind: ParamKind,
    /// Absent value is a violation.
    pub required: bool,
    /// Empty string or empty collection is a violation.
    pub nonempty: bool,
    /// Collections may contain `null` members.
    pub null_elements: bool,
    /// `""` is an acceptable value (also for string members of collections).
    pub empty_string: bool,
    /// Keep leading/trailing whitespace verbatim.
    pub no_trim: bool,
    /// Closed set of accepted string values; empty means unrestricted.
    pub valid_values: &'static [&'static str],
    /// Regex a string value must match.
    pub valid_regex: Option<&'static str>,
    /// Minimum string length in characters.
    pub min_length: Option<usize>,
    /// Maximum string length in characters.
    pub max_length: Option<usize>,
    /// Inclusive integer bounds.
    pub number_range: Option<(i64, i64)>,
    /// Value used when the field is absent.
    pub default: Option<DefaultValue>,
}

impl ParameterSpec {
    /// Create a spec with generated-action defaults.
    #[must_use]
    pub const fn new(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            nonempty: false,
            null_elements: false,
            empty_string: true,
            no_trim: false,
            valid_values: &[],
            valid_regex: None,
            min_length: None,
            max_length: None,
            number_range: None,
            default: None,
        }
    }

    /// String-typed field.
    #[must_use]
    pub const fn string(name: &'static str) -> Self {
        Self::new(name, ParamKind::String)
    }

    /// Integer-typed field.
    #[must_use]
    pub const fn integer(name: &'static str) -> Self {
        Self::new(name, ParamKind::Integer)
    }

    /// Boolean-typed field.
    #[must_use]
    pub const fn boolean(name: &'static str) -> Self {
        Self::new(name, ParamKind::Boolean)
    }

    /// Collection-typed field.
    #[must_use]
    pub const fn list(name: &'static str) -> Self {
        Self::new(name, ParamKind::List)
    }

    /// Object-typed field.
    #[must_use]
    pub const fn map(name: &'static str) -> Self {
        Self::new(name, ParamKind::Map)
    }

    /// Mark the field as mandatory.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Reject empty strings and empty collections.
    #[must_use]
    pub const fn nonempty(mut self) -> Self {
        self.nonempty = true;
        self
    }

    /// Allow `null` members in a collection.
    #[must_use]
    pub const fn allow_null_elements(mut self) -> Self {
        self.null_elements = true;
        self
    }

    /// Reject `""` while still accepting empty collections.
    #[must_use]
    pub const fn forbid_empty_string(mut self) -> Self {
        self.empty_string = false;
        self
    }

    /// Keep surrounding whitespace.
    #[must_use]
    pub const fn no_trim(mut self) -> Self {
        self.no_trim = true;
        self
    }

    /// Restrict a string to a closed set of values.
    #[must_use]
    pub const fn valid_values(mut self, values: &'static [&'static str]) -> Self {
        self.valid_values = values;
        self
    }

    /// Require a string to match `pattern`.
    #[must_use]
    pub const fn valid_regex(mut self, pattern: &'static str) -> Self {
        self.valid_regex = Some(pattern);
        self
    }

    /// Bound the string length (inclusive, in characters).
    #[must_use]
    pub const fn length(mut self, min: usize, max: usize) -> Self {
        self.min_length = Some(min);
        self.max_length = Some(max);
        self
    }

    /// Upper bound on the string length.
    #[must_use]
    pub const fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Bound an integer value (inclusive).
    #[must_use]
    pub const fn number_range(mut self, min: i64, max: i64) -> Self {
        self.number_range = Some((min, max));
        self
    }

    /// Integer default for an absent value.
    #[must_use]
    pub const fn default_int(mut self, value: i64) -> Self {
        self.default = Some(DefaultValue::Int(value));
        self
    }

    /// Boolean default for an absent value.
    #[must_use]
    pub const fn default_bool(mut self, value: bool) -> Self {
        self.default = Some(DefaultValue::Bool(value));
        self
    }

    /// String default for an absent value.
    #[must_use]
    pub const fn default_str(mut self, value: &'static str) -> Self {
        self.default = Some(DefaultValue::Str(value));
        self
    }
}
