/// What went wrong with a single field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ViolationKind {
    /// A required field has no value.
    #[error("missing mandatory field")]
    MissingRequiredField,

    /// A `nonempty` field holds an empty string or collection.
    #[error("cannot be empty")]
    EmptyValueNotAllowed,

    /// The field (or a string member of it) is `""` but empty strings are forbidden.
    #[error("cannot be an empty string")]
    EmptyStringNotAllowed,

    /// A collection contains a `null` member.
    #[error("cannot contain a null element (index {index})")]
    NullElementNotAllowed {
        /// Position of the first `null` member.
        index: usize,
    },

    /// Value has the wrong JSON type.
    #[error("expected {expected}, got {actual}")]
    TypeMismatch {
        /// Declared type name.
        expected: &'static str,
        /// Observed JSON type name.
        actual: &'static str,
    },

    /// Value is not in the declared set of valid values.
    #[error("value `{value}` is not one of {allowed:?}")]
    ValueNotAllowed {
        /// The rejected value.
        value: String,
        /// Accepted values.
        allowed: &'static [&'static str],
    },

    /// Value does not match the declared regex.
    #[error("value `{value}` does not match `{pattern}`")]
    PatternMismatch {
        /// The rejected value.
        value: String,
        /// Declared pattern.
        pattern: &'static str,
    },

    /// The declared regex itself does not compile.
    #[error("invalid pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// Declared pattern.
        pattern: &'static str,
        /// Compiler message.
        reason: String,
    },

    /// String length is outside the declared bounds.
    #[error("length {length} is out of range [{min}, {max}]")]
    LengthOutOfRange {
        /// Observed length in characters.
        length: usize,
        /// Lower bound.
        min: usize,
        /// Upper bound.
        max: usize,
    },

    /// Integer is outside the declared bounds.
    #[error("{value} is out of range [{min}, {max}]")]
    NumberOutOfRange {
        /// Observed value.
        value: i64,
        /// Lower bound.
        min: i64,
        /// Upper bound.
        max: i64,
    },
}

impl ViolationKind {
    /// Machine-readable code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingRequiredField => "PARAM_MISSING_REQUIRED",
            Self::EmptyValueNotAllowed => "PARAM_EMPTY_VALUE",
            Self::EmptyStringNotAllowed => "PARAM_EMPTY_STRING",
            Self::NullElementNotAllowed { .. } => "PARAM_NULL_ELEMENT",
            Self::TypeMismatch { .. } => "PARAM_INVALID_TYPE",
            Self::ValueNotAllowed { .. } => "PARAM_INVALID_VALUE",
            Self::PatternMismatch { .. } => "PARAM_PATTERN",
            Self::InvalidPattern { .. } => "PARAM_BAD_PATTERN",
            Self::LengthOutOfRange { .. } => "PARAM_LENGTH",
            Self::NumberOutOfRange { .. } => "PARAM_RANGE",
        }
    }
}

/// A rule violation on one named field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("field[{field}] {kind}")]
pub struct Violation {
    /// Field the violation belongs to.
    pub field: &'static str,
    /// The failed rule.
    pub kind: ViolationKind,
}

impl Violation {
    /// Create a violation.
    #[must_use]
    pub fn new(field: &'static str, kind: ViolationKind) -> Self {
        Self { field, kind }
    }
}

/// Every violation found in one validation pass.
///
/// Never empty: [`ParameterSchema::validate`](crate::ParameterSchema::validate)
/// only returns this when at least one field failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("parameter validation failed: {}", join(.violations))]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    pub(crate) fn new(violations: Vec<Violation>) -> Self {
        debug_assert!(!violations.is_empty());
        Self { violations }
    }

    /// All violations in schema declaration order.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// The violation recorded for `field`, if any.
    #[must_use]
    pub fn for_field(&self, field: &str) -> Option<&ViolationKind> {
        self.violations
            .iter()
            .find(|v| v.field == field)
            .map(|v| &v.kind)
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
