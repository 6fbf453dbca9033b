//! # zsdk Schema
//!
//! Per-action parameter contracts, built at compile time.
//!
//! Every action type declares one [`ParameterSchema`]: an ordered slice of
//! [`ParameterSpec`] field descriptors living in a `static`. Nothing is
//! discovered at run time and nothing is lazily cached. The schema is read
//! only, so it can be shared freely across threads.
//!
//! ## Validation
//!
//! [`ParameterSchema::validate`] checks a [`ParameterValues`] map against the
//! declared fields and returns a *normalised* copy: strings trimmed (unless
//! the field opts out with `no_trim`) and absent fields filled with their
//! declared default. All violations are collected into one
//! [`ValidationError`] so a single call yields a complete diagnostic.
//!
//! ```rust
//! use zsdk_schema::{ParameterSchema, ParameterSpec, ParameterValues};
//!
//! static SCHEMA: ParameterSchema = ParameterSchema::new(&[
//!     ParameterSpec::string("name").required().nonempty(),
//!     ParameterSpec::integer("limit").default_int(1000),
//! ]);
//!
//! let mut values = ParameterValues::new();
//! values.set("name", serde_json::json!("  web-1 "));
//!
//! let normalised = SCHEMA.validate(&values).unwrap();
//! assert_eq!(normalised.get_string("name"), Some("web-1"));
//! assert_eq!(normalised.get_i64("limit"), Some(1000));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Validation error types.
pub mod error;
/// The per-action schema and its validation pass.
pub mod schema;
/// Per-field parameter contracts.
pub mod spec;
/// Field value maps.
pub mod values;

pub use error::{ValidationError, Violation, ViolationKind};
pub use schema::ParameterSchema;
pub use spec::{DefaultValue, ParamKind, ParameterSpec};
pub use values::ParameterValues;

/// Convenience re-exports for action authors.
pub mod prelude {
    pub use crate::error::{ValidationError, Violation, ViolationKind};
    pub use crate::schema::ParameterSchema;
    pub use crate::spec::{DefaultValue, ParamKind, ParameterSpec};
    pub use crate::values::ParameterValues;
}
