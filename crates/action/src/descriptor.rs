use std::fmt;

use serde::{Deserialize, Serialize};
use zsdk_schema::ParameterSchema;

/// HTTP verb an action is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// `GET`: fields travel in the query string.
    Get,
    /// `POST`: fields travel in the body.
    Post,
    /// `PUT`: fields travel in the body.
    Put,
    /// `DELETE`: fields travel in the query string.
    Delete,
}

impl HttpMethod {
    /// Upper-case verb.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Whether non-path fields go into the request body.
    #[must_use]
    pub fn carries_body(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for http::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

/// Binding from an action type to its REST endpoint.
///
/// One per action type, declared as part of a `static` [`ActionSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestDescriptor {
    /// HTTP verb.
    pub http_method: HttpMethod,
    /// Path template with `{fieldName}` placeholders.
    pub path: &'static str,
    /// Whether a session id or access key pair is mandatory.
    pub need_session: bool,
    /// Whether the server answers with a job handle that must be polled.
    pub need_poll: bool,
    /// Key the non-path fields are nested under; empty means top level.
    pub parameter_name: &'static str,
}

impl RestDescriptor {
    /// Session-bound, unpolled, flat-parameter descriptor.
    #[must_use]
    pub const fn new(http_method: HttpMethod, path: &'static str) -> Self {
        Self {
            http_method,
            path,
            need_session: true,
            need_poll: false,
            parameter_name: "",
        }
    }

    /// `GET` descriptor.
    #[must_use]
    pub const fn get(path: &'static str) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// `POST` descriptor.
    #[must_use]
    pub const fn post(path: &'static str) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// `PUT` descriptor.
    #[must_use]
    pub const fn put(path: &'static str) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    /// `DELETE` descriptor.
    #[must_use]
    pub const fn delete(path: &'static str) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// The endpoint may be called without credentials.
    #[must_use]
    pub const fn no_session(mut self) -> Self {
        self.need_session = false;
        self
    }

    /// The endpoint answers with a job handle to poll.
    #[must_use]
    pub const fn polled(mut self) -> Self {
        self.need_poll = true;
        self
    }

    /// Nest non-path fields under `name`.
    #[must_use]
    pub const fn nested_under(mut self, name: &'static str) -> Self {
        self.parameter_name = name;
        self
    }

    /// Placeholder names in the path template, in order.
    ///
    /// ```rust
    /// use zsdk_action::RestDescriptor;
    ///
    /// let rest = RestDescriptor::post("/eips/{eipUuid}/vm-instances/nics/{vmNicUuid}");
    /// let names: Vec<_> = rest.placeholders().collect();
    /// assert_eq!(names, ["eipUuid", "vmNicUuid"]);
    /// ```
    pub fn placeholders(&self) -> impl Iterator<Item = &'static str> + use<> {
        let path: &'static str = self.path;
        path.split('{')
            .skip(1)
            .filter_map(|segment| segment.split_once('}').map(|(name, _)| name))
    }
}

/// Everything static about one action type: its name, REST binding, and
/// parameter contract.
///
/// Declared once per action type as a `static`, so there is no lazy
/// initialisation to race on:
///
/// ```rust
/// use zsdk_action::{ActionSpec, RestDescriptor};
/// use zsdk_schema::{ParameterSchema, ParameterSpec};
///
/// static SPEC: ActionSpec = ActionSpec::new(
///     "DeleteEip",
///     RestDescriptor::delete("/eips/{uuid}"),
///     ParameterSchema::new(&[ParameterSpec::string("uuid").required().nonempty()]),
/// );
/// assert!(SPEC.undeclared_placeholders().next().is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionSpec {
    /// Action name, used in logs and the registry.
    pub name: &'static str,
    /// REST binding.
    pub rest: RestDescriptor,
    /// Parameter contract.
    pub schema: ParameterSchema,
}

impl ActionSpec {
    /// Bundle the static parts of an action type.
    #[must_use]
    pub const fn new(name: &'static str, rest: RestDescriptor, schema: ParameterSchema) -> Self {
        Self { name, rest, schema }
    }

    /// Path placeholders that have no matching schema field.
    ///
    /// Always empty for a well-formed action; non-empty means every call
    /// would fail with a missing path parameter.
    pub fn undeclared_placeholders(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rest
            .placeholders()
            .filter(|name| !self.schema.contains(name))
    }
}
