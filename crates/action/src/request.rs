//! Turning a validated field map into a [`RawRequest`].

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::{Map, Value};
use zsdk_schema::ParameterValues;

use crate::credentials::Credentials;
use crate::descriptor::ActionSpec;
use crate::error::InvokeError;
use crate::transport::RawRequest;

/// Fields that stay at the top level even when parameters are nested.
const TOP_LEVEL_FIELDS: [&str; 2] = ["systemTags", "userTags"];

/// Everything but RFC 3986 unreserved characters is escaped in a segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Build the request for one call from already-normalised values.
pub(crate) fn build_request(
    spec: &ActionSpec,
    values: ParameterValues,
    credentials: &Credentials,
) -> Result<RawRequest, InvokeError> {
    let rest = &spec.rest;
    let path = resolve_path(rest.path, &values)?;

    let mut fields = values.into_map();
    for name in rest.placeholders() {
        fields.remove(name);
    }
    fields.retain(|_, v| !v.is_null());

    let payload = route(fields, rest.parameter_name);

    let mut request = RawRequest::new(rest.http_method, path);
    if rest.http_method.carries_body() {
        request.body = Some(Value::Object(payload));
    } else if !payload.is_empty() {
        request.query = Some(payload);
    }
    request.auth = credentials.auth();
    request.request_ip.clone_from(&credentials.request_ip);
    Ok(request)
}

/// Substitute every `{name}` in `template` with the stringified field value.
///
/// Values are percent-encoded so each one stays a single path segment.
pub(crate) fn resolve_path(
    template: &'static str,
    values: &ParameterValues,
) -> Result<String, InvokeError> {
    let mut path = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|i| open + i) else {
            break;
        };
        let name = &rest[open + 1..close];
        let segment = values
            .get(name)
            .and_then(path_segment)
            .ok_or_else(|| InvokeError::MissingPathParameter {
                path: template,
                placeholder: name.to_owned(),
            })?;
        path.push_str(&rest[..open]);
        path.push_str(&segment);
        rest = &rest[close + 1..];
    }

    path.push_str(rest);
    Ok(path)
}

fn path_segment(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(encode_segment(s)),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn encode_segment(raw: &str) -> String {
    match raw {
        // Dot segments are removed by path normalisation.
        "." => "%2E".to_owned(),
        ".." => "%2E%2E".to_owned(),
        _ => utf8_percent_encode(raw, SEGMENT).to_string(),
    }
}

fn route(mut fields: Map<String, Value>, parameter_name: &str) -> Map<String, Value> {
    if parameter_name.is_empty() {
        return fields;
    }

    let mut payload = Map::new();
    for name in TOP_LEVEL_FIELDS {
        if let Some(tags) = fields.remove(name) {
            payload.insert(name.to_owned(), tags);
        }
    }
    payload.insert(parameter_name.to_owned(), Value::Object(fields));
    payload
}
