//! Locating the schedule scheme inside upstream payloads.
//!
//! The upstream site is a Next.js page. Its data arrives either as the JSON
//! route payload (`pageProps.initialData.scheme`), as the full
//! `__NEXT_DATA__` document (`props.pageProps...`), or embedded in the HTML
//! page itself. Test fixtures and hand-written files usually carry the bare
//! scheme. All of these decode to the same [`Snapshot`].

use super::error::SourceError;
use crate::merchant::Snapshot;
use serde_json::Value;

/// JSON pointers tried in order; the empty pointer is the document root.
const SCHEME_POINTERS: [&str; 5] = [
    "/props/pageProps/initialData/scheme",
    "/pageProps/initialData/scheme",
    "/initialData/scheme",
    "/scheme",
    "",
];

const NEXT_DATA_MARKERS: [&str; 2] = ["id=\"__NEXT_DATA__\"", "id='__NEXT_DATA__'"];

fn is_scheme(value: &Value) -> bool {
    value.get("regions").is_some() || value.get("schedules").is_some()
}

/// Decode a response body (JSON or HTML) into a snapshot.
pub fn decode(body: &str) -> Result<Snapshot, SourceError> {
    let json = if body.trim_start().starts_with('<') {
        extract_next_data(body)?
    } else {
        body
    };
    decode_value(serde_json::from_str(json)?)
}

/// Decode an already parsed document.
pub fn decode_value(mut document: Value) -> Result<Snapshot, SourceError> {
    let pointer = SCHEME_POINTERS
        .iter()
        .find(|pointer| document.pointer(pointer).map_or(false, is_scheme))
        .ok_or(SourceError::MissingScheme)?;
    let scheme = document
        .pointer_mut(pointer)
        .map(Value::take)
        .ok_or(SourceError::MissingScheme)?;
    Ok(serde_json::from_value(scheme)?)
}

/// Body of the `<script id="__NEXT_DATA__">` element.
pub fn extract_next_data(html: &str) -> Result<&str, SourceError> {
    let marker = NEXT_DATA_MARKERS
        .iter()
        .find_map(|m| html.find(m))
        .ok_or(SourceError::NextDataNotFound)?;
    let open = marker
        + html[marker..]
            .find('>')
            .ok_or(SourceError::NextDataNotFound)?
        + 1;
    let close = open
        + html[open..]
            .find("</script>")
            .ok_or(SourceError::NextDataNotFound)?;
    Ok(html[open..close].trim())
}
