use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};

use crate::args::DEFAULT_USER_AGENT;
use crate::error::HttpError;

/// Default headers followed by the custom ones.
///
/// The first custom entry for a wire name replaces the default; further
/// entries that differ only in case are appended, so every configured key is
/// sent.
///
/// # Errors
///
/// Returns an error when a header name or value is not valid on the wire.
pub fn build_header_map(custom: &BTreeMap<String, String>) -> Result<HeaderMap, HttpError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));

    let mut replaced: Vec<HeaderName> = Vec::with_capacity(custom.len());
    for (key, value) in custom {
        let name =
            HeaderName::from_bytes(key.as_bytes()).map_err(|err| HttpError::InvalidHeaderName {
                header: key.clone(),
                source: err,
            })?;
        let header_value =
            HeaderValue::from_str(value).map_err(|err| HttpError::InvalidHeaderValue {
                header: key.clone(),
                source: err,
            })?;
        if replaced.contains(&name) {
            headers.append(name, header_value);
        } else {
            headers.insert(name.clone(), header_value);
            replaced.push(name);
        }
    }
    Ok(headers)
}
