use crate::converter::HttpLike;
use crate::types::case_insensitive::CaseInsensitiveMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Duck-typed snapshot of an HTTP request, assembled from any `T` that
/// implements [`HttpLike`]. Validators only ever see this shape, never the
/// caller's own request type, which keeps [`crate::model::Operation`] free
/// of a generic parameter.
#[derive(Debug, Clone, Default)]
pub struct RawRequest {
    pub method: String,
    pub path: String,
    pub headers: CaseInsensitiveMap,
    pub query: HashMap<String, String>,
    pub body: Option<Value>,
}

impl RawRequest {
    pub fn from_http_like<T: Serialize>(request: &impl HttpLike<T>) -> Self {
        let headers = request
            .headers_ref()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect::<CaseInsensitiveMap>();

        let query = request
            .query_ref()
            .map(parse_query_string)
            .unwrap_or_default();

        Self {
            method: request.method_ref().as_str().to_lowercase(),
            path: request.path_ref().to_string(),
            headers,
            query,
            body: request.converted_body(),
        }
    }
}

/// Parses a raw query string (`a=1&b=2`) into percent-decoded key/value
/// pairs. A value-less key (`a&b`) maps to an empty string. Values
/// containing a literal `=` are kept intact since `a=b=c` splits on the
/// first `=` only.
pub fn parse_query_string(query: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let mut parts = pair.splitn(2, '=');
        let key = parts.next().unwrap_or_default();
        let value = parts.next().unwrap_or_default();
        let key = percent_encoding::percent_decode_str(key)
            .decode_utf8_lossy()
            .to_string();
        let value = percent_encoding::percent_decode_str(value)
            .decode_utf8_lossy()
            .to_string();
        if !key.is_empty() {
            map.insert(key, value);
        }
    }
    map
}

/// Duck-typed snapshot of an HTTP response, used by [`crate::model::Response::validate`].
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    pub status_code: String,
    pub headers: CaseInsensitiveMap,
    pub body: Option<Value>,
}
