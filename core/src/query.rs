//! Query string and URL assembly.

use crate::endpoint::Params;

/// Query keys the client always sets itself.
pub const RESERVED_KEYS: [&str; 2] = ["key", "source"];

/// Percent-encode `pairs` into `k=v&k=v`. Pairs whose value is `None` are
/// skipped. Spaces become `%20`.
pub fn build_query_string<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    pairs
        .into_iter()
        .filter_map(|(k, v)| {
            v.map(|v| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Copy `params` without any reserved keys (ASCII case-insensitive), then
/// append `key` and `source` with the client's own values.
pub fn with_reserved(params: &Params, api_key: &str, source: &str) -> Vec<(String, String)> {
    let mut merged: Vec<(String, String)> = params
        .iter()
        .filter(|(k, _)| !is_reserved(k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    merged.push(("key".to_string(), api_key.to_string()));
    merged.push(("source".to_string(), source.to_string()));
    merged
}

fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.iter().any(|r| r.eq_ignore_ascii_case(key))
}

/// `{base_url}/{path}`, followed by `?{query}` only when the query is non-empty.
pub fn build_url(base_url: &str, path: &str, query: &str) -> String {
    let path = path.trim_start_matches('/');
    if query.is_empty() {
        format!("{base_url}/{path}")
    } else {
        format!("{base_url}/{path}?{query}")
    }
}
