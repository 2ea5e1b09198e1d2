//! Client identifier derivation.

use http::HeaderMap;

/// The bucket shared by all requests without an attributable client.
///
/// Conservative on purpose: unattributed traffic competes for one counter
/// rather than each request getting a fresh, always-empty one.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Derives a stable client identifier from a trusted proxy-supplied header.
///
/// The header name is configuration (`cf-connecting-ip`, `x-forwarded-for`,
/// an API key header, ...). When the header is missing or not valid UTF-8,
/// every such request falls into the shared [`UNKNOWN_CLIENT`] bucket.
///
/// For comma-separated values like `X-Forwarded-For`, only the first entry
/// counts — the rest are appended by downstream proxies.
#[must_use]
pub fn client_identifier(headers: &HeaderMap, header_name: &str) -> String {
    headers
        .get(header_name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map_or_else(|| UNKNOWN_CLIENT.to_string(), str::to_string)
}
