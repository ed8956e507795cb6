//! Client IP extraction for rate limiting.

use axum::http::HeaderMap;

/// The rate-limit bucket used when no forwarded client IP is present.
///
/// Requests reaching the service without an `X-Forwarded-For` header all
/// share this bucket.
pub(crate) const UNKNOWN_IP: &str = "unknown";

/// Gets the client IP from the first hop of `X-Forwarded-For`, falling back
/// to [`UNKNOWN_IP`].
pub(crate) fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map_or_else(|| UNKNOWN_IP.to_owned(), ToOwned::to_owned)
}
