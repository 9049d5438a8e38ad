//! Shared response handling

use deskfit_core::{Service, UpstreamError, UpstreamErrorKind};

/// Map a transport-level failure
///
/// The request URL is dropped from the message since SerpApi carries its key
/// in the query string.
pub(crate) fn transport_error(service: Service, err: reqwest::Error) -> UpstreamError {
    let kind = if err.is_timeout() {
        UpstreamErrorKind::Timeout
    } else if err.is_decode() {
        UpstreamErrorKind::MalformedResponse
    } else {
        UpstreamErrorKind::Transport
    };
    UpstreamError::new(service, kind, err.without_url().to_string())
}

/// Map a non-success status, preferring the service's own message
pub(crate) fn status_error(service: Service, status: u16, message: Option<String>) -> UpstreamError {
    let kind = UpstreamError::kind_for_status(status);
    let message = message.unwrap_or_else(|| format!("HTTP {status}"));
    UpstreamError::new(service, kind, message)
}

/// Read the body and decode it, mapping failures onto the upstream taxonomy
pub(crate) async fn read_body(
    service: Service,
    response: reqwest::Response,
) -> Result<(u16, String), UpstreamError> {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| transport_error(service, e))?;
    Ok((status, body))
}

/// Decode a JSON body
pub(crate) fn decode<T: serde::de::DeserializeOwned>(
    service: Service,
    body: &str,
) -> Result<T, UpstreamError> {
    serde_json::from_str(body).map_err(|e| {
        UpstreamError::new(
            service,
            UpstreamErrorKind::MalformedResponse,
            format!("could not decode response: {e}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_prefers_service_message() {
        let err = status_error(Service::Model, 429, Some("Rate limit reached".to_string()));
        assert_eq!(err.kind, UpstreamErrorKind::RateLimited);
        assert_eq!(err.message, "Rate limit reached");

        let err = status_error(Service::Search, 502, None);
        assert_eq!(err.kind, UpstreamErrorKind::Service);
        assert_eq!(err.message, "HTTP 502");
    }

    #[test]
    fn decode_failure_is_malformed() {
        let err = decode::<serde_json::Value>(Service::Model, "not json").unwrap_err();
        assert_eq!(err.kind, UpstreamErrorKind::MalformedResponse);
    }
}
