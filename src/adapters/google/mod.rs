pub mod auth;
pub mod drive;
pub mod sheets;

pub use auth::{authenticate, GoogleSession, ServiceAccountKey};
pub use drive::GoogleDrive;
pub use sheets::GoogleSheets;

use crate::utils::error::{Result, SplitError};
use url::Url;

pub const DEFAULT_SHEETS_ENDPOINT: &str = "https://sheets.googleapis.com";
pub const DEFAULT_DRIVE_ENDPOINT: &str = "https://www.googleapis.com";

pub(crate) fn parse_endpoint(field: &str, endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint).map_err(|e| SplitError::InvalidConfigValueError {
        field: field.to_string(),
        value: endpoint.to_string(),
        reason: format!("Invalid URL format: {}", e),
    })?;
    if url.cannot_be_a_base() {
        return Err(SplitError::InvalidConfigValueError {
            field: field.to_string(),
            value: endpoint.to_string(),
            reason: "URL cannot be used as a base".to_string(),
        });
    }
    Ok(url)
}

/// Appends percent-encoded path segments to `base`.
pub(crate) fn api_url(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Turns a non-2xx response into a `RemoteError` carrying the body.
pub(crate) async fn check_status(
    service: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SplitError::RemoteError {
        service: service.to_string(),
        status: status.as_u16(),
        body,
    })
}
