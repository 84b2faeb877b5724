use std::net::IpAddr;
use thiserror::Error;
use url::Url;

/// Why an API base URL was refused.
#[derive(Error, Debug)]
pub enum BaseUrlError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// Plain HTTP would expose the bearer token on the wire.
    #[error("HTTPS required for non-local API host: {0}")]
    Insecure(String),
}

/// Validate the platform API base URL.
///
/// HTTPS is required, except for loopback hosts (`localhost`, `127.0.0.1`,
/// `::1`) so a development backend and test servers can run over plain HTTP.
/// A trailing slash is removed so endpoint paths can be appended directly.
///
/// ```
/// use edutree::util::validate_base_url;
///
/// assert!(validate_base_url("https://api.example.edu/v1").is_ok());
/// assert!(validate_base_url("http://localhost:3000/api").is_ok());
/// assert!(validate_base_url("http://api.example.edu").is_err());
/// ```
pub fn validate_base_url(raw: &str) -> Result<Url, BaseUrlError> {
    let mut url = Url::parse(raw.trim())?;

    match url.scheme() {
        "https" => {}
        "http" if is_loopback(&url) => {
            tracing::warn!(base_url = %url, "Using plain HTTP API base URL (loopback only)");
        }
        "http" => {
            return Err(BaseUrlError::Insecure(
                url.host_str().unwrap_or_default().to_owned(),
            ))
        }
        scheme => return Err(BaseUrlError::UnsupportedScheme(scheme.to_owned())),
    }

    let trimmed = url.path().trim_end_matches('/').to_owned();
    url.set_path(&trimmed);
    Ok(url)
}

fn is_loopback(url: &Url) -> bool {
    match url.host_str() {
        Some("localhost") => true,
        Some(host) => host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .map(|ip| ip.is_loopback())
            .unwrap_or(false),
        None => false,
    }
}
