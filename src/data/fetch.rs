use crate::error::LoadError;
use std::time::Duration;

const USER_AGENT: &str = concat!("region-map/", env!("CARGO_PKG_VERSION"));
const TIMEOUT: Duration = Duration::from_secs(30);

/// GET `url` and return its body
pub fn fetch(url: &str) -> Result<Vec<u8>, LoadError> {
    let http_error = |source| LoadError::Http {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .map_err(http_error)?;

    let response = client.get(url).send().map_err(http_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.bytes().map(|b| b.to_vec()).map_err(http_error)
}
