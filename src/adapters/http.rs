use crate::domain::ports::LookupSettings;
use crate::utils::error::{GestaoError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Client shared by the lookup services: JSON accept header, user agent and timeout.
pub fn build_client(settings: &dyn LookupSettings) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let client = Client::builder()
        .user_agent(settings.user_agent().to_string())
        .default_headers(headers)
        .timeout(Duration::from_secs(settings.timeout_seconds()))
        .build()?;
    Ok(client)
}

pub fn request_error(service: &str, err: reqwest::Error) -> GestaoError {
    if err.is_timeout() {
        tracing::error!("⏱️ Timeout calling {}", service);
        GestaoError::Timeout {
            service: service.to_string(),
        }
    } else {
        tracing::error!("❌ Request to {} failed: {}", service, err);
        GestaoError::ApiError(err)
    }
}

pub fn status_error(service: &str, status: StatusCode) -> GestaoError {
    tracing::error!("❌ {} returned HTTP {}", service, status);
    GestaoError::UpstreamStatus {
        service: service.to_string(),
        status: status.as_u16(),
    }
}

pub fn join_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}
