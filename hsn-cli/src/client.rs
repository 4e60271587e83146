//! HTTP client for hsn-service

use hsn_core::{ErrorEnvelope, HsnError, LookupResponse, Query};
use serde::Serialize;

pub struct ServiceClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct LookupRequest<'a> {
    hsn_code: &'a str,
}

impl ServiceClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Look up a sanitized code. `Ok(None)` means the service found nothing.
    pub fn lookup(&self, query: &Query) -> Result<Option<LookupResponse>, HsnError> {
        let url = format!("{}/lookup", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(&LookupRequest {
                hsn_code: query.as_str(),
            })
            .send()
            .map_err(|e| HsnError::ServiceError {
                code: "connection_error".to_string(),
                message: e.to_string(),
                hint: "Is hsn-service running?".to_string(),
            })?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return self.handle_error(resp);
        }

        resp.json::<LookupResponse>()
            .map(Some)
            .map_err(|e| HsnError::ServiceError {
                code: "parse_error".to_string(),
                message: e.to_string(),
                hint: "Unexpected response from service".to_string(),
            })
    }

    fn handle_error<T>(&self, resp: reqwest::blocking::Response) -> Result<T, HsnError> {
        let status = resp.status();
        match resp.json::<ErrorEnvelope>() {
            Ok(envelope) => Err(HsnError::ServiceError {
                code: envelope.code,
                message: envelope.message,
                hint: envelope.hint,
            }),
            Err(_) => Err(HsnError::ServiceError {
                code: format!("http_{}", status.as_u16()),
                message: format!("HTTP {} from service", status),
                hint: "Check service logs".to_string(),
            }),
        }
    }
}
