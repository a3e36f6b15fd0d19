//! Core request pipeline: a transport-agnostic client that assembles the
//! request, performs the exchange and turns the response into a table or a
//! typed error.
//!
//! - `SpongeClient` owns the immutable [`ApiConfig`] and an [`HttpTransport`]
//! - Endpoint methods live in [`crate::endpoints`] and all funnel through
//!   `fetch_table` / `fetch_json`
//! - Status handling is exhaustive: 200 succeeds, 404 is `NotFound`, anything
//!   else is `UnexpectedStatus`

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::clients::ReqwestTransport;
use crate::config::ApiConfig;
use crate::error::{Result, SpongeError};
use crate::interceptors::Interceptor;
use crate::params::QueryParams;
use crate::table::ResultTable;

/// A fully resolved outbound GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.query_value(name).is_some()
    }
}

/// Status code plus undecoded body, exactly as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn text(&self) -> Result<&str> {
        Ok(std::str::from_utf8(&self.body)?)
    }

    pub fn json(&self) -> Result<Value> {
        let text = self.text()?;
        serde_json::from_str(text).map_err(|e| SpongeError::Decode(e, text.to_string()))
    }

    /// Reason text for a 404: the `detail` field when the body carries one,
    /// otherwise the raw body.
    fn not_found_detail(&self) -> String {
        let raw = String::from_utf8_lossy(&self.body).trim().to_string();
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => match map.get("detail") {
                Some(Value::String(detail)) => detail.clone(),
                Some(other) => other.to_string(),
                None => raw,
            },
            _ if raw.is_empty() => "no detail provided".to_string(),
            _ => raw,
        }
    }
}

/// The HTTP capability the client needs: one GET, status plus raw body back.
///
/// Implementations only report transport failures as errors; status codes are
/// interpreted by [`SpongeClient`].
#[async_trait]
pub trait HttpTransport: Send + Sync + Debug {
    async fn get(&self, request: &ApiRequest) -> Result<RawResponse>;
}

/// Client for the SPONGE web API.
///
/// Cheap to clone; every call is an independent request against the shared,
/// read-only configuration.
#[derive(Clone, Debug)]
pub struct SpongeClient<T: HttpTransport = ReqwestTransport> {
    config: ApiConfig,
    transport: T,
    interceptor: Option<Arc<dyn Interceptor>>,
}

impl SpongeClient<ReqwestTransport> {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::with_transport(config, transport))
    }

    /// Client configured from `SPONGE_API_URL` / `SPONGE_API_TIMEOUT_SECS` (and `.env`).
    pub fn from_env() -> Result<Self> {
        Self::new(ApiConfig::from_env()?)
    }
}

impl<T: HttpTransport> SpongeClient<T> {
    pub fn with_transport(config: ApiConfig, transport: T) -> Self {
        info!(base_url = %config.api_url_base, "Creating new SPONGE client");
        Self { config, transport, interceptor: None }
    }

    /// Hand every request/response pair to `interceptor` after the exchange.
    #[must_use]
    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub(crate) fn build_request(&self, path: &str, params: QueryParams) -> ApiRequest {
        ApiRequest {
            url: self.config.endpoint(path),
            headers: self.config.headers.clone(),
            query: params.into_pairs(),
        }
    }

    /// Send the request and hand the exchange to the interceptor, if any.
    async fn exchange(&self, request: &ApiRequest) -> Result<RawResponse> {
        debug!(url = %request.url, params = request.query.len(), "Sending request to SPONGE API");

        let response = self.transport.get(request).await.map_err(|e| {
            error!(error = %e, url = %request.url, "HTTP request failed");
            e
        })?;

        debug!(status = response.status, bytes = response.body.len(), "Received response from SPONGE API");

        if let Some(interceptor) = &self.interceptor {
            if let Err(e) = interceptor.save(request, &response).await {
                warn!(error = %e, "Interceptor failed to record exchange");
            }
        }
        Ok(response)
    }

    /// GET `path` and return the decoded JSON body of a 200 response.
    #[instrument(target = "sponge_web::client", skip(self, params))]
    pub(crate) async fn fetch_json(&self, path: &str, params: QueryParams) -> Result<Value> {
        let request = self.build_request(path, params);
        let response = self.exchange(&request).await?;

        match response.status {
            200 => response.json(),
            404 => {
                let detail = response.not_found_detail();
                warn!(detail = %detail, "SPONGE API returned no data");
                Err(SpongeError::NotFound { detail })
            }
            status => {
                let body = String::from_utf8_lossy(&response.body).into_owned();
                error!(status, body = %body, "SPONGE API error");
                Err(SpongeError::UnexpectedStatus { status, body })
            }
        }
    }

    /// GET `path` and normalize the 200 body into a [`ResultTable`].
    pub(crate) async fn fetch_table(&self, path: &str, params: QueryParams) -> Result<ResultTable> {
        let body = self.fetch_json(path, params).await?;
        let table = ResultTable::from_json(body)?;
        info!(path = %path, rows = table.len(), columns = table.width(), "Successfully received SPONGE response");
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_detail_prefers_detail_field() {
        let response = RawResponse::new(404, r#"{"detail": "no data found"}"#);
        assert_eq!(response.not_found_detail(), "no data found");
    }

    #[test]
    fn not_found_detail_falls_back_to_body() {
        assert_eq!(RawResponse::new(404, "Not Found").not_found_detail(), "Not Found");
        assert_eq!(RawResponse::new(404, "").not_found_detail(), "no detail provided");
        assert_eq!(
            RawResponse::new(404, r#"{"message": "gone"}"#).not_found_detail(),
            r#"{"message": "gone"}"#
        );
    }

    #[test]
    fn json_reports_utf8_and_decode_failures() {
        assert!(matches!(RawResponse::new(200, vec![0xffu8, 0xfe]).json(), Err(SpongeError::Utf8(_))));
        match RawResponse::new(200, "[{").json() {
            Err(SpongeError::Decode(_, raw)) => assert_eq!(raw, "[{"),
            other => panic!("expected decode error, got {other:?}"),
        }
    }
}
