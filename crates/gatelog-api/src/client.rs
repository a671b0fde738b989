// Gate-log API HTTP client
//
// Wraps `reqwest::Client` with base-path URL construction, HTTP status
// mapping, and the `status == "success"` marker check every endpoint
// carries. Endpoint methods return decoded payloads only.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{
    ErrorBody, RawStatistics, RawVehicle, SUCCESS_STATUS, StatsResponse, VehicleHistory,
    VehiclesResponse,
};
use crate::transport::TransportConfig;

/// Async client for the gate-log REST API.
///
/// The base URL is the API prefix (`API_BASE`), e.g.
/// `http://127.0.0.1:8000/api`. Endpoint paths are appended as URL
/// segments, so vehicle numbers are percent-encoded as needed.
#[derive(Debug, Clone)]
pub struct GatelogClient {
    http: reqwest::Client,
    base_url: Url,
}

impl GatelogClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from a base URL string and transport settings.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Parse the base URL and make sure its path ends with `/`.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        if url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        url.set_query(None);
        url.set_fragment(None);
        Ok(url)
    }

    /// The normalized API base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append path segments onto the base URL, encoding each one.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // The constructor rejects cannot-be-a-base URLs, so this always applies.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, Error> {
        let url = self.url(segments);
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(segments.join("/"), resp).await
    }

    /// Check HTTP status, parse JSON, verify the success marker, then
    /// decode the payload into `T`.
    async fn handle_response<T: DeserializeOwned>(
        endpoint: String,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let body = resp.text().await?;
        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| Error::InvalidJson {
                message: format!("{e} (body preview: {:?})", preview(&body)),
                body: body.clone(),
            })?;

        let marker = value.get("status").and_then(serde_json::Value::as_str);
        if marker != Some(SUCCESS_STATUS) {
            return Err(Error::UnexpectedResponse {
                endpoint,
                status: marker.map(str::to_owned),
            });
        }

        serde_json::from_value(value).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&raw)
            .ok()
            .and_then(|b| b.detail)
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                }
            });

        if status == reqwest::StatusCode::NOT_FOUND {
            Error::NotFound { message }
        } else {
            Error::Http {
                status: status.as_u16(),
                message,
            }
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// `GET {base}/stats`: aggregate counters.
    pub async fn get_stats(&self) -> Result<RawStatistics, Error> {
        let resp: StatsResponse = self.get(&["stats"]).await?;
        Ok(resp.statistics)
    }

    /// `GET {base}/vehicles`: every logged entry, oldest first.
    pub async fn list_vehicles(&self) -> Result<Vec<RawVehicle>, Error> {
        let resp: VehiclesResponse = self.get(&["vehicles"]).await?;
        if let Some(count) = resp.count {
            debug!(count, received = resp.vehicles.len(), "vehicles fetched");
        }
        Ok(resp.vehicles)
    }

    /// `GET {base}/vehicle/{vehicle_no}`: all entries for one vehicle.
    ///
    /// Returns [`Error::NotFound`] when the vehicle has never been logged.
    pub async fn vehicle_history(&self, vehicle_no: &str) -> Result<VehicleHistory, Error> {
        self.get(&["vehicle", vehicle_no]).await
    }
}

fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
