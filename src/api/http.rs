//! Blocking HTTP client for the session data backend.

use std::time::Duration;

use log::{debug, warn};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::SessionDataSource;
use crate::config::AppConfig;
use crate::errors::F1LabError;
use crate::session::{Driver, LapList, ResultRow, SessionInfo, SessionKey};
use crate::track_map::CircuitGeometry;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Deserialize)]
struct DriversResponse {
    #[serde(default)]
    drivers: Vec<Driver>,
}

#[derive(Deserialize)]
struct ResultsResponse {
    #[serde(default)]
    results: Vec<ResultRow>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    detail: Option<serde_json::Value>,
}

/// [`SessionDataSource`] backed by the backend's `/api/session/...` endpoints
pub struct HttpSessionSource {
    base_url: Url,
    agent: ureq::Agent,
}

impl HttpSessionSource {
    /// Create a client for the backend at `base_url`. `timeout` bounds each
    /// whole request; the first load of a session can take tens of seconds.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, F1LabError> {
        let parsed = Url::parse(base_url).map_err(|_| F1LabError::InvalidApiUrl {
            url: base_url.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(F1LabError::InvalidApiUrl {
                url: base_url.to_string(),
            });
        }
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout(timeout)
            .build();
        Ok(Self {
            base_url: parsed,
            agent,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, F1LabError> {
        Self::new(&config.api_url, Duration::from_secs(config.timeout_s))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of `/api/session/{year}/{event}/{type}[/{resource}]`
    fn endpoint(&self, key: &SessionKey, resource: Option<&str>) -> Result<Url, F1LabError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| F1LabError::InvalidApiUrl {
                    url: self.base_url.to_string(),
                })?;
            segments
                .pop_if_empty()
                .extend(["api", "session"])
                .push(&key.year.to_string())
                .push(&key.event)
                .push(key.session_type.code());
            if let Some(resource) = resource {
                segments.push(resource);
            }
        }
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url, fallback: &str) -> Result<T, F1LabError> {
        debug!("GET {}", url);
        match self.agent.get(url.as_str()).call() {
            Ok(response) => response
                .into_json::<T>()
                .map_err(|e| F1LabError::DecodeError { source: e }),
            Err(ureq::Error::Status(code, response)) => {
                let detail = response
                    .into_json::<ErrorResponse>()
                    .ok()
                    .and_then(|body| body.detail)
                    .and_then(|detail| match detail {
                        serde_json::Value::String(message) if !message.is_empty() => Some(message),
                        serde_json::Value::Null => None,
                        other => Some(other.to_string()),
                    })
                    .unwrap_or_else(|| fallback.to_string());
                warn!("{} responded with status {}: {}", url, code, detail);
                Err(F1LabError::ApiError { detail })
            }
            Err(e) => {
                warn!("Request to {} failed: {}", url, e);
                Err(e.into())
            }
        }
    }
}

impl SessionDataSource for HttpSessionSource {
    fn session_info(&self, key: &SessionKey) -> Result<SessionInfo, F1LabError> {
        self.get_json(self.endpoint(key, None)?, "Failed to fetch session")
    }

    fn drivers(&self, key: &SessionKey) -> Result<Vec<Driver>, F1LabError> {
        let response: DriversResponse =
            self.get_json(self.endpoint(key, Some("drivers"))?, "Failed to fetch drivers")?;
        Ok(response.drivers)
    }

    fn laps(&self, key: &SessionKey, driver: Option<&str>) -> Result<LapList, F1LabError> {
        let mut url = self.endpoint(key, Some("laps"))?;
        if let Some(driver) = driver.filter(|d| !d.is_empty()) {
            url.query_pairs_mut().append_pair("driver", driver);
        }
        self.get_json(url, "Failed to fetch laps")
    }

    fn results(&self, key: &SessionKey) -> Result<Vec<ResultRow>, F1LabError> {
        let response: ResultsResponse =
            self.get_json(self.endpoint(key, Some("results"))?, "Failed to fetch results")?;
        Ok(response.results)
    }

    fn circuit(&self, key: &SessionKey) -> Result<CircuitGeometry, F1LabError> {
        self.get_json(self.endpoint(key, Some("circuit"))?, "Failed to load track map")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionType;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Serve a single response and report the request line that was received
    fn serve_once(status: &str, body: &str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let read = stream.read(&mut buf).unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..read]).to_string();
                let request_line = request.lines().next().unwrap_or_default().to_string();
                let _ = tx.send(request_line);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        (format!("http://{}", addr), rx)
    }

    fn source(url: &str) -> HttpSessionSource {
        HttpSessionSource::new(url, Duration::from_secs(5)).unwrap()
    }

    fn monaco() -> SessionKey {
        SessionKey::new(2021, "Monaco", SessionType::Race)
    }

    #[test]
    fn test_drivers_decodes_list() {
        let (url, requests) = serve_once(
            "200 OK",
            r#"{"drivers": [{"abbreviation": "VER", "number": 33, "name": "Max Verstappen", "team": "Red Bull Racing"}]}"#,
        );
        let drivers = source(&url).drivers(&monaco()).unwrap();
        assert_eq!(drivers.len(), 1);
        assert_eq!(drivers[0].abbreviation, "VER");
        assert_eq!(drivers[0].number, Some(33));
        assert_eq!(
            requests.recv().unwrap(),
            "GET /api/session/2021/Monaco/R/drivers HTTP/1.1"
        );
    }

    #[test]
    fn test_missing_results_array_is_empty() {
        let (url, _requests) = serve_once("200 OK", "{}");
        let results = source(&url).results(&monaco()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_laps_encodes_event_and_driver_filter() {
        let (url, requests) = serve_once("200 OK", r#"{"laps": [], "count": 0, "driver": "HAM"}"#);
        let key = SessionKey::new(2021, "Abu Dhabi", SessionType::Qualifying);
        let laps = source(&url).laps(&key, Some("HAM")).unwrap();
        assert_eq!(laps.driver.as_deref(), Some("HAM"));
        assert_eq!(
            requests.recv().unwrap(),
            "GET /api/session/2021/Abu%20Dhabi/Q/laps?driver=HAM HTTP/1.1"
        );
    }

    #[test]
    fn test_backend_detail_becomes_error_message() {
        let (url, _requests) = serve_once(
            "404 Not Found",
            r#"{"detail": "Session not found: no such event"}"#,
        );
        let err = source(&url).session_info(&monaco()).unwrap_err();
        assert!(matches!(err, F1LabError::ApiError { .. }));
        assert_eq!(err.to_string(), "Session not found: no such event");
    }

    #[test]
    fn test_missing_detail_falls_back_to_generic_message() {
        let (url, _requests) = serve_once("500 Internal Server Error", "oops");
        let err = source(&url).results(&monaco()).unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch results");
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let (url, _requests) = serve_once("200 OK", "not json");
        let err = source(&url).circuit(&monaco()).unwrap_err();
        assert!(matches!(err, F1LabError::DecodeError { .. }));
    }

    #[test]
    fn test_unreachable_backend_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let err = source(&format!("http://{}", addr))
            .drivers(&monaco())
            .unwrap_err();
        assert!(matches!(err, F1LabError::TransportError { .. }));
    }

    #[test]
    fn test_base_url_path_prefix_is_kept() {
        let client = source("http://localhost:8000/f1/");
        let url = client.endpoint(&monaco(), Some("circuit")).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/f1/api/session/2021/Monaco/R/circuit"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(matches!(
            HttpSessionSource::new("not a url", Duration::from_secs(1)),
            Err(F1LabError::InvalidApiUrl { .. })
        ));
        assert!(matches!(
            HttpSessionSource::new("mailto:someone@example.com", Duration::from_secs(1)),
            Err(F1LabError::InvalidApiUrl { .. })
        ));
    }
}
