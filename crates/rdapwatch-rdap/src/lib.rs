// # RDAP Status Source
//
// This crate provides the RDAP-over-HTTP status source for rdapwatch.
//
// ## Behavior
//
// One `GET <base_url>/<domain>` per lookup:
//
// - 404 → the domain is available
// - 200 → the RDAP body gives the status list, registration and expiration
//   dates, and the registrar name from the first entity's vCard
// - anything else → `Error::HttpStatus`
//
// ## Not Done Here
//
// - No retries or backoff: the monitoring loop's next cycle is the retry
// - No bootstrap discovery: the base URL is configured (Verisign by default)

pub mod types;

use rdapwatch_core::config::LookupConfig;
use rdapwatch_core::traits::StatusSource;
use rdapwatch_core::{Error, Result, StatusRecord};

use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

use types::{EVENT_EXPIRATION, EVENT_REGISTRATION, RdapDomain};

/// Media types sent in the `Accept` header
const ACCEPT_RDAP: &str = "application/rdap+json, application/json";

/// User agent for lookups
const USER_AGENT: &str = concat!("rdapwatch/", env!("CARGO_PKG_VERSION"));

/// RDAP status source
#[derive(Debug, Clone)]
pub struct RdapStatusSource {
    /// Base URL; the domain is appended as the last path segment
    base_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl RdapStatusSource {
    /// Create a source from lookup configuration
    pub fn new(config: &LookupConfig) -> Result<Self> {
        Self::with_timeout(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    /// Create a source for `base_url` with a request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Lookup URL for a domain
    pub fn url_for(&self, domain: &str) -> String {
        format!("{}/{}", self.base_url, domain)
    }
}

#[async_trait::async_trait]
impl StatusSource for RdapStatusSource {
    async fn lookup(&self, domain: &str) -> Result<StatusRecord> {
        let url = self.url_for(domain);
        debug!("Querying RDAP: {}", url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, ACCEPT_RDAP)
            .send()
            .await
            .map_err(|e| Error::network(e.to_string()))?;

        let status = response.status();
        debug!("RDAP response for {}: {}", domain, status);

        match status {
            StatusCode::NOT_FOUND => Ok(StatusRecord::available()),
            StatusCode::OK => {
                let body = response
                    .text()
                    .await
                    .map_err(|e| Error::network(format!("Failed to read response: {}", e)))?;
                interpret_response(status.as_u16(), &body)
            }
            other => Err(Error::HttpStatus(other.as_u16())),
        }
    }

    fn source_name(&self) -> &'static str {
        "rdap"
    }
}

/// Map an RDAP HTTP answer to a status record
///
/// # Returns
///
/// - 404: available record (body ignored)
/// - 200: registered record built from the body
/// - other codes: `Error::HttpStatus`
/// - malformed 200 body: `Error::Parse`
pub fn interpret_response(status_code: u16, body: &str) -> Result<StatusRecord> {
    match status_code {
        404 => Ok(StatusRecord::available()),
        200 => {
            let domain: RdapDomain = serde_json::from_str(body)?;
            registered_record(domain)
        }
        code => Err(Error::HttpStatus(code)),
    }
}

fn registered_record(domain: RdapDomain) -> Result<StatusRecord> {
    let registration_date = domain.event_date(EVENT_REGISTRATION)?;
    let expiration_date = domain.event_date(EVENT_EXPIRATION)?;
    let registrar = domain.registrar()?;

    Ok(StatusRecord::registered(
        domain.status,
        registrar,
        registration_date,
        expiration_date,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdapwatch_core::DomainStatus;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    const VERISIGN_GOOGLE: &str = r#"{
        "objectClassName": "domain",
        "handle": "2138514_DOMAIN_COM-VRSN",
        "ldhName": "GOOGLE.COM",
        "status": [
            "client delete prohibited",
            "client transfer prohibited",
            "client update prohibited",
            "server delete prohibited",
            "server transfer prohibited",
            "server update prohibited"
        ],
        "entities": [{
            "objectClassName": "entity",
            "handle": "292",
            "roles": ["registrar"],
            "vcardArray": ["vcard", [
                ["version", {}, "text", "4.0"],
                ["fn", {}, "text", "MarkMonitor Inc."]
            ]]
        }],
        "events": [
            {"eventAction": "registration", "eventDate": "1997-09-15T04:00:00Z"},
            {"eventAction": "expiration", "eventDate": "2028-09-14T04:00:00Z"},
            {"eventAction": "last update of RDAP database", "eventDate": "2024-01-01T00:00:00Z"}
        ]
    }"#;

    #[test]
    fn not_found_means_available() {
        let record = interpret_response(404, "").unwrap();
        assert_eq!(record, StatusRecord::available());
    }

    #[test]
    fn registered_domain_is_parsed() {
        let record = interpret_response(200, VERISIGN_GOOGLE).unwrap();

        assert!(!record.available);
        assert_eq!(
            record.status,
            DomainStatus::codes([
                "client delete prohibited",
                "client transfer prohibited",
                "client update prohibited",
                "server delete prohibited",
                "server transfer prohibited",
                "server update prohibited",
            ])
        );
        assert_eq!(record.registrar.as_deref(), Some("MarkMonitor Inc."));
        assert_eq!(record.registration_date.as_deref(), Some("1997-09-15T04:00:00Z"));
        assert_eq!(record.expiration_date.as_deref(), Some("2028-09-14T04:00:00Z"));
        assert!(record.error.is_none());
    }

    #[test]
    fn missing_members_default_to_absent() {
        let record = interpret_response(200, r#"{"ldhName": "EXAMPLE.COM"}"#).unwrap();

        assert!(!record.available);
        assert_eq!(record.status, DomainStatus::Codes(Vec::new()));
        assert!(record.registrar.is_none());
        assert!(record.registration_date.is_none());
        assert!(record.expiration_date.is_none());
    }

    #[test]
    fn other_status_codes_are_errors() {
        let err = interpret_response(503, "").unwrap_err();
        assert_eq!(err.to_string(), "Status code: 503");
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = interpret_response(200, "<html>").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn entity_without_vcard_is_a_parse_error() {
        let body = r#"{"status": ["active"], "entities": [{"roles": ["registrar"]}]}"#;
        let err = interpret_response(200, body).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn event_without_action_is_a_parse_error() {
        let body = r#"{"events": [{"eventDate": "1997-09-15T04:00:00Z"}]}"#;
        assert!(matches!(interpret_response(200, body), Err(Error::Parse(_))));
    }

    #[test]
    fn malformed_trailing_event_is_ignored() {
        let body = r#"{
            "status": ["active"],
            "events": [
                {"eventAction": "registration", "eventDate": "1997-09-15T04:00:00Z"},
                {"eventAction": "expiration", "eventDate": "2028-09-14T04:00:00Z"},
                {"eventDate": "2024-01-01T00:00:00Z"}
            ]
        }"#;
        let record = interpret_response(200, body).unwrap();

        assert_eq!(record.registration_date.as_deref(), Some("1997-09-15T04:00:00Z"));
        assert_eq!(record.expiration_date.as_deref(), Some("2028-09-14T04:00:00Z"));
    }

    #[test]
    fn malformed_later_entity_is_ignored() {
        let body = r#"{
            "status": ["active"],
            "entities": [
                {"vcardArray": ["vcard", [["version", {}, "text", "4.0"], ["fn", {}, "text", "ACME"]]]},
                {"roles": "registrar"}
            ]
        }"#;
        let record = interpret_response(200, body).unwrap();

        assert!(!record.available);
        assert_eq!(record.registrar.as_deref(), Some("ACME"));
    }

    #[test]
    fn matching_event_without_date_is_a_parse_error() {
        let body = r#"{"events": [{"eventAction": "expiration"}]}"#;
        assert!(matches!(interpret_response(200, body), Err(Error::Parse(_))));
    }

    #[test]
    fn url_tolerates_trailing_slash() {
        let source =
            RdapStatusSource::with_timeout("https://rdap.example/domain/", Duration::from_secs(1))
                .unwrap();
        assert_eq!(source.url_for("example.com"), "https://rdap.example/domain/example.com");
    }

    #[test]
    fn builds_from_default_config() {
        let source = RdapStatusSource::new(&LookupConfig::default()).unwrap();
        assert_eq!(
            source.url_for("example.com"),
            "https://rdap.verisign.com/com/v1/domain/example.com"
        );
    }

    /// Serve one canned HTTP response and report the request line
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]);
            let request_line = request.lines().next().unwrap_or_default().to_string();
            let _ = tx.send(request_line);

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/rdap+json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        (format!("http://{}/com/v1/domain", addr), rx)
    }

    #[tokio::test]
    async fn lookup_requests_domain_path() {
        let (base_url, request_rx) = serve_once("404 Not Found", "").await;
        let source = RdapStatusSource::with_timeout(&base_url, Duration::from_secs(5)).unwrap();

        let record = source.lookup("example.com").await.unwrap();

        assert_eq!(record, StatusRecord::available());
        assert_eq!(
            request_rx.await.unwrap(),
            "GET /com/v1/domain/example.com HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn lookup_parses_registered_body() {
        let (base_url, _request_rx) = serve_once("200 OK", VERISIGN_GOOGLE).await;
        let source = RdapStatusSource::with_timeout(&base_url, Duration::from_secs(5)).unwrap();

        let record = source.check("google.com").await;

        assert!(!record.available);
        assert_eq!(record.registrar.as_deref(), Some("MarkMonitor Inc."));
    }

    #[tokio::test]
    async fn server_error_becomes_error_record() {
        let (base_url, _request_rx) = serve_once("500 Internal Server Error", "").await;
        let source = RdapStatusSource::with_timeout(&base_url, Duration::from_secs(5)).unwrap();

        let record = source.check("example.com").await;

        assert_eq!(record, StatusRecord::error("Status code: 500"));
    }

    #[tokio::test]
    async fn connection_failure_becomes_error_record() {
        // Reserve a port, then free it so nothing is listening there
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let source = RdapStatusSource::with_timeout(
            &format!("http://127.0.0.1:{}/domain", port),
            Duration::from_secs(5),
        )
        .unwrap();

        let record = source.check("example.com").await;

        assert!(!record.available);
        assert_eq!(record.status, DomainStatus::Error);
        assert!(
            record
                .error
                .as_deref()
                .is_some_and(|e| e.starts_with("Network error:")),
            "unexpected error: {:?}",
            record.error
        );
    }
}
