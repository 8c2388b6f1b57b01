//! Quote-chart endpoint integration: request building, the wire schema, and the
//! blocking HTTP client.

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::data::config::ClientConfig;
use crate::data::normalize::normalize;
use crate::domain::{Granularity, QuoteSeries, granularity_for};
use crate::error::{AppError, QuoteError};

/// Anything that can turn (symbol, range) into a normalized series.
///
/// The controller only talks to this trait, so tests can swap the network out.
pub trait QuoteSource {
    fn fetch_series(&self, symbol: &str, range: &str) -> Result<QuoteSeries, QuoteError>;
}

/// One search's request parameters, with the interval already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub symbol: String,
    pub range: String,
    pub granularity: Granularity,
}

impl QuoteRequest {
    pub fn new(symbol: &str, range: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            range: range.to_string(),
            granularity: granularity_for(range),
        }
    }
}

/// Full URL for a request, routed through the relay when one is configured.
pub fn build_request_url(config: &ClientConfig, request: &QuoteRequest) -> String {
    let sep = if config.base_url.ends_with('/') { "" } else { "/" };
    let target = format!(
        "{}{sep}{}?range={}&interval={}&includePrePost=false",
        config.base_url,
        urlencoding::encode(&request.symbol),
        urlencoding::encode(&request.range),
        request.granularity,
    );
    match &config.relay_url {
        Some(relay) => format!("{relay}{}", urlencoding::encode(&target)),
        None => target,
    }
}

pub struct ChartClient {
    client: Client,
    config: ClientConfig,
}

impl ChartClient {
    pub fn new(config: ClientConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, AppError> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl QuoteSource for ChartClient {
    fn fetch_series(&self, symbol: &str, range: &str) -> Result<QuoteSeries, QuoteError> {
        let request = QuoteRequest::new(symbol, range);
        let url = build_request_url(&self.config, &request);
        debug!(%url, "requesting chart");

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| QuoteError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            warn!(symbol, range, %status, "chart request rejected");
            return Err(QuoteError::Fetch {
                status: status.as_u16(),
            });
        }

        let body = resp
            .text()
            .map_err(|e| QuoteError::Transport(e.to_string()))?;
        let result = parse_envelope(&body)?;
        let series = normalize(result, &request);
        info!(
            symbol = %series.symbol,
            range = %series.range,
            points = series.points.len(),
            "chart loaded"
        );
        Ok(series)
    }
}

/// Decode a response body and pull out its first result entry.
pub fn parse_envelope(body: &str) -> Result<ChartResult, QuoteError> {
    let envelope: ChartEnvelope =
        serde_json::from_str(body).map_err(|e| QuoteError::Decode(e.to_string()))?;

    if let Some(err) = &envelope.chart.error {
        debug!(code = ?err.code, description = ?err.description, "chart envelope reported an error");
    }

    envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or(QuoteError::DataUnavailable)
}

#[derive(Debug, Deserialize)]
pub struct ChartEnvelope {
    pub chart: ChartBody,
}

#[derive(Debug, Deserialize)]
pub struct ChartBody {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ChartApiError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartApiError {
    pub code: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    #[serde(default)]
    pub indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub symbol: Option<String>,
    pub currency: Option<String>,
    pub exchange_name: Option<String>,
    pub instrument_type: Option<String>,
    pub regular_market_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub chart_previous_close: Option<f64>,
    pub data_granularity: Option<String>,
    pub range: Option<String>,
    pub timezone: Option<String>,
    pub exchange_timezone_name: Option<String>,
    #[serde(rename = "gmtoffset")]
    pub gmt_offset: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteArrays>,
    #[serde(default)]
    pub adjclose: Option<Vec<AdjCloseArray>>,
}

/// Parallel per-index arrays; `null` entries stay `None`.
#[derive(Debug, Default, Deserialize)]
pub struct QuoteArrays {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdjCloseArray {
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_url_carries_range_interval_and_session_flag() {
        let request = QuoteRequest::new("AAPL", "1y");
        let url = build_request_url(&ClientConfig::default(), &request);
        assert_eq!(
            url,
            "https://query1.finance.yahoo.com/v8/finance/chart/AAPL?range=1y&interval=1wk&includePrePost=false"
        );
    }

    #[test]
    fn unknown_range_requests_daily_interval() {
        let request = QuoteRequest::new("MSFT", "max");
        assert_eq!(request.granularity, Granularity::Daily);
        let url = build_request_url(&ClientConfig::default(), &request);
        assert!(url.ends_with("MSFT?range=max&interval=1d&includePrePost=false"));
    }

    #[test]
    fn symbol_is_percent_encoded() {
        let request = QuoteRequest::new("^GSPC", "1d");
        let url = build_request_url(&ClientConfig::default(), &request);
        assert!(url.contains("/chart/%5EGSPC?range=1d&interval=5m"));
    }

    #[test]
    fn relay_wraps_encoded_target() {
        let config = ClientConfig {
            relay_url: Some("https://corsproxy.io/?".to_string()),
            ..ClientConfig::default()
        };
        let url = build_request_url(&config, &QuoteRequest::new("AAPL", "1d"));
        assert_eq!(
            url,
            "https://corsproxy.io/?https%3A%2F%2Fquery1.finance.yahoo.com%2Fv8%2Ffinance%2Fchart%2FAAPL%3Frange%3D1d%26interval%3D5m%26includePrePost%3Dfalse"
        );
    }

    #[test]
    fn base_without_trailing_slash_gets_one() {
        let config = ClientConfig {
            base_url: "http://localhost:8080/chart".to_string(),
            ..ClientConfig::default()
        };
        let url = build_request_url(&config, &QuoteRequest::new("IBM", "5d"));
        assert!(url.starts_with("http://localhost:8080/chart/IBM?"));
    }

    #[test]
    fn empty_result_list_is_data_unavailable() {
        let body = r#"{"chart":{"result":[],"error":null}}"#;
        assert_eq!(parse_envelope(body).unwrap_err(), QuoteError::DataUnavailable);
    }

    #[test]
    fn null_result_with_error_is_data_unavailable() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert_eq!(parse_envelope(body).unwrap_err(), QuoteError::DataUnavailable);
    }

    #[test]
    fn missing_chart_block_is_a_decode_error() {
        let err = parse_envelope(r#"{"finance":{}}"#).unwrap_err();
        assert!(matches!(err, QuoteError::Decode(_)));
    }

    #[test]
    fn volume_integers_decode() {
        let body = r#"{"chart":{"result":[{"meta":{"symbol":"X"},"timestamp":[1],
            "indicators":{"quote":[{"close":[1.5],"volume":[1200]}]}}]}}"#;
        let result = parse_envelope(body).unwrap();
        assert_eq!(result.indicators.quote[0].volume, vec![Some(1200.0)]);
    }

    /// Serve one canned HTTP response on a local port; returns the base URL
    /// and a handle yielding the request line the client sent.
    fn serve_once(status: &'static str, body: &'static str) -> (String, std::thread::JoinHandle<String>) {
        use std::io::{BufRead, BufReader, Write};
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).unwrap();
                if header == "\r\n" || header.is_empty() {
                    break;
                }
            }
            write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            stream.flush().unwrap();
            request_line
        });
        (format!("http://{addr}/v8/finance/chart/"), handle)
    }

    fn local_client(base_url: String) -> ChartClient {
        ChartClient::new(ClientConfig {
            base_url,
            timeout: Some(std::time::Duration::from_secs(5)),
            ..ClientConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn non_success_status_is_a_fetch_error() {
        let (base, server) = serve_once("503 Service Unavailable", "");
        let err = local_client(base).fetch_series("AAPL", "1mo").unwrap_err();
        assert_eq!(err, QuoteError::Fetch { status: 503 });
        assert_eq!(err.to_string(), "Failed to fetch data: 503");

        let request_line = server.join().unwrap();
        assert!(request_line.starts_with(
            "GET /v8/finance/chart/AAPL?range=1mo&interval=1d&includePrePost=false "
        ));
    }

    #[test]
    fn empty_result_over_http_is_data_unavailable() {
        let (base, server) = serve_once("200 OK", r#"{"chart":{"result":[]}}"#);
        let err = local_client(base).fetch_series("ZZZZ", "1d").unwrap_err();
        assert_eq!(err, QuoteError::DataUnavailable);
        server.join().unwrap();
    }

    #[test]
    fn successful_response_is_normalized() {
        let body = r#"{"chart":{"result":[{"meta":{"symbol":"AAPL","currency":"USD",
            "exchangeName":"NMS","regularMarketPrice":165.0,"previousClose":150.0},
            "timestamp":[1709562600,1709649000,1709735400],
            "indicators":{"quote":[{"close":[100.0,null,102.0]}]}}],"error":null}}"#;
        let (base, server) = serve_once("200 OK", body);
        let series = local_client(base).fetch_series("AAPL", "1mo").unwrap();
        server.join().unwrap();

        assert_eq!(series.symbol, "AAPL");
        assert_eq!(series.data_granularity, "1d");
        let closes: Vec<f64> = series.points.iter().map(|p| p.close).collect();
        assert_eq!(closes, vec![100.0, 102.0]);
        assert_eq!(series.points[0].timestamp_ms, 1_709_562_600_000);
        assert_eq!(series.price_change, Some(15.0));
    }
}
