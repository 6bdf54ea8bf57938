//! Market-data source contract and the Yahoo Finance adapter.
//!
//! The fetcher asks a provider for the latest one-day trading snapshot of a
//! single ticker. An empty result (unknown or delisted symbol, market not
//! yet open) is `Ok(None)`: a recognized terminal state for the run, not an
//! error to surface.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use std::fmt::{Display, Formatter};
use time::OffsetDateTime;

use crate::http_client::{HttpClient, HttpRequest, NoopHttpClient};
use crate::{DailySnapshot, Symbol, UtcDateTime, ValidationError};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    InvalidRequest,
    Internal,
}

/// Structured source error surfaced to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Request payload for the daily snapshot endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRequest {
    pub symbol: Symbol,
}

impl SnapshotRequest {
    pub fn new(symbol: Symbol) -> Self {
        Self { symbol }
    }
}

/// Provider adapter contract.
pub trait DataSource: Send + Sync {
    /// Fetch the most recent one-day trading snapshot for a ticker.
    ///
    /// `Ok(None)` means the provider has no data for the symbol.
    fn daily_snapshot<'a>(
        &'a self,
        req: SnapshotRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Option<DailySnapshot>, SourceError>> + Send + 'a>>;
}

/// Yahoo Finance adapter backed by the v8 chart endpoint.
///
/// The chart endpoint requires no cookie/crumb authentication, so the
/// adapter is a thin GET-and-parse over the shared transport. A mock mode
/// serves deterministic data for offline runs and tests.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    use_real_api: bool,
}

impl YahooAdapter {
    /// Adapter hitting the real Yahoo Finance API through `http_client`.
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            use_real_api: true,
        }
    }

    /// Deterministic offline adapter for tests and `--mock` runs.
    pub fn mock() -> Self {
        Self {
            http_client: Arc::new(NoopHttpClient),
            use_real_api: false,
        }
    }
}

impl DataSource for YahooAdapter {
    fn daily_snapshot<'a>(
        &'a self,
        req: SnapshotRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Option<DailySnapshot>, SourceError>> + Send + 'a>>
    {
        Box::pin(async move {
            if self.use_real_api {
                self.fetch_real_snapshot(&req).await
            } else {
                self.fetch_fake_snapshot(&req)
            }
        })
    }
}

impl YahooAdapter {
    async fn fetch_real_snapshot(
        &self,
        req: &SnapshotRequest,
    ) -> Result<Option<DailySnapshot>, SourceError> {
        let endpoint = format!(
            "https://query1.finance.yahoo.com/v8/finance/chart/{}?range=1d&interval=1d",
            urlencoding::encode(req.symbol.as_str()),
        );

        let request = HttpRequest::get(&endpoint)
            .with_header("referer", "https://finance.yahoo.com/")
            .with_timeout_ms(10_000);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| SourceError::unavailable(format!("yahoo transport error: {}", e.message())))?;

        // Yahoo answers 404 for unknown symbols; that is the empty-dataset
        // case, not a provider failure.
        if response.status == 404 {
            return Ok(None);
        }

        // Remaining 4xx statuses mean the request itself was rejected
        // (throttled, bad parameters); 5xx and everything else is an outage.
        if (400..500).contains(&response.status) {
            return Err(SourceError::invalid_request(format!(
                "yahoo rejected request with status {}",
                response.status
            )));
        }

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "yahoo returned status {}",
                response.status
            )));
        }

        parse_chart_response(&response.body, &req.symbol)
    }

    fn fetch_fake_snapshot(
        &self,
        req: &SnapshotRequest,
    ) -> Result<Option<DailySnapshot>, SourceError> {
        let seed = symbol_seed(&req.symbol);
        let close = 92.0 + (seed % 500) as f64 / 10.0;
        let volume = 50_000 + seed % 10_000;
        let session_date = UtcDateTime::now().into_inner().date();

        DailySnapshot::new(req.symbol.clone(), session_date, close, volume)
            .map(Some)
            .map_err(validation_to_error)
    }
}

/// Parse a Yahoo v8 chart payload into at most one daily snapshot.
fn parse_chart_response(
    body: &str,
    symbol: &Symbol,
) -> Result<Option<DailySnapshot>, SourceError> {
    let chart_response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo chart: {e}")))?;

    if let Some(error) = &chart_response.chart.error {
        if !error.is_empty() {
            return Err(SourceError::unavailable(format!(
                "yahoo chart API error: {error}"
            )));
        }
    }

    let Some(result) = chart_response.chart.result.first() else {
        return Ok(None);
    };

    let Some(timestamps) = result.timestamp.as_ref().filter(|ts| !ts.is_empty()) else {
        return Ok(None);
    };

    let Some(quote) = result.indicators.quote.first() else {
        return Ok(None);
    };

    // Walk backwards to the latest index with both close and volume present.
    for index in (0..timestamps.len()).rev() {
        let close = quote.close.get(index).copied().flatten();
        let volume = quote.volume.get(index).copied().flatten();

        if let (Some(close), Some(volume)) = (close, volume) {
            let session_ts = OffsetDateTime::from_unix_timestamp(timestamps[index])
                .map_err(|e| SourceError::internal(format!("invalid timestamp: {e}")))?;

            let snapshot =
                DailySnapshot::new(symbol.clone(), session_ts.date(), close, volume.max(0) as u64)
                    .map_err(validation_to_error)?;
            return Ok(Some(snapshot));
        }
    }

    Ok(None)
}

// Yahoo Finance API response structures
#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    result: Vec<YahooChartResult>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartIndicators {
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartQuote {
    close: Vec<Option<f64>>,
    volume: Vec<Option<i64>>,
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol.as_str().bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(byte as u64)
    })
}

fn validation_to_error(error: ValidationError) -> SourceError {
    SourceError::internal(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::{HttpError, HttpResponse};
    use std::sync::Mutex;
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};
    use time::macros::date;

    const CHART_FIXTURE: &str = r#"{
        "chart": {
            "result": [{
                "timestamp": [1717444800],
                "indicators": {
                    "quote": [{
                        "close": [425.3333],
                        "volume": [18345213]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    const EMPTY_FIXTURE: &str = r#"{
        "chart": {
            "result": [{
                "timestamp": [],
                "indicators": { "quote": [{ "close": [], "volume": [] }] }
            }],
            "error": null
        }
    }"#;

    #[derive(Debug)]
    struct RecordingHttpClient {
        response: Result<HttpResponse, HttpError>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingHttpClient {
        fn with_response(response: Result<HttpResponse, HttpError>) -> Self {
            Self {
                response,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    #[test]
    fn parses_latest_session_snapshot() {
        let symbol = Symbol::parse("MSFT").expect("valid symbol");
        let snapshot = parse_chart_response(CHART_FIXTURE, &symbol)
            .expect("must parse")
            .expect("must contain data");

        assert_eq!(snapshot.symbol.as_str(), "MSFT");
        assert_eq!(snapshot.close, 425.3333);
        assert_eq!(snapshot.volume, 18_345_213);
        assert_eq!(snapshot.session_date, date!(2024 - 06 - 03));
    }

    #[test]
    fn empty_chart_payload_yields_none() {
        let symbol = Symbol::parse("MSFT").expect("valid symbol");
        let snapshot = parse_chart_response(EMPTY_FIXTURE, &symbol).expect("must parse");
        assert!(snapshot.is_none());
    }

    #[test]
    fn unknown_symbol_status_404_yields_none() {
        let client = Arc::new(RecordingHttpClient::with_response(Ok(HttpResponse {
            status: 404,
            body: String::new(),
        })));
        let adapter = YahooAdapter::new(client);
        let request = SnapshotRequest::new(Symbol::parse("NOPE").expect("valid symbol"));

        let snapshot = block_on(adapter.daily_snapshot(request)).expect("must succeed");
        assert!(snapshot.is_none());
    }

    #[test]
    fn rejected_request_status_surfaces_as_invalid_request() {
        let client = Arc::new(RecordingHttpClient::with_response(Ok(HttpResponse {
            status: 429,
            body: String::new(),
        })));
        let adapter = YahooAdapter::new(client);
        let request = SnapshotRequest::new(Symbol::parse("MSFT").expect("valid symbol"));

        let error = block_on(adapter.daily_snapshot(request)).expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::InvalidRequest);
        assert!(error.message().contains("429"));
    }

    #[test]
    fn server_error_status_surfaces_as_unavailable() {
        let client = Arc::new(RecordingHttpClient::with_response(Ok(HttpResponse {
            status: 503,
            body: String::new(),
        })));
        let adapter = YahooAdapter::new(client);
        let request = SnapshotRequest::new(Symbol::parse("MSFT").expect("valid symbol"));

        let error = block_on(adapter.daily_snapshot(request)).expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
    }

    #[test]
    fn transport_failure_surfaces_as_unavailable() {
        let client = Arc::new(RecordingHttpClient::with_response(Err(HttpError::new(
            "upstream timeout",
        ))));
        let adapter = YahooAdapter::new(client);
        let request = SnapshotRequest::new(Symbol::parse("MSFT").expect("valid symbol"));

        let error = block_on(adapter.daily_snapshot(request)).expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
    }

    #[test]
    fn real_adapter_requests_one_day_chart() {
        let client = Arc::new(RecordingHttpClient::with_response(Ok(
            HttpResponse::ok_json(CHART_FIXTURE),
        )));
        let adapter = YahooAdapter::new(Arc::clone(&client) as Arc<dyn HttpClient>);
        let request = SnapshotRequest::new(Symbol::parse("MSFT").expect("valid symbol"));

        block_on(adapter.daily_snapshot(request)).expect("must succeed");

        let requests = client.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.contains("/v8/finance/chart/MSFT"));
        assert!(requests[0].url.contains("range=1d"));
        assert!(requests[0].url.contains("interval=1d"));
    }

    #[test]
    fn mock_adapter_is_deterministic_per_symbol() {
        let adapter = YahooAdapter::mock();
        let request = SnapshotRequest::new(Symbol::parse("MSFT").expect("valid symbol"));

        let first = block_on(adapter.daily_snapshot(request.clone()))
            .expect("must succeed")
            .expect("must contain data");
        let second = block_on(adapter.daily_snapshot(request))
            .expect("must succeed")
            .expect("must contain data");

        assert_eq!(first.close, second.close);
        assert_eq!(first.volume, second.volume);
    }

    fn block_on<F>(future: F) -> F::Output
    where
        F: Future,
    {
        let waker = noop_waker();
        let mut context = Context::from_waker(&waker);
        let mut future = std::pin::pin!(future);

        loop {
            match future.as_mut().poll(&mut context) {
                Poll::Ready(output) => return output,
                Poll::Pending => std::thread::yield_now(),
            }
        }
    }

    fn noop_waker() -> Waker {
        // SAFETY: The vtable functions never dereference the data pointer and are no-op operations.
        unsafe { Waker::from_raw(noop_raw_waker()) }
    }

    fn noop_raw_waker() -> RawWaker {
        RawWaker::new(std::ptr::null(), &NOOP_RAW_WAKER_VTABLE)
    }

    unsafe fn noop_raw_waker_clone(_: *const ()) -> RawWaker {
        noop_raw_waker()
    }

    unsafe fn noop_raw_waker_wake(_: *const ()) {}

    unsafe fn noop_raw_waker_wake_by_ref(_: *const ()) {}

    unsafe fn noop_raw_waker_drop(_: *const ()) {}

    static NOOP_RAW_WAKER_VTABLE: RawWakerVTable = RawWakerVTable::new(
        noop_raw_waker_clone,
        noop_raw_waker_wake,
        noop_raw_waker_wake_by_ref,
        noop_raw_waker_drop,
    );
}
