use browser_history_browser::Aggregator;
use browser_history_core::config::{Config, TimeWindow, parse_browser_list};
use chrono::{DateTime, Utc};
use http::header::CONTENT_TYPE;
use http::{Method, Request, Response, StatusCode};
use http_body_util::Full;
use hyper::body::Bytes;
use std::sync::Arc;

/// Serves `GET /history` from an [`Aggregator`].
///
/// Every request works on its own copy of the base config; query parameters
/// never leak into other requests.
#[derive(Clone)]
pub struct HistoryHandler {
    aggregator: Arc<Aggregator>,
    config: Config,
    diagnostics: bool,
}

impl HistoryHandler {
    pub fn new(aggregator: Aggregator, config: Config) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            config,
            diagnostics: true,
        }
    }

    /// Turn per-request extraction logging on or off (on by default)
    pub fn with_diagnostics(mut self, diagnostics: bool) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Route a request and build its response
    pub async fn handle<B>(&self, req: Request<B>) -> Response<Full<Bytes>> {
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let query = req.uri().query().map(str::to_string);
        drop(req);

        tracing::debug!("{} {}", method, path);

        match (method, path.as_str()) {
            (Method::GET, "/history") => self.history(query.as_deref()).await,
            (_, "/history") => text_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed"),
            _ => text_response(StatusCode::NOT_FOUND, "Not found"),
        }
    }

    async fn history(&self, query: Option<&str>) -> Response<Full<Bytes>> {
        let (config, window) = match request_config(&self.config, query, Utc::now()) {
            Ok(resolved) => resolved,
            Err(message) => return text_response(StatusCode::BAD_REQUEST, &message),
        };

        let aggregator = Arc::clone(&self.aggregator);
        let diagnostics = self.diagnostics;
        let fetched = tokio::task::spawn_blocking(move || {
            aggregator.fetch(&config.browsers, &window, diagnostics)
        })
        .await;

        match fetched {
            Ok(Ok(entries)) => match serde_json::to_vec(&entries) {
                Ok(body) => Response::builder()
                    .status(StatusCode::OK)
                    .header(CONTENT_TYPE, "application/json")
                    .body(Full::new(Bytes::from(body)))
                    .unwrap_or_else(|_| internal_error()),
                Err(err) => {
                    tracing::error!("Failed to encode response: {}", err);
                    text_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to encode response")
                }
            },
            Ok(Err(err)) => text_response(StatusCode::BAD_REQUEST, &err.to_string()),
            Err(err) => {
                tracing::error!("History extraction task failed: {}", err);
                text_response(StatusCode::INTERNAL_SERVER_ERROR, "History extraction failed")
            }
        }
    }
}

/// Overlay the query parameters on a copy of `base` and resolve the time window
fn request_config(
    base: &Config,
    query: Option<&str>,
    now: DateTime<Utc>,
) -> Result<(Config, TimeWindow), String> {
    let mut config = base.clone();
    let mut start_param = None;
    let mut end_param = None;

    for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
        match key.as_ref() {
            "browsers" if !value.is_empty() => config.browsers = parse_browser_list(&value),
            "days" if !value.is_empty() => match value.parse::<u32>() {
                Ok(days) if days > 0 => config.history_days = days,
                _ => return Err("Invalid 'days' parameter".to_string()),
            },
            "start_time" if !value.is_empty() => start_param = Some(value.into_owned()),
            "end_time" if !value.is_empty() => end_param = Some(value.into_owned()),
            _ => {}
        }
    }

    let window = match (start_param, end_param) {
        (Some(start), Some(end)) => TimeWindow::parse(&start, &end).map_err(|_| {
            "Invalid 'start_time' or 'end_time' format (use RFC3339)".to_string()
        })?,
        (None, None) => TimeWindow::last_days(now, config.history_days)
            .map_err(|err| err.to_string())?,
        _ => {
            return Err("Both 'start_time' and 'end_time' must be provided together".to_string());
        }
    };

    config.start = Some(window.start);
    config.end = Some(window.end);

    Ok((config, window))
}

fn text_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(format!("{}\n", message))))
        .unwrap_or_else(|_| internal_error())
}

fn internal_error() -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(b"Internal server error\n")));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}
