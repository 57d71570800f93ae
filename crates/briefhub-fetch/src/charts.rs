use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use url::Url;

use briefhub_core::catalog::{chart_name, ChartList};

use crate::error::FetchError;

/// Default cap on a single chart body.
pub const DEFAULT_MAX_BYTES: usize = 32 * 1024 * 1024;

/// Default number of charts fetched at once.
pub const DEFAULT_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    /// Maximum in-flight requests. Values below 1 are treated as 1.
    pub concurrency: usize,
    /// Maximum accepted body size per chart.
    pub max_bytes: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

/// A chart body as served by the image host.
#[derive(Debug, Clone)]
pub struct FetchedChart {
    pub url: Url,
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

/// GET one chart and read its full body.
///
/// Non-2xx responses are errors. The body is read chunk by chunk so an
/// oversized response is rejected without buffering all of it.
pub async fn fetch_chart(
    client: &Client,
    url: &Url,
    max_bytes: usize,
) -> Result<FetchedChart, FetchError> {
    let request_error = |e: reqwest::Error| FetchError::Request {
        url: url.to_string(),
        message: e.to_string(),
    };

    let mut resp = client
        .get(url.clone())
        .send()
        .await
        .map_err(request_error)?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let too_large = || FetchError::TooLarge {
        url: url.to_string(),
        limit: max_bytes,
    };

    if resp
        .content_length()
        .is_some_and(|len| len > max_bytes as u64)
    {
        return Err(too_large());
    }

    let content_type = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let mut body = Vec::with_capacity(resp.content_length().unwrap_or(0) as usize);
    while let Some(chunk) = resp.chunk().await.map_err(request_error)? {
        if body.len() + chunk.len() > max_bytes {
            return Err(too_large());
        }
        body.extend_from_slice(&chunk);
    }

    tracing::debug!(
        chart = chart_name(url),
        status = status.as_u16(),
        bytes = body.len(),
        "chart fetched"
    );

    Ok(FetchedChart {
        url: url.clone(),
        body,
        content_type,
    })
}

/// Fetch every chart in the list, up to `options.concurrency` at a time.
///
/// Results come back in list order regardless of completion order. The
/// first failure ends the batch and drops the requests still in flight.
pub async fn fetch_charts(
    client: &Client,
    charts: &ChartList,
    options: FetchOptions,
) -> Result<Vec<FetchedChart>, FetchError> {
    let concurrency = options.concurrency.max(1);

    // Collected before streaming; keeps the returned future `Send`.
    let requests: Vec<_> = charts
        .iter()
        .map(|url| fetch_chart(client, url, options.max_bytes))
        .collect();

    stream::iter(requests)
        .buffered(concurrency)
        .try_collect()
        .await
}
