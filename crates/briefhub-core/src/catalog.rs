//! Chart catalog and URL conventions.
//!
//! The catalog is the ordered list of chart images that make up one briefing.
//! Order is significant: it is the page order of the generated PDF.

use url::Url;

use crate::error::CoreError;

/// Where the chart publisher uploads the rendered PNGs.
pub const DEFAULT_BASE_URL: &str = "https://briefhub-wx.pages.dev/images/";

/// Default briefing, in page order.
pub const DEFAULT_CHARTS: [&str; 13] = [
    "ASAS_Latest.png",
    "ASAS_Prior.png",
    "FSAS_Latest.png",
    "AUPQ35_Latest.png",
    "AUPQ78_Latest.png",
    "FXFE502_Latest.png",
    "FXFE5782_Latest.png",
    "FBJP_Latest.png",
    "FBOS39_Latest.png",
    "FXJP106_Latest.png",
    "FXJP854_Latest.png",
    "Sakurajima_Ashfall_Latest.png",
    "Kirishimayama_Ashfall_Latest.png",
];

/// Ordered, non-empty list of absolute http(s) chart URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartList {
    urls: Vec<Url>,
}

impl ChartList {
    /// Build a list from absolute URLs, preserving their order.
    pub fn new<I, S>(urls: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let urls = urls
            .into_iter()
            .map(|raw| parse_chart_url(raw.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        if urls.is_empty() {
            return Err(CoreError::EmptyChartList);
        }

        Ok(Self { urls })
    }

    /// Resolve chart file names against a base URL.
    ///
    /// A missing trailing `/` on the base is added, so `https://host/images`
    /// and `https://host/images/` resolve the same way.
    pub fn from_base_url<I, S>(base: &str, names: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let base = if base.ends_with('/') {
            parse_chart_url(base)?
        } else {
            parse_chart_url(&format!("{base}/"))?
        };

        let urls = names
            .into_iter()
            .map(|name| {
                base.join(name.as_ref()).map_err(|e| CoreError::InvalidUrl {
                    url: name.as_ref().to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if urls.is_empty() {
            return Err(CoreError::EmptyChartList);
        }

        Ok(Self { urls })
    }

    /// Parse a comma- or whitespace-separated list of URLs.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        Self::new(
            raw.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty()),
        )
    }

    /// The 13-chart briefing served from [`DEFAULT_BASE_URL`].
    pub fn default_catalog() -> Result<Self, CoreError> {
        Self::from_base_url(DEFAULT_BASE_URL, DEFAULT_CHARTS)
    }

    pub fn urls(&self) -> &[Url] {
        &self.urls
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Url> {
        self.urls.iter()
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

impl<'a> IntoIterator for &'a ChartList {
    type Item = &'a Url;
    type IntoIter = std::slice::Iter<'a, Url>;

    fn into_iter(self) -> Self::IntoIter {
        self.urls.iter()
    }
}

/// Short display name of a chart: the last path segment of its URL.
pub fn chart_name(url: &Url) -> &str {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| url.as_str())
}

fn parse_chart_url(raw: &str) -> Result<Url, CoreError> {
    let url = Url::parse(raw).map_err(|e| CoreError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(CoreError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {other:?}"),
        }),
    }
}
