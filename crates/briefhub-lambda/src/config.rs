use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use briefhub_core::catalog::{ChartList, DEFAULT_BASE_URL, DEFAULT_CHARTS};
use briefhub_export::layout::PageLayout;
use briefhub_fetch::charts::{DEFAULT_CONCURRENCY, DEFAULT_MAX_BYTES};
use briefhub_fetch::FetchOptions;

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration, read once at cold start.
#[derive(Debug, Clone)]
pub struct Config {
    pub charts: ChartList,
    pub fetch_timeout: Duration,
    pub fetch: FetchOptions,
    pub layout: PageLayout,
    pub max_document_bytes: Option<usize>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let charts = match get("BRIEFHUB_CHART_URLS") {
            Some(raw) => ChartList::parse(&raw)
                .map_err(|e| eyre::eyre!("BRIEFHUB_CHART_URLS: {e}"))?,
            None => {
                let base = get("BRIEFHUB_CHART_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
                ChartList::from_base_url(base.trim(), DEFAULT_CHARTS)
                    .map_err(|e| eyre::eyre!("BRIEFHUB_CHART_BASE_URL: {e}"))?
            }
        };

        let timeout_secs: u64 = parse_var(
            get("BRIEFHUB_FETCH_TIMEOUT_SECS"),
            "BRIEFHUB_FETCH_TIMEOUT_SECS",
            DEFAULT_FETCH_TIMEOUT_SECS,
        )?;
        if timeout_secs == 0 {
            return Err(eyre::eyre!("BRIEFHUB_FETCH_TIMEOUT_SECS must be at least 1"));
        }

        let concurrency: usize = parse_var(
            get("BRIEFHUB_FETCH_CONCURRENCY"),
            "BRIEFHUB_FETCH_CONCURRENCY",
            DEFAULT_CONCURRENCY,
        )?;
        if concurrency == 0 {
            return Err(eyre::eyre!("BRIEFHUB_FETCH_CONCURRENCY must be at least 1"));
        }

        let max_bytes: usize = parse_var(
            get("BRIEFHUB_MAX_IMAGE_BYTES"),
            "BRIEFHUB_MAX_IMAGE_BYTES",
            DEFAULT_MAX_BYTES,
        )?;

        let max_document_bytes = get("BRIEFHUB_MAX_DOCUMENT_BYTES")
            .map(|raw| parse_value(&raw, "BRIEFHUB_MAX_DOCUMENT_BYTES"))
            .transpose()?;

        let layout: PageLayout = parse_var(
            get("BRIEFHUB_PAGE_LAYOUT"),
            "BRIEFHUB_PAGE_LAYOUT",
            PageLayout::default(),
        )?;

        Ok(Self {
            charts,
            fetch_timeout: Duration::from_secs(timeout_secs),
            fetch: FetchOptions {
                concurrency,
                max_bytes,
            },
            layout,
            max_document_bytes,
        })
    }
}

fn parse_var<T>(raw: Option<String>, key: &str, default: T) -> eyre::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match raw {
        Some(raw) => parse_value(&raw, key),
        None => Ok(default),
    }
}

fn parse_value<T>(raw: &str, key: &str) -> eyre::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e| eyre::eyre!("{key}: invalid value {raw:?}: {e}"))
}
