use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;

use briefhub_core::catalog::chart_name;
use briefhub_export::layout::PageLayout;
use briefhub_export::pdf::ChartDocument;
use briefhub_fetch::{fetch_charts, FetchedChart};

use crate::error::ApiError;
use crate::state::AppState;

pub const PDF_FILENAME: &str = "weather_charts.pdf";
const DOCUMENT_TITLE: &str = "Weather Charts";

/// Fetch every configured chart and return them as one PDF download.
///
/// All or nothing: the first chart that cannot be fetched or decoded fails
/// the request and no partial document is sent.
pub async fn download_charts(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let config = &state.config;

    let charts = fetch_charts(&state.http, &config.charts, config.fetch).await?;

    let layout = config.layout;
    let limit = config.max_document_bytes;
    let pdf = tokio::task::spawn_blocking(move || assemble(&charts, layout, limit)).await??;

    Ok((
        [
            (CONTENT_TYPE, "application/pdf".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename={PDF_FILENAME}"),
            ),
        ],
        pdf,
    ))
}

/// Build the PDF, one page per chart in fetch order.
fn assemble(
    charts: &[FetchedChart],
    layout: PageLayout,
    limit: Option<usize>,
) -> Result<Vec<u8>, ApiError> {
    let mut doc = ChartDocument::new(DOCUMENT_TITLE).with_size_limit(limit);

    for chart in charts {
        if let Some(content_type) = &chart.content_type
            && !content_type.starts_with("image/png")
        {
            tracing::warn!(
                chart = chart_name(&chart.url),
                content_type = %content_type,
                "chart not served as image/png"
            );
        }

        doc.add_chart(&chart.body, layout)
            .map_err(|e| ApiError::unusable_chart(&chart.url, e))?;
    }

    Ok(doc.save()?)
}
