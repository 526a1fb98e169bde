//! Result rendering

use super::commands::OutputFormat;
use crate::assets::Asset;
use crate::error::Result;
use crate::http::ResponseMeta;
use crate::pagination::StopCause;
use crate::service::SearchResult;
use serde::Serialize;
use std::fmt::Write as _;

/// JSON document written for one run
#[derive(Debug, Serialize)]
struct Report<'a> {
    hits: &'a [Asset],
    total_hits: i64,
    #[serde(skip_serializing_if = "is_zero")]
    dropped_hits: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_cause: Option<StopCause>,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<&'a ResponseMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    partial_error: Option<String>,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

/// Render a run result for stdout
pub fn render(result: &SearchResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let report = Report {
                hits: &result.hits,
                total_hits: result.total_hits,
                dropped_hits: result.dropped_hits,
                stop_cause: result.stop_cause,
                meta: result.meta.as_ref(),
                partial_error: result.partial_error.as_ref().map(ToString::to_string),
            };
            Ok(serde_json::to_string(&report)?)
        }
        OutputFormat::Pretty => Ok(render_pretty(result)),
    }
}

fn render_pretty(result: &SearchResult) -> String {
    let mut out = String::new();
    for asset in &result.hits {
        let _ = writeln!(out, "{:<13} {}", asset.asset_type(), asset.summary());
    }

    let pages = result.page_count().unwrap_or(0);
    let _ = write!(
        out,
        "{} of {} hits, {} page(s)",
        result.hits.len(),
        result.total_hits,
        pages
    );
    if result.dropped_hits > 0 {
        let _ = write!(out, ", {} skipped", result.dropped_hits);
    }
    out
}
