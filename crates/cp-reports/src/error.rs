//! Report errors

use thiserror::Error;

/// Error type for chart rendering and report generation
#[derive(Debug, Error)]
pub enum ReportError {
    /// No chart image was supplied; nothing is produced
    #[error("chart unavailable")]
    ChartUnavailable,

    #[error("Chart image could not be decoded: {0}")]
    ChartDecode(#[from] image::ImageError),

    #[error("Chart rendering failed: {0}")]
    ChartRender(String),

    #[error("PDF error: {0}")]
    Pdf(String),
}

impl ReportError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ReportError::ChartUnavailable => "chart_unavailable",
            ReportError::ChartDecode(_) => "chart_decode",
            ReportError::ChartRender(_) => "chart_render",
            ReportError::Pdf(_) => "pdf_error",
        }
    }
}

pub type ReportResult<T> = Result<T, ReportError>;
