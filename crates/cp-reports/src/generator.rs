//! Report generation

use bytes::Bytes;
use cp_core::config::ReportConfig;
use tracing::{info, instrument, warn};

use crate::error::{ReportError, ReportResult};
use crate::layout::{lay_out, Report};
use crate::pdf;
use crate::summary::AggregationSummary;

/// Finished report, ready for an exporter
#[derive(Debug, Clone)]
pub struct ReportArtifact {
    /// Target file name
    pub file_name: String,
    /// PDF document
    pub bytes: Bytes,
    /// Layout the PDF was rendered from
    pub report: Report,
}

impl ReportArtifact {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Builds paginated PDF reports from a summary and a chart image
#[derive(Debug, Clone, Default)]
pub struct ReportGenerator {
    config: ReportConfig,
}

impl ReportGenerator {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Lay out and render the report
    ///
    /// `chart` is the encoded image (PNG or JPEG) placed on the first page.
    /// Without it nothing is produced. The artifact is not exported here.
    #[instrument(skip_all, fields(records = summary.records.len()))]
    pub fn generate(
        &self,
        summary: &AggregationSummary,
        chart: Option<&[u8]>,
    ) -> ReportResult<ReportArtifact> {
        let chart = match chart {
            Some(bytes) if !bytes.is_empty() => bytes,
            _ => {
                warn!("No chart image, report not generated");
                return Err(ReportError::ChartUnavailable);
            }
        };
        let chart = image::load_from_memory(chart)?.to_rgb8();

        let report = lay_out(summary, &self.config);
        let bytes = pdf::render(&report, &chart)?;

        info!(
            file_name = %self.config.file_name,
            pages = report.page_count(),
            size = bytes.len(),
            "Report generated"
        );

        Ok(ReportArtifact {
            file_name: self.config.file_name.clone(),
            bytes: Bytes::from(bytes),
            report,
        })
    }
}
