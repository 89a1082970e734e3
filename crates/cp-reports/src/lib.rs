//! # cp-reports
//!
//! Everything downstream of the project snapshot:
//! - Status aggregation ([`summarize`])
//! - Page layout and PDF rendering ([`ReportGenerator`])
//! - Chart rendering ([`chart`])
//! - Exporting finished reports ([`export`])

pub mod chart;
pub mod error;
pub mod export;
pub mod generator;
pub mod layout;
mod pdf;
pub mod summary;

pub use chart::{ChartRenderer, PieChartRenderer};
pub use error::{ReportError, ReportResult};
pub use export::{ExportError, ExportReceipt, LocalExporter, ReportExporter};
pub use generator::{ReportArtifact, ReportGenerator};
pub use layout::{DetailBlock, DetailLine, Element, Page, Report};
pub use summary::{summarize, AggregationSummary, StatusCounts};
