//! Chart rendering
//!
//! The generator only needs encoded image bytes; how they are produced is up
//! to the [`ChartRenderer`] in use.

use std::f32::consts::PI;
use std::io::Cursor;

use async_trait::async_trait;
use bytes::Bytes;
use cp_models::ProjectStatus;
use image::{ImageFormat, Rgb, RgbImage};
use tracing::debug;

use crate::error::{ReportError, ReportResult};
use crate::summary::AggregationSummary;

/// Produces chart image bytes from a summary
#[async_trait]
pub trait ChartRenderer: Send + Sync {
    async fn render(&self, summary: &AggregationSummary) -> ReportResult<Bytes>;
}

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const EMPTY: Rgb<u8> = Rgb([220, 220, 220]);

/// Slice colour per status
pub fn status_color(status: ProjectStatus) -> Rgb<u8> {
    match status {
        ProjectStatus::InProgress => Rgb([0xFF, 0x63, 0x84]),
        ProjectStatus::Finished => Rgb([0x36, 0xA2, 0xEB]),
    }
}

/// Two-slice pie on a white canvas, PNG-encoded
///
/// Slices start at twelve o'clock and run clockwise in status display order.
/// With no counted records the disc is drawn grey.
#[derive(Debug, Clone)]
pub struct PieChartRenderer {
    width: u32,
    height: u32,
}

impl Default for PieChartRenderer {
    fn default() -> Self {
        // Same aspect ratio as the report's chart slot.
        Self::new(720, 400)
    }
}

impl PieChartRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Rasterize the pie without encoding
    pub fn draw(&self, summary: &AggregationSummary) -> RgbImage {
        let counts = summary.counts;
        let total = counts.total() as f32;
        let cx = self.width as f32 / 2.0;
        let cy = self.height as f32 / 2.0;
        let radius = cx.min(cy) * 0.9;

        // Cumulative end angle of each slice, as a fraction of the turn.
        let mut bounds = Vec::with_capacity(ProjectStatus::ALL.len());
        let mut acc = 0.0;
        for (status, count) in counts.iter() {
            if total > 0.0 {
                acc += count as f32 / total;
            }
            bounds.push((acc, status_color(status)));
        }

        RgbImage::from_fn(self.width, self.height, |x, y| {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            if dx * dx + dy * dy > radius * radius {
                return WHITE;
            }
            if total == 0.0 {
                return EMPTY;
            }
            // Clockwise from twelve o'clock, in [0, 1).
            let turn = (dx.atan2(-dy) / (2.0 * PI)).rem_euclid(1.0);
            bounds
                .iter()
                .find(|(end, _)| turn < *end)
                .or_else(|| bounds.last())
                .map_or(EMPTY, |(_, color)| *color)
        })
    }
}

#[async_trait]
impl ChartRenderer for PieChartRenderer {
    async fn render(&self, summary: &AggregationSummary) -> ReportResult<Bytes> {
        let canvas = self.draw(summary);

        let mut buffer = Cursor::new(Vec::new());
        canvas
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(|e| ReportError::ChartRender(e.to_string()))?;

        let bytes = buffer.into_inner();
        debug!(
            width = self.width,
            height = self.height,
            size = bytes.len(),
            "Chart rendered"
        );
        Ok(Bytes::from(bytes))
    }
}
