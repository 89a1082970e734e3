//! Page layout
//!
//! Positions are millimetres on an A4 portrait page, measured from the top
//! left corner. The first page carries the title and the chart, then a
//! heading and one seven-line block per record.

use cp_core::config::ReportConfig;
use cp_models::{Project, ProjectId};

use crate::summary::AggregationSummary;

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const LEFT_MARGIN: f32 = 10.0;

pub const TITLE_Y: f32 = 10.0;
pub const CHART_Y: f32 = 20.0;
pub const CHART_WIDTH: f32 = 180.0;
pub const CHART_HEIGHT: f32 = 100.0;
pub const HEADING_Y: f32 = 130.0;
pub const DETAILS_START_Y: f32 = 140.0;

/// Top of the cursor on every page after the first
pub const PAGE_TOP_Y: f32 = 10.0;
pub const LINE_HEIGHT: f32 = 10.0;
/// Extra space after a block's last line
pub const BLOCK_GAP: f32 = 20.0;
/// A block starting below this goes to a new page
pub const BREAK_THRESHOLD_Y: f32 = 280.0;
/// Lowest baseline a block may reach in strict mode
pub const BOTTOM_LIMIT_Y: f32 = PAGE_HEIGHT - 10.0;

pub const LINES_PER_BLOCK: usize = 7;

/// Distance between the first baselines of consecutive blocks
pub const BLOCK_ADVANCE: f32 = (LINES_PER_BLOCK as f32 - 1.0) * LINE_HEIGHT + BLOCK_GAP;

/// One labelled line of a detail block
#[derive(Debug, Clone, PartialEq)]
pub struct DetailLine {
    pub label: &'static str,
    pub value: String,
}

impl DetailLine {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }

    /// Text as printed
    pub fn text(&self) -> String {
        format!("{}{}", self.label, self.value)
    }
}

/// Printed details of one record
#[derive(Debug, Clone, PartialEq)]
pub struct DetailBlock {
    pub project_id: Option<ProjectId>,
    /// Zero-based page index
    pub page: usize,
    /// Baseline of the first line
    pub top: f32,
    pub lines: Vec<DetailLine>,
}

impl DetailBlock {
    /// Name, dates, price, client, phone and status, in print order
    pub fn lines_for(project: &Project) -> Vec<DetailLine> {
        vec![
            DetailLine::new("Nombre del Proyecto: ", project.name.as_str()),
            DetailLine::new("Inicio del Proyecto: ", project.start_date.as_str()),
            DetailLine::new("Final del Proyecto: ", project.end_date.as_str()),
            DetailLine::new("Precio: ", project.price.as_str()),
            DetailLine::new("Cliente: ", project.client_full_name()),
            DetailLine::new("Teléfono: ", project.client_phone.as_str()),
            DetailLine::new("Estado: ", project.status.as_str()),
        ]
    }

    /// Baseline of the last line
    pub fn bottom(&self) -> f32 {
        self.top + (self.lines.len().saturating_sub(1)) as f32 * LINE_HEIGHT
    }
}

/// Something placed on a page
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text { x: f32, y: f32, text: String },
    Chart { x: f32, y: f32, width: f32, height: f32 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub elements: Vec<Element>,
}

impl Page {
    fn text(&mut self, x: f32, y: f32, text: impl Into<String>) {
        self.elements.push(Element::Text {
            x,
            y,
            text: text.into(),
        });
    }

    /// Every text element, top to bottom as placed
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|element| match element {
            Element::Text { text, .. } => Some(text.as_str()),
            Element::Chart { .. } => None,
        })
    }
}

/// Laid-out report, ready to render
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub title: String,
    pub pages: Vec<Page>,
    pub details: Vec<DetailBlock>,
}

impl Report {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Place title, chart, heading and one block per record
pub fn lay_out(summary: &AggregationSummary, config: &ReportConfig) -> Report {
    let mut first = Page::default();
    first.text(LEFT_MARGIN, TITLE_Y, config.title.as_str());
    first.elements.push(Element::Chart {
        x: LEFT_MARGIN,
        y: CHART_Y,
        width: CHART_WIDTH,
        height: CHART_HEIGHT,
    });
    first.text(LEFT_MARGIN, HEADING_Y, config.details_heading.as_str());

    let mut pages = vec![first];
    let mut details = Vec::with_capacity(summary.records.len());
    let mut y = DETAILS_START_Y;

    for project in summary.records.iter() {
        if needs_break(y, config.strict_pagination) {
            pages.push(Page::default());
            y = PAGE_TOP_Y;
        }

        let page_index = pages.len() - 1;
        let lines = DetailBlock::lines_for(project);
        let page = &mut pages[page_index];
        for (i, line) in lines.iter().enumerate() {
            page.text(LEFT_MARGIN, y + i as f32 * LINE_HEIGHT, line.text());
        }

        details.push(DetailBlock {
            project_id: project.id.clone(),
            page: page_index,
            top: y,
            lines,
        });
        y += BLOCK_ADVANCE;
    }

    Report {
        title: config.title.clone(),
        pages,
        details,
    }
}

fn needs_break(y: f32, strict: bool) -> bool {
    if strict {
        y + (LINES_PER_BLOCK as f32 - 1.0) * LINE_HEIGHT > BOTTOM_LIMIT_Y
    } else {
        y > BREAK_THRESHOLD_Y
    }
}
