//! Status aggregation

use cp_models::ProjectStatus;
use cp_store::Snapshot;
use serde::Serialize;
use tracing::warn;

/// Record count per recognized status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub in_progress: usize,
    pub finished: usize,
}

impl StatusCounts {
    pub fn get(&self, status: ProjectStatus) -> usize {
        match status {
            ProjectStatus::InProgress => self.in_progress,
            ProjectStatus::Finished => self.finished,
        }
    }

    /// Records with a recognized status
    pub fn total(&self) -> usize {
        self.in_progress + self.finished
    }

    /// `(status, count)` in display order
    pub fn iter(&self) -> impl Iterator<Item = (ProjectStatus, usize)> + '_ {
        ProjectStatus::ALL.into_iter().map(|status| (status, self.get(status)))
    }

    fn increment(&mut self, status: ProjectStatus) {
        match status {
            ProjectStatus::InProgress => self.in_progress += 1,
            ProjectStatus::Finished => self.finished += 1,
        }
    }
}

/// Counts plus the snapshot they were computed from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationSummary {
    pub counts: StatusCounts,
    /// Records whose status matched neither literal
    pub unrecognized: usize,
    pub records: Snapshot,
}

/// Count records per status
///
/// Records with an unrecognized status stay in `records` but are left out of
/// the counts.
pub fn summarize(records: Snapshot) -> AggregationSummary {
    let mut counts = StatusCounts::default();
    let mut unrecognized = 0;

    for project in records.iter() {
        match project.status.known() {
            Some(status) => counts.increment(status),
            None => {
                unrecognized += 1;
                warn!(
                    id = ?project.id,
                    status = project.status.as_str(),
                    "Excluding record with unrecognized status from counts"
                );
            }
        }
    }

    AggregationSummary {
        counts,
        unrecognized,
        records,
    }
}
