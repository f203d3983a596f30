use crate::utils::error::SplitError;
use chrono::{DateTime, Utc};

pub type Row = Vec<String>;
pub type Header = Vec<String>;
pub type GroupKey = String;

/// Everything read from the source. The header is kept apart from the data
/// rows and is never grouped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub header: Header,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(header: Header, rows: Vec<Row>) -> Self {
        Self { header, rows }
    }
}

/// Header plus the rows sharing one group key. The unit of work for one
/// worker and one spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupBatch {
    key: GroupKey,
    values: Vec<Row>,
}

impl GroupBatch {
    pub(crate) fn from_parts(key: GroupKey, header: &Header, rows: Vec<Row>) -> Self {
        let mut values = Vec::with_capacity(rows.len() + 1);
        values.push(header.clone());
        values.extend(rows);
        Self { key, values }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Header first, then the member rows in source order.
    pub fn values(&self) -> &[Row] {
        &self.values
    }

    pub fn rows(&self) -> &[Row] {
        &self.values[1..]
    }

    pub fn data_rows(&self) -> usize {
        self.values.len() - 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerStep {
    Create,
    Grant,
    Write,
    /// The worker task itself died before reporting.
    Join,
}

impl std::fmt::Display for WorkerStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WorkerStep::Create => "create",
            WorkerStep::Grant => "grant",
            WorkerStep::Write => "write",
            WorkerStep::Join => "join",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub struct StepError {
    pub step: WorkerStep,
    pub error: SplitError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSuccess {
    pub key: GroupKey,
    pub spreadsheet_id: String,
    pub rows_written: usize,
}

#[derive(Debug)]
pub struct GroupFailure {
    pub key: GroupKey,
    pub spreadsheet_id: Option<String>,
    pub errors: Vec<StepError>,
}

impl GroupFailure {
    pub fn failed_steps(&self) -> Vec<WorkerStep> {
        self.errors.iter().map(|e| e.step).collect()
    }
}

/// A worker's terminal result, sent exactly once to the coordinator.
#[derive(Debug)]
pub enum Outcome {
    Succeeded(GroupSuccess),
    Failed(GroupFailure),
}

impl Outcome {
    pub fn key(&self) -> &str {
        match self {
            Outcome::Succeeded(s) => &s.key,
            Outcome::Failed(f) => &f.key,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded(_))
    }
}

#[derive(Debug)]
pub struct AggregateReport {
    pub launched: usize,
    pub successes: Vec<GroupSuccess>,
    pub failures: Vec<GroupFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl AggregateReport {
    pub fn new(launched: usize) -> Self {
        Self {
            launched,
            successes: Vec::with_capacity(launched),
            failures: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Succeeded(success) => self.successes.push(success),
            Outcome::Failed(failure) => self.failures.push(failure),
        }
    }

    pub fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }

    /// Rows written per successful group, in completion order.
    pub fn produced_counts(&self) -> Vec<usize> {
        self.successes.iter().map(|s| s.rows_written).collect()
    }

    pub fn reported(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.reported() == self.launched
    }

    pub fn success_for(&self, key: &str) -> Option<&GroupSuccess> {
        self.successes.iter().find(|s| s.key == key)
    }

    pub fn failure_for(&self, key: &str) -> Option<&GroupFailure> {
        self.failures.iter().find(|f| f.key == key)
    }

    pub fn elapsed(&self) -> Option<chrono::Duration> {
        self.finished_at.map(|end| end - self.started_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Row {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_batch_puts_header_first() {
        let header = row(&["x", "y", "z"]);
        let batch = GroupBatch::from_parts(
            "g1".to_string(),
            &header,
            vec![row(&["a", "b", "g1"]), row(&["e", "f", "g1"])],
        );

        assert_eq!(batch.key(), "g1");
        assert_eq!(batch.values()[0], header);
        assert_eq!(batch.data_rows(), 2);
        assert_eq!(batch.rows()[1], row(&["e", "f", "g1"]));
    }

    #[test]
    fn test_report_keeps_both_branches() {
        let mut report = AggregateReport::new(2);
        report.record(Outcome::Succeeded(GroupSuccess {
            key: "g1".to_string(),
            spreadsheet_id: "sheet-1".to_string(),
            rows_written: 2,
        }));
        assert!(!report.is_complete());

        report.record(Outcome::Failed(GroupFailure {
            key: "g2".to_string(),
            spreadsheet_id: None,
            errors: vec![StepError {
                step: WorkerStep::Create,
                error: SplitError::auth("expired"),
            }],
        }));
        let report = report.finish();

        assert!(report.is_complete());
        assert_eq!(report.produced_counts(), vec![2]);
        assert_eq!(
            report.failure_for("g2").unwrap().failed_steps(),
            vec![WorkerStep::Create]
        );
        assert!(report.elapsed().is_some());
    }
}
