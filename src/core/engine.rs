use crate::core::coordinator::Coordinator;
use crate::core::grouping::partition;
use crate::core::{AccessService, AggregateReport, GroupBatch, RecordSource, SpreadsheetService};
use crate::utils::error::Result;
use std::sync::Arc;

/// Read → dispatch → summarize. Only a failed read is returned as an error.
pub struct SplitEngine<R, S, A>
where
    R: RecordSource,
    S: SpreadsheetService,
    A: AccessService,
{
    source: R,
    coordinator: Coordinator<S, A>,
}

impl<R, S, A> SplitEngine<R, S, A>
where
    R: RecordSource,
    S: SpreadsheetService + 'static,
    A: AccessService + 'static,
{
    pub fn new(source: R, coordinator: Coordinator<S, A>) -> Self {
        Self {
            source,
            coordinator,
        }
    }

    pub async fn run(&self) -> Result<AggregateReport> {
        tracing::info!("📥 Reading source records...");
        let table = self.source.read().await?;
        tracing::info!(
            "📥 Read {} data rows with {} columns",
            table.rows.len(),
            table.header.len()
        );

        let report = self.coordinator.execute(Arc::new(table)).await;

        tracing::info!("📊 Produced counts: {:?}", report.produced_counts());
        if let Some(elapsed) = report.elapsed() {
            tracing::info!("⏱️ Finished in {} ms", elapsed.num_milliseconds());
        }
        for failure in &report.failures {
            tracing::warn!(
                "⚠️ {} failed at {:?} (spreadsheet: {})",
                failure.key,
                failure.failed_steps(),
                failure.spreadsheet_id.as_deref().unwrap_or("-")
            );
        }

        Ok(report)
    }
}

/// Reads and partitions the source without touching any remote service.
pub async fn preview<R: RecordSource>(source: &R) -> Result<Vec<GroupBatch>> {
    let table = source.read().await?;
    let batches = partition(&table);
    tracing::info!(
        "🔍 {} data rows would be split into {} spreadsheets",
        table.rows.len(),
        batches.len()
    );
    for batch in &batches {
        tracing::info!("🔍 {}: {} rows", batch.key(), batch.data_rows());
    }
    Ok(batches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::worker::tests::MockGoogle;
    use crate::core::worker::GroupWorker;
    use crate::core::{Row, Table};
    use crate::utils::error::SplitError;
    use async_trait::async_trait;

    struct StaticSource(Option<Table>);

    #[async_trait]
    impl RecordSource for StaticSource {
        async fn read(&self) -> Result<Table> {
            self.0.clone().ok_or_else(|| {
                SplitError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "File not found: jobs.csv",
                ))
            })
        }
    }

    fn row(fields: &[&str]) -> Row {
        fields.iter().map(|f| f.to_string()).collect()
    }

    fn engine(
        source: StaticSource,
        google: MockGoogle,
    ) -> SplitEngine<StaticSource, MockGoogle, MockGoogle> {
        let google = Arc::new(google);
        let worker = GroupWorker::new(Arc::clone(&google), google);
        SplitEngine::new(source, Coordinator::new(worker))
    }

    #[tokio::test]
    async fn test_run_propagates_read_failure() {
        let result = engine(StaticSource(None), MockGoogle::new()).run().await;

        assert!(matches!(result, Err(SplitError::IoError(_))));
    }

    #[tokio::test]
    async fn test_run_succeeds_even_when_groups_fail() {
        let table = Table::new(
            row(&["x", "y", "z"]),
            vec![row(&["a", "b", "g1"]), row(&["c", "d", "g2"])],
        );

        let report = engine(
            StaticSource(Some(table)),
            MockGoogle::new().failing_create("g1").failing_grant("g2"),
        )
        .run()
        .await;

        let report = tokio_test::assert_ok!(report);
        assert!(report.successes.is_empty());
        assert_eq!(report.failures.len(), 2);
    }

    #[tokio::test]
    async fn test_preview_groups_without_remote_calls() {
        let table = Table::new(
            row(&["x", "k"]),
            vec![row(&["1", "b"]), row(&["2", "a"]), row(&["3", "b"])],
        );

        let batches = preview(&StaticSource(Some(table))).await.unwrap();

        let summary: Vec<(&str, usize)> =
            batches.iter().map(|b| (b.key(), b.data_rows())).collect();
        assert_eq!(summary, vec![("b", 2), ("a", 1)]);
    }
}
