use crate::core::grouping::derive_groups;
use crate::core::worker::GroupWorker;
use crate::core::{
    AccessService, AggregateReport, GroupFailure, GroupKey, Outcome, SpreadsheetService,
    StepError, Table, WorkerStep,
};
use crate::utils::error::SplitError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{Id, JoinSet};

/// Launches one worker per group and gathers their outcomes.
pub struct Coordinator<S: SpreadsheetService, A: AccessService> {
    worker: GroupWorker<S, A>,
}

impl<S, A> Coordinator<S, A>
where
    S: SpreadsheetService + 'static,
    A: AccessService + 'static,
{
    pub fn new(worker: GroupWorker<S, A>) -> Self {
        Self { worker }
    }

    /// Never fails: every group ends up in the report, as a success or a failure.
    pub async fn execute(&self, table: Arc<Table>) -> AggregateReport {
        let groups = derive_groups(&table.rows);
        let n = groups.len();
        let mut report = AggregateReport::new(n);

        if groups.is_empty() {
            tracing::info!("📭 No groups found, nothing to dispatch");
            return report.finish();
        }

        tracing::info!("🚀 Dispatching {} groups", n);

        // One send per worker, so a capacity of n never blocks a sender.
        let (tx, mut rx) = mpsc::channel::<Outcome>(n);
        let mut workers = JoinSet::new();
        let mut launched: HashMap<Id, GroupKey> = HashMap::with_capacity(n);

        for key in groups.into_keys() {
            let handle = workers.spawn(run_worker(
                self.worker.clone(),
                key.clone(),
                Arc::clone(&table),
                tx.clone(),
            ));
            launched.insert(handle.id(), key);
        }

        let supervisor = tokio::spawn(supervise(workers, launched, tx));

        while let Some(outcome) = rx.recv().await {
            log_outcome(&outcome);
            report.record(outcome);
        }

        match supervisor.await {
            Ok(lost) => {
                for failure in lost {
                    tracing::error!("❌ {}: worker did not report an outcome", failure.key);
                    report.record(Outcome::Failed(failure));
                }
            }
            Err(e) => tracing::error!("❌ Supervisor task failed: {}", e),
        }

        let report = report.finish();
        tracing::info!(
            "📊 {} groups: {} succeeded, {} failed",
            report.launched,
            report.successes.len(),
            report.failures.len()
        );
        report
    }
}

async fn run_worker<S, A>(
    worker: GroupWorker<S, A>,
    key: GroupKey,
    table: Arc<Table>,
    results: mpsc::Sender<Outcome>,
) where
    S: SpreadsheetService,
    A: AccessService,
{
    let outcome = worker.run(key, table).await;
    if let Err(e) = results.send(outcome).await {
        tracing::warn!("⚠️ {}: outcome dropped, receiver closed", e.0.key());
    }
}

/// Waits for every worker, then closes the channel by dropping the last
/// sender. Workers that died without reporting come back as failures.
async fn supervise(
    mut workers: JoinSet<()>,
    mut launched: HashMap<Id, GroupKey>,
    results: mpsc::Sender<Outcome>,
) -> Vec<GroupFailure> {
    let mut lost = Vec::new();

    while let Some(joined) = workers.join_next_with_id().await {
        match joined {
            Ok((id, ())) => {
                launched.remove(&id);
            }
            Err(e) => {
                let key = launched.remove(&e.id()).unwrap_or_default();
                lost.push(GroupFailure {
                    key,
                    spreadsheet_id: None,
                    errors: vec![StepError {
                        step: WorkerStep::Join,
                        error: SplitError::ProcessingError {
                            message: e.to_string(),
                        },
                    }],
                });
            }
        }
    }

    drop(results);
    lost
}

fn log_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Succeeded(success) => tracing::info!(
            "✅ {}: {} rows in {}",
            success.key,
            success.rows_written,
            success.spreadsheet_id
        ),
        Outcome::Failed(failure) => {
            for step_error in &failure.errors {
                tracing::error!(
                    "❌ {}: {} step failed: {}",
                    failure.key,
                    step_error.step,
                    step_error.error
                );
            }
        }
    }
}
