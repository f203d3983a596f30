use crate::core::{
    AccessService, FailurePolicy, GroupBatch, GroupFailure, GroupKey, GroupSuccess, Outcome,
    SpreadsheetService, StepError, Table, WorkerStep,
};
use std::sync::Arc;

pub const DEFAULT_TITLE_TEMPLATE: &str = "案件名 (ID: {key})";

pub fn render_title(template: &str, key: &str) -> String {
    template.replace("{key}", key)
}

/// Runs create → grant → write for one group.
pub struct GroupWorker<S: SpreadsheetService, A: AccessService> {
    spreadsheets: Arc<S>,
    access: Arc<A>,
    title_template: Arc<str>,
    policy: FailurePolicy,
}

// Derived Clone would require S: Clone and A: Clone.
impl<S: SpreadsheetService, A: AccessService> Clone for GroupWorker<S, A> {
    fn clone(&self) -> Self {
        Self {
            spreadsheets: Arc::clone(&self.spreadsheets),
            access: Arc::clone(&self.access),
            title_template: Arc::clone(&self.title_template),
            policy: self.policy,
        }
    }
}

impl<S: SpreadsheetService, A: AccessService> GroupWorker<S, A> {
    pub fn new(spreadsheets: Arc<S>, access: Arc<A>) -> Self {
        Self {
            spreadsheets,
            access,
            title_template: Arc::from(DEFAULT_TITLE_TEMPLATE),
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_title_template(mut self, template: &str) -> Self {
        self.title_template = Arc::from(template);
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub async fn run(&self, key: GroupKey, table: Arc<Table>) -> Outcome {
        let batch = GroupBatch::collect(key, &table.header, &table.rows);
        let title = render_title(&self.title_template, batch.key());
        let mut errors: Vec<StepError> = Vec::new();

        tracing::debug!(
            "🧩 {}: {} rows, title '{}'",
            batch.key(),
            batch.data_rows(),
            title
        );

        let spreadsheet_id = match self.spreadsheets.create(&title).await {
            Ok(id) => {
                tracing::info!("📄 {}: created spreadsheet {}", batch.key(), id);
                Some(id)
            }
            Err(e) => {
                tracing::error!("❌ {}: create failed: {}", batch.key(), e);
                errors.push(StepError {
                    step: WorkerStep::Create,
                    error: e,
                });
                None
            }
        };
        if self.should_stop(&errors) {
            return failed(batch, spreadsheet_id, errors);
        }

        // Under ContinueAfterFailure a failed create leaves an empty id behind.
        let target = spreadsheet_id.clone().unwrap_or_default();

        match self.access.grant(&target).await {
            Ok(()) => tracing::info!("🔓 {}: granted writer access on {}", batch.key(), target),
            Err(e) => {
                tracing::error!("❌ {}: grant failed on '{}': {}", batch.key(), target, e);
                errors.push(StepError {
                    step: WorkerStep::Grant,
                    error: e,
                });
            }
        }
        if self.should_stop(&errors) {
            return failed(batch, spreadsheet_id, errors);
        }

        match self.spreadsheets.write(&target, batch.values()).await {
            Ok(()) => tracing::info!(
                "✍️ {}: wrote {} rows to {}",
                batch.key(),
                batch.data_rows(),
                target
            ),
            Err(e) => {
                tracing::error!("❌ {}: write failed on '{}': {}", batch.key(), target, e);
                errors.push(StepError {
                    step: WorkerStep::Write,
                    error: e,
                });
            }
        }

        if !errors.is_empty() {
            return failed(batch, spreadsheet_id, errors);
        }

        Outcome::Succeeded(GroupSuccess {
            key: batch.key().to_string(),
            spreadsheet_id: target,
            rows_written: batch.data_rows(),
        })
    }

    fn should_stop(&self, errors: &[StepError]) -> bool {
        self.policy == FailurePolicy::StopAtFirstFailure && !errors.is_empty()
    }
}

fn failed(batch: GroupBatch, spreadsheet_id: Option<String>, errors: Vec<StepError>) -> Outcome {
    Outcome::Failed(GroupFailure {
        key: batch.key().to_string(),
        spreadsheet_id,
        errors,
    })
}
