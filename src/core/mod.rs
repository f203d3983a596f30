pub mod coordinator;
pub mod engine;
pub mod grouping;
pub mod worker;

pub use crate::domain::model::{
    AggregateReport, GroupBatch, GroupFailure, GroupKey, GroupSuccess, Header, Outcome, Row,
    StepError, Table, WorkerStep,
};
pub use crate::domain::ports::{
    AccessService, ConfigProvider, FailurePolicy, RecordSource, SpreadsheetService,
};
pub use crate::utils::error::Result;
