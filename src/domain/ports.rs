use crate::domain::model::Table;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Produces the header and data rows of the source.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn read(&self) -> Result<Table>;
}

#[async_trait]
pub trait SpreadsheetService: Send + Sync {
    /// Creates a new spreadsheet and returns its id.
    async fn create(&self, title: &str) -> Result<String>;

    /// Writes `values` as one rectangular block starting at the first cell.
    async fn write(&self, spreadsheet_id: &str, values: &[Vec<String>]) -> Result<()>;
}

#[async_trait]
pub trait AccessService: Send + Sync {
    /// Lets anyone holding the id edit the resource.
    async fn grant(&self, resource_id: &str) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn source_path(&self) -> &str;
    fn credentials_path(&self) -> &str;
    fn encoding(&self) -> &str;
    fn delimiter(&self) -> char;
    fn title_template(&self) -> &str;
    fn sheet_name(&self) -> &str;
    fn failure_policy(&self) -> FailurePolicy;
    fn sheets_endpoint(&self) -> &str;
    fn drive_endpoint(&self) -> &str;
}

/// What a worker does with its remaining steps once one step has failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    #[default]
    StopAtFirstFailure,
    /// Attempt every later step anyway, with whatever the failed step left behind.
    ContinueAfterFailure,
}
