use crate::adapters::google::{api_url, check_status, parse_endpoint, GoogleSession};
use crate::core::SpreadsheetService;
use crate::utils::error::{Result, SplitError};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use url::Url;

pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Google Sheets v4 client.
#[derive(Debug, Clone)]
pub struct GoogleSheets {
    session: Arc<GoogleSession>,
    endpoint: Url,
    sheet_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedSpreadsheet {
    spreadsheet_id: String,
}

impl GoogleSheets {
    pub fn new(session: Arc<GoogleSession>, endpoint: &str) -> Result<Self> {
        Ok(Self {
            session,
            endpoint: parse_endpoint("sheets_endpoint", endpoint)?,
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        })
    }

    pub fn with_sheet_name(mut self, sheet_name: &str) -> Self {
        self.sheet_name = sheet_name.to_string();
        self
    }
}

/// Bijective base-26 column name: 1 → A, 26 → Z, 27 → AA.
pub fn column_name(mut n: usize) -> String {
    let mut name = Vec::new();
    while n > 0 {
        n -= 1;
        name.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    name.reverse();
    String::from_utf8(name).unwrap_or_default()
}

/// A1 range covering exactly `values`: `Sheet1!A1:C3` for 3 rows of width 3.
/// Ragged rows are sized by the widest one.
pub fn block_range(sheet_name: &str, values: &[Vec<String>]) -> String {
    let width = values.iter().map(Vec::len).max().unwrap_or(0).max(1);
    let height = values.len().max(1);
    format!("{}!A1:{}{}", sheet_name, column_name(width), height)
}

#[async_trait]
impl SpreadsheetService for GoogleSheets {
    async fn create(&self, title: &str) -> Result<String> {
        let url = api_url(&self.endpoint, &["v4", "spreadsheets"]);
        tracing::debug!("Creating spreadsheet '{}'", title);

        let response = self
            .session
            .http()
            .post(url)
            .bearer_auth(self.session.bearer())
            .json(&serde_json::json!({ "properties": { "title": title } }))
            .send()
            .await?;
        let created: CreatedSpreadsheet = check_status("sheets", response).await?.json().await?;

        Ok(created.spreadsheet_id)
    }

    async fn write(&self, spreadsheet_id: &str, values: &[Vec<String>]) -> Result<()> {
        if spreadsheet_id.is_empty() {
            return Err(SplitError::ValidationError {
                message: "cannot write to a spreadsheet without an id".to_string(),
            });
        }

        let range = block_range(&self.sheet_name, values);
        let mut url = api_url(
            &self.endpoint,
            &["v4", "spreadsheets", spreadsheet_id, "values", range.as_str()],
        );
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED");
        tracing::debug!("Writing {} rows to {} ({})", values.len(), spreadsheet_id, range);

        let response = self
            .session
            .http()
            .put(url)
            .bearer_auth(self.session.bearer())
            .json(&serde_json::json!({
                "range": range,
                "majorDimension": "ROWS",
                "values": values,
            }))
            .send()
            .await?;
        check_status("sheets", response).await?;

        Ok(())
    }
}
