use crate::adapters::google::{api_url, check_status, parse_endpoint, GoogleSession};
use crate::core::AccessService;
use crate::utils::error::{Result, SplitError};
use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

/// Google Drive v3 permissions client.
#[derive(Debug, Clone)]
pub struct GoogleDrive {
    session: Arc<GoogleSession>,
    endpoint: Url,
}

impl GoogleDrive {
    pub fn new(session: Arc<GoogleSession>, endpoint: &str) -> Result<Self> {
        Ok(Self {
            session,
            endpoint: parse_endpoint("drive_endpoint", endpoint)?,
        })
    }
}

#[async_trait]
impl AccessService for GoogleDrive {
    async fn grant(&self, resource_id: &str) -> Result<()> {
        if resource_id.is_empty() {
            return Err(SplitError::ValidationError {
                message: "cannot grant access to a file without an id".to_string(),
            });
        }

        let url = api_url(
            &self.endpoint,
            &["drive", "v3", "files", resource_id, "permissions"],
        );
        tracing::debug!("Granting anyone/writer on {}", resource_id);

        let response = self
            .session
            .http()
            .post(url)
            .bearer_auth(self.session.bearer())
            .json(&serde_json::json!({ "type": "anyone", "role": "writer" }))
            .send()
            .await?;
        check_status("drive", response).await?;

        Ok(())
    }
}
