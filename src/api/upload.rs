use crate::api::traits::FileUploader;
use crate::api::types::{UploadRequest, UploadedFile};
use crate::config::CrmConfig;
use crate::error::{CrmError, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, info, warn};

const UPLOAD_PATH: &str = "integrations/core/upload";

/// Client for the backend's core upload integration
#[derive(Clone)]
pub struct CoreUpload {
    client: Client,
    url: String,
}

impl CoreUpload {
    pub fn new(client: Client, config: &CrmConfig) -> Self {
        Self {
            client,
            url: config.url(UPLOAD_PATH),
        }
    }
}

#[async_trait]
impl FileUploader for CoreUpload {
    async fn upload(&self, file: UploadRequest) -> Result<UploadedFile> {
        debug!("POST {} ({}, {} bytes)", self.url, file.file_name, file.bytes.len());

        let mut part = Part::bytes(file.bytes).file_name(file.file_name.clone());
        if let Some(content_type) = &file.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| CrmError::Upload(format!("bad content type {content_type:?}: {e}")))?;
        }
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| CrmError::Upload(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Upload of {} rejected: {}", file.file_name, status);
            return Err(CrmError::Upload(format!("backend returned {status}")));
        }

        let uploaded: UploadedFile = response
            .json()
            .await
            .map_err(|e| CrmError::Upload(format!("unexpected upload response: {e}")))?;

        info!("📎 Uploaded {} -> {}", file.file_name, uploaded.file_url);
        Ok(uploaded)
    }
}
