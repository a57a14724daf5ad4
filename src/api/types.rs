use crate::error::{CrmError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Resource collections exposed by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Clients,
    Leads,
    Deals,
    Commissions,
    Campaigns,
    Listings,
    Offers,
    Showings,
    Tasks,
    BuyerRequests,
}

impl Resource {
    pub const ALL: [Resource; 10] = [
        Resource::Clients,
        Resource::Leads,
        Resource::Deals,
        Resource::Commissions,
        Resource::Campaigns,
        Resource::Listings,
        Resource::Offers,
        Resource::Showings,
        Resource::Tasks,
        Resource::BuyerRequests,
    ];

    /// Path segment under the API root
    pub fn path(self) -> &'static str {
        match self {
            Resource::Clients => "clients",
            Resource::Leads => "leads",
            Resource::Deals => "deals",
            Resource::Commissions => "commissions",
            Resource::Campaigns => "campaigns",
            Resource::Listings => "listings",
            Resource::Offers => "offers",
            Resource::Showings => "showings",
            Resource::Tasks => "tasks",
            Resource::BuyerRequests => "buyerRequests",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Resource {
    type Err = CrmError;

    fn from_str(s: &str) -> Result<Self> {
        Resource::ALL
            .into_iter()
            .find(|r| r.path().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CrmError::invalid(format!("unknown resource {s:?}")))
    }
}

/// A single file to push through the upload endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl UploadRequest {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            content_type: None,
        }
    }

    /// Read a file from disk, keeping its base name
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| CrmError::Upload(format!("cannot read {}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

/// Upload endpoint response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub file_url: String,
}
