pub mod http;
pub mod traits;
pub mod types;
pub mod upload;

pub use http::HttpEntityClient;
pub use traits::{EntityApi, FileUploader};
pub use types::{Resource, UploadRequest, UploadedFile};
pub use upload::CoreUpload;

use crate::config::CrmConfig;
use crate::error::{CrmError, Result};
use crate::models::{Client, Lead, Listing};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};

/// Shared HTTP client for every entity and the uploader
pub fn build_http_client(config: &CrmConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .build()
        .map_err(|e| CrmError::Config(format!("cannot build HTTP client: {e}")))?;
    Ok(client)
}

/// Typed clients for the entities the pages work with, plus the uploader
#[derive(Clone)]
pub struct Entities {
    pub clients: HttpEntityClient<Client>,
    pub leads: HttpEntityClient<Lead>,
    pub listings: HttpEntityClient<Listing>,
    pub upload: CoreUpload,
    http: reqwest::Client,
    config: CrmConfig,
}

impl Entities {
    pub fn new(config: &CrmConfig) -> Result<Self> {
        let http = build_http_client(config)?;
        Ok(Self {
            clients: HttpEntityClient::new(http.clone(), config, Resource::Clients),
            leads: HttpEntityClient::new(http.clone(), config, Resource::Leads),
            listings: HttpEntityClient::new(http.clone(), config, Resource::Listings),
            upload: CoreUpload::new(http.clone(), config),
            http,
            config: config.clone(),
        })
    }

    /// Untyped client for resources without a model (deals, offers, ...)
    pub fn raw(&self, resource: Resource) -> HttpEntityClient<serde_json::Value> {
        HttpEntityClient::new(self.http.clone(), &self.config, resource)
    }
}
