use crate::api::traits::EntityApi;
use crate::api::types::Resource;
use crate::config::CrmConfig;
use crate::error::{CrmError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use tracing::{debug, warn};

/// REST client for one resource collection, decoding records as `T`
pub struct HttpEntityClient<T> {
    client: Client,
    base_url: String,
    resource: Resource,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for HttpEntityClient<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            resource: self.resource,
            _record: PhantomData,
        }
    }
}

impl<T> HttpEntityClient<T> {
    /// Create a client sharing an existing connection pool
    pub fn new(client: Client, config: &CrmConfig, resource: Resource) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            resource,
            _record: PhantomData,
        }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    fn collection_url(&self) -> String {
        format!("{}{}", self.base_url, self.resource.path())
    }

    fn record_url(&self, id: &str) -> String {
        format!("{}{}/{}", self.base_url, self.resource.path(), id)
    }

    /// Turn a non-2xx response into `CrmError::Http`
    async fn check_status(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(resource = %self.resource, status = status.as_u16(), "backend rejected request");
        Err(CrmError::Http {
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<R: DeserializeOwned>(&self, response: Response) -> Result<R> {
        let response = self.check_status(response).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            warn!(resource = %self.resource, "failed to decode response: {}", e);
            CrmError::Decode(e)
        })
    }
}

#[async_trait]
impl<T> EntityApi<T> for HttpEntityClient<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    async fn list(&self, order_by: Option<&str>) -> Result<Vec<T>> {
        let url = self.collection_url();
        debug!("GET {} (orderBy: {:?})", url, order_by);

        let mut request = self.client.get(&url);
        if let Some(order_by) = order_by {
            request = request.query(&[("orderBy", order_by)]);
        }
        let response = request.send().await?;
        let records: Vec<T> = self.decode(response).await?;

        debug!("Fetched {} {}", records.len(), self.resource);
        Ok(records)
    }

    async fn get(&self, id: &str) -> Result<T> {
        let url = self.record_url(id);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        self.decode(response).await
    }

    async fn create(&self, draft: &T) -> Result<T> {
        let url = self.collection_url();
        debug!("POST {}", url);

        let response = self.client.post(&url).json(draft).send().await?;
        self.decode(response).await
    }

    async fn update(&self, id: &str, record: &T) -> Result<T> {
        let url = self.record_url(id);
        debug!("PUT {}", url);

        let response = self.client.put(&url).json(record).send().await?;
        self.decode(response).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let url = self.record_url(id);
        debug!("DELETE {}", url);

        let response = self.client.delete(&url).send().await?;
        self.check_status(response).await?;
        Ok(())
    }
}
