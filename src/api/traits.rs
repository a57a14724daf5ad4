use crate::api::types::{UploadRequest, UploadedFile};
use crate::error::Result;
use async_trait::async_trait;

/// CRUD operations against one resource collection.
/// Implemented over HTTP by `HttpEntityClient` and in memory by tests.
#[async_trait]
pub trait EntityApi<T>: Send + Sync {
    /// Whole collection in server order, optionally with an ordering hint
    async fn list(&self, order_by: Option<&str>) -> Result<Vec<T>>;

    async fn get(&self, id: &str) -> Result<T>;

    /// Persist a draft; the returned record carries the assigned id
    async fn create(&self, draft: &T) -> Result<T>;

    /// Full replacement of the record with `id`
    async fn update(&self, id: &str, record: &T) -> Result<T>;

    async fn delete(&self, id: &str) -> Result<()>;
}

/// Turns a local file into a URL the backend can reference
#[async_trait]
pub trait FileUploader: Send + Sync {
    async fn upload(&self, file: UploadRequest) -> Result<UploadedFile>;
}
