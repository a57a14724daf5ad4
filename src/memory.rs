//! In-memory backend used by tests and offline demos.

use crate::api::{EntityApi, FileUploader, UploadRequest, UploadedFile};
use crate::error::{CrmError, Result};
use crate::models::Record;
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

struct State<T> {
    records: Vec<T>,
    next_id: u64,
    list_calls: usize,
    last_order_by: Option<String>,
    fail_next: Option<u16>,
}

/// An [`EntityApi`] that keeps records in a `Vec` and assigns ids itself
pub struct MemoryApi<T> {
    state: Mutex<State<T>>,
}

impl<T> Default for MemoryApi<T> {
    fn default() -> Self {
        Self {
            state: Mutex::new(State {
                records: Vec::new(),
                next_id: 1,
                list_calls: 0,
                last_order_by: None,
                fail_next: None,
            }),
        }
    }
}

impl<T: Record> MemoryApi<T> {
    /// Seed with records; those without an id get one assigned
    pub fn with_records(records: Vec<T>) -> Self {
        let api = Self::default();
        {
            let mut state = api.lock();
            for record in records {
                let record = match record.id() {
                    Some(_) => record,
                    None => {
                        let id = format!("mem-{}", state.next_id);
                        state.next_id += 1;
                        assign_id(&record, &id).unwrap_or(record)
                    }
                };
                state.records.push(record);
            }
        }
        api
    }

    /// Make the next call fail with the given HTTP status
    pub fn fail_next_with(&self, status: u16) {
        self.lock().fail_next = Some(status);
    }

    pub fn list_calls(&self) -> usize {
        self.lock().list_calls
    }

    pub fn last_order_by(&self) -> Option<String> {
        self.lock().last_order_by.clone()
    }

    /// Copy of everything currently stored
    pub fn records(&self) -> Vec<T> {
        self.lock().records.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn take_failure(state: &mut State<T>) -> Result<()> {
        match state.fail_next.take() {
            Some(status) => Err(CrmError::Http {
                status,
                body: "injected failure".to_string(),
            }),
            None => Ok(()),
        }
    }
}

// Set the id the way a backend would: on the serialized record.
fn assign_id<T: Record>(record: &T, id: &str) -> Result<T> {
    let mut value = serde_json::to_value(record)?;
    if let Some(object) = value.as_object_mut() {
        object.insert("id".to_string(), serde_json::Value::String(id.to_string()));
    }
    Ok(serde_json::from_value(value)?)
}

fn not_found(id: &str) -> CrmError {
    CrmError::Http {
        status: 404,
        body: format!("no record {id}"),
    }
}

#[async_trait]
impl<T: Record> EntityApi<T> for MemoryApi<T> {
    async fn list(&self, order_by: Option<&str>) -> Result<Vec<T>> {
        let mut state = self.lock();
        state.list_calls += 1;
        state.last_order_by = order_by.map(str::to_string);
        Self::take_failure(&mut state)?;
        Ok(state.records.clone())
    }

    async fn get(&self, id: &str) -> Result<T> {
        let mut state = self.lock();
        Self::take_failure(&mut state)?;
        state
            .records
            .iter()
            .find(|r| r.id() == Some(id))
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn create(&self, draft: &T) -> Result<T> {
        let mut state = self.lock();
        Self::take_failure(&mut state)?;
        let id = format!("mem-{}", state.next_id);
        state.next_id += 1;
        let saved = assign_id(draft, &id)?;
        state.records.push(saved.clone());
        Ok(saved)
    }

    async fn update(&self, id: &str, record: &T) -> Result<T> {
        let mut state = self.lock();
        Self::take_failure(&mut state)?;
        let saved = assign_id(record, id)?;
        let slot = state
            .records
            .iter_mut()
            .find(|r| r.id() == Some(id))
            .ok_or_else(|| not_found(id))?;
        *slot = saved.clone();
        Ok(saved)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut state = self.lock();
        Self::take_failure(&mut state)?;
        let before = state.records.len();
        state.records.retain(|r| r.id() != Some(id));
        if state.records.len() == before {
            return Err(not_found(id));
        }
        Ok(())
    }
}

/// A [`FileUploader`] that hands out `memory://` URLs
#[derive(Default)]
pub struct MemoryUploader {
    fail: Mutex<bool>,
    uploaded: Mutex<Vec<String>>,
}

impl MemoryUploader {
    /// Uploader whose every call fails
    pub fn failing() -> Self {
        Self {
            fail: Mutex::new(true),
            uploaded: Mutex::new(Vec::new()),
        }
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap_or_else(|p| p.into_inner()) = fail;
    }

    /// Names of the files accepted so far
    pub fn uploaded(&self) -> Vec<String> {
        self.uploaded.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

#[async_trait]
impl FileUploader for MemoryUploader {
    async fn upload(&self, file: UploadRequest) -> Result<UploadedFile> {
        if *self.fail.lock().unwrap_or_else(|p| p.into_inner()) {
            return Err(CrmError::Upload("upload endpoint unavailable".to_string()));
        }
        let file_url = format!("memory://{}", file.file_name);
        self.uploaded
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(file.file_name);
        Ok(UploadedFile { file_url })
    }
}
