//! Page controllers: one cached collection, its search box and filter panel,
//! and at most one open form.
//!
//! Failures never escape a page as panics or dead ends. They are logged and
//! collected as user-facing alerts, and the page keeps working with what it
//! has (an empty list on a failed load, the untouched draft on a failed save).

pub mod stats;

pub use stats::{Activity, ActivityApis, ClientStats, DashboardStats, LeadStats, ListingStats};

use crate::api::{FileUploader, UploadRequest};
use crate::cache::{Query, QueryClient};
use crate::error::{CrmError, Result};
use crate::filter::{filter, FilterState, Searchable};
use crate::forms::{Draft, FormState};
use crate::models::{Client, Lead, Listing};
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{info, warn};

/// What a record type needs to be shown on a page
pub trait PageEntity: Draft + Searchable {
    type Filters: FilterState<Self>;
    type Stats: Debug;

    /// Summary over the whole collection; `visible` is the filtered count
    fn stats(all: &[Self], visible: usize) -> Self::Stats;
}

pub struct Page<T: PageEntity> {
    query: Arc<Query<T>>,
    records: Arc<Vec<T>>,
    search: String,
    filters: T::Filters,
    form: Option<FormState<T>>,
    alerts: Vec<String>,
}

pub type ClientsPage = Page<Client>;
pub type LeadsPage = Page<Lead>;
pub type ListingsPage = Page<Listing>;

impl<T: PageEntity> Page<T> {
    pub fn new(query: Arc<Query<T>>) -> Self {
        Self {
            query,
            records: Arc::new(Vec::new()),
            search: String::new(),
            filters: T::Filters::default(),
            form: None,
            alerts: Vec::new(),
        }
    }

    /// Fetch the collection through the cache. A failure shows up as an
    /// alert and an empty list.
    pub async fn load(&mut self) -> &[T] {
        match self.query.fetch().await {
            Ok(records) => self.records = records,
            Err(e) => {
                self.alert("Loading", &e);
                self.records = Arc::new(Vec::new());
            }
        }
        &self.records
    }

    /// Unfiltered snapshot from the last load
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Records that pass the search term and every filter, in server order
    pub fn visible(&self) -> Vec<&T> {
        filter(self.records.as_slice(), &self.search, &self.filters)
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn filters(&self) -> &T::Filters {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut T::Filters {
        &mut self.filters
    }

    /// Set one drop-down from `key`/`value`; a bad pair leaves filters as they were
    pub fn set_filter(&mut self, key: &str, value: &str) -> Result<()> {
        self.filters.set(key, value)
    }

    pub fn reset_filters(&mut self) {
        self.search.clear();
        self.filters = T::Filters::default();
    }

    pub fn stats(&self) -> T::Stats {
        T::stats(&self.records, self.visible().len())
    }

    pub fn form(&self) -> Option<&FormState<T>> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut FormState<T>> {
        self.form.as_mut()
    }

    /// Open an empty form, replacing any form already open
    pub fn open_create(&mut self) -> &mut FormState<T> {
        self.form.insert(FormState::create())
    }

    /// Open a form on the loaded record with `id`
    pub fn open_edit(&mut self, id: &str) -> Result<&mut FormState<T>> {
        let record = self
            .records
            .iter()
            .find(|r| r.id() == Some(id))
            .ok_or_else(|| CrmError::invalid(format!("no {} with id {id} is loaded", T::NAME)))?;
        let form = FormState::edit(record)?;
        Ok(self.form.insert(form))
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Submit the open form. On success the collection is invalidated, the
    /// form closes and the page reloads; on failure an alert is raised and
    /// the form stays open with its draft intact.
    pub async fn submit_form(&mut self) -> Result<T> {
        let Some(form) = self.form.as_mut() else {
            return Err(CrmError::invalid(format!("no {} form is open", T::NAME)));
        };

        match form.submit(self.query.api()).await {
            Ok(saved) => {
                self.query.invalidate().await;
                self.form = None;
                self.load().await;
                Ok(saved)
            }
            Err(e) => {
                self.alert("Saving", &e);
                Err(e)
            }
        }
    }

    /// Delete a record, then reload
    pub async fn delete(&mut self, id: &str) -> Result<()> {
        if let Err(e) = self.query.delete(id).await {
            self.alert("Deleting", &e);
            return Err(e);
        }
        info!("🗑️  Deleted {} {}", T::NAME, id);
        self.load().await;
        Ok(())
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    /// Hand pending alerts to the caller, leaving none behind
    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    fn alert(&mut self, action: &str, err: &CrmError) {
        self.alert_as(action, err, err.alert_message());
    }

    fn alert_as(&mut self, action: &str, err: &CrmError, message: String) {
        warn!("{} {} failed: {}", action, self.query.resource(), err);
        self.alerts.push(message);
    }
}

/// Upload-backed attachments on the open listing form
impl Page<Listing> {
    pub async fn attach_image(&mut self, uploader: &dyn FileUploader, file: UploadRequest) -> Result<usize> {
        let Some(form) = self.form.as_mut() else {
            return Err(CrmError::invalid("no listing form is open"));
        };
        let result = form.attach_image(uploader, file).await;
        if let Err(e) = &result {
            self.alert_as("Uploading image for", e, e.image_alert_message());
        }
        result
    }

    pub async fn attach_file(&mut self, uploader: &dyn FileUploader, file: UploadRequest) -> Result<usize> {
        let Some(form) = self.form.as_mut() else {
            return Err(CrmError::invalid("no listing form is open"));
        };
        let result = form.attach_file(uploader, file).await;
        if let Err(e) = &result {
            self.alert("Uploading file for", e);
        }
        result
    }
}

/// One page per cached entity, sharing a [`QueryClient`]
pub struct Pages {
    pub clients: ClientsPage,
    pub leads: LeadsPage,
    pub listings: ListingsPage,
}

impl Pages {
    pub fn new(queries: &QueryClient) -> Self {
        Self {
            clients: Page::new(Arc::clone(&queries.clients)),
            leads: Page::new(Arc::clone(&queries.leads)),
            listings: Page::new(Arc::clone(&queries.listings)),
        }
    }
}
