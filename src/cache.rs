//! Per-entity query cache.
//!
//! Each [`Query`] memoizes the last successful `list()` of one resource as an
//! immutable snapshot. Invalidation swaps the snapshot out in one step, so a
//! reader holds either the complete old collection or fetches the new one.

use crate::api::{EntityApi, Entities, Resource};
use crate::error::Result;
use crate::models::{Client, Lead, Listing};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

/// Ordering hint the pages send for time-ordered collections
pub const NEWEST_FIRST: &str = "-created_date";

struct Slot<T> {
    data: Option<Arc<Vec<T>>>,
    /// Bumped on every invalidation
    generation: u64,
}

/// Cached collection for a single resource key
pub struct Query<T> {
    api: Arc<dyn EntityApi<T>>,
    resource: Resource,
    order_by: Option<String>,
    slot: RwLock<Slot<T>>,
    fetch_gate: Mutex<()>,
}

impl<T> Query<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(api: Arc<dyn EntityApi<T>>, resource: Resource, order_by: Option<&str>) -> Self {
        Self {
            api,
            resource,
            order_by: order_by.map(str::to_string),
            slot: RwLock::new(Slot {
                data: None,
                generation: 0,
            }),
            fetch_gate: Mutex::new(()),
        }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    /// Backend client this query reads through
    pub fn api(&self) -> &dyn EntityApi<T> {
        self.api.as_ref()
    }

    /// Current snapshot without touching the network
    pub async fn cached(&self) -> Option<Arc<Vec<T>>> {
        self.slot.read().await.data.clone()
    }

    /// Snapshot of the collection, fetching it on a miss.
    ///
    /// Concurrent misses share one fetch. A fetch that started before an
    /// invalidation is returned to its caller but never stored.
    pub async fn fetch(&self) -> Result<Arc<Vec<T>>> {
        if let Some(data) = self.cached().await {
            return Ok(data);
        }

        let _gate = self.fetch_gate.lock().await;
        if let Some(data) = self.cached().await {
            return Ok(data);
        }

        let generation = self.slot.read().await.generation;
        let records = Arc::new(self.api.list(self.order_by.as_deref()).await?);

        let mut slot = self.slot.write().await;
        if slot.generation == generation {
            slot.data = Some(Arc::clone(&records));
        } else {
            debug!("{} changed while fetching, not caching stale result", self.resource);
        }
        debug!("Cached {} {}", records.len(), self.resource);
        Ok(records)
    }

    /// Drop the snapshot so the next read fetches again
    pub async fn invalidate(&self) {
        let mut slot = self.slot.write().await;
        slot.data = None;
        slot.generation += 1;
        debug!("Invalidated {} (generation {})", self.resource, slot.generation);
    }

    /// Create through the backend, then invalidate
    pub async fn create(&self, draft: &T) -> Result<T> {
        let saved = self.api.create(draft).await?;
        self.invalidate().await;
        Ok(saved)
    }

    /// Update through the backend, then invalidate
    pub async fn update(&self, id: &str, record: &T) -> Result<T> {
        let saved = self.api.update(id, record).await?;
        self.invalidate().await;
        Ok(saved)
    }

    /// Delete through the backend, then invalidate
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.api.delete(id).await?;
        self.invalidate().await;
        Ok(())
    }
}

/// The queries shared by every page of one session
#[derive(Clone)]
pub struct QueryClient {
    pub clients: Arc<Query<Client>>,
    pub leads: Arc<Query<Lead>>,
    pub listings: Arc<Query<Listing>>,
}

impl QueryClient {
    pub fn new(entities: &Entities) -> Self {
        info!("Initializing query cache");
        Self::with_apis(
            Arc::new(entities.clients.clone()),
            Arc::new(entities.leads.clone()),
            Arc::new(entities.listings.clone()),
        )
    }

    /// Build from arbitrary backends, e.g. in-memory ones
    pub fn with_apis(
        clients: Arc<dyn EntityApi<Client>>,
        leads: Arc<dyn EntityApi<Lead>>,
        listings: Arc<dyn EntityApi<Listing>>,
    ) -> Self {
        Self {
            clients: Arc::new(Query::new(clients, Resource::Clients, None)),
            leads: Arc::new(Query::new(leads, Resource::Leads, Some(NEWEST_FIRST))),
            listings: Arc::new(Query::new(listings, Resource::Listings, Some(NEWEST_FIRST))),
        }
    }

    /// Invalidate the cached collection for `resource`, if it is cached here
    pub async fn invalidate(&self, resource: Resource) {
        match resource {
            Resource::Clients => self.clients.invalidate().await,
            Resource::Leads => self.leads.invalidate().await,
            Resource::Listings => self.listings.invalidate().await,
            other => debug!("{} is not cached, nothing to invalidate", other),
        }
    }
}
