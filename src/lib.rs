//! Client core for the Golden real-estate CRM: typed REST access to the
//! agency's records, a per-entity query cache, client-side search and
//! filtering, form drafts and the page controllers that tie them together.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod forms;
pub mod memory;
pub mod models;
pub mod pages;

pub use api::{Entities, EntityApi, FileUploader, Resource};
pub use cache::{Query, QueryClient};
pub use config::CrmConfig;
pub use error::{CrmError, Result};
pub use pages::{Page, Pages};
