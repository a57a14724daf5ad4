//! Draft editing for the entity forms.
//!
//! A [`FormState`] owns one draft exclusively for its lifetime. It is seeded
//! from defaults (create) or from an existing record (edit), mutated through
//! setters and list operations, validated, then handed to the backend.

pub mod client;
pub mod lead;
pub mod list;
pub mod listing;

use crate::api::EntityApi;
use crate::error::{CrmError, Result};
use crate::models::Record;
use tracing::{info, warn};

/// Entity-specific behaviour a form needs from its draft type
pub trait Draft: Record {
    /// Human-readable entity name for logs
    const NAME: &'static str;

    /// Draft a create form starts from
    fn defaults() -> Self;

    /// Input constraints; empty when the draft may be submitted
    fn validate(&self) -> Vec<String>;
}

/// Whether submit creates a new record or replaces an existing one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

#[derive(Debug, Clone)]
pub struct FormState<D> {
    draft: D,
    mode: FormMode,
    busy: bool,
}

impl<D: Draft> FormState<D> {
    /// Empty form seeded with the entity's defaults
    pub fn create() -> Self {
        Self {
            draft: D::defaults(),
            mode: FormMode::Create,
            busy: false,
        }
    }

    /// Form editing a copy of `record`, which must already have an id
    pub fn edit(record: &D) -> Result<Self> {
        let id = record
            .id()
            .ok_or_else(|| CrmError::invalid(format!("cannot edit a {} that has no id", D::NAME)))?
            .to_string();
        Ok(Self {
            draft: record.clone(),
            mode: FormMode::Edit { id },
            busy: false,
        })
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    /// Field-level access to the draft
    pub fn draft_mut(&mut self) -> &mut D {
        &mut self.draft
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn editing_id(&self) -> Option<&str> {
        match &self.mode {
            FormMode::Edit { id } => Some(id),
            FormMode::Create => None,
        }
    }

    /// A submission is in flight
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn validate(&self) -> Result<()> {
        let errors = self.draft.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CrmError::Validation(errors))
        }
    }

    /// Validate, then create or update through `api`.
    ///
    /// On failure the draft is left exactly as it was so the user can retry.
    pub async fn submit(&mut self, api: &dyn EntityApi<D>) -> Result<D> {
        if self.busy {
            return Err(CrmError::invalid("a submission is already in progress"));
        }
        self.validate()?;

        let FormState { draft, mode, busy } = self;
        let _busy = BusyGuard::hold(busy);
        let result = match mode {
            FormMode::Create => api.create(&*draft).await,
            FormMode::Edit { id } => api.update(id.as_str(), &*draft).await,
        };

        match &result {
            Ok(saved) => info!("💾 Saved {} {}", D::NAME, saved.id().unwrap_or("?")),
            Err(e) => warn!("Saving {} failed: {}", D::NAME, e),
        }
        result
    }
}

/// Marks a form busy until dropped, so an abandoned submit never locks the form
struct BusyGuard<'a>(&'a mut bool);

impl<'a> BusyGuard<'a> {
    fn hold(flag: &'a mut bool) -> Self {
        *flag = true;
        BusyGuard(flag)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

fn required(errors: &mut Vec<String>, value: Option<&str>, label: &str) {
    if value.map_or(true, |v| v.trim().is_empty()) {
        errors.push(format!("{label} is required"));
    }
}

/// Same shape check a browser applies to `type=email`
fn check_email(errors: &mut Vec<String>, value: Option<&str>) {
    let Some(email) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return;
    };
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        errors.push(format!("{email:?} is not a valid email address"));
    }
}

/// `type=number` inputs only ever hold finite numbers
fn numeric(errors: &mut Vec<String>, value: Option<f64>, label: &str) {
    if value.is_some_and(|v| !v.is_finite()) {
        errors.push(format!("{label} must be a number"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryApi;
    use crate::models::{Lead, LeadSource, LeadType};
    use async_trait::async_trait;
    use std::time::Duration;

    /// A backend that never answers
    struct Stalled;

    #[async_trait]
    impl EntityApi<Lead> for Stalled {
        async fn list(&self, _order_by: Option<&str>) -> Result<Vec<Lead>> {
            std::future::pending().await
        }

        async fn get(&self, _id: &str) -> Result<Lead> {
            std::future::pending().await
        }

        async fn create(&self, _draft: &Lead) -> Result<Lead> {
            std::future::pending().await
        }

        async fn update(&self, _id: &str, _record: &Lead) -> Result<Lead> {
            std::future::pending().await
        }

        async fn delete(&self, _id: &str) -> Result<()> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn abandoned_submit_leaves_form_retryable() {
        let mut form = FormState::<Lead>::create();
        form.draft_mut().first_name = Some("יעל".into());
        form.draft_mut().phone_main = Some("050-1231234".into());
        form.draft_mut().source = Some(LeadSource::Website);
        form.draft_mut().lead_type = Some(LeadType::Buyer);

        let abandoned = tokio::time::timeout(Duration::from_millis(20), form.submit(&Stalled)).await;
        assert!(abandoned.is_err());
        assert!(!form.is_busy());
        assert_eq!(form.draft().first_name.as_deref(), Some("יעל"));

        let api = MemoryApi::<Lead>::default();
        let saved = form.submit(&api).await.unwrap();
        assert!(saved.id.is_some());
        assert!(!form.is_busy());
    }

    #[test]
    fn email_shape() {
        let check = |v: &str| {
            let mut errors = Vec::new();
            check_email(&mut errors, Some(v));
            errors.is_empty()
        };
        assert!(check("dana@example.com"));
        assert!(check(""));
        assert!(!check("dana"));
        assert!(!check("@example.com"));
        assert!(!check("da na@example.com"));
        assert!(!check("a@b@c"));
    }

    #[test]
    fn required_rejects_blank() {
        let mut errors = Vec::new();
        required(&mut errors, Some("  "), "street");
        required(&mut errors, None, "rooms");
        required(&mut errors, Some("הרצל"), "street");
        assert_eq!(errors, vec!["street is required", "rooms is required"]);
    }

    #[test]
    fn numbers_must_be_finite() {
        let mut errors = Vec::new();
        numeric(&mut errors, Some(f64::INFINITY), "budget");
        numeric(&mut errors, Some(f64::NAN), "price");
        numeric(&mut errors, Some(-2.0), "floor");
        numeric(&mut errors, None, "area");
        assert_eq!(errors, vec!["budget must be a number", "price must be a number"]);
    }
}
