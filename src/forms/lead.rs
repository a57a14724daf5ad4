use super::{check_email, numeric, required, Draft};
use crate::models::{Lead, LeadStatus, Priority};

impl Draft for Lead {
    const NAME: &'static str = "lead";

    fn defaults() -> Self {
        Lead {
            status: Some(LeadStatus::New),
            priority: Some(Priority::Medium),
            ..Lead::default()
        }
    }

    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.source.is_none() {
            errors.push("lead source is required".to_string());
        }
        if self.lead_type.is_none() {
            errors.push("lead type is required".to_string());
        }
        required(&mut errors, self.first_name.as_deref(), "first name");
        required(&mut errors, self.phone_main.as_deref(), "primary phone");
        check_email(&mut errors, self.email.as_deref());
        numeric(&mut errors, self.budget_min, "minimum budget");
        numeric(&mut errors, self.budget_max, "maximum budget");
        numeric(&mut errors, self.rooms_min, "minimum rooms");
        numeric(&mut errors, self.rooms_max, "maximum rooms");
        errors
    }
}

#[cfg(test)]
mod tests {
    use crate::error::CrmError;
    use crate::forms::FormState;
    use crate::memory::MemoryApi;
    use crate::models::{Lead, LeadSource, LeadStatus, LeadType, Priority};

    #[test]
    fn new_lead_defaults() {
        let form = FormState::<Lead>::create();
        assert_eq!(form.draft().status, Some(LeadStatus::New));
        assert_eq!(form.draft().priority, Some(Priority::Medium));
        assert!(!form.draft().whatsapp_available);
    }

    #[tokio::test]
    async fn submit_requires_source_and_type() {
        let api = MemoryApi::<Lead>::default();
        let mut form = FormState::<Lead>::create();
        form.draft_mut().first_name = Some("יעל".into());
        form.draft_mut().phone_main = Some("052-1112223".into());

        match form.submit(&api).await {
            Err(CrmError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {other:?}"),
        }

        form.draft_mut().source = Some(LeadSource::Website);
        form.draft_mut().lead_type = Some(LeadType::Renter);
        // min above max is accepted as entered
        form.draft_mut().rooms_min = Some(5.0);
        form.draft_mut().rooms_max = Some(3.0);

        let saved = form.submit(&api).await.unwrap();
        assert!(saved.id.is_some());
        assert_eq!(saved.rooms_min, Some(5.0));
    }
}
