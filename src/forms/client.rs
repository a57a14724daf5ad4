use super::list::{append, remove_at, update_at};
use super::{check_email, numeric, required, Draft, FormState};
use crate::error::{CrmError, Result};
use crate::models::{BuyerRequest, BuyerRequestKind, Client, ClientStatus};

impl Draft for Client {
    const NAME: &'static str = "client";

    fn defaults() -> Self {
        Client {
            phone_numbers: vec![String::new()],
            status: Some(ClientStatus::New),
            financing_approved: Some(false),
            ..Client::default()
        }
    }

    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        required(&mut errors, self.first_name.as_deref(), "first name");
        required(&mut errors, self.last_name.as_deref(), "last name");
        required(&mut errors, self.primary_phone(), "primary phone");
        check_email(&mut errors, self.email.as_deref());
        numeric(&mut errors, self.budget, "budget");
        errors
    }
}

/// Client-form list editing: phones, preferred areas and buyer requests
impl FormState<Client> {
    pub fn add_phone(&mut self) -> usize {
        append(&mut self.draft_mut().phone_numbers, String::new())
    }

    pub fn set_phone(&mut self, index: usize, phone: impl Into<String>) -> Result<()> {
        update_at(&mut self.draft_mut().phone_numbers, index, phone.into())
    }

    /// The last remaining phone cannot be removed
    pub fn remove_phone(&mut self, index: usize) -> Result<String> {
        let phones = &mut self.draft_mut().phone_numbers;
        if phones.len() <= 1 && index < phones.len() {
            return Err(CrmError::invalid("a client needs at least one phone number"));
        }
        remove_at(phones, index)
    }

    /// Add a preferred-area tag. Blank and duplicate tags are ignored.
    pub fn add_preferred_area(&mut self, area: &str) -> bool {
        let area = area.trim();
        let areas = &mut self.draft_mut().preferred_areas;
        if area.is_empty() || areas.iter().any(|a| a == area) {
            return false;
        }
        append(areas, area.to_string());
        true
    }

    pub fn remove_preferred_area(&mut self, index: usize) -> Result<String> {
        remove_at(&mut self.draft_mut().preferred_areas, index)
    }

    /// Append a buyer request of `kind` initialized with that kind's defaults
    pub fn add_buyer_request(&mut self, kind: BuyerRequestKind) -> usize {
        append(&mut self.draft_mut().buyer_requests, BuyerRequest::new(kind))
    }

    /// Replace a buyer request; the replacement must keep the original kind
    pub fn update_buyer_request(&mut self, index: usize, request: BuyerRequest) -> Result<()> {
        let requests = &mut self.draft_mut().buyer_requests;
        if let Some(existing) = requests.get(index) {
            if existing.kind() != request.kind() {
                return Err(CrmError::invalid(format!(
                    "buyer request {index} is {:?} and cannot become {:?}",
                    existing.kind(),
                    request.kind()
                )));
            }
        }
        update_at(requests, index, request)
    }

    /// Edit a buyer request in place; the edit may not change its kind
    pub fn edit_buyer_request<F>(&mut self, index: usize, edit: F) -> Result<()>
    where
        F: FnOnce(&mut BuyerRequest),
    {
        let requests = &self.draft().buyer_requests;
        let mut edited = requests
            .get(index)
            .cloned()
            .ok_or_else(|| CrmError::invalid(format!("no buyer request at index {index}")))?;
        edit(&mut edited);
        self.update_buyer_request(index, edited)
    }

    pub fn remove_buyer_request(&mut self, index: usize) -> Result<BuyerRequest> {
        remove_at(&mut self.draft_mut().buyer_requests, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryApi;
    use crate::models::{Community, Zone};

    fn filled_form() -> FormState<Client> {
        let mut form = FormState::<Client>::create();
        let draft = form.draft_mut();
        draft.first_name = Some("דוד".into());
        draft.last_name = Some("כהן".into());
        form.set_phone(0, "050-1234567").unwrap();
        form
    }

    #[test]
    fn create_mode_starts_from_defaults() {
        let form = FormState::<Client>::create();
        assert_eq!(form.draft().phone_numbers, vec![String::new()]);
        assert_eq!(form.draft().status, Some(ClientStatus::New));
        assert_eq!(form.editing_id(), None);
        assert!(!form.is_busy());
    }

    #[test]
    fn phones_keep_at_least_one_entry() {
        let mut form = filled_form();
        assert!(form.remove_phone(0).is_err());

        let before = form.draft().phone_numbers.clone();
        let index = form.add_phone();
        form.remove_phone(index).unwrap();
        assert_eq!(form.draft().phone_numbers, before);

        form.add_phone();
        form.set_phone(1, "03-1111111").unwrap();
        assert_eq!(form.remove_phone(0).unwrap(), "050-1234567");
        assert_eq!(form.draft().primary_phone(), Some("03-1111111"));
    }

    #[test]
    fn preferred_areas_behave_like_a_set() {
        let mut form = filled_form();
        assert!(form.add_preferred_area(" רחובות "));
        assert!(!form.add_preferred_area("רחובות"));
        assert!(!form.add_preferred_area("   "));
        assert!(form.add_preferred_area("נס ציונה"));
        assert_eq!(form.draft().preferred_areas, vec!["רחובות", "נס ציונה"]);

        form.remove_preferred_area(0).unwrap();
        assert_eq!(form.draft().preferred_areas, vec!["נס ציונה"]);
    }

    #[test]
    fn append_then_remove_restores_areas_and_phones() {
        let mut form = filled_form();
        form.add_preferred_area("רחובות");
        let areas = form.draft().preferred_areas.clone();
        let phones = form.draft().phone_numbers.clone();

        form.add_preferred_area("יבנה");
        assert_eq!(form.remove_preferred_area(1).unwrap(), "יבנה");
        assert_eq!(form.draft().preferred_areas, areas);

        let index = form.add_phone();
        form.remove_phone(index).unwrap();
        assert_eq!(form.draft().phone_numbers, phones);
    }

    #[test]
    fn tabo_request_starts_with_variant_defaults() {
        let mut form = filled_form();
        let index = form.add_buyer_request(BuyerRequestKind::Tabo);
        let request = &form.draft().buyer_requests[index];
        assert_eq!(request.kind(), BuyerRequestKind::Tabo);
        assert_eq!(request.tabo_terms().unwrap().community, Community::Mixed);

        form.edit_buyer_request(index, |r| r.tabo_terms_mut().unwrap().community = Community::Religious)
            .unwrap();
        assert_eq!(
            form.draft().buyer_requests[index].tabo_terms().unwrap().community,
            Community::Religious
        );
    }

    #[test]
    fn buyer_request_kind_cannot_change() {
        let mut form = filled_form();
        form.add_buyer_request(BuyerRequestKind::Normal);

        let err = form.update_buyer_request(0, BuyerRequest::new(BuyerRequestKind::Tabo));
        assert!(matches!(err, Err(CrmError::Validation(_))));

        let mut replacement = BuyerRequest::new(BuyerRequestKind::Normal);
        replacement.criteria_mut().zones = vec![Zone::B1];
        form.update_buyer_request(0, replacement).unwrap();
        assert_eq!(form.draft().buyer_requests[0].criteria().zones, vec![Zone::B1]);
    }

    #[test]
    fn append_then_remove_restores_requests() {
        let mut form = filled_form();
        form.add_buyer_request(BuyerRequestKind::Normal);
        let before = form.draft().buyer_requests.clone();

        let index = form.add_buyer_request(BuyerRequestKind::Tabo);
        form.remove_buyer_request(index).unwrap();
        assert_eq!(form.draft().buyer_requests, before);
    }

    #[test]
    fn validation_lists_every_missing_field() {
        let mut form = FormState::<Client>::create();
        form.draft_mut().email = Some("not-an-email".into());
        match form.validate() {
            Err(CrmError::Validation(errors)) => {
                assert_eq!(errors.len(), 4);
                assert!(errors.contains(&"primary phone is required".to_string()));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_backend() {
        let api = MemoryApi::<Client>::default();
        let mut form = FormState::<Client>::create();
        assert!(matches!(form.submit(&api).await, Err(CrmError::Validation(_))));
        assert!(api.records().is_empty());
    }

    #[tokio::test]
    async fn submit_creates_with_nested_requests() {
        let api = MemoryApi::<Client>::default();
        let mut form = filled_form();
        form.add_buyer_request(BuyerRequestKind::Tabo);

        let saved = form.submit(&api).await.unwrap();
        assert!(saved.id.is_some());
        assert_eq!(saved.buyer_requests.len(), 1);
        assert_eq!(api.records().len(), 1);
    }

    #[tokio::test]
    async fn failed_submit_keeps_draft_for_retry() {
        let api = MemoryApi::<Client>::default();
        let mut form = filled_form();
        form.add_preferred_area("מודיעין");
        let draft = form.draft().clone();

        api.fail_next_with(502);
        let err = form.submit(&api).await.unwrap_err();
        assert_eq!(err.status(), Some(502));
        assert_eq!(form.draft(), &draft);
        assert!(!form.is_busy());

        assert!(form.submit(&api).await.is_ok());
    }

    #[tokio::test]
    async fn edit_mode_updates_by_id() {
        let api = MemoryApi::with_records(vec![Client {
            id: Some("c-9".into()),
            first_name: Some("רות".into()),
            last_name: Some("אדם".into()),
            phone_numbers: vec!["054-0000000".into()],
            ..Client::default()
        }]);
        let existing = api.records().remove(0);

        let mut form = FormState::edit(&existing).unwrap();
        assert_eq!(form.editing_id(), Some("c-9"));
        form.draft_mut().status = Some(ClientStatus::Closed);

        let saved = form.submit(&api).await.unwrap();
        assert_eq!(saved.id.as_deref(), Some("c-9"));
        assert_eq!(api.records()[0].status, Some(ClientStatus::Closed));

        assert!(FormState::edit(&Client::default()).is_err());
    }
}
