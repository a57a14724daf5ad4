use super::list::{append, remove_at, update_at};
use super::{check_email, numeric, required, Draft, FormState};
use crate::api::{FileUploader, UploadRequest};
use crate::error::{CrmError, Result};
use crate::models::{AttachedFile, HousingUnit, Listing, Registration, RegistrationKind};
use chrono::NaiveDate;

impl Draft for Listing {
    const NAME: &'static str = "listing";

    fn defaults() -> Self {
        Listing {
            registration: Registration::None,
            parking_spots: 0,
            is_exclusive: Some(false),
            ..Listing::default()
        }
    }

    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        required(&mut errors, self.street.as_deref(), "street");
        if self.rooms.is_none() {
            errors.push("rooms is required".to_string());
        }
        if self.price_ask.is_none() {
            errors.push("asking price is required".to_string());
        }
        numeric(&mut errors, self.rooms, "rooms");
        numeric(&mut errors, self.sqm_built, "built area");
        numeric(&mut errors, self.price_ask, "asking price");
        numeric(&mut errors, self.price_published, "published price");
        check_email(&mut errors, self.seller_email.as_deref());
        errors
    }
}

fn housing_units_mut(listing: &mut Listing) -> Result<&mut Vec<HousingUnit>> {
    match &mut listing.registration {
        Registration::Tabo { housing_units, .. } => Ok(housing_units),
        other => Err(CrmError::invalid(format!(
            "housing units need Tabo registration, listing is {}",
            other.kind()
        ))),
    }
}

/// Listing-form editing: registration, housing units, exclusivity and uploads
impl FormState<Listing> {
    /// Switch registration kind. Leaving Tabo drops its housing units.
    pub fn set_registration_kind(&mut self, kind: RegistrationKind) {
        let draft = self.draft_mut();
        if draft.registration.kind() != kind {
            draft.registration = Registration::new(kind);
        }
    }

    pub fn add_housing_unit(&mut self) -> Result<usize> {
        let units = housing_units_mut(self.draft_mut())?;
        Ok(append(units, HousingUnit::default()))
    }

    pub fn update_housing_unit(&mut self, index: usize, unit: HousingUnit) -> Result<()> {
        update_at(housing_units_mut(self.draft_mut())?, index, unit)
    }

    pub fn remove_housing_unit(&mut self, index: usize) -> Result<HousingUnit> {
        remove_at(housing_units_mut(self.draft_mut())?, index)
    }

    /// Toggle exclusivity; turning it off clears the window
    pub fn set_exclusive(&mut self, exclusive: bool, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        let draft = self.draft_mut();
        draft.is_exclusive = Some(exclusive);
        if exclusive {
            draft.exclusive_start = start;
            draft.exclusive_end = end;
        } else {
            draft.exclusive_start = None;
            draft.exclusive_end = None;
        }
    }

    /// Upload an image and append its URL. A failed upload leaves the
    /// image list untouched and returns the error for the caller to report.
    pub async fn attach_image(&mut self, uploader: &dyn FileUploader, file: UploadRequest) -> Result<usize> {
        let uploaded = uploader.upload(file).await?;
        Ok(append(&mut self.draft_mut().images, uploaded.file_url))
    }

    pub fn remove_image(&mut self, index: usize) -> Result<String> {
        remove_at(&mut self.draft_mut().images, index)
    }

    /// Upload a document and append it under its original file name
    pub async fn attach_file(&mut self, uploader: &dyn FileUploader, file: UploadRequest) -> Result<usize> {
        let name = file.file_name.clone();
        let uploaded = uploader.upload(file).await?;
        Ok(append(
            &mut self.draft_mut().files,
            AttachedFile {
                url: uploaded.file_url,
                name,
            },
        ))
    }

    pub fn remove_file(&mut self, index: usize) -> Result<AttachedFile> {
        remove_at(&mut self.draft_mut().files, index)
    }
}
