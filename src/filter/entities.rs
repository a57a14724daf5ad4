use super::criteria::{Choice, TextFilter, TriState};
use super::{FilterState, RecordFilter, Searchable};
use crate::error::{CrmError, Result};
use crate::models::{
    Client, ClientStatus, Lead, LeadSource, LeadStatus, LeadType, Listing, Priority, RegistrationKind, Zone,
};

fn unknown_key(entity: &str, key: &str, known: &[&str]) -> CrmError {
    CrmError::invalid(format!(
        "unknown {entity} filter {key:?} (expected one of: {})",
        known.join(", ")
    ))
}

impl Searchable for Client {
    fn search_fields(&self) -> Vec<Option<&str>> {
        let mut fields = vec![self.first_name.as_deref(), self.last_name.as_deref(), self.email.as_deref()];
        fields.extend(self.phone_numbers.iter().map(|p| Some(p.as_str())));
        fields
    }
}

impl Searchable for Lead {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.phone_main.as_deref(),
            self.area.as_deref(),
        ]
    }
}

impl Searchable for Listing {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            self.neighborhood.as_deref(),
            self.street.as_deref(),
            self.listing_number.as_deref(),
            self.city.as_deref(),
            self.zone.map(Zone::as_str),
        ]
    }
}

/// Filter panel of the clients page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientFilters {
    pub status: Choice<ClientStatus>,
    pub financing_approved: TriState,
    /// Narrows on the client's address
    pub city: TextFilter,
}

impl ClientFilters {
    const KEYS: &'static [&'static str] = &["status", "financingApproved", "city"];
}

impl FilterState<Client> for ClientFilters {
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "status" => self.status = value.parse()?,
            "financingApproved" | "financing_approved" => self.financing_approved = value.parse()?,
            "city" => self.city = TextFilter::new(value),
            _ => return Err(unknown_key("client", key, Self::KEYS)),
        }
        Ok(())
    }
}

impl RecordFilter<Client> for ClientFilters {
    fn matches(&self, client: &Client) -> bool {
        self.status.matches(client.status.as_ref())
            && self.financing_approved.matches(client.financing_approved)
            && self.city.matches(client.address.as_deref())
    }
}

/// Filter panel of the leads page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadFilters {
    pub status: Choice<LeadStatus>,
    pub lead_type: Choice<LeadType>,
    pub source: Choice<LeadSource>,
    pub priority: Choice<Priority>,
}

impl LeadFilters {
    const KEYS: &'static [&'static str] = &["status", "leadType", "source", "priority"];
}

impl FilterState<Lead> for LeadFilters {
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "status" => self.status = value.parse()?,
            "leadType" | "lead_type" => self.lead_type = value.parse()?,
            "source" => self.source = value.parse()?,
            "priority" => self.priority = value.parse()?,
            _ => return Err(unknown_key("lead", key, Self::KEYS)),
        }
        Ok(())
    }
}

impl RecordFilter<Lead> for LeadFilters {
    fn matches(&self, lead: &Lead) -> bool {
        self.status.matches(lead.status.as_ref())
            && self.lead_type.matches(lead.lead_type.as_ref())
            && self.source.matches(lead.source.as_ref())
            && self.priority.matches(lead.priority.as_ref())
    }
}

/// Filter panel of the listings page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilters {
    pub zone: Choice<Zone>,
    pub registration_type: Choice<RegistrationKind>,
    pub exclusive: TriState,
    pub city: TextFilter,
}

impl ListingFilters {
    const KEYS: &'static [&'static str] = &["zone", "registrationType", "exclusive", "city"];
}

impl FilterState<Listing> for ListingFilters {
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "zone" => self.zone = value.parse()?,
            "registrationType" | "registration_type" => self.registration_type = value.parse()?,
            "exclusive" | "isExclusive" => self.exclusive = value.parse()?,
            "city" => self.city = TextFilter::new(value),
            _ => return Err(unknown_key("listing", key, Self::KEYS)),
        }
        Ok(())
    }
}

impl RecordFilter<Listing> for ListingFilters {
    fn matches(&self, listing: &Listing) -> bool {
        let kind = listing.registration.kind();
        self.zone.matches(listing.zone.as_ref())
            && self.registration_type.matches(Some(&kind))
            && self.exclusive.matches(listing.is_exclusive)
            && self.city.matches(listing.city.as_deref())
    }
}
