use super::{define_wire_enum, Record, Zone};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

define_wire_enum! {
    /// Discriminant of [`Registration`]
    RegistrationKind {
        /// Shared registration, possibly split into housing units
        Tabo => "Tabo",
        /// Registered in the owner's name
        Name => "Name",
        None => "None",
    }
}

define_wire_enum! {
    PropertyCondition {
        UnderConstruction => "בנייה",
        NewFromContractor => "חדשה מקבלן",
        Renovated => "מושקעת",
        WellKept => "שמורה",
        Regular => "רגילה",
        NeedsCosmetics => "זקוקה לשיפוץ קוסמטי",
        NeedsRenovation => "זקוקה לשיפוץ",
    }
}

/// One sub-unit of a multi-unit Tabo property
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HousingUnit {
    #[serde(default)]
    pub rooms: Option<f64>,
    #[serde(default, rename = "squaredMeters")]
    pub area: Option<f64>,
    #[serde(default)]
    pub floor: Option<String>,
    /// Tenant phone
    #[serde(default)]
    pub phone: Option<String>,
}

/// A document attached to a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedFile {
    pub url: String,
    pub name: String,
}

/// How the property is registered. Housing units only exist under `Tabo`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RegistrationWire", into = "RegistrationWire")]
pub enum Registration {
    Tabo {
        housing_units: Vec<HousingUnit>,
        partner_count: Option<u32>,
    },
    Name,
    #[default]
    None,
}

impl Registration {
    /// Empty registration of the given kind
    pub fn new(kind: RegistrationKind) -> Self {
        match kind {
            RegistrationKind::Tabo => Registration::Tabo {
                housing_units: Vec::new(),
                partner_count: None,
            },
            RegistrationKind::Name => Registration::Name,
            RegistrationKind::None => Registration::None,
        }
    }

    pub fn kind(&self) -> RegistrationKind {
        match self {
            Registration::Tabo { .. } => RegistrationKind::Tabo,
            Registration::Name => RegistrationKind::Name,
            Registration::None => RegistrationKind::None,
        }
    }

    pub fn housing_units(&self) -> &[HousingUnit] {
        match self {
            Registration::Tabo { housing_units, .. } => housing_units,
            _ => &[],
        }
    }
}

// Flat shape on the wire: `registrationType` plus the Tabo-only keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationWire {
    #[serde(default)]
    registration_type: Option<RegistrationKind>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    housing_units: Vec<HousingUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    partner_count: Option<u32>,
}

impl From<RegistrationWire> for Registration {
    fn from(wire: RegistrationWire) -> Self {
        match wire.registration_type {
            Some(RegistrationKind::Tabo) => Registration::Tabo {
                housing_units: wire.housing_units,
                partner_count: wire.partner_count,
            },
            Some(RegistrationKind::Name) => Registration::Name,
            Some(RegistrationKind::None) | None => Registration::None,
        }
    }
}

impl From<Registration> for RegistrationWire {
    fn from(registration: Registration) -> Self {
        let registration_type = Some(registration.kind());
        match registration {
            Registration::Tabo {
                housing_units,
                partner_count,
            } => RegistrationWire {
                registration_type,
                housing_units,
                partner_count,
            },
            _ => RegistrationWire {
                registration_type,
                ..RegistrationWire::default()
            },
        }
    }
}

/// A property offered through the agency
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, rename = "listing_number")]
    pub listing_number: Option<String>,
    #[serde(default)]
    pub zone: Option<Zone>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub building_number: Option<String>,
    #[serde(default)]
    pub apartment_number: Option<String>,
    #[serde(default)]
    pub floor: Option<String>,
    #[serde(flatten)]
    pub registration: Registration,
    #[serde(default)]
    pub rooms: Option<f64>,
    #[serde(default, rename = "squaredMeters")]
    pub sqm_built: Option<f64>,
    #[serde(default)]
    pub balcony_sqm: Option<f64>,
    #[serde(default)]
    pub storage_sqm: Option<f64>,
    #[serde(default)]
    pub parking_spots: u32,
    #[serde(default)]
    pub view_direction: Option<String>,
    #[serde(default)]
    pub condition: Option<PropertyCondition>,
    #[serde(default, rename = "price")]
    pub price_ask: Option<f64>,
    #[serde(default)]
    pub price_published: Option<f64>,
    /// Owning client
    #[serde(default)]
    pub client_id: Option<String>,
    /// The first image is the primary one
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub files: Vec<AttachedFile>,
    #[serde(default)]
    pub is_exclusive: Option<bool>,
    #[serde(default)]
    pub exclusive_start: Option<NaiveDate>,
    #[serde(default)]
    pub exclusive_end: Option<NaiveDate>,
    #[serde(default)]
    pub seller_name: Option<String>,
    #[serde(default)]
    pub seller_phone: Option<String>,
    #[serde(default)]
    pub seller_email: Option<String>,
    #[serde(default)]
    pub renter_phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Listing {
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// "street building, city", whatever parts are known
    pub fn display_address(&self) -> String {
        let street = [self.street.as_deref(), self.building_number.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        [Some(street.as_str()), self.city.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Record for Listing {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
