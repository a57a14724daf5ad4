use super::{define_wire_enum, Zone};
use serde::{Deserialize, Serialize};

define_wire_enum! {
    /// How soon the buyer can close
    Liquidity {
        Immediate => "מיידי",
        HalfYear => "עד חצי שנה",
        Year => "עד שנה",
        Flexible => "גמיש",
    }
}

define_wire_enum! {
    /// Community a shared-registration building belongs to
    #[derive(Default)]
    Community {
        #[default]
        Mixed => "מעורב",
        Secular => "חילוני",
        Religious => "דתי",
        Haredi => "חרדי",
    }
}

define_wire_enum! {
    /// Registration a Tabo buyer is willing to accept
    #[derive(Default)]
    TaboRegistration {
        #[default]
        SharedTabo => "טאבו משותף",
        Cooperative => "אגודה שיתופית",
        Any => "לא משנה",
    }
}

/// Discriminant of a [`BuyerRequest`], chosen once when the request is added
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuyerRequestKind {
    Normal,
    Tabo,
}

/// Search criteria shared by both request variants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default)]
    pub zones: Vec<Zone>,
    #[serde(default)]
    pub min_floor: Option<i32>,
    #[serde(default)]
    pub max_floor: Option<i32>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub min_size: Option<f64>,
    #[serde(default)]
    pub max_size: Option<f64>,
    #[serde(default)]
    pub liquidity: Option<Liquidity>,
}

/// Extra terms that only exist for shared-registration (Tabo) requests
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaboTerms {
    #[serde(default)]
    pub max_equity: Option<f64>,
    #[serde(default)]
    pub community: Community,
    #[serde(default)]
    pub registration_type: TaboRegistration,
    #[serde(default)]
    pub max_partners: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalRequest {
    #[serde(flatten)]
    pub criteria: RequestCriteria,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaboRequest {
    #[serde(flatten)]
    pub criteria: RequestCriteria,
    #[serde(flatten)]
    pub terms: TaboTerms,
}

/// What a buyer is looking for. The variant is fixed at construction and
/// there is no way to change it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BuyerRequest {
    Normal(NormalRequest),
    Tabo(TaboRequest),
}

impl BuyerRequest {
    /// New request of the given kind with that variant's defaults
    pub fn new(kind: BuyerRequestKind) -> Self {
        match kind {
            BuyerRequestKind::Normal => BuyerRequest::Normal(NormalRequest::default()),
            BuyerRequestKind::Tabo => BuyerRequest::Tabo(TaboRequest::default()),
        }
    }

    pub fn kind(&self) -> BuyerRequestKind {
        match self {
            BuyerRequest::Normal(_) => BuyerRequestKind::Normal,
            BuyerRequest::Tabo(_) => BuyerRequestKind::Tabo,
        }
    }

    pub fn criteria(&self) -> &RequestCriteria {
        match self {
            BuyerRequest::Normal(r) => &r.criteria,
            BuyerRequest::Tabo(r) => &r.criteria,
        }
    }

    pub fn criteria_mut(&mut self) -> &mut RequestCriteria {
        match self {
            BuyerRequest::Normal(r) => &mut r.criteria,
            BuyerRequest::Tabo(r) => &mut r.criteria,
        }
    }

    /// Tabo-only terms, `None` for a normal request
    pub fn tabo_terms(&self) -> Option<&TaboTerms> {
        match self {
            BuyerRequest::Tabo(r) => Some(&r.terms),
            BuyerRequest::Normal(_) => None,
        }
    }

    pub fn tabo_terms_mut(&mut self) -> Option<&mut TaboTerms> {
        match self {
            BuyerRequest::Tabo(r) => Some(&mut r.terms),
            BuyerRequest::Normal(_) => None,
        }
    }
}
