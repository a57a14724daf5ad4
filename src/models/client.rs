use super::{define_wire_enum, BuyerRequest, Record};
use serde::{Deserialize, Serialize};

define_wire_enum! {
    /// Where a buyer stands in the agency's process
    #[derive(Default)]
    ClientStatus {
        #[default]
        New => "חדש",
        InProgress => "בתהליך",
        OnHold => "הקפאה",
        Closed => "נסגר",
    }
}

/// A buyer registered with the agency
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// National id number
    #[serde(default)]
    pub id_number: Option<String>,
    /// Ordered, the first entry is the primary number
    #[serde(default)]
    pub phone_numbers: Vec<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub status: Option<ClientStatus>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub financing_approved: Option<bool>,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub preferred_areas: Vec<String>,
    #[serde(default)]
    pub owner_agent: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub buyer_requests: Vec<BuyerRequest>,
}

impl Client {
    /// "first last", skipping whichever part is missing
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn primary_phone(&self) -> Option<&str> {
        self.phone_numbers.first().map(String::as_str)
    }
}

impl Record for Client {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
