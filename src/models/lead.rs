use super::{define_wire_enum, Record};
use serde::{Deserialize, Serialize};

define_wire_enum! {
    /// Channel a lead came in through
    LeadSource {
        Newspaper => "עיתון",
        WhatsappStatus => "סטטוס וואטסאפ",
        Referral => "הפניה",
        Website => "אתר",
        SponsoredAd => "מודעה ממומנת",
        Flyers => "פליירים",
        Partner => "שותף",
        Campaign => "קמפיין",
        Fair => "יריד",
        Other => "אחר",
    }
}

define_wire_enum! {
    LeadType {
        Buyer => "קונה",
        Seller => "מוכר",
        Investor => "משקיע",
        Renter => "שוכר",
    }
}

define_wire_enum! {
    /// Funnel position, roughly in order
    #[derive(Default)]
    LeadStatus {
        #[default]
        New => "חדש",
        Contacting => "יוצר קשר",
        Hot => "מתעניין חם",
        Lukewarm => "מתעניין פושר",
        NotRelevant => "לא רלוונטי",
        Converted => "נסגר - הומר ללקוח",
    }
}

define_wire_enum! {
    #[derive(Default)]
    Priority {
        Low => "נמוכה",
        #[default]
        Medium => "בינונית",
        High => "גבוהה",
    }
}

/// An inbound contact that has not become a client yet.
/// Its keys are snake_case on the wire, unlike clients and listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub source: Option<LeadSource>,
    #[serde(default)]
    pub lead_type: Option<LeadType>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone_main: Option<String>,
    #[serde(default)]
    pub phone_alt: Option<String>,
    #[serde(default)]
    pub whatsapp_available: bool,
    #[serde(default)]
    pub email: Option<String>,
    /// Preferred area, free text
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub budget_min: Option<f64>,
    #[serde(default)]
    pub budget_max: Option<f64>,
    #[serde(default)]
    pub rooms_min: Option<f64>,
    #[serde(default)]
    pub rooms_max: Option<f64>,
    #[serde(default)]
    pub floor_preference: Option<String>,
    #[serde(default)]
    pub elevator_required: bool,
    #[serde(default)]
    pub parking_required: bool,
    #[serde(default)]
    pub status: Option<LeadStatus>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Lead {
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_high_priority(&self) -> bool {
        self.priority == Some(Priority::High)
    }
}

impl Record for Lead {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
