pub mod buyer_request;
pub mod client;
pub mod lead;
pub mod listing;

pub use buyer_request::{
    BuyerRequest, BuyerRequestKind, Community, Liquidity, RequestCriteria, TaboRegistration, TaboTerms,
};
pub use client::{Client, ClientStatus};
pub use lead::{Lead, LeadSource, LeadStatus, LeadType, Priority};
pub use listing::{AttachedFile, HousingUnit, Listing, PropertyCondition, Registration, RegistrationKind};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A server-owned record addressed by an opaque id
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Backend-assigned id, `None` while the record is still a draft
    fn id(&self) -> Option<&str>;
}

/// Untyped records (showings, deals, tasks, ...) read as raw JSON
impl Record for serde_json::Value {
    fn id(&self) -> Option<&str> {
        self.get("id").and_then(serde_json::Value::as_str)
    }
}

/// Enumerations stored by the backend as their Hebrew display label.
///
/// Each variant maps to exactly one wire value. Parsing accepts the wire
/// value or the Rust variant name (case-insensitive), which is what the CLI
/// filters rely on.
macro_rules! define_wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant ),+
        }

        impl $name {
            /// Every variant, in display order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Value stored by the backend
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::error::CrmError;

            fn from_str(s: &str) -> crate::error::Result<Self> {
                let s = s.trim();
                $(
                    if s == $wire || s.eq_ignore_ascii_case(stringify!($variant)) {
                        return Ok($name::$variant);
                    }
                )+
                Err(crate::error::CrmError::invalid(format!(
                    "unknown {} value {:?}",
                    stringify!($name),
                    s
                )))
            }
        }
    };
}

pub(crate) use define_wire_enum;

define_wire_enum! {
    /// Neighbourhood zones the agency works in
    Zone {
        A1 => "A1",
        A2 => "A2",
        B1 => "B1",
        B2 => "B2",
        C => "C",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_enum_parses_label_and_variant_name() {
        assert_eq!("חדש".parse::<ClientStatus>().unwrap(), ClientStatus::New);
        assert_eq!("inprogress".parse::<ClientStatus>().unwrap(), ClientStatus::InProgress);
        assert_eq!(" b2 ".parse::<Zone>().unwrap(), Zone::B2);
        assert!("Z9".parse::<Zone>().is_err());
    }

    #[test]
    fn wire_enum_serializes_as_label() {
        assert_eq!(serde_json::to_string(&LeadStatus::Hot).unwrap(), "\"מתעניין חם\"");
        let status: LeadStatus = serde_json::from_str("\"נסגר - הומר ללקוח\"").unwrap();
        assert_eq!(status, LeadStatus::Converted);
        assert_eq!(Priority::ALL.len(), 3);
    }
}
