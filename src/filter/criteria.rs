use crate::error::{CrmError, Result};
use std::fmt;
use std::str::FromStr;

/// Label of the "no constraint" option in every filter drop-down
pub const ALL_SENTINEL: &str = "הכל";

fn is_all(s: &str) -> bool {
    s == ALL_SENTINEL || s.eq_ignore_ascii_case("all")
}

/// Exact-match filter over an enumerated field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice<E> {
    All,
    Only(E),
}

// Hand-written so `E` needs no `Default` bound
impl<E> Default for Choice<E> {
    fn default() -> Self {
        Choice::All
    }
}

impl<E: PartialEq> Choice<E> {
    /// A missing field only matches `All`
    pub fn matches(&self, value: Option<&E>) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(wanted) => value == Some(wanted),
        }
    }
}

impl<E> FromStr for Choice<E>
where
    E: FromStr<Err = CrmError>,
{
    type Err = CrmError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if is_all(s) {
            Ok(Choice::All)
        } else {
            s.parse().map(Choice::Only)
        }
    }
}

impl<E: fmt::Display> fmt::Display for Choice<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::All => f.write_str(ALL_SENTINEL),
            Choice::Only(value) => value.fmt(f),
        }
    }
}

/// `All`/`Yes`/`No` selector over a boolean field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriState {
    #[default]
    All,
    Yes,
    No,
}

impl TriState {
    /// A missing flag matches neither `Yes` nor `No`
    pub fn matches(self, value: Option<bool>) -> bool {
        match self {
            TriState::All => true,
            TriState::Yes => value == Some(true),
            TriState::No => value == Some(false),
        }
    }
}

impl FromStr for TriState {
    type Err = CrmError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if is_all(s) {
            return Ok(TriState::All);
        }
        match s.to_lowercase().as_str() {
            "כן" | "yes" | "true" => Ok(TriState::Yes),
            "לא" | "no" | "false" => Ok(TriState::No),
            _ => Err(CrmError::invalid(format!("expected הכל/כן/לא, got {s:?}"))),
        }
    }
}

impl fmt::Display for TriState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TriState::All => ALL_SENTINEL,
            TriState::Yes => "כן",
            TriState::No => "לא",
        })
    }
}

/// Free-text narrowing on a single field, blank means no constraint
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextFilter(String);

impl TextFilter {
    pub fn new(text: impl Into<String>) -> Self {
        TextFilter(text.into())
    }

    fn is_active(&self) -> bool {
        !self.0.trim().is_empty()
    }

    pub fn matches(&self, value: Option<&str>) -> bool {
        if !self.is_active() {
            return true;
        }
        value.is_some_and(|v| contains_folded(v, self.0.trim()))
    }
}

/// Case-insensitive substring test
pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
