//! Client-side narrowing of cached collections.
//!
//! A record survives [`filter`] when it matches the free-text term AND every
//! field filter. Absent data never matches an active constraint.

pub mod criteria;
pub mod entities;

pub use criteria::{contains_folded, Choice, TextFilter, TriState, ALL_SENTINEL};
pub use entities::{ClientFilters, LeadFilters, ListingFilters};

/// Fields a free-text search looks at
pub trait Searchable {
    /// Every searched field; `None` for fields the record does not carry
    fn search_fields(&self) -> Vec<Option<&str>>;
}

/// A set of discrete field constraints over `T`
pub trait RecordFilter<T> {
    fn matches(&self, record: &T) -> bool;
}

/// A filter panel whose drop-downs can be set from `key=value` input
pub trait FilterState<T>: RecordFilter<T> + Default + Clone + Send + Sync {
    /// Set one filter from its key and drop-down value. Unknown keys and
    /// values are rejected and leave the panel unchanged.
    fn set(&mut self, key: &str, value: &str) -> crate::error::Result<()>;
}

/// True when any searched field contains `term`, ignoring case.
/// An empty term matches every record. The term is used as typed, so
/// surrounding whitespace is part of what must match.
pub fn matches_search<T: Searchable>(record: &T, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    record
        .search_fields()
        .into_iter()
        .flatten()
        .any(|field| contains_folded(field, term))
}

/// Narrow `items` by search term and field filters, keeping their order
pub fn filter<'a, T, F>(items: &'a [T], term: &str, filters: &F) -> Vec<&'a T>
where
    T: Searchable,
    F: RecordFilter<T>,
{
    items
        .iter()
        .filter(|item| matches_search(*item, term) && filters.matches(item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Client, ClientStatus, Lead, LeadStatus};

    fn client(first: Option<&str>, last: Option<&str>) -> Client {
        Client {
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
            ..Client::default()
        }
    }

    fn sample_clients() -> Vec<Client> {
        vec![
            Client {
                phone_numbers: vec!["050-1111111".into(), "03-5555555".into()],
                status: Some(ClientStatus::New),
                financing_approved: Some(true),
                address: Some("רחוב הרצל 4, רחובות".into()),
                ..client(Some("דוד"), Some("כהן"))
            },
            Client {
                email: Some("Moshe@Example.com".into()),
                status: Some(ClientStatus::Closed),
                financing_approved: Some(false),
                ..client(Some("משה"), None)
            },
            Client {
                status: Some(ClientStatus::New),
                ..client(None, Some("לוי"))
            },
            client(Some("Dana"), Some("Levi")),
        ]
    }

    #[test]
    fn empty_search_and_all_filters_return_collection_unchanged() {
        let clients = sample_clients();
        let result = filter(&clients, "", &ClientFilters::default());
        assert_eq!(result.len(), clients.len());
        for (kept, original) in result.iter().zip(clients.iter()) {
            assert!(std::ptr::eq(*kept, original));
        }
    }

    #[test]
    fn search_by_first_name() {
        let clients = vec![client(Some("דוד"), Some("כהן")), client(Some("משה"), None)];
        let result = filter(&clients, "דוד", &ClientFilters::default());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].first_name.as_deref(), Some("דוד"));
    }

    #[test]
    fn search_is_case_insensitive_and_covers_every_phone() {
        let clients = sample_clients();
        let by_email = filter(&clients, "moshe@example", &ClientFilters::default());
        assert_eq!(by_email.len(), 1);

        let by_secondary_phone = filter(&clients, "5555", &ClientFilters::default());
        assert_eq!(by_secondary_phone[0].first_name.as_deref(), Some("דוד"));

        let latin = filter(&clients, "LEVI", &ClientFilters::default());
        assert_eq!(latin.len(), 1);
    }

    #[test]
    fn records_missing_every_searched_field_are_excluded() {
        let clients = vec![Client::default(), client(Some("אבי"), None)];
        assert_eq!(filter(&clients, "א", &ClientFilters::default()).len(), 1);
        assert_eq!(filter(&clients, "", &ClientFilters::default()).len(), 2);
    }

    #[test]
    fn whitespace_term_is_matched_as_typed() {
        let plain = client(Some("Dana"), None);
        let spaced = client(Some("Dana"), Some("Ben David"));
        let bare = Client::default();

        assert!(!matches_search(&plain, " "));
        assert!(!matches_search(&bare, " "));
        assert!(matches_search(&spaced, " "));
        assert!(!matches_search(&plain, "Dana "));
        assert!(matches_search(&plain, "dana"));

        let clients = vec![plain, spaced, bare];
        let result = filter(&clients, " ", &ClientFilters::default());
        assert_eq!(result.len(), 1);
        assert!(std::ptr::eq(result[0], &clients[1]));
    }

    #[test]
    fn match_iff_some_field_contains_term() {
        let clients = sample_clients();
        for term in ["ד", "כהן", "050", "example", "zzz", "levi", " ", "Dana "] {
            for c in &clients {
                let expected = c
                    .search_fields()
                    .into_iter()
                    .flatten()
                    .any(|f| f.to_lowercase().contains(&term.to_lowercase()));
                assert_eq!(matches_search(c, term), expected, "term {term:?}");
            }
        }
    }

    #[test]
    fn lead_status_filter_scenario() {
        let leads = vec![
            Lead {
                status: Some(LeadStatus::New),
                ..Lead::default()
            },
            Lead {
                status: Some(LeadStatus::Hot),
                ..Lead::default()
            },
        ];
        let mut filters = LeadFilters::default();
        filters.set("status", "חדש").unwrap();

        let result = filter(&leads, "", &filters);
        assert_eq!(result.len(), 1);
        assert!(std::ptr::eq(result[0], &leads[0]));
    }

    #[test]
    fn combined_filters_equal_intersection_of_single_filters() {
        let clients = sample_clients();

        let mut status_only = ClientFilters::default();
        status_only.set("status", "חדש").unwrap();
        let mut financing_only = ClientFilters::default();
        financing_only.set("financingApproved", "כן").unwrap();
        let mut both = status_only.clone();
        both.set("financingApproved", "כן").unwrap();

        let a = filter(&clients, "", &status_only);
        let b = filter(&clients, "", &financing_only);
        let intersection: Vec<&Client> = a
            .iter()
            .copied()
            .filter(|x| b.iter().any(|y| std::ptr::eq(*x, *y)))
            .collect();
        let combined = filter(&clients, "", &both);

        assert_eq!(combined.len(), 1);
        assert_eq!(combined.len(), intersection.len());
        assert!(combined.iter().zip(&intersection).all(|(x, y)| std::ptr::eq(*x, *y)));
    }
}
