use super::PageEntity;
use crate::api::{Entities, EntityApi, Resource};
use crate::cache::{QueryClient, NEWEST_FIRST};
use crate::error::Result;
use crate::filter::{ClientFilters, LeadFilters, ListingFilters};
use crate::models::{Client, ClientStatus, Lead, LeadStatus, Listing, Priority};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Ordering hint for the task list
pub const SOONEST_DUE: &str = "-due_date";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientStats {
    pub total: usize,
    pub filtered: usize,
    /// One entry per status, in display order
    pub by_status: Vec<(ClientStatus, usize)>,
    pub financing_approved: usize,
}

impl ClientStats {
    pub fn count(&self, status: ClientStatus) -> usize {
        self.by_status
            .iter()
            .find(|(s, _)| *s == status)
            .map_or(0, |(_, n)| *n)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadStats {
    pub total: usize,
    pub new: usize,
    pub hot: usize,
    /// Converted leads as a whole percentage of all leads
    pub conversion_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingStats {
    pub total: usize,
    pub filtered: usize,
    pub exclusive: usize,
}

/// Rounded percentage, 0 for an empty whole
fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

fn count<T>(items: &[T], pred: impl Fn(&T) -> bool) -> usize {
    items.iter().filter(|item| pred(item)).count()
}

impl PageEntity for Client {
    type Filters = ClientFilters;
    type Stats = ClientStats;

    fn stats(all: &[Self], visible: usize) -> ClientStats {
        ClientStats {
            total: all.len(),
            filtered: visible,
            by_status: ClientStatus::ALL
                .iter()
                .map(|status| (*status, count(all, |c| c.status == Some(*status))))
                .collect(),
            financing_approved: count(all, |c| c.financing_approved == Some(true)),
        }
    }
}

impl PageEntity for Lead {
    type Filters = LeadFilters;
    type Stats = LeadStats;

    fn stats(all: &[Self], _visible: usize) -> LeadStats {
        let converted = count(all, |l| l.status == Some(LeadStatus::Converted));
        LeadStats {
            total: all.len(),
            new: count(all, |l| l.status == Some(LeadStatus::New)),
            hot: count(all, |l| l.status == Some(LeadStatus::Hot)),
            conversion_rate: percent(converted, all.len()),
        }
    }
}

impl PageEntity for Listing {
    type Filters = ListingFilters;
    type Stats = ListingStats;

    fn stats(all: &[Self], visible: usize) -> ListingStats {
        ListingStats {
            total: all.len(),
            filtered: visible,
            exclusive: count(all, |l| l.is_exclusive == Some(true)),
        }
    }
}

const SHOWING_SCHEDULED: &str = "נקבע";
const OFFERS_OPEN: &[&str] = &["הוגשה", "במו\"מ"];
const DEALS_IN_PROGRESS: &[&str] = &["בחינת עו\"ד", "חתום", "בביצוע"];
const COMMISSION_UNPAID: &str = "ממתין לתשלום";
const TASK_DONE: &str = "הושלם";

/// Untyped collections the dashboard counts but no page edits
#[derive(Clone)]
pub struct ActivityApis {
    pub showings: Arc<dyn EntityApi<Value>>,
    pub offers: Arc<dyn EntityApi<Value>>,
    pub deals: Arc<dyn EntityApi<Value>>,
    pub commissions: Arc<dyn EntityApi<Value>>,
    pub tasks: Arc<dyn EntityApi<Value>>,
}

impl ActivityApis {
    pub fn new(entities: &Entities) -> Self {
        Self {
            showings: Arc::new(entities.raw(Resource::Showings)),
            offers: Arc::new(entities.raw(Resource::Offers)),
            deals: Arc::new(entities.raw(Resource::Deals)),
            commissions: Arc::new(entities.raw(Resource::Commissions)),
            tasks: Arc::new(entities.raw(Resource::Tasks)),
        }
    }
}

/// One snapshot of the activity collections
#[derive(Debug, Clone, Default)]
pub struct Activity {
    pub showings: Vec<Value>,
    pub offers: Vec<Value>,
    pub deals: Vec<Value>,
    pub commissions: Vec<Value>,
    pub tasks: Vec<Value>,
}

impl Activity {
    /// Fetch everything concurrently; tasks come soonest-due first.
    /// A collection that fails to load counts as empty.
    pub async fn load(apis: &ActivityApis) -> Self {
        let (showings, offers, deals, commissions, tasks) = tokio::join!(
            apis.showings.list(Some(NEWEST_FIRST)),
            apis.offers.list(Some(NEWEST_FIRST)),
            apis.deals.list(Some(NEWEST_FIRST)),
            apis.commissions.list(Some(NEWEST_FIRST)),
            apis.tasks.list(Some(SOONEST_DUE)),
        );
        Self {
            showings: or_empty(Resource::Showings, showings),
            offers: or_empty(Resource::Offers, offers),
            deals: or_empty(Resource::Deals, deals),
            commissions: or_empty(Resource::Commissions, commissions),
            tasks: or_empty(Resource::Tasks, tasks),
        }
    }
}

fn or_empty<C: Default>(resource: Resource, loaded: Result<C>) -> C {
    loaded.unwrap_or_else(|e| {
        warn!("Dashboard could not load {}: {}", resource, e);
        C::default()
    })
}

fn text<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}

fn status_in(record: &Value, wanted: &[&str]) -> bool {
    text(record, "status").is_some_and(|status| wanted.contains(&status))
}

/// Calendar day of a `due_date`, which may carry a time part
fn due_on(task: &Value) -> Option<NaiveDate> {
    let due = text(task, "due_date")?;
    let day = due.get(..10).unwrap_or(due);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Office-wide counters shown on the dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_clients: usize,
    pub hot_leads: usize,
    /// Listings placed in a zone
    pub active_listings: usize,
    pub exclusive_listings: usize,
    pub upcoming_showings: usize,
    pub active_offers: usize,
    pub active_deals: usize,
    pub pending_commissions: usize,
    /// Open tasks due on the given day
    pub today_tasks: usize,
    /// Open high-priority tasks
    pub urgent_tasks: usize,
}

impl DashboardStats {
    pub fn compute(clients: &[Client], leads: &[Lead], listings: &[Listing], activity: &Activity, today: NaiveDate) -> Self {
        let open_tasks = || activity.tasks.iter().filter(|t| text(t, "status") != Some(TASK_DONE));
        Self {
            total_clients: clients.len(),
            hot_leads: count(leads, |l| l.status == Some(LeadStatus::Hot)),
            active_listings: count(listings, |l| l.zone.is_some()),
            exclusive_listings: count(listings, |l| l.is_exclusive == Some(true)),
            upcoming_showings: count(&activity.showings, |s| status_in(s, &[SHOWING_SCHEDULED])),
            active_offers: count(&activity.offers, |o| status_in(o, OFFERS_OPEN)),
            active_deals: count(&activity.deals, |d| status_in(d, DEALS_IN_PROGRESS)),
            pending_commissions: count(&activity.commissions, |c| {
                text(c, "payment_status") == Some(COMMISSION_UNPAID)
            }),
            today_tasks: open_tasks().filter(|t| due_on(t) == Some(today)).count(),
            urgent_tasks: open_tasks()
                .filter(|t| text(t, "priority") == Some(Priority::High.as_str()))
                .count(),
        }
    }

    /// Load every collection concurrently and count as of the local date.
    /// A collection that fails to load counts as empty.
    pub async fn load(queries: &QueryClient, activity: &ActivityApis) -> Self {
        let (clients, leads, listings, activity) = tokio::join!(
            queries.clients.fetch(),
            queries.leads.fetch(),
            queries.listings.fetch(),
            Activity::load(activity)
        );
        let clients = or_empty(Resource::Clients, clients);
        let leads = or_empty(Resource::Leads, leads);
        let listings = or_empty(Resource::Listings, listings);
        Self::compute(&clients, &leads, &listings, &activity, Local::now().date_naive())
    }
}
