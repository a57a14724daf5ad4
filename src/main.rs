use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use golden_crm::api::{EntityApi, UploadRequest};
use golden_crm::cache::{Query, NEWEST_FIRST};
use golden_crm::models::{Client, Lead, Listing};
use golden_crm::pages::{ActivityApis, DashboardStats, Page, PageEntity};
use golden_crm::{CrmConfig, Entities, FileUploader, QueryClient, Resource};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "golden-crm")]
#[command(version, about = "Command-line client for the Golden real-estate CRM")]
struct Cli {
    /// API root, overrides CRM_API_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List a resource, searched and filtered the way its page does
    List(ListArgs),
    /// Fetch one record as JSON
    Get { resource: Resource, id: String },
    /// Delete one record
    Delete { resource: Resource, id: String },
    /// Upload a file and print its URL
    Upload { path: PathBuf },
    /// Office-wide dashboard counters
    Stats,
}

#[derive(Args)]
struct ListArgs {
    resource: Resource,

    /// Free-text search term
    #[arg(long, short)]
    search: Option<String>,

    /// Field filter as key=value, e.g. status=חדש (repeatable)
    #[arg(long = "filter", short, value_parser = parse_key_value)]
    filters: Vec<(String, String)>,

    /// Ordering hint passed to the backend, e.g. -created_date
    #[arg(long)]
    order_by: Option<String>,

    /// Print matching records as JSON instead of one line each
    #[arg(long)]
    json: bool,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))
}

/// One-line rendering of a record for terminal output
trait Summary {
    fn summary(&self) -> String;
}

impl Summary for Client {
    fn summary(&self) -> String {
        format!(
            "{} | {} | {}",
            self.full_name(),
            self.primary_phone().unwrap_or("-"),
            self.status.map_or("-", |s| s.as_str())
        )
    }
}

impl Summary for Lead {
    fn summary(&self) -> String {
        format!(
            "{} | {} | {} | {}",
            self.full_name(),
            self.phone_main.as_deref().unwrap_or("-"),
            self.status.map_or("-", |s| s.as_str()),
            self.priority.map_or("-", |p| p.as_str())
        )
    }
}

impl Summary for Listing {
    fn summary(&self) -> String {
        let rooms = self.rooms.map_or("-".to_string(), |r| r.to_string());
        let price = self.price_ask.map_or("-".to_string(), |p| format!("{p:.0} ₪"));
        format!(
            "{} | {} | {} rooms | {}",
            self.listing_number.as_deref().unwrap_or("-"),
            self.display_address(),
            rooms,
            price
        )
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("golden_crm=info")))
        .init();

    let cli = Cli::parse();

    let mut config = CrmConfig::from_env().context("Failed to load configuration")?;
    if let Some(base_url) = &cli.base_url {
        config.base_url = CrmConfig::with_base_url(base_url)
            .context("Invalid --base-url")?
            .base_url;
    }
    info!("🏠 Golden CRM @ {}", config.base_url);

    let entities = Entities::new(&config).context("Failed to build HTTP client")?;

    match cli.command {
        Command::List(args) => match args.resource {
            Resource::Clients => list_page::<Client>(Arc::new(entities.clients.clone()), &args, None).await,
            Resource::Leads => list_page::<Lead>(Arc::new(entities.leads.clone()), &args, Some(NEWEST_FIRST)).await,
            Resource::Listings => list_page::<Listing>(Arc::new(entities.listings.clone()), &args, Some(NEWEST_FIRST)).await,
            other => list_raw(&entities, other, &args).await,
        },
        Command::Get { resource, id } => {
            let record = entities
                .raw(resource)
                .get(&id)
                .await
                .with_context(|| format!("Failed to fetch {resource}/{id}"))?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Command::Delete { resource, id } => {
            entities
                .raw(resource)
                .delete(&id)
                .await
                .with_context(|| format!("Failed to delete {resource}/{id}"))?;
            info!("🗑️  Deleted {}/{}", resource, id);
            Ok(())
        }
        Command::Upload { path } => {
            let file = UploadRequest::from_path(&path).await?;
            let uploaded = entities
                .upload
                .upload(file)
                .await
                .with_context(|| format!("Failed to upload {}", path.display()))?;
            println!("{}", uploaded.file_url);
            Ok(())
        }
        Command::Stats => {
            let queries = QueryClient::new(&entities);
            let stats = DashboardStats::load(&queries, &ActivityApis::new(&entities)).await;
            println!("{}", serde_json::to_string_pretty(&stats)?);
            Ok(())
        }
    }
}

async fn list_page<T>(api: Arc<dyn EntityApi<T>>, args: &ListArgs, default_order: Option<&str>) -> anyhow::Result<()>
where
    T: PageEntity + Summary,
{
    let order_by = args.order_by.as_deref().or(default_order);
    let mut page = Page::new(Arc::new(Query::new(api, args.resource, order_by)));

    if let Some(term) = &args.search {
        page.set_search(term.as_str());
    }
    for (key, value) in &args.filters {
        page.set_filter(key, value)
            .with_context(|| format!("Invalid filter {key}={value}"))?;
    }

    page.load().await;
    let alerts = page.take_alerts();
    if !alerts.is_empty() {
        for alert in &alerts {
            warn!("{}", alert);
        }
        bail!("Could not load {}", args.resource);
    }

    let visible = page.visible();
    if args.json {
        print_json(&visible)?;
    } else {
        for (i, record) in visible.iter().enumerate() {
            println!("{}. {}", i + 1, record.summary());
        }
    }
    info!("✅ {} of {} {} shown", visible.len(), page.records().len(), args.resource);
    info!("📊 {:?}", page.stats());
    Ok(())
}

/// Resources without a typed model are listed as raw JSON and cannot be filtered
async fn list_raw(entities: &Entities, resource: Resource, args: &ListArgs) -> anyhow::Result<()> {
    if args.search.is_some() || !args.filters.is_empty() {
        bail!("--search and --filter are only supported for clients, leads and listings");
    }
    let records = entities
        .raw(resource)
        .list(args.order_by.as_deref())
        .await
        .with_context(|| format!("Failed to list {resource}"))?;
    print_json(&records)?;
    info!("✅ {} {}", records.len(), resource);
    Ok(())
}

fn print_json<S: Serialize + ?Sized>(value: &S) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
