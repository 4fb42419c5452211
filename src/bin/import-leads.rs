use clap::Parser;
use lead_scraper::leads::{canonicalize, LeadData};
use lead_scraper::{LeadStore, ProfileRecord, Table};
use std::path::PathBuf;

/// Load a scraped snapshot into the lead store, or list what it holds.
#[derive(Debug, Parser)]
#[command(name = "import-leads")]
struct Args {
    /// Snapshot file written by lead-scraper.
    snapshot: Option<PathBuf>,

    #[arg(long, env = "LEAD_DATABASE", default_value = "leads.db")]
    database: PathBuf,

    /// Print every stored lead.
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("LOG_LEVEL")
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .init();

    let args = Args::parse();
    let store = LeadData::new(&args.database).await?;

    if let Some(path) = &args.snapshot {
        let raw = tokio::fs::read_to_string(path).await?;
        let records: Vec<ProfileRecord> = serde_json::from_str(&raw)?;
        let in_file = records.len();
        let records = canonicalize(records);
        let inserted = store.insert_many(&records).await?;
        println!(
            "Imported {} new lead(s) from {} ({} in file, {} skipped)",
            inserted,
            path.display(),
            in_file,
            in_file - records.len()
        );
        println!("Store now holds {} lead(s)", store.leads.count().await?);
    }

    if args.list {
        for (i, lead) in store.all().await?.iter().enumerate() {
            println!("[{}]\n{}", i + 1, lead);
        }
    }

    store.close().await;
    Ok(())
}
