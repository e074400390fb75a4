use anyhow::Result;
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttlsweep::storage::dynamodb::{create_client, AwsConfig, DynamoStore};
use ttlsweep_core::expiry::schedule_expiry;

/// ttlsweep - schedule TTL-based expiry of a client's records
#[derive(Parser, Debug)]
#[command(name = "ttlsweep")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mark every record of the given client for deferred deletion
    Expire {
        /// Partition key of the records to expire (the client identifier)
        client_id: String,

        /// Hours from now after which the records become eligible for removal
        #[arg(long, default_value_t = 1)]
        ttl_hours: i64,

        /// Table holding the client records
        #[arg(long, short, env = "DYNAMODB_TABLE_NAME", default_value = "client-entity")]
        table: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttlsweep=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Command::Expire {
            client_id,
            ttl_hours,
            table,
        } => {
            let aws_config = AwsConfig::default();
            tracing::info!(store = %aws_config.target_display(), table, "connecting");

            let client = create_client(&aws_config).await?;
            let store = DynamoStore::new(client, table);

            let expires_at = (Utc::now() + Duration::hours(ttl_hours)).timestamp();
            let updated = schedule_expiry(&store, &client_id, expires_at).await?;

            println!("Scheduled expiry of {updated} records for client '{client_id}'");
        }
    }

    Ok(())
}
