//! locktable CLI Client
//!
//! Command-line interface for interacting with a lock table endpoint.

use clap::{Parser, Subcommand};
use locktable::network::Client;
use locktable::protocol::{AttributeValue, DeleteItemRequest, GetItemRequest, Item, PutItemRequest};
use locktable::LockTableError;
use tracing_subscriber::EnvFilter;

/// Exit code when a lock is already held
const EXIT_CONFLICT: i32 = 2;

/// locktable CLI
#[derive(Parser, Debug)]
#[command(name = "locktable-cli")]
#[command(about = "CLI for locktable lock tables")]
struct Args {
    /// Server endpoint
    #[arg(short, long, default_value = "http://127.0.0.1:8000")]
    endpoint: String,

    /// Table name
    #[arg(short, long, default_value = "terraform-lock-table")]
    table: String,

    /// Attribute holding the lock key
    #[arg(short = 'K', long, default_value = "LockID")]
    key_attribute: String,

    /// API version prefix sent in X-Amz-Target
    #[arg(long, default_value = "DynamoDB_20120810")]
    target_prefix: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get the item stored for a lock
    Get {
        /// The lock key
        lock_id: String,
    },

    /// Write an item
    Put {
        /// The lock key
        lock_id: String,

        /// Attributes as name=value, repeatable
        #[arg(short, long = "attr", value_parser = parse_attribute)]
        attributes: Vec<(String, String)>,

        /// Fail if the item already exists
        #[arg(long)]
        if_absent: bool,
    },

    /// Delete an item
    Del {
        /// The lock key
        lock_id: String,
    },

    /// Take a lock (put only if absent)
    Acquire {
        /// The lock key
        lock_id: String,

        /// Holder description stored in the Info attribute
        #[arg(short, long)]
        info: Option<String>,
    },

    /// Release a lock
    Release {
        /// The lock key
        lock_id: String,
    },
}

fn parse_attribute(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected name=value, got {:?}", raw))
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let client = match Client::new(&args.endpoint) {
        Ok(client) => client
            .with_key_attribute(&args.key_attribute)
            .with_target_prefix(&args.target_prefix),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&client, &args.table, args.command).await {
        eprintln!("error: {}", e);
        let code = if e.is_conflict() { EXIT_CONFLICT } else { 1 };
        std::process::exit(code);
    }
}

async fn run(client: &Client, table: &str, command: Commands) -> Result<(), LockTableError> {
    match command {
        Commands::Get { lock_id } => {
            let req = GetItemRequest {
                table_name: table.to_string(),
                key: key_record(client, &lock_id),
            };
            match client.get_item(&req).await? {
                Some(item) => println!("{}", serde_json::to_string_pretty(&item)?),
                None => println!("(no item)"),
            }
        }
        Commands::Put {
            lock_id,
            attributes,
            if_absent,
        } => {
            let mut item = key_record(client, &lock_id);
            for (name, value) in attributes {
                item.insert(name, AttributeValue::string(value));
            }
            put(client, table, item, if_absent).await?;
            println!("OK");
        }
        Commands::Acquire { lock_id, info } => {
            let mut item = key_record(client, &lock_id);
            if let Some(info) = info {
                item.insert("Info".to_string(), AttributeValue::string(info));
            }
            put(client, table, item, true).await?;
            println!("Acquired {}", lock_id);
        }
        Commands::Del { lock_id } | Commands::Release { lock_id } => {
            let req = DeleteItemRequest {
                table_name: table.to_string(),
                key: key_record(client, &lock_id),
            };
            client.delete_item(&req).await?;
            println!("Released {}", lock_id);
        }
    }
    Ok(())
}

async fn put(client: &Client, table: &str, item: Item, if_absent: bool) -> Result<(), LockTableError> {
    let req = PutItemRequest {
        table_name: table.to_string(),
        item,
        condition_expression: if_absent
            .then(|| format!("attribute_not_exists({})", client.key_attribute())),
    };
    client.put_item(&req).await
}

fn key_record(client: &Client, lock_id: &str) -> Item {
    let mut record = Item::new();
    record.insert(
        client.key_attribute().to_string(),
        AttributeValue::string(lock_id),
    );
    record
}
