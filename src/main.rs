use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use wikelo_catalog::ops::telemetry;
use wikelo_catalog::{CatalogBuilder, PageParser, WikiClient, WikiConfig};

const UNREACHABLE: &str = "could not reach the wiki";

#[derive(Parser)]
#[command(name = "wikelo", about = "Wikelo item catalog and wiki page parser", version)]
struct Cli {
    /// MediaWiki api.php endpoint (default: WIKELO_API_BASE or starcitizen.tools)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Log line format on stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Json)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Json,
    Pretty,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the catalog from the landing page's tables
    Catalog {
        /// Landing page title
        #[arg(long)]
        landing: Option<String>,
    },
    /// Build the catalog from a category listing
    Category {
        /// Category title, including the `Category:` prefix
        #[arg(long)]
        category: Option<String>,
    },
    /// Parse any page into KV pairs, tables and lists
    Parse {
        /// Page title
        page: String,
    },
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.log_format {
        LogFormat::Json => telemetry::init_tracing(),
        LogFormat::Pretty => telemetry::init_tracing_pretty(),
    }

    // * CLI flags override the environment
    let mut config = WikiConfig::from_env();
    if let Some(api_base) = cli.api_base {
        config = config.with_api_base(api_base);
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    let client = WikiClient::new(&config).context("invalid wiki client configuration")?;

    match cli.command {
        Commands::Catalog { landing } => {
            let landing = landing.unwrap_or_else(|| config.landing_page.clone());
            let builder = CatalogBuilder::new(client, config);
            let records = builder.build_catalog(&landing).await.context(UNREACHABLE)?;
            print_json(&records, cli.pretty)
        }
        Commands::Category { category } => {
            let category = category.unwrap_or_else(|| config.category.clone());
            let builder = CatalogBuilder::new(client, config);
            let records = builder
                .build_category_catalog(&category)
                .await
                .context(UNREACHABLE)?;
            print_json(&records, cli.pretty)
        }
        Commands::Parse { page } => {
            let parser = PageParser::new(client, config);
            let result = parser.parse_page(&page).await.context(UNREACHABLE)?;
            print_json(&result, cli.pretty)
        }
    }
}
