use std::sync::Arc;

use clap::{Parser, Subcommand};
use storefront_catalog::CatalogClient;
use storefront_core::AppConfig;
use storefront_quickview::{InMemoryPage, QuickView, QuickViewConfig, SelectOutcome};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "storefront-cli")]
#[command(about = "Storefront quick view from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Open the quick view for a product and print its view model as JSON
    Show {
        /// Product handle, e.g. `classic-tee`
        handle: String,
        /// Option choice to apply once loaded, as NAME=VALUE (repeatable)
        #[arg(long = "select", value_name = "NAME=VALUE", value_parser = parse_selection)]
        selections: Vec<(String, String)>,
    },
}

/// Parses `NAME=VALUE`, splitting on the first `=`.
fn parse_selection(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got \"{raw}\""))?;
    let (name, value) = (name.trim(), value.trim());
    if name.is_empty() || value.is_empty() {
        return Err(format!("option name and value must be non-empty in \"{raw}\""));
    }
    Ok((name.to_string(), value.to_string()))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = storefront_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Show { handle, selections } => show(&config, &handle, &selections).await,
    }
}

async fn show(
    config: &AppConfig,
    handle: &str,
    selections: &[(String, String)],
) -> anyhow::Result<()> {
    let client = Arc::new(CatalogClient::from_config(config)?);
    let mut quick_view = QuickView::new(
        client,
        InMemoryPage::new(),
        QuickViewConfig::from(config),
    );

    quick_view.open(handle, None)?;
    quick_view.settle().await;

    let product_id = quick_view
        .load_state()
        .product
        .as_ref()
        .map(|p| p.id.clone());
    match product_id {
        Some(product_id) => {
            for (name, value) in selections {
                if let SelectOutcome::Discarded(reason) =
                    quick_view.select_option(&product_id, name, value)
                {
                    tracing::warn!(option = %name, %value, ?reason, "selection ignored");
                }
            }
        }
        None if !selections.is_empty() => {
            tracing::warn!(%handle, "no product loaded; selections ignored");
        }
        None => {}
    }

    let view = quick_view.view();
    println!("{}", serde_json::to_string_pretty(&view)?);
    quick_view.close();
    Ok(())
}
