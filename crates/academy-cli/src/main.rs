//! Academy CLI: terminal dashboard for the catalog API.
//!
//! Set ACADEMY_API_URL (or API_URL) and ACADEMY_API_TOKEN. The token is sent
//! as a bearer token; its role claim is used when no profile can be resolved.

use academy_api_client::api::upload_payload_from_path;
use academy_api_client::viewer::{load_document, LoadOutcome};
use academy_api_client::{ApiClient, CatalogQueries, QueryCache};
use academy_cli::gate::Session;
use academy_cli::output::{
    catalog_detail, catalog_table, print_json, profile_summary, OutputFormat,
};
use academy_cli::viewer::{EventResponse, ViewerEvent, ViewerSession, COPY_DISABLED};
use academy_cli::{init_tracing, report_client_error};
use academy_core::models::CatalogListParams;
use academy_core::{ClientConfig, Permission};
use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "academy", about = "Academy catalog dashboard")]
struct Cli {
    /// API base URL (overrides ACADEMY_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Bearer token (overrides ACADEMY_API_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,
    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the signed-in user's tenant and role
    Me,
    /// List catalogs with optional filters and pagination
    List {
        /// Exact sector
        #[arg(long)]
        sector: Option<String>,
        /// Full-text search
        #[arg(long = "q")]
        query: Option<String>,
        /// Partial, case-insensitive name match
        #[arg(long)]
        name: Option<String>,
        /// MIME type filter
        #[arg(long)]
        mime_type: Option<String>,
        /// Created at or after (RFC 3339)
        #[arg(long)]
        created_from: Option<DateTime<Utc>>,
        /// Created at or before (RFC 3339)
        #[arg(long)]
        created_to: Option<DateTime<Utc>>,
        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: u32,
        /// Items per page (max 100)
        #[arg(long, default_value = "20")]
        limit: u32,
    },
    /// Show a single catalog
    Get {
        /// Catalog ID
        id: String,
    },
    /// Upload a PDF catalog
    Upload {
        /// Path to the PDF
        file: std::path::PathBuf,
        /// Display name
        #[arg(long)]
        name: Option<String>,
        /// Sector
        #[arg(long)]
        sector: Option<String>,
    },
    /// Delete a catalog
    Delete {
        /// Catalog ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Open a catalog in the restricted viewer
    View {
        /// Catalog ID
        id: String,
    },
}

fn build_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = ClientConfig::from_env().context("Failed to load configuration")?;
    if let Some(api_url) = &cli.api_url {
        config.api_url = api_url.trim_end_matches('/').to_string();
    }
    if cli.token.is_some() {
        config = config.with_token(cli.token.clone());
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush().context("Flush stdout")?;
    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .context("Read confirmation")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    let client = ApiClient::from_config(&config);
    let queries = CatalogQueries::new(client, Arc::new(QueryCache::new()), &config);
    let session = Session::resolve(&queries).await;
    let format = cli.format;
    // Delete actions follow the backend profile role only, never the token claim.
    let can_delete = session.profile_allows(Permission::DeleteCatalogs);

    match cli.command {
        Commands::Me => {
            session.require(Permission::ListCatalogs)?;
            match format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "profile": session.user(),
                    "role": session.role(),
                }))?,
                OutputFormat::Table => {
                    println!("{}", profile_summary(session.user(), session.role()))
                }
            }
        }
        Commands::List {
            sector,
            query,
            name,
            mime_type,
            created_from,
            created_to,
            page,
            limit,
        } => {
            session.require(Permission::ListCatalogs)?;
            let params = CatalogListParams {
                sector,
                q: query,
                name,
                mime_type,
                created_from,
                created_to,
                page: Some(page),
                limit: Some(limit),
            };
            let result = queries.catalogs(&params).await;
            match format {
                OutputFormat::Json => print_json(&result)?,
                OutputFormat::Table => {
                    println!("{}", catalog_table(&result, &params, can_delete))
                }
            }
        }
        Commands::Get { id } => {
            session.require(Permission::ListCatalogs)?;
            let record = queries.catalog(&id).await.map_err(report_client_error)?;
            match format {
                OutputFormat::Json => print_json(&record)?,
                OutputFormat::Table => println!("{}", catalog_detail(&record, can_delete)),
            }
        }
        Commands::Upload { file, name, sector } => {
            session.require(Permission::UploadCatalogs)?;
            let payload = upload_payload_from_path(&file, name.as_deref(), sector.as_deref())
                .map_err(report_client_error)?;
            let record = queries.upload(&payload).await.map_err(report_client_error)?;
            match format {
                OutputFormat::Json => print_json(&record)?,
                OutputFormat::Table => println!(
                    "Catalog uploaded: {} ({})",
                    record.name().unwrap_or("-"),
                    record.id().unwrap_or_default()
                ),
            }
        }
        Commands::Delete { id, yes } => {
            session.require(Permission::DeleteCatalogs)?;
            let label = match queries.catalog(&id).await {
                Ok(record) => record.name().unwrap_or(&id).to_string(),
                Err(_) => id.clone(),
            };
            let prompt = format!("Delete catalog \"{}\"? This cannot be undone.", label);
            if !yes && !confirm(&prompt)? {
                println!("Cancelled.");
                return Ok(());
            }
            queries.delete(&id).await.map_err(report_client_error)?;
            match format {
                OutputFormat::Json => print_json(
                    &serde_json::json!({ "success": true, "message": format!("Catalog {} deleted", id) }),
                )?,
                OutputFormat::Table => println!("Catalog deleted."),
            }
        }
        Commands::View { id } => {
            session.require(Permission::ListCatalogs)?;
            let record = queries.catalog(&id).await.map_err(report_client_error)?;
            view(queries.client(), &record).await?;
        }
    }

    Ok(())
}

/// Load the document (Ctrl-C aborts the download) and run the pager.
async fn view(
    client: &ApiClient,
    record: &academy_api_client::CatalogRecord,
) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let outcome = load_document(client, record, &cancel).await;
    interrupt.abort();

    let document = match outcome {
        LoadOutcome::Loaded(document) => document,
        LoadOutcome::Unavailable(message) => anyhow::bail!(message),
        LoadOutcome::Cancelled => {
            eprintln!("Cancelled.");
            return Ok(());
        }
    };

    let mut viewer = ViewerSession::open(document).await?;
    println!("{}", record.name().unwrap_or("Catalog"));
    println!("Commands: n(ext), p(rev), print, copy, q(uit)");

    let mut page = 0usize;
    println!("{}", viewer.render_page(page));

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Read viewer command")? {
        match line.trim() {
            "q" | "quit" => break,
            "n" | "next" if page + 1 < viewer.page_count() => page += 1,
            "p" | "prev" => page = page.saturating_sub(1),
            "copy" | "select" | "menu" => {
                let event = match line.trim() {
                    "copy" => ViewerEvent::Copy,
                    "select" => ViewerEvent::SelectStart,
                    _ => ViewerEvent::ContextMenu,
                };
                if viewer.handle(event) == EventResponse::Suppressed {
                    println!("{}", COPY_DISABLED);
                }
                continue;
            }
            "print" => {
                viewer.handle(ViewerEvent::BeforePrint);
                println!("{}", viewer.render_page(page));
                viewer.handle(ViewerEvent::AfterPrint);
                continue;
            }
            _ => {}
        }
        println!("{}", viewer.render_page(page));
    }

    viewer.release();
    Ok(())
}
