use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use assets_core::{
    attributes::to_api_attribute,
    load_settings,
    view::{page_type, PageType},
    AssetEvent, AssetStore, AssetsClient, ListOutcome, ReqwestTransport, UploadOutcome,
};
use clap::{Parser, Subcommand};
use shared::domain::{AssetId, CourseContext, FilePayload, SortDirection};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Cli {
    /// Overrides `api_base_url` from assets.toml and the environment.
    #[arg(long)]
    api_base_url: Option<String>,
    #[arg(long)]
    course_id: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List {
        /// displayName, contentType or dateAdded
        #[arg(long, default_value = "dateAdded")]
        sort: String,
        #[arg(long, default_value = "desc", value_parser = parse_direction)]
        direction: SortDirection,
        #[arg(long, default_value_t = 0)]
        page: i64,
        /// Asset type to include; repeat for several.
        #[arg(long = "type")]
        asset_types: Vec<String>,
    },
    Upload {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    Delete {
        asset_id: String,
    },
    Lock {
        asset_id: String,
    },
    ClearFilters,
}

fn parse_direction(raw: &str) -> Result<SortDirection, String> {
    match raw.to_ascii_lowercase().as_str() {
        "asc" => Ok(SortDirection::Asc),
        "desc" => Ok(SortDirection::Desc),
        other => Err(format!("unknown direction '{other}', expected asc or desc")),
    }
}

async fn read_payload(path: &Path) -> Result<FilePayload> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("{} has no usable file name", path.display()))?
        .to_string();
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let payload = FilePayload::new(name, bytes);
    Ok(match mime_guess::from_path(path).first_raw() {
        Some(mime_type) => payload.with_mime_type(mime_type),
        None => payload,
    })
}

fn report_list(outcome: &ListOutcome) -> Result<()> {
    match outcome {
        ListOutcome::Applied => Ok(()),
        ListOutcome::Stale => {
            info!("list response superseded by a newer request");
            Ok(())
        }
        ListOutcome::Failed(error) => bail!("listing assets failed: {error}"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings()?;
    if let Some(api_base_url) = cli.api_base_url {
        settings.api_base_url = api_base_url;
    }
    let transport = Arc::new(ReqwestTransport::from_settings(&settings)?);
    let client = AssetsClient::new(transport, Arc::new(AssetStore::new()), settings);
    let course = CourseContext::new(cli.course_id);

    match cli.command {
        Command::List {
            sort,
            direction,
            page,
            asset_types,
        } => {
            client.update_sort(to_api_attribute(&sort)?, direction);
            client.update_page(page);
            for key in asset_types {
                client.update_filter(key, true);
            }
            report_list(&client.refresh(&course).await?)?;
        }
        Command::Upload { paths } => {
            let mut files = Vec::with_capacity(paths.len());
            for path in &paths {
                files.push(read_payload(path).await?);
            }
            match client.upload_assets(files, &course).await? {
                UploadOutcome::Rejected => {
                    let reason = client.store().read(|state| {
                        state
                            .status
                            .event()
                            .filter(|event| event.is_validation_rejection())
                            .map_or("upload limits exceeded", AssetEvent::name)
                    });
                    bail!("upload rejected: {reason}");
                }
                UploadOutcome::Completed { succeeded, failed } => {
                    info!(succeeded, failed, "upload batch finished");
                }
            }
        }
        Command::Delete { asset_id } => {
            report_list(&client.refresh(&course).await?)?;
            client.delete_asset(&AssetId::new(asset_id), &course).await;
        }
        Command::Lock { asset_id } => {
            report_list(&client.refresh(&course).await?)?;
            client
                .toggle_lock_asset(&AssetId::new(asset_id), &course)
                .await;
        }
        Command::ClearFilters => {
            report_list(&client.clear_filters(&course).await?)?;
        }
    }

    let snapshot = client.store().snapshot();
    if let Some(error) = snapshot.status.error() {
        eprintln!("{}: {error}", snapshot.status.event().map_or("", |e| e.name()));
    }
    let shown = page_type(&snapshot, PageType::default());
    info!(page_type = ?shown, assets = snapshot.collection.len(), "done");
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
