//! Reelvault CLI: command-line client for the Reelvault API.
//!
//! Set REELVAULT_API_URL (or API_URL) and, for uploads, MEDIA_HOST_UPLOAD_URL.

use anyhow::Context;
use clap::{Parser, Subcommand};
use reelvault_api_client::{ApiClient, UploadError, UploadFile, Uploader, VideoDetails};
use reelvault_cli::{init_tracing, progress_line};
use reelvault_core::models::TransformationsInput;
use serde::Serialize;
use std::io::Write;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "reelvault", about = "Reelvault API CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a video to the media host and record it
    Upload {
        /// Path to the video file
        file: std::path::PathBuf,
        /// Video title
        #[arg(long)]
        title: String,
        /// Optional description
        #[arg(long)]
        description: Option<String>,
        /// Display width in pixels
        #[arg(long)]
        width: Option<i32>,
        /// Display height in pixels
        #[arg(long)]
        height: Option<i32>,
        /// Encoding quality (1-100)
        #[arg(long)]
        quality: Option<i32>,
        /// Hide player controls
        #[arg(long)]
        no_controls: bool,
    },
    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// List recorded videos, newest first
    List {
        /// Maximum number of items
        #[arg(long, default_value = "20")]
        limit: u32,
        /// Offset for pagination
        #[arg(long, default_value = "0")]
        offset: u32,
    },
    /// Get a single video by ID
    Get {
        /// Video UUID
        id: Uuid,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let client = ApiClient::from_env()
        .context("Failed to create API client. Set REELVAULT_API_URL (or API_URL)")?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Upload {
            file,
            title,
            description,
            width,
            height,
            quality,
            no_controls,
        } => {
            let upload = UploadFile::from_path(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let details = VideoDetails {
                title,
                description,
                controls: Some(!no_controls),
                transformations: Some(TransformationsInput {
                    width,
                    height,
                    quality,
                }),
            };

            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_interrupt.cancel();
                }
            });

            let uploader = Uploader::from_env(client.http().clone());
            let result = client
                .publish_video(
                    &uploader,
                    upload,
                    details,
                    |progress| {
                        eprint!("\r{}", progress_line(&progress, 30));
                        let _ = std::io::stderr().flush();
                    },
                    &cancel,
                )
                .await;
            eprintln!();

            match result {
                Ok(asset) => print_json(&asset)?,
                Err(err) => {
                    if let Some(upload_err) = err.downcast_ref::<UploadError>() {
                        tracing::debug!(error = %upload_err, kind = ?upload_err.kind(), "Upload failed");
                        eprintln!("{}", upload_err.user_message());
                        std::process::exit(1);
                    }
                    return Err(err);
                }
            }
        }
        Commands::Register { email, password } => {
            let response = client.register(&email, &password).await?;
            print_json(&response)?;
        }
        Commands::List { limit, offset } => {
            let response = client.list_videos(Some(limit), Some(offset)).await?;
            print_json(&response)?;
        }
        Commands::Get { id } => {
            let response = client.get_video(id).await?;
            print_json(&response)?;
        }
    }

    Ok(())
}
