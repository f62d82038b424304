//! Gallery CLI: command-line client for the photo gallery backend.
//!
//! Set GALLERY_API_URL (or API_URL). Other GALLERY_* settings are optional.

use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use gallery_cli::{content_type_for, criteria_from_args, init_tracing};
use gallery_client::Gallery;
use gallery_core::GalleryConfig;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "gallery", about = "Photo gallery CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List photos, optionally filtered by tag and upload date
    List {
        /// Case-insensitive tag substring
        #[arg(long)]
        tag: Option<String>,
        /// Earliest upload date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Latest upload date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Show a single photo with its full-size URL
    Show {
        /// Photo ID
        id: String,
    },
    /// Upload a JPEG, PNG or GIF image
    Upload {
        /// Path to the file to upload
        file: std::path::PathBuf,
        /// Wait for the post-upload catalog reload and print the new record
        #[arg(long)]
        wait: bool,
    },
    /// Delete a photo by ID
    Delete {
        /// Photo ID
        id: String,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = GalleryConfig::from_env().context("Invalid gallery configuration")?;
    let gallery = Gallery::from_config(&config).context(
        "Failed to create API client. Set GALLERY_API_URL (or API_URL)",
    )?;

    let cli = Cli::parse();

    match cli.command {
        Commands::List { tag, from, to } => {
            let catalog = gallery.catalog();
            catalog.set_criteria(criteria_from_args(tag, from, to)).await;
            catalog.reload().await?;
            print_json(&catalog.filtered_view().await)?;
        }
        Commands::Show { id } => {
            gallery.catalog().reload().await?;
            if !gallery.selection().select(&id).await {
                return Err(anyhow!("Photo not found: {}", id));
            }
            let record = gallery
                .selection()
                .selected_record()
                .await
                .ok_or_else(|| anyhow!("Photo not found: {}", id))?;
            print_json(&record)?;
        }
        Commands::Upload { file, wait } => {
            let content_type = content_type_for(&file).ok_or_else(|| {
                anyhow!(
                    "Unsupported file type: {}. Use a .jpg, .jpeg, .png or .gif file",
                    file.display()
                )
            })?;
            let filename = file
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| anyhow!("Invalid file name: {}", file.display()))?
                .to_string();
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;

            let receipt = gallery
                .uploads()
                .upload(bytes, &filename, content_type)
                .await?;

            if wait {
                let catalog = receipt.settle_reload.join().await?;
                let record = receipt
                    .photo_id
                    .as_deref()
                    .and_then(|id| catalog.get(id).cloned());
                print_json(&serde_json::json!({
                    "success": true,
                    "photoId": receipt.photo_id,
                    "key": receipt.key,
                    "photo": record,
                }))?;
            } else {
                print_json(&serde_json::json!({
                    "success": true,
                    "photoId": receipt.photo_id,
                    "key": receipt.key,
                }))?;
            }
        }
        Commands::Delete { id } => {
            gallery.catalog().reload().await?;
            if !gallery.selection().select(&id).await {
                return Err(anyhow!("Photo not found: {}", id));
            }
            let deleted = gallery.selection().delete_selected().await?;
            print_json(
                &serde_json::json!({ "success": true, "message": format!("Photo {} deleted", deleted) }),
            )?;
        }
    }

    Ok(())
}
