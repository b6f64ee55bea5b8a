//! Terminal presentation for the `upload` and `manage` commands.
//!
//! Results go to stdout; logs go to stderr through `tracing`.

use anyhow::Result;
use std::path::Path;

use crate::{config::ManageAction, state::Backend};

const CACHE_NOTE: &str = "note: jsDelivr may take a few minutes to serve a new file";

pub async fn upload(backend: &Backend, path: &Path) -> Result<()> {
    let outcome = backend.uploads.upload_file(path).await?;

    if outcome.updated {
        println!("replaced existing {}", outcome.destination_name);
    } else {
        println!("uploaded {}", outcome.destination_name);
    }
    println!("CDN URL: {}", outcome.cdn_url);
    if let Some(snippet) = &outcome.snippet_path {
        println!("HTML snippet: {}", snippet.display());
    }
    println!("{}", CACHE_NOTE);
    Ok(())
}

pub async fn manage(backend: &Backend, action: ManageAction) -> Result<()> {
    match action {
        ManageAction::List => list(backend).await,
        ManageAction::Delete { name } => {
            let removed = backend.videos.delete(&name).await?;
            println!("deleted {}", removed.name);
            Ok(())
        }
        ManageAction::Url { name } => {
            println!("{}", backend.videos.url(&name));
            Ok(())
        }
    }
}

async fn list(backend: &Backend) -> Result<()> {
    let videos = backend.videos.list().await?;
    if videos.is_empty() {
        println!("no videos found");
        return Ok(());
    }

    println!("{} video(s):\n", videos.len());
    for (idx, video) in videos.iter().enumerate() {
        println!("{}. {}", idx + 1, video.asset.name);
        println!("   size: {:.1} MB", video.asset.size_mb());
        println!("   url:  {}", video.cdn_url);
        println!("   sha:  {}...", video.asset.short_hash());
        println!();
    }
    Ok(())
}
