//! Command handlers. Each writes its user-facing output to `out`.

use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use pv_app::App;
use pv_core::ids::PoemId;
use pv_core::poem::SavedPoem;
use pv_infra::FsPhotoReader;
use tracing::info;

use crate::cli::Command;

pub async fn execute(app: &App, command: Command, out: &mut dyn Write) -> Result<()> {
    match command {
        Command::Compose {
            image,
            save,
            export,
        } => compose(app, &image, save, export, out).await,
        Command::List => list(app, out).await,
        Command::Delete { id } => delete(app, &PoemId::from(id), out).await,
        Command::Export { id } => export_saved(app, &PoemId::from(id), out).await,
    }
}

async fn compose(
    app: &App,
    image: &Path,
    save: bool,
    export: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let file = FsPhotoReader::new().open(image).await?;
    let outcome = app.select_photo().execute(Some(file)).await;
    if let Some(rejection) = outcome.error {
        bail!("{rejection}");
    }

    if app.session().wait_for_preview().await.is_none() {
        let state = app.session().snapshot();
        return Err(match state.error {
            Some(err) => anyhow!(err),
            None => anyhow!("The photo selection was cleared."),
        });
    }

    let poem = app.generate_poem().execute().await?;
    writeln!(out, "{poem}")?;

    if save {
        let saved = app.save_poem().execute().await?;
        writeln!(out, "\nSaved as {}", saved.id)?;
    }
    if export {
        let path = app.export_poem().execute_current().await?;
        writeln!(out, "Exported to {}", path.display())?;
    }
    Ok(())
}

fn summary_line(poem: &SavedPoem) -> String {
    let first_line = poem.poem_text.lines().next().unwrap_or_default();
    format!(
        "{}  {}  {}",
        poem.id,
        poem.created_at.format("%Y-%m-%d %H:%M"),
        first_line
    )
}

async fn list(app: &App, out: &mut dyn Write) -> Result<()> {
    let poems = app.list_saved_poems().execute().await;
    if poems.is_empty() {
        writeln!(out, "No saved poems yet.")?;
        return Ok(());
    }
    for poem in poems.iter() {
        writeln!(out, "{}", summary_line(poem))?;
    }
    Ok(())
}

async fn delete(app: &App, id: &PoemId, out: &mut dyn Write) -> Result<()> {
    if app.delete_saved_poem().execute(id).await {
        writeln!(out, "Deleted {id}")?;
    } else {
        info!(poem_id = %id, "Nothing to delete");
        writeln!(out, "No saved poem with id {id}")?;
    }
    Ok(())
}

async fn export_saved(app: &App, id: &PoemId, out: &mut dyn Write) -> Result<()> {
    let path = app
        .export_poem()
        .execute_saved(id)
        .await
        .with_context(|| format!("Failed to export poem {id}"))?;
    writeln!(out, "Exported to {}", path.display())?;
    Ok(())
}
