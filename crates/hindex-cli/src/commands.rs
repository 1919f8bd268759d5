// Subcommands that work on the article store
use crate::cli::Commands;
use hindex_core::{Config, ExportFormat, Exporter, Outcome, Prompter, StateStore};
use std::io::Write;
use std::path::Path;

/// Run one store command, writing its output to `out`
///
/// Returns the mutation outcome for commands that change something, so the
/// caller can pick an exit status.
pub fn run(
    command: &Commands,
    store: &mut StateStore,
    config: &Config,
    prompter: &dyn Prompter,
    out: &mut dyn Write,
) -> anyhow::Result<Option<Outcome>> {
    let outcome = match command {
        Commands::Add { title, citations } => {
            let outcome = store.add_article(title.as_deref(), *citations)?;
            let count = store.state().active().articles.len();
            report(out, outcome, &format!("Added article #{} to \"{}\"", count, store.current()))?;
            Some(outcome)
        }
        Commands::Remove { index } => {
            // Numbers are 1-based, as printed by `list`
            let outcome = match index.checked_sub(1) {
                Some(i) => store.remove_article(i)?,
                None => Outcome::Unchanged,
            };
            report(out, outcome, &format!("Removed article #{}", index))?;
            Some(outcome)
        }
        Commands::Edit { index, title, citations } => {
            let outcome = edit(store, *index, title.as_deref(), citations.as_deref())?;
            report(out, outcome, &format!("Updated article #{}", index))?;
            Some(outcome)
        }
        Commands::Clear { .. } => {
            let outcome = store.clear_active_collection(prompter)?;
            report(out, outcome, &format!("Cleared \"{}\"", store.current()))?;
            Some(outcome)
        }
        Commands::List { json } => {
            list(store, *json, out)?;
            None
        }
        Commands::Compute { json } => {
            let hindex = store.compute();
            if *json {
                writeln!(out, "{}", serde_json::to_string_pretty(&hindex)?)?;
            } else {
                writeln!(
                    out,
                    "H-index: {} ({} article{})",
                    hindex.h,
                    hindex.sorted.len(),
                    if hindex.sorted.len() == 1 { "" } else { "s" }
                )?;
            }
            None
        }
        Commands::AddCollection { name } => {
            let outcome = store.add_collection(name.as_deref(), prompter)?;
            report(out, outcome, &format!("Created and switched to \"{}\"", store.current()))?;
            Some(outcome)
        }
        Commands::DeleteCollection { name, .. } => {
            let outcome = store.delete_collection(name, prompter)?;
            report(out, outcome, &format!("Deleted \"{}\", now on \"{}\"", name, store.current()))?;
            Some(outcome)
        }
        Commands::Switch { name } => {
            let outcome = store.switch_collection(name)?;
            report(out, outcome, &format!("Switched to \"{}\"", name))?;
            Some(outcome)
        }
        Commands::Rename { old, new } => {
            let outcome = store.rename_collection(old, new, prompter)?;
            report(out, outcome, &format!("Renamed \"{}\" to \"{}\"", old, new.trim()))?;
            Some(outcome)
        }
        Commands::Collections { json } => {
            collections(store, *json, out)?;
            None
        }
        Commands::Current => {
            writeln!(out, "{}", store.current())?;
            None
        }
        Commands::Export { path, format } => {
            let path = path
                .clone()
                .unwrap_or_else(|| config.export.file_name.clone().into());
            let format = format
                .map(ExportFormat::from)
                .or_else(|| format_from_path(&path))
                .unwrap_or(ExportFormat::Json);

            let articles = store.articles();
            Exporter::export_to_file_with_format(&articles, &path, format)?;
            writeln!(out, "Exported {} articles to {}", articles.len(), path.display())?;
            None
        }
        Commands::Info | Commands::Serve { .. } | Commands::Tui | Commands::Config { .. } => {
            anyhow::bail!("not a store command: {:?}", command)
        }
    };

    Ok(outcome)
}

fn edit(
    store: &mut StateStore,
    index: usize,
    title: Option<&str>,
    citations: Option<&str>,
) -> anyhow::Result<Outcome> {
    let Some(i) = index.checked_sub(1) else {
        return Ok(Outcome::Unchanged);
    };

    let mut outcome = Outcome::Unchanged;
    if let Some(title) = title {
        outcome = store.edit_article_title(i, title)?;
    }
    if let Some(raw) = citations {
        if store.edit_article_citations(i, raw)?.is_applied() {
            outcome = Outcome::Applied;
        }
    }
    Ok(outcome)
}

fn list(store: &StateStore, json: bool, out: &mut dyn Write) -> anyhow::Result<()> {
    let articles = store.articles();
    if json {
        writeln!(out, "{}", Exporter::to_json(&articles)?)?;
        return Ok(());
    }

    writeln!(out, "{} ({})", store.current(), articles.len())?;
    for (i, article) in articles.iter().enumerate() {
        let title = if article.title.is_empty() {
            "(untitled)"
        } else {
            &article.title
        };
        writeln!(out, "{:>3}. {:<48} {:>6}", i + 1, title, article.citations)?;
    }
    Ok(())
}

fn collections(store: &StateStore, json: bool, out: &mut dyn Write) -> anyhow::Result<()> {
    let collections = store.collections();
    if json {
        let mut map = serde_json::Map::new();
        for collection in &collections {
            map.insert(collection.name.clone(), serde_json::to_value(&collection.articles)?);
        }
        writeln!(out, "{}", serde_json::to_string_pretty(&map)?)?;
        return Ok(());
    }

    for collection in &collections {
        let marker = if collection.name == store.current() { "*" } else { " " };
        writeln!(out, "{} {} ({})", marker, collection.name, collection.articles.len())?;
    }
    Ok(())
}

fn format_from_path(path: &Path) -> Option<ExportFormat> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(ExportFormat::from_extension)
}

fn report(out: &mut dyn Write, outcome: Outcome, applied: &str) -> std::io::Result<()> {
    match outcome {
        Outcome::Applied => writeln!(out, "{}", applied),
        Outcome::Unchanged => writeln!(out, "Nothing changed"),
        Outcome::Declined => writeln!(out, "Cancelled"),
        // The prompter already said why
        Outcome::Rejected => Ok(()),
    }
}
