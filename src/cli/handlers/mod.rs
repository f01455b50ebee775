use std::path::Path;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::document_io::{DocumentFile, Loaded};
use crate::model::config::{Config, ParseOptions, ViewSettings};
use crate::model::document::Document;
use crate::ops::item_ops::{self, ItemError};

/// Errors reported by single-shot commands
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("invalid index {0}")]
    InvalidIndex(usize),
    #[error(transparent)]
    Item(#[from] ItemError),
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = config_io::load_config(cli.config.as_deref())?;
    let path = cli.file_path();

    match &cli.command {
        None => Ok(()),
        Some(cmd) => match cmd {
            Commands::List(args) => cmd_list(&cli, &config, &path, args),
            Commands::Add(args) => cmd_add(&cli, &config, &path, args),
            Commands::Toggle(args) => cmd_toggle(&cli, &config, &path, args),
            Commands::Edit(args) => cmd_edit(&cli, &config, &path, args),
            Commands::Delete(args) => cmd_delete(&cli, &config, &path, args),
            Commands::Config => cmd_config(&cli, &config),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// An open document plus everything needed to save it
struct Target {
    file: DocumentFile,
    document: Document,
    options: ParseOptions,
}

fn open(cli: &Cli, config: &Config, path: &Path) -> Result<Target, Box<dyn std::error::Error>> {
    let options = ParseOptions::from(&config.format);
    let Loaded {
        mut file,
        document,
        warning,
    } = DocumentFile::open(path, &options)?;
    if let Some(w) = warning {
        eprintln!("warning: {}", w);
    }
    let settings = ViewSettings::resolve(config, &document.metadata, &cli.overrides());
    file.read_only = settings.read_only;
    Ok(Target {
        file,
        document,
        options,
    })
}

impl Target {
    fn save(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.file.save(&self.document, &self.options)?;
        Ok(())
    }
}

/// Convert a 1-based index from the command line
fn resolve_index(doc: &Document, one_based: usize) -> Result<usize, CommandError> {
    if one_based == 0 || one_based > doc.len() {
        return Err(CommandError::InvalidIndex(one_based));
    }
    Ok(one_based - 1)
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_list(cli: &Cli, config: &Config, path: &Path, args: &ListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let target = open(cli, config, path)?;
    let doc = &target.document;
    if args.json {
        let items: Vec<ItemJson> = doc.items().map(|item| item_to_json(item, doc)).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        println!("{}", format_list(doc, &config.display.check_symbol));
    }
    Ok(())
}

fn cmd_add(cli: &Cli, config: &Config, path: &Path, args: &AddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut target = open(cli, config, path)?;
    let text = args.text.join(" ");
    let index = item_ops::add_item(&mut target.document, &text);
    target.save()?;
    tracing::info!(index, "added item");
    println!("✓ Added: {}", text);
    Ok(())
}

fn cmd_toggle(cli: &Cli, config: &Config, path: &Path, args: &IndexArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut target = open(cli, config, path)?;
    let index = resolve_index(&target.document, args.index)?;
    let checked = item_ops::toggle_item(&mut target.document, index).map_err(CommandError::from)?;
    target.save()?;
    tracing::info!(index, checked, "toggled item");
    let text = target
        .document
        .item(index)
        .map(|i| i.markdown())
        .unwrap_or_default();
    println!(
        "✓ Toggled: {} {}",
        checkbox(checked, &config.display.check_symbol),
        text
    );
    Ok(())
}

fn cmd_edit(cli: &Cli, config: &Config, path: &Path, args: &EditArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut target = open(cli, config, path)?;
    let index = resolve_index(&target.document, args.index)?;
    let text = args.text.join(" ");
    item_ops::edit_item(&mut target.document, index, &text).map_err(CommandError::from)?;
    target.save()?;
    tracing::info!(index, "edited item");
    println!("✓ Edited: {}", text);
    Ok(())
}

fn cmd_delete(cli: &Cli, config: &Config, path: &Path, args: &IndexArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut target = open(cli, config, path)?;
    let index = resolve_index(&target.document, args.index)?;
    let removed = item_ops::delete_item(&mut target.document, index, &target.options).map_err(CommandError::from)?;
    target.save()?;
    tracing::info!(index, "deleted item");
    println!("✓ Deleted: {}", removed.markdown());
    Ok(())
}

fn cmd_config(cli: &Cli, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let source = match &cli.config {
        Some(path) => Some(path.display().to_string()),
        None => config_io::default_config_path()
            .filter(|p| p.is_file())
            .map(|p| p.display().to_string()),
    };
    println!("{}", format_config(config, source.as_deref())?);
    Ok(())
}
