use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::model::config::ViewOverrides;

pub const DEFAULT_FILE: &str = "todo.md";

#[derive(Parser)]
#[command(name = "tdx", about = concat!("tdx v", env!("CARGO_PKG_VERSION"), " - checklists inside markdown"), version)]
pub struct Cli {
    /// Markdown file to open (default: todo.md)
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Never write changes to disk
    #[arg(short = 'r', long, global = true)]
    pub read_only: bool,

    /// Display markdown headings between items
    #[arg(long, global = true)]
    pub show_headings: bool,

    /// Hide completed items
    #[arg(long, global = true)]
    pub filter_done: bool,

    /// Maximum number of items shown at once (0 = unlimited)
    #[arg(short = 'm', long, value_name = "N", global = true)]
    pub max_visible: Option<u32>,

    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Write logs to this file (the TUI logs nowhere otherwise)
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn file_path(&self) -> PathBuf {
        self.file.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_FILE))
    }

    /// Flags that override frontmatter and config. Absent flags defer.
    pub fn overrides(&self) -> ViewOverrides {
        ViewOverrides {
            filter_done: self.filter_done.then_some(true),
            show_headings: self.show_headings.then_some(true),
            max_visible: self.max_visible,
            read_only: self.read_only.then_some(true),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all items with their 1-based index
    List(ListArgs),
    /// Append a new item
    Add(AddArgs),
    /// Flip an item between open and done
    Toggle(IndexArgs),
    /// Replace an item's text
    Edit(EditArgs),
    /// Delete an item
    Delete(IndexArgs),
    /// Show the effective configuration
    Config,
}

#[derive(Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct AddArgs {
    /// Item text (multiple words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct IndexArgs {
    /// 1-based item index
    pub index: usize,
}

#[derive(Args)]
pub struct EditArgs {
    /// 1-based item index
    pub index: usize,
    /// New text
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_and_command_parse_together() {
        let cli = Cli::try_parse_from(["tdx", "notes.md", "toggle", "2"]).unwrap();
        assert_eq!(cli.file_path(), PathBuf::from("notes.md"));
        assert!(matches!(cli.command, Some(Commands::Toggle(IndexArgs { index: 2 }))));
    }

    #[test]
    fn defaults_to_todo_md_and_tui() {
        let cli = Cli::try_parse_from(["tdx"]).unwrap();
        assert_eq!(cli.file_path(), PathBuf::from("todo.md"));
        assert!(cli.command.is_none());
        assert_eq!(cli.overrides(), ViewOverrides::default());
    }

    #[test]
    fn global_flags_anywhere() {
        let cli = Cli::try_parse_from(["tdx", "list", "--read-only", "-m", "5"]).unwrap();
        let o = cli.overrides();
        assert_eq!(o.read_only, Some(true));
        assert_eq!(o.max_visible, Some(5));
        assert_eq!(o.filter_done, None);
    }

    #[test]
    fn add_joins_words() {
        let cli = Cli::try_parse_from(["tdx", "add", "buy", "milk"]).unwrap();
        match cli.command {
            Some(Commands::Add(args)) => assert_eq!(args.text.join(" "), "buy milk"),
            _ => panic!("expected add"),
        }
    }
}
