//! Command-line access to the theme core
//!
//! Documents are read from a file or `-` for stdin and written to stdout as
//! pretty JSON. Logs go to stderr.

#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{Level as TraceLevel, info};
use tracing_subscriber::FmtSubscriber;

use storefront_theme::fonts::{list_fonts, stylesheet_url};
use storefront_theme::{
    CatalogItem, EditorState, JsonFileStore, Node, Settings, StaticIdentity, ThemeDocument,
    hydrate, migrate, resolve_fonts, sanitize, save, set_at_path,
};

/// Inspect and edit storefront theme documents
#[derive(Parser, Debug)]
#[command(name = "storefront-theme")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a default document
    Defaults {
        /// Legacy shape instead of current
        #[arg(long)]
        legacy: bool,
    },
    /// Write a value at a dotted path
    Set {
        /// Document file, or `-` for stdin
        input: PathBuf,
        /// Dotted path, e.g. `profile.bioStyle.color`
        path: String,
        /// JSON value; anything that does not parse is taken as a string
        value: String,
    },
    /// Scrub a document the way a save does
    Sanitize { input: PathBuf },
    /// Font families a document and catalog need; lists the picker fonts
    /// when no document is given
    Fonts {
        input: Option<PathBuf>,
        /// Catalog items as a JSON array
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,
        /// Print stylesheet URLs instead of names
        #[arg(long)]
        urls: bool,
    },
    /// Bring a document to the current shape
    Migrate {
        input: PathBuf,
        /// Also fill missing blocks from defaults
        #[arg(long)]
        hydrate: bool,
    },
    /// Sanitize and persist a document to the file store
    Save {
        input: PathBuf,
        #[arg(long)]
        user: String,
        /// Store directory (defaults to the one in settings)
        #[arg(long, value_name = "DIR")]
        store: Option<PathBuf>,
    },
}

fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read document from stdin")?;
        return Ok(text);
    }
    fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))
}

fn read_document(input: &Path) -> Result<Node> {
    Node::from_json_str(&read_input(input)?)
        .with_context(|| format!("Invalid document in {}", input.display()))
}

fn print_document(document: &Node) -> Result<()> {
    println!("{}", document.to_json_string_pretty()?);
    Ok(())
}

fn parse_value(raw: &str) -> Node {
    Node::from_json_str(raw).unwrap_or_else(|_| Node::from(raw))
}

fn init_logging(settings: &Settings) -> Result<()> {
    // LOG_LEVEL wins over the settings file
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.log_level.clone());
    let log_level = match level.to_lowercase().as_str() {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    init_logging(&settings)?;

    match cli.command {
        Command::Defaults { legacy } => {
            let doc = if legacy {
                ThemeDocument::default_legacy()
            } else {
                ThemeDocument::default_current()
            };
            print_document(&doc.to_tree())
        }
        Command::Set { input, path, value } => {
            let doc = read_document(&input)?;
            print_document(&set_at_path(&doc, &path, parse_value(&value)))
        }
        Command::Sanitize { input } => {
            let result = sanitize(&read_document(&input)?);
            info!(display_name = ?result.display_name, "Sanitized document");
            print_document(&result.document)
        }
        Command::Fonts { input, catalog, urls } => {
            let families: Vec<String> = match input {
                None => list_fonts().into_iter().map(str::to_string).collect(),
                Some(input) => {
                    let document = ThemeDocument::from_tree(&read_document(&input)?);
                    let items: Vec<CatalogItem> = match catalog {
                        Some(path) => serde_json::from_str(&read_input(&path)?)
                            .with_context(|| format!("Invalid catalog in {}", path.display()))?,
                        None => Vec::new(),
                    };
                    resolve_fonts(&document, &items).into_iter().collect()
                }
            };
            for family in families {
                if urls {
                    println!("{}", stylesheet_url(&family, &settings.fonts));
                } else {
                    println!("{family}");
                }
            }
            Ok(())
        }
        Command::Migrate { input, hydrate: fill } => {
            let doc = read_document(&input)?;
            print_document(&if fill { hydrate(&doc) } else { migrate(&doc) })
        }
        Command::Save { input, user, store } => {
            let store = JsonFileStore::new(store.unwrap_or_else(|| settings.store_dir.clone()));
            let identity = StaticIdentity::signed_in(user);
            let editor = RefCell::new(EditorState::new(read_document(&input)?));

            let receipt = save(&editor, &identity, &store).await?;
            info!(
                user = %receipt.user_id,
                store = %store.dir().display(),
                display_name = ?receipt.display_name,
                "Theme saved"
            );
            Ok(())
        }
    }
}
