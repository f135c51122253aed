use anyhow::{bail, Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use command::{
    BooksOutput, BooksPayload, ChaptersOutput, ChaptersPayload, ClearOutput, CommandAction,
    CommandContext, CommandHandler, CommandRequest, CommandResponse, HintKind, LookupOutput,
    LookupPayload, SearchOutput, SearchPayload, VersionsOutput,
};
use config::AppConfig;
use flags::SearchModeFlag;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

mod command;
mod config;
mod flags;

#[derive(Parser)]
#[command(name = "bible")]
#[command(about = "Scripture reference lookup, keyword search and display hand-off", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (TOML); defaults to BIBLE_CONFIG or the user config dir
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding <version>.json scripture files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Directory holding the book and version name tables
    #[arg(long, global = true)]
    names_dir: Option<PathBuf>,

    /// Display language for names and messages (ko, en)
    #[arg(long, global = true)]
    lang: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a reference such as "John 3:16-18"
    Lookup(LookupArgs),

    /// Search one version for keywords
    Search(SearchArgs),

    /// List books shared by every selected version
    Books(BooksArgs),

    /// Show how many chapters a book has
    Chapters(ChaptersArgs),

    /// List installed versions
    Versions(JsonArgs),

    /// Clear the display output file
    Clear(JsonArgs),

    /// Execute a JSON Command API request
    Command(CommandArgs),
}

#[derive(Args)]
struct LookupArgs {
    /// Reference text, e.g. `요 3:16` or `1 Jn 4:7-8`
    #[arg(required = true, num_args = 1..)]
    reference: Vec<String>,

    /// Version to show (repeat for parallel versions)
    #[arg(short = 'b', long = "bible")]
    versions: Vec<String>,

    /// Publish the rendered block to the output file
    #[arg(long)]
    save: bool,

    /// Output the JSON response
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SearchArgs {
    /// Keywords to search for
    #[arg(required = true, num_args = 1..)]
    keywords: Vec<String>,

    /// Version to search
    #[arg(short = 'b', long = "bible")]
    version: String,

    /// Matching mode
    #[arg(long, value_enum, default_value = "and")]
    mode: SearchModeFlag,

    /// Maximum number of verses to print
    #[arg(long)]
    limit: Option<usize>,

    /// Output the JSON response
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct BooksArgs {
    /// Versions to intersect
    #[arg(short = 'b', long = "bible", required = true)]
    versions: Vec<String>,

    /// Output the JSON response
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ChaptersArgs {
    /// Book name or alias
    #[arg(required = true, num_args = 1..)]
    book: Vec<String>,

    /// Version to inspect
    #[arg(short = 'b', long = "bible")]
    version: String,

    /// Output the JSON response
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct JsonArgs {
    /// Output the JSON response
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct CommandArgs {
    /// Inline JSON request (mutually exclusive with --file)
    #[arg(long, conflicts_with = "file")]
    json: Option<String>,

    /// Path to file containing the JSON request
    #[arg(long)]
    file: Option<PathBuf>,

    /// Pretty-print JSON response
    #[arg(long)]
    pretty: bool,
}

impl Cli {
    /// JSON replies own stdout, so they also keep stderr down to warnings.
    fn log_level(&self) -> Option<log::LevelFilter> {
        let json_reply = match &self.command {
            Commands::Command(_) => true,
            Commands::Lookup(args) => args.json,
            Commands::Search(args) => args.json,
            Commands::Books(args) => args.json,
            Commands::Chapters(args) => args.json,
            Commands::Versions(args) | Commands::Clear(args) => args.json,
        };
        if self.quiet || json_reply {
            Some(log::LevelFilter::Warn)
        } else if self.verbose {
            Some(log::LevelFilter::Debug)
        } else {
            None
        }
    }
}

fn init_logging(level: Option<log::LevelFilter>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    let config = load_config(&cli)?;
    let handler = CommandHandler::new(CommandContext::open(config)?);

    match cli.command {
        Commands::Lookup(args) => run_lookup(&handler, args)?,
        Commands::Search(args) => run_search(&handler, args)?,
        Commands::Books(args) => run_books(&handler, args)?,
        Commands::Chapters(args) => run_chapters(&handler, args)?,
        Commands::Versions(args) => run_versions(&handler, args)?,
        Commands::Clear(args) => run_clear(&handler, args)?,
        Commands::Command(args) => run_command(&handler, args)?,
    }

    Ok(())
}

/// File, then `BIBLE_*` environment, then flags.
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_env(|key| std::env::var(key).ok());
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(dir) = &cli.names_dir {
        config.names_dir = dir.clone();
    }
    if let Some(lang) = &cli.lang {
        config.language = lang.clone();
    }
    Ok(config)
}

fn execute<P: Serialize>(
    handler: &CommandHandler,
    action: CommandAction,
    payload: P,
) -> Result<CommandResponse> {
    let request = CommandRequest {
        action,
        payload: serde_json::to_value(payload)?,
    };
    Ok(handler.execute(request))
}

fn decode<T: DeserializeOwned>(response: &CommandResponse) -> Option<T> {
    if response.data.is_null() {
        return None;
    }
    match serde_json::from_value(response.data.clone()) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("Unexpected response data: {err}");
            None
        }
    }
}

/// Print the JSON response, or the error for human output; exits 1 on error.
fn finish(response: &CommandResponse, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
    } else if response.is_error() {
        eprintln!(
            "Error: {}",
            response.message.as_deref().unwrap_or("Unknown error")
        );
        for hint in response.hints_of(HintKind::Action) {
            eprintln!("Hint: {hint}");
        }
    }
    if response.is_error() {
        std::process::exit(1);
    }
    Ok(())
}

fn run_lookup(handler: &CommandHandler, args: LookupArgs) -> Result<()> {
    let payload = LookupPayload {
        versions: args.versions,
        reference: Some(args.reference.join(" ")),
        save: args.save,
        ..LookupPayload::default()
    };
    let response = execute(handler, CommandAction::Lookup, payload)?;

    if !args.json {
        // Rendering succeeded even when only the save failed.
        if let Some(out) = decode::<LookupOutput>(&response) {
            for warning in response.hints_of(HintKind::Warn) {
                println!("[warning] {warning}");
            }
            println!("{}", out.text);
            if let Some(saved) = &out.saved {
                if saved.changed {
                    log::info!("Saved to {}", saved.path);
                } else {
                    log::info!("{} already up to date", saved.path);
                }
            }
        }
    }
    finish(&response, args.json)
}

fn run_search(handler: &CommandHandler, args: SearchArgs) -> Result<()> {
    let payload = SearchPayload {
        version: args.version,
        query: args.keywords.join(" "),
        mode: args.mode.as_domain(),
        limit: args.limit,
    };
    let response = execute(handler, CommandAction::Search, payload)?;

    if !args.json {
        if let Some(out) = decode::<SearchOutput>(&response) {
            for item in &out.hits {
                println!(
                    "[{} {}:{}] {}",
                    item.book_name, item.hit.chapter, item.hit.verse, item.hit.text
                );
            }
            if !out.hits.is_empty() {
                println!();
            }
            for count in &out.counts {
                println!("{}: {}", count.keyword, count.count);
            }
            println!("Total: {}", out.total);
            if out.truncated {
                log::info!("Showing {} of {} matches", out.hits.len(), out.total);
            }
        }
    }
    finish(&response, args.json)
}

fn run_books(handler: &CommandHandler, args: BooksArgs) -> Result<()> {
    let payload = BooksPayload {
        versions: args.versions,
    };
    let response = execute(handler, CommandAction::Books, payload)?;
    if !args.json {
        if let Some(out) = decode::<BooksOutput>(&response) {
            for book in &out.books {
                println!("{}\t{}", book.id, book.name);
            }
        }
    }
    finish(&response, args.json)
}

fn run_chapters(handler: &CommandHandler, args: ChaptersArgs) -> Result<()> {
    let payload = ChaptersPayload {
        version: args.version,
        book: args.book.join(" "),
    };
    let response = execute(handler, CommandAction::Chapters, payload)?;
    if !args.json {
        if let Some(out) = decode::<ChaptersOutput>(&response) {
            println!("{}", out.chapters);
        }
    }
    finish(&response, args.json)
}

fn run_versions(handler: &CommandHandler, args: JsonArgs) -> Result<()> {
    let response = execute(handler, CommandAction::Versions, serde_json::json!({}))?;
    if !args.json {
        if let Some(out) = decode::<VersionsOutput>(&response) {
            for version in &out.versions {
                match &version.token {
                    Some(token) => println!("{}\t{}\t{}", version.id, version.label, token),
                    None => println!("{}\t{}", version.id, version.label),
                }
            }
        }
    }
    finish(&response, args.json)
}

fn run_clear(handler: &CommandHandler, args: JsonArgs) -> Result<()> {
    let response = execute(handler, CommandAction::Clear, serde_json::json!({}))?;
    if !args.json {
        if let Some(out) = decode::<ClearOutput>(&response) {
            log::info!("Cleared {}", out.saved.path);
        }
    }
    finish(&response, args.json)
}

fn run_command(handler: &CommandHandler, args: CommandArgs) -> Result<()> {
    let response = handler.execute(read_request(&args)?);
    let output = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{output}");
    if response.is_error() {
        std::process::exit(1);
    }
    Ok(())
}

/// Inline `--json`, then `--file`, then stdin.
fn read_request(args: &CommandArgs) -> Result<CommandRequest> {
    let raw = match (&args.json, &args.file) {
        (Some(raw), _) => raw.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file {}", path.display()))?,
        (None, None) => {
            let mut raw = String::new();
            io::stdin()
                .lock()
                .read_to_string(&mut raw)
                .context("Failed to read the request from stdin")?;
            raw
        }
    };
    if raw.trim().is_empty() {
        bail!("Empty command request; pass --json, --file or a request on stdin");
    }
    serde_json::from_str(&raw).context("Command request is not valid JSON")
}
