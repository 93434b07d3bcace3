// SimpleLogs - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading
// 3. Logging initialisation (debug mode support)
// 4. Opening the stored collection and dispatching the subcommand

use clap::{Parser, Subcommand};
use simplelogs::app::commands;
use simplelogs::app::repository::LogRepository;
use simplelogs::app::store::FileStore;
use simplelogs::core::export::ExportFormat;
use simplelogs::core::filter::FilterConfig;
use simplelogs::core::model::Level;
use simplelogs::core::timeline::Granularity;
use simplelogs::platform::config::{self, PlatformPaths};
use simplelogs::util::{self, error::Result};
use std::io::{self, Read};
use std::path::PathBuf;

/// SimpleLogs - record, search and export short log messages.
///
/// Entries are kept in a local key-value slot and survive between runs.
#[derive(Parser, Debug)]
#[command(name = "simplelogs", version, about)]
struct Cli {
    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    /// Directory holding the stored collection (overrides config and platform default).
    #[arg(long = "data-dir", global = true)]
    data_dir: Option<PathBuf>,

    /// Path to config.toml (defaults to the platform config directory).
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,

    /// Storage slot name.
    #[arg(short = 'k', long = "key", global = true)]
    key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

/// Filters shared by `list`, `export` and `copy`.
#[derive(clap::Args, Debug, Default)]
struct FilterArgs {
    /// Case-insensitive text search over message, tag, level and timestamp.
    #[arg(short = 's', long = "search", default_value = "")]
    search: String,

    /// Only entries of this level (debug, info, warn, error).
    #[arg(short = 'l', long = "level", value_parser = parse_level)]
    level: Option<Level>,

    /// Only entries whose tag contains this text.
    #[arg(short = 't', long = "tag", default_value = "")]
    tag: String,

    /// Only pinned entries.
    #[arg(short = 'p', long = "pinned")]
    pinned: bool,
}

impl FilterArgs {
    fn to_filter(&self) -> FilterConfig {
        FilterConfig {
            search_text: self.search.clone(),
            level: self.level,
            tag: self.tag.clone(),
            pinned_only: self.pinned,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a log entry.
    Add {
        /// Message text.
        message: Vec<String>,

        /// Level; unrecognised values are recorded as info.
        #[arg(short = 'l', long = "level", default_value = "info")]
        level: String,

        /// Optional free-text tag.
        #[arg(short = 't', long = "tag", default_value = "")]
        tag: String,
    },

    /// Import a text file, a JSON export, or stdin ("-").
    Import {
        /// File to import, or "-" to read pasted text from stdin.
        source: PathBuf,
    },

    /// List entries, newest first.
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Show at most this many entries.
        #[arg(short = 'n', long = "limit")]
        limit: Option<usize>,
    },

    /// Toggle the pinned flag of an entry.
    Pin {
        /// Entry id (or a unique prefix of it).
        id: String,
    },

    /// Delete entries.
    Rm {
        /// Entry ids (or unique prefixes).
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Delete every entry.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Totals by level and the most frequent tags.
    Stats,

    /// Entry counts per minute or hour.
    Timeline {
        /// Bucket width: minute or hour (defaults to the configured value).
        #[arg(short = 'g', long = "granularity")]
        granularity: Option<Granularity>,
    },

    /// Export entries (oldest first) to CSV, HTML or JSON.
    Export {
        /// Output format: csv, html or json.
        #[arg(short = 'f', long = "format", default_value = "csv")]
        format: ExportFormat,

        /// Output file (defaults to simplelogs-<timestamp>.<ext>).
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Print the filtered entries as clipboard text.
    Copy {
        #[command(flatten)]
        filter: FilterArgs,
    },
}

fn parse_level(raw: &str) -> std::result::Result<Level, String> {
    Level::parse(raw).ok_or_else(|| format!("unknown level '{raw}' (expected debug, info, warn or error)"))
}

fn main() {
    let cli = Cli::parse();

    // Config comes first: it selects the log level and file.
    let platform_paths = PlatformPaths::resolve();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| config::config_path(&platform_paths.config_dir));
    let (app_config, config_warnings) = config::load_config(&config_path);

    util::logging::init(
        cli.debug,
        app_config.log_level.as_deref(),
        app_config.log_file.as_deref(),
    );

    for warning in &config_warnings {
        tracing::warn!(config = %config_path.display(), "{warning}");
    }

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "SimpleLogs starting"
    );

    // Data directory: CLI override > config > platform default
    let data_dir = cli
        .data_dir
        .clone()
        .or_else(|| app_config.data_dir.clone())
        .unwrap_or_else(|| platform_paths.data_dir.clone());
    let key = cli.key.as_deref().unwrap_or(&app_config.storage_key);

    let store = FileStore::new(&data_dir, key);
    tracing::debug!(
        path = %store.path().display(),
        key = store.key(),
        "Opening storage slot"
    );
    let mut repo = LogRepository::open(store);

    if let Err(e) = run(cli.command, &mut repo, &app_config) {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(
    command: Command,
    repo: &mut LogRepository<FileStore>,
    app_config: &config::AppConfig,
) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::Add {
            message,
            level,
            tag,
        } => {
            let level = Level::parse_lossy(&level);
            commands::handle_add(repo, level, &tag, &message.join(" "), &mut out)
        }
        Command::Import { source } => {
            if source.as_os_str() == "-" {
                let mut text = String::new();
                io::stdin()
                    .read_to_string(&mut text)
                    .map_err(|source| util::error::SimpleLogsError::Io {
                        path: PathBuf::from("<stdin>"),
                        operation: "read import text",
                        source,
                    })?;
                commands::handle_import_text(repo, &text, &mut out)
            } else {
                commands::handle_import_file(repo, &source, app_config.max_import_file_size, &mut out)
            }
        }
        Command::List { filter, limit } => {
            commands::handle_list(repo, &filter.to_filter(), limit, &mut out)
        }
        Command::Pin { id } => commands::handle_pin(repo, &id, &mut out),
        Command::Rm { ids } => commands::handle_remove(repo, &ids, &mut out),
        Command::Clear { yes } => {
            let stdin = io::stdin();
            commands::handle_clear(repo, yes, &mut stdin.lock(), &mut out)
        }
        Command::Stats => commands::handle_stats(repo, &mut out),
        Command::Timeline { granularity } => {
            let granularity = granularity.unwrap_or(app_config.timeline_granularity);
            commands::handle_timeline(repo, granularity, &mut out)
        }
        Command::Export {
            format,
            output,
            filter,
        } => commands::handle_export(
            repo,
            format,
            &filter.to_filter(),
            output.as_deref(),
            chrono::Utc::now(),
            &mut out,
        )
        .map(|_| ()),
        Command::Copy { filter } => {
            commands::handle_copy(repo, &filter.to_filter(), &mut out, &mut io::stderr())
        }
    }
}
