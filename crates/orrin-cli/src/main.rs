use clap::{ArgAction, Parser, Subcommand};
use commands::{catalog, clear, config, lists, show, spin, stats, status};
use orrin_config::{Config, PathManager};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "orrin")]
#[command(about = "Orrin - Track what you want to watch, are watching, and have watched")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Move titles between the status buckets
    #[command(long_about = "Set or clear the watch status of a catalog title. A title sits in at most one of Want to Watch, Currently Watching, Watched and Did Not Finish per category; setting a new status moves it out of the old one.")]
    Status {
        #[command(subcommand)]
        cmd: StatusCommands,
    },
    /// Manage custom lists
    #[command(long_about = "Create, rename and delete custom lists, and add or remove titles. Each category holds at most 12 custom lists.")]
    List {
        #[command(subcommand)]
        cmd: ListCommands,
    },
    /// Show the lists of a category
    #[command(long_about = "Without options, show an overview of the status buckets and custom lists of a category with their counts. With --status or --list, show the titles in that one list.")]
    Show {
        /// Category (films, shows, anime, documentaries)
        category: String,

        /// Show the titles in one status bucket
        #[arg(long, conflicts_with = "list")]
        status: Option<String>,

        /// Show the titles in one custom list
        #[arg(long)]
        list: Option<String>,
    },
    /// List titles in the media catalog
    Catalog {
        /// Only titles of this category
        #[arg(long)]
        category: Option<String>,
    },
    /// Spin the wheel for something to watch
    #[command(long_about = "Pick a random category, then a random genre of that category, then a random title matching both. Pass --category or --genre to fix a stage.")]
    Spin {
        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        genre: Option<String>,
    },
    /// Show watch statistics
    Stats,
    /// Delete all saved list state
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// View or create the configuration file
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum StatusCommands {
    /// Put a title in a status bucket
    Set {
        /// Catalog id of the title
        media_id: String,

        /// Want to Watch, Currently Watching, Watched or Did Not Finish
        status: String,

        /// Category to file the title under (defaults to the title's type)
        #[arg(long)]
        category: Option<String>,
    },
    /// Take a title out of a status bucket
    Clear {
        media_id: String,
        status: String,
        #[arg(long)]
        category: Option<String>,
    },
}

#[derive(Subcommand)]
enum ListCommands {
    /// Create an empty custom list
    Create {
        category: String,

        /// List name (defaults to "Custom List N")
        name: Option<String>,
    },
    /// Rename a custom list
    Rename {
        category: String,
        old_name: String,
        new_name: String,
    },
    /// Delete a custom list and its membership
    Delete {
        category: String,
        name: String,

        /// Skip the confirmation prompt
        #[arg(long, action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// Add a catalog title to a custom list
    Add {
        category: String,
        name: String,
        media_id: String,
    },
    /// Remove a title from a custom list
    Remove {
        category: String,
        name: String,
        media_id: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write a default configuration file and create the data directories
    Init {
        /// Overwrite an existing configuration file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // The log file comes from config; a broken config is reported by the command itself
    let log_file = Config::load_or_default(&PathManager::default().config_file())
        .ok()
        .and_then(|config| config.logging.file);
    logging::init_logging_with_file(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Status { cmd } => status::run_status(cmd, &output).await,
        Commands::List { cmd } => lists::run_list(cmd, &output).await,
        Commands::Show { category, status, list } => show::run_show(&category, status, list, &output),
        Commands::Catalog { category } => catalog::run_catalog(category, &output),
        Commands::Spin { category, genre } => spin::run_spin(category, genre, &output),
        Commands::Stats => stats::run_stats(&output),
        Commands::Clear { yes } => clear::run_clear(yes, &output),
        Commands::Config { cmd } => config::run_config(cmd, &output),
    }
}
