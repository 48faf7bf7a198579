use anyhow::Result;
use browser_history_browser::{Aggregator, Registry};
use browser_history_cli::commands;
use browser_history_core::config::{
    Config, DEFAULT_HISTORY_DAYS, DEFAULT_PORT, OutputFormat, parse_browser_list, parse_timestamp,
};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "browser-history")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Read local web browser history from Chromium-family browsers and Firefox",
    long_about = "browser-history copies each profile's history database to a temporary \
                  snapshot, reads the visits inside a time window, and prints them as text \
                  or JSON. It can also serve the same data over a local HTTP API."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging and extraction diagnostics
    #[arg(long, global = true, env = "BROWSER_HISTORY_DEBUG")]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print browser history
    History {
        /// Number of days of history to read
        #[arg(
            short,
            long,
            env = "BROWSER_HISTORY_DAYS",
            default_value_t = DEFAULT_HISTORY_DAYS,
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        days: u32,

        /// Browsers to read, comma separated (default: all)
        #[arg(short, long, env = "BROWSER_HISTORY_BROWSERS", value_name = "LIST")]
        browser: Option<String>,

        /// Start of an explicit time range (RFC 3339)
        #[arg(long, requires = "end", value_parser = parse_time)]
        start: Option<chrono::DateTime<chrono::Utc>>,

        /// End of an explicit time range (RFC 3339)
        #[arg(long, requires = "start", value_parser = parse_time)]
        end: Option<chrono::DateTime<chrono::Utc>>,

        /// Output JSON instead of text
        #[arg(short, long)]
        json: bool,

        /// Indent JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Serve history over HTTP at /history
    Serve {
        /// Port to listen on (127.0.0.1 only)
        #[arg(short, long, env = "BROWSER_HISTORY_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Default browsers when a request does not name any
        #[arg(short, long, env = "BROWSER_HISTORY_BROWSERS", value_name = "LIST")]
        browser: Option<String>,
    },

    /// List registered browsers and their profiles
    Browsers,

    /// Generate shell completion scripts
    #[command(after_help = "SUPPORTED SHELLS:\n  \
        bash, zsh, fish, powershell, elvish\n\n\
        INSTALLATION:\n  \
        bash: browser-history completion --shell bash >> ~/.bashrc\n  \
        zsh:  browser-history completion --shell zsh > ~/.zfunc/_browser-history\n  \
        fish: browser-history completion --shell fish \
        > ~/.config/fish/completions/browser-history.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(short, long, value_enum)]
        shell: Shell,
    },
}

fn parse_time(value: &str) -> std::result::Result<chrono::DateTime<chrono::Utc>, String> {
    parse_timestamp(value).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.debug);

    let config = Config {
        debug: cli.debug,
        ..Config::default()
    };

    match cli.command {
        Commands::History {
            days,
            browser,
            start,
            end,
            json,
            pretty,
        } => {
            let config = Config {
                history_days: days,
                browsers: browser.as_deref().map(parse_browser_list).unwrap_or_default(),
                output: if json {
                    OutputFormat::Json
                } else {
                    OutputFormat::Text
                },
                pretty,
                start,
                end,
                ..config
            };
            commands::history::execute(&Aggregator::new(Registry::installed()), &config)
        }
        Commands::Serve { port, browser } => {
            let config = Config {
                port,
                browsers: browser.as_deref().map(parse_browser_list).unwrap_or_default(),
                ..config
            };
            commands::serve::execute(Aggregator::new(Registry::installed()), config)
        }
        Commands::Browsers => commands::browsers::list(&Registry::installed()),
        Commands::Completion { shell } => commands::completion::execute(shell, &mut Cli::command()),
    }
}

fn init_logging(debug: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if debug { "debug" } else { "info" };
    let directives = [
        "browser_history",
        "browser_history_cli",
        "browser_history_core",
        "browser_history_browser",
        "browser_history_server",
    ]
    .iter()
    .map(|target| format!("{}={}", target, level))
    .collect::<Vec<_>>()
    .join(",");

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directives))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
