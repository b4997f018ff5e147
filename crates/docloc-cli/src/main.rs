use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use docloc_config::DocLocConfig;
use docloc_services::Project;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

mod commands;
mod ui;

#[derive(Parser)]
#[command(
    name = "docloc",
    version,
    about = "Gettext-based localization for Markdown documentation"
)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file to load before ./docloc.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract source blocks into the template catalog
    Extract {
        /// Documentation root holding src/ and translations/
        #[arg(short, long)]
        root: Option<PathBuf>,
    },

    /// Synchronize every locale catalog with the template
    Update {
        #[arg(short, long)]
        root: Option<PathBuf>,
    },

    /// Regenerate documents for locales above the completion cutoff
    Generate {
        #[arg(short, long)]
        root: Option<PathBuf>,
        /// Minimum share of translated entries (0.0 - 1.0)
        #[arg(long)]
        cutoff: Option<f64>,
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Validate locale catalogs (placeholders, plural forms)
    Check {
        #[arg(short, long)]
        root: Option<PathBuf>,
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Dump JSON schemas of the report types
    Schema {
        #[arg(long, default_value = "schemas")]
        out_dir: PathBuf,
    },
}

/// Process-wide settings shared by every command.
pub(crate) struct Context {
    pub use_color: bool,
    pub config: DocLocConfig,
}

impl Context {
    fn project(&self, root: Option<PathBuf>) -> Project {
        Project::from_config(root.as_deref(), &self.config)
    }
}

trait Runnable {
    /// Returns `false` when the command completed but must exit non-zero.
    fn run(self, ctx: &Context) -> Result<bool>;
}

impl Runnable for Commands {
    fn run(self, ctx: &Context) -> Result<bool> {
        let cmd_name = format!("{:?}", self);
        info!(event = "command_start", command = %cmd_name);

        let result = match self {
            Commands::Extract { root } => commands::extract::run_extract(&ctx.project(root)),
            Commands::Update { root } => commands::update::run_update(&ctx.project(root)),
            Commands::Generate {
                root,
                cutoff,
                format,
            } => commands::generate::run_generate(&ctx.project(root), cutoff, &format, ctx.use_color),
            Commands::Check { root, format } => {
                commands::check::run_check(&ctx.project(root), &format, ctx.use_color)
            }
            Commands::Schema { out_dir } => commands::schema::run_schema(out_dir),
        };

        match &result {
            Ok(ok) => info!(event = "command_finish", command = %cmd_name, ok = *ok),
            Err(e) => error!(event = "command_failed", command = %cmd_name, error = ?e),
        }
        result
    }
}

fn init_tracing(quiet: bool, ansi: bool) -> Option<WorkerGuard> {
    let default_level = if quiet { "warn" } else { "info" };
    let console_layer = fmt::layer()
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        );

    let (file_layer, guard) = match std::env::var_os("DOCLOC_LOG_DIR") {
        Some(dir) => {
            let (file_writer, guard) = tracing_appender::non_blocking(rolling::daily(dir, "docloc.log"));
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(file_writer)
                .with_filter(EnvFilter::new("debug"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
    guard
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let colors_allowed = !cli.no_color && std::env::var_os("NO_COLOR").is_none();
    let guard = init_tracing(cli.quiet, colors_allowed && std::io::stderr().is_terminal());
    let use_color = colors_allowed && std::io::stdout().is_terminal();

    let config = docloc_config::load_config(cli.config.as_deref())?;
    debug!(event = "config_loaded", root = ?config.root);
    let ctx = Context { use_color, config };

    let ok = cli.cmd.run(&ctx)?;
    if !ok {
        drop(guard);
        std::process::exit(1);
    }
    Ok(())
}
