use clap::{Parser, Subcommand};
use mellow_core::SessionFlags;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "mellow", version, about = "Mellow focus journal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Journal entries and the autosave editor
    Journal {
        #[command(subcommand)]
        action: commands::journal::JournalAction,
    },
    /// Timed focus sessions
    Focus {
        #[command(subcommand)]
        action: commands::focus::FocusAction,
    },
    /// Timed recall sessions
    Recall {
        #[command(subcommand)]
        action: commands::recall::RecallAction,
    },
    /// Guided breathing
    Breathe(commands::breathe::BreatheArgs),
    /// Journal statistics and insights
    Stats(commands::stats::StatsArgs),
    /// Export entries as markdown
    Export(commands::export::ExportArgs),
    /// Visual mode preference
    Mode {
        #[command(subcommand)]
        action: commands::mode::ModeAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("MELLOW_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Printed once per machine session.
fn intro() {
    let flags = SessionFlags::temp();
    if flags.intro_shown() {
        return;
    }
    eprintln!("mellow :: neural core online");
    flags.mark_intro_shown();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    intro();

    let result = match cli.command {
        Commands::Journal { action } => commands::journal::run(action).await,
        Commands::Focus { action } => commands::focus::run(action),
        Commands::Recall { action } => commands::recall::run(action),
        Commands::Breathe(args) => commands::breathe::run(args).await,
        Commands::Stats(args) => commands::stats::run(args),
        Commands::Export(args) => commands::export::run(args),
        Commands::Mode { action } => commands::mode::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
