mod config;

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

use dermascan_api::ApiClient;
use dermascan_tui::SessionStore;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Terminal client for the dermascan skincare marketplace"
)]
struct Cli {
    /// Path to the config file (defaults to ~/.dermascan/config.toml).
    #[arg(long, env = "DERMASCAN_CONFIG")]
    config: Option<PathBuf>,

    /// Skip the startup splash screen.
    #[arg(long)]
    skip_splash: bool,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Clear the stored seller session.
    Logout,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging();

    if let Some(CliCommand::Logout) = cli.command {
        SessionStore::new().clear();
        println!("Logged out.");
        return Ok(());
    }

    let store = match cli.config {
        Some(path) => config::ConfigStore::new(path),
        None => config::ConfigStore::new_default()?,
    };
    let endpoints = store.endpoints()?;
    let skip_splash = cli.skip_splash || store.skip_splash()?;

    let client = ApiClient::new(endpoints)?;
    dermascan_tui::run(client, SessionStore::new(), skip_splash).await
}

/// Route tracing to `~/.dermascan/dermascan.log` when `DERMASCAN_LOG` is
/// set (e.g. `DERMASCAN_LOG=debug`). The terminal itself belongs to the TUI,
/// so logs never go to stdout/stderr.
fn init_logging() {
    let Ok(filter) = std::env::var("DERMASCAN_LOG") else {
        return;
    };
    let Some(home) = dirs::home_dir() else {
        return;
    };
    let dir = home.join(".dermascan");
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = std::fs::File::create(dir.join("dermascan.log")) else {
        return;
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::sync::Arc::new(file))
        .with_ansi(false)
        .try_init();
}
