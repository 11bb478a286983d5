use clap::Parser;
use eyre::Result;
use tracing_subscriber::EnvFilter;

use vista_cli::cli::{Cli, Command};
use vista_cli::{commands, config};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // Logs go to stderr so command output stays pipeable.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if cli.log_json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let config_path = match cli.config {
        Some(path) => path,
        None => config::config_path()?,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Config(cmd) => commands::run_config(&config_path, cmd, &mut out),
        command => {
            let mut app = commands::open_app(&config_path)?;
            commands::run(&mut app, command, &mut out)
        }
    }
}
