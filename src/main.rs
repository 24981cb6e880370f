mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use envreload::config::{Overrides, ReloadConfig};

#[derive(Parser)]
#[command(name = "envreload", version)]
#[command(about = "Force an environment manager to rebuild its cached environment")]
#[command(
    long_about = "envreload runs the environment manager (direnv by default) with its \
    force-reload variable set, then touches the marker file and copies its timestamps \
    onto the cache files so the rebuilt cache is treated as current. \
    With no command it performs the reload."
)]
struct Args {
    /// Project directory (default: from config, else the current directory)
    #[arg(long, short = 'd', global = true, env = "ENVRELOAD_DIR")]
    dir: Option<PathBuf>,

    /// Environment manager command (e.g. "direnv" or "nix run nixpkgs#direnv --")
    #[arg(long, global = true, env = "ENVRELOAD_TOOL")]
    tool: Option<String>,

    /// Config file (default: ~/.config/envreload/config if present)
    #[arg(long, global = true, env = "ENVRELOAD_CONFIG")]
    config: Option<PathBuf>,

    /// Show what a reload would do without running anything
    #[arg(long, short = 'n', global = true)]
    dry_run: bool,

    /// Increase log output (-v info, -vv debug)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Force a rebuild and mark the cache current (default)
    Reload,

    /// Check whether the cache files match the marker's timestamp
    Status,

    /// Print the effective configuration in config file format
    ShowConfig,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let overrides = Overrides {
        project_dir: args.dir,
        tool: args.tool,
        config_path: args.config,
    };
    let config = match ReloadConfig::resolve(&overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("envreload: {}", e);
            std::process::exit(1);
        }
    };
    log::debug!("Resolved config: {:?}", config);

    match args.command.unwrap_or(Command::Reload) {
        Command::Reload => {
            commands::reload(config, args.dry_run).await?;
        }
        Command::Status => {
            commands::status(&config)?;
        }
        Command::ShowConfig => {
            commands::show_config(&config)?;
        }
    }

    Ok(())
}
