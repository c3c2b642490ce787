use std::fs::OpenOptions;
use std::path::Path;

use clap::Parser;
use taskmate::cli::commands::{Cli, Commands};
use taskmate::cli::handlers;
use taskmate::io::storage::resolve_data_dir;

const LOG_ENV: &str = "TASKMATE_LOG";
const LOG_FILE: &str = "taskmate.log";

/// Log to stderr for CLI commands. The TUI owns the terminal, so there the
/// log goes to a file in the data directory instead.
fn init_logging(tui_data_dir: Option<&Path>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().filter_or(LOG_ENV, "warn"));
    if let Some(dir) = tui_data_dir {
        let file = std::fs::create_dir_all(dir).and_then(|()| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join(LOG_FILE))
        });
        match file {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            // Nowhere safe to write; stay quiet rather than corrupt the screen
            Err(_) => {
                builder.filter_level(log::LevelFilter::Off);
            }
        }
    }
    builder.init();
}

fn main() {
    let cli = Cli::parse();
    let data_dir = cli.data_dir.clone();

    match cli.command {
        None => {
            // No subcommand → launch TUI
            let dir = resolve_data_dir(data_dir.as_deref().map(Path::new));
            init_logging(Some(&dir));
            if let Err(e) = taskmate::tui::run(&dir) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Init(args)) => {
            init_logging(None);
            if let Err(e) = handlers::cmd_init(args, data_dir.as_deref().map(Path::new)) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            init_logging(None);
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
