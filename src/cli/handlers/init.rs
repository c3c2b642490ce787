use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::config_io::{self, CONFIG_FILE};
use crate::io::storage;

/// Create the data directory and write a commented taskmate.toml.
pub fn cmd_init(args: InitArgs, data_dir: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let dir = storage::resolve_data_dir(data_dir);

    if !config_io::write_config_template(&dir, args.force)? {
        return Err(format!(
            "{} already exists in {} (use --force to overwrite)",
            CONFIG_FILE,
            dir.display()
        )
        .into());
    }

    println!("Initialized taskmate in {}", dir.display());
    println!("  config: {}", dir.join(CONFIG_FILE).display());
    Ok(())
}
