//! `check-config` command handler.

use std::path::Path;

use ugt_config::{ConfigLoader, ConfigValidator};

pub(crate) fn handle_check_config(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigLoader::load(path)?;
    let result = ConfigValidator::validate(&config)?;

    for warning in &result.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for error in &result.errors {
        println!("error: {}: {}", error.path, error.message);
    }

    match result.into_error() {
        Some(err) => Err(err.into()),
        None => {
            println!("{} is valid", path.display());
            Ok(())
        }
    }
}
