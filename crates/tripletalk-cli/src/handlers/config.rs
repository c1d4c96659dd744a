//! Config command handler.

use tripletalk_core::DriverConfig;

use crate::error::CliError;

/// Print the resolved configuration as pretty JSON.
pub fn execute(config: &DriverConfig) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| CliError::Config(e.to_string()))?;
    println!("{json}");
    Ok(())
}
