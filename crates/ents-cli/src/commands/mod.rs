pub mod check;
pub mod shell;
pub mod show;

use std::path::Path;

use ents_core::EngineConfig;

/// Error type shared by command entry points
pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Read the engine configuration, or fall back to the defaults
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(EngineConfig::from_path(path)?),
        None => Ok(EngineConfig::default()),
    }
}
