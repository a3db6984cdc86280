mod config;

pub use config::Config;

use std::path::PathBuf;

/// Returns `~/.config/statusgate[-dev]/` based on STATUSGATE_ENV.
///
/// Set STATUSGATE_ENV=dev to use a development config directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("STATUSGATE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("statusgate-dev")
    } else {
        base_dir.join("statusgate")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
