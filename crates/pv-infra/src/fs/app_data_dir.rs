use anyhow::{Context, Result};
use std::path::PathBuf;

/// Get the PhotoVerse application data root directory.
///
/// # Platform-specific Paths
/// - macOS: ~/Library/Application Support/PhotoVerse
/// - Windows: %APPDATA%\PhotoVerse
/// - Linux: $XDG_DATA_HOME/PhotoVerse or ~/.local/share/PhotoVerse
///
/// Does not create the directory.
pub fn app_data_dir() -> Result<PathBuf> {
    let base_dir =
        get_platform_data_dir().context("Failed to get platform-specific data directory")?;

    Ok(base_dir.join("PhotoVerse"))
}

fn get_platform_data_dir() -> Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        if let Some(xdg_data_home) = std::env::var_os("XDG_DATA_HOME") {
            return Ok(PathBuf::from(xdg_data_home));
        }
    }

    dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Unable to get platform data directory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_ends_with_product_name() {
        let path = app_data_dir().expect("Should be able to get app data dir");
        assert!(path.ends_with("PhotoVerse"));
    }
}
