use crate::{PageError, PageResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub page_size: Option<usize>,
}

impl EngineConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/pagewin/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("pagewin/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("pagewin\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    /// Load the user config, falling back to defaults when it is missing or unreadable.
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| Self::load_from(&path).ok())
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> PageResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> PageResult<Self> {
        toml::from_str(content).map_err(|e| PageError::Config(e.to_string()))
    }

    pub fn effective_page_size(&self) -> usize {
        self.page_size
            .filter(|&size| size > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_size() {
        assert_eq!(EngineConfig::default().effective_page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_page_size_from_toml() {
        let config = EngineConfig::from_toml_str("page_size = 50").unwrap();
        assert_eq!(config.effective_page_size(), 50);
    }

    #[test]
    fn test_zero_page_size_falls_back_to_default() {
        let config = EngineConfig::from_toml_str("page_size = 0").unwrap();
        assert_eq!(config.effective_page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = EngineConfig::from_toml_str("page_size = \"many\"").unwrap_err();
        assert!(matches!(err, PageError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = EngineConfig::load_from(Path::new("/nonexistent/pagewin/config.toml"))
            .unwrap_err();
        assert!(matches!(err, PageError::Io(_)));
    }
}
