//! Generator configuration

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Options shared by the optimizer, both generators and the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorOptions {
    /// Wrap the script in a self-invoking async function
    pub wrap_async: bool,
    /// When false the browser is launched visibly
    pub headless: bool,
    /// Declare a navigation promise and await it after navigations
    pub wait_for_navigation: bool,
    /// Wait for the target selector before each click
    pub wait_for_selector_on_click: bool,
    /// One blank line between statements
    pub blank_lines_between_blocks: bool,
    /// Preferred attribute for the selector service; not used by the generators
    pub data_attribute: String,
    /// Caller-side ordering hint for presenting both scripts
    pub show_playwright_first: bool,
    /// Key pressed by a keydown that recorded none
    pub key: String,
    /// Playwright only: wait for network idle after every click
    pub wait_for_network_idle_after_click: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            wrap_async: false,
            headless: true,
            wait_for_navigation: true,
            wait_for_selector_on_click: true,
            blank_lines_between_blocks: true,
            data_attribute: String::new(),
            show_playwright_first: true,
            key: "Tab".to_string(),
            wait_for_network_idle_after_click: false,
        }
    }
}

impl GeneratorOptions {
    /// Parse options from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load options from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::from(e).with_context(serde_json::json!({ "path": path.display().to_string() }))
        })?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::io::Write;

    #[test]
    fn empty_config_is_default() {
        assert_eq!(GeneratorOptions::from_toml_str("").unwrap(), GeneratorOptions::default());
    }

    #[test]
    fn camel_case_keys() {
        let options = GeneratorOptions::from_toml_str(
            r#"
            wrapAsync = true
            headless = false
            dataAttribute = "data-test"
            waitForNetworkIdleAfterClick = true
            "#,
        )
        .unwrap();
        assert!(options.wrap_async);
        assert!(!options.headless);
        assert_eq!(options.data_attribute, "data-test");
        assert!(options.wait_for_network_idle_after_click);
        assert!(options.wait_for_navigation);
        assert_eq!(options.key, "Tab");
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "blankLinesBetweenBlocks = false").unwrap();
        let options = GeneratorOptions::load(file.path()).unwrap();
        assert!(!options.blank_lines_between_blocks);
    }

    #[test]
    fn bad_types_are_reported() {
        let err = GeneratorOptions::from_toml_str("headless = \"nope\"").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidOptions);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = GeneratorOptions::load(Path::new("/nonexistent/recast.toml")).unwrap_err();
        assert_eq!(err.code, ErrorCode::Io);
        assert!(err.context.is_some());
    }
}
