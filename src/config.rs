use crate::generator::{
    ConversionRequest, DEFAULT_TABLE_NAME, IdentifierStyle, ScriptOptions, ValuePolicy,
};
use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppSettings {
    /// Used when no table name is given
    pub default_table_name: String,
    pub value_policy: ValuePolicy,
    pub identifier_style: IdentifierStyle,
    /// Maximum tuples per INSERT statement; `None` writes a single statement
    pub rows_per_insert: Option<usize>,
    /// Rewrite headers to lower snake case before generating
    pub standardise_column_names: bool,
    /// Number of rows shown in data previews (default: 10)
    pub preview_rows: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_table_name: DEFAULT_TABLE_NAME.to_owned(),
            value_policy: ValuePolicy::default(),
            identifier_style: IdentifierStyle::default(),
            rows_per_insert: None,
            standardise_column_names: false,
            preview_rows: 10,
        }
    }
}

impl AppSettings {
    pub fn script_options(&self) -> ScriptOptions {
        ScriptOptions {
            value_policy: self.value_policy,
            identifier_style: self.identifier_style,
            rows_per_insert: self.rows_per_insert,
        }
    }

    /// Request for `table_name`, falling back to the configured default when
    /// it is absent or blank.
    pub fn request(&self, table_name: Option<String>) -> ConversionRequest {
        ConversionRequest {
            table_name: table_name
                .filter(|name| !name.trim().is_empty())
                .or_else(|| Some(self.default_table_name.clone())),
            options: self.script_options(),
            standardise_column_names: self.standardise_column_names,
        }
    }
}

pub fn get_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("sheetsql")
        .join("config.json")
}

/// Loads settings, falling back to defaults when the file is missing or unreadable.
pub fn load_app_config() -> AppSettings {
    load_app_config_from(&get_config_path())
}

pub fn load_app_config_from(path: &Path) -> AppSettings {
    if path.exists()
        && let Ok(content) = std::fs::read_to_string(path)
    {
        match serde_json::from_str::<AppSettings>(&content) {
            Ok(settings) => return settings,
            Err(e) => tracing::warn!("Ignoring unreadable config {}: {e}", path.display()),
        }
    }

    AppSettings::default()
}

pub fn save_app_config(settings: &AppSettings) -> Result<()> {
    save_app_config_to(settings, &get_config_path())
}

pub fn save_app_config_to(settings: &AppSettings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let content = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load_settings() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("config.json");

        let settings = AppSettings {
            default_table_name: "imports".to_owned(),
            value_policy: ValuePolicy::NullAware,
            identifier_style: IdentifierStyle::Backtick,
            rows_per_insert: Some(500),
            ..Default::default()
        };
        save_app_config_to(&settings, &path)?;

        assert_eq!(load_app_config_from(&path), settings);
        Ok(())
    }

    #[test]
    fn test_missing_or_partial_config_uses_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.json");
        assert_eq!(load_app_config_from(&path), AppSettings::default());

        std::fs::write(&path, r#"{ "preview_rows": 25 }"#)?;
        let loaded = load_app_config_from(&path);
        assert_eq!(loaded.preview_rows, 25);
        assert_eq!(loaded.default_table_name, DEFAULT_TABLE_NAME);

        std::fs::write(&path, "not json")?;
        assert_eq!(load_app_config_from(&path), AppSettings::default());
        Ok(())
    }

    #[test]
    fn test_request_prefers_explicit_table_name() {
        let settings = AppSettings::default();
        assert_eq!(
            settings.request(Some("students".to_owned())).table_name.as_deref(),
            Some("students")
        );
        assert_eq!(
            settings.request(None).table_name.as_deref(),
            Some(DEFAULT_TABLE_NAME)
        );
    }

    #[test]
    fn test_blank_table_name_uses_configured_default() {
        let settings = AppSettings {
            default_table_name: "imports".to_owned(),
            ..Default::default()
        };
        for blank in ["", "   "] {
            assert_eq!(
                settings.request(Some(blank.to_owned())).table_name.as_deref(),
                Some("imports")
            );
        }
    }
}
