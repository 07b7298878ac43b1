//! i18n configuration (`[i18n]` table or a standalone file)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::I18nError;

/// Default key under which the selected language is persisted.
pub const DEFAULT_STORAGE_KEY: &str = "language";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct I18nConfig {
    /// Key under which the language code is persisted.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// TOML file backing the preference store. `None` keeps it in memory.
    #[serde(default)]
    pub preference_file: Option<PathBuf>,
    /// Refuse to start when a language lacks keys the default defines.
    #[serde(default)]
    pub strict_catalogs: bool,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            preference_file: None,
            strict_catalogs: false,
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default)]
    i18n: Option<I18nConfig>,
}

impl I18nConfig {
    /// Parse either a standalone config or one nested under `[i18n]`.
    pub fn from_toml_str(src: &str) -> Result<Self, I18nError> {
        let table: toml::Table = src.parse().map_err(config_error)?;

        let config = if table.contains_key("i18n") {
            let file: ConfigFile = toml::from_str(src).map_err(config_error)?;
            file.i18n.unwrap_or_default()
        } else {
            toml::from_str(src).map_err(config_error)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, I18nError> {
        let src = fs::read_to_string(path)
            .map_err(|e| I18nError::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&src)
    }

    fn validate(&self) -> Result<(), I18nError> {
        if self.storage_key.trim().is_empty() {
            return Err(I18nError::Config("storage_key must not be empty".to_string()));
        }
        Ok(())
    }
}

fn config_error(e: toml::de::Error) -> I18nError {
    I18nError::Config(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_config_uses_defaults() {
        assert_eq!(I18nConfig::from_toml_str("").unwrap(), I18nConfig::default());
    }

    #[test]
    fn nested_and_standalone_forms() {
        let nested = I18nConfig::from_toml_str(
            r#"
[app]
name = "mercato"

[i18n]
storage_key = "ui.language"
strict_catalogs = true
"#,
        )
        .unwrap();
        assert_eq!(nested.storage_key, "ui.language");
        assert!(nested.strict_catalogs);
        assert_eq!(nested.preference_file, None);

        let standalone =
            I18nConfig::from_toml_str("preference_file = \"/tmp/mercato.toml\"\n").unwrap();
        assert_eq!(standalone.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(
            standalone.preference_file,
            Some(PathBuf::from("/tmp/mercato.toml"))
        );
    }

    #[test]
    fn rejects_empty_storage_key() {
        let err = I18nConfig::from_toml_str("storage_key = \"  \"\n").unwrap_err();
        assert!(matches!(err, I18nError::Config(_)));
    }
}
