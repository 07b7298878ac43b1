use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use mercato_i18n::{
    descriptors, I18nConfig, Language, LanguageContext, Message, PreferenceStore, TomlFileStore,
    TranslationKey, TranslationTable,
};
use tracing::{debug, info, warn};

/// Config from `--config` (or defaults), with `--store` taking precedence
/// over the configured preference file.
pub fn load_config(path: Option<&Path>, store: Option<PathBuf>) -> Result<I18nConfig> {
    let mut config = match path {
        Some(path) => I18nConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => I18nConfig::default(),
    };
    if store.is_some() {
        config.preference_file = store;
    }
    debug!(?config, "resolved i18n config");
    Ok(config)
}

pub fn languages() -> Result<ExitCode> {
    for (i, d) in descriptors().iter().enumerate() {
        let marker = if i == 0 { " (default)" } else { "" };
        println!(
            "{} {}  {:<10} {}{}",
            d.flag,
            d.code,
            d.display_name,
            d.currency.code(),
            marker
        );
    }
    Ok(ExitCode::SUCCESS)
}

pub fn check(strict: bool) -> Result<ExitCode> {
    let table = TranslationTable::builtin().context("failed to load built-in catalogs")?;
    let report = table.audit();

    if report.is_complete() {
        info!(
            languages = Language::ALL.len(),
            keys = TranslationKey::ALL.len(),
            "catalogs complete"
        );
        return Ok(ExitCode::SUCCESS);
    }

    for id in &report.default_missing {
        println!("{}: missing `{id}` (default language)", Language::DEFAULT);
    }
    for (language, keys) in &report.missing {
        for id in keys {
            println!("{language}: missing `{id}`");
        }
    }

    if strict {
        warn!("incomplete catalogs in strict mode");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

pub fn translate(config: I18nConfig, key: &str, lang: Option<&str>) -> Result<ExitCode> {
    if TranslationKey::from_id(key).is_none() {
        warn!(key, "not a known translation key; showing fallback");
    }

    let ctx = LanguageContext::init(config)?;
    let language = match lang {
        Some(code) => code.parse::<Language>()?,
        None => ctx.language(),
    };

    println!(
        "{}",
        ctx.table().resolve(language, &Message::new(key.to_string()))
    );
    Ok(ExitCode::SUCCESS)
}

pub fn get(config: I18nConfig) -> Result<ExitCode> {
    require_preference_file(&config)?;
    let ctx = LanguageContext::init(config)?;
    let d = ctx.descriptor();
    println!("{} ({}, {})", d.code, d.display_name, d.currency.code());
    Ok(ExitCode::SUCCESS)
}

pub fn set(config: I18nConfig, code: &str) -> Result<ExitCode> {
    let path = require_preference_file(&config)?;
    let language: Language = code.parse()?;

    // Written directly: the context only logs persistence failures.
    TomlFileStore::new(path)
        .save(&config.storage_key, language.code())
        .with_context(|| format!("failed to write preference to {}", path.display()))?;

    info!(language = %language, path = %path.display(), "language preference saved");
    Ok(ExitCode::SUCCESS)
}

fn require_preference_file(config: &I18nConfig) -> Result<&Path> {
    match config.preference_file.as_deref() {
        Some(path) => Ok(path),
        None => bail!("no preference file: pass --store or set `preference_file` in the config"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn store_flag_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("mercato.toml");
        fs::write(
            &config_path,
            "[i18n]\nstorage_key = \"lang\"\npreference_file = \"from-config.toml\"\n",
        )
        .unwrap();

        let config = load_config(Some(&config_path), None).unwrap();
        assert_eq!(config.storage_key, "lang");
        assert_eq!(config.preference_file, Some(PathBuf::from("from-config.toml")));

        let flag = dir.path().join("flag.toml");
        let config = load_config(Some(&config_path), Some(flag.clone())).unwrap();
        assert_eq!(config.preference_file, Some(flag));
    }

    #[test]
    fn set_then_get_uses_the_preference_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(None, Some(dir.path().join("prefs.toml"))).unwrap();

        assert!(set(config.clone(), "es").is_ok());
        let ctx = LanguageContext::init(config.clone()).unwrap();
        assert_eq!(ctx.language(), Language::Es);
        assert!(get(config.clone()).is_ok());

        assert!(set(config.clone(), "zz").is_err());
        let reopened = LanguageContext::init(config).unwrap();
        assert_eq!(reopened.language(), Language::Es);
    }

    #[test]
    fn get_and_set_need_a_preference_file() {
        assert!(get(I18nConfig::default()).is_err());
        assert!(set(I18nConfig::default(), "fr").is_err());
    }

    #[test]
    fn set_reports_an_unwritable_preference_file() {
        // A directory where the file should be: reads and writes both fail,
        // and the default language would otherwise look like a stored "en".
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(None, Some(dir.path().to_path_buf())).unwrap();

        let err = set(config, "en").unwrap_err();
        assert!(err.to_string().contains("failed to write preference"));
    }
}
