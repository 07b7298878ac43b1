use thiserror::Error;

use crate::catalog::CatalogParseError;
use crate::table::CatalogReport;

#[derive(Debug, Error)]
pub enum I18nError {
    #[error(transparent)]
    CatalogParse(#[from] CatalogParseError),

    #[error("fluent error: {0}")]
    Fluent(String),

    #[error("unsupported language code `{0}` (supported: en, fr, es)")]
    UnsupportedLanguage(String),

    #[error("incomplete translation catalogs: {0}")]
    IncompleteCatalog(CatalogReport),

    #[error(
        "no language provider in scope. Call `Scope::provide()` at the composition root \
         before reading the language handle."
    )]
    NoProvider,

    #[error("invalid i18n config: {0}")]
    Config(String),
}

/// Failure reading or writing the persisted language preference.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("preference store i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("preference store is not valid TOML: {0}")]
    Decode(String),

    #[error("failed to encode preferences: {0}")]
    Encode(String),

    #[error("preference store unavailable: {0}")]
    Unavailable(String),
}
