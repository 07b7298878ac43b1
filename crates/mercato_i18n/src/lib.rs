//! Mercato language and currency context
//!
//! Goals:
//! - One active display language per application tree, with the display
//!   currency derived from it (never set on its own)
//! - Typed translation keys with a three-tier fallback: active language,
//!   default language, key id. Lookup never fails.
//! - The selection persisted through a pluggable [`PreferenceStore`] and
//!   restored at startup
//! - An explicit [`Scope`] handle instead of a global singleton
//! - Catalog backends:
//!   - YAML mapping catalogs (default, with a `key = value` fallback)
//!   - Fluent (.ftl) catalogs (optional `fluent` feature)
//!
//! ```rust,ignore
//! use mercato_i18n::{LanguageContext, Scope, TranslationKey, Language};
//!
//! let app = Scope::root().provide(LanguageContext::builder().build()?);
//! let i18n = app.child().language().clone();
//! assert_eq!(i18n.translate(TranslationKey::Home), "Home");
//! i18n.set_language(Language::Fr);
//! assert_eq!(i18n.translate(TranslationKey::Home), "Accueil");
//! ```

mod catalog;
mod config;
mod context;
mod document;
mod error;
mod key;
mod label;
mod language;
mod locale;
mod scope;
mod store;
mod table;

#[cfg(feature = "fluent")]
mod fluent;

pub use catalog::{Catalog, CatalogParseError};
pub use config::{I18nConfig, DEFAULT_STORAGE_KEY};
pub use context::{LanguageContext, LanguageContextBuilder, LanguageHandle};
pub use document::{DocumentRoot, NoDocument};
pub use error::{I18nError, StoreError};
pub use key::TranslationKey;
pub use label::{ArgValue, Label, Message};
pub use language::{descriptors, discount_percent, Currency, Language, LanguageDescriptor};
pub use locale::{language_fallback_chain, normalize_locale};
pub use scope::Scope;
pub use store::{MemoryStore, PreferenceStore, TomlFileStore};
pub use table::{CatalogReport, TranslationTable, TranslationTableBuilder};

/// Build a translatable [`Message`] from a key and placeholder arguments.
///
/// Examples:
/// - `t!(Home)`
/// - `t!(CartItems, { count: 3 })`
#[macro_export]
macro_rules! t {
    ($key:ident) => {
        $crate::Message::from($crate::TranslationKey::$key)
    };
    ($key:ident, { $($name:ident : $value:expr),* $(,)? }) => {{
        let mut m = $crate::Message::from($crate::TranslationKey::$key);
        $(
            m = m.arg(stringify!($name), $value);
        )*
        m
    }};
}
