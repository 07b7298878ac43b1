use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::{debug, warn};

use crate::config::I18nConfig;
use crate::document::{DocumentRoot, NoDocument};
use crate::key::TranslationKey;
use crate::label::{Label, Message};
use crate::language::{Currency, Language, LanguageDescriptor};
use crate::store::{MemoryStore, PreferenceStore, TomlFileStore};
use crate::table::TranslationTable;
use crate::I18nError;

/// Shared handle to the one context of an application tree.
pub type LanguageHandle = Arc<LanguageContext>;

type RedrawCallback = Arc<dyn Fn() + Send + Sync>;

/// Active display language, its derived currency, and string lookup.
///
/// Constructed once at the composition root with [`LanguageContext::builder`]
/// and handed down through a [`Scope`](crate::Scope). The active language is
/// read from the preference store at construction, so there is no
/// uninitialized phase.
pub struct LanguageContext {
    active: RwLock<Language>,
    /// Held across swap, save and tag so concurrent switches persist in
    /// the same order they land in `active`.
    switching: Mutex<()>,
    table: Arc<TranslationTable>,
    store: Box<dyn PreferenceStore>,
    storage_key: String,
    document: Box<dyn DocumentRoot>,
    redraw: RwLock<Option<RedrawCallback>>,
}

impl LanguageContext {
    pub fn builder() -> LanguageContextBuilder {
        LanguageContextBuilder::default()
    }

    /// Build a context from config alone: built-in catalogs, the configured
    /// preference file (or memory), no document.
    pub fn init(config: I18nConfig) -> Result<LanguageHandle, I18nError> {
        Self::builder().config(config).build()
    }

    /// Currently selected language.
    pub fn language(&self) -> Language {
        *self.active.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Currency of the current language. There is no way to set it directly.
    pub fn currency(&self) -> Currency {
        self.language().currency()
    }

    pub fn descriptor(&self) -> &'static LanguageDescriptor {
        self.language().descriptor()
    }

    pub fn table(&self) -> &TranslationTable {
        &self.table
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Select `language`.
    ///
    /// The new value is visible to every reader before this returns. The
    /// choice is then persisted best-effort: a store failure is logged and
    /// otherwise ignored. Concurrent calls are applied one at a time, so the
    /// stored value and the document tag always end on the last value set.
    pub fn set_language(&self, language: Language) {
        let switching = self.switching.lock().unwrap_or_else(PoisonError::into_inner);

        let previous = {
            let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *active, language)
        };

        self.persist(language);

        let changed = previous != language;
        if changed {
            debug!(from = %previous, to = %language, "LanguageContext::set_language");
            self.document.set_locale_attribute(language.code());
        }
        drop(switching);

        if changed {
            self.trigger_redraw();
        }
    }

    /// Select a language by code. Unknown codes are rejected and leave the
    /// active language untouched.
    pub fn set_language_code(&self, code: &str) -> Result<(), I18nError> {
        let language: Language = code.parse()?;
        self.set_language(language);
        Ok(())
    }

    /// Register the function that re-renders language-sensitive UI.
    ///
    /// Called after a change of language, never for a no-op set.
    pub fn set_redraw_callback(&self, callback: impl Fn() + Send + Sync + 'static) {
        *self.redraw.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(callback));
    }

    fn trigger_redraw(&self) {
        let callback = self
            .redraw
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(cb) = callback {
            cb();
        }
    }

    fn persist(&self, language: Language) {
        if let Err(e) = self.store.save(&self.storage_key, language.code()) {
            warn!(
                language = %language,
                key = %self.storage_key,
                error = %e,
                "failed to persist language preference"
            );
        }
    }

    /// Localized string for `key`: active language, then default language,
    /// then the key id itself.
    pub fn translate(&self, key: TranslationKey) -> String {
        self.tr(&Message::from(key))
    }

    /// Like [`translate`](Self::translate) for a key only known at runtime.
    pub fn translate_id(&self, id: &str) -> String {
        self.tr(&Message::new(id.to_string()))
    }

    /// Translate a message with placeholder arguments.
    pub fn tr(&self, msg: &Message) -> String {
        self.table.resolve(self.language(), msg)
    }

    pub fn resolve_label(&self, label: &Label) -> String {
        match label {
            Label::Raw(s) => s.clone(),
            Label::Msg(m) => self.tr(m),
        }
    }

    /// Format an amount in the active currency.
    pub fn format_price(&self, amount: f64) -> String {
        self.currency().format_amount(amount)
    }
}

/// Wires a [`LanguageContext`] together.
#[derive(Default)]
pub struct LanguageContextBuilder {
    config: I18nConfig,
    table: Option<Arc<TranslationTable>>,
    store: Option<Box<dyn PreferenceStore>>,
    document: Option<Box<dyn DocumentRoot>>,
}

impl LanguageContextBuilder {
    pub fn config(mut self, config: I18nConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a prebuilt table instead of the built-in catalogs.
    pub fn table(mut self, table: Arc<TranslationTable>) -> Self {
        self.table = Some(table);
        self
    }

    /// Override the store derived from `preference_file`.
    pub fn store(mut self, store: impl PreferenceStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn document(mut self, document: impl DocumentRoot + 'static) -> Self {
        self.document = Some(Box::new(document));
        self
    }

    pub fn build(self) -> Result<LanguageHandle, I18nError> {
        let table = match self.table {
            Some(table) => table,
            None => Arc::new(
                TranslationTable::builder()
                    .with_builtin()
                    .strict(self.config.strict_catalogs)
                    .build()?,
            ),
        };

        let store: Box<dyn PreferenceStore> = match (self.store, &self.config.preference_file) {
            (Some(store), _) => store,
            (None, Some(path)) => Box::new(TomlFileStore::new(path)),
            (None, None) => Box::new(MemoryStore::new()),
        };
        let document = self.document.unwrap_or_else(|| Box::new(NoDocument));

        let storage_key = self.config.storage_key;
        let initial = initial_language(store.as_ref(), &storage_key);
        debug!(language = %initial, "LanguageContext initialized");
        document.set_locale_attribute(initial.code());

        Ok(Arc::new(LanguageContext {
            active: RwLock::new(initial),
            switching: Mutex::new(()),
            table,
            store,
            storage_key,
            document,
            redraw: RwLock::new(None),
        }))
    }
}

/// Stored preference if it names a supported language, otherwise the default.
fn initial_language(store: &dyn PreferenceStore, key: &str) -> Language {
    match store.load(key) {
        Ok(Some(code)) => Language::from_code(&code).unwrap_or_else(|| {
            warn!(code = %code, "ignoring unsupported stored language");
            Language::DEFAULT
        }),
        Ok(None) => Language::DEFAULT,
        Err(e) => {
            warn!(error = %e, "failed to read language preference");
            Language::DEFAULT
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreError;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct BrokenStore;

    impl PreferenceStore for BrokenStore {
        fn load(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("storage disabled".to_string()))
        }

        fn save(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("quota exceeded".to_string()))
        }
    }

    #[test]
    fn unreadable_store_starts_on_default_and_still_switches() {
        let ctx = LanguageContext::builder().store(BrokenStore).build().unwrap();
        assert_eq!(ctx.language(), Language::En);

        ctx.set_language(Language::Es);
        assert_eq!(ctx.language(), Language::Es);
        assert_eq!(ctx.currency(), Currency::Usd);
    }

    #[test]
    fn unsupported_stored_code_is_ignored() {
        for code in ["zz", "en-zz", "fr-anything"] {
            let store = MemoryStore::with_entry("language", code);
            let ctx = LanguageContext::builder().store(store).build().unwrap();
            assert_eq!(ctx.language(), Language::DEFAULT, "{code}");
        }

        let store = MemoryStore::with_entry("language", " FR ");
        let ctx = LanguageContext::builder().store(store).build().unwrap();
        assert_eq!(ctx.language(), Language::Fr);
    }

    #[test]
    fn custom_storage_key() {
        let store = MemoryStore::with_entry("ui.lang", "fr");
        let config = I18nConfig {
            storage_key: "ui.lang".to_string(),
            ..I18nConfig::default()
        };
        let ctx = LanguageContext::builder()
            .config(config)
            .store(store.clone())
            .build()
            .unwrap();
        assert_eq!(ctx.language(), Language::Fr);

        ctx.set_language(Language::Es);
        assert_eq!(store.get("ui.lang").as_deref(), Some("es"));
        assert_eq!(store.get("language"), None);
    }

    #[test]
    fn redraw_fires_only_on_change() {
        static REDRAWS: AtomicUsize = AtomicUsize::new(0);

        let ctx = LanguageContext::builder().build().unwrap();
        ctx.set_redraw_callback(|| {
            REDRAWS.fetch_add(1, Ordering::SeqCst);
        });

        ctx.set_language(Language::Fr);
        ctx.set_language(Language::Fr);
        ctx.set_language(Language::En);
        assert_eq!(REDRAWS.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn labels_and_prices() {
        let ctx = LanguageContext::builder().build().unwrap();
        assert_eq!(ctx.resolve_label(&Label::raw("Kente scarf")), "Kente scarf");
        assert_eq!(
            ctx.resolve_label(&Label::from(TranslationKey::BuyNow)),
            "Buy now"
        );
        assert_eq!(ctx.format_price(45.0), "GH₵ 45.00");

        ctx.set_language(Language::Es);
        assert_eq!(ctx.format_price(45.0), "$45.00");
        assert_eq!(
            ctx.tr(&Message::from(TranslationKey::CartItems).arg("count", 2)),
            "2 artículos en tu carrito"
        );
    }
}
