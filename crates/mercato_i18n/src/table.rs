use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use tracing::warn;

use crate::catalog::Catalog;
use crate::key::TranslationKey;
use crate::label::Message;
use crate::language::Language;
use crate::locale::language_fallback_chain;
use crate::I18nError;

#[cfg(feature = "fluent")]
use crate::fluent::FluentStore;

const BUILTIN_CATALOGS: [(Language, &str); 3] = [
    (Language::En, include_str!("../resource/i18n/en.yaml")),
    (Language::Fr, include_str!("../resource/i18n/fr.yaml")),
    (Language::Es, include_str!("../resource/i18n/es.yaml")),
];

/// Keys a language is missing relative to the default language.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogReport {
    /// Typed keys the default language itself does not define.
    pub default_missing: Vec<&'static str>,
    /// Per non-default language, keys the default defines but it lacks.
    pub missing: Vec<(Language, Vec<String>)>,
}

impl CatalogReport {
    pub fn is_complete(&self) -> bool {
        self.default_missing.is_empty() && self.missing.iter().all(|(_, keys)| keys.is_empty())
    }
}

impl Display for CatalogReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_complete() {
            return f.write_str("complete");
        }
        let mut parts = Vec::new();
        if !self.default_missing.is_empty() {
            parts.push(format!(
                "{} (default) lacks {}",
                Language::DEFAULT,
                self.default_missing.join(", ")
            ));
        }
        for (language, keys) in &self.missing {
            if !keys.is_empty() {
                parts.push(format!("{language} lacks {}", keys.join(", ")));
            }
        }
        f.write_str(&parts.join("; "))
    }
}

/// Immutable `language -> key -> template` mapping.
///
/// Built once with [`TranslationTable::builder`] (or [`TranslationTable::builtin`])
/// and shared read-only afterwards.
pub struct TranslationTable {
    catalogs: HashMap<Language, Catalog>,

    #[cfg(feature = "fluent")]
    fluent: FluentStore,
}

impl TranslationTable {
    pub fn builder() -> TranslationTableBuilder {
        TranslationTableBuilder::default()
    }

    /// The catalogs shipped with the crate.
    pub fn builtin() -> Result<Self, I18nError> {
        Self::builder().with_builtin().build()
    }

    /// Entry for exactly `(language, key)`, no fallback.
    pub fn lookup(&self, language: Language, msg: &Message) -> Option<String> {
        #[cfg(feature = "fluent")]
        {
            if let Some(s) = self
                .fluent
                .format_message(language, msg)
                .filter(|s| !s.is_empty())
            {
                return Some(s);
            }
        }

        self.catalogs
            .get(&language)
            .and_then(|cat| cat.format_message(msg))
    }

    pub fn contains(&self, language: Language, id: &str) -> bool {
        #[cfg(feature = "fluent")]
        {
            if self.fluent.contains(language, id) {
                return true;
            }
        }

        self.catalogs
            .get(&language)
            .is_some_and(|cat| cat.contains(id))
    }

    /// Resolve `msg` for `language`: the language's own entry, then the
    /// default language's entry, then the bare key id. Never fails.
    pub fn resolve(&self, language: Language, msg: &Message) -> String {
        language_fallback_chain(language)
            .into_iter()
            .find_map(|l| self.lookup(l, msg))
            .unwrap_or_else(|| msg.id.to_string())
    }

    /// Report keys missing from non-default languages, relative to the
    /// default language's catalog. Empty templates count as missing.
    pub fn audit(&self) -> CatalogReport {
        let default_missing = TranslationKey::ALL
            .iter()
            .map(|k| k.id())
            .filter(|id| !self.contains(Language::DEFAULT, id))
            .collect();

        let mut default_ids: Vec<&str> = self.default_ids();
        default_ids.sort_unstable();
        default_ids.dedup();

        let missing = Language::ALL
            .iter()
            .copied()
            .filter(|l| *l != Language::DEFAULT)
            .map(|l| {
                let lacks = default_ids
                    .iter()
                    .filter(|id| !self.contains(l, id))
                    .map(|id| id.to_string())
                    .collect();
                (l, lacks)
            })
            .collect();

        CatalogReport {
            default_missing,
            missing,
        }
    }

    fn default_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .catalogs
            .get(&Language::DEFAULT)
            .map(|cat| cat.keys().filter(|id| cat.contains(id)).collect())
            .unwrap_or_default();
        // Typed keys only served by Fluent still count as defined by the default.
        ids.extend(
            TranslationKey::ALL
                .iter()
                .map(|k| k.id())
                .filter(|id| self.contains(Language::DEFAULT, id)),
        );
        ids
    }
}

/// Assembles a [`TranslationTable`].
#[derive(Default)]
pub struct TranslationTableBuilder {
    sources: Vec<Source>,
    strict: bool,
}

enum Source {
    Catalog(Language, Catalog),
    Simple(Language, String),
    #[cfg(feature = "fluent")]
    Fluent(Language, String),
}

impl TranslationTableBuilder {
    /// Add the crate's built-in catalogs.
    pub fn with_builtin(mut self) -> Self {
        for (language, src) in BUILTIN_CATALOGS {
            self.sources.push(Source::Simple(language, src.to_string()));
        }
        self
    }

    /// Add a parsed catalog. Entries merge over earlier ones for the same language.
    pub fn catalog(mut self, language: Language, catalog: Catalog) -> Self {
        self.sources.push(Source::Catalog(language, catalog));
        self
    }

    /// Add a YAML (or `key = value`) catalog source, parsed at build time.
    pub fn catalog_str(mut self, language: Language, src: impl Into<String>) -> Self {
        self.sources.push(Source::Simple(language, src.into()));
        self
    }

    /// Add a Fluent (.ftl) source. Fluent entries win over catalog entries.
    #[cfg(feature = "fluent")]
    pub fn fluent_ftl(mut self, language: Language, ftl: impl Into<String>) -> Self {
        self.sources.push(Source::Fluent(language, ftl.into()));
        self
    }

    /// Fail the build when a language lacks keys the default defines.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn build(self) -> Result<TranslationTable, I18nError> {
        let mut catalogs: HashMap<Language, Catalog> = HashMap::new();
        #[cfg(feature = "fluent")]
        let mut fluent = FluentStore::default();

        for source in self.sources {
            let (language, parsed) = match source {
                Source::Catalog(language, cat) => (language, cat),
                Source::Simple(language, src) => (language, Catalog::parse(&src)?),
                #[cfg(feature = "fluent")]
                Source::Fluent(language, ftl) => {
                    fluent
                        .load_from_str(language, &ftl)
                        .map_err(I18nError::Fluent)?;
                    continue;
                }
            };
            let target = catalogs.entry(language).or_default();
            for key in parsed.keys() {
                if let Some(value) = parsed.get(key) {
                    target.insert(key, value);
                }
            }
        }

        let table = TranslationTable {
            catalogs,
            #[cfg(feature = "fluent")]
            fluent,
        };

        let report = table.audit();
        if !report.is_complete() {
            if self.strict {
                return Err(I18nError::IncompleteCatalog(report));
            }
            warn!(%report, "translation catalogs are incomplete; missing entries fall back");
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn small_table(strict: bool) -> Result<TranslationTable, I18nError> {
        TranslationTable::builder()
            .catalog_str(Language::En, "home: Home\ncart: Cart\n")
            .catalog_str(Language::Fr, "home: Accueil\n")
            .strict(strict)
            .build()
    }

    #[test]
    fn resolve_falls_back_through_default_to_id() {
        let table = small_table(false).unwrap();
        assert_eq!(table.resolve(Language::Fr, &Message::new("home")), "Accueil");
        assert_eq!(table.resolve(Language::Fr, &Message::new("cart")), "Cart");
        assert_eq!(table.resolve(Language::Es, &Message::new("home")), "Home");
        assert_eq!(table.resolve(Language::Fr, &Message::new("nowhere")), "nowhere");
    }

    #[test]
    fn audit_lists_gaps() {
        let table = small_table(false).unwrap();
        let report = table.audit();
        assert!(!report.is_complete());

        let fr = report
            .missing
            .iter()
            .find(|(l, _)| *l == Language::Fr)
            .map(|(_, keys)| keys.clone())
            .unwrap();
        assert_eq!(fr, vec!["cart".to_string()]);
        assert!(report.default_missing.contains(&"checkout"));
    }

    #[test]
    fn empty_entries_fall_through_and_are_reported() {
        let table = TranslationTable::builder()
            .with_builtin()
            .catalog_str(Language::Fr, "home: \"\"\n")
            .build()
            .unwrap();
        assert_eq!(table.resolve(Language::Fr, &Message::new("home")), "Home");

        let report = table.audit();
        let fr = report
            .missing
            .iter()
            .find(|(l, _)| *l == Language::Fr)
            .map(|(_, keys)| keys.clone())
            .unwrap();
        assert_eq!(fr, vec!["home".to_string()]);

        let empty_default = TranslationTable::builder()
            .catalog_str(Language::En, "home: \"\"\n")
            .build()
            .unwrap();
        assert_eq!(
            empty_default.resolve(Language::Es, &Message::new("home")),
            "home"
        );
        assert!(empty_default.audit().default_missing.contains(&"home"));
    }

    #[test]
    fn strict_build_rejects_gaps() {
        assert!(matches!(
            small_table(true),
            Err(I18nError::IncompleteCatalog(_))
        ));
    }

    #[test]
    fn later_sources_override_earlier_ones() {
        let table = TranslationTable::builder()
            .with_builtin()
            .catalog_str(Language::En, "home = Storefront\n")
            .build()
            .unwrap();
        assert_eq!(table.resolve(Language::En, &Message::new("home")), "Storefront");
        assert_eq!(table.resolve(Language::En, &Message::new("cart")), "Cart");
    }

    #[test]
    fn parse_errors_surface_from_build() {
        let err = TranslationTable::builder()
            .catalog_str(Language::En, "home: [1, 2]\n")
            .build();
        assert!(matches!(err, Err(I18nError::CatalogParse(_))));
    }

    #[cfg(feature = "fluent")]
    #[test]
    fn fluent_wins_within_a_tier() {
        let table = TranslationTable::builder()
            .with_builtin()
            .fluent_ftl(Language::Fr, "home = Page d'accueil\n")
            .build()
            .unwrap();
        assert_eq!(
            table.resolve(Language::Fr, &Message::new("home")),
            "Page d'accueil"
        );
        assert_eq!(table.resolve(Language::Fr, &Message::new("cart")), "Panier");
    }
}
