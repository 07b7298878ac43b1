use crate::language::Language;

/// Normalize a language tag to a canonical-ish form for lookup.
///
/// - Converts `_` to `-` (`fr_FR` comes from some platforms).
/// - Trims whitespace and lowercases.
pub fn normalize_locale(s: &str) -> String {
    s.trim().replace('_', "-").to_ascii_lowercase()
}

/// Catalog lookup order for a language.
///
/// Example:
/// - `Fr` -> `[Fr, En]`
/// - `En` -> `[En]` (the default is not repeated)
pub fn language_fallback_chain(language: Language) -> Vec<Language> {
    let mut chain = vec![language];
    if language != Language::DEFAULT {
        chain.push(Language::DEFAULT);
    }
    chain
}
