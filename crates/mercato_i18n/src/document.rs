/// The rendered document's root element, as far as language is concerned.
///
/// The context sets the root's `lang` attribute to the active language code
/// at startup and on every change.
pub trait DocumentRoot: Send + Sync {
    fn set_locale_attribute(&self, code: &str);
}

/// Headless rendering: nothing to tag.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDocument;

impl DocumentRoot for NoDocument {
    fn set_locale_attribute(&self, _code: &str) {}
}
