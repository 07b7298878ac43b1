use crate::context::LanguageHandle;
use crate::I18nError;

/// Composition scope passed down the component tree.
///
/// The root of the tree calls [`Scope::provide`] once; every scope derived
/// from it with [`Scope::child`] shares the same [`LanguageHandle`].
#[derive(Clone, Default)]
pub struct Scope {
    language: Option<LanguageHandle>,
}

impl Scope {
    /// A scope with no provider.
    pub fn root() -> Self {
        Self::default()
    }

    /// Install `handle` for this scope and everything below it.
    pub fn provide(&self, handle: LanguageHandle) -> Self {
        Self {
            language: Some(handle),
        }
    }

    /// Scope for a nested component; inherits the provider.
    pub fn child(&self) -> Self {
        self.clone()
    }

    pub fn try_language(&self) -> Option<&LanguageHandle> {
        self.language.as_ref()
    }

    pub fn require_language(&self) -> Result<&LanguageHandle, I18nError> {
        self.language.as_ref().ok_or(I18nError::NoProvider)
    }

    /// The language handle of the enclosing provider.
    ///
    /// # Panics
    ///
    /// Panics if no provider is in scope. That is a wiring bug in the
    /// application, not a runtime condition.
    pub fn language(&self) -> &LanguageHandle {
        match self.language.as_ref() {
            Some(handle) => handle,
            None => panic!("{}", I18nError::NoProvider),
        }
    }
}
