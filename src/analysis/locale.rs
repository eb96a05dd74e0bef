//! Locale-keyed resource lookup.
//!
//! Resources are resolved by exact tag first, then by primary language
//! subtag, so `en-US` and `en_GB` both find a resource registered as `en`.

use std::sync::Arc;

use ahash::AHashMap;

/// Map from locale tag to a shared resource.
pub struct LocaleMap<T: ?Sized> {
    resources: AHashMap<String, Arc<T>>,
}

impl<T: ?Sized> LocaleMap<T> {
    /// Create an empty map.
    pub fn new() -> Self {
        LocaleMap {
            resources: AHashMap::new(),
        }
    }

    /// Register a resource for a locale, replacing any previous one.
    pub fn insert(&mut self, locale: impl Into<String>, resource: Arc<T>) {
        self.resources.insert(locale.into().to_lowercase(), resource);
    }

    /// Resolve the resource for a locale.
    pub fn get(&self, locale: &str) -> Option<&Arc<T>> {
        let locale = locale.to_lowercase();
        self.resources
            .get(&locale)
            .or_else(|| self.resources.get(primary_subtag(&locale)))
    }

    /// Whether a resource resolves for this locale.
    pub fn contains(&self, locale: &str) -> bool {
        self.get(locale).is_some()
    }

    /// Registered locale tags.
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }
}

impl<T: ?Sized> Default for LocaleMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for LocaleMap<T> {
    fn clone(&self) -> Self {
        LocaleMap {
            resources: self.resources.clone(),
        }
    }
}

impl<T: ?Sized> std::fmt::Debug for LocaleMap<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut locales: Vec<_> = self.locales().collect();
        locales.sort_unstable();
        f.debug_struct("LocaleMap")
            .field("locales", &locales)
            .finish()
    }
}

/// Primary language subtag of a locale tag (`pt-BR` -> `pt`).
pub fn primary_subtag(locale: &str) -> &str {
    locale
        .split(['-', '_'])
        .next()
        .unwrap_or(locale)
}
