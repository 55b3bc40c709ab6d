//! Functions callable from templates as `{{ name }}`

use std::collections::BTreeMap;
use std::fmt;

use chrono::Local;

/// RFC 1123 with a numeric zone, as used in `debian/changelog`
pub const CHANGELOG_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

type Helper = Box<dyn Fn() -> String + Send + Sync>;

/// Named zero-argument template functions
pub struct HelperRegistry {
    helpers: BTreeMap<String, Helper>,
}

impl HelperRegistry {
    /// Registry without any helpers
    pub fn empty() -> Self {
        Self { helpers: BTreeMap::new() }
    }

    /// Registry with the built-in helpers (`date`)
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register("date", || Local::now().format(CHANGELOG_DATE_FORMAT).to_string());
        registry
    }

    /// Add or replace a helper
    pub fn register<F>(&mut self, name: impl Into<String>, helper: F)
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.helpers.insert(name.into(), Box::new(helper));
    }

    /// Invoke `name`, `None` when not registered
    pub fn call(&self, name: &str) -> Option<String> {
        self.helpers.get(name).map(|helper| helper())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }
}

impl Default for HelperRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for HelperRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HelperRegistry")
            .field("helpers", &self.helpers.keys().collect::<Vec<_>>())
            .finish()
    }
}
