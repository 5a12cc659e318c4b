//! Theme resolution and persistence.
//!
//! The current theme lives in two places: a durable key/value store (survives
//! reloads) and an attribute on the root document element (drives CSS).
//! [`ThemeManager`] owns both and is the only thing that writes them.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;

/// Durable store key holding the explicit user choice.
pub const STORAGE_KEY: &str = "theme";

/// Root element attribute read by every theme-dependent style rule.
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Media query consulted when no explicit choice is stored.
pub const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(anyhow!("unknown theme {other:?}; expected \"light\" or \"dark\"")),
        }
    }
}

/// Client-side durable key/value storage (e.g. `localStorage`).
pub trait PreferenceStore {
    fn load(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn save(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// The root markup element the theme attribute is applied to.
pub trait RootElement {
    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&mut self, name: &str, value: &str);
}

/// Host environment color-scheme signal. Read-only.
pub trait ColorSchemeQuery {
    fn prefers_dark(&self) -> anyhow::Result<bool>;
}

/// First match wins: a valid persisted choice, then the system signal, then light.
pub fn resolve_theme(persisted: Option<&str>, system_prefers_dark: bool) -> Theme {
    if let Some(theme) = persisted.and_then(|v| v.parse::<Theme>().ok()) {
        return theme;
    }
    if system_prefers_dark {
        Theme::Dark
    } else {
        Theme::Light
    }
}

pub struct ThemeManager<S, E> {
    store: S,
    root: E,
}

impl<S, E> ThemeManager<S, E>
where
    S: PreferenceStore,
    E: RootElement,
{
    /// Resolves the initial theme and applies it to `root`. Runs once per page load.
    pub fn bootstrap(store: S, root: E, system: &impl ColorSchemeQuery) -> Self {
        let mut manager = Self { store, root };
        let theme = manager.resolve(system);
        manager.apply(theme);
        tracing::debug!(%theme, "theme bootstrapped");
        manager
    }

    /// Computes the effective theme without touching the document.
    pub fn resolve(&self, system: &impl ColorSchemeQuery) -> Theme {
        let persisted = match self.store.load(STORAGE_KEY) {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!(error = %e, "theme store unreadable; ignoring stored preference");
                None
            }
        };
        if let Some(raw) = persisted.as_deref() {
            if raw.parse::<Theme>().is_err() {
                tracing::debug!(value = raw, "ignoring invalid stored theme");
            }
        }

        let prefers_dark = system.prefers_dark().unwrap_or_else(|e| {
            tracing::debug!(error = %e, "color scheme query failed; assuming light");
            false
        });

        resolve_theme(persisted.as_deref(), prefers_dark)
    }

    /// The theme currently applied on the root element.
    pub fn current_theme(&self) -> Theme {
        match self.root.attribute(THEME_ATTRIBUTE) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "root element carries an invalid theme");
                Theme::Light
            }),
            None => Theme::Light,
        }
    }

    /// Flips the applied theme and persists the new choice.
    pub fn toggle(&mut self) -> Theme {
        let next = self.current_theme().opposite();
        self.set(next);
        next
    }

    /// Applies `theme` and persists it as the explicit choice.
    ///
    /// A store write failure leaves the session themed but not persisted.
    pub fn set(&mut self, theme: Theme) {
        self.apply(theme);
        if let Err(e) = self.store.save(STORAGE_KEY, theme.as_str()) {
            tracing::warn!(error = %e, %theme, "theme preference not persisted");
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn root(&self) -> &E {
        &self.root
    }

    /// Tears the page down, handing the durable store back for a reload.
    pub fn into_store(self) -> S {
        self.store
    }

    fn apply(&mut self, theme: Theme) {
        self.root.set_attribute(THEME_ATTRIBUTE, theme.as_str());
    }
}

/// In-memory store. Reads and writes can be switched to fail.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::default();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }

    pub fn set_fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> anyhow::Result<Option<String>> {
        if self.fail_reads {
            anyhow::bail!("storage unavailable");
        }
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        if self.fail_writes {
            anyhow::bail!("storage unavailable");
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// In-memory root element.
#[derive(Debug, Default, Clone)]
pub struct MemoryElement {
    attributes: HashMap<String, String>,
}

impl RootElement for MemoryElement {
    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }
}

/// Fixed color-scheme answer; `None` models a host without the query.
#[derive(Debug, Clone, Copy)]
pub struct FixedColorScheme(pub Option<bool>);

impl ColorSchemeQuery for FixedColorScheme {
    fn prefers_dark(&self) -> anyhow::Result<bool> {
        self.0
            .ok_or_else(|| anyhow!("{DARK_SCHEME_QUERY} is not supported"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_page(store: MemoryStore, prefers_dark: bool) -> ThemeManager<MemoryStore, MemoryElement> {
        ThemeManager::bootstrap(
            store,
            MemoryElement::default(),
            &FixedColorScheme(Some(prefers_dark)),
        )
    }

    fn reload(
        page: ThemeManager<MemoryStore, MemoryElement>,
        prefers_dark: bool,
    ) -> ThemeManager<MemoryStore, MemoryElement> {
        load_page(page.into_store(), prefers_dark)
    }

    #[test]
    fn theme_parses_only_exact_names() {
        assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("Dark".parse::<Theme>().is_err());
        assert!("".parse::<Theme>().is_err());
        assert!(" light".parse::<Theme>().is_err());
        assert_eq!(Theme::Dark.to_string(), "dark");
    }

    #[test]
    fn resolution_table() {
        let cases = [
            (None, false, Theme::Light),
            (None, true, Theme::Dark),
            (Some("light"), false, Theme::Light),
            (Some("light"), true, Theme::Light),
            (Some("dark"), false, Theme::Dark),
            (Some("dark"), true, Theme::Dark),
        ];
        for (persisted, system, expected) in cases {
            assert_eq!(
                resolve_theme(persisted, system),
                expected,
                "persisted={persisted:?} system={system}"
            );

            let store = match persisted {
                Some(v) => MemoryStore::with_entry(STORAGE_KEY, v),
                None => MemoryStore::new(),
            };
            let page = load_page(store, system);
            assert_eq!(page.current_theme(), expected);
            assert_eq!(
                page.root().attribute(THEME_ATTRIBUTE).as_deref(),
                Some(expected.as_str())
            );
        }
    }

    #[test]
    fn invalid_stored_value_falls_through_to_system() {
        let page = load_page(MemoryStore::with_entry(STORAGE_KEY, "sepia"), true);
        assert_eq!(page.current_theme(), Theme::Dark);
    }

    #[test]
    fn bootstrap_does_not_write_the_store() {
        let page = load_page(MemoryStore::new(), true);
        assert_eq!(page.store().get(STORAGE_KEY), None);
    }

    #[test]
    fn unreadable_store_falls_back_to_system() {
        let mut store = MemoryStore::with_entry(STORAGE_KEY, "light");
        store.set_fail_reads(true);
        let page = load_page(store, true);
        assert_eq!(page.current_theme(), Theme::Dark);
    }

    #[test]
    fn unavailable_query_means_light() {
        let page = ThemeManager::bootstrap(
            MemoryStore::new(),
            MemoryElement::default(),
            &FixedColorScheme(None),
        );
        assert_eq!(page.current_theme(), Theme::Light);
    }

    #[test]
    fn toggle_is_an_involution() {
        for start in [Theme::Light, Theme::Dark] {
            let mut page = load_page(MemoryStore::with_entry(STORAGE_KEY, start.as_str()), false);
            assert_eq!(page.toggle(), start.opposite());
            assert_eq!(page.toggle(), start);
            assert_eq!(page.current_theme(), start);
            assert_eq!(page.store().get(STORAGE_KEY), Some(start.as_str()));
        }
    }

    #[test]
    fn toggle_keeps_attribute_and_store_equal() {
        let mut page = load_page(MemoryStore::new(), true);
        for _ in 0..3 {
            let theme = page.toggle();
            assert_eq!(page.current_theme(), theme);
            assert_eq!(page.store().get(STORAGE_KEY), Some(theme.as_str()));
        }
    }

    #[test]
    fn set_persists_explicit_choice() {
        let mut page = load_page(MemoryStore::new(), false);
        page.set(Theme::Dark);
        assert_eq!(page.current_theme(), Theme::Dark);
        let page = reload(page, false);
        assert_eq!(page.current_theme(), Theme::Dark);
    }

    #[test]
    fn reload_after_toggle_reproduces_theme() {
        let mut page = load_page(MemoryStore::new(), false);
        let toggled = page.toggle();
        let page = reload(page, false);
        assert_eq!(page.current_theme(), toggled);
    }

    #[test]
    fn stored_choice_overrides_later_system_change() {
        let mut page = load_page(MemoryStore::new(), false);
        assert_eq!(page.toggle(), Theme::Dark);
        let page = reload(page, false);
        assert_eq!(page.current_theme(), Theme::Dark);

        let mut page = reload(page, true);
        assert_eq!(page.toggle(), Theme::Light);
        let page = reload(page, true);
        assert_eq!(page.current_theme(), Theme::Light);
    }

    #[test]
    fn failed_write_still_themes_the_session() {
        let mut store = MemoryStore::new();
        store.set_fail_writes(true);
        let mut page = load_page(store, false);
        assert_eq!(page.current_theme(), Theme::Light);

        assert_eq!(page.toggle(), Theme::Dark);
        assert_eq!(page.current_theme(), Theme::Dark);
        assert_eq!(page.store().get(STORAGE_KEY), None);

        let page = reload(page, false);
        assert_eq!(page.current_theme(), Theme::Light);
    }

    #[test]
    fn fresh_dark_visitor_toggles_and_reloads() {
        let mut page = load_page(MemoryStore::new(), true);
        assert_eq!(page.current_theme(), Theme::Dark);

        assert_eq!(page.toggle(), Theme::Light);
        assert_eq!(page.store().get(STORAGE_KEY), Some("light"));

        let page = reload(page, true);
        assert_eq!(page.current_theme(), Theme::Light);
    }
}
