//! Recent searches and theme preference, kept in a [`KeyValueStore`].

use std::fmt;

use crate::{error::StoreError, store::KeyValueStore};

pub const RECENT_KEY: &str = "recentCities";
pub const THEME_KEY: &str = "theme";
pub const MAX_RECENT: usize = 5;

/// Most recent first. Unreadable stored values read as an empty list.
pub fn recent_searches<S: KeyValueStore + ?Sized>(store: &S) -> Result<Vec<String>, StoreError> {
    let Some(raw) = store.get(RECENT_KEY)? else {
        return Ok(Vec::new());
    };

    match serde_json::from_str::<Vec<String>>(&raw) {
        Ok(list) => Ok(list),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable recent searches");
            Ok(Vec::new())
        }
    }
}

/// Put `label` at the front unless it is already listed; keep at most five.
pub fn record_search<S: KeyValueStore + ?Sized>(
    store: &mut S,
    label: &str,
) -> Result<Vec<String>, StoreError> {
    let mut recent = recent_searches(&*store)?;
    if recent.iter().any(|c| c == label) {
        return Ok(recent);
    }

    recent.insert(0, label.to_string());
    recent.truncate(MAX_RECENT);
    store.set(RECENT_KEY, &serde_json::to_string(&recent)?)?;

    Ok(recent)
}

pub fn clear_searches<S: KeyValueStore + ?Sized>(store: &mut S) -> Result<(), StoreError> {
    store.remove(RECENT_KEY)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
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

/// Anything other than a stored `dark` means light.
pub fn theme<S: KeyValueStore + ?Sized>(store: &S) -> Result<Theme, StoreError> {
    Ok(match store.get(THEME_KEY)?.as_deref() {
        Some("dark") => Theme::Dark,
        _ => Theme::Light,
    })
}

pub fn set_theme<S: KeyValueStore + ?Sized>(store: &mut S, theme: Theme) -> Result<(), StoreError> {
    store.set(THEME_KEY, theme.as_str())
}

pub fn toggle_theme<S: KeyValueStore + ?Sized>(store: &mut S) -> Result<Theme, StoreError> {
    let next = theme(&*store)?.toggled();
    set_theme(store, next)?;
    Ok(next)
}
