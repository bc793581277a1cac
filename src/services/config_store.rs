//! Per-board configuration option store
//!
//! Options are cached in storage per FQBN and installed package version,
//! since a board can expose a different option set in another core
//! version. Empty option lists are never cached: a later package install
//! must trigger a fresh fetch.

use std::sync::Arc;
use tokio::sync::broadcast;

use crate::errors::Result;
use crate::models::{BoardsEvent, BoardsPackage, ConfigOption};
use crate::services::BoardsService;
use crate::storage::Storage;

const CONFIG_OPTIONS_KEY_PREFIX: &str = "configOptions";

/// Storage key for the options of `fqbn` in package `version`
pub fn config_options_key(version: &str, fqbn: &str) -> String {
    format!("{}-{}-{}", CONFIG_OPTIONS_KEY_PREFIX, version, fqbn)
}

/// "Select `selected_value` for `option` on board `fqbn`"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSelection {
    pub fqbn: String,
    pub option: String,
    pub selected_value: String,
}

impl ConfigSelection {
    pub fn new(
        fqbn: impl Into<String>,
        option: impl Into<String>,
        selected_value: impl Into<String>,
    ) -> Self {
        Self {
            fqbn: fqbn.into(),
            option: option.into(),
            selected_value: selected_value.into(),
        }
    }
}

/// Board configuration store
pub struct BoardsConfigStore {
    backend: Arc<dyn BoardsService>,
    storage: Storage,
    events: broadcast::Sender<BoardsEvent>,
}

impl BoardsConfigStore {
    pub fn new(
        backend: Arc<dyn BoardsService>,
        storage: Storage,
        events: broadcast::Sender<BoardsEvent>,
    ) -> Self {
        Self {
            backend,
            storage,
            events,
        }
    }

    /// `version` if given, otherwise the installed version of the package
    /// containing `fqbn`. `None` when that package is not installed.
    pub async fn resolve_version(&self, fqbn: &str, version: Option<&str>) -> Result<Option<String>> {
        if let Some(version) = version {
            return Ok(Some(version.to_string()));
        }
        let pkg = self.backend.get_container_board_package(fqbn).await?;
        Ok(pkg.and_then(|pkg| pkg.installed_version))
    }

    /// Options of `fqbn`, fetched from the backend on a cache miss
    pub async fn get_config(&self, fqbn: &str, version: Option<&str>) -> Result<Vec<ConfigOption>> {
        let Some(version) = self.resolve_version(fqbn, version).await? else {
            log::debug!("No installed package for {}, no config options", fqbn);
            return Ok(Vec::new());
        };
        self.get_config_for_version(fqbn, &version).await
    }

    /// Options of `fqbn` ordered by label, as listed in menus
    pub async fn get_config_by_label(
        &self,
        fqbn: &str,
        version: Option<&str>,
    ) -> Result<Vec<ConfigOption>> {
        let mut options = self.get_config(fqbn, version).await?;
        options.sort_by(ConfigOption::label_compare);
        Ok(options)
    }

    async fn get_config_for_version(&self, fqbn: &str, version: &str) -> Result<Vec<ConfigOption>> {
        let key = config_options_key(version, fqbn);
        if let Some(options) = self.storage.get_data::<Vec<ConfigOption>>(&key).await? {
            return Ok(options);
        }
        self.fetch_config(fqbn, &key).await
    }

    async fn fetch_config(&self, fqbn: &str, key: &str) -> Result<Vec<ConfigOption>> {
        let details = self.backend.get_board_details(fqbn).await?;
        let options = details.config_options;
        if !options.is_empty() {
            self.storage.set_data(key, &options).await?;
            log::debug!("Cached {} config option(s) for {}", options.len(), fqbn);
        }
        Ok(options)
    }

    /// Select one value of an option.
    ///
    /// Returns `false` if the package is not installed, the option is
    /// unknown, or the value is not one of the option's values.
    pub async fn set_selected(&self, selection: &ConfigSelection, version: Option<&str>) -> Result<bool> {
        let Some(version) = self.resolve_version(&selection.fqbn, version).await? else {
            return Ok(false);
        };

        let mut options = self.get_config_for_version(&selection.fqbn, &version).await?;
        let Some(index) = options
            .iter()
            .position(|option| option.option == selection.option)
        else {
            return Ok(false);
        };
        let Some(updated) = options[index].with_selected(&selection.selected_value) else {
            return Ok(false);
        };
        options[index] = updated;

        self.storage
            .set_data(&config_options_key(&version, &selection.fqbn), &options)
            .await?;
        log::info!(
            "Selected {}={} for {}",
            selection.option,
            selection.selected_value,
            selection.fqbn
        );
        let _ = self
            .events
            .send(BoardsEvent::ConfigOptionsChanged(vec![selection.fqbn.clone()]));
        Ok(true)
    }

    /// `fqbn` decorated with the selected option values
    pub async fn append_config_to_fqbn(&self, fqbn: &str, version: Option<&str>) -> Result<String> {
        let options = self.get_config(fqbn, version).await?;
        ConfigOption::decorate(fqbn, &options, true)
    }

    /// Populate the cache for every board of a freshly installed package.
    ///
    /// Returns the FQBNs whose options were cached. A failed fetch leaves
    /// that board without options and does not stop the others.
    pub async fn on_board_installed(&self, pkg: &BoardsPackage) -> Result<Vec<String>> {
        let Some(version) = pkg.installed_version.as_deref() else {
            return Ok(Vec::new());
        };

        let mut cached = Vec::new();
        for fqbn in pkg.boards.iter().filter_map(|board| board.fqbn.as_deref()) {
            let key = config_options_key(version, fqbn);
            if self.storage.contains(&key).await? {
                continue;
            }
            match self.fetch_config(fqbn, &key).await {
                Ok(options) if !options.is_empty() => cached.push(fqbn.to_string()),
                Ok(_) => {}
                Err(e) => log::warn!("Failed to fetch config options for {}: {}", fqbn, e),
            }
        }

        if !cached.is_empty() {
            let _ = self
                .events
                .send(BoardsEvent::ConfigOptionsChanged(cached.clone()));
        }
        Ok(cached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_options_key_includes_version() {
        assert_eq!(
            config_options_key("1.8.2", "arduino:avr:uno"),
            "configOptions-1.8.2-arduino:avr:uno"
        );
        assert_ne!(
            config_options_key("1.8.2", "arduino:avr:uno"),
            config_options_key("1.8.3", "arduino:avr:uno")
        );
    }
}
