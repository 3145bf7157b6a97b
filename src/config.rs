use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::error::{NotepadError, Result};
use crate::models::Config;

/// Debounce delay for config saves (1 second)
const SAVE_DEBOUNCE_MS: u64 = 1000;

/// ConfigManager handles loading, saving, and updating application configuration.
///
/// Features:
/// - Thread-safe access via RwLock
/// - Debounced saving to avoid excessive disk writes
/// - Merges saved config with defaults for missing fields
pub struct ConfigManager {
    /// The current configuration, shared with the debounced save task
    config: Arc<RwLock<Config>>,
    /// Path to the configuration file
    config_path: Arc<PathBuf>,
    /// Handle to the debounced save task
    save_handle: Mutex<Option<JoinHandle<()>>>,
    debounce: Duration,
}

impl ConfigManager {
    /// Creates a new ConfigManager with the given config file path.
    ///
    /// Loads existing configuration from disk, merging with defaults for any
    /// missing fields.
    ///
    /// # Arguments
    /// * `config_path` - Path to the config.json file
    ///
    /// # Returns
    /// * `Ok(ConfigManager)` - A new ConfigManager instance
    /// * `Err(NotepadError)` - If the file exists but cannot be read or parsed
    pub fn new(config_path: PathBuf) -> Result<Self> {
        let config = Self::load_from_file(&config_path)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_path: Arc::new(config_path),
            save_handle: Mutex::new(None),
            debounce: Duration::from_millis(SAVE_DEBOUNCE_MS),
        })
    }

    /// Overrides the save debounce delay.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Loads configuration from file, merging with defaults.
    ///
    /// A missing file yields the default configuration.
    fn load_from_file(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| NotepadError::storage(path, e))?;

        merge_config_with_defaults(&content).map_err(|e| {
            log::warn!("Failed to parse config {}: {}", path.display(), e);
            NotepadError::storage(
                path,
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })
    }

    /// Gets a clone of the current configuration.
    pub fn get(&self) -> Config {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Updates the configuration using a closure.
    ///
    /// Nothing is written to disk until [`ConfigManager::schedule_save`] or
    /// [`ConfigManager::save_sync`] is called.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Config),
    {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut config);
    }

    /// Schedules a debounced save operation.
    ///
    /// If a save is already scheduled, it is cancelled and a new one is
    /// scheduled after the debounce delay.
    pub async fn schedule_save(&self) {
        let mut handle_guard = self.save_handle.lock().await;

        // Cancel any existing save task
        if let Some(handle) = handle_guard.take() {
            handle.abort();
        }

        let config_ref = Arc::clone(&self.config);
        let path_ref = Arc::clone(&self.config_path);
        let debounce = self.debounce;

        let handle = tokio::spawn(async move {
            sleep(debounce).await;

            let config = config_ref
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();
            match serde_json::to_string_pretty(&config) {
                Ok(content) => {
                    if let Err(e) = fs::write(path_ref.as_path(), content) {
                        log::error!("Failed to write config {}: {}", path_ref.display(), e);
                    }
                }
                Err(e) => log::error!("Failed to serialize config: {}", e),
            }
        });

        *handle_guard = Some(handle);
    }

    /// Updates the configuration and schedules a debounced save.
    pub async fn update_and_save<F>(&self, f: F)
    where
        F: FnOnce(&mut Config),
    {
        self.update(f);
        self.schedule_save().await;
    }

    /// Saves the configuration to disk immediately.
    pub fn save_sync(&self) -> Result<()> {
        let config = self.get();

        let content = serde_json::to_string_pretty(&config).map_err(|e| {
            NotepadError::storage(
                self.config_path.as_path(),
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })?;

        fs::write(self.config_path.as_path(), content)
            .map_err(|e| NotepadError::storage(self.config_path.as_path(), e))
    }

    /// The configured notes root, if it was moved away from the default.
    pub fn notes_root(&self) -> Option<PathBuf> {
        self.get().notes_root
    }

    pub fn confirm_delete(&self) -> bool {
        self.get().confirm_delete
    }

    /// Bookmarked folders, relative to the notes root.
    pub fn bookmarks(&self) -> Vec<String> {
        self.get().bookmarks
    }

    /// Adds a bookmark unless it is already present.
    pub fn add_bookmark(&self, relative: impl Into<String>) {
        let relative = relative.into();
        self.update(|config| {
            if !config.bookmarks.contains(&relative) {
                config.bookmarks.push(relative);
            }
        });
    }

    /// Removes a bookmark; returns whether it was present.
    pub fn remove_bookmark(&self, relative: &str) -> bool {
        let mut removed = false;
        self.update(|config| {
            let before = config.bookmarks.len();
            config.bookmarks.retain(|b| b != relative);
            removed = config.bookmarks.len() != before;
        });
        removed
    }

    /// Returns the config file path.
    pub fn config_path(&self) -> &Path {
        self.config_path.as_path()
    }
}

/// Merges a partial config JSON with defaults.
///
/// Unknown keys are ignored and fields with the wrong type keep their
/// default, so older or hand-edited files still load.
///
/// # Arguments
/// * `partial_json` - JSON string with partial configuration
///
/// # Returns
/// * `Ok(Config)` - The merged configuration
/// * `Err(String)` - If the text is not JSON at all
pub fn merge_config_with_defaults(partial_json: &str) -> std::result::Result<Config, String> {
    if partial_json.trim().is_empty() {
        return Ok(Config::default());
    }

    let json_value: serde_json::Value = serde_json::from_str(partial_json)
        .map_err(|e| format!("Failed to parse config: {}", e))?;

    let mut config = Config::default();

    if let Some(obj) = json_value.as_object() {
        if let Some(v) = obj.get("notes_root") {
            config.notes_root = v.as_str().filter(|s| !s.is_empty()).map(PathBuf::from);
        }
        if let Some(v) = obj.get("bookmarks").and_then(|v| v.as_array()) {
            config.bookmarks = v
                .iter()
                .filter_map(|item| item.as_str().map(|s| s.to_string()))
                .collect();
        }
        if let Some(v) = obj.get("confirm_delete").and_then(|v| v.as_bool()) {
            config.confirm_delete = v;
        }
    }

    Ok(config)
}
