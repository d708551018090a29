use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, SequenceError};
use crate::sequence::{MarkerSequence, Preset, parse_marker};

/// Persisted user settings.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Settings {
    pub markers: MarkerSequence,
}

/// On-disk layout. Markers are stored as one-character strings.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    basic_checkbox_chars: Option<Vec<String>>,
}

impl Settings {
    fn from_file(file: SettingsFile) -> Self {
        let Some(raw) = file.basic_checkbox_chars else {
            return Self::default();
        };
        let markers = raw
            .iter()
            .filter_map(|value| match parse_marker(value) {
                Ok(marker) => Some(marker),
                Err(err) => {
                    tracing::warn!(%err, "dropping stored marker");
                    None
                }
            })
            .collect::<Vec<_>>();
        Self {
            markers: MarkerSequence::new(markers).unwrap_or_default(),
        }
    }

    fn to_file(&self) -> SettingsFile {
        SettingsFile {
            basic_checkbox_chars: Some(self.markers.iter().map(String::from).collect()),
        }
    }

    /// Parse settings from JSON text, defaulting absent fields.
    ///
    /// # Errors
    /// Returns an error if the text is not a JSON object of the expected shape.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str::<SettingsFile>(text).map(Self::from_file)
    }

    /// Render settings as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.to_file())
    }
}

/// Where settings are loaded from and saved to.
pub trait SettingsStore {
    /// Load settings, falling back to defaults when nothing is stored.
    ///
    /// # Errors
    /// Returns an error if stored settings exist but cannot be read.
    fn load(&self) -> Result<Settings, ConfigError>;

    /// Persist `settings`, replacing whatever was stored.
    ///
    /// # Errors
    /// Returns an error if the settings cannot be written.
    fn save(&self, settings: &Settings) -> Result<(), ConfigError>;
}

/// Settings stored as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> ConfigError {
        ConfigError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn json_error(&self, source: serde_json::Error) -> ConfigError {
        ConfigError::Json {
            path: self.path.clone(),
            source,
        }
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self) -> Result<Settings, ConfigError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no settings file, using defaults");
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        Settings::from_json(&content).map_err(|e| self.json_error(e))
    }

    fn save(&self, settings: &Settings) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let json = settings.to_json().map_err(|e| self.json_error(e))?;
        fs::write(&self.path, format!("{json}\n")).map_err(|e| self.io_error(e))
    }
}

/// Settings kept in memory, for hosts that persist elsewhere and for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: RefCell<Option<Settings>>,
    saves: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last saved settings, if any.
    pub fn saved(&self) -> Option<Settings> {
        self.saved.borrow().clone()
    }

    /// Number of times `save` has been called.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<Settings, ConfigError> {
        Ok(self.saved().unwrap_or_default())
    }

    fn save(&self, settings: &Settings) -> Result<(), ConfigError> {
        *self.saved.borrow_mut() = Some(settings.clone());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

/// Owns the in-memory settings and writes them back after every edit.
///
/// Each edit is applied in memory first, so later reads see it even when
/// persisting fails.
#[derive(Debug)]
pub struct SettingsManager<S> {
    store: S,
    settings: Settings,
}

impl<S: SettingsStore> SettingsManager<S> {
    /// Load settings from `store`.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn load(store: S) -> Result<Self, ConfigError> {
        let settings = store.load()?;
        Ok(Self { store, settings })
    }

    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    pub const fn markers(&self) -> &MarkerSequence {
        &self.settings.markers
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// # Errors
    /// Returns an error if the marker is invalid or saving fails.
    pub fn append(&mut self, value: &str) -> Result<(), ConfigError> {
        let marker = parse_marker(value)?;
        self.edit(|markers| markers.append(marker))
    }

    /// # Errors
    /// Returns an error if the index is invalid or saving fails.
    pub fn remove_at(&mut self, index: usize) -> Result<char, ConfigError> {
        self.edit(|markers| markers.remove_at(index))
    }

    /// # Errors
    /// Returns an error if either index is invalid or saving fails.
    pub fn move_to(&mut self, from: usize, to: usize) -> Result<(), ConfigError> {
        self.edit(|markers| markers.move_to(from, to))
    }

    /// # Errors
    /// Returns an error if the index or value is invalid or saving fails.
    pub fn replace_at(&mut self, index: usize, value: &str) -> Result<char, ConfigError> {
        self.edit(|markers| markers.replace_at(index, value))
    }

    /// Replace the whole sequence with a built-in preset.
    ///
    /// # Errors
    /// Returns an error if saving fails.
    pub fn reset(&mut self, preset: Preset) -> Result<(), ConfigError> {
        self.edit(|markers| {
            *markers = MarkerSequence::from_preset(preset);
            Ok(())
        })
    }

    fn edit<T>(
        &mut self,
        op: impl FnOnce(&mut MarkerSequence) -> Result<T, SequenceError>,
    ) -> Result<T, ConfigError> {
        let value = op(&mut self.settings.markers)?;
        self.store.save(&self.settings)?;
        Ok(value)
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata)
                .join("checkcycle")
                .join("settings.json");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("checkcycle")
                .join("settings.json");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg)
                .join("checkcycle")
                .join("settings.json");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("checkcycle")
                .join("settings.json");
        }
    }

    PathBuf::from(".checkcycle.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::BASIC_MARKERS;
    use tempfile::tempdir;

    #[test]
    fn test_missing_field_uses_defaults() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings.markers.items(), &BASIC_MARKERS);
    }

    #[test]
    fn test_empty_text_uses_defaults() {
        let settings = Settings::from_json("  \n").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_stored_order_is_kept() {
        let settings = Settings::from_json(r#"{"basicCheckboxChars": ["x", " ", "/"]}"#).unwrap();
        assert_eq!(settings.markers.items(), &['x', ' ', '/']);
    }

    #[test]
    fn test_invalid_stored_entries_are_dropped() {
        let settings =
            Settings::from_json(r#"{"basicCheckboxChars": [" ", "", "ab", "x"]}"#).unwrap();
        assert_eq!(settings.markers.items(), &[' ', 'x']);
    }

    #[test]
    fn test_stored_empty_list_stays_empty() {
        let settings = Settings::from_json(r#"{"basicCheckboxChars": []}"#).unwrap();
        assert!(settings.markers.is_empty());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let settings =
            Settings::from_json(r#"{"basicCheckboxChars": ["x"], "theme": "dark"}"#).unwrap();
        assert_eq!(settings.markers.items(), &['x']);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Settings::from_json("[1, 2").is_err());
    }

    #[test]
    fn test_json_uses_stored_field_name() {
        let json = Settings::default().to_json().unwrap();
        assert!(json.contains("\"basicCheckboxChars\""));
    }

    #[test]
    fn test_file_store_save_and_load() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("settings.json"));
        let settings = Settings {
            markers: MarkerSequence::new(['-', ' ', 'x']).unwrap(),
        };

        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap(), settings);

        // Saving again is idempotent.
        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap(), settings);
    }

    #[test]
    fn test_file_store_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("settings.json"));
        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_file_store_reports_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();
        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
    }

    // --- SettingsManager ---

    #[test]
    fn test_manager_persists_every_edit() {
        let mut manager = SettingsManager::load(MemoryStore::new()).unwrap();
        manager.append("?").unwrap();
        manager.move_to(6, 0).unwrap();
        manager.replace_at(1, "o").unwrap();
        manager.remove_at(2).unwrap();

        assert_eq!(manager.store().save_count(), 4);
        assert_eq!(manager.markers().items(), &['?', 'o', 'x', '-', '>', '<']);
        assert_eq!(manager.store().saved().as_ref(), Some(manager.settings()));
    }

    #[test]
    fn test_manager_rejected_edit_keeps_state_and_skips_save() {
        let mut manager = SettingsManager::load(MemoryStore::new()).unwrap();
        assert!(matches!(
            manager.replace_at(0, "xy"),
            Err(ConfigError::Sequence(SequenceError::InvalidValue { .. }))
        ));
        assert!(matches!(
            manager.remove_at(42),
            Err(ConfigError::Sequence(SequenceError::IndexOutOfRange { .. }))
        ));
        assert!(manager.append("").is_err());
        assert_eq!(manager.markers().items(), &BASIC_MARKERS);
        assert_eq!(manager.store().save_count(), 0);
    }

    #[test]
    fn test_manager_reset_to_preset() {
        let mut manager = SettingsManager::load(MemoryStore::new()).unwrap();
        manager.reset(Preset::Extended).unwrap();
        assert_eq!(manager.markers(), &MarkerSequence::from_preset(Preset::Extended));
    }

    #[test]
    fn test_manager_keeps_edit_when_save_fails() {
        let dir = tempdir().unwrap();
        // A directory where the file should be makes every write fail.
        let path = dir.path().join("settings.json");
        std::fs::create_dir(&path).unwrap();
        let store = JsonFileStore::new(&path);
        let mut manager = SettingsManager {
            store,
            settings: Settings::default(),
        };

        let err = manager.append("?").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert_eq!(manager.markers().items().last(), Some(&'?'));
    }
}
