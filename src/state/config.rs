//! Configuration management

use crate::{LinkTextError, Result};
use ini::Ini;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Who owns the copy mode flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeOwnership {
    /// Every page keeps its own armed/idle state (per tab)
    Page,
    /// The controller keeps one flag and pushes it to pages (global toggle)
    Global,
}

impl ModeOwnership {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeOwnership::Page => "page",
            ModeOwnership::Global => "global",
        }
    }
}

/// Persistent extension settings
///
/// Backed by an INI file (`~/.linktext.cfg` unless loaded from elsewhere).
pub struct Config {
    /// INI configuration storage
    ini: Ini,

    /// Config file path
    path: PathBuf,

    /// Keyboard shortcut bindings (command id -> shortcut)
    pub commands: HashMap<String, String>,
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load configuration from `path`, writing defaults there if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", path);

        let ini = if path.exists() {
            Ini::load_from_file(path)
                .map_err(|e| LinkTextError::IniParse(format!("Failed to load config: {}", e)))?
        } else {
            info!("Config file not found, creating default");
            let default = Self::default_config();
            default
                .write_to_file(path)
                .map_err(|e| LinkTextError::IniParse(format!("Failed to write config: {}", e)))?;
            default
        };

        let mut config = Self {
            ini,
            path: path.to_path_buf(),
            commands: HashMap::new(),
        };
        config.parse_commands();

        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        debug!("Saving config to {:?}", self.path);
        self.ini
            .write_to_file(&self.path)
            .map_err(|e| LinkTextError::Config(format!("Failed to save config: {}", e)))
    }

    /// Default config file path (~/.linktext.cfg)
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".linktext.cfg")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn default_config() -> Ini {
        let mut ini = Ini::new();

        ini.with_section(Some("behavior"))
            .set("persistent_mode", "false")
            .set("mode_ownership", "page")
            .set("notification_ms", "1500");

        ini.with_section(Some("commands"))
            .set(crate::input::TRIGGER_COPY_MODE, "Alt+Shift+C");

        ini
    }

    fn parse_commands(&mut self) {
        if let Some(section) = self.ini.section(Some("commands")) {
            for (command, shortcut) in section.iter() {
                self.commands.insert(command.to_string(), shortcut.to_string());
            }
        }
        debug!("Loaded {} command bindings", self.commands.len());
    }

    pub fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    pub fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        self.ini
            .get_from(Some(section), key)
            .unwrap_or(default)
            .to_string()
    }

    pub fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Set a value in config (not saved until [`Config::save`])
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.ini.with_section(Some(section)).set(key, value);
        if section == "commands" {
            self.commands.insert(key.to_string(), value.to_string());
        }
    }

    /// Does copy mode stay armed after copying a link?
    pub fn persistent_mode(&self) -> bool {
        self.get_bool("behavior", "persistent_mode", false)
    }

    pub fn set_persistent_mode(&mut self, persistent: bool) {
        self.set("behavior", "persistent_mode", if persistent { "true" } else { "false" });
    }

    /// Whether mode state lives in each page or in the controller
    pub fn mode_ownership(&self) -> ModeOwnership {
        match self.get_string("behavior", "mode_ownership", "page").trim() {
            "global" => ModeOwnership::Global,
            "page" => ModeOwnership::Page,
            other => {
                warn!("Unknown mode_ownership {:?}, using page", other);
                ModeOwnership::Page
            }
        }
    }

    /// How long a notification stays on screen
    pub fn notification_duration(&self) -> Duration {
        let ms = self.get_int("behavior", "notification_ms", 1500).clamp(100, 60_000);
        Duration::from_millis(ms as u64)
    }
}
