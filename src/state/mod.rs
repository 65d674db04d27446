//! Persistent state shared by the extension's components
//!
//! The settings store is the only state outside a page or the controller.
//! Pages read the persistence flag from it when they start and again every
//! time copy mode is triggered; the options surface writes it.

pub mod config;

use crate::Result;
use config::Config;
use log::{debug, warn};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Key-value settings persistence
pub trait SettingsStore: Send + Sync {
    /// Does copy mode survive more than one link click?
    fn persistent_mode(&self) -> bool;

    fn set_persistent_mode(&self, persistent: bool) -> Result<()>;
}

/// Settings held in memory only
#[derive(Debug, Default)]
pub struct MemorySettings {
    persistent: AtomicBool,
}

impl MemorySettings {
    pub fn new(persistent: bool) -> Self {
        Self {
            persistent: AtomicBool::new(persistent),
        }
    }
}

impl SettingsStore for MemorySettings {
    fn persistent_mode(&self) -> bool {
        self.persistent.load(Ordering::Relaxed)
    }

    fn set_persistent_mode(&self, persistent: bool) -> Result<()> {
        self.persistent.store(persistent, Ordering::Relaxed);
        Ok(())
    }
}

/// Settings backed by the INI config file
///
/// Every read reloads the file so a change saved by another process is seen
/// on the next trigger. If the file is gone or the reload fails the last good
/// value is used; reads never create the file.
pub struct FileSettings {
    path: PathBuf,
    cached: Mutex<Config>,
}

impl FileSettings {
    pub fn new(config: Config) -> Self {
        Self {
            path: config.path().to_path_buf(),
            cached: Mutex::new(config),
        }
    }
}

impl SettingsStore for FileSettings {
    fn persistent_mode(&self) -> bool {
        let Ok(mut cached) = self.cached.lock() else {
            return false;
        };
        if self.path.exists() {
            match Config::load_from(&self.path) {
                Ok(fresh) => *cached = fresh,
                Err(e) => warn!("Could not reload settings, using cached values: {}", e),
            }
        }
        cached.persistent_mode()
    }

    fn set_persistent_mode(&self, persistent: bool) -> Result<()> {
        let mut cached = self
            .cached
            .lock()
            .map_err(|_| crate::LinkTextError::Config("settings lock poisoned".into()))?;
        cached.set_persistent_mode(persistent);
        debug!("Persistent mode set to {}", persistent);
        cached.save()
    }
}
