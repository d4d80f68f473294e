// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Filesystem-backed `SettingsStore` for qrlogic tools (uses platform config dir).

use directories::ProjectDirs;
use qrlogic_app_core::{SettingsError, SettingsStore};
use std::fs;
use std::path::{Path, PathBuf};

/// Store settings as JSON files, one per key, under a base directory.
#[derive(Debug, Clone)]
pub struct FsSettingsStore {
    base: PathBuf,
}

impl FsSettingsStore {
    /// Store rooted at the user config directory (e.g., `~/.config/qrlogic`).
    pub fn new() -> Result<Self, SettingsError> {
        let proj = ProjectDirs::from("dev", "flyingrobots", "qrlogic")
            .ok_or_else(|| SettingsError::Other("could not resolve config dir".into()))?;
        Self::at(proj.config_dir())
    }

    /// Store rooted at `base`, created if missing.
    pub fn at(base: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let base = base.as_ref().to_path_buf();
        fs::create_dir_all(&base)?;
        Ok(Self { base })
    }

    /// Directory holding the files.
    pub fn base(&self) -> &Path {
        &self.base
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, SettingsError> {
        let plain = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !plain {
            return Err(SettingsError::Other(format!("invalid settings key {key:?}")));
        }
        Ok(self.base.join(format!("{key}.json")))
    }
}

impl SettingsStore for FsSettingsStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, SettingsError> {
        let path = self.path_for(key)?;
        match fs::read(path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(SettingsError::NotFound),
            Err(err) => Err(SettingsError::Io(err)),
        }
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), SettingsError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.base)?;
        fs::write(path, data)?;
        Ok(())
    }
}
