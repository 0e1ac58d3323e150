//! TOML settings: an embedded default merged with an optional user file.

use std::path::{Path, PathBuf};

use fseq_master::DeviceId;
use serde::Deserialize;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

/// Environment variable naming a user config file.
pub const CONFIG_ENV: &str = "FSEQED_CONFIG";

#[derive(Deserialize, Default)]
struct ConfigFile {
    device_id: Option<u8>,
    undo_depth: Option<usize>,
    log_level: Option<String>,
    write_to_working_memory: Option<bool>,
}

impl ConfigFile {
    fn merge(&mut self, user: ConfigFile) {
        if user.device_id.is_some() {
            self.device_id = user.device_id;
        }
        if user.undo_depth.is_some() {
            self.undo_depth = user.undo_depth;
        }
        if user.log_level.is_some() {
            self.log_level = user.log_level;
        }
        if user.write_to_working_memory.is_some() {
            self.write_to_working_memory = user.write_to_working_memory;
        }
    }
}

pub struct Config {
    file: ConfigFile,
    /// Problems found while loading, reported once logging is up
    warnings: Vec<String>,
}

impl Config {
    /// Load the embedded defaults, then overlay `path` (or the file named by
    /// `FSEQED_CONFIG`). A missing, unreadable or malformed user file is
    /// ignored with a warning.
    pub fn load(path: Option<&Path>) -> Self {
        let mut warnings = Vec::new();
        let mut file: ConfigFile = toml::from_str(DEFAULT_CONFIG).unwrap_or_else(|e| {
            warnings.push(format!("embedded config.toml is invalid: {}", e));
            ConfigFile::default()
        });

        let user_path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        if let Some(path) = user_path {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                    Ok(user) => file.merge(user),
                    Err(e) => warnings
                        .push(format!("ignoring malformed config {}: {}", path.display(), e)),
                },
                Err(e) => {
                    warnings.push(format!("could not read config {}: {}", path.display(), e))
                }
            }
        }

        Config { file, warnings }
    }

    /// Log anything that went wrong in [`Config::load`].
    pub fn report(&self) {
        for warning in &self.warnings {
            log::warn!(target: "config", "{}", warning);
        }
        if let Some(id) = self.file.device_id {
            if DeviceId::new(id).is_none() {
                log::warn!(target: "config", "device_id {} out of range, using 1", id);
            }
        }
    }

    pub fn device_id(&self) -> DeviceId {
        self.file
            .device_id
            .and_then(DeviceId::new)
            .unwrap_or_default()
    }

    pub fn undo_depth(&self) -> usize {
        self.file.undo_depth.unwrap_or(64).max(1)
    }

    pub fn log_level(&self) -> &str {
        self.file.log_level.as_deref().unwrap_or("warn")
    }

    pub fn write_to_working_memory(&self) -> bool {
        self.file.write_to_working_memory.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn embedded_defaults() {
        let config = Config::load(Some(Path::new("/nonexistent/fseqed.toml")));
        assert_eq!(config.device_id(), DeviceId::default());
        assert_eq!(config.undo_depth(), 64);
        assert_eq!(config.log_level(), "warn");
        assert!(config.write_to_working_memory());
        assert_eq!(config.warnings.len(), 1);
    }

    #[test]
    fn user_file_overrides_some_keys() {
        let file = write_config("device_id = 4\nwrite_to_working_memory = false\n");
        let config = Config::load(Some(file.path()));
        assert_eq!(config.device_id().get(), 4);
        assert!(!config.write_to_working_memory());
        assert_eq!(config.undo_depth(), 64);
        assert!(config.warnings.is_empty());
    }

    #[test]
    fn invalid_device_id_falls_back() {
        let file = write_config("device_id = 16\n");
        let config = Config::load(Some(file.path()));
        assert_eq!(config.device_id(), DeviceId::default());
    }

    #[test]
    fn malformed_file_is_ignored() {
        let file = write_config("device_id = \"two\"\n[[[");
        let config = Config::load(Some(file.path()));
        assert_eq!(config.device_id(), DeviceId::default());
        assert_eq!(config.warnings.len(), 1);
    }
}
