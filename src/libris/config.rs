use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_DATA_FILENAME: &str = "library.dat";
const DEFAULT_CURRENCY: &str = "$";

/// Configuration for the libris binary, stored as config.json next to the
/// data file. The core library never reads it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LibrisConfig {
    /// Override for the dump file location; relative paths resolve against
    /// the data directory.
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// Symbol used when rendering fines.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Default for LibrisConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl LibrisConfig {
    /// Load config from the given directory, or return defaults if not found.
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);
        if !config_path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&config_path)?;
        let config: LibrisConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// Where the dump lives, given the resolved data directory.
    pub fn data_file_path(&self, data_dir: &Path) -> PathBuf {
        match &self.data_file {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => data_dir.join(path),
            None => data_dir.join(DEFAULT_DATA_FILENAME),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = LibrisConfig::load(dir.path()).unwrap();
        assert_eq!(config, LibrisConfig::default());
        assert_eq!(config.currency, "$");
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = LibrisConfig {
            data_file: Some(PathBuf::from("branch.dat")),
            currency: "€".to_string(),
        };
        config.save(dir.path()).unwrap();

        let loaded = LibrisConfig::load(dir.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn data_file_resolution() {
        let dir = Path::new("/var/lib/libris");
        let config = LibrisConfig::default();
        assert_eq!(config.data_file_path(dir), dir.join("library.dat"));

        let relative = LibrisConfig {
            data_file: Some(PathBuf::from("branch.dat")),
            ..Default::default()
        };
        assert_eq!(relative.data_file_path(dir), dir.join("branch.dat"));

        let absolute = LibrisConfig {
            data_file: Some(PathBuf::from("/srv/lib.dat")),
            ..Default::default()
        };
        assert_eq!(absolute.data_file_path(dir), PathBuf::from("/srv/lib.dat"));
    }
}
