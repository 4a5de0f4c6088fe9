#![forbid(unsafe_code)]

mod door;
mod error;

pub use door::{DoorSettings, ticks};
pub use error::Error;

use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub door: DoorSettings,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config file on top of the defaults.
    ///
    /// Keys missing from the file keep their default value.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, Error> {
        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::string(contents))
            .extract()
            .map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        self.door.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{io::Write, time::Duration};
    use tempfile::NamedTempFile;

    #[test]
    fn load_reads_door_section() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[door]\ntimeout = 100\ntick = 1").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.door.timeout, 100);
        assert_eq!(config.door.tick, Duration::from_millis(1));
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = Config::from_toml("[door]\ntimeout = 3").unwrap();
        assert_eq!(config.door.timeout, 3);
        assert_eq!(config.door.tick, DoorSettings::default().tick);

        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::new());
    }

    #[test]
    fn zero_timeout_fails_to_load() {
        let err = Config::from_toml("[door]\ntimeout = 0").unwrap_err();
        assert!(matches!(err, Error::Invalid(_)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Config::from_toml("[door\ntimeout = ").unwrap_err();
        assert!(matches!(err, Error::Figment(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
