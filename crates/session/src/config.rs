//! Session settings: TOML file first, then environment overrides.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chess_core::Color;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::session::Mode;

pub const DEFAULT_CONFIG_PATH: &str = "chess.toml";

/// Delay before the computer plays, long enough to read as "thinking".
pub const DEFAULT_COMPUTER_DELAY_MS: u64 = 300;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub computer_delay_ms: u64,
    /// Mode to start in; `None` leaves the session idle until one is chosen.
    pub mode: Option<Mode>,
    pub player_color: Color,
    /// Fixed seed for the random opponent.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            computer_delay_ms: DEFAULT_COMPUTER_DELAY_MS,
            mode: None,
            player_color: Color::White,
            seed: None,
        }
    }
}

impl SessionConfig {
    pub fn computer_delay(&self) -> Duration {
        Duration::from_millis(self.computer_delay_ms)
    }

    pub fn from_toml_str(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(raw) => {
                debug!(path = %path.display(), "loaded session config");
                Self::from_toml_str(&raw, path)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// `load` followed by overrides from the process environment.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `CHESS_*` overrides looked up through `lookup`.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(v) = lookup("CHESS_COMPUTER_DELAY_MS") {
            self.computer_delay_ms = parse_value("CHESS_COMPUTER_DELAY_MS", &v)?;
        }
        if let Some(v) = lookup("CHESS_PLAYER_COLOR") {
            self.player_color = parse_value("CHESS_PLAYER_COLOR", &v)?;
        }
        if let Some(v) = lookup("CHESS_MODE") {
            self.mode = Some(parse_value("CHESS_MODE", &v)?);
        }
        if let Some(v) = lookup("CHESS_SEED") {
            self.seed = Some(parse_value("CHESS_SEED", &v)?);
        }
        Ok(())
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = SessionConfig::from_toml_str("", Path::new("chess.toml")).unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.computer_delay(), Duration::from_millis(300));
    }

    #[test]
    fn parses_all_fields() {
        let raw = r#"
            computer_delay_ms = 50
            mode = "computer"
            player_color = "black"
            seed = 9
        "#;
        let config = SessionConfig::from_toml_str(raw, Path::new("chess.toml")).unwrap();
        assert_eq!(
            config,
            SessionConfig {
                computer_delay_ms: 50,
                mode: Some(Mode::VsComputer),
                player_color: Color::Black,
                seed: Some(9),
            }
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = SessionConfig::from_toml_str("depth = 4", Path::new("chess.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_default() {
        let path = std::env::temp_dir().join("chess_session_config_that_does_not_exist.toml");
        assert_eq!(SessionConfig::load(&path).unwrap(), SessionConfig::default());
    }

    #[test]
    fn env_overrides_file() {
        let env: HashMap<&str, &str> = [
            ("CHESS_COMPUTER_DELAY_MS", "10"),
            ("CHESS_PLAYER_COLOR", "Black"),
            ("CHESS_MODE", "friend"),
        ]
        .into_iter()
        .collect();

        let mut config = SessionConfig::default();
        config
            .apply_env(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.computer_delay_ms, 10);
        assert_eq!(config.player_color, Color::Black);
        assert_eq!(config.mode, Some(Mode::LocalTwoPlayer));
        assert_eq!(config.seed, None);
    }

    #[test]
    fn bad_env_value_is_an_error() {
        let mut config = SessionConfig::default();
        let err = config
            .apply_env(|k| (k == "CHESS_COMPUTER_DELAY_MS").then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "CHESS_COMPUTER_DELAY_MS"));
    }
}
