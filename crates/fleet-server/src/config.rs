use std::net::SocketAddr;
use std::path::Path;

use fleet_types::DEFAULT_BRANCH_CAPACITY;
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Capacity given to branches created without one.
    pub default_branch_capacity: u32,
    pub postcode: PostcodeConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            default_branch_capacity: DEFAULT_BRANCH_CAPACITY,
            postcode: PostcodeConfig::default(),
        }
    }
}

/// Where and how branch postcodes are checked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostcodeConfig {
    /// When `false`, every postcode is accepted without a remote call.
    pub enabled: bool,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for PostcodeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.postcodes.io".into(),
            timeout_secs: 5,
        }
    }
}

impl ServerConfig {
    /// Read a TOML config file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&raw)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> ServerResult<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| ServerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> ServerResult<String> {
        toml::to_string_pretty(self).map_err(|e| ServerError::Config(e.to_string()))
    }

    fn validate(&self) -> ServerResult<()> {
        if self.default_branch_capacity == 0 {
            return Err(ServerError::Config(
                "default_branch_capacity must be at least 1".into(),
            ));
        }
        if self.postcode.enabled && self.postcode.timeout_secs == 0 {
            return Err(ServerError::Config(
                "postcode.timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(c.default_branch_capacity, 10);
        assert!(c.postcode.enabled);
        assert_eq!(c.postcode.base_url, "https://api.postcodes.io");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let c = ServerConfig::from_toml(
            r#"
            bind_addr = "0.0.0.0:9000"

            [postcode]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(c.bind_addr.port(), 9000);
        assert!(!c.postcode.enabled);
        assert_eq!(c.postcode.timeout_secs, 5);
        assert_eq!(c.default_branch_capacity, 10);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = ServerConfig::from_toml("default_branch_capacity = 0").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn round_trips_through_toml() {
        let c = ServerConfig::default();
        let back = ServerConfig::from_toml(&c.to_toml().unwrap()).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_branch_capacity = 4").unwrap();
        let c = ServerConfig::load(file.path()).unwrap();
        assert_eq!(c.default_branch_capacity, 4);

        assert!(matches!(
            ServerConfig::load(file.path().with_extension("missing")).unwrap_err(),
            ServerError::Io(_)
        ));
    }
}
