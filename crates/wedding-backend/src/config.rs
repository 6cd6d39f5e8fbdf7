use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use wedding_common::store::GUESTS_FILE_NAME;

use crate::error::AppError;

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8000";

/// Application configuration loaded once from environment variables at startup.
#[derive(Clone)]
pub struct Config {
    /// Shared secret expected in the `Authorization` header. `None` rejects every request.
    pub api_key: Option<String>,
    /// Directory holding `guests.json`.
    pub data_dir: PathBuf,
    pub listen_addr: SocketAddr,
}

impl Config {
    /// Optional:
    /// - `WEDDING_API_KEY` (unset or empty disables all protected endpoints)
    /// - `DATA_DIR` (default: the workspace root this binary was built from)
    /// - `WEDDING_LISTEN_ADDR` (default: "127.0.0.1:8000")
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let api_key = lookup("WEDDING_API_KEY").filter(|key| !key.is_empty());

        let data_dir = lookup("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let raw_addr =
            lookup("WEDDING_LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = raw_addr.parse().map_err(|e| {
            AppError::Config(format!("WEDDING_LISTEN_ADDR {raw_addr:?} is not a socket address: {e}"))
        })?;

        Ok(Self {
            api_key,
            data_dir,
            listen_addr,
        })
    }

    pub fn guests_file_path(&self) -> PathBuf {
        self.data_dir.join(GUESTS_FILE_NAME)
    }
}

/// Workspace root, two levels above this crate's manifest.
fn default_data_dir() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .ancestors()
        .nth(2)
        .unwrap_or(manifest_dir)
        .to_path_buf()
}

// The key never reaches logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("data_dir", &self.data_dir)
            .field("listen_addr", &self.listen_addr)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.api_key, None);
        assert_eq!(config.data_dir, default_data_dir());
        assert_eq!(config.listen_addr, "127.0.0.1:8000".parse().unwrap());
        assert_eq!(
            config.guests_file_path(),
            default_data_dir().join("guests.json")
        );
    }

    #[test]
    fn default_data_dir_is_workspace_root() {
        let dir = default_data_dir();
        assert!(dir.join("crates").join("wedding-backend").is_dir(), "{}", dir.display());
        assert_ne!(dir, PathBuf::from("."));
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("WEDDING_API_KEY", "s3cret"),
            ("DATA_DIR", "/var/lib/wedding"),
            ("WEDDING_LISTEN_ADDR", "0.0.0.0:9000"),
        ])
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("s3cret"));
        assert_eq!(
            config.guests_file_path(),
            PathBuf::from("/var/lib/wedding/guests.json")
        );
        assert_eq!(config.listen_addr.port(), 9000);
    }

    #[test]
    fn empty_api_key_counts_as_unset() {
        let config = config_from(&[("WEDDING_API_KEY", "")]).unwrap();
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn invalid_listen_addr_is_a_config_error() {
        let err = config_from(&[("WEDDING_LISTEN_ADDR", "not-an-addr")]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = config_from(&[("WEDDING_API_KEY", "s3cret")]).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("<redacted>"));
    }
}
