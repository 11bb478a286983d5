use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use vista_auth::directory::UserDirectory;

/// Default lifetime of issued embed tokens.
const DEFAULT_TOKEN_TTL_MINUTES: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VistaConfig {
    /// Where the storage slots live.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "UserDirectory::starter")]
    pub users: UserDirectory,
    /// HS256 key for embed tokens. Without one, only tokens stored on the
    /// report itself are used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed_signing_key: Option<String>,
    #[serde(default = "default_token_ttl")]
    pub embed_token_ttl_minutes: u64,
    /// Largest snapshot the data directory accepts, in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_quota_bytes: Option<usize>,
}

impl Default for VistaConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            users: UserDirectory::starter(),
            embed_signing_key: None,
            embed_token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
            storage_quota_bytes: None,
        }
    }
}

fn default_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("VISTA_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::data_dir()
        .map(|d| d.join("vista"))
        .unwrap_or_else(|| PathBuf::from(".vista"))
}

fn default_token_ttl() -> u64 {
    DEFAULT_TOKEN_TTL_MINUTES
}

/// `$VISTA_CONFIG`, else `<config dir>/vista/config.json`.
pub fn config_path() -> eyre::Result<PathBuf> {
    if let Ok(path) = std::env::var("VISTA_CONFIG") {
        return Ok(PathBuf::from(path));
    }
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("vista").join("config.json"))
}

/// Read the config at `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> eyre::Result<VistaConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(VistaConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;
    let config: VistaConfig = serde_json::from_str(&contents)
        .map_err(|e| eyre::eyre!("invalid config at {}: {e}", path.display()))?;
    Ok(config)
}

pub fn save_config(path: &Path, config: &VistaConfig) -> eyre::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(config)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    // Holds passwords and the signing key
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

/// A fresh config with a random admin password and signing key.
/// Returns the config and the admin password.
pub fn generate_config() -> (VistaConfig, String) {
    let password = uuid::Uuid::new_v4().simple().to_string();
    let mut config = VistaConfig::default();
    config.users.set_password("admin", password.clone());
    config.embed_signing_key = Some(format!(
        "{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    ));
    (config, password)
}

/// Config rendered for display, secrets masked.
pub fn redacted(config: &VistaConfig) -> serde_json::Value {
    let mut value = serde_json::to_value(config).unwrap_or_default();
    if let Some(key) = value.get_mut("embed_signing_key") {
        *key = serde_json::Value::String("****".to_string());
    }
    if let Some(users) = value.get_mut("users").and_then(|u| u.as_array_mut()) {
        for user in users {
            if let Some(password) = user.get_mut("password") {
                *password = serde_json::Value::String("****".to_string());
            }
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.embed_token_ttl_minutes, 60);
        assert_eq!(config.users, UserDirectory::starter());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"data_dir": "/srv/vista"}"#).unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/vista"));
        assert!(config.embed_signing_key.is_none());
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let (config, password) = generate_config();
        save_config(&path, &config).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(
            loaded.users.find("admin").unwrap().password.as_deref(),
            Some(password.as_str())
        );
    }

    #[test]
    fn redaction_masks_secrets() {
        let (config, password) = generate_config();
        let shown = redacted(&config).to_string();
        assert!(!shown.contains(&password));
        assert!(!shown.contains(config.embed_signing_key.as_deref().unwrap()));
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{").unwrap();
        assert!(load_config(&path).is_err());
    }
}
