use anyhow::Result;
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use crate::config::AiConfig;

/// Checked in order; the first one set wins
const ENV_API_KEYS: [&str; 2] = ["DRAFTSMITH_API_KEY", "DEEPSEEK_API_KEY"];

const KEYRING_SERVICE: &str = "draftsmith";
const KEYRING_USER: &str = "api-key";

/// Where the resolved API key came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Environment(&'static str),
    ConfigFile,
    Keyring,
    KeyFile,
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySource::Environment(var) => write!(f, "environment ({})", var),
            KeySource::ConfigFile => write!(f, "config file"),
            KeySource::Keyring => write!(f, "keyring"),
            KeySource::KeyFile => write!(f, "key file"),
        }
    }
}

/// Storage for the completion provider API key
pub struct CredentialStore {
    key_file: PathBuf,
}

impl CredentialStore {
    pub fn new() -> Self {
        let key_file = crate::config::Config::config_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".api_key");
        Self { key_file }
    }

    #[cfg(test)]
    fn with_key_file(key_file: PathBuf) -> Self {
        Self { key_file }
    }

    fn env_api_key() -> Option<(String, &'static str)> {
        ENV_API_KEYS.iter().find_map(|var| {
            env::var(var)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(|v| (v, *var))
        })
    }

    /// Try to get the key from the keyring
    fn keyring_get(&self) -> Option<String> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER).ok()?;
        entry.get_password().ok()
    }

    /// Try to store the key in the keyring
    fn keyring_set(&self, api_key: &str) -> bool {
        if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER) {
            entry.set_password(api_key).is_ok()
        } else {
            false
        }
    }

    /// Read key from file fallback
    fn file_get(&self) -> Option<String> {
        fs::read_to_string(&self.key_file)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Write key to file fallback (with restricted permissions)
    fn file_set(&self, api_key: &str) -> Result<()> {
        if let Some(parent) = self.key_file.parent() {
            fs::create_dir_all(parent)?;
        }

        // Create file with restricted permissions atomically to avoid TOCTOU
        #[cfg(unix)]
        {
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.key_file)?;
            file.write_all(api_key.as_bytes())?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.key_file, api_key)?;
        }

        Ok(())
    }

    /// Resolve the API key: environment, config file, keyring, then key file.
    ///
    /// Returns `None` when nothing is configured; callers pass that through
    /// and let the provider reject the request.
    pub fn resolve(&self, ai: &AiConfig) -> Option<(String, KeySource)> {
        if let Some((key, var)) = Self::env_api_key() {
            return Some((key, KeySource::Environment(var)));
        }

        if let Some(key) = ai.api_key.clone().filter(|k| !k.trim().is_empty()) {
            return Some((key, KeySource::ConfigFile));
        }

        self.resolve_stored()
    }

    /// Keyring and key-file lookup only
    fn resolve_stored(&self) -> Option<(String, KeySource)> {
        if let Some(key) = self.keyring_get() {
            return Some((key, KeySource::Keyring));
        }

        self.file_get().map(|key| (key, KeySource::KeyFile))
    }

    /// Store the key, preferring the keyring
    pub fn set_api_key(&self, api_key: &str) -> Result<KeySource> {
        if self.keyring_set(api_key) && self.keyring_get().as_deref() == Some(api_key) {
            return Ok(KeySource::Keyring);
        }

        eprintln!("Note: Keyring unavailable, using file-based storage.");
        self.file_set(api_key)?;
        Ok(KeySource::KeyFile)
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_fallback_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::with_key_file(dir.path().join("nested").join(".api_key"));

        assert!(store.file_get().is_none());
        store.file_set("sk-file").unwrap();
        assert_eq!(store.file_get().as_deref(), Some("sk-file"));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_fallback_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".api_key");
        let store = CredentialStore::with_key_file(path.clone());
        store.file_set("secret").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_blank_key_file_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".api_key");
        fs::write(&path, "  \n").unwrap();

        let store = CredentialStore::with_key_file(path);
        assert!(store.file_get().is_none());
    }

    #[test]
    fn test_key_source_display() {
        assert_eq!(
            KeySource::Environment("DEEPSEEK_API_KEY").to_string(),
            "environment (DEEPSEEK_API_KEY)"
        );
        assert_eq!(KeySource::KeyFile.to_string(), "key file");
    }
}
