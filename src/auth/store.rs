use std::collections::HashMap;
use std::fs;
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::AuthError;
use super::token::Token;

const TOKEN_FILE_VERSION: u32 = 1;

/// Durable key-value storage for the session token, keyed by profile.
pub trait TokenStore: Send + Sync {
    fn load(&self, profile: &str) -> Result<Option<Token>, AuthError>;
    fn save(&self, profile: &str, token: &Token) -> Result<(), AuthError>;
    fn clear(&self, profile: &str) -> Result<(), AuthError>;
}

/// Configuration for file-backed token storage.
#[derive(Debug, Clone)]
pub struct TokenStoreConfig {
    pub base_dir: PathBuf,
}

impl TokenStoreConfig {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn default_dir() -> PathBuf {
        default_xee_dir()
    }
}

/// File-backed token store using TOML files.
///
/// Writes go to a temporary sibling file that is renamed into place, so a
/// concurrent reader sees either the previous file or the new one.
///
/// # Example
/// ```no_run
/// use xee::auth::{FileTokenStore, Token, TokenStore};
///
/// let store = FileTokenStore::new_default();
/// let token = Token {
///     access_token: "access".to_string(),
///     refresh_token: Some("refresh".to_string()),
///     scope: None,
///     token_type: None,
///     expires_in: None,
///     expires_at: None,
/// };
/// store.save("default", &token)?;
/// # Ok::<(), xee::auth::AuthError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    base_dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(config: TokenStoreConfig) -> Self {
        Self {
            base_dir: config.base_dir,
        }
    }

    pub fn new_default() -> Self {
        Self {
            base_dir: default_xee_dir(),
        }
    }

    pub fn token_path(&self, profile: &str) -> PathBuf {
        let profile = normalize_label(profile);
        let name = if profile == "default" {
            "token.toml".to_string()
        } else {
            format!("token.{profile}.toml")
        };
        self.base_dir.join(name)
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self, profile: &str) -> Result<Option<Token>, AuthError> {
        let path = self.token_path(profile);
        let raw = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(AuthError::Io(err.to_string())),
        };
        let file: TokenFile = toml::from_str(&raw)?;
        if file.version != TOKEN_FILE_VERSION {
            return Err(AuthError::Serialization(format!(
                "Unsupported token file version {} at {}",
                file.version,
                path.display()
            )));
        }
        Ok(Some(file.token))
    }

    fn save(&self, profile: &str, token: &Token) -> Result<(), AuthError> {
        let path = self.token_path(profile);
        let file = TokenFile {
            version: TOKEN_FILE_VERSION,
            profile: profile.to_string(),
            token: token.clone(),
            saved_at: Utc::now(),
        };
        let serialized = toml::to_string(&file)?;
        atomic_write(&path, serialized.as_bytes())
    }

    fn clear(&self, profile: &str) -> Result<(), AuthError> {
        let path = self.token_path(profile);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AuthError::Io(err.to_string())),
        }
    }
}

/// Process-local token store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<HashMap<String, Token>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with a token already saved under `profile`.
    pub fn seeded(profile: &str, token: Token) -> Self {
        let store = Self::new();
        store
            .tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(normalize_label(profile), token);
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self, profile: &str) -> Result<Option<Token>, AuthError> {
        Ok(self
            .tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&normalize_label(profile))
            .cloned())
    }

    fn save(&self, profile: &str, token: &Token) -> Result<(), AuthError> {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(normalize_label(profile), token.clone());
        Ok(())
    }

    fn clear(&self, profile: &str) -> Result<(), AuthError> {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&normalize_label(profile));
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenFile {
    version: u32,
    profile: String,
    token: Token,
    saved_at: DateTime<Utc>,
}

fn default_xee_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".xee"))
        .unwrap_or_else(|| PathBuf::from(".xee"))
}

pub(crate) fn normalize_label(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return "default".to_string();
    }
    let mut out = String::with_capacity(trimmed.len());
    for ch in trimmed.chars() {
        let lower = ch.to_ascii_lowercase();
        if lower.is_ascii_alphanumeric() || lower == '-' {
            out.push(lower);
        } else {
            out.push('-');
        }
    }
    if out.trim_matches('-').is_empty() {
        "default".to_string()
    } else {
        out
    }
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<(), AuthError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file_name = path.file_name().ok_or_else(|| {
        AuthError::Io(format!("Token path {} has no file name", path.display()))
    })?;

    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let temp_name = format!(
        ".{}.tmp-{}-{nonce}",
        file_name.to_string_lossy(),
        std::process::id()
    );
    let temp_path = path.with_file_name(temp_name);

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let write_result = (|| -> std::io::Result<()> {
        let mut temp_file = options.open(&temp_path)?;
        temp_file.write_all(data)?;
        temp_file.sync_all()?;
        Ok(())
    })();

    if let Err(err) = write_result {
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }

    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }

    #[cfg(unix)]
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, FileTokenStore) {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(TokenStoreConfig::new(dir.path().to_path_buf()));
        (dir, store)
    }

    fn sample_token() -> Token {
        Token {
            access_token: "access".to_string(),
            refresh_token: Some("refresh".to_string()),
            scope: Some("all".to_string()),
            token_type: Some("bearer".to_string()),
            expires_in: Some(3600),
            expires_at: Some(Utc::now()),
        }
    }

    #[test]
    fn token_round_trip_works() {
        let (_dir, store) = temp_store();
        let token = sample_token();
        store.save("default", &token).unwrap();
        let loaded = store.load("default").unwrap().unwrap();
        assert_eq!(loaded, token);
    }

    #[test]
    fn clear_removes_token() {
        let (_dir, store) = temp_store();
        store.save("default", &sample_token()).unwrap();
        store.clear("default").unwrap();
        assert!(store.load("default").unwrap().is_none());
    }

    #[test]
    fn clear_is_idempotent() {
        let (_dir, store) = temp_store();
        store.clear("default").unwrap();
        store.clear("default").unwrap();
    }

    #[test]
    fn profiles_are_kept_apart() {
        let (dir, store) = temp_store();
        store.save("default", &sample_token()).unwrap();
        assert!(store.load("Fleet Account").unwrap().is_none());
        store.save("Fleet Account", &sample_token()).unwrap();
        assert!(dir.path().join("token.fleet-account.toml").exists());
        assert!(dir.path().join("token.toml").exists());
    }

    #[test]
    fn save_leaves_no_temp_files_behind() {
        let (dir, store) = temp_store();
        store.save("default", &sample_token()).unwrap();
        store.save("default", &sample_token()).unwrap();
        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["token.toml".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_owner_only() {
        let (_dir, store) = temp_store();
        store.save("default", &sample_token()).unwrap();
        let mode = fs::metadata(store.token_path("default"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn unknown_file_version_is_rejected() {
        let (_dir, store) = temp_store();
        store.save("default", &sample_token()).unwrap();
        let path = store.token_path("default");
        let raw = fs::read_to_string(&path).unwrap();
        fs::write(&path, raw.replace("version = 1", "version = 9")).unwrap();
        assert!(matches!(
            store.load("default"),
            Err(AuthError::Serialization(_))
        ));
    }

    #[test]
    fn memory_store_normalizes_profiles() {
        let store = MemoryTokenStore::seeded("Default", sample_token());
        assert!(store.load("default").unwrap().is_some());
        store.clear(" default ").unwrap();
        assert!(store.load("default").unwrap().is_none());
    }

    #[test]
    fn normalize_label_falls_back_to_default() {
        assert_eq!(normalize_label(""), "default");
        assert_eq!(normalize_label("__"), "default");
        assert_eq!(normalize_label("Work_2"), "work-2");
    }
}
