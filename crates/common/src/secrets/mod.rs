//! Secret loading and access-key validation
//!
//! The secret source is a flat JSON object of key/value string pairs. It
//! carries the database credentials (read once at startup) and the set of
//! valid access keys (reloaded with a short TTL so key rotations become
//! effective without a restart).

use crate::errors::{AppError, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Load a flat JSON secret file into a string map
///
/// Non-string values are rejected: the secret contract is strictly
/// `{"KEY": "value", ...}`.
pub fn load_secret_file(path: &Path) -> Result<HashMap<String, String>> {
    let raw = std::fs::read_to_string(path).map_err(|e| AppError::Secret {
        message: format!("cannot read {}: {}", path.display(), e),
    })?;

    let value: serde_json::Value =
        serde_json::from_str(&raw).map_err(|e| AppError::Secret {
            message: format!("cannot parse {}: {}", path.display(), e),
        })?;

    let object = value.as_object().ok_or_else(|| AppError::Secret {
        message: format!("{}: expected a flat JSON object", path.display()),
    })?;

    let mut secrets = HashMap::with_capacity(object.len());
    for (key, value) in object {
        let value = value.as_str().ok_or_else(|| AppError::Secret {
            message: format!("{}: value for {} is not a string", path.display(), key),
        })?;
        secrets.insert(key.clone(), value.to_string());
    }
    Ok(secrets)
}

struct CachedKeys {
    keys: HashSet<String>,
    loaded_at: Instant,
}

/// TTL-bounded access-key allow-list backed by the secret file
///
/// Every value in the secret file counts as a valid access key. The cache
/// is reloaded once it is older than the TTL, so a newly rotated key
/// becomes valid within seconds while steady-state requests skip the
/// filesystem read.
pub struct AccessKeyStore {
    path: PathBuf,
    ttl: Duration,
    cache: RwLock<Option<CachedKeys>>,
}

impl AccessKeyStore {
    pub fn new(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            path: path.into(),
            ttl,
            cache: RwLock::new(None),
        }
    }

    /// Check a presented key against the allow-list, reloading when stale
    pub fn is_valid(&self, key: &str) -> Result<bool> {
        {
            let cache = self.cache.read().expect("key cache poisoned");
            if let Some(cached) = cache.as_ref() {
                if cached.loaded_at.elapsed() < self.ttl {
                    return Ok(cached.keys.contains(key));
                }
            }
        }

        let secrets = load_secret_file(&self.path)?;
        let keys: HashSet<String> = secrets.into_values().collect();
        let valid = keys.contains(key);

        let mut cache = self.cache.write().expect("key cache poisoned");
        *cache = Some(CachedKeys {
            keys,
            loaded_at: Instant::now(),
        });
        Ok(valid)
    }

    /// Drop the cached keys so the next check reloads from disk
    pub fn invalidate(&self) {
        let mut cache = self.cache.write().expect("key cache poisoned");
        *cache = None;
    }
}

/// Extract the user-tracking identifier from an access key
///
/// Keys are base64-encoded `user:secret` pairs; the prefix before the
/// first `:` identifies the caller in the request log. Keys that do not
/// decode or carry no `:` yield no tracking id.
pub fn tracking_id(access_key: &str) -> Option<String> {
    let decoded = BASE64.decode(access_key).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, _) = decoded.split_once(':')?;
    if user.is_empty() {
        None
    } else {
        Some(user.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_secret(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_flat_object() {
        let file = write_secret(r#"{"DB_USER":"reader","DB_PASSWORD":"pw"}"#);
        let secrets = load_secret_file(file.path()).unwrap();
        assert_eq!(secrets.get("DB_USER").map(String::as_str), Some("reader"));
        assert_eq!(secrets.len(), 2);
    }

    #[test]
    fn test_rejects_non_string_values() {
        let file = write_secret(r#"{"DB_PORT": 5432}"#);
        assert!(load_secret_file(file.path()).is_err());
    }

    #[test]
    fn test_rejects_non_object() {
        let file = write_secret(r#"["a","b"]"#);
        assert!(load_secret_file(file.path()).is_err());
    }

    #[test]
    fn test_key_store_validates_values() {
        let file = write_secret(r#"{"alice":"key-one","bob":"key-two"}"#);
        let store = AccessKeyStore::new(file.path(), Duration::from_secs(5));
        assert!(store.is_valid("key-one").unwrap());
        assert!(store.is_valid("key-two").unwrap());
        assert!(!store.is_valid("key-three").unwrap());
    }

    #[test]
    fn test_key_store_picks_up_rotation() {
        let mut file = write_secret(r#"{"alice":"old-key"}"#);
        let store = AccessKeyStore::new(file.path(), Duration::from_secs(0));
        assert!(store.is_valid("old-key").unwrap());

        file.as_file_mut().set_len(0).unwrap();
        use std::io::Seek;
        file.as_file_mut().rewind().unwrap();
        file.write_all(br#"{"alice":"new-key"}"#).unwrap();
        file.flush().unwrap();

        // TTL of zero forces a reload on the next check
        assert!(store.is_valid("new-key").unwrap());
        assert!(!store.is_valid("old-key").unwrap());
    }

    #[test]
    fn test_tracking_id() {
        // base64("alice:secret")
        let key = BASE64.encode("alice:secret");
        assert_eq!(tracking_id(&key).as_deref(), Some("alice"));
    }

    #[test]
    fn test_tracking_id_without_separator() {
        let key = BASE64.encode("justakey");
        assert_eq!(tracking_id(&key), None);
    }

    #[test]
    fn test_tracking_id_not_base64() {
        assert_eq!(tracking_id("%%%not-base64%%%"), None);
    }
}
