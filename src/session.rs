//! Client-side session persistence
//!
//! Provides:
//! - A "local storage" file holding `access_token` and the serialized `user`
//! - A cookie jar mirroring `access_token` for the route guard
//! - File-based locking so two processes never write the session at once

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration as StdDuration, Instant};

use chrono::{DateTime, Duration, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{Config, COOKIE_DAYS};
use crate::error::{Error, Result};
use crate::models::{AuthResponse, User};

pub const TOKEN_KEY: &str = "access_token";
pub const USER_KEY: &str = "user";

const STORAGE_FILE: &str = "local_storage.json";
const COOKIE_FILE: &str = "cookies.json";
const LOCK_FILE: &str = "session.lock";

/// How long a writer waits for another holder of the session lock.
pub const LOCK_TIMEOUT: StdDuration = StdDuration::from_secs(5);
const LOCK_RETRY_INTERVAL: StdDuration = StdDuration::from_millis(20);

/// A persisted cookie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCookie {
    pub value: String,
    pub expires_at: DateTime<Utc>,
    pub path: String,
    pub same_site: String,
}

impl StoredCookie {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Lock guard that ensures exclusive write access to the session files.
pub struct SessionLock {
    lock_file: Option<File>,
}

impl SessionLock {
    /// Acquire an exclusive lock inside `dir`, waiting up to [`LOCK_TIMEOUT`].
    pub fn acquire(dir: &Path) -> Result<Self> {
        Self::acquire_within(dir, LOCK_TIMEOUT)
    }

    /// Acquire an exclusive lock, retrying until `timeout` has elapsed.
    pub fn acquire_within(dir: &Path, timeout: StdDuration) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(dir.join(LOCK_FILE))
            .map_err(|e| Error::Session(format!("Failed to open lock file: {}", e)))?;

        let deadline = Instant::now() + timeout;
        loop {
            match lock_file.try_lock_exclusive() {
                Ok(()) => break,
                Err(_) if Instant::now() < deadline => thread::sleep(LOCK_RETRY_INTERVAL),
                Err(_) => {
                    return Err(Error::Session(
                        "session is locked by another process".to_string(),
                    ))
                }
            }
        }

        Ok(Self {
            lock_file: Some(lock_file),
        })
    }

    /// Release the lock manually
    pub fn release(&mut self) {
        if let Some(ref file) = self.lock_file {
            let _ = file.unlock();
        }
        self.lock_file = None;
    }
}

impl Drop for SessionLock {
    fn drop(&mut self) {
        self.release();
    }
}

/// File-backed equivalent of the browser's local storage plus cookie jar.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
    cookie_days: i64,
}

impl SessionStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            cookie_days: COOKIE_DAYS,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            dir: config.session_dir.clone(),
            cookie_days: config.cookie_days,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // ------------------------------------------------------------------
    // Local storage
    // ------------------------------------------------------------------

    fn read_json<T>(&self, file: &str) -> Result<T>
    where
        T: for<'de> Deserialize<'de> + Default,
    {
        let path = self.dir.join(file);
        if !path.exists() {
            return Ok(T::default());
        }
        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(T::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_json<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file);
        let tmp = self.dir.join(format!("{}.tmp", file));
        fs::write(&tmp, serde_json::to_vec_pretty(value)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn read_storage(&self) -> Result<BTreeMap<String, String>> {
        self.read_json(STORAGE_FILE)
    }

    fn read_cookies(&self) -> Result<BTreeMap<String, StoredCookie>> {
        self.read_json(COOKIE_FILE)
    }

    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_storage()?.remove(key))
    }

    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let _lock = SessionLock::acquire(&self.dir)?;
        let mut storage = self.read_storage()?;
        storage.insert(key.to_string(), value.to_string());
        self.write_json(STORAGE_FILE, &storage)
    }

    pub fn remove_item(&self, key: &str) -> Result<()> {
        let _lock = SessionLock::acquire(&self.dir)?;
        let mut storage = self.read_storage()?;
        if storage.remove(key).is_some() {
            self.write_json(STORAGE_FILE, &storage)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Cookies
    // ------------------------------------------------------------------

    pub fn set_cookie(&self, name: &str, value: &str, days: i64) -> Result<()> {
        let _lock = SessionLock::acquire(&self.dir)?;
        self.write_cookie(name, value, days)
    }

    /// Caller holds the session lock.
    fn write_cookie(&self, name: &str, value: &str, days: i64) -> Result<()> {
        let mut cookies = self.read_cookies()?;
        cookies.insert(
            name.to_string(),
            StoredCookie {
                value: value.to_string(),
                expires_at: Utc::now() + Duration::days(days),
                path: "/".to_string(),
                same_site: "Lax".to_string(),
            },
        );
        self.write_json(COOKIE_FILE, &cookies)
    }

    /// Cookie value, `None` when missing or expired.
    pub fn get_cookie(&self, name: &str) -> Result<Option<String>> {
        let now = Utc::now();
        Ok(self
            .read_cookies()?
            .remove(name)
            .filter(|c| !c.is_expired(now))
            .map(|c| c.value))
    }

    pub fn delete_cookie(&self, name: &str) -> Result<()> {
        let _lock = SessionLock::acquire(&self.dir)?;
        self.remove_cookie(name)
    }

    /// Caller holds the session lock.
    fn remove_cookie(&self, name: &str) -> Result<()> {
        let mut cookies = self.read_cookies()?;
        if cookies.remove(name).is_some() {
            self.write_json(COOKIE_FILE, &cookies)?;
        }
        Ok(())
    }

    /// `Cookie` request header for the unexpired cookies.
    pub fn cookie_header(&self) -> Result<Option<String>> {
        let now = Utc::now();
        let pairs: Vec<String> = self
            .read_cookies()?
            .into_iter()
            .filter(|(_, c)| !c.is_expired(now))
            .map(|(name, c)| format!("{}={}", name, urlencoding::encode(&c.value)))
            .collect();
        Ok(if pairs.is_empty() {
            None
        } else {
            Some(pairs.join("; "))
        })
    }

    // ------------------------------------------------------------------
    // Auth session
    // ------------------------------------------------------------------

    /// Bearer token: local storage first, then the cookie.
    pub fn token(&self) -> Result<Option<String>> {
        if let Some(token) = self.get_item(TOKEN_KEY)?.filter(|t| !t.is_empty()) {
            return Ok(Some(token));
        }
        self.get_cookie(TOKEN_KEY)
    }

    /// Same as [`token`](Self::token) but never fails; broken session files
    /// are logged and treated as "no token".
    pub fn token_or_none(&self) -> Option<String> {
        match self.token() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, dir = %self.dir.display(), "Failed to read session");
                None
            }
        }
    }

    /// Persist a successful login to storage and cookie under one lock.
    pub fn store_login(&self, response: &AuthResponse) -> Result<()> {
        let user_json = serde_json::to_string(&response.user)?;
        let _lock = SessionLock::acquire(&self.dir)?;
        let mut storage = self.read_storage()?;
        storage.insert(TOKEN_KEY.to_string(), response.access_token.clone());
        storage.insert(USER_KEY.to_string(), user_json);
        self.write_json(STORAGE_FILE, &storage)?;
        self.write_cookie(TOKEN_KEY, &response.access_token, self.cookie_days)?;
        debug!(user_id = response.user.id, "Session stored");
        Ok(())
    }

    /// Drop token, user and the token cookie under one lock.
    pub fn clear(&self) -> Result<()> {
        let _lock = SessionLock::acquire(&self.dir)?;
        let mut storage = self.read_storage()?;
        storage.remove(TOKEN_KEY);
        storage.remove(USER_KEY);
        self.write_json(STORAGE_FILE, &storage)?;
        self.remove_cookie(TOKEN_KEY)?;
        debug!("Session cleared");
        Ok(())
    }

    pub fn stored_user(&self) -> Result<Option<User>> {
        match self.get_item(USER_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn is_logged_in(&self) -> Result<bool> {
        Ok(self
            .get_item(TOKEN_KEY)?
            .map(|t| !t.is_empty())
            .unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn login_response(token: &str) -> AuthResponse {
        AuthResponse {
            access_token: token.to_string(),
            token_type: "bearer".to_string(),
            user: User {
                id: 7,
                fullname: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
            },
        }
    }

    #[test]
    fn test_empty_store_has_no_token() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        assert_eq!(store.token().unwrap(), None);
        assert!(!store.is_logged_in().unwrap());
        assert!(store.stored_user().unwrap().is_none());
        assert!(store.cookie_header().unwrap().is_none());
    }

    #[test]
    fn test_store_login_writes_storage_and_cookie() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        store.store_login(&login_response("tok-1")).unwrap();

        assert_eq!(store.get_item(TOKEN_KEY).unwrap().as_deref(), Some("tok-1"));
        assert_eq!(store.get_cookie(TOKEN_KEY).unwrap().as_deref(), Some("tok-1"));
        assert_eq!(store.stored_user().unwrap().unwrap().fullname, "Ada Lovelace");
        assert!(store.is_logged_in().unwrap());
        assert_eq!(
            store.cookie_header().unwrap().as_deref(),
            Some("access_token=tok-1")
        );
    }

    #[test]
    fn test_cookie_is_fallback_when_storage_empty() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        store.set_cookie(TOKEN_KEY, "cookie-only", 7).unwrap();

        assert_eq!(store.token().unwrap().as_deref(), Some("cookie-only"));
        // local storage alone decides "logged in"
        assert!(!store.is_logged_in().unwrap());
    }

    #[test]
    fn test_storage_wins_over_cookie() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        store.set_cookie(TOKEN_KEY, "from-cookie", 7).unwrap();
        store.set_item(TOKEN_KEY, "from-storage").unwrap();
        assert_eq!(store.token().unwrap().as_deref(), Some("from-storage"));
    }

    #[test]
    fn test_expired_cookie_is_ignored() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        store.set_cookie(TOKEN_KEY, "stale", -1).unwrap();
        assert_eq!(store.get_cookie(TOKEN_KEY).unwrap(), None);
        assert_eq!(store.token().unwrap(), None);
    }

    #[test]
    fn test_clear_removes_everything_auth_related() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        store.store_login(&login_response("tok-2")).unwrap();
        store.set_item("theme", "dark").unwrap();

        store.clear().unwrap();

        assert_eq!(store.token().unwrap(), None);
        assert!(store.stored_user().unwrap().is_none());
        assert_eq!(store.get_item("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_second_login_replaces_token() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        store.store_login(&login_response("first")).unwrap();
        store.store_login(&login_response("second")).unwrap();
        assert_eq!(store.token().unwrap().as_deref(), Some("second"));
        assert_eq!(store.get_cookie(TOKEN_KEY).unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_lock_is_exclusive() {
        let dir = tempdir().unwrap();
        let held = SessionLock::acquire(dir.path()).unwrap();
        let second = SessionLock::acquire_within(dir.path(), StdDuration::from_millis(50));
        assert!(matches!(second, Err(Error::Session(_))));
        drop(held);
        assert!(SessionLock::acquire(dir.path()).is_ok());
    }

    #[test]
    fn test_clear_waits_for_lock_holder() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        store.store_login(&login_response("tok-3")).unwrap();

        let held = SessionLock::acquire(dir.path()).unwrap();
        let holder = thread::spawn(move || {
            thread::sleep(StdDuration::from_millis(150));
            drop(held);
        });

        store.clear().unwrap();
        holder.join().unwrap();

        assert_eq!(store.get_item(TOKEN_KEY).unwrap(), None);
        assert_eq!(store.get_cookie(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_corrupt_storage_is_reported() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(STORAGE_FILE), "{not json").unwrap();
        let store = SessionStore::new(dir.path());
        assert!(matches!(store.token(), Err(Error::SerializationError(_))));
        assert_eq!(store.token_or_none(), None);
    }
}
