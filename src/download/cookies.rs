//! Per-user cookies storage.
//!
//! Every user gets their own Netscape cookies file at
//! `<root>/<user_id>/cookies.txt`. Writes are serialized by a store-wide async
//! mutex and land atomically (temp file + rename), so a concurrent yt-dlp run
//! reads either the previous file or the new one.

use dashmap::DashMap;
use std::path::PathBuf;
use teloxide::types::UserId;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::core::config;

#[derive(Debug, Error)]
pub enum CookieError {
    #[error("cookies storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of a quick look at an uploaded cookies file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookiesDiagnostic {
    /// Carries the `# Netscape HTTP Cookie File` header
    pub has_header: bool,
    /// Lines with the 7 tab-separated Netscape fields
    pub total_cookies: usize,
}

impl CookiesDiagnostic {
    /// yt-dlp refuses files without the header or without any cookie line.
    pub fn looks_valid(&self) -> bool {
        self.has_header && self.total_cookies > 0
    }
}

/// Parse Netscape cookie file content and count what is inside.
pub fn diagnose_cookies_content(content: &[u8]) -> CookiesDiagnostic {
    let text = String::from_utf8_lossy(content);
    let has_header = text
        .lines()
        .take(5)
        .any(|l| l.contains("Netscape HTTP Cookie File"));

    // Netscape format: domain TAB flag TAB path TAB secure TAB expires TAB name TAB value
    let total_cookies = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter(|l| !l.starts_with('#') || l.starts_with("#HttpOnly_"))
        .filter(|l| l.split('\t').count() >= 7)
        .count();

    CookiesDiagnostic {
        has_header,
        total_cookies,
    }
}

/// Credential files keyed by Telegram user.
pub struct CredentialStore {
    root: PathBuf,
    fallback: Option<PathBuf>,
    users: DashMap<UserId, PathBuf>,
    write_lock: Mutex<()>,
}

impl CredentialStore {
    /// Opens the store at `root`, creating it if needed and registering every
    /// `<user_id>/cookies.txt` already on disk.
    ///
    /// `fallback` is the operator-provided file used for users without their own.
    pub async fn open(root: impl Into<PathBuf>, fallback: Option<PathBuf>) -> Result<Self, CookieError> {
        let root = root.into();
        fs_err::tokio::create_dir_all(&root).await?;

        let store = Self {
            root,
            fallback,
            users: DashMap::new(),
            write_lock: Mutex::new(()),
        };
        store.scan().await?;

        log::info!(
            "🍪 Cookies store at {} ({} user file(s), fallback: {})",
            store.root.display(),
            store.users.len(),
            store
                .fallback
                .as_ref()
                .map_or("none".to_string(), |p| p.display().to_string())
        );
        Ok(store)
    }

    async fn scan(&self) -> Result<(), CookieError> {
        let mut entries = fs_err::tokio::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let Some(user_id) = entry.file_name().to_str().and_then(|n| n.parse::<u64>().ok()) else {
                continue;
            };
            let path = entry.path().join(config::cookies::UPLOAD_FILE_NAME);
            if fs_err::tokio::metadata(&path).await.map(|m| m.is_file()).unwrap_or(false) {
                self.users.insert(UserId(user_id), path);
            }
        }
        Ok(())
    }

    /// Where `user`'s cookies file lives (whether or not it exists).
    pub fn path_for(&self, user: UserId) -> PathBuf {
        self.root
            .join(user.0.to_string())
            .join(config::cookies::UPLOAD_FILE_NAME)
    }

    /// Whether `user` uploaded their own cookies.
    pub fn has_user_cookies(&self, user: UserId) -> bool {
        self.users.contains_key(&user)
    }

    /// Cookies to use for a request from `user`: their own file, else the fallback.
    pub fn cookies_for(&self, user: UserId) -> Option<PathBuf> {
        self.users
            .get(&user)
            .map(|p| p.value().clone())
            .or_else(|| self.fallback.clone().filter(|p| p.is_file()))
    }

    /// Replaces `user`'s cookies file with `content`.
    pub async fn save(&self, user: UserId, content: &[u8]) -> Result<PathBuf, CookieError> {
        let path = self.path_for(user);
        let _lock = self.write_lock.lock().await;

        if let Some(dir) = path.parent() {
            fs_err::tokio::create_dir_all(dir).await?;
        }

        // Atomic write: write to temp file, then rename
        let temp_path = path.with_extension(format!("txt.tmp.{}", std::process::id()));
        fs_err::tokio::write(&temp_path, content).await?;
        if let Err(e) = fs_err::tokio::rename(&temp_path, &path).await {
            let _ = fs_err::tokio::remove_file(&temp_path).await;
            return Err(e.into());
        }

        self.users.insert(user, path.clone());
        log::info!("✅ Cookies for user {} updated atomically: {:?}", user.0, path);
        Ok(path)
    }

    /// Deletes `user`'s cookies file. Returns whether there was one.
    pub async fn remove(&self, user: UserId) -> Result<bool, CookieError> {
        let _lock = self.write_lock.lock().await;
        let Some((_, path)) = self.users.remove(&user) else {
            return Ok(false);
        };

        match fs_err::tokio::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        log::info!("🗑️ Cookies for user {} removed", user.0);
        Ok(true)
    }
}
