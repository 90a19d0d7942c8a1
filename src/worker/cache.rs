//! Versioned on-disk asset caches.
//!
//! Each named cache is a directory under the storage root. Entries are
//! files named after their URL, form-urlencoded so any URL is a valid file
//! name.

use std::path::{Path, PathBuf};

use tracing::debug;
use url::form_urlencoded;
use url::Url;

use crate::deployment::{AssetDirectory, DeploymentRoot};

use super::error::CacheError;

/// Current cache version. Activation deletes every other cache.
pub const CACHE_NAME: &str = "pomodoro-timer-v1";

/// Assets cached at install, relative to the deployment root.
pub const PRECACHE_ASSETS: [&str; 5] = [
    "",
    "index.html",
    "timer-complete.mp3",
    "notification-sound.mp3",
    "icons/icon-192x192.png",
];

/// Directory name used under the platform cache dir.
const APP_CACHE_DIR: &str = "focusbell";

fn encode(raw: &str) -> String {
    form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}

fn decode(encoded: &str) -> String {
    form_urlencoded::parse(encoded.as_bytes())
        .next()
        .map(|(key, _)| key.into_owned())
        .unwrap_or_default()
}

/// Collection of named caches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStorage {
    root: PathBuf,
}

impl CacheStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the platform default, e.g. `~/.cache/focusbell`.
    pub fn default_root() -> Option<PathBuf> {
        dirs::cache_dir().map(|dir| dir.join(APP_CACHE_DIR))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn cache_dir(&self, name: &str) -> Result<PathBuf, CacheError> {
        if name.is_empty() {
            return Err(CacheError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(encode(name)))
    }

    /// Opens (creating if needed) the cache `name`.
    pub async fn open(&self, name: &str) -> Result<Cache, CacheError> {
        let dir = self.cache_dir(name)?;
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| CacheError::io(&dir, e))?;
        Ok(Cache {
            name: name.to_string(),
            dir,
        })
    }

    /// Returns true if the cache `name` exists.
    pub async fn has(&self, name: &str) -> Result<bool, CacheError> {
        let dir = self.cache_dir(name)?;
        tokio::fs::try_exists(&dir)
            .await
            .map_err(|e| CacheError::io(&dir, e))
    }

    /// Lists cache names, sorted.
    pub async fn keys(&self) -> Result<Vec<String>, CacheError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CacheError::io(&self.root, e)),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| CacheError::io(&self.root, e))?
        {
            let is_dir = entry
                .file_type()
                .await
                .map(|t| t.is_dir())
                .unwrap_or(false);
            if is_dir {
                names.push(decode(&entry.file_name().to_string_lossy()));
            }
        }
        names.sort();
        Ok(names)
    }

    /// Deletes the cache `name`. Returns false if it did not exist.
    pub async fn delete(&self, name: &str) -> Result<bool, CacheError> {
        let dir = self.cache_dir(name)?;
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => {
                debug!(cache = name, "cache deleted");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CacheError::io(&dir, e)),
        }
    }
}

/// A single named cache.
#[derive(Debug, Clone)]
pub struct Cache {
    name: String,
    dir: PathBuf,
}

impl Cache {
    pub fn name(&self) -> &str {
        &self.name
    }

    fn entry_path(&self, url: &Url) -> PathBuf {
        self.dir.join(encode(url.as_str()))
    }

    /// Stores `body` under `url`.
    pub async fn put(&self, url: &Url, body: &[u8]) -> Result<(), CacheError> {
        let path = self.entry_path(url);
        tokio::fs::write(&path, body)
            .await
            .map_err(|e| CacheError::io(&path, e))
    }

    /// Returns the stored body for `url`, if any.
    pub async fn match_url(&self, url: &Url) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.entry_path(url);
        match tokio::fs::read(&path).await {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::io(&path, e)),
        }
    }

    /// Fetches every asset from the deployment and stores them.
    ///
    /// All assets are read before anything is written, so a missing asset
    /// leaves the cache untouched.
    pub async fn add_all(
        &self,
        root: &DeploymentRoot,
        assets: &AssetDirectory,
        names: &[&str],
    ) -> Result<usize, CacheError> {
        let mut fetched = Vec::with_capacity(names.len());
        for name in names {
            let url = root.asset_url(name);
            let path = assets
                .local_path(root, &url)
                .ok_or_else(|| CacheError::OutsideDeployment(url.to_string()))?;
            let body = match tokio::fs::read(&path).await {
                Ok(body) => body,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(CacheError::MissingAsset {
                        url: url.to_string(),
                    })
                }
                Err(e) => return Err(CacheError::io(&path, e)),
            };
            fetched.push((url, body));
        }

        for (url, body) in &fetched {
            self.put(url, body).await?;
        }
        debug!(cache = %self.name, count = fetched.len(), "assets cached");
        Ok(fetched.len())
    }

    /// Lists the cached URLs, sorted.
    pub async fn keys(&self) -> Result<Vec<String>, CacheError> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| CacheError::io(&self.dir, e))?;
        let mut urls = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| CacheError::io(&self.dir, e))?
        {
            urls.push(decode(&entry.file_name().to_string_lossy()));
        }
        urls.sort();
        Ok(urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn deployment(files: &[&str]) -> (TempDir, AssetDirectory) {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, file.as_bytes()).unwrap();
        }
        let assets = AssetDirectory::new(dir.path());
        (dir, assets)
    }

    const ALL_FILES: [&str; 4] = [
        "index.html",
        "timer-complete.mp3",
        "notification-sound.mp3",
        "icons/icon-192x192.png",
    ];

    #[test]
    fn test_encode_decode() {
        let url = "https://example.github.io/focusbell/index.html";
        let encoded = encode(url);
        assert!(!encoded.contains('/'));
        assert_eq!(decode(&encoded), url);
    }

    #[tokio::test]
    async fn test_keys_on_missing_root() {
        let dir = TempDir::new().unwrap();
        let storage = CacheStorage::new(dir.path().join("none"));
        assert!(storage.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_delete() {
        let dir = TempDir::new().unwrap();
        let storage = CacheStorage::new(dir.path());

        storage.open("pomodoro-timer-v0").await.unwrap();
        storage.open(CACHE_NAME).await.unwrap();
        assert_eq!(
            storage.keys().await.unwrap(),
            vec!["pomodoro-timer-v0".to_string(), CACHE_NAME.to_string()]
        );

        assert!(storage.delete("pomodoro-timer-v0").await.unwrap());
        assert!(!storage.delete("pomodoro-timer-v0").await.unwrap());
        assert!(storage.has(CACHE_NAME).await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_name() {
        let storage = CacheStorage::new("/tmp/unused");
        assert!(matches!(
            storage.open("").await,
            Err(CacheError::InvalidName(_))
        ));
    }

    #[tokio::test]
    async fn test_add_all_under_sub_path() {
        let (_files, assets) = deployment(&ALL_FILES);
        let dir = TempDir::new().unwrap();
        let root = DeploymentRoot::parse("https://example.github.io/focusbell/").unwrap();
        let cache = CacheStorage::new(dir.path()).open(CACHE_NAME).await.unwrap();

        let count = cache.add_all(&root, &assets, &PRECACHE_ASSETS).await.unwrap();

        assert_eq!(count, 5);
        let root_doc = cache.match_url(root.as_url()).await.unwrap().unwrap();
        assert_eq!(root_doc, b"index.html");
        assert!(cache
            .keys()
            .await
            .unwrap()
            .contains(&"https://example.github.io/focusbell/timer-complete.mp3".to_string()));
    }

    #[tokio::test]
    async fn test_add_all_missing_asset_writes_nothing() {
        let (_files, assets) = deployment(&["index.html", "timer-complete.mp3"]);
        let dir = TempDir::new().unwrap();
        let root = DeploymentRoot::parse("http://localhost/").unwrap();
        let cache = CacheStorage::new(dir.path()).open(CACHE_NAME).await.unwrap();

        let err = cache
            .add_all(&root, &assets, &PRECACHE_ASSETS)
            .await
            .unwrap_err();

        assert!(err.is_missing_asset());
        assert!(err.to_string().contains("notification-sound.mp3"));
        assert!(cache.keys().await.unwrap().is_empty());
    }
}
