//! Deployment root resolution.
//!
//! The application may be served from a sub-path (for example
//! `https://example.github.io/focusbell/`), so every runtime asset reference
//! (worker script, audio cue, icon) is built from a root derived from the
//! current location instead of a fixed absolute path.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use url::Url;

/// Root document served for the bare deployment root.
pub const INDEX_DOCUMENT: &str = "index.html";

/// Errors from resolving a deployment location.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeploymentError {
    /// The location does not parse as a URL
    #[error("invalid location '{location}': {source}")]
    InvalidLocation {
        location: String,
        #[source]
        source: url::ParseError,
    },

    /// The location has no hierarchical path (`mailto:`, `data:`)
    #[error("location '{0}' cannot be used as a base URL")]
    NotHierarchical(String),
}

/// Normalized base URL of the deployment. Always ends with `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRoot {
    url: Url,
}

impl DeploymentRoot {
    /// Derives the root from the current location.
    ///
    /// Query and fragment are dropped, a trailing file-like segment
    /// (`index.html`) is removed and a trailing `/` is ensured.
    pub fn from_location(location: &Url) -> Self {
        let mut url = location.clone();
        url.set_query(None);
        url.set_fragment(None);

        if !url.cannot_be_a_base() {
            let path = url.path().to_string();
            let normalized = match path.rfind('/') {
                Some(idx) => {
                    let last = &path[idx + 1..];
                    if last.is_empty() {
                        path.clone()
                    } else if last.contains('.') {
                        path[..=idx].to_string()
                    } else {
                        format!("{path}/")
                    }
                }
                None => "/".to_string(),
            };
            url.set_path(&normalized);
        }

        debug!(root = %url, "resolved deployment root");
        Self { url }
    }

    /// Parses `location` and derives the root from it.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentError`] if the location is not an absolute,
    /// hierarchical URL.
    pub fn parse(location: &str) -> Result<Self, DeploymentError> {
        Self::parse_location(location).map(|url| Self::from_location(&url))
    }

    /// Validates `location` like [`parse`](Self::parse) but returns the
    /// location itself.
    ///
    /// # Errors
    ///
    /// Same as [`parse`](Self::parse).
    pub fn parse_location(location: &str) -> Result<Url, DeploymentError> {
        let url = Url::parse(location).map_err(|source| DeploymentError::InvalidLocation {
            location: location.to_string(),
            source,
        })?;
        if url.cannot_be_a_base() {
            return Err(DeploymentError::NotHierarchical(location.to_string()));
        }
        Ok(url)
    }

    /// Returns the root URL.
    pub fn as_url(&self) -> &Url {
        &self.url
    }

    /// Returns the root path component, e.g. `/focusbell/`.
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Resolves a root-relative asset name to an absolute URL.
    ///
    /// Leading slashes are ignored so `/icons/a.png` and `icons/a.png`
    /// both stay inside the deployment.
    pub fn asset_url(&self, relative: &str) -> Url {
        match self.url.join(relative.trim_start_matches('/')) {
            Ok(url) => url,
            Err(e) => {
                debug!("could not resolve asset '{}': {}", relative, e);
                self.url.clone()
            }
        }
    }

    /// Returns true if `url` shares the deployment origin.
    pub fn same_origin(&self, url: &Url) -> bool {
        self.url.origin() == url.origin()
    }

    /// Returns true if `url` lies under the deployment root.
    pub fn contains(&self, url: &Url) -> bool {
        self.same_origin(url) && url.path().starts_with(self.path())
    }

    /// Returns the part of `url`'s path below the root, if it is inside it.
    pub fn relative_path<'a>(&self, url: &'a Url) -> Option<&'a str> {
        if !self.contains(url) {
            return None;
        }
        Some(&url.path()[self.path().len()..])
    }
}

impl std::fmt::Display for DeploymentRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// Local directory holding the files served under the deployment root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDirectory {
    dir: PathBuf,
}

impl AssetDirectory {
    /// Creates an asset directory rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Maps an asset URL to its file on disk.
    ///
    /// Returns `None` for URLs outside the deployment or paths that try to
    /// escape the directory. Directory URLs map to their index document.
    pub fn local_path(&self, root: &DeploymentRoot, url: &Url) -> Option<PathBuf> {
        let relative = root.relative_path(url)?;

        let mut path = self.dir.clone();
        for segment in relative.split('/').filter(|s| !s.is_empty()) {
            if segment == ".." || segment == "." {
                return None;
            }
            path.push(segment);
        }
        if relative.is_empty() || relative.ends_with('/') {
            path.push(INDEX_DOCUMENT);
        }
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(location: &str) -> DeploymentRoot {
        DeploymentRoot::parse(location).unwrap()
    }

    mod root_tests {
        use super::*;

        #[test]
        fn test_bare_origin() {
            assert_eq!(root("http://localhost").path(), "/");
            assert_eq!(root("http://localhost/").path(), "/");
        }

        #[test]
        fn test_sub_path_gets_trailing_separator() {
            let root = root("https://example.github.io/focusbell");
            assert_eq!(root.path(), "/focusbell/");
            assert_eq!(root.to_string(), "https://example.github.io/focusbell/");
        }

        #[test]
        fn test_file_segment_is_dropped() {
            let root = root("https://example.github.io/focusbell/index.html?x=1#top");
            assert_eq!(root.to_string(), "https://example.github.io/focusbell/");
        }

        #[test]
        fn test_asset_url_stays_under_sub_path() {
            let root = root("https://example.github.io/focusbell/");
            assert_eq!(
                root.asset_url("/icons/icon-192x192.png").as_str(),
                "https://example.github.io/focusbell/icons/icon-192x192.png"
            );
            assert_eq!(
                root.asset_url("timer-complete.mp3").as_str(),
                "https://example.github.io/focusbell/timer-complete.mp3"
            );
        }

        #[test]
        fn test_contains() {
            let root = root("https://example.github.io/focusbell/");
            let inside = Url::parse("https://example.github.io/focusbell/sw.js").unwrap();
            let outside = Url::parse("https://example.github.io/other/sw.js").unwrap();
            let foreign = Url::parse("https://evil.example/focusbell/sw.js").unwrap();

            assert!(root.contains(&inside));
            assert!(!root.contains(&outside));
            assert!(!root.contains(&foreign));
            assert_eq!(root.relative_path(&inside), Some("sw.js"));
        }

        #[test]
        fn test_parse_rejects_opaque_urls() {
            assert_eq!(
                DeploymentRoot::parse("mailto:someone@example.com"),
                Err(DeploymentError::NotHierarchical(
                    "mailto:someone@example.com".to_string()
                ))
            );
        }

        #[test]
        fn test_parse_rejects_invalid_urls() {
            let err = DeploymentRoot::parse("not a url").unwrap_err();

            assert!(matches!(
                err,
                DeploymentError::InvalidLocation {
                    source: url::ParseError::RelativeUrlWithoutBase,
                    ..
                }
            ));
            assert!(err.to_string().starts_with("invalid location 'not a url'"));
        }

        #[test]
        fn test_parse_location_keeps_full_url() {
            let url =
                DeploymentRoot::parse_location("https://example.github.io/focusbell/index.html")
                    .unwrap();
            assert_eq!(url.path(), "/focusbell/index.html");
        }
    }

    mod asset_directory_tests {
        use super::*;

        #[test]
        fn test_local_path_maps_under_dir() {
            let root = root("http://localhost/app/");
            let assets = AssetDirectory::new("/srv/public");
            let url = root.asset_url("icons/icon-192x192.png");

            assert_eq!(
                assets.local_path(&root, &url),
                Some(PathBuf::from("/srv/public/icons/icon-192x192.png"))
            );
        }

        #[test]
        fn test_root_document_maps_to_index() {
            let root = root("http://localhost/app/");
            let assets = AssetDirectory::new("/srv/public");

            assert_eq!(
                assets.local_path(&root, root.as_url()),
                Some(PathBuf::from("/srv/public/index.html"))
            );
        }

        #[test]
        fn test_outside_root_is_rejected() {
            let root = root("http://localhost/app/");
            let assets = AssetDirectory::new("/srv/public");
            let url = Url::parse("http://localhost/secret.txt").unwrap();

            assert_eq!(assets.local_path(&root, &url), None);
        }
    }
}
