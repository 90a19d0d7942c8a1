//! Sound source resolution.
//!
//! The end-of-interval cue is an asset served under the deployment root.
//! When no local asset directory is configured the synthesized chime is
//! used instead.

use std::path::{Path, PathBuf};

use url::Url;

use crate::deployment::{AssetDirectory, DeploymentRoot};

/// Root-relative name of the end-of-interval cue.
pub const TIMER_COMPLETE_SOUND: &str = "timer-complete.mp3";

/// Root-relative name of the secondary notification sound.
pub const NOTIFICATION_SOUND: &str = "notification-sound.mp3";

/// Represents the source of a sound to be played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSource {
    /// An audio asset from the deployment.
    Asset {
        /// Asset URL under the deployment root.
        url: Url,
        /// Local file backing the URL.
        path: PathBuf,
    },
    /// The built-in chime.
    Chime,
}

impl SoundSource {
    /// Creates an asset sound source.
    #[must_use]
    pub fn asset(url: Url, path: impl Into<PathBuf>) -> Self {
        Self::Asset {
            url,
            path: path.into(),
        }
    }

    /// Resolves `name` against the deployment root.
    ///
    /// Falls back to the chime when there is no asset directory or the URL
    /// does not map into it.
    #[must_use]
    pub fn resolve(root: &DeploymentRoot, assets: Option<&AssetDirectory>, name: &str) -> Self {
        let url = root.asset_url(name);
        match assets.and_then(|assets| assets.local_path(root, &url)) {
            Some(path) => Self::Asset { url, path },
            None => Self::Chime,
        }
    }

    /// Returns a short name for logging.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Asset { url, .. } => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .unwrap_or_else(|| url.as_str()),
            Self::Chime => "chime",
        }
    }

    /// Returns true if this is a deployment asset.
    #[must_use]
    pub fn is_asset(&self) -> bool {
        matches!(self, Self::Asset { .. })
    }

    /// Returns the file path if this is an asset.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Asset { path, .. } => Some(path),
            Self::Chime => None,
        }
    }
}
