//! Command definitions for the focusbell CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use url::Url;

use crate::deployment::{AssetDirectory, DeploymentError, DeploymentRoot};
use crate::notification::PlatformCapabilities;
use crate::types::PomodoroConfig;
use crate::worker::CacheStorage;

// ============================================================================
// CLI Structure
// ============================================================================

/// focusbell - focus/break interval timer with desktop alerts
#[derive(Parser, Debug)]
#[command(
    name = "focusbell",
    version,
    about = "Focus/break interval timer with desktop notifications",
    long_about = "A terminal interval timer that keeps counting while you work and \
                  alerts you at the end of every interval with a sound and a \
                  desktop notification.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run an interactive timer session
    Run(RunArgs),

    /// Install the background worker once and list the asset caches
    Precache(DeploymentArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Arguments
// ============================================================================

/// Where the deployment lives.
#[derive(Args, Debug, Clone)]
pub struct DeploymentArgs {
    /// Location the session runs at; the deployment root is derived from it
    #[arg(long, default_value = "http://localhost/", value_parser = parse_location)]
    pub location: Url,

    /// Directory holding the files served under the deployment root
    #[arg(long, default_value = "public")]
    pub assets: PathBuf,

    /// Directory for the worker's asset caches
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,
}

impl DeploymentArgs {
    pub fn root(&self) -> DeploymentRoot {
        DeploymentRoot::from_location(&self.location)
    }

    pub fn asset_directory(&self) -> AssetDirectory {
        AssetDirectory::new(&self.assets)
    }

    /// Resolves the cache directory, falling back to the platform default.
    pub fn cache_storage(&self) -> Result<CacheStorage> {
        let root = match &self.cache_dir {
            Some(dir) => dir.clone(),
            None => CacheStorage::default_root()
                .ok_or_else(|| anyhow!("no cache directory on this platform; pass --cache-dir"))?,
        };
        Ok(CacheStorage::new(root))
    }
}

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub deployment: DeploymentArgs,

    /// Focus duration in minutes (1-120)
    #[arg(
        short,
        long,
        default_value = "25",
        value_parser = clap::value_parser!(u32).range(1..=120)
    )]
    pub work: u32,

    /// Short break duration in minutes (1-60)
    #[arg(
        short,
        long,
        default_value = "5",
        value_parser = clap::value_parser!(u32).range(1..=60)
    )]
    pub short_break: u32,

    /// Long break duration in minutes (1-60)
    #[arg(
        short,
        long,
        default_value = "15",
        value_parser = clap::value_parser!(u32).range(1..=60)
    )]
    pub long_break: u32,

    /// Disable the audio cue
    #[arg(long)]
    pub no_sound: bool,

    /// Disable desktop notifications
    #[arg(long)]
    pub no_notifications: bool,

    /// Do not register the background worker
    #[arg(long)]
    pub no_worker: bool,

    /// Grant notification permission up front
    #[arg(long)]
    pub allow_notifications: bool,
}

impl RunArgs {
    /// Builds the validated timer configuration.
    pub fn config(&self) -> Result<PomodoroConfig> {
        let config = PomodoroConfig::default()
            .with_work_minutes(self.work)
            .with_break_minutes(self.short_break)
            .with_long_break_minutes(self.long_break);
        config.validate().map_err(|e| anyhow!(e))?;
        Ok(config)
    }

    /// Capabilities after applying the opt-out flags to what was detected.
    pub fn capabilities(&self, notifications_detected: bool) -> PlatformCapabilities {
        let notifications = notifications_detected && !self.no_notifications;
        PlatformCapabilities {
            notifications,
            background_workers: notifications && !self.no_worker,
        }
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Parses `--location` as an absolute hierarchical URL.
fn parse_location(s: &str) -> Result<Url, DeploymentError> {
    DeploymentRoot::parse_location(s)
}

// ============================================================================
// Tests
// ============================================================================
