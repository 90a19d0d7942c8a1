//! Background worker.
//!
//! - `protocol`: messages, lifecycle events and the `ChannelHandle` port
//! - `cache`: versioned on-disk asset caches
//! - `clients`: window clients focused or opened on notification click
//! - `service`: the worker event loop
//! - `host`: in-process `WorkerHost` that spawns and drives the worker

pub mod cache;
pub mod clients;
pub mod error;
pub mod host;
pub mod protocol;
pub mod service;

pub use cache::{Cache, CacheStorage, CACHE_NAME, PRECACHE_ASSETS};
pub use clients::{ClientEvent, ClientRegistry, MockClientRegistry, SessionClients, WindowClient};
pub use error::{CacheError, ClientError};
pub use host::LocalWorkerHost;
pub use protocol::{ChannelHandle, ClickOutcome, WorkerEvent, WorkerMessage, SHOW_NOTIFICATION};
pub use service::BackgroundWorker;

/// Worker script name, relative to the deployment root.
pub const WORKER_SCRIPT: &str = "sw.js";
